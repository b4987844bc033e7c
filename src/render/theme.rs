//! Chart styling as a plain value, passed into the renderers once,
//! instead of process-wide plotting state.

/// The default histogram colors (muted blue/orange/green/red/purple).
pub const DEEP_PALETTE: &[&str] = &["#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3"];

/// The timing diagram cycles through these five by lane order.
pub const LANE_PALETTE: &[&str] = &["#d62728", "#1f77b4", "#2ca02c", "#ff7f0e", "#9467bd"];

#[derive(Debug, Clone)]
pub struct Theme {
    /// Plot area fill ("darkgrid" style: light gray with white grid)
    pub background: &'static str,
    pub grid: &'static str,
    pub text: &'static str,
    pub font_family: &'static str,
    pub font_size: f64,
    pub palette: &'static [&'static str],
}

impl Theme {
    pub fn darkgrid() -> Self {
        Self {
            background: "#eaeaf2",
            grid: "#ffffff",
            text: "#262626",
            font_family: "sans-serif",
            font_size: 11.0,
            palette: DEEP_PALETTE,
        }
    }

    pub fn lanes() -> Self {
        Self {
            palette: LANE_PALETTE,
            ..Self::darkgrid()
        }
    }

    /// Palette color for series/lane `i`, cycling modulo the palette
    /// length.
    pub fn color(&self, i: usize) -> &'static str {
        self.palette[i % self.palette.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::darkgrid()
    }
}
