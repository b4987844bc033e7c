//! Linear scales and tick selection for the SVG charts.

/// Maps a data domain onto a pixel range; the range may be inverted
/// (SVG y grows downwards).
#[derive(Debug, Clone, Copy)]
pub struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl Scale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            // degenerate domain: everything lands in the middle
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

/// 1-2-5 step size aiming for about `target` ticks.
pub fn tick_step(min: f64, max: f64, target: usize) -> f64 {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

pub fn ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return vec![min];
    }
    let step = tick_step(min, max, target);
    let mut out = Vec::new();
    let mut t = (min / step).ceil() * step;
    while t <= max + step * 1e-9 {
        out.push(t);
        t += step;
    }
    out
}

/// Tick label with just enough decimals for the step size.
pub fn tick_label(step: f64, value: f64) -> String {
    let precision = if step >= 1.0 {
        0
    } else {
        (-step.log10()).ceil() as usize
    };
    format!("{value:.precision$}")
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn t_scale() {
        let s = Scale::new((0.0, 10.0), (100.0, 200.0));
        assert_relative_eq!(s.apply(0.0), 100.0);
        assert_relative_eq!(s.apply(5.0), 150.0);
        assert_relative_eq!(s.apply(10.0), 200.0);
    }

    #[test]
    fn t_inverted_range() {
        let s = Scale::new((0.0, 4.0), (300.0, 100.0));
        assert_relative_eq!(s.apply(1.0), 250.0);
    }

    #[test]
    fn t_degenerate_domain() {
        let s = Scale::new((2.0, 2.0), (0.0, 100.0));
        assert_relative_eq!(s.apply(2.0), 50.0);
    }

    #[test]
    fn t_ticks_cover_domain() {
        let ts = ticks(0.0, 100.0, 6);
        assert_eq!(ts.first().copied(), Some(0.0));
        assert_eq!(ts.last().copied(), Some(100.0));
        assert!(ts.len() >= 4 && ts.len() <= 8, "got {ts:?}");
    }

    #[test]
    fn t_small_steps_get_decimals() {
        let step = tick_step(0.0, 1.0, 5);
        assert_relative_eq!(step, 0.2);
        assert_eq!(tick_label(step, 0.4), "0.4");
        assert_eq!(tick_label(2.0, 40.0), "40");
    }
}
