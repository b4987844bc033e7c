use terminal_size::{terminal_size, Width};

/// Width used for clap's help formatting; falls back to a fixed width
/// when not connected to a terminal.
pub fn get_terminal_width() -> usize {
    if let Some((Width(width), _)) = terminal_size() {
        width as usize
    } else {
        100
    }
}
