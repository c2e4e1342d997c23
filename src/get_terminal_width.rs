use terminal_size::{Width, terminal_size};

/// The width to wrap `--help` output at: the terminal width minus
/// `margin`, or 100 if stdout is not a terminal.
pub fn get_terminal_width(margin: u16) -> usize {
    if let Some((Width(width), _)) = terminal_size() {
        usize::from(width.saturating_sub(margin).max(40))
    } else {
        100
    }
}
