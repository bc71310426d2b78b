pub mod tui;
pub mod util;
