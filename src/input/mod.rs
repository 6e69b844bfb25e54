pub mod console;
pub mod handler;
pub mod keyboard;

pub use console::Console;
pub use handler::{ask_user_id, report_load, run_menu, MenuContext, SessionEnd};
pub use keyboard::KeyboardTicker;
