pub mod agenda;
pub mod menu;
pub mod styles;

pub use agenda::{render_agenda, render_task_line};
pub use menu::{header_text, render_choices, render_menu, MENU_ITEMS};
