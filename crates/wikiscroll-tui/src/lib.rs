pub mod app;
pub mod event;
pub mod fetch;
pub mod images;
pub mod input;
pub mod keymap;
pub mod scroll;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, Panel};
pub use keymap::Keymap;
pub use theme::Theme;
