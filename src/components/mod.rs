pub mod app;
pub mod map_view;
pub mod movement_panel;
pub mod reset_button;

pub use app::{App, AppProps};
