pub mod console;
pub mod messages;
pub mod render;
pub mod setup;

pub use console::run_console;
pub use setup::{SessionData, setup_session};
