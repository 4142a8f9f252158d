//! Banners printed around an interactive session.

use crate::cli_messages::{MessageKind, print_message};
use std::path::Path;

pub fn print_session_starting(storage: &Path) {
    print_message(
        MessageKind::Info,
        "Starting admin console",
        &format!(
            "credentials: {} (type `help` for commands)",
            storage.display()
        ),
    );
}

pub fn print_session_shutdown() {
    print_message(MessageKind::Info, "Shutting down...", "");
}

pub fn print_session_exit_success() {
    print_message(MessageKind::Success, "Admin console exited successfully", "");
}
