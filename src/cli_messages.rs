//! CLI command messaging system
//!
//! Consistent output for the commands that manage local credentials
//! (configure, show-config, logout).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warn,
    Success,
}

impl MessageKind {
    fn label(self) -> &'static str {
        match self {
            MessageKind::Info => "[INFO]",
            MessageKind::Warn => "[WARN]",
            MessageKind::Success => "[SUCCESS]",
        }
    }

    fn color(self) -> &'static str {
        match self {
            MessageKind::Info => "\x1b[1;33m",
            MessageKind::Warn => "\x1b[1;91m",
            MessageKind::Success => "\x1b[1;32m",
        }
    }
}

/// Formats a tagged line; details follow the title after a tab.
pub fn format_message(kind: MessageKind, title: &str, details: &str) -> String {
    let mut line = format!("{}{}\x1b[0m {}", kind.color(), kind.label(), title);
    if !details.is_empty() {
        line.push_str("\t ");
        line.push_str(details);
    }
    line
}

pub fn print_message(kind: MessageKind, title: &str, details: &str) {
    println!("{}", format_message(kind, title, details));
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_message(
            $crate::cli_messages::MessageKind::Info,
            $title,
            &format!($($details)*),
        )
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_message(
            $crate::cli_messages::MessageKind::Warn,
            $title,
            &format!($($details)*),
        )
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_message(
            $crate::cli_messages::MessageKind::Success,
            $title,
            &format!($($details)*),
        )
    };
}
