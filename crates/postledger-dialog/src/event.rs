//! Inbound events

use postledger_domain::UserId;

/// Boundary commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the ledger and greet the user
    Start {
        /// Name used in the greeting
        first_name: String,
    },
    /// Send the whole ledger as a table
    Export,
    /// Send aggregate figures
    Stats,
}

impl Command {
    /// Recognize `/start`, `/export` and `/stats`
    ///
    /// Accepts the `/cmd@botname` form and ignores arguments.
    pub fn parse(text: &str, first_name: &str) -> Option<Self> {
        let word = text.trim_start().split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name {
            "start" => Some(Command::Start {
                first_name: first_name.to_string(),
            }),
            "export" => Some(Command::Export),
            "stats" => Some(Command::Stats),
            _ => None,
        }
    }
}

/// Something the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A text message, or the caption of a media message
    TextOrCaptionMessage {
        /// Sender
        user: UserId,
        /// Text or caption (empty when the message had neither)
        text: String,
    },

    /// An inline button press
    ButtonPress {
        /// Sender
        user: UserId,
        /// Raw payload
        token: String,
    },

    /// A boundary command
    Command {
        /// Sender
        user: UserId,
        /// The command
        command: Command,
    },
}

impl Event {
    /// Sender of the event
    pub fn user(&self) -> UserId {
        match self {
            Event::TextOrCaptionMessage { user, .. }
            | Event::ButtonPress { user, .. }
            | Event::Command { user, .. } => *user,
        }
    }
}
