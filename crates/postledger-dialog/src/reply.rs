//! Buttons, keyboards and outbound actions

use crate::text;
use postledger_domain::{Status, UserId};
use std::fmt;

/// Payload carried by an inline button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonToken {
    /// One of the four publication-time choices
    Status(Status),
    /// Re-classify the active link
    EditStatus,
    /// Add a citation to the active link
    AddCitation,
    /// Drop the active link
    Cancel,
    /// Start over with a fresh link
    NewLink,
    /// Send the ledger as a file
    ExportDb,
}

impl ButtonToken {
    /// Parse a payload string, `None` for anything unrecognized
    pub fn parse(token: &str) -> Option<Self> {
        let token = match token {
            "edit_status" => ButtonToken::EditStatus,
            "add_citation" => ButtonToken::AddCitation,
            "cancel" => ButtonToken::Cancel,
            "new_link" => ButtonToken::NewLink,
            "export_db" => ButtonToken::ExportDb,
            other => {
                let index: usize = other.strip_prefix("status_")?.parse().ok()?;
                let status = Status::CHOICES.get(index.checked_sub(1)?)?;
                ButtonToken::Status(*status)
            }
        };
        Some(token)
    }
}

impl fmt::Display for ButtonToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonToken::Status(status) => match Status::CHOICES.iter().position(|c| c == status) {
                Some(index) => write!(f, "status_{}", index + 1),
                None => write!(f, "status_{}", status.as_str()),
            },
            ButtonToken::EditStatus => write!(f, "edit_status"),
            ButtonToken::AddCitation => write!(f, "add_citation"),
            ButtonToken::Cancel => write!(f, "cancel"),
            ButtonToken::NewLink => write!(f, "new_link"),
            ButtonToken::ExportDb => write!(f, "export_db"),
        }
    }
}

/// One inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button
    pub label: String,
    /// Payload sent back when pressed
    pub token: ButtonToken,
}

impl Button {
    fn new(label: &str, token: ButtonToken) -> Self {
        Self {
            label: label.to_string(),
            token,
        }
    }
}

/// Rows of inline buttons, one button per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    /// Button rows, top to bottom
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    fn single_column(buttons: Vec<Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// The four publication-time choices
    pub fn status_choices() -> Self {
        Self::single_column(
            Status::CHOICES
                .iter()
                .map(|s| Button::new(s.label(), ButtonToken::Status(*s)))
                .collect(),
        )
    }

    /// Actions for a link already in the ledger
    pub fn edit_choices() -> Self {
        Self::single_column(vec![
            Button::new(text::BUTTON_EDIT_STATUS, ButtonToken::EditStatus),
            Button::new(text::BUTTON_ADD_CITATION, ButtonToken::AddCitation),
            Button::new(text::BUTTON_CANCEL, ButtonToken::Cancel),
        ])
    }

    /// Follow-ups after a successful change
    pub fn after_add() -> Self {
        Self::single_column(vec![
            Button::new(text::BUTTON_NEW_LINK, ButtonToken::NewLink),
            Button::new(text::BUTTON_EXPORT, ButtonToken::ExportDb),
        ])
    }

    /// All tokens in display order
    pub fn tokens(&self) -> Vec<ButtonToken> {
        self.rows.iter().flatten().map(|b| b.token).collect()
    }
}

/// Action the transport should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send a new message
    SendText {
        /// Recipient
        user: UserId,
        /// Message body
        text: String,
        /// Inline keyboard, if any
        buttons: Option<Keyboard>,
    },

    /// Send a document
    SendFile {
        /// Recipient
        user: UserId,
        /// File contents
        bytes: Vec<u8>,
        /// File name shown to the user
        filename: String,
    },

    /// Replace the message whose button was pressed
    EditLastMessage {
        /// Recipient
        user: UserId,
        /// New message body
        text: String,
        /// New inline keyboard, if any
        buttons: Option<Keyboard>,
    },
}

impl Outbound {
    pub(crate) fn text(user: UserId, text: impl Into<String>) -> Self {
        Outbound::SendText {
            user,
            text: text.into(),
            buttons: None,
        }
    }

    pub(crate) fn text_with(user: UserId, text: impl Into<String>, buttons: Keyboard) -> Self {
        Outbound::SendText {
            user,
            text: text.into(),
            buttons: Some(buttons),
        }
    }

    pub(crate) fn edit(user: UserId, text: impl Into<String>) -> Self {
        Outbound::EditLastMessage {
            user,
            text: text.into(),
            buttons: None,
        }
    }

    pub(crate) fn edit_with(user: UserId, text: impl Into<String>, buttons: Keyboard) -> Self {
        Outbound::EditLastMessage {
            user,
            text: text.into(),
            buttons: Some(buttons),
        }
    }

    /// Recipient of the action
    pub fn user(&self) -> UserId {
        match self {
            Outbound::SendText { user, .. }
            | Outbound::SendFile { user, .. }
            | Outbound::EditLastMessage { user, .. } => *user,
        }
    }

    /// Message body, `None` for files
    pub fn body(&self) -> Option<&str> {
        match self {
            Outbound::SendText { text, .. } | Outbound::EditLastMessage { text, .. } => Some(text),
            Outbound::SendFile { .. } => None,
        }
    }

    /// Attached keyboard, if any
    pub fn buttons(&self) -> Option<&Keyboard> {
        match self {
            Outbound::SendText { buttons, .. } | Outbound::EditLastMessage { buttons, .. } => {
                buttons.as_ref()
            }
            Outbound::SendFile { .. } => None,
        }
    }
}
