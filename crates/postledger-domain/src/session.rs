//! Session module - a user's transient position in the review dialog
//!
//! Sessions live only in memory. A restart loses in-flight dialogs while the
//! ledger itself stays durable.

/// What the dialog expects next from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Nothing pending; a button may still act on the active link
    #[default]
    Idle,

    /// A new link was received and needs its first status
    AwaitingStatusNew,

    /// An existing record's status is being changed
    AwaitingStatusEdit,

    /// The next free text is a citation for the active link
    AwaitingCitationText,
}

impl Mode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::AwaitingStatusNew => "awaiting_status_new",
            Mode::AwaitingStatusEdit => "awaiting_status_edit",
            Mode::AwaitingCitationText => "awaiting_citation_text",
        }
    }
}

/// Per-user dialog state
///
/// Only one link can be under discussion at a time; starting a new link
/// replaces whatever was in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Link currently under discussion
    pub active_link: Option<String>,

    /// Expected next input
    pub mode: Mode,
}

impl Session {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the active link and return to idle
    pub fn reset(&mut self) {
        self.active_link = None;
        self.mode = Mode::Idle;
    }

    /// Start the dialog for a link that is not in the ledger yet
    pub fn begin_new(&mut self, link: String) {
        self.active_link = Some(link);
        self.mode = Mode::AwaitingStatusNew;
    }

    /// Start the edit dialog for a link already in the ledger
    ///
    /// The session stays idle: the next step is a button press, not text.
    pub fn begin_existing(&mut self, link: String) {
        self.active_link = Some(link);
        self.mode = Mode::Idle;
    }

    /// Wait for a replacement status for the active link
    pub fn await_status_edit(&mut self) {
        self.mode = Mode::AwaitingStatusEdit;
    }

    /// Wait for citation text for the active link
    pub fn await_citation(&mut self) {
        self.mode = Mode::AwaitingCitationText;
    }

    /// Whether the session is fully reset
    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle && self.active_link.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert!(session.is_idle());
        assert_eq!(session.mode.as_str(), "idle");
    }

    #[test]
    fn test_begin_new_then_reset() {
        let mut session = Session::new();
        session.begin_new("https://t.me/news/1".to_string());
        assert_eq!(session.mode, Mode::AwaitingStatusNew);
        assert_eq!(session.active_link.as_deref(), Some("https://t.me/news/1"));

        session.reset();
        assert!(session.is_idle());
    }

    #[test]
    fn test_existing_link_keeps_idle_mode() {
        let mut session = Session::new();
        session.begin_new("https://t.me/a/1".to_string());
        session.begin_existing("https://t.me/b/2".to_string());

        assert_eq!(session.mode, Mode::Idle);
        assert_eq!(session.active_link.as_deref(), Some("https://t.me/b/2"));
        assert!(!session.is_idle());
    }

    #[test]
    fn test_edit_transitions_keep_link() {
        let mut session = Session::new();
        session.begin_existing("https://t.me/a/1".to_string());

        session.await_citation();
        assert_eq!(session.mode, Mode::AwaitingCitationText);

        session.await_status_edit();
        assert_eq!(session.mode, Mode::AwaitingStatusEdit);
        assert_eq!(session.active_link.as_deref(), Some("https://t.me/a/1"));
    }
}
