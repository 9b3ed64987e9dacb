//! Postledger Dialog
//!
//! The per-user conversation that turns chat events into ledger changes.
//!
//! A user sends a post link; the dialog either asks when the post was
//! published (new link) or shows the stored record with edit buttons (known
//! link). Button presses and follow-up text complete the step, after which
//! the session returns to idle. Replies are returned as [`Outbound`] values
//! so the transport stays a thin renderer.
//!
//! # Usage
//!
//! ```no_run
//! use postledger_dialog::{Conversation, Event};
//! use postledger_domain::UserId;
//! use postledger_store::SqliteLedger;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let conversation = Conversation::new(Arc::new(SqliteLedger::new("user_data")?));
//! let reply = conversation
//!     .handle(Event::TextOrCaptionMessage {
//!         user: UserId(42),
//!         text: "https://t.me/news/123".to_string(),
//!     })
//!     .await;
//! println!("{:?}", reply);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod conversation;
pub mod error;
pub mod event;
pub mod reply;
pub mod session;
pub mod text;

pub use conversation::Conversation;
pub use error::{DialogError, DialogOutcome};
pub use event::{Command, Event};
pub use reply::{Button, ButtonToken, Keyboard, Outbound};
pub use session::{SessionHandle, SessionRegistry};
