//! Postledger Extractor
//!
//! Finds the Telegram post link inside an incoming message.
//!
//! # Overview
//!
//! Users forward posts, paste links with commentary, or send media whose
//! caption carries the link. The extractor returns the first substring that
//! has the shape of a post reference, or `None`.
//!
//! # Accepted Shape
//!
//! ```text
//! http(s)://t.me/<channel>[/<post id>][/<segment>]
//! http(s)://telegram.me/<channel>[/<post id>][/<segment>]
//! ```
//!
//! # Example Usage
//!
//! ```
//! use postledger_extractor::extract_link;
//!
//! let text = "Look at this: https://t.me/news/123 (posted an hour ago)";
//! assert_eq!(extract_link(text).as_deref(), Some("https://t.me/news/123"));
//! assert_eq!(extract_link("no links here"), None);
//! ```

#![warn(missing_docs)]

mod link;

#[cfg(test)]
mod tests;

pub use link::{extract_link, LinkExtractor, LINK_PATTERN};
