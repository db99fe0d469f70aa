//! Headless client for selection-driven template application.
//!
//! [`ApplyController`] owns an [`EditorSession`], a snapshot of the server's
//! templates, the results feed, and the notification queue. Hosts feed it UI
//! events (selection changes, template choice, shortcuts) and it talks to the
//! server through a [`PaceApi`] implementation such as [`HttpPaceClient`].

#![warn(missing_docs, clippy::pedantic)]

mod catalog;
mod client;
mod controller;
mod feed;
mod language;
mod notify;
mod session;
mod shortcuts;

pub use catalog::TemplateCatalog;
pub use client::{ClientError, ClientResult, HttpPaceClient, PaceApi};
pub use controller::{ApplyController, ApplyError, ApplyResult, PendingApply, RequestState};
pub use feed::{EMPTY_FEED_PLACEHOLDER, ResultEntry, ResultFeed};
pub use language::Language;
pub use notify::{DISPLAY_DURATION, Notification, NotificationKind};
pub use session::{EditorSession, NO_SELECTION_HINT};
pub use shortcuts::{EditorCommand, resolve_shortcut};
