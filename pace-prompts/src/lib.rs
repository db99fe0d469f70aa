//! Prompt templates for selection-driven code assistance.
//!
//! A [`Template`] is a named prompt whose body carries the
//! [`PLACEHOLDER`] marker. The editor substitutes the user's selection into
//! the marker and sends the rendered prompt to the completion gateway. The
//! [`TemplateStore`] holds the server's template collection for the lifetime
//! of the process.

#![warn(missing_docs, clippy::pedantic)]

mod defaults;
mod ids;
mod store;
mod template;
pub mod wire;

pub use defaults::default_templates;
pub use ids::TemplateId;
pub use store::TemplateStore;
pub use template::{PLACEHOLDER, Template, TemplateError, TemplateResult, render_prompt};
