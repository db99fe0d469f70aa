//! Completion provider adapters and the gateway that fronts them.
//!
//! [`traits`] defines the provider-neutral [`ModelAdapter`](traits::ModelAdapter)
//! interface, [`openai`] implements it for OpenAI-compatible chat completion
//! endpoints, and [`gateway`] turns a rendered prompt into completion text.

#![warn(missing_docs, clippy::pedantic)]

pub mod gateway;
pub mod http_client;
pub mod openai;
pub mod traits;

pub use gateway::{CompletionGateway, CompletionService, GatewayError, GatewayResult};
