//! Application layer - Use cases and orchestration.
//!
//! Services here depend on domain ports (traits) rather than concrete
//! implementations, so the HTTP layer and tests can swap backends freely.

pub mod services;

pub use services::{RagChatbot, RagService};
