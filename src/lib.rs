//! HTTP front end for a retrieval-augmented-generation chatbot.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
