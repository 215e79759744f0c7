mod chatbot;
mod rag;

pub use chatbot::RagChatbot;
pub use rag::RagService;
