//! Model calls: plain text, tool-enabled, and structured output.

pub mod chat_model;
pub mod object;
pub mod text;

pub use chat_model::ChatModel;
pub use object::generate_object;
pub use text::generate_text;
