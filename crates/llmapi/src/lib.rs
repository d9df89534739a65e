pub mod error;
pub mod providers;
pub mod types;
pub mod utils;

pub use error::LLMError;
pub use providers::openai::{send_chat_completion, ChatCompletionResponse, ChatMessage};
pub use types::{LLMClient, LLMMessage, LLMMessageType, LLMUserType};
