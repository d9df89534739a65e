mod api;
mod models;

pub use api::{convert_message, send_chat_completion};
pub use models::{
    ChatChoice, ChatCompletionResponse, ChatContent, ChatContentImageUrl, ChatContentPart,
    ChatMessage, InlineData,
};
