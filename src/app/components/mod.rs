pub mod chat_input;
pub mod chat_messages;
pub mod file_preview;
pub mod message_item;
pub mod toast;

pub use chat_input::{ChatInput, FILE_INPUT_ID, PROMPT_INPUT_ID};
pub use chat_messages::ChatMessages;
pub use file_preview::FilePreview;
pub use message_item::MessageItem;
pub use toast::ToastView;
