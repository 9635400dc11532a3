//! Widgets composing the chat screen.

mod chat_header;
mod conversation;
mod footer_hints;
mod input_bar;
mod message_item;
mod text_input;

pub use chat_header::ChatHeader;
pub use conversation::ConversationView;
pub use footer_hints::{FooterHints, NoticeLevel};
pub use input_bar::InputBar;
pub use message_item::MessageItem;
pub use text_input::TextInputState;
