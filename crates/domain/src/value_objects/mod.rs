//! Value objects — small, validated wrapper types with no identity of their own.

mod app_id;
mod chat_id;
mod message_id;
mod number;
mod token;

pub use app_id::AppId;
pub use chat_id::ChatId;
pub use message_id::MessageId;
pub use number::Number;
pub use token::Token;
