//! Entities — objects with identity and a lifecycle.

mod application;
mod chat;
mod message;

pub use application::Application;
pub use chat::Chat;
pub use message::Message;
