//! Parsed commands and replies.

mod command;
mod error;
mod reply;

pub use command::{COMMANDS, Command, CommandUsage, NewJob};
pub use error::CommandParseError;
pub use reply::Reply;
