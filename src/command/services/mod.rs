//! Command dispatch and reply rendering.

mod dispatch;
mod render;

pub use dispatch::{CommandDispatcher, CommandError};
pub use render::ReplyRenderer;
