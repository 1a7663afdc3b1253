//! Line-oriented console transport.
//!
//! Each input line carries the sender's numeric user id followed by the
//! message text, for example `900 /jobs 2026-10-20`. Replies are written
//! back followed by a blank line.

use crate::assignment::ports::AssignmentRepository;
use crate::command::services::CommandDispatcher;
use crate::job::ports::JobRepository;
use crate::staff::ports::EmployeeRepository;
use mockable::Clock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Reply to a line that does not start with a user id.
pub const USAGE_REPLY: &str = "Expected `<user-id> <message>`, for example `900 /help`.";

/// One parsed console input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLine<'a> {
    /// Nothing but whitespace.
    Blank,
    /// A message from a user.
    Message {
        /// Sender's numeric id.
        user_id: i64,
        /// Message text after the id.
        text: &'a str,
    },
    /// The line has no leading numeric id.
    Malformed,
}

impl<'a> ConsoleLine<'a> {
    /// Splits `line` into sender id and message text.
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        let (id, text) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        id.parse().map_or(Self::Malformed, |user_id| Self::Message {
            user_id,
            text: text.trim_start(),
        })
    }
}

/// Reads messages from `reader` and writes replies to `writer` until the
/// input ends or `shutdown` is cancelled. Returns the number of messages
/// handled.
///
/// # Errors
///
/// Returns [`std::io::Error`] when reading or writing fails.
pub async fn serve<J, A, S, C, R, W>(
    dispatcher: &CommandDispatcher<J, A, S, C>,
    reader: R,
    writer: &mut W,
    shutdown: &CancellationToken,
) -> std::io::Result<usize>
where
    J: JobRepository,
    A: AssignmentRepository,
    S: EmployeeRepository,
    C: Clock + Send + Sync,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;
    loop {
        let next = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            next = lines.next_line() => next?,
        };
        let Some(line) = next else {
            break;
        };
        let reply = match ConsoleLine::parse(&line) {
            ConsoleLine::Blank => continue,
            ConsoleLine::Malformed => USAGE_REPLY.to_owned(),
            ConsoleLine::Message { user_id, text } => {
                handled += 1;
                dispatcher.handle(user_id, text).await.into_text()
            }
        };
        writer.write_all(reply.as_bytes()).await?;
        writer.write_all(b"\n\n").await?;
        writer.flush().await?;
    }
    tracing::debug!(handled, "console input finished");
    Ok(handled)
}
