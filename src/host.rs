//! A host that reads chat messages from a line-based input and writes replies back out.
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error};

use crate::Error;
use crate::Registry;
use crate::event::{EventContext, MessageEvent};

/// Line-based host.
///
/// Every input line is dispatched as a message from a fixed sender, either directly to the bot or
/// in a fixed group. Replies are written as one line each.
#[derive(Debug, Clone)]
pub struct Console {
    /// The identifier messages are attributed to.
    sender_id: String,
    /// The group messages are sent in, or `None` for direct messages.
    group_id: Option<String>,
}

impl Console {
    /// Creates a new console host that attributes messages to `sender_id`, in the group
    /// `group_id` if set.
    #[must_use]
    pub const fn new(sender_id: String, group_id: Option<String>) -> Self {
        Self {
            sender_id,
            group_id,
        }
    }

    /// Builds the event for a single input line.
    #[must_use]
    pub fn event(&self, line: &str) -> MessageEvent {
        match &self.group_id {
            Some(group_id) => MessageEvent::group(group_id, &self.sender_id, line),
            None => MessageEvent::person(&self.sender_id, line),
        }
    }

    /// Dispatches every line read from `input` to the `registry` until the input ends, writing
    /// the replies to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostIo`] if reading the input or writing the output fails.
    pub async fn run<R, W>(&self, registry: &Registry, input: R, mut output: W) -> Result<(), Error>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let mut ctx = EventContext::new(self.event(&line));

            if let Err(err) = registry.dispatch(&mut ctx).await {
                error!(%err, "could not handle message");
                continue;
            }

            if !ctx.is_default_prevented() {
                debug!("message passed through");
            }

            for reply in ctx.into_replies() {
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }

            output.flush().await?;
        }

        Ok(())
    }
}
