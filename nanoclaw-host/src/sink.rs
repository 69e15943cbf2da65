//! Message sink used when no chat transport is attached

use tracing::info;

use nanoclaw_utils::Result;

use crate::processor::MessageSink;

/// Logs outbound messages instead of delivering them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn send_message(&self, chat_jid: &str, text: &str, sender: Option<&str>) -> Result<()> {
        info!(jid = chat_jid, sender = sender.unwrap_or("-"), chars = text.len(), "Outbound message");
        info!(jid = chat_jid, "{}", text);
        Ok(())
    }

    fn refresh_groups(&self) -> Result<()> {
        info!("Group metadata refresh requested");
        Ok(())
    }
}
