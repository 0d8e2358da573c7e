use std::sync::atomic::{AtomicU64, Ordering};

use tally_core::{ChannelId, Notice, RoleId, UserId};
use thiserror::Error;

/// Opaque identifier for a notice the sink has rendered, used for pinning
/// and later retraction.
pub type NoticeHandle = u64;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("chat platform rejected the call: {0}")]
    Platform(String),
}

/// Chat-platform capabilities the engine's intents are rendered through.
///
/// Each method maps to one platform call; callers isolate failures per call
/// and never let them escalate.
pub trait NotificationSink: Send + Sync {
    fn send_notice(&self, channel: ChannelId, notice: &Notice) -> Result<NoticeHandle, SinkError>;
    fn retract_notice(&self, channel: ChannelId, handle: NoticeHandle) -> Result<(), SinkError>;
    fn pin_notice(&self, channel: ChannelId, handle: NoticeHandle) -> Result<(), SinkError>;
    fn grant_role(&self, user: UserId, role: RoleId, reason: &str) -> Result<(), SinkError>;
}

/// Stdout-backed sink for the local console frontend.
#[derive(Default)]
pub struct ConsoleSink {
    next_handle: AtomicU64,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotificationSink for ConsoleSink {
    fn send_notice(&self, channel: ChannelId, notice: &Notice) -> Result<NoticeHandle, SinkError> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        match notice.reaction_symbol {
            Some(symbol) => println!("[#{channel}] {symbol} {}", notice.text),
            None => println!("[#{channel}] {}", notice.text),
        }
        for field in &notice.fields {
            println!("[#{channel}]   {}: {}", field.name, field.value);
        }
        Ok(handle)
    }

    fn retract_notice(&self, _channel: ChannelId, _handle: NoticeHandle) -> Result<(), SinkError> {
        // Printed lines cannot be unprinted; the console keeps its history.
        Ok(())
    }

    fn pin_notice(&self, channel: ChannelId, handle: NoticeHandle) -> Result<(), SinkError> {
        println!("[#{channel}] 📌 pinned notice {handle}");
        Ok(())
    }

    fn grant_role(&self, user: UserId, role: RoleId, reason: &str) -> Result<(), SinkError> {
        println!("[roles] <@{user}> granted role {role}: {reason}");
        Ok(())
    }
}
