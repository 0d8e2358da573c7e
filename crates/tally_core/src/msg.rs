use crate::{ChannelId, ProgressSnapshot, UserId};

/// One chat message as delivered by the platform boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub author: UserId,
    /// Set for bot and webhook authors; their messages are ignored silently.
    pub author_is_automated: bool,
    pub channel: ChannelId,
    pub body: String,
    /// RFC3339 timestamp attached by the platform boundary; the engine
    /// itself never reads a clock.
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A chat message arrived somewhere the bot can see.
    MessagePosted(InboundMessage),
    /// Restore previously persisted progress at startup.
    RestoreProgress(ProgressSnapshot),
    /// Fallback for placeholder wiring.
    NoOp,
}
