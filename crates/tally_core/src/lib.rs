//! Tally core: pure counting-game state machine.
mod config;
mod effect;
mod goal;
mod msg;
mod parse;
mod state;
mod update;
mod validate;

pub use config::{CountingConfig, Direction, GoalConfig, LogConfig, ReportConfig};
pub use effect::{Effect, Notice, NoticeField, NoticeKind, Rejection};
pub use goal::goal_reached;
pub use msg::{InboundMessage, Msg};
pub use parse::parse_count;
pub use state::{ChannelId, CounterStats, CountingState, ProgressSnapshot, RoleId, UserId};
pub use update::update;
pub use validate::{expected_counts, format_count, is_blacklisted, is_correct, is_repeated_turn};
