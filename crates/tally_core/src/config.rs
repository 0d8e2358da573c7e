use std::collections::BTreeSet;

use crate::{ChannelId, RoleId, UserId};

/// Sign convention governing which next values extend the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Next count is `last + amount`.
    #[default]
    Positive,
    /// Next count is `last - amount`.
    Negative,
    /// Next count is `amount` away from `last` in either direction.
    AnyOffset,
}

/// Milestone settings: which multiples celebrate, and what happens after.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalConfig {
    pub multiple: f64,
    /// Restart the sequence at `reset_value` once the goal is reached.
    pub reset: bool,
    pub reset_value: f64,
    /// Keep per-participant tallies for the goal statistics report.
    pub track_statistics: bool,
    pub achiever_role: Option<RoleId>,
    pub assistant_role: Option<RoleId>,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            multiple: 100.0,
            reset: false,
            reset_value: 0.0,
            track_statistics: false,
            achiever_role: None,
            assistant_role: None,
        }
    }
}

/// Mirror rejection notices into a moderation log channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub channel: ChannelId,
    pub show_additional_fields: bool,
}

/// How rejection notices are rendered and cleaned up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub add_reaction: bool,
    pub deletion_timeout_ms: Option<u64>,
    pub show_author: bool,
    pub show_timestamp: bool,
    pub log: Option<LogConfig>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            add_reaction: true,
            deletion_timeout_ms: None,
            show_author: true,
            show_timestamp: false,
            log: None,
        }
    }
}

/// Immutable settings for one counting stream, resolved once at load time.
///
/// The engine consumes this; it never mutates or re-validates it.
#[derive(Debug, Clone, PartialEq)]
pub struct CountingConfig {
    /// The designated counting channel; events elsewhere are ignored.
    pub channel: ChannelId,
    pub direction: Direction,
    /// Fixed step between consecutive counts. Positive and finite.
    pub amount: f64,
    /// Whether one participant may post two accepted counts in a row.
    pub multiple_by_same_user: bool,
    pub blacklist: BTreeSet<UserId>,
    pub goal: Option<GoalConfig>,
    pub report: ReportConfig,
}

impl CountingConfig {
    /// Settings with every default in place for the given channel.
    pub fn new(channel: ChannelId) -> Self {
        Self {
            channel,
            direction: Direction::default(),
            amount: 1.0,
            multiple_by_same_user: false,
            blacklist: BTreeSet::new(),
            goal: None,
            report: ReportConfig::default(),
        }
    }
}
