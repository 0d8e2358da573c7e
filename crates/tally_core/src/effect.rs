use crate::{ProgressSnapshot, RoleId, UserId};

/// Why a message was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Blacklisted,
    NotANumber,
    WrongValue,
    RepeatedTurn,
}

impl Rejection {
    /// Symbolic marker the sink may attach as a reaction.
    pub fn symbol(self) -> char {
        match self {
            Rejection::Blacklisted => '🚫',
            Rejection::NotANumber => '🔤',
            Rejection::WrongValue => '❌',
            Rejection::RepeatedTurn => '🔁',
        }
    }
}

/// What a notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A rejected message, carrying the rejection it reports.
    Issue(Rejection),
    /// A reached milestone.
    GoalAnnouncement,
}

/// One labelled value on a rendered notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A message the sink should render into the counting stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub reaction_symbol: Option<char>,
    pub fields: Vec<NoticeField>,
    /// Retract the rendered notice after this many milliseconds.
    pub deletion_delay_ms: Option<u64>,
}

/// Side effects requested by the engine, executed by the platform layer.
/// The engine never performs I/O itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Notify(Notice),
    GrantRole {
        user: UserId,
        role: RoleId,
        reason: String,
    },
    PersistState {
        snapshot: ProgressSnapshot,
    },
}
