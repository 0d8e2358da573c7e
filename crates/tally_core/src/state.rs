use std::collections::BTreeMap;

/// Snowflake-style participant identifier.
pub type UserId = u64;
/// Snowflake-style channel identifier.
pub type ChannelId = u64;
/// Snowflake-style role identifier.
pub type RoleId = u64;

/// Running tally for one participant since the last goal reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterStats {
    pub counts: u64,
}

/// Plain-data image of [`CountingState`], used for persistence and restore.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressSnapshot {
    pub last_count: f64,
    pub last_counter: Option<UserId>,
    pub tallies: Vec<(UserId, u64)>,
}

/// Durable record of game progress for one counting stream.
///
/// Single writer: only [`crate::update`] mutates it, one inbound event at a
/// time. `last_count` changes only through an accepted count or a
/// goal-triggered reset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountingState {
    last_count: f64,
    last_counter: Option<UserId>,
    counter_stats: BTreeMap<UserId, CounterStats>,
}

impl CountingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last accepted count value; `0.0` before the first count.
    pub fn last_count(&self) -> f64 {
        self.last_count
    }

    /// Participant who posted `last_count`; `None` before the first count.
    pub fn last_counter(&self) -> Option<UserId> {
        self.last_counter
    }

    /// Per-participant tallies since the last goal reset.
    pub fn counter_stats(&self) -> &BTreeMap<UserId, CounterStats> {
        &self.counter_stats
    }

    /// Increments the participant's tally, inserting a zero entry first if
    /// the participant has not counted in this window.
    pub(crate) fn record_count(&mut self, user: UserId) {
        self.counter_stats.entry(user).or_default().counts += 1;
    }

    /// Clears the whole statistics window, atomically with the goal event
    /// that triggered it.
    pub(crate) fn reset_stats(&mut self) {
        self.counter_stats.clear();
    }

    pub(crate) fn set_last(&mut self, count: f64, counter: UserId) {
        self.last_count = count;
        self.last_counter = Some(counter);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            last_count: self.last_count,
            last_counter: self.last_counter,
            tallies: self
                .counter_stats
                .iter()
                .map(|(user, stats)| (*user, stats.counts))
                .collect(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: ProgressSnapshot) {
        self.last_count = snapshot.last_count;
        self.last_counter = snapshot.last_counter;
        self.counter_stats = snapshot
            .tallies
            .into_iter()
            .map(|(user, counts)| (user, CounterStats { counts }))
            .collect();
    }
}
