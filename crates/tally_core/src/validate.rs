use crate::{CountingConfig, CountingState, Direction, UserId};

/// Whether `count` correctly extends the sequence under the configured
/// direction and step.
pub fn is_correct(count: f64, state: &CountingState, config: &CountingConfig) -> bool {
    match config.direction {
        Direction::Negative => count == state.last_count() - config.amount,
        Direction::Positive => count == state.last_count() + config.amount,
        Direction::AnyOffset => (state.last_count() - count).abs() == config.amount,
    }
}

/// Human-facing expectation for the next count: a single value for a fixed
/// direction, "`X` or `Y`" when either offset is allowed.
pub fn expected_counts(state: &CountingState, config: &CountingConfig) -> String {
    let last = state.last_count();
    match config.direction {
        Direction::Negative => format_count(last - config.amount),
        Direction::Positive => format_count(last + config.amount),
        Direction::AnyOffset => format!(
            "{} or {}",
            format_count(last - config.amount),
            format_count(last + config.amount)
        ),
    }
}

/// Turn-order rule, independent of numeric correctness.
pub fn is_repeated_turn(author: UserId, state: &CountingState, config: &CountingConfig) -> bool {
    !config.multiple_by_same_user && state.last_counter() == Some(author)
}

/// Membership test against the configured blacklist.
pub fn is_blacklisted(author: UserId, config: &CountingConfig) -> bool {
    config.blacklist.contains(&author)
}

/// Renders a count without a trailing `.0` for integral values.
pub fn format_count(count: f64) -> String {
    if count.fract() == 0.0 && count.abs() < 1e15 {
        format!("{}", count as i64)
    } else {
        count.to_string()
    }
}
