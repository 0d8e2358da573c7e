use crate::validate::format_count;
use crate::{CountingState, Effect, GoalConfig, Notice, NoticeField, NoticeKind, UserId};

/// True iff `count` lands on the configured goal multiple.
pub fn goal_reached(count: f64, goal: &GoalConfig) -> bool {
    count % goal.multiple == 0.0
}

/// Builds the goal announcement and role-grant intents.
///
/// Reads `state` before the statistics window is cleared, so the report
/// covers exactly the window that ends with this goal. With tracking
/// disabled the report is empty; the window is cleared either way.
pub(crate) fn celebrate(
    count: f64,
    achiever: UserId,
    state: &CountingState,
    goal: &GoalConfig,
) -> Vec<Effect> {
    let assistant = state.last_counter().filter(|prior| *prior != achiever);

    let mut text = format!(
        "🎉 <@{achiever}> reached the goal of {}!",
        format_count(count)
    );
    if let Some(assistant) = assistant {
        text.push_str(&format!(
            " <@{assistant}> assisted with the previous count."
        ));
    }
    if goal.reset {
        text.push_str(&format!(
            " The count restarts at {}.",
            format_count(goal.reset_value)
        ));
    }

    let mut effects = vec![Effect::Notify(Notice {
        kind: NoticeKind::GoalAnnouncement,
        text,
        reaction_symbol: None,
        fields: statistics_report(state),
        deletion_delay_ms: None,
    })];

    if let Some(role) = goal.achiever_role {
        effects.push(Effect::GrantRole {
            user: achiever,
            role,
            reason: "reached the counting goal".to_string(),
        });
    }
    if let (Some(role), Some(assistant)) = (goal.assistant_role, assistant) {
        effects.push(Effect::GrantRole {
            user: assistant,
            role,
            reason: "assisted the counting goal".to_string(),
        });
    }

    effects
}

/// Per-participant tallies, busiest counters first, ties by identifier.
fn statistics_report(state: &CountingState) -> Vec<NoticeField> {
    let mut tallies: Vec<_> = state
        .counter_stats()
        .iter()
        .map(|(user, stats)| (*user, stats.counts))
        .collect();
    tallies.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    tallies
        .into_iter()
        .map(|(user, counts)| NoticeField {
            name: format!("<@{user}>"),
            value: format!("{counts} counts"),
            inline: true,
        })
        .collect()
}
