use crate::{
    goal, parse, validate, CountingConfig, CountingState, Effect, InboundMessage, Msg, Notice,
    NoticeField, NoticeKind, Rejection, UserId,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(
    mut state: CountingState,
    msg: Msg,
    config: &CountingConfig,
) -> (CountingState, Vec<Effect>) {
    let effects = match msg {
        Msg::MessagePosted(message) => process_message(&mut state, &message, config),
        Msg::RestoreProgress(snapshot) => {
            state.restore(snapshot);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };
    (state, effects)
}

/// Entry guards in order, first match wins. Rejections mutate nothing.
fn process_message(
    state: &mut CountingState,
    message: &InboundMessage,
    config: &CountingConfig,
) -> Vec<Effect> {
    if message.author_is_automated {
        return Vec::new();
    }
    if message.channel != config.channel {
        return Vec::new();
    }
    if validate::is_blacklisted(message.author, config) {
        return reject(
            Rejection::Blacklisted,
            "You are blacklisted from the counting game.".to_string(),
            message,
            config,
        );
    }
    let count = match parse::parse_count(&message.body) {
        Some(count) => count,
        None => {
            return reject(
                Rejection::NotANumber,
                "Your message has to start with a number.".to_string(),
                message,
                config,
            );
        }
    };
    if !validate::is_correct(count, state, config) {
        let expected = validate::expected_counts(state, config);
        return reject(
            Rejection::WrongValue,
            format!("Wrong number. The next count has to be {expected}."),
            message,
            config,
        );
    }
    if validate::is_repeated_turn(message.author, state, config) {
        return reject(
            Rejection::RepeatedTurn,
            "You cannot count multiple times in a row.".to_string(),
            message,
            config,
        );
    }
    accept(state, count, message.author, config)
}

fn accept(
    state: &mut CountingState,
    count: f64,
    author: UserId,
    config: &CountingConfig,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    let mut next_count = count;

    if let Some(goal_config) = &config.goal {
        if goal_config.track_statistics {
            state.record_count(author);
        }
        if goal::goal_reached(count, goal_config) {
            effects.extend(goal::celebrate(count, author, state, goal_config));
            // Goal completion always starts a fresh statistics window.
            state.reset_stats();
            if goal_config.reset {
                next_count = goal_config.reset_value;
            }
        }
    }

    state.set_last(next_count, author);
    effects.push(Effect::PersistState {
        snapshot: state.snapshot(),
    });
    effects
}

/// Exactly one reportable outcome per rejected message.
fn reject(
    rejection: Rejection,
    text: String,
    message: &InboundMessage,
    config: &CountingConfig,
) -> Vec<Effect> {
    let report = &config.report;
    let mut fields = Vec::new();
    if report.show_author {
        fields.push(NoticeField {
            name: "Author".to_string(),
            value: format!("<@{}>", message.author),
            inline: true,
        });
    }
    if report.show_timestamp {
        if let Some(timestamp) = &message.timestamp {
            fields.push(NoticeField {
                name: "Timestamp".to_string(),
                value: timestamp.clone(),
                inline: true,
            });
        }
    }
    if report.log.is_some_and(|log| log.show_additional_fields) {
        fields.push(NoticeField {
            name: "Message".to_string(),
            value: message.body.clone(),
            inline: false,
        });
    }
    vec![Effect::Notify(Notice {
        kind: NoticeKind::Issue(rejection),
        text,
        reaction_symbol: report.add_reaction.then(|| rejection.symbol()),
        fields,
        deletion_delay_ms: report.deletion_timeout_ms,
    })]
}
