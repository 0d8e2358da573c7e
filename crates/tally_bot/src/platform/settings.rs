//! Settings file loading: raw serde shapes resolved once into the typed
//! engine configuration. Anything invalid is fatal here, before the first
//! event is processed.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tally_core::{CountingConfig, Direction, GoalConfig, LogConfig, ReportConfig};

#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    channel: u64,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    multiple_by_same_user: bool,
    #[serde(default)]
    blacklist: Vec<u64>,
    #[serde(default)]
    goal: Option<RawGoal>,
    #[serde(default)]
    report: RawReport,
}

#[derive(Debug, Clone, Deserialize)]
struct RawGoal {
    multiple: f64,
    #[serde(default)]
    reset: bool,
    #[serde(default)]
    reset_value: f64,
    #[serde(default)]
    track_statistics: bool,
    #[serde(default)]
    achiever_role: Option<u64>,
    #[serde(default)]
    assistant_role: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawReport {
    add_reaction: bool,
    deletion_timeout_ms: Option<u64>,
    show_author: bool,
    show_timestamp: bool,
    log: Option<RawLog>,
}

impl Default for RawReport {
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

#[derive(Debug, Clone, Deserialize)]
struct RawLog {
    channel: u64,
    #[serde(default)]
    show_additional_fields: bool,
}

/// Reads and resolves the settings file.
pub(crate) fn load_settings(path: &Path) -> Result<CountingConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let raw: RawSettings = serde_json::from_str(&content)
        .with_context(|| format!("parsing settings file {}", path.display()))?;
    resolve(raw)
}

fn resolve(raw: RawSettings) -> Result<CountingConfig> {
    let mut config = CountingConfig::new(raw.channel);

    if let Some(direction) = raw.direction.as_deref() {
        config.direction = match direction {
            "positive" => Direction::Positive,
            "negative" => Direction::Negative,
            "any" => Direction::AnyOffset,
            other => bail!("unknown counting direction {other:?}"),
        };
    }
    if let Some(amount) = raw.amount {
        if !amount.is_finite() || amount <= 0.0 {
            bail!("counting amount must be positive and finite, got {amount}");
        }
        config.amount = amount;
    }
    config.multiple_by_same_user = raw.multiple_by_same_user;
    config.blacklist = raw.blacklist.into_iter().collect::<BTreeSet<_>>();

    if let Some(goal) = raw.goal {
        if !goal.multiple.is_finite() || goal.multiple <= 0.0 {
            bail!(
                "goal multiple must be positive and finite, got {}",
                goal.multiple
            );
        }
        config.goal = Some(GoalConfig {
            multiple: goal.multiple,
            reset: goal.reset,
            reset_value: goal.reset_value,
            track_statistics: goal.track_statistics,
            achiever_role: goal.achiever_role,
            assistant_role: goal.assistant_role,
        });
    }

    config.report = ReportConfig {
        add_reaction: raw.report.add_reaction,
        deletion_timeout_ms: raw.report.deletion_timeout_ms,
        show_author: raw.report.show_author,
        show_timestamp: raw.report.show_timestamp,
        log: raw.report.log.map(|log| LogConfig {
            channel: log.channel,
            show_additional_fields: log.show_additional_fields,
        }),
    };

    Ok(config)
}
