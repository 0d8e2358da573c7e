use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Result;
use bot_logging::bot_info;
use chrono::Utc;
use tally_core::{update, ChannelId, CountingConfig, CountingState, InboundMessage, Msg, UserId};
use tally_store::{load_progress, FileStore};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::settings;
use super::sink::{ConsoleSink, NotificationSink};

/// Cache identifier for the single counting stream this process governs.
const STATE_KEY: &str = "counting";
const CACHE_DIR: &str = ".tally_cache";

pub fn run_app() -> Result<()> {
    logging::initialize(LogDestination::Both);

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tally.json".to_string());
    let config = settings::load_settings(Path::new(&settings_path))?;
    bot_info!("Watching counting stream #{}", config.channel);

    let cache_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CACHE_DIR);
    let store = Arc::new(FileStore::new(cache_dir));
    let sink: Arc<dyn NotificationSink> = Arc::new(ConsoleSink::new());

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_console_reader(msg_tx, config.channel);

    run_loop(config, store, sink, msg_rx);
    Ok(())
}

/// Drains inbound events strictly one at a time, in arrival order.
///
/// Each event's effects (persistence included) run to completion before the
/// next event is observed, so on-disk state never lags by more than the
/// event currently being processed.
fn run_loop(
    config: CountingConfig,
    store: Arc<FileStore>,
    sink: Arc<dyn NotificationSink>,
    msg_rx: mpsc::Receiver<Msg>,
) {
    let runner = EffectRunner::new(
        sink,
        store.clone(),
        STATE_KEY,
        config.channel,
        config.report.clone(),
    );

    let snapshot = load_progress(store.as_ref(), STATE_KEY);
    let (mut state, _) = update(CountingState::new(), Msg::RestoreProgress(snapshot), &config);

    let mut seq = 0u64;
    while let Ok(msg) = msg_rx.recv() {
        seq += 1;
        bot_logging::set_event_seq(seq);
        let (next, effects) = update(std::mem::take(&mut state), msg, &config);
        state = next;
        runner.run(effects);
    }
}

/// Local frontend standing in for a chat gateway: each stdin line
/// `"<participant-id> [bot] <text>"` becomes one inbound message on the
/// configured stream.
fn spawn_console_reader(msg_tx: mpsc::Sender<Msg>, channel: ChannelId) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(message) = parse_console_line(&line, channel) else {
                continue;
            };
            if msg_tx.send(Msg::MessagePosted(message)).is_err() {
                break;
            }
        }
    });
}

fn parse_console_line(line: &str, channel: ChannelId) -> Option<InboundMessage> {
    let line = line.trim();
    let (author_token, rest) = line.split_once(' ')?;
    let author: UserId = author_token.parse().ok()?;
    let (author_is_automated, body) = match rest.strip_prefix("[bot] ") {
        Some(body) => (true, body),
        None => (false, rest),
    };
    Some(InboundMessage {
        author,
        author_is_automated,
        channel,
        body: body.to_string(),
        timestamp: Some(Utc::now().to_rfc3339()),
    })
}

#[cfg(test)]
mod tests {
    use tally_store::load_progress;
    use tempfile::TempDir;

    use super::*;

    const STREAM: ChannelId = 500;

    fn post(author: UserId, body: &str) -> Msg {
        Msg::MessagePosted(InboundMessage {
            author,
            author_is_automated: false,
            channel: STREAM,
            body: body.to_string(),
            timestamp: None,
        })
    }

    #[test]
    fn console_lines_become_inbound_messages() {
        let message = parse_console_line("7 12 onwards", STREAM).unwrap();

        assert_eq!(message.author, 7);
        assert_eq!(message.body, "12 onwards");
        assert!(!message.author_is_automated);
        assert_eq!(message.channel, STREAM);
        assert!(message.timestamp.is_some());
    }

    #[test]
    fn bot_marker_sets_the_automation_flag() {
        let message = parse_console_line("7 [bot] 12", STREAM).unwrap();

        assert!(message.author_is_automated);
        assert_eq!(message.body, "12");
    }

    #[test]
    fn malformed_console_lines_are_dropped() {
        assert!(parse_console_line("", STREAM).is_none());
        assert!(parse_console_line("7", STREAM).is_none());
        assert!(parse_console_line("alice 12", STREAM).is_none());
    }

    #[test]
    fn loop_processes_events_in_order_and_persists() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(temp.path().to_path_buf()));
        let config = CountingConfig::new(STREAM);

        let (tx, rx) = mpsc::channel();
        // The third message repeats a turn and must be rejected.
        for (author, body) in [(1, "1"), (2, "2"), (2, "3"), (1, "3")] {
            tx.send(post(author, body)).unwrap();
        }
        drop(tx);

        run_loop(config, store.clone(), Arc::new(ConsoleSink::new()), rx);

        let progress = load_progress(store.as_ref(), STATE_KEY);
        assert_eq!(progress.last_count, 3.0);
        assert_eq!(progress.last_counter, Some(1));
    }

    #[test]
    fn loop_restores_persisted_progress_on_start() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(temp.path().to_path_buf()));
        let config = CountingConfig::new(STREAM);

        tally_store::save_progress(
            store.as_ref(),
            STATE_KEY,
            &tally_core::ProgressSnapshot {
                last_count: 42.0,
                last_counter: Some(1),
                tallies: Vec::new(),
            },
        );

        let (tx, rx) = mpsc::channel();
        tx.send(post(2, "43")).unwrap();
        drop(tx);

        run_loop(config, store.clone(), Arc::new(ConsoleSink::new()), rx);

        let progress = load_progress(store.as_ref(), STATE_KEY);
        assert_eq!(progress.last_count, 43.0);
        assert_eq!(progress.last_counter, Some(2));
    }
}
