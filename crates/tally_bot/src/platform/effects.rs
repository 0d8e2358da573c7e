use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bot_logging::bot_warn;
use tally_core::{ChannelId, Effect, Notice, NoticeKind, ReportConfig};
use tally_store::{save_progress, BlobStore};

use super::sink::{NoticeHandle, NotificationSink};

/// Executes engine intents against the sink and the store.
///
/// Every platform call is isolated: a failure is logged at warn level and
/// the remaining intents of the event still run.
pub(crate) struct EffectRunner {
    sink: Arc<dyn NotificationSink>,
    store: Arc<dyn BlobStore>,
    state_key: String,
    channel: ChannelId,
    report: ReportConfig,
}

impl EffectRunner {
    pub(crate) fn new(
        sink: Arc<dyn NotificationSink>,
        store: Arc<dyn BlobStore>,
        state_key: impl Into<String>,
        channel: ChannelId,
        report: ReportConfig,
    ) -> Self {
        Self {
            sink,
            store,
            state_key: state_key.into(),
            channel,
            report,
        }
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Notify(notice) => self.deliver(&notice),
                Effect::GrantRole { user, role, reason } => {
                    if let Err(err) = self.sink.grant_role(user, role, &reason) {
                        bot_warn!("Role grant for <@{}> failed: {}", user, err);
                    }
                }
                Effect::PersistState { snapshot } => {
                    save_progress(self.store.as_ref(), &self.state_key, &snapshot);
                }
            }
        }
    }

    fn deliver(&self, notice: &Notice) {
        match self.sink.send_notice(self.channel, notice) {
            Ok(handle) => {
                if matches!(notice.kind, NoticeKind::GoalAnnouncement) {
                    if let Err(err) = self.sink.pin_notice(self.channel, handle) {
                        bot_warn!("Pinning goal announcement failed: {}", err);
                    }
                }
                if let Some(delay_ms) = notice.deletion_delay_ms {
                    self.schedule_retraction(self.channel, handle, delay_ms);
                }
            }
            Err(err) => bot_warn!("Sending notice to the stream failed: {}", err),
        }

        if !matches!(notice.kind, NoticeKind::Issue(_)) {
            return;
        }
        if let Some(log) = self.report.log {
            // The log copy stays up: no reaction, no deferred deletion.
            let mut copy = notice.clone();
            copy.reaction_symbol = None;
            copy.deletion_delay_ms = None;
            if let Err(err) = self.sink.send_notice(log.channel, &copy) {
                bot_warn!("Mirroring notice to the log channel failed: {}", err);
            }
        }
    }

    fn schedule_retraction(&self, channel: ChannelId, handle: NoticeHandle, delay_ms: u64) {
        let sink = self.sink.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(delay_ms));
            if let Err(err) = sink.retract_notice(channel, handle) {
                bot_warn!("Retracting notice {} failed: {}", handle, err);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    use tally_core::{LogConfig, NoticeField, ProgressSnapshot, Rejection, RoleId, UserId};
    use tally_store::{load_progress, FileStore};
    use tempfile::TempDir;

    use super::super::sink::SinkError;
    use super::*;

    const STREAM: ChannelId = 500;

    #[derive(Default)]
    struct RecordingSink {
        notices: Mutex<Vec<(ChannelId, Notice)>>,
        pinned: Mutex<Vec<NoticeHandle>>,
        grants: Mutex<Vec<(UserId, RoleId)>>,
        fail_role_grants: bool,
        next_handle: AtomicU64,
    }

    impl NotificationSink for RecordingSink {
        fn send_notice(
            &self,
            channel: ChannelId,
            notice: &Notice,
        ) -> Result<NoticeHandle, SinkError> {
            self.notices.lock().unwrap().push((channel, notice.clone()));
            Ok(self.next_handle.fetch_add(1, Ordering::Relaxed))
        }

        fn retract_notice(
            &self,
            _channel: ChannelId,
            _handle: NoticeHandle,
        ) -> Result<(), SinkError> {
            Ok(())
        }

        fn pin_notice(&self, _channel: ChannelId, handle: NoticeHandle) -> Result<(), SinkError> {
            self.pinned.lock().unwrap().push(handle);
            Ok(())
        }

        fn grant_role(&self, user: UserId, role: RoleId, _reason: &str) -> Result<(), SinkError> {
            if self.fail_role_grants {
                return Err(SinkError::Platform("missing permission".into()));
            }
            self.grants.lock().unwrap().push((user, role));
            Ok(())
        }
    }

    fn issue_notice() -> Notice {
        Notice {
            kind: NoticeKind::Issue(Rejection::WrongValue),
            text: "Wrong number. The next count has to be 6.".to_string(),
            reaction_symbol: Some('❌'),
            fields: vec![NoticeField {
                name: "Author".to_string(),
                value: "<@2>".to_string(),
                inline: true,
            }],
            deletion_delay_ms: None,
        }
    }

    fn goal_notice() -> Notice {
        Notice {
            kind: NoticeKind::GoalAnnouncement,
            text: "🎉 <@2> reached the goal of 100!".to_string(),
            reaction_symbol: None,
            fields: Vec::new(),
            deletion_delay_ms: None,
        }
    }

    fn runner(
        sink: Arc<RecordingSink>,
        temp: &TempDir,
        report: ReportConfig,
    ) -> EffectRunner {
        EffectRunner::new(
            sink,
            Arc::new(FileStore::new(temp.path().to_path_buf())),
            "counting",
            STREAM,
            report,
        )
    }

    #[test]
    fn failing_role_grants_do_not_block_each_other_or_persistence() {
        let temp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink {
            fail_role_grants: true,
            ..RecordingSink::default()
        });
        let runner = runner(sink.clone(), &temp, ReportConfig::default());

        let snapshot = ProgressSnapshot {
            last_count: 9.0,
            last_counter: Some(2),
            tallies: Vec::new(),
        };
        runner.run(vec![
            Effect::GrantRole {
                user: 2,
                role: 11,
                reason: "reached the counting goal".to_string(),
            },
            Effect::GrantRole {
                user: 1,
                role: 12,
                reason: "assisted the counting goal".to_string(),
            },
            Effect::PersistState {
                snapshot: snapshot.clone(),
            },
        ]);

        let store = FileStore::new(temp.path().to_path_buf());
        assert_eq!(load_progress(&store, "counting"), snapshot);
        assert!(sink.grants.lock().unwrap().is_empty());
    }

    #[test]
    fn role_grants_reach_the_sink() {
        let temp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let runner = runner(sink.clone(), &temp, ReportConfig::default());

        runner.run(vec![Effect::GrantRole {
            user: 2,
            role: 11,
            reason: "reached the counting goal".to_string(),
        }]);

        assert_eq!(sink.grants.lock().unwrap().as_slice(), &[(2, 11)]);
    }

    #[test]
    fn issue_notices_are_mirrored_to_the_log_channel() {
        let temp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let report = ReportConfig {
            log: Some(LogConfig {
                channel: 600,
                show_additional_fields: false,
            }),
            ..ReportConfig::default()
        };
        let runner = runner(sink.clone(), &temp, report);

        runner.run(vec![Effect::Notify(issue_notice())]);

        let notices = sink.notices.lock().unwrap();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].0, STREAM);
        assert_eq!(notices[1].0, 600);
        assert_eq!(notices[1].1.reaction_symbol, None);
        assert_eq!(notices[1].1.deletion_delay_ms, None);
    }

    #[test]
    fn goal_announcements_are_pinned_not_mirrored() {
        let temp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let report = ReportConfig {
            log: Some(LogConfig {
                channel: 600,
                show_additional_fields: false,
            }),
            ..ReportConfig::default()
        };
        let runner = runner(sink.clone(), &temp, report);

        runner.run(vec![Effect::Notify(goal_notice())]);

        let notices = sink.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(sink.pinned.lock().unwrap().len(), 1);
    }
}
