use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fq_core::QuestId;

use crate::ports::{Notifier, PortError, PortResult};

/// One recorded notifier call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    RequestPermission,
    ShowOngoing { session_id: QuestId, title: String, text: String },
    ClearOngoing,
    ScheduleEnd { session_id: QuestId },
    CancelScheduledEnd,
    ShowCompleted { title: String, text: String },
}

/// Notifier that logs each call and keeps a record of it.
///
/// With [`LogNotifier::set_failing`] every call is recorded and then fails,
/// which is how tests check that notifications stay best-effort.
#[derive(Debug, Default)]
pub struct LogNotifier {
    calls: Mutex<Vec<NotifierCall>>,
    failing: AtomicBool,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Text of the most recent ongoing notification.
    pub fn last_ongoing_text(&self) -> Option<String> {
        self.calls().into_iter().rev().find_map(|call| match call {
            NotifierCall::ShowOngoing { text, .. } => Some(text),
            _ => None,
        })
    }

    fn record(&self, call: NotifierCall) -> PortResult<()> {
        log::info!("notify: {call:?}");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::Unavailable("notifications disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn request_permission_if_needed(&self) -> PortResult<()> {
        self.record(NotifierCall::RequestPermission)
    }

    async fn show_ongoing(
        &self,
        session_id: QuestId,
        title: &str,
        text: &str,
        _end_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.record(NotifierCall::ShowOngoing {
            session_id,
            title: title.to_string(),
            text: text.to_string(),
        })
    }

    async fn clear_ongoing(&self) -> PortResult<()> {
        self.record(NotifierCall::ClearOngoing)
    }

    async fn schedule_end(&self, session_id: QuestId, _end_at: DateTime<Utc>) -> PortResult<()> {
        self.record(NotifierCall::ScheduleEnd { session_id })
    }

    async fn cancel_scheduled_end(&self) -> PortResult<()> {
        self.record(NotifierCall::CancelScheduledEnd)
    }

    async fn show_completed(&self, title: &str, text: &str) -> PortResult<()> {
        self.record(NotifierCall::ShowCompleted {
            title: title.to_string(),
            text: text.to_string(),
        })
    }
}
