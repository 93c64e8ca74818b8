use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Severity of a user-facing status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A status notification delivered to the presentation side alongside the
/// actual result of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Sink for status notifications emitted while an operation runs.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: String);

    fn info(&self, message: String) {
        self.notify(Severity::Info, message);
    }

    fn success(&self, message: String) {
        self.notify(Severity::Success, message);
    }

    fn warning(&self, message: String) {
        self.notify(Severity::Warning, message);
    }

    fn error(&self, message: String) {
        self.notify(Severity::Error, message);
    }
}

/// Collects notices for one request and mirrors them to the log.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains the collected notices in emission order.
    pub fn take(&self) -> Vec<Notice> {
        match self.notices.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, severity: Severity, message: String) {
        match severity {
            Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
            _ => info!("{}", message),
        }

        if let Ok(mut guard) = self.notices.lock() {
            guard.push(Notice { severity, message });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_notices_in_emission_order() {
        let log = NoticeLog::new();
        log.info("first".to_string());
        log.warning("second".to_string());

        let notices = log.take();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].severity, Severity::Info);
        assert_eq!(notices[0].message, "first");
        assert_eq!(notices[1].severity, Severity::Warning);
    }

    #[test]
    fn take_leaves_the_log_empty() {
        let log = NoticeLog::new();
        log.success("done".to_string());

        assert_eq!(log.take().len(), 1);
        assert!(log.take().is_empty());
    }

    #[test]
    fn severity_serializes_lowercase() {
        let notice = Notice {
            severity: Severity::Warning,
            message: "careful".to_string(),
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["severity"], "warning");
    }
}
