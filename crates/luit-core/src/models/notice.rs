use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a notice stays visible before it dismisses itself.
pub const NOTICE_TTL_SECS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Transient inline message shown next to an upload form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub issued_at: DateTime<Utc>,
    pub ttl_secs: i64,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            issued_at: Utc::now(),
            ttl_secs: NOTICE_TTL_SECS,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(self.ttl_secs)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_ttl() {
        let notice = Notice::warning("File too large. Maximum size is 10MB.");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(!notice.is_expired(notice.issued_at));
        assert!(!notice.is_expired(notice.issued_at + Duration::milliseconds(2999)));
        assert!(notice.is_expired(notice.issued_at + Duration::seconds(3)));
    }

    #[test]
    fn test_notice_serializes_level_lowercase() {
        let notice = Notice::error("boom");
        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "boom");
    }
}
