use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default margin, in seconds, before expiry at which a token is treated as expired
pub const DEFAULT_EXPIRY_SKEW_SECS: i64 = 30;

/// Short-lived credential returned by `/auth/token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Value sent in the `x-token` header
    pub token: String,

    /// Human-readable expiry as reported by the API
    #[serde(default)]
    pub expires: String,

    /// Expiry as unix seconds
    #[serde(rename = "epochExpires")]
    pub epoch_expires: i64,

    /// Timezone of `expires`
    #[serde(default, rename = "tz")]
    pub timezone: String,
}

impl AuthToken {
    /// Returns true if the token expires within `skew_secs` of now
    #[must_use]
    pub fn is_expired(&self, skew_secs: i64) -> bool {
        self.is_expired_at(Utc::now().timestamp(), skew_secs)
    }

    /// Returns true if the token is expired at `now` (unix seconds)
    #[must_use]
    pub const fn is_expired_at(&self, now: i64, skew_secs: i64) -> bool {
        now > self.epoch_expires.saturating_sub(skew_secs)
    }

    /// Expiry as a UTC timestamp, if representable
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.epoch_expires, 0)
    }

    /// Token value shortened for log output
    #[must_use]
    pub fn masked(&self) -> String {
        let prefix: String = self.token.chars().take(4).collect();
        format!("{prefix}****")
    }
}
