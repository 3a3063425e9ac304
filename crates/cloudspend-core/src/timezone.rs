//! Timezone handling for "today"
//!
//! Billing ranges are expressed in calendar dates, so the date that counts as
//! "today" depends on the operator's timezone. This module detects the local
//! timezone and parses timezone overrides from user input.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Configuration for timezone handling
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    /// The timezone used to determine the current date
    pub tz: Tz,
    /// Whether the timezone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        let tz = get_local_timezone();
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }
}

impl TimezoneConfig {
    /// Create a UTC configuration
    pub fn utc() -> Self {
        Self {
            tz: Tz::UTC,
            is_utc: true,
        }
    }

    /// Create a new timezone configuration from CLI arguments
    pub fn from_cli(timezone_str: Option<&str>, use_utc: bool) -> crate::error::Result<Self> {
        if use_utc {
            return Ok(Self::utc());
        }

        match timezone_str {
            Some(tz_str) => {
                let tz = Tz::from_str(tz_str).map_err(|_| {
                    crate::error::CloudspendError::InvalidTimezone(format!(
                        "'{tz_str}'. Use format like 'America/New_York', 'Asia/Tokyo', or 'UTC'"
                    ))
                })?;
                Ok(Self {
                    tz,
                    is_utc: tz == Tz::UTC,
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Get the display name for the configured timezone
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }

    /// Calendar date of `instant` in the configured timezone
    pub fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Current calendar date in the configured timezone
    pub fn today(&self) -> NaiveDate {
        self.date_of(Utc::now())
    }
}

/// Detect the system's local timezone
///
/// The `TZ` environment variable wins when it names a valid timezone;
/// otherwise the system setting is used, falling back to UTC.
pub fn get_local_timezone() -> Tz {
    #[allow(clippy::collapsible_if)]
    if let Ok(tz_str) = std::env::var("TZ") {
        if let Ok(tz) = Tz::from_str(&tz_str) {
            debug!("Using timezone from TZ environment variable: {}", tz_str);
            return tz;
        }
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => match Tz::from_str(&tz_str) {
            Ok(tz) => {
                debug!("Using system timezone from iana-time-zone: {}", tz_str);
                tz
            }
            Err(_) => {
                debug!(
                    "Could not parse timezone from iana-time-zone: '{}', falling back to UTC",
                    tz_str
                );
                Tz::UTC
            }
        },
        Err(e) => {
            debug!(
                "Could not detect local timezone via iana-time-zone: {:?}, falling back to UTC",
                e
            );
            Tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_MUTEX, EnvVarGuard};
    use chrono::TimeZone;

    #[test]
    fn test_timezone_config_utc() {
        let config = TimezoneConfig::from_cli(None, true).unwrap();
        assert!(config.is_utc);
        assert_eq!(config.tz, Tz::UTC);
        assert_eq!(config.display_name(), "UTC");
    }

    #[test]
    fn test_timezone_config_explicit() {
        let config = TimezoneConfig::from_cli(Some("America/New_York"), false).unwrap();
        assert!(!config.is_utc);
        assert_eq!(config.display_name(), "America/New_York");
    }

    #[test]
    fn test_timezone_config_invalid() {
        let result = TimezoneConfig::from_cli(Some("Invalid/Timezone"), false);
        assert!(matches!(
            result,
            Err(crate::error::CloudspendError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_utc_flag_overrides_timezone() {
        let config = TimezoneConfig::from_cli(Some("Asia/Tokyo"), true).unwrap();
        assert!(config.is_utc);
    }

    #[test]
    fn test_date_of_depends_on_timezone() {
        // 2025-03-01 02:00 UTC is still February 28th in New York
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 2, 0, 0).unwrap();

        let utc = TimezoneConfig::utc();
        assert_eq!(
            utc.date_of(instant),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );

        let new_york = TimezoneConfig::from_cli(Some("America/New_York"), false).unwrap();
        assert_eq!(
            new_york.date_of(instant),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[tokio::test]
    async fn test_tz_env_var_is_honoured() {
        let _lock = ENV_MUTEX.lock().await;
        let mut guard = EnvVarGuard::new();
        guard.set("TZ", "Asia/Tokyo");

        assert_eq!(get_local_timezone(), Tz::Asia__Tokyo);
        let config = TimezoneConfig::from_cli(None, false).unwrap();
        assert_eq!(config.display_name(), "Asia/Tokyo");
    }
}
