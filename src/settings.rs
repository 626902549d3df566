//! Dashboard settings
//!
//! Settings are plain serde values with defaults. Hosts load them from JSON
//! and let command-line flags override individual fields.

use crate::calendar::Calendar;
use crate::error::ComputeError;
use serde::{Deserialize, Serialize};

/// Default rolling window shown on every chart, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 28;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Days of history shown by the charts
    pub window_days: u32,
    /// Fixed calendar used for day boundaries ("UTC" or "+HH:MM").
    ///
    /// Unset means "whatever the store uses". When set it must agree with
    /// the store's calendar.
    pub timezone: Option<String>,
    /// Target weight drawn as a rule on the weight chart
    pub weight_goal: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            timezone: None,
            weight_goal: None,
        }
    }
}

impl Settings {
    /// Configured calendar, if any
    pub fn calendar(&self) -> Result<Option<Calendar>, ComputeError> {
        self.timezone.as_deref().map(Calendar::parse).transpose()
    }

    /// Calendar to use against a store that places records with
    /// `store_calendar`.
    ///
    /// Day boundaries must match the ones the store wrote with, otherwise a
    /// value entered for one day is read back on another.
    pub fn calendar_for(&self, store_calendar: Calendar) -> Result<Calendar, ComputeError> {
        match self.calendar()? {
            Some(configured) if configured != store_calendar => {
                Err(ComputeError::CalendarMismatch {
                    configured: configured.to_string(),
                    store: store_calendar.to_string(),
                })
            }
            _ => Ok(store_calendar),
        }
    }

    /// Days fetched for the weight differential chart.
    ///
    /// One extra day so the window still yields `window_days` differences.
    pub fn differential_fetch_days(&self) -> u32 {
        self.window_days.saturating_add(1)
    }

    /// Load settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ComputeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.window_days, 28);
        assert_eq!(settings.differential_fetch_days(), 29);
        assert_eq!(settings.calendar().unwrap(), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"weight_goal": 155.0}"#).unwrap();
        assert_eq!(settings.weight_goal, Some(155.0));
        assert_eq!(settings.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(settings.timezone, None);
    }

    #[test]
    fn test_calendar_for_store() {
        let store_calendar = Calendar::parse("+10:00").unwrap();

        // Unset follows the store
        assert_eq!(
            Settings::default().calendar_for(store_calendar).unwrap(),
            store_calendar
        );

        let matching = Settings::from_json(r#"{"timezone": "+10:00"}"#).unwrap();
        assert_eq!(matching.calendar_for(store_calendar).unwrap(), store_calendar);

        let utc = Settings::from_json(r#"{"timezone": "UTC"}"#).unwrap();
        assert!(matches!(
            utc.calendar_for(store_calendar),
            Err(ComputeError::CalendarMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_timezone_surfaces_on_use() {
        let settings = Settings::from_json(r#"{"timezone": "Mars/Olympus"}"#).unwrap();
        assert!(matches!(
            settings.calendar(),
            Err(ComputeError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ComputeError::JsonError(_))
        ));
    }
}
