//! Timer form validation
//!
//! A pure predicate over the add/edit form. The timer store never validates;
//! callers run this before building an add or edit request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 50;

/// Longest accepted duration, in seconds
pub const MAX_DURATION_SECS: u64 = 24 * 60 * 60;

/// Add/edit form as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hours: i64,
    #[serde(default)]
    pub minutes: i64,
    #[serde(default)]
    pub seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must be less than 50 characters")]
    TitleTooLong,
    #[error("Time values cannot be negative")]
    NegativeTime,
    #[error("Minutes and seconds must be between 0 and 59")]
    ComponentOutOfRange,
    #[error("Please set a time greater than 0")]
    ZeroDuration,
    #[error("Timer cannot exceed 24 hours")]
    TooLong,
}

/// Check `form` and return its total duration in seconds
pub fn validate_timer_form(form: &TimerForm) -> Result<u64, ValidationError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }

    if form.hours < 0 || form.minutes < 0 || form.seconds < 0 {
        return Err(ValidationError::NegativeTime);
    }
    if form.minutes > 59 || form.seconds > 59 {
        return Err(ValidationError::ComponentOutOfRange);
    }

    // Components are non-negative here; saturate so absurd hours still read as too long
    let total = (form.hours as u64)
        .saturating_mul(3600)
        .saturating_add(form.minutes as u64 * 60)
        .saturating_add(form.seconds as u64);

    if total == 0 {
        return Err(ValidationError::ZeroDuration);
    }
    if total > MAX_DURATION_SECS {
        return Err(ValidationError::TooLong);
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, hours: i64, minutes: i64, seconds: i64) -> TimerForm {
        TimerForm {
            title: title.to_string(),
            description: "Test Description".to_string(),
            hours,
            minutes,
            seconds,
        }
    }

    #[test]
    fn test_valid_form_returns_total_seconds() {
        assert_eq!(validate_timer_form(&form("Test Timer", 1, 30, 45)), Ok(5445));
    }

    #[test]
    fn test_title_rules() {
        assert_eq!(
            validate_timer_form(&form("   ", 1, 0, 0)),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            validate_timer_form(&form(&"A".repeat(51), 1, 0, 0)),
            Err(ValidationError::TitleTooLong)
        );
        assert!(validate_timer_form(&form(&"A".repeat(50), 1, 0, 0)).is_ok());
    }

    #[test]
    fn test_time_component_rules() {
        assert_eq!(
            validate_timer_form(&form("T", -1, 30, 45)),
            Err(ValidationError::NegativeTime)
        );
        assert_eq!(
            validate_timer_form(&form("T", 1, 60, 45)),
            Err(ValidationError::ComponentOutOfRange)
        );
        assert_eq!(
            validate_timer_form(&form("T", 1, 30, 60)),
            Err(ValidationError::ComponentOutOfRange)
        );
    }

    #[test]
    fn test_duration_bounds() {
        assert_eq!(
            validate_timer_form(&form("T", 0, 0, 0)),
            Err(ValidationError::ZeroDuration)
        );
        assert_eq!(
            validate_timer_form(&form("T", 25, 0, 0)),
            Err(ValidationError::TooLong)
        );
        assert_eq!(validate_timer_form(&form("T", 24, 0, 0)), Ok(86400));
        assert_eq!(
            validate_timer_form(&form("T", 24, 0, 1)),
            Err(ValidationError::TooLong)
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::TitleRequired.to_string(), "Title is required");
        assert_eq!(
            ValidationError::TooLong.to_string(),
            "Timer cannot exceed 24 hours"
        );
    }
}
