//! Relative time labels for feed rendering
//!
//! - under a minute: "Just now"
//! - under an hour: "12m ago"
//! - under a day: "5h ago"
//! - under a week: "3d ago"
//! - otherwise: "2w ago"

use chrono::{DateTime, Utc};

/// Label for `then` relative to `now`
///
/// # Example
/// ```
/// use chrono::{Duration, Utc};
/// use myfaith::timefmt::time_ago;
///
/// let now = Utc::now();
/// assert_eq!(time_ago(now - Duration::minutes(90), now), "1h ago");
/// ```
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{}d ago", days);
    }

    format!("{}w ago", days / 7)
}

/// Label for `then` relative to the current time
pub fn time_ago_now(then: DateTime<Utc>) -> String {
    time_ago(then, Utc::now())
}
