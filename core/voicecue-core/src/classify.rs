//! Categorizes Notification message text.
//!
//! Rules run in a fixed order and the first match wins. Permission prompts
//! are checked before the error and warning keywords, so a message like
//! "Error: permission denied to use tool" is still a permission request.

use crate::types::NotificationCategory;

const IDLE_PHRASES: &[&str] = &["waiting for your input", "waiting for input"];
const ERROR_KEYWORDS: &[&str] = &["error", "failed", "exception", "critical"];
const WARNING_KEYWORDS: &[&str] = &["warning", "warn", "caution"];

pub fn classify_message(message: &str) -> NotificationCategory {
    if message.is_empty() {
        return NotificationCategory::General;
    }

    let lower = message.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if lower.contains("permission") && lower.contains("use") {
        NotificationCategory::PermissionRequest
    } else if contains_any(IDLE_PHRASES) {
        NotificationCategory::IdleTimeout
    } else if contains_any(ERROR_KEYWORDS) {
        NotificationCategory::Error
    } else if contains_any(WARNING_KEYWORDS) {
        NotificationCategory::Warning
    } else {
        NotificationCategory::General
    }
}
