//! Placeholder expansion for directory templates.
//!
//! Supported tokens are `[date:<format>]` and its alias
//! `[current-date:<format>]`, where `<format>` is `custom:<php format>` or
//! one of the named formats `html_date`, `html_month`, `html_year`.
//! Unknown tokens are left in place.

use chrono::{DateTime, Datelike, Timelike, Utc};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\[([a-z0-9_-]+):([^\[\]]+)\]"));

/// Replaces `[type:name]` placeholders in a string.
pub trait TokenExpander: Send + Sync {
    fn replace(&self, text: &str) -> String;
}

/// Expands date tokens against the current time, or a fixed instant.
#[derive(Debug, Clone, Default)]
pub struct DateTokenExpander {
    fixed: Option<DateTime<Utc>>,
}

impl DateTokenExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expander that always renders `instant`.
    pub fn fixed(instant: DateTime<Utc>) -> Self {
        Self {
            fixed: Some(instant),
        }
    }

    fn expand(&self, token_type: &str, name: &str, now: &DateTime<Utc>) -> Option<String> {
        if token_type != "date" && token_type != "current-date" {
            return None;
        }
        let format = match name.split_once(':') {
            Some(("custom", format)) => format,
            None => match name {
                "html_date" => "Y-m-d",
                "html_month" => "Y-m",
                "html_year" => "Y",
                _ => return None,
            },
            Some(_) => return None,
        };
        Some(format_date(format, now))
    }
}

impl TokenExpander for DateTokenExpander {
    fn replace(&self, text: &str) -> String {
        let pattern = match TOKEN_PATTERN.as_ref() {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!(error = %e, "Token pattern unavailable, leaving text unexpanded");
                return text.to_string();
            }
        };

        let now = self.fixed.unwrap_or_else(Utc::now);
        pattern
            .replace_all(text, |caps: &Captures| {
                self.expand(&caps[1], &caps[2], &now)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Render `instant` with PHP `date()` letters. Letters outside the supported
/// set are copied as-is; `\` escapes the next character.
fn format_date(format: &str, instant: &DateTime<Utc>) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        match c {
            'Y' => out.push_str(&format!("{:04}", instant.year())),
            'y' => out.push_str(&format!("{:02}", instant.year().rem_euclid(100))),
            'm' => out.push_str(&format!("{:02}", instant.month())),
            'n' => out.push_str(&instant.month().to_string()),
            'd' => out.push_str(&format!("{:02}", instant.day())),
            'j' => out.push_str(&instant.day().to_string()),
            'H' => out.push_str(&format!("{:02}", instant.hour())),
            'G' => out.push_str(&instant.hour().to_string()),
            'i' => out.push_str(&format!("{:02}", instant.minute())),
            's' => out.push_str(&format!("{:02}", instant.second())),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            other => out.push(other),
        }
    }
    out
}
