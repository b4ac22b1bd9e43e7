//! Shared helpers for command implementations

use chrono::{DateTime, Utc};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;
use tabled::Tabled;

use crate::error::Result as CliResult;

/// Row structure for vertical table display (used by get commands)
#[derive(Tabled)]
pub struct DetailRow {
    #[tabled(rename = "FIELD")]
    pub field: String,
    #[tabled(rename = "VALUE")]
    pub value: String,
}

impl DetailRow {
    pub fn new(field: &str, value: impl ToString) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Prompts the user for confirmation
pub fn confirm_action(message: &str) -> CliResult<bool> {
    print!("Are you sure you want to {}? [y/N]: ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

/// Format a timestamp relative to `now` for recent times, as a date otherwise
pub fn format_date(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return "-".to_string();
    };

    let duration = now.signed_duration_since(date);
    if duration.num_days() == 0 && duration.num_seconds() >= 0 {
        if duration.num_hours() == 0 {
            return format!("{} min ago", duration.num_minutes());
        }
        return format!("{} hours ago", duration.num_hours());
    } else if (1..7).contains(&duration.num_days()) {
        return format!("{} days ago", duration.num_days());
    }

    date.format("%Y-%m-%d").to_string()
}

/// Color a cluster state name
pub fn format_state(state: &str) -> String {
    match state {
        "IDLE" => state.green().to_string(),
        "CREATING" | "UPDATING" | "REPAIRING" => state.yellow().to_string(),
        "DELETING" | "DELETED" => state.red().to_string(),
        _ => state.to_string(),
    }
}

/// Spinner shown on stderr while a long request runs
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print a warning line to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}{} {}", "warning".yellow().bold(), ":".bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_date_missing() {
        assert_eq!(format_date(None, now()), "-");
    }

    #[test]
    fn test_format_date_recent() {
        let ping = Utc.with_ymd_and_hms(2024, 5, 10, 11, 45, 0).unwrap();
        assert_eq!(format_date(Some(ping), now()), "15 min ago");

        let ping = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        assert_eq!(format_date(Some(ping), now()), "3 hours ago");

        let ping = Utc.with_ymd_and_hms(2024, 5, 8, 12, 0, 0).unwrap();
        assert_eq!(format_date(Some(ping), now()), "2 days ago");
    }

    #[test]
    fn test_format_date_old() {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(Some(created), now()), "2024-01-15");
    }

    #[test]
    fn test_format_state_plain_for_unknown() {
        assert_eq!(format_state("PAUSED"), "PAUSED");
    }
}
