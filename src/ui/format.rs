//! Display formatting for sizes, dates and file names.

use chrono::{DateTime, FixedOffset, NaiveDate};

/// `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

fn parse_commit_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc3339(date))
        .ok()
}

/// Commit date relative to `today`: `Today`, `Yesterday`, `N days ago`
/// within a week, otherwise `Jan 5, 2025`. Unparsable input is returned
/// unchanged.
pub fn format_relative_date(date: &str, today: NaiveDate) -> String {
    let Some(parsed) = parse_commit_date(date) else {
        return date.to_string();
    };
    let day = parsed.date_naive();
    match (today - day).num_days() {
        days if days <= 0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days if days < 7 => format!("{days} days ago"),
        _ => day.format("%b %-d, %Y").to_string(),
    }
}

/// File name used when downloading a config.
pub fn download_file_name(display_name: &str) -> String {
    display_name.replace('/', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn test_relative_dates() {
        let today = day(2025, 1, 10);
        assert_eq!(format_relative_date("2025-01-10 08:00:00 +0000", today), "Today");
        assert_eq!(format_relative_date("2025-01-09 23:59:59 +0000", today), "Yesterday");
        assert_eq!(format_relative_date("2025-01-05 10:30:00 +0900", today), "5 days ago");
        assert_eq!(format_relative_date("2024-12-25T12:00:00+00:00", today), "Dec 25, 2024");
    }

    #[test]
    fn test_unparsable_date_is_kept() {
        assert_eq!(format_relative_date("last week", day(2025, 1, 1)), "last week");
    }

    #[test]
    fn test_download_name_flattens_paths() {
        assert_eq!(download_file_name(".config/nvim/init.lua"), ".config_nvim_init.lua");
        assert_eq!(download_file_name(".zshrc"), ".zshrc");
    }
}
