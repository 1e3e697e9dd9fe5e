use chrono::{DateTime, Local, TimeZone, Utc};

/// `yyyy-MM-dd HH:mm` in the local timezone, or empty when there is no date.
pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    format_date_in(date, &Local)
}

pub fn format_date_in<Tz: TimeZone>(date: Option<&DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.map(|d| d.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Shorten `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", keep)
}
