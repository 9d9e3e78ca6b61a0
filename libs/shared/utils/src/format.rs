use chrono::{NaiveDate, NaiveTime, Timelike};

/// `2025-01-01` → `Jan 1, 2025`.
pub fn format_naive_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// 24-hour time → `9:00 AM`.
pub fn format_naive_time(time: NaiveTime) -> String {
    format!(
        "{}:{:02} {}",
        to_twelve_hour(time.hour()),
        time.minute(),
        meridiem(time.hour())
    )
}

fn to_twelve_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn meridiem(hour: u32) -> &'static str {
    if hour >= 12 {
        "PM"
    } else {
        "AM"
    }
}

/// `Jo Doe` → `JD`; `U` when there is no name at all.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}
