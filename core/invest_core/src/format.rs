//! Display formatting helpers — en-US currency and long-form dates.
//!
//! Mirrors the frontend's `Intl.NumberFormat("en-US", { style: "currency" })`
//! and `toLocaleDateString` output so server-rendered strings (emails,
//! receipts) match what the UI shows.

use chrono::{Datelike, NaiveDate};

/// Format a dollar amount with two decimals: `1234.5` → `"$1,234.50"`.
pub fn usd(value: f64) -> String {
    format_usd(value, 2)
}

/// Format a dollar amount with no decimals: `1234.6` → `"$1,235"`. Used in
/// dense listings.
pub fn usd_whole(value: f64) -> String {
    format_usd(value, 0)
}

fn format_usd(value: f64, decimals: usize) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };

    let grouped = group_thousands(int_part);
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `"January 2, 2026"` — the en-US long date used for the expected return
/// date.
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {}, {}",
        MONTH_NAMES[date.month0() as usize],
        date.day(),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_groups_thousands() {
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(4.17), "$4.17");
        assert_eq!(usd(1234.5), "$1,234.50");
        assert_eq!(usd(1_000_000.0), "$1,000,000.00");
        assert_eq!(usd(999.999), "$1,000.00");
    }

    #[test]
    fn usd_whole_rounds() {
        assert_eq!(usd_whole(1234.6), "$1,235");
        assert_eq!(usd_whole(50_000.0), "$50,000");
        assert_eq!(usd_whole(999.4), "$999");
    }

    #[test]
    fn usd_negative() {
        assert_eq!(usd(-1500.0), "-$1,500.00");
    }

    #[test]
    fn long_date_en_us() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(long_date(d), "January 2, 2026");
        let d = NaiveDate::from_ymd_opt(2027, 12, 31).unwrap();
        assert_eq!(long_date(d), "December 31, 2027");
    }
}
