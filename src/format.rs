//! es-AR display formatting
//!
//! The dashboard renders numbers the Argentine way: `.` groups thousands
//! and `,` marks decimals. Non-finite values render as "0" rather than
//! leaking NaN into the UI.

use chrono::{Datelike, NaiveDate};

/// Spanish month abbreviations, index = month - 1
const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Formats a number with es-AR separators and a fixed decimal count
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = format!("{:.*}", decimals, value.abs());
    let (integer_part, fraction_part) = match rounded.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rounded.as_str(), None),
    };

    let mut grouped = String::new();
    let digits = integer_part.len();
    for (index, ch) in integer_part.chars().enumerate() {
        if index > 0 && (digits - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut result = String::new();
    if value < 0.0 && rounded.chars().any(|c| c != '0' && c != '.') {
        result.push('-');
    }
    result.push_str(&grouped);
    if let Some(frac) = fraction_part {
        result.push(',');
        result.push_str(frac);
    }
    result
}

/// Formats a percentage with one decimal, e.g. `75,0%`
pub fn format_percentage(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}

/// Formats a date as day + short Spanish month, e.g. `06 ago`
pub fn format_date_short(date: NaiveDate) -> String {
    let month = MONTHS_SHORT[(date.month0() % 12) as usize];
    format!("{:02} {}", date.day(), month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891, 0), "1.234.568");
        assert_eq!(format_number(2824.0, 0), "2.824");
        assert_eq!(format_number(512.0, 0), "512");
    }

    #[test]
    fn test_format_number_decimal_comma() {
        assert_eq!(format_number(19.64, 1), "19,6");
        assert_eq!(format_number(1234.5, 2), "1.234,50");
    }

    #[test]
    fn test_format_number_zero_and_small() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.04, 1), "0,0");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-22.0, 0), "-22");
        assert_eq!(format_number(-1234.5, 1), "-1.234,5");
    }

    #[test]
    fn test_format_number_non_finite_is_zero() {
        assert_eq!(format_number(f64::NAN, 1), "0");
        assert_eq!(format_number(f64::INFINITY, 0), "0");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(75.0), "75,0%");
        assert_eq!(format_percentage(88.04), "88,0%");
        assert_eq!(format_percentage(0.0), "0,0%");
    }

    #[test]
    fn test_format_date_short() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(format_date_short(date), "06 ago");
        let date = NaiveDate::from_ymd_opt(2026, 1, 22).unwrap();
        assert_eq!(format_date_short(date), "22 ene");
    }
}
