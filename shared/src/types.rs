//! Common types used across the platform

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};

/// Article identity (`codArticulo`)
pub type ArticleCode = i64;

/// Supplier identity (`codProveedor`)
pub type SupplierCode = i64;

/// Purchase order identity (`numOC`), assigned by the inventory backend
pub type OrderNumber = i64;

/// Sale identity (`codVenta`), assigned by the inventory backend
pub type SaleCode = i64;

/// Format an amount the way the dashboard shows money: `$1.234,50`
///
/// es-AR locale: `.` groups thousands, `,` separates two decimals.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("${}{},{}", sign, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Format a date as `dd/mm/yyyy` (es-AR)
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Deserialize a possibly-null field, falling back to the type's default.
///
/// The inventory backend omits or nulls numeric fields it has not computed
/// yet; those are read as zero.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a date that may arrive as `yyyy-mm-dd` or as a full
/// `yyyy-mm-ddThh:mm:ss` timestamp.
pub fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => parse_flexible_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", s))),
    }
}

fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_price_es_ar() {
        assert_eq!(format_price(dec!(7.5)), "$7,50");
        assert_eq!(format_price(dec!(1234.5)), "$1.234,50");
        assert_eq!(format_price(dec!(1234567.891)), "$1.234.567,89");
        assert_eq!(format_price(Decimal::ZERO), "$0,00");
        assert_eq!(format_price(dec!(-15)), "$-15,00");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "07/03/2024");
    }

    #[test]
    fn test_parse_flexible_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_flexible_date("2024-05-01"), expected);
        assert_eq!(parse_flexible_date("2024-05-01T10:15:30"), expected);
        assert_eq!(parse_flexible_date("2024-05-01T10:15:30.123"), expected);
        assert_eq!(parse_flexible_date("2024-05-01T10:15:30Z"), expected);
        assert_eq!(parse_flexible_date("01/05/2024"), None);
    }
}
