pub mod dashboard;
pub mod dossier;
pub mod enums;
pub mod medecin;
pub mod notification;
pub mod patient;
pub mod user;
pub mod visite;
pub mod workflow;

pub use dashboard::*;
pub use dossier::*;
pub use enums::*;
pub use medecin::*;
pub use notification::*;
pub use patient::*;
pub use user::*;
pub use visite::*;
pub use workflow::*;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Valid CKD stages.
pub const STADE_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

// ═══════════════════════════════════════════════════════════
// Dates — backend sends ISO dates, UI shows dd/MM/yyyy
// ═══════════════════════════════════════════════════════════

/// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS[.frac][Z|offset]` or
/// `YYYY-MM-DD HH:MM:SS`, keeping only the calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(date);
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// `dd/MM/yyyy`, or the raw input when it cannot be parsed.
pub fn format_date_fr(raw: &str) -> String {
    parse_date(raw)
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Date part of an ISO value, as an HTML date input expects it.
pub fn date_input_value(raw: &str) -> String {
    raw.split('T').next().unwrap_or_default().to_string()
}

/// Full years elapsed between `birth` and `today`.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    if today < birth {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

// ═══════════════════════════════════════════════════════════
// Lenient field parsing — the backend is loose about types
// ═══════════════════════════════════════════════════════════

pub(crate) mod lenient {
    use std::str::FromStr;

    use serde::de::{DeserializeOwned, Error as _};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Integer id sent as a number or a numeric string.
    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| D::Error::custom(format!("invalid id {n}"))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid id {s:?}"))),
            other => Err(D::Error::custom(format!("invalid id {other}"))),
        }
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Small integer sent as a number, a numeric string, `""` or `null`.
    pub fn opt_u8<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64().and_then(|v| u8::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// String that may be `null` or a number.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    /// Optional string where `""` means absent.
    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    }

    /// Enum sent as its wire string; unknown values and `null` become `None`.
    pub fn opt_enum<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Same as `opt_enum`, falling back to `T::default()`.
    pub fn enum_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + Default,
    {
        Ok(opt_enum(d)?.unwrap_or_default())
    }

    /// Any shape that does not parse as `T` (e.g. `[]` for an object) becomes the default.
    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(d)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// A list that may come back as `null`.
    pub fn vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }
}
