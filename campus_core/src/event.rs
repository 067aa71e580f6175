use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One campus event. There's no identifier: an event is known by its position
/// in the rendered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// What's happening?
    pub title: String,

    /// When is it happening? Stored without a time zone, the same way a
    /// `datetime-local` input hands it over.
    #[serde(serialize_with = "serialize_date", deserialize_with = "deserialize_date")]
    pub date: NaiveDateTime,

    /// Where is it happening?
    pub location: String,

    /// Who's running it?
    pub organizer: String,
}

/// Formats accepted when reading a date, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// The same formats with a UTC offset on the end (`+05:00`, `+0500`, `+05`).
const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

/// Parse a date the way a user (or an older copy of the store) might have
/// written it. Surrounding whitespace is ignored and a bare date means
/// midnight.
///
/// Events have no time zone, so a trailing `Z` or UTC offset is discarded
/// rather than converted: `10:00Z` and `10:00+05:00` both read as 10:00.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let local = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
        .or_else(|| {
            OFFSET_DATE_TIME_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(raw, format).ok())
                .map(|stamp| stamp.naive_local())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|stamp| stamp.naive_local())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(local, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Write a date in `datetime-local` form, only including seconds when they
/// matter.
pub fn format_date(date: &NaiveDateTime) -> String {
    if date.second() == 0 && date.nanosecond() == 0 {
        date.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        date.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// serde helper for `Event::date`
fn serialize_date<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(date))
}

/// serde helper for `Event::date`
fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;

    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("unrecognized date `{raw}`")))
}
