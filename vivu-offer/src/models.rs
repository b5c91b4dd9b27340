use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Indochina Time, the calendar promotion windows are written in.
const VIETNAM_UTC_OFFSET_SECS: i32 = 7 * 3600;

/// Calendar date of `timestamp` as seen in Vietnam.
pub(crate) fn vietnam_date<Tz: TimeZone>(timestamp: DateTime<Tz>) -> NaiveDate {
    match FixedOffset::east_opt(VIETNAM_UTC_OFFSET_SECS) {
        Some(tz) => timestamp.with_timezone(&tz).date_naive(),
        None => timestamp.naive_utc().date(),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromotionKind {
    Percentage,
    FixedAmount,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    Active,
    Inactive,
}

/// A validated, time-bounded discount attached to a bookable service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promotion {
    pub id: Option<String>,
    pub kind: PromotionKind,
    /// Percent in `[0, 100]` for percentage promotions, đồng otherwise.
    pub discount_value: f64,
    pub status: PromotionStatus,
    pub start_date: NaiveDate,
    /// Last day the promotion is valid, inclusive.
    pub end_date: NaiveDate,
}

impl Promotion {
    pub fn new(
        kind: PromotionKind,
        discount_value: f64,
        status: PromotionStatus,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, PromotionParseError> {
        let promotion = Self {
            id: None,
            kind,
            discount_value,
            status,
            start_date,
            end_date,
        };
        promotion.validate()?;
        Ok(promotion)
    }

    /// Whether `as_of` falls on or between the start and end dates.
    pub fn is_within_window(&self, as_of: NaiveDate) -> bool {
        self.start_date <= as_of && as_of <= self.end_date
    }

    pub fn is_applicable(&self, as_of: NaiveDate) -> bool {
        self.status == PromotionStatus::Active && self.is_within_window(as_of)
    }

    fn validate(&self) -> Result<(), PromotionParseError> {
        let value = self.discount_value;
        let in_range = match self.kind {
            PromotionKind::Percentage => (0.0..=100.0).contains(&value),
            PromotionKind::FixedAmount => value >= 0.0,
        };
        if !value.is_finite() || !in_range {
            return Err(PromotionParseError::ValueOutOfRange { kind: self.kind, value });
        }
        if self.start_date > self.end_date {
            return Err(PromotionParseError::InvertedWindow {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// Promotion record as the booking backend returns it.
///
/// Every field is kept as untyped JSON so that a bad record can be reported
/// and skipped instead of failing the whole service payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawPromotion {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, alias = "kind", alias = "type")]
    pub discount_type: Option<Value>,
    #[serde(default)]
    pub discount_value: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub start_date: Option<Value>,
    #[serde(default)]
    pub end_date: Option<Value>,
}

impl TryFrom<&RawPromotion> for Promotion {
    type Error = PromotionParseError;

    fn try_from(raw: &RawPromotion) -> Result<Self, Self::Error> {
        let kind = parse_kind(raw.discount_type.as_ref())?;
        let discount_value = parse_value(raw.discount_value.as_ref())?;
        let status = parse_status(raw.status.as_ref())?;
        let start_date = parse_date("start_date", raw.start_date.as_ref())?;
        let end_date = parse_date("end_date", raw.end_date.as_ref())?;

        let mut promotion = Promotion::new(kind, discount_value, status, start_date, end_date)?;
        promotion.id = raw.id.as_ref().filter(|id| !id.is_null()).map(text);
        Ok(promotion)
    }
}

fn required<'a>(field: &'static str, value: Option<&'a Value>) -> Result<&'a Value, PromotionParseError> {
    match value {
        None | Some(Value::Null) => Err(PromotionParseError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn parse_kind(kind: Option<&Value>) -> Result<PromotionKind, PromotionParseError> {
    let kind = required("discount_type", kind)?;
    let name = kind.as_str().map(|s| s.trim().to_ascii_lowercase());
    match name.as_deref() {
        Some("percentage" | "percent") => Ok(PromotionKind::Percentage),
        Some("fixed" | "fixed_amount" | "fixedamount" | "amount") => Ok(PromotionKind::FixedAmount),
        _ => Err(PromotionParseError::UnknownKind(text(kind))),
    }
}

fn parse_value(value: Option<&Value>) -> Result<f64, PromotionParseError> {
    let value = required("discount_value", value)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| PromotionParseError::InvalidValue(text(value)))
}

fn parse_status(status: Option<&Value>) -> Result<PromotionStatus, PromotionParseError> {
    let status = required("status", status)?;
    let name = status.as_str().map(|s| s.trim().to_ascii_lowercase());
    match name.as_deref() {
        Some("active") => Ok(PromotionStatus::Active),
        Some("inactive" | "disabled" | "expired") => Ok(PromotionStatus::Inactive),
        _ => Err(PromotionParseError::UnknownStatus(text(status))),
    }
}

/// Accepts plain dates and the timestamp forms the backend emits. Timestamps
/// with an offset are read on the Vietnam calendar; only the date is kept.
fn parse_date(field: &'static str, value: Option<&Value>) -> Result<NaiveDate, PromotionParseError> {
    let raw = required(field, value)?;
    let invalid = || PromotionParseError::InvalidDate { field, value: text(raw) };
    let value = raw.as_str().ok_or_else(invalid)?.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(vietnam_date(timestamp));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(timestamp.date());
        }
    }
    Err(invalid())
}

/// Strings as-is, anything else as its JSON text.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PromotionParseError {
    #[error("Missing promotion field: {0}")]
    MissingField(&'static str),

    #[error("Unknown promotion kind: {0}")]
    UnknownKind(String),

    #[error("Unknown promotion status: {0}")]
    UnknownStatus(String),

    #[error("Invalid discount value: {0}")]
    InvalidValue(String),

    #[error("Discount value {value} out of range for {kind:?}")]
    ValueOutOfRange { kind: PromotionKind, value: f64 },

    #[error("Unparseable {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Promotion window starts {start} after it ends {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}
