use serde::{Deserialize, Serialize};

// ── Economic event ──

/// One row of the economic calendar.
///
/// `id` is the provider's internal identifier. It is only deserialized;
/// it is never serialized, exported or logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicEvent {
    #[serde(default, skip_serializing, deserialize_with = "de_opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub zone: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub importance: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub event: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub actual: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub forecast: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub previous: Option<String>,
}

/// Exported columns, in order. The internal `id` is deliberately absent.
pub const EXPORT_COLUMNS: [&str; 9] = [
    "date",
    "time",
    "zone",
    "currency",
    "importance",
    "event",
    "actual",
    "forecast",
    "previous",
];

impl EconomicEvent {
    /// Cell values in EXPORT_COLUMNS order; missing values are empty.
    pub fn export_row(&self) -> [&str; 9] {
        [
            self.date.as_deref().unwrap_or(""),
            self.time.as_deref().unwrap_or(""),
            self.zone.as_deref().unwrap_or(""),
            self.currency.as_deref().unwrap_or(""),
            self.importance.as_deref().unwrap_or(""),
            self.event.as_deref().unwrap_or(""),
            self.actual.as_deref().unwrap_or(""),
            self.forecast.as_deref().unwrap_or(""),
            self.previous.as_deref().unwrap_or(""),
        ]
    }
}

// Provider values arrive as strings, numbers or null ("1.2%", 0.3, null).
fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

// ── Provider query / response ──

/// Query exactly as sent to the provider: lower-cased names,
/// `dd/mm/YYYY` dates, range already widened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderQuery {
    pub countries: Vec<String>,
    pub importances: Vec<String>,
    pub from_date: String,
    pub to_date: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarResponse {
    #[allow(dead_code)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<EconomicEvent>,
}
