pub mod client;
pub mod types;

use crate::errors::{DeskError, DeskResult};
use chrono::{Days, NaiveDate};
use types::{EconomicEvent, ProviderQuery};

/// Importance levels the provider understands (already normalized).
pub const IMPORTANCE_LEVELS: [&str; 3] = ["low", "medium", "high"];

/// Countries offered by the dashboard filter.
pub const COUNTRY_CHOICES: [&str; 3] = ["euro zone", "united states", "morocco"];

/// Provider date format (day first).
pub const PROVIDER_DATE_FORMAT: &str = "%d/%m/%Y";

/// The economic-calendar provider, as seen by the rest of the service.
/// Implementations must not retry; failures go straight back to the caller.
#[async_trait::async_trait]
pub trait CalendarSource: Send + Sync {
    async fn economic_calendar(&self, query: &ProviderQuery) -> DeskResult<Vec<EconomicEvent>>;
}

/// User-facing calendar filters, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRequest {
    pub countries: Vec<String>,
    pub importances: Vec<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub timezone: Option<String>,
}

impl CalendarRequest {
    /// Validate and normalize into the query the provider receives.
    ///
    /// - to < from is rejected
    /// - from == to is widened to [from, from + 1 day]
    /// - names are trimmed, lower-cased and de-duplicated (first occurrence wins)
    pub fn to_provider_query(&self, default_timezone: &str) -> DeskResult<ProviderQuery> {
        if self.to_date < self.from_date {
            return Err(DeskError::Validation(
                "'To Date' should be greater than 'From Date'. Please adjust the date range."
                    .into(),
            ));
        }

        let countries = normalize_names(&self.countries);
        if countries.is_empty() {
            return Err(DeskError::Validation(
                "Please select at least one country.".into(),
            ));
        }

        let importances = normalize_names(&self.importances);
        if let Some(bad) = importances
            .iter()
            .find(|i| !IMPORTANCE_LEVELS.contains(&i.as_str()))
        {
            return Err(DeskError::Validation(format!(
                "unknown importance level '{bad}', expected one of low, medium, high"
            )));
        }

        let to_date = if self.to_date == self.from_date {
            self.from_date
                .checked_add_days(Days::new(1))
                .ok_or_else(|| DeskError::Validation("date out of range".into()))?
        } else {
            self.to_date
        };

        let time_zone = self
            .timezone
            .as_deref()
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .unwrap_or(default_timezone)
            .to_string();

        Ok(ProviderQuery {
            countries,
            importances,
            from_date: self.from_date.format(PROVIDER_DATE_FORMAT).to_string(),
            to_date: to_date.format(PROVIDER_DATE_FORMAT).to_string(),
            time_zone,
        })
    }
}

fn normalize_names(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let n = name.trim().to_lowercase();
        if !n.is_empty() && !out.contains(&n) {
            out.push(n);
        }
    }
    out
}

/// Validate, normalize and fetch. No provider call happens on a validation error.
pub async fn fetch_calendar(
    source: &dyn CalendarSource,
    request: &CalendarRequest,
    default_timezone: &str,
) -> DeskResult<Vec<EconomicEvent>> {
    let query = request.to_provider_query(default_timezone)?;

    match source.economic_calendar(&query).await {
        Ok(events) => {
            tracing::info!(
                countries = ?query.countries,
                importances = ?query.importances,
                from = %query.from_date,
                to = %query.to_date,
                rows = events.len(),
                "calendar fetched"
            );
            Ok(events)
        }
        Err(e) => {
            tracing::warn!(error = %e, from = %query.from_date, to = %query.to_date, "calendar fetch failed");
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the last query and replays a canned answer.
    pub struct StubSource {
        pub last_query: Mutex<Option<ProviderQuery>>,
        pub calls: Mutex<u32>,
        pub fail_with_status: Option<u16>,
        pub events: Vec<EconomicEvent>,
    }

    impl StubSource {
        pub fn with_events(events: Vec<EconomicEvent>) -> Self {
            Self {
                last_query: Mutex::new(None),
                calls: Mutex::new(0),
                fail_with_status: None,
                events,
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                fail_with_status: Some(status),
                ..Self::with_events(Vec::new())
            }
        }

        pub fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl CalendarSource for StubSource {
        async fn economic_calendar(&self, query: &ProviderQuery) -> DeskResult<Vec<EconomicEvent>> {
            *self.calls.lock().unwrap() += 1;
            *self.last_query.lock().unwrap() = Some(query.clone());
            match self.fail_with_status {
                Some(status) => Err(DeskError::Provider { status, body: "unavailable".into() }),
                None => Ok(self.events.clone()),
            }
        }
    }

    pub fn sample_event(id: &str, event: &str) -> EconomicEvent {
        EconomicEvent {
            id: Some(id.into()),
            date: Some("14/03/2024".into()),
            time: Some("12:30".into()),
            zone: Some("united states".into()),
            currency: Some("USD".into()),
            importance: Some("high".into()),
            event: Some(event.into()),
            actual: Some("0.3%".into()),
            forecast: Some("0.2%".into()),
            previous: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(from: NaiveDate, to: NaiveDate) -> CalendarRequest {
        CalendarRequest {
            countries: vec!["United States".into(), "Euro Zone".into()],
            importances: vec!["High".into(), "Medium".into()],
            from_date: from,
            to_date: to,
            timezone: None,
        }
    }

    #[test]
    fn test_same_day_range_widened() {
        let q = request(date(2024, 3, 14), date(2024, 3, 14))
            .to_provider_query("GMT")
            .unwrap();
        assert_eq!(q.from_date, "14/03/2024");
        assert_eq!(q.to_date, "15/03/2024");
    }

    #[test]
    fn test_month_end_widening() {
        let q = request(date(2024, 2, 29), date(2024, 2, 29))
            .to_provider_query("GMT")
            .unwrap();
        assert_eq!(q.to_date, "01/03/2024");
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = request(date(2024, 3, 14), date(2024, 3, 13))
            .to_provider_query("GMT")
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(ref m) if m.contains("To Date")), "got {err:?}");
    }

    #[test]
    fn test_names_lowercased_and_deduped() {
        let mut req = request(date(2024, 3, 1), date(2024, 3, 8));
        req.countries.push(" united states ".into());
        req.importances = vec!["HIGH".into(), "high".into(), "Low".into()];
        let q = req.to_provider_query("GMT").unwrap();
        assert_eq!(q.countries, vec!["united states", "euro zone"]);
        assert_eq!(q.importances, vec!["high", "low"]);
        assert_eq!(q.to_date, "08/03/2024");
    }

    #[test]
    fn test_empty_countries_rejected() {
        let mut req = request(date(2024, 3, 1), date(2024, 3, 2));
        req.countries = vec!["  ".into()];
        assert!(matches!(req.to_provider_query("GMT"), Err(DeskError::Validation(_))));
    }

    #[test]
    fn test_unknown_importance_rejected() {
        let mut req = request(date(2024, 3, 1), date(2024, 3, 2));
        req.importances = vec!["critical".into()];
        assert!(matches!(req.to_provider_query("GMT"), Err(DeskError::Validation(_))));
    }

    #[test]
    fn test_timezone_default_and_override() {
        let mut req = request(date(2024, 3, 1), date(2024, 3, 2));
        assert_eq!(req.to_provider_query("GMT").unwrap().time_zone, "GMT");
        req.timezone = Some("GMT +1:00".into());
        assert_eq!(req.to_provider_query("GMT").unwrap().time_zone, "GMT +1:00");
    }

    #[tokio::test]
    async fn test_fetch_sends_widened_query() {
        let stub = StubSource::with_events(vec![sample_event("1", "CPI")]);
        let events = fetch_calendar(&stub, &request(date(2024, 3, 14), date(2024, 3, 14)), "GMT")
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        let sent = stub.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(sent.to_date, "15/03/2024");
        assert_eq!(sent.countries, vec!["united states", "euro zone"]);
    }

    #[tokio::test]
    async fn test_fetch_invalid_range_never_calls_provider() {
        let stub = StubSource::with_events(Vec::new());
        let result = fetch_calendar(&stub, &request(date(2024, 3, 14), date(2024, 3, 1)), "GMT").await;
        assert!(result.is_err());
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_propagates_provider_error_without_retry() {
        let stub = StubSource::failing(503);
        let err = fetch_calendar(&stub, &request(date(2024, 3, 1), date(2024, 3, 2)), "GMT")
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Provider { status: 503, .. }), "got {err:?}");
        assert_eq!(stub.call_count(), 1);
    }
}
