use super::types::{CalendarResponse, EconomicEvent, ProviderQuery};
use super::CalendarSource;
use crate::errors::{DeskError, DeskResult};
use reqwest::Client;

/// Economic-calendar provider REST client. All methods return Result, never panic.
#[derive(Clone)]
pub struct CalendarClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CalendarClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .pool_max_idle_per_host(4)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Query-string pairs for a provider query. Empty importances means no filter.
    pub fn query_pairs(query: &ProviderQuery) -> smallvec::SmallVec<[(&'static str, String); 5]> {
        let mut pairs: smallvec::SmallVec<[(&'static str, String); 5]> = smallvec::SmallVec::new();
        pairs.push(("countries", query.countries.join(",")));
        if !query.importances.is_empty() {
            pairs.push(("importances", query.importances.join(",")));
        }
        pairs.push(("from_date", query.from_date.clone()));
        pairs.push(("to_date", query.to_date.clone()));
        pairs.push(("time_zone", query.time_zone.clone()));
        pairs
    }
}

#[async_trait::async_trait]
impl CalendarSource for CalendarClient {
    async fn economic_calendar(&self, query: &ProviderQuery) -> DeskResult<Vec<EconomicEvent>> {
        let url = format!("{}/economic-calendar", self.base_url);

        let mut req = self.client.get(&url).query(Self::query_pairs(query).as_slice());
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DeskError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let data: CalendarResponse = resp
            .json()
            .await
            .map_err(|e| DeskError::Parse(format!("GET /economic-calendar: {e}")))?;

        Ok(data.data)
    }
}
