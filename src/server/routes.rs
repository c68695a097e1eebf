use crate::calendar::{self, CalendarRequest};
use crate::calendar::types::EconomicEvent;
use crate::errors::{DeskError, DeskResult};
use crate::export::{self, ExportFormat};
use crate::models::{OptionFamily, OptionKind, PricingModel, PricingRequest};
use crate::server::view::{self, DashboardView, Page};
use crate::state::{AppState, CounterSnapshot};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use chrono::{Days, NaiveDate};
use portable_atomic::Ordering::Relaxed;
use std::sync::Arc;

#[derive(Debug, Default, serde::Deserialize)]
pub struct ViewQuery {
    pub page: Option<String>,
}

/// Calendar filters as they arrive on the query string.
/// Lists are comma-separated; dates are `YYYY-MM-DD`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct CalendarQuery {
    pub countries: Option<String>,
    pub importances: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub timezone: Option<String>,
    pub format: Option<String>,
}

impl CalendarQuery {
    /// Missing dates default to today and today + 1.
    pub fn to_request(&self, today: NaiveDate) -> DeskResult<CalendarRequest> {
        let from_date = match self.from_date.as_deref() {
            Some(s) => parse_date("from_date", s)?,
            None => today,
        };
        let to_date = match self.to_date.as_deref() {
            Some(s) => parse_date("to_date", s)?,
            None => today.checked_add_days(Days::new(1)).unwrap_or(today),
        };

        Ok(CalendarRequest {
            countries: split_list(self.countries.as_deref()),
            importances: split_list(self.importances.as_deref()),
            from_date,
            to_date,
            timezone: self.timezone.clone(),
        })
    }
}

fn parse_date(field: &str, s: &str) -> DeskResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| DeskError::Validation(format!("{field}: expected YYYY-MM-DD ({e})")))
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split(',').map(|p| p.to_string()).collect())
        .unwrap_or_default()
}

#[derive(Debug, serde::Deserialize)]
pub struct BarrierPriceBody {
    pub kind: String,
    pub strike_price: f64,
    pub barrier_level: f64,
    pub volatility: f64,
    pub time_to_maturity: f64,
    pub risk_free_rate: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
pub struct BinaryPriceBody {
    pub kind: String,
    pub strike_price: f64,
    pub underlying_price: f64,
    pub volatility: f64,
    pub time_to_maturity: f64,
    pub risk_free_rate: Option<f64>,
}

#[derive(Debug, serde::Serialize)]
pub struct PriceResponse {
    pub kind: OptionKind,
    pub family: OptionFamily,
    pub price: f64,
    pub request: PricingRequest,
}

#[derive(Debug, serde::Serialize)]
pub struct CalendarResponseBody {
    pub count: usize,
    pub events: Vec<EconomicEvent>,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Bump the error counters on the way out.
fn tracked<T>(state: &AppState, result: DeskResult<T>) -> DeskResult<T> {
    if let Err(e) = &result {
        state.counters.record_error(e);
    }
    result
}

/// GET /api/health
pub async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/view?page=calendar|pricer -- dashboard view-model
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ViewQuery>,
) -> DeskResult<Json<DashboardView>> {
    let page: Page = tracked(&state, params.page.as_deref().unwrap_or("").parse())?;
    Ok(Json(view::build_view(page, &state.config, today())))
}

/// GET /api/calendar -- events without the internal id column
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CalendarQuery>,
) -> DeskResult<Json<CalendarResponseBody>> {
    let result = match params.to_request(today()) {
        Ok(request) => fetch(&state, &request).await,
        Err(e) => Err(e),
    };
    let events = tracked(&state, result)?;
    Ok(Json(CalendarResponseBody {
        count: events.len(),
        events,
    }))
}

/// GET /api/calendar/export?format=xlsx|csv -- attachment download
pub async fn get_calendar_export(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CalendarQuery>,
) -> DeskResult<Response> {
    tracked(&state, export_inner(&state, &params).await)
}

async fn export_inner(state: &AppState, params: &CalendarQuery) -> DeskResult<Response> {
    let format: ExportFormat = params.format.as_deref().unwrap_or("xlsx").parse()?;
    let request = params.to_request(today())?;
    let events = fetch(state, &request).await?;
    let rows = events.len();

    let bytes = tokio::task::spawn_blocking(move || export::render(&events, format))
        .await
        .map_err(|e| DeskError::Export(format!("export task: {e}")))??;

    state.counters.exports_served.fetch_add(1, Relaxed);
    let filename = export::download_filename(request.from_date, request.to_date, format);
    tracing::info!(rows, bytes = bytes.len(), file = %filename, "calendar export served");

    let headers = [
        (header::CONTENT_TYPE, format.mime_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

async fn fetch(state: &AppState, request: &CalendarRequest) -> DeskResult<Vec<EconomicEvent>> {
    let events = calendar::fetch_calendar(
        state.calendar.as_ref(),
        request,
        &state.config.default_timezone,
    )
    .await?;
    state.counters.calendar_fetches.fetch_add(1, Relaxed);
    Ok(events)
}

/// POST /api/price/barrier
pub async fn post_price_barrier(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BarrierPriceBody>,
) -> DeskResult<Json<PriceResponse>> {
    let result = body.kind.parse::<OptionKind>().map(|kind| {
        PricingRequest::barrier(
            kind,
            body.barrier_level,
            body.strike_price,
            body.volatility,
            body.time_to_maturity,
        )
        .with_rate(body.risk_free_rate.unwrap_or(state.config.default_risk_free_rate))
    });
    let request = tracked(&state, result)?;
    price_with(&state, &state.barrier, request)
}

/// POST /api/price/binary
pub async fn post_price_binary(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BinaryPriceBody>,
) -> DeskResult<Json<PriceResponse>> {
    let result = body.kind.parse::<OptionKind>().map(|kind| {
        PricingRequest::binary(
            kind,
            body.underlying_price,
            body.strike_price,
            body.volatility,
            body.time_to_maturity,
        )
        .with_rate(body.risk_free_rate.unwrap_or(state.config.default_risk_free_rate))
    });
    let request = tracked(&state, result)?;
    price_with(&state, &state.binary, request)
}

fn price_with(
    state: &AppState,
    model: &dyn PricingModel,
    request: PricingRequest,
) -> DeskResult<Json<PriceResponse>> {
    let price = tracked(state, model.price(&request))?;
    state.counters.prices_computed.fetch_add(1, Relaxed);
    tracing::debug!(model = model.name(), kind = %request.kind, price, "priced");

    Ok(Json(PriceResponse {
        kind: request.kind,
        family: model.family(),
        price,
        request,
    }))
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<CounterSnapshot> {
    Json(state.counters.snapshot())
}
