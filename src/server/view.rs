use crate::calendar::COUNTRY_CHOICES;
use crate::config::AppConfig;
use crate::errors::DeskError;
use crate::models::OptionKind;
use chrono::{Days, NaiveDate};
use std::str::FromStr;

/// Dashboard page. It travels with each request (`?page=`); the server keeps
/// no navigation state between requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Calendar,
    Pricer,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Calendar, Page::Pricer];

    pub fn title(self) -> &'static str {
        match self {
            Page::Calendar => "Economic Calendar",
            Page::Pricer => "Option Pricer",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Page::Calendar => "calendar",
            Page::Pricer => "pricer",
        }
    }
}

impl FromStr for Page {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "calendar" => Ok(Page::Calendar),
            "pricer" | "options" => Ok(Page::Pricer),
            other => Err(DeskError::Validation(format!("unknown page '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct NavEntry {
    pub page: Page,
    pub title: &'static str,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CalendarForm {
    pub countries: Vec<&'static str>,
    pub importances: Vec<&'static str>,
    pub default_from: NaiveDate,
    pub default_to: NaiveDate,
    pub default_timezone: String,
    pub export_formats: Vec<&'static str>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PricerForm {
    pub barrier_kinds: Vec<&'static str>,
    pub binary_kinds: Vec<&'static str>,
    pub default_risk_free_rate: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardView {
    pub page: Page,
    pub title: &'static str,
    pub nav: Vec<NavEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarForm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricer: Option<PricerForm>,
}

/// Build the view for one page. `today` is passed in so the defaults are testable.
pub fn build_view(page: Page, config: &AppConfig, today: NaiveDate) -> DashboardView {
    let nav = Page::ALL
        .iter()
        .map(|p| NavEntry {
            page: *p,
            title: p.title(),
            href: format!("/?page={}", p.slug()),
            active: *p == page,
        })
        .collect();

    let calendar = (page == Page::Calendar).then(|| CalendarForm {
        countries: COUNTRY_CHOICES.to_vec(),
        importances: vec!["Low", "Medium", "High"],
        default_from: today,
        default_to: today.checked_add_days(Days::new(1)).unwrap_or(today),
        default_timezone: config.default_timezone.clone(),
        export_formats: vec!["xlsx", "csv"],
    });

    let pricer = (page == Page::Pricer).then(|| PricerForm {
        barrier_kinds: OptionKind::BARRIER.iter().map(|k| k.label()).collect(),
        binary_kinds: OptionKind::BINARY.iter().map(|k| k.label()).collect(),
        default_risk_free_rate: config.default_risk_free_rate,
    });

    DashboardView {
        page,
        title: page.title(),
        nav,
        calendar,
        pricer,
    }
}
