pub mod black_scholes;
pub mod barrier;
pub mod binary;

use crate::errors::{DeskError, DeskResult};
use std::str::FromStr;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

/// All pricers implement this trait.
/// price() must be a pure function: deterministic output from the request only.
/// A kind from the wrong family is an InvalidOptionType, never a number.
pub trait PricingModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn family(&self) -> OptionFamily;

    fn price(&self, request: &PricingRequest) -> DeskResult<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionFamily {
    Barrier,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum OptionKind {
    #[serde(rename = "Up-and-Out")]
    UpAndOut,
    #[serde(rename = "Down-and-Out")]
    DownAndOut,
    #[serde(rename = "Up-and-In")]
    UpAndIn,
    #[serde(rename = "Down-and-In")]
    DownAndIn,
    #[serde(rename = "Call")]
    Call,
    #[serde(rename = "Put")]
    Put,
}

impl OptionKind {
    pub const BARRIER: [OptionKind; 4] = [
        OptionKind::UpAndOut,
        OptionKind::DownAndOut,
        OptionKind::UpAndIn,
        OptionKind::DownAndIn,
    ];

    pub const BINARY: [OptionKind; 2] = [OptionKind::Call, OptionKind::Put];

    pub fn family(self) -> OptionFamily {
        match self {
            Self::UpAndOut | Self::DownAndOut | Self::UpAndIn | Self::DownAndIn => {
                OptionFamily::Barrier
            }
            Self::Call | Self::Put => OptionFamily::Binary,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UpAndOut => "Up-and-Out",
            Self::DownAndOut => "Down-and-Out",
            Self::UpAndIn => "Up-and-In",
            Self::DownAndIn => "Down-and-In",
            Self::Call => "Call",
            Self::Put => "Put",
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts "Up-and-Out", "up_and_out", "UP AND OUT", "call", ...
impl FromStr for OptionKind {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "upandout" => Ok(Self::UpAndOut),
            "downandout" => Ok(Self::DownAndOut),
            "upandin" => Ok(Self::UpAndIn),
            "downandin" => Ok(Self::DownAndIn),
            "call" => Ok(Self::Call),
            "put" => Ok(Self::Put),
            _ => Err(DeskError::InvalidOptionType(s.trim().to_string())),
        }
    }
}

/// Inputs to a single pricing call.
///
/// `barrier_level` is only read by the barrier pricer and
/// `underlying_price` only by the binary pricer.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PricingRequest {
    pub kind: OptionKind,
    pub strike_price: f64,
    pub barrier_level: Option<f64>,
    pub underlying_price: Option<f64>,
    pub volatility: f64,
    pub time_to_maturity: f64,
    pub risk_free_rate: f64,
}

impl PricingRequest {
    pub fn barrier(
        kind: OptionKind,
        barrier_level: f64,
        strike_price: f64,
        volatility: f64,
        time_to_maturity: f64,
    ) -> Self {
        Self {
            kind,
            strike_price,
            barrier_level: Some(barrier_level),
            underlying_price: None,
            volatility,
            time_to_maturity,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }

    pub fn binary(
        kind: OptionKind,
        underlying_price: f64,
        strike_price: f64,
        volatility: f64,
        time_to_maturity: f64,
    ) -> Self {
        Self {
            kind,
            strike_price,
            barrier_level: None,
            underlying_price: Some(underlying_price),
            volatility,
            time_to_maturity,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }

    #[inline]
    pub fn with_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }
}

/// Rejects a kind that belongs to another pricer's family.
pub(crate) fn ensure_family(model: &dyn PricingModel, kind: OptionKind) -> DeskResult<()> {
    if kind.family() != model.family() {
        return Err(DeskError::InvalidOptionType(format!(
            "{kind} is not a {} option",
            model.name()
        )));
    }
    Ok(())
}
