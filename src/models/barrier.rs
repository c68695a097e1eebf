use crate::errors::{DeskError, DeskResult};
use crate::models::black_scholes::{ensure_finite_price, BsParams, StandardNormal};
use crate::models::{ensure_family, OptionFamily, OptionKind, PricingModel, PricingRequest};

/// Single-barrier option pricing, closed form.
///
/// The barrier level stands in for spot in d1/d2:
///
///   Up-and-Out   =  B*N(d1)  - K*e^(-rT)*N(d2)
///   Down-and-Out = -B*N(-d1) + K*e^(-rT)*N(-d2)
///   Up-and-In    =  K*e^(-rT)*N(d2)  - B*N(d1)
///   Down-and-In  = -K*e^(-rT)*N(-d2) + B*N(-d1)
///
/// No rebate, no reflection across the barrier.
pub struct BarrierPricer {
    normal: StandardNormal,
}

impl BarrierPricer {
    pub fn new() -> Self {
        Self { normal: StandardNormal::new() }
    }

    fn price_params(&self, kind: OptionKind, p: &BsParams) -> DeskResult<f64> {
        let n = &self.normal;
        let barrier = p.spot;
        let pv_strike = p.strike * p.discount;

        let price = match kind {
            OptionKind::UpAndOut => barrier * n.cdf(p.d1) - pv_strike * n.cdf(p.d2),
            OptionKind::DownAndOut => -barrier * n.cdf(-p.d1) + pv_strike * n.cdf(-p.d2),
            OptionKind::UpAndIn => pv_strike * n.cdf(p.d2) - barrier * n.cdf(p.d1),
            OptionKind::DownAndIn => -pv_strike * n.cdf(-p.d2) + barrier * n.cdf(-p.d1),
            other => return Err(DeskError::InvalidOptionType(other.label().into())),
        };

        ensure_finite_price(price)
    }
}

impl Default for BarrierPricer {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingModel for BarrierPricer {
    #[inline]
    fn name(&self) -> &'static str {
        "barrier"
    }

    #[inline]
    fn family(&self) -> OptionFamily {
        OptionFamily::Barrier
    }

    fn price(&self, request: &PricingRequest) -> DeskResult<f64> {
        ensure_family(self, request.kind)?;

        let barrier_level = request
            .barrier_level
            .ok_or_else(|| DeskError::Validation("barrier_level is required".into()))?;
        if !barrier_level.is_finite() || barrier_level <= 0.0 {
            return Err(DeskError::Validation(format!(
                "barrier_level must be a positive finite number, got {barrier_level}"
            )));
        }

        let params = BsParams::new(
            barrier_level,
            request.strike_price,
            request.volatility,
            request.time_to_maturity,
            request.risk_free_rate,
        )?;

        self.price_params(request.kind, &params)
    }
}
