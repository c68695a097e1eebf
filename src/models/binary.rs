use crate::errors::{DeskError, DeskResult};
use crate::models::black_scholes::{ensure_finite_price, BsParams, StandardNormal};
use crate::models::{ensure_family, OptionFamily, OptionKind, PricingModel, PricingRequest};

/// Cash-or-nothing binary option pricing.
///
/// Call = e^(-rT) * N(d1)
/// Put  = e^(-rT) * N(-d1)
///
/// with d1 taken on the underlying price. Call + Put = e^(-rT) exactly.
pub struct BinaryPricer {
    normal: StandardNormal,
}

impl BinaryPricer {
    pub fn new() -> Self {
        Self { normal: StandardNormal::new() }
    }
}

impl Default for BinaryPricer {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingModel for BinaryPricer {
    #[inline]
    fn name(&self) -> &'static str {
        "binary"
    }

    #[inline]
    fn family(&self) -> OptionFamily {
        OptionFamily::Binary
    }

    fn price(&self, request: &PricingRequest) -> DeskResult<f64> {
        ensure_family(self, request.kind)?;

        let underlying = request
            .underlying_price
            .ok_or_else(|| DeskError::Validation("underlying_price is required".into()))?;
        if !underlying.is_finite() || underlying <= 0.0 {
            return Err(DeskError::Validation(format!(
                "underlying_price must be a positive finite number, got {underlying}"
            )));
        }

        let p = BsParams::new(
            underlying,
            request.strike_price,
            request.volatility,
            request.time_to_maturity,
            request.risk_free_rate,
        )?;

        let price = match request.kind {
            OptionKind::Call => p.discount * self.normal.cdf(p.d1),
            OptionKind::Put => p.discount * self.normal.cdf(-p.d1),
            other => return Err(DeskError::InvalidOptionType(other.label().into())),
        };

        ensure_finite_price(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(kind: OptionKind, spot: f64, strike: f64, vol: f64, t: f64, r: f64) -> f64 {
        BinaryPricer::new()
            .price(&PricingRequest::binary(kind, spot, strike, vol, t).with_rate(r))
            .unwrap()
    }

    #[test]
    fn test_atm_reference_values() {
        // d1 = 0.15, N(0.15) = 0.559618...
        let call = price(OptionKind::Call, 100.0, 100.0, 0.2, 1.0, 0.01);
        let put = price(OptionKind::Put, 100.0, 100.0, 0.2, 1.0, 0.01);
        assert!((call - 0.554_049_403_294_251_7).abs() < 1e-6, "call={call}");
        assert!((put - 0.436_000_430_454_916_4).abs() < 1e-6, "put={put}");
    }

    #[test]
    fn test_itm_reference_values() {
        let call = price(OptionKind::Call, 110.0, 100.0, 0.3, 0.5, 0.02);
        let put = price(OptionKind::Put, 110.0, 100.0, 0.3, 0.5, 0.02);
        assert!((call - 0.719_350_710_311_042_3).abs() < 1e-6, "call={call}");
        assert!((put - 0.270_699_123_438_125_9).abs() < 1e-6, "put={put}");
    }

    #[test]
    fn test_call_plus_put_is_discount_factor() {
        for (s, k, v, t, r) in [
            (100.0, 100.0, 0.2, 1.0, 0.01),
            (150.0, 90.0, 0.6, 0.1, 0.05),
            (20.0, 35.0, 0.15, 3.0, -0.002),
        ] {
            let call = price(OptionKind::Call, s, k, v, t, r);
            let put = price(OptionKind::Put, s, k, v, t, r);
            let df = (-r * t).exp();
            assert!((call + put - df).abs() < 1e-12, "{call} + {put} != {df}");
        }
    }

    #[test]
    fn test_prices_within_discount_bounds() {
        let call = price(OptionKind::Call, 1_000.0, 1.0, 0.2, 1.0, 0.01);
        assert!(call > 0.0 && call <= (-0.01f64).exp(), "call={call}");
    }

    #[test]
    fn test_barrier_kind_is_invalid() {
        let req = PricingRequest::binary(OptionKind::DownAndIn, 100.0, 100.0, 0.2, 1.0);
        let err = BinaryPricer::new().price(&req).unwrap_err();
        assert!(matches!(err, DeskError::InvalidOptionType(_)), "got {err:?}");
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        let pricer = BinaryPricer::new();
        let zero_vol = PricingRequest::binary(OptionKind::Call, 100.0, 100.0, 0.0, 1.0);
        let zero_t = PricingRequest::binary(OptionKind::Put, 100.0, 100.0, 0.2, 0.0);
        assert!(matches!(pricer.price(&zero_vol), Err(DeskError::Validation(_))));
        assert!(matches!(pricer.price(&zero_t), Err(DeskError::Validation(_))));
    }

    #[test]
    fn test_vanishing_volatility_prices_as_step() {
        let df = (-0.01f64).exp();
        let call = price(OptionKind::Call, 110.0, 100.0, 1e-310, 1.0, 0.01);
        let put = price(OptionKind::Put, 110.0, 100.0, 1e-310, 1.0, 0.01);
        assert!((call - df).abs() < 1e-15, "call={call}");
        assert_eq!(put, 0.0);
    }
}
