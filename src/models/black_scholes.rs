use crate::errors::{DeskError, DeskResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// Precomputed Black-Scholes terms for one (spot, strike, vol, T, r) tuple.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
///
/// Construction validates every input, so d1/d2 are never NaN. They can be
/// ±∞ when volatility is vanishingly small; N(±∞) is exact there.
#[derive(Debug, Clone, Copy)]
pub struct BsParams {
    pub spot: f64,
    pub strike: f64,
    pub d1: f64,
    pub d2: f64,
    /// e^(-rT)
    pub discount: f64,
}

impl BsParams {
    pub fn new(
        spot: f64,
        strike: f64,
        volatility: f64,
        ttl_years: f64,
        rate: f64,
    ) -> DeskResult<Self> {
        ensure_positive("spot", spot)?;
        ensure_positive("strike_price", strike)?;
        ensure_positive("volatility", volatility)?;
        ensure_positive("time_to_maturity", ttl_years)?;
        if !rate.is_finite() {
            return Err(DeskError::Validation(format!(
                "risk_free_rate must be finite, got {rate}"
            )));
        }

        let sigma_sqrt_t = volatility * ttl_years.sqrt();
        let half_variance = 0.5 * volatility * volatility * ttl_years;
        let discount = (-rate * ttl_years).exp();
        if !half_variance.is_finite() || !discount.is_finite() {
            return Err(DeskError::Validation(
                "inputs out of numeric range: volatility^2 * T or e^(-rT) overflows".into(),
            ));
        }

        let d1 = ((spot / strike).ln() + rate * ttl_years + half_variance) / sigma_sqrt_t;
        let d2 = d1 - sigma_sqrt_t;
        if d1.is_nan() || d2.is_nan() {
            return Err(DeskError::Validation(
                "inputs out of numeric range: d1/d2 undefined".into(),
            ));
        }

        Ok(Self {
            spot,
            strike,
            d1,
            d2,
            discount,
        })
    }
}

/// Standard normal N(x), created once per pricer and reused.
#[derive(Debug, Clone, Copy)]
pub struct StandardNormal {
    normal: Normal,
}

impl StandardNormal {
    pub fn new() -> Self {
        Self { normal: Normal::standard() }
    }

    #[inline]
    pub fn cdf(&self, x: f64) -> f64 {
        self.normal.cdf(x)
    }
}

impl Default for StandardNormal {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> DeskResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DeskError::Validation(format!(
            "{field} must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}

/// Guards the last step: a price must be a real number.
pub(crate) fn ensure_finite_price(price: f64) -> DeskResult<f64> {
    if price.is_finite() {
        Ok(price)
    } else {
        Err(DeskError::Validation(format!("pricing produced a non-finite value: {price}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atm_d1_d2() {
        let p = BsParams::new(100.0, 100.0, 0.2, 1.0, 0.01).unwrap();
        // ln(1) = 0, so d1 = (0.01 + 0.02) / 0.2
        assert!((p.d1 - 0.15).abs() < 1e-12, "d1={}", p.d1);
        assert!((p.d2 - -0.05).abs() < 1e-12, "d2={}", p.d2);
        assert!((p.discount - (-0.01f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_zero_volatility_rejected() {
        let err = BsParams::new(100.0, 100.0, 0.0, 1.0, 0.01).unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_zero_maturity_rejected() {
        let err = BsParams::new(100.0, 100.0, 0.2, 0.0, 0.01).unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn test_nan_inputs_rejected() {
        assert!(BsParams::new(f64::NAN, 100.0, 0.2, 1.0, 0.01).is_err());
        assert!(BsParams::new(100.0, f64::INFINITY, 0.2, 1.0, 0.01).is_err());
        assert!(BsParams::new(100.0, 100.0, 0.2, 1.0, f64::NAN).is_err());
        assert!(BsParams::new(100.0, -5.0, 0.2, 1.0, 0.01).is_err());
    }

    #[test]
    fn test_negative_rate_allowed() {
        let p = BsParams::new(100.0, 100.0, 0.2, 1.0, -0.005).unwrap();
        assert!(p.discount > 1.0);
    }

    #[test]
    fn test_vanishing_volatility_gives_infinite_d1() {
        // 0.0953 / 1e-310 overflows to +inf; N(+inf) = 1
        let p = BsParams::new(110.0, 100.0, 1e-310, 1.0, 0.0).unwrap();
        assert_eq!(p.d1, f64::INFINITY);
        assert_eq!(p.d2, f64::INFINITY);
        assert_eq!(StandardNormal::new().cdf(p.d1), 1.0);

        let p = BsParams::new(90.0, 100.0, 1e-310, 1.0, 0.0).unwrap();
        assert_eq!(p.d1, f64::NEG_INFINITY);
        assert_eq!(StandardNormal::new().cdf(p.d1), 0.0);
    }

    #[test]
    fn test_overflowing_variance_rejected() {
        let err = BsParams::new(100.0, 100.0, 1e200, 1.0, 0.01).unwrap_err();
        assert!(
            matches!(err, DeskError::Validation(ref m) if m.contains("out of numeric range")),
            "got {err:?}"
        );
    }

    #[test]
    fn test_normal_cdf_symmetry() {
        let n = StandardNormal::new();
        assert!((n.cdf(0.0) - 0.5).abs() < 1e-12);
        for x in [0.1, 0.75, 1.96, 3.0] {
            assert!((n.cdf(x) + n.cdf(-x) - 1.0).abs() < 1e-12, "x={x}");
        }
    }
}
