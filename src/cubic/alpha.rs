use serde::{Deserialize, Serialize};

/// Temperature dependence of the attractive parameter.
pub trait AlphaFunction {
    /// Slope $m(\omega)$ of $\sqrt\alpha$ with respect to $\sqrt{T_r}$.
    fn m(&self, acentric_factor: f64) -> f64;

    /// $\alpha=\left(1+m(\omega)\left(1-\sqrt{T_r}\right)\right)^2$
    #[inline]
    fn alpha(&self, acentric_factor: f64, reduced_temperature: f64) -> f64 {
        ((1.0 - reduced_temperature.sqrt()) * self.m(acentric_factor) + 1.0).powi(2)
    }
}

/// Soave's alpha function for the Redlich-Kwong equation of state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedlichKwong1972;

impl AlphaFunction for RedlichKwong1972 {
    #[inline]
    fn m(&self, w: f64) -> f64 {
        0.48 + w * (1.574 - w * 0.176)
    }
}

/// Alpha function of Robinson and Peng (1978).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PengRobinson1978;

/// Acentric factor above which the cubic correlation is used.
pub const PENG_ROBINSON_1978_BRANCH: f64 = 0.491;

impl AlphaFunction for PengRobinson1978 {
    #[inline]
    fn m(&self, w: f64) -> f64 {
        if w <= PENG_ROBINSON_1978_BRANCH {
            0.37464 + w * (1.54226 - w * 0.26992)
        } else {
            // use higher-order polynomial if w > w(n-decane)
            0.379642 + w * (1.48503 + w * (-0.164423 + w * 0.016666))
        }
    }
}
