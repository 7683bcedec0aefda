//! Immutable description of a fluid mixture: feed composition and the
//! critical data of every component.
use crate::errors::{EosError, EosResult};
use crate::parameter::{CubicRecord, Identifier, ParameterError, PureRecord};
use ndarray::{Array1, Zip};
use std::fmt;

/// Maximum deviation of the sum of mole fractions from unity.
pub const COMPOSITION_TOLERANCE: f64 = 1e-6;

/// Validate a vector of mole fractions for a mixture of `components` substances.
///
/// Entries have to be finite and non-negative and sum to one within
/// [COMPOSITION_TOLERANCE].
pub fn validate_composition(composition: &Array1<f64>, components: usize) -> EosResult<()> {
    if composition.len() != components {
        return Err(EosError::IncompatibleComponents(
            components,
            composition.len(),
        ));
    }
    if let Some((i, x)) = composition
        .iter()
        .enumerate()
        .find(|(_, x)| !x.is_finite() || **x < 0.0)
    {
        return Err(EosError::InvalidComposition(format!(
            "mole fraction of component {} is {}",
            i, x
        )));
    }
    let sum = composition.sum();
    if (sum - 1.0).abs() > COMPOSITION_TOLERANCE {
        return Err(EosError::InvalidComposition(format!(
            "mole fractions sum to {}",
            sum
        )));
    }
    Ok(())
}

/// A mixture of `n` components at a fixed overall composition.
///
/// The struct is immutable. To analyze a different feed, build a new
/// instance with [Mixture::with_composition].
#[derive(Debug, Clone)]
pub struct Mixture {
    composition: Array1<f64>,
    tc: Array1<f64>,
    pc: Array1<f64>,
    acentric_factor: Array1<f64>,
    identifiers: Vec<Identifier>,
}

impl Mixture {
    /// Create a mixture from the feed composition and the critical data
    /// (temperatures in K, pressures in Pa) of all components.
    pub fn new(
        composition: Array1<f64>,
        tc: Array1<f64>,
        pc: Array1<f64>,
        acentric_factor: Array1<f64>,
    ) -> EosResult<Self> {
        let n = tc.len();
        if [pc.len(), acentric_factor.len()].iter().any(|&l| l != n) {
            return Err(ParameterError::IncompatibleParameters(String::from(
                "each component has to have a critical temperature, critical pressure and acentric factor",
            ))
            .into());
        }
        if n == 0 {
            return Err(ParameterError::InsufficientInformation(String::from(
                "a mixture needs at least one component",
            ))
            .into());
        }
        for i in 0..n {
            if !(tc[i].is_finite() && tc[i] > 0.0) {
                return Err(ParameterError::InvalidParameter("tc".into(), tc[i], i).into());
            }
            if !(pc[i].is_finite() && pc[i] > 0.0) {
                return Err(ParameterError::InvalidParameter("pc".into(), pc[i], i).into());
            }
            if !acentric_factor[i].is_finite() {
                return Err(ParameterError::InvalidParameter(
                    "acentric_factor".into(),
                    acentric_factor[i],
                    i,
                )
                .into());
            }
        }
        validate_composition(&composition, n)?;
        Ok(Self {
            composition,
            tc,
            pc,
            acentric_factor,
            identifiers: vec![Identifier::default(); n],
        })
    }

    /// Create a mixture from pure component records.
    pub fn from_records(
        records: &[PureRecord<CubicRecord>],
        composition: Array1<f64>,
    ) -> EosResult<Self> {
        let tc = records.iter().map(|r| r.model_record.tc).collect();
        let pc = records.iter().map(|r| r.model_record.pc).collect();
        let acentric_factor = records
            .iter()
            .map(|r| r.model_record.acentric_factor)
            .collect();
        let mut mixture = Self::new(composition, tc, pc, acentric_factor)?;
        mixture.identifiers = records.iter().map(|r| r.identifier.clone()).collect();
        Ok(mixture)
    }

    /// Create a pure substance, i.e. a single component with mole fraction one.
    pub fn pure(record: CubicRecord) -> EosResult<Self> {
        Self::new(
            Array1::ones(1),
            Array1::from_elem(1, record.tc),
            Array1::from_elem(1, record.pc),
            Array1::from_elem(1, record.acentric_factor),
        )
    }

    /// The same components at a different feed composition.
    pub fn with_composition(&self, composition: Array1<f64>) -> EosResult<Self> {
        validate_composition(&composition, self.components())?;
        Ok(Self {
            composition,
            ..self.clone()
        })
    }

    pub fn components(&self) -> usize {
        self.tc.len()
    }

    /// Feed mole fractions, tested by
    /// [StabilityAnalyzer::stability_test_feed](crate::phase_equilibria::StabilityAnalyzer::stability_test_feed).
    pub fn composition(&self) -> &Array1<f64> {
        &self.composition
    }

    /// Critical temperatures in K.
    pub fn tc(&self) -> &Array1<f64> {
        &self.tc
    }

    /// Critical pressures in Pa.
    pub fn pc(&self) -> &Array1<f64> {
        &self.pc
    }

    pub fn acentric_factor(&self) -> &Array1<f64> {
        &self.acentric_factor
    }

    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }

    /// Estimate equilibrium ratios with the correlation of Wilson:
    ///
    /// $K_i=\frac{p_{c,i}}{p}\exp\left(5.373(1+\omega_i)\left(1-\frac{T_{c,i}}{T}\right)\right)$
    ///
    /// The values are only meant to initialize iterative algorithms.
    pub fn wilson_k_values(&self, pressure: f64, temperature: f64) -> Array1<f64> {
        Zip::from(&self.tc)
            .and(&self.pc)
            .and(&self.acentric_factor)
            .map_collect(|&tc, &pc, &w| {
                pc / pressure * (5.373 * (1.0 + w) * (1.0 - tc / temperature)).exp()
            })
    }
}

impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mixture(components={})", self.components())?;
        for i in 0..self.components() {
            writeln!(
                f,
                "  {}: z={}, tc={} K, pc={} Pa, acentric factor={}",
                self.identifiers[i],
                self.composition[i],
                self.tc[i],
                self.pc[i],
                self.acentric_factor[i]
            )?;
        }
        Ok(())
    }
}
