//! Stability analysis based on the tangent plane distance of Michelsen.
//!
//! A feed with composition $z$ is stable as a single phase if the modified
//! tangent plane distance
//!
//! $tm(Y)=1+\sum_iY_i\left(\ln Y_i+\ln\varphi_i(y)-d_i-1\right),\quad d_i=\ln z_i+\ln\varphi_i(z)$
//!
//! is non-negative at all of its stationary points. The stationary points are
//! found by successive substitution $\ln Y_i\leftarrow d_i-\ln\varphi_i(y)$ from
//! several initial trial phases. At a stationary point $tm=1-\sum_iY_i$.
use super::SolverOptions;
use crate::cubic::{CubicEquationOfState, CubicModel, RootSelection};
use crate::errors::EosResult;
use crate::mixture::validate_composition;
use ndarray::{Array1, Zip};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mole fraction of the dominant component in a pure component trial phase.
pub const X_DOMINANT: f64 = 0.99;
/// Default maximum number of successive substitution steps per trial phase.
pub const MAX_ITER_STABILITY: usize = 1000;
/// Default tolerance for the squared change of $\ln Y$ between two steps.
pub const TOL_STABILITY: f64 = 1e-10;
/// A trial phase with $\sum_i(\ln y_i/z_i)^2$ below this value is the feed itself.
pub const TRIVIAL_TOLERANCE: f64 = 1e-8;
/// A converged trial phase indicates instability only if $\sum_iY_i>1+$ this value.
pub const SUM_Y_TOLERANCE: f64 = 1e-9;

/// Origin of the initial composition of a trial phase.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialSeed {
    /// $Y_i=K_iz_i$ with Wilson K-values.
    WilsonVapor,
    /// $Y_i=z_i/K_i$ with Wilson K-values.
    WilsonLiquid,
    /// $Y_i=\sqrt[3]{K_i}z_i$ with Wilson K-values.
    CubeRootWilsonVapor,
    /// $Y_i=z_i/\sqrt[3]{K_i}$ with Wilson K-values.
    CubeRootWilsonLiquid,
    /// The given component with mole fraction [X_DOMINANT].
    PureComponent(usize),
}

impl fmt::Display for TrialSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WilsonVapor => write!(f, "Wilson vapor"),
            Self::WilsonLiquid => write!(f, "Wilson liquid"),
            Self::CubeRootWilsonVapor => write!(f, "cube root Wilson vapor"),
            Self::CubeRootWilsonLiquid => write!(f, "cube root Wilson liquid"),
            Self::PureComponent(i) => write!(f, "pure component {}", i + 1),
        }
    }
}

/// Outcome of the minimization of the tangent plane distance for one trial phase.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialStatus {
    /// The iteration converged to the feed composition.
    Trivial,
    /// Converged to a stationary point with $\sum_iY_i\leq1$.
    Stable,
    /// Converged to a stationary point with $\sum_iY_i>1$: the feed splits.
    Unstable,
    /// The maximum number of iterations was reached. The trial phase
    /// does not contribute to the verdict.
    NotConverged,
}

impl TrialStatus {
    /// Classify a converged, non-trivial stationary point by $\sum_iY_i$.
    ///
    /// Values within [SUM_Y_TOLERANCE] of one are considered stable.
    pub fn from_sum_moles(sum_moles: f64) -> Self {
        if sum_moles - 1.0 > SUM_Y_TOLERANCE {
            Self::Unstable
        } else {
            Self::Stable
        }
    }
}

/// Check whether a trial composition coincides with the feed.
///
/// Components that are absent in the feed are ignored.
pub fn is_trivial_solution(trial: &Array1<f64>, feed: &Array1<f64>) -> bool {
    Zip::from(trial)
        .and(feed)
        .fold(0.0, |acc, &y, &z| {
            if z > 0.0 {
                acc + (y / z).ln().powi(2)
            } else {
                acc
            }
        })
        < TRIVIAL_TOLERANCE
}

/// Final state of a trial phase.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TrialPhase {
    pub seed: TrialSeed,
    /// Normalized composition $y$.
    pub composition: Array1<f64>,
    /// Unnormalized mole numbers $Y$.
    pub moles: Array1<f64>,
    pub sum_moles: f64,
    /// Modified tangent plane distance $1-\sum_iY_i$.
    pub tpd: f64,
    pub iterations: usize,
    pub status: TrialStatus,
}

impl TrialPhase {
    /// Whether this trial phase proves that the feed is unstable.
    pub fn indicates_instability(&self) -> bool {
        self.status == TrialStatus::Unstable
    }

    /// Equilibrium ratios $K_i=y_i/z_i$ between the trial phase and the feed,
    /// e.g., to initialize a flash calculation.
    ///
    /// Components absent in the feed get a value of zero.
    pub fn k_values(&self, feed: &Array1<f64>) -> Array1<f64> {
        Zip::from(&self.composition)
            .and(feed)
            .map_collect(|&y, &z| if z > 0.0 { y / z } else { 0.0 })
    }
}

/// Result of a stability test.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StabilityResult {
    phase_split: bool,
    trials: Vec<TrialPhase>,
}

impl StabilityResult {
    fn new(trials: Vec<TrialPhase>) -> Self {
        Self {
            phase_split: trials.iter().any(TrialPhase::indicates_instability),
            trials,
        }
    }

    /// `true` if the feed is unstable as a single phase.
    pub fn phase_split(&self) -> bool {
        self.phase_split
    }

    pub fn is_stable(&self) -> bool {
        !self.phase_split
    }

    /// All trial phases in the order of their seeds.
    pub fn trials(&self) -> &[TrialPhase] {
        &self.trials
    }

    /// The distinct trial phases with negative tangent plane distance.
    ///
    /// Trial phases that converged to an already identified minimum are
    /// reported only once.
    pub fn candidates(&self) -> Vec<&TrialPhase> {
        let mut candidates: Vec<&TrialPhase> = Vec::new();
        for trial in self.trials.iter().filter(|t| t.indicates_instability()) {
            if !candidates
                .iter()
                .any(|c| is_trivial_solution(&trial.composition, &c.composition))
            {
                candidates.push(trial);
            }
        }
        candidates
    }

    /// The candidate with the most negative tangent plane distance.
    pub fn minimum_tpd(&self) -> Option<&TrialPhase> {
        self.candidates()
            .into_iter()
            .min_by(|a, b| a.tpd.total_cmp(&b.tpd))
    }

    /// Trial phases that did not converge within the maximum number of iterations.
    pub fn not_converged(&self) -> impl Iterator<Item = &TrialPhase> {
        self.trials
            .iter()
            .filter(|t| t.status == TrialStatus::NotConverged)
    }
}

/// Michelsen's stability test for a cubic equation of state.
pub struct StabilityAnalyzer<'a, M> {
    eos: &'a CubicEquationOfState<M>,
    options: SolverOptions,
}

impl<'a, M: CubicModel> StabilityAnalyzer<'a, M> {
    pub fn new(eos: &'a CubicEquationOfState<M>, options: SolverOptions) -> Self {
        Self { eos, options }
    }

    /// Initial compositions of all trial phases, each normalized to unity.
    ///
    /// Besides the Wilson estimates for an incipient vapor and liquid phase, the
    /// cube roots of the Wilson K-values are used, as well as one trial phase rich
    /// in each component present in the feed.
    pub fn trial_seeds(
        &self,
        pressure: f64,
        temperature: f64,
        feed: &Array1<f64>,
    ) -> Vec<(TrialSeed, Array1<f64>)> {
        let k = self
            .eos
            .mixture()
            .wilson_k_values(pressure, temperature);
        let k_cbrt = k.mapv(f64::cbrt);
        let mut seeds = vec![
            (TrialSeed::WilsonVapor, &k * feed),
            (TrialSeed::WilsonLiquid, feed / &k),
            (TrialSeed::CubeRootWilsonVapor, &k_cbrt * feed),
            (TrialSeed::CubeRootWilsonLiquid, feed / &k_cbrt),
        ];
        let total = feed.sum();
        for (dominant, &z_dominant) in feed.iter().enumerate() {
            if z_dominant <= 0.0 {
                continue;
            }
            let factor = (1.0 - X_DOMINANT) / (total - z_dominant);
            let y = Array1::from_shape_fn(feed.len(), |i| {
                if i == dominant {
                    X_DOMINANT
                } else {
                    feed[i] * factor
                }
            });
            seeds.push((TrialSeed::PureComponent(dominant), y));
        }
        seeds
            .into_iter()
            .map(|(seed, y)| {
                let sum = y.sum();
                (seed, y / sum)
            })
            .collect()
    }

    /// Determine whether the feed `z` at the given pressure (Pa) and temperature (K)
    /// splits into more than one phase.
    ///
    /// Fails immediately for an invalid composition and if the cubic equation
    /// has no physical root. Trial phases that do not converge are reported in
    /// the result but do not affect the verdict.
    pub fn stability_test(
        &self,
        pressure: f64,
        temperature: f64,
        feed: &Array1<f64>,
    ) -> EosResult<StabilityResult> {
        validate_composition(feed, self.eos.components())?;
        let verbosity = self.options.verbosity;

        // without composition degrees of freedom there is no phase split
        if feed.iter().filter(|&&z| z > 0.0).count() < 2 {
            log_result!(verbosity, "Stability analysis: single component feed is stable");
            return Ok(StabilityResult::new(Vec::new()));
        }

        let feed_phase = self.eos.phase_properties(
            pressure,
            temperature,
            feed,
            RootSelection::MinimumGibbsEnergy,
        )?;
        let di = Zip::from(feed)
            .and(&feed_phase.ln_phi)
            .map_collect(|&z, &ln_phi| {
                if z > 0.0 {
                    z.ln() + ln_phi
                } else {
                    f64::NEG_INFINITY
                }
            });

        let seeds = self.trial_seeds(pressure, temperature, feed);

        #[cfg(feature = "rayon")]
        let trials = seeds
            .into_par_iter()
            .map(|(seed, y)| self.minimize_tpd(pressure, temperature, feed, &di, seed, y))
            .collect::<EosResult<Vec<_>>>()?;
        #[cfg(not(feature = "rayon"))]
        let trials = seeds
            .into_iter()
            .map(|(seed, y)| self.minimize_tpd(pressure, temperature, feed, &di, seed, y))
            .collect::<EosResult<Vec<_>>>()?;

        for trial in trials.iter() {
            let msg = match trial.status {
                TrialStatus::Trivial => "Found trivial solution",
                TrialStatus::Stable => "Found minimum > 0",
                TrialStatus::Unstable => "Found candidate",
                TrialStatus::NotConverged => "Not converged",
            };
            log_result!(
                verbosity,
                "{}: {} in {} step(s) (tpd = {:.8e})",
                trial.seed,
                msg,
                trial.iterations,
                trial.tpd
            );
        }

        let result = StabilityResult::new(trials);
        log_result!(
            verbosity,
            "Stability analysis: phase split = {}",
            result.phase_split()
        );
        Ok(result)
    }

    /// Stability test of the feed composition stored in the mixture.
    pub fn stability_test_feed(
        &self,
        pressure: f64,
        temperature: f64,
    ) -> EosResult<StabilityResult> {
        self.stability_test(pressure, temperature, self.eos.mixture().composition())
    }

    fn minimize_tpd(
        &self,
        pressure: f64,
        temperature: f64,
        feed: &Array1<f64>,
        di: &Array1<f64>,
        seed: TrialSeed,
        mut y: Array1<f64>,
    ) -> EosResult<TrialPhase> {
        let (max_iter, tol, verbosity) = self
            .options
            .unwrap_or(MAX_ITER_STABILITY, TOL_STABILITY);
        let mut ln_y = y.mapv(f64::ln);
        let mut moles = y.clone();
        let mut sum_moles = 1.0;

        log_iter!(verbosity, "{}", seed);
        log_iter!(verbosity, " iter |    residual    |   sum(Y)   ");
        log_iter!(verbosity, "{:-<36}", "");

        for i in 1..=max_iter {
            // successive substitution
            let trial = self.eos.phase_properties(
                pressure,
                temperature,
                &y,
                RootSelection::MinimumGibbsEnergy,
            )?;
            let ln_y_new = di - &trial.ln_phi;
            let error = Zip::from(&ln_y_new)
                .and(&ln_y)
                .and(feed)
                .fold(0.0, |acc, &new, &old, &z| {
                    if z > 0.0 {
                        acc + (new - old).powi(2)
                    } else {
                        acc
                    }
                });
            ln_y = ln_y_new;
            moles = ln_y.mapv(f64::exp);
            sum_moles = moles.sum();
            y = &moles / sum_moles;

            log_iter!(verbosity, " {:4} | {:14.8e} | {:10.8}", i, error, sum_moles);

            if is_trivial_solution(&y, feed) {
                return Ok(self.trial_phase(seed, y, moles, i, TrialStatus::Trivial));
            }
            if error < tol {
                let status = TrialStatus::from_sum_moles(sum_moles);
                return Ok(self.trial_phase(seed, y, moles, i, status));
            }
        }

        tracing::warn!(
            "stability analysis: trial phase ({}) did not converge in {} iterations (sum(Y) = {})",
            seed,
            max_iter,
            sum_moles
        );
        Ok(self.trial_phase(seed, y, moles, max_iter, TrialStatus::NotConverged))
    }

    fn trial_phase(
        &self,
        seed: TrialSeed,
        composition: Array1<f64>,
        moles: Array1<f64>,
        iterations: usize,
        status: TrialStatus,
    ) -> TrialPhase {
        let sum_moles = moles.sum();
        TrialPhase {
            seed,
            composition,
            moles,
            sum_moles,
            tpd: 1.0 - sum_moles,
            iterations,
            status,
        }
    }
}

/// # Stability analysis
impl<M: CubicModel> CubicEquationOfState<M> {
    /// Perform a stability test of the feed `z` at given pressure (Pa) and temperature (K).
    pub fn stability_test(
        &self,
        pressure: f64,
        temperature: f64,
        z: &Array1<f64>,
        options: SolverOptions,
    ) -> EosResult<StabilityResult> {
        StabilityAnalyzer::new(self, options).stability_test(pressure, temperature, z)
    }

    /// Perform a stability test of the mixture at its own feed composition.
    pub fn stability_test_feed(
        &self,
        pressure: f64,
        temperature: f64,
        options: SolverOptions,
    ) -> EosResult<StabilityResult> {
        StabilityAnalyzer::new(self, options).stability_test_feed(pressure, temperature)
    }

    /// Determine if the feed is stable, i.e. if a phase split should
    /// occur or not.
    pub fn is_stable(
        &self,
        pressure: f64,
        temperature: f64,
        z: &Array1<f64>,
        options: SolverOptions,
    ) -> EosResult<bool> {
        Ok(self
            .stability_test(pressure, temperature, z, options)?
            .is_stable())
    }
}
