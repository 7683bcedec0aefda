//! Phase stability analysis of fluid mixtures with cubic equations of state.
//!
//! A feed at given pressure, temperature and composition is tested for
//! stability with the tangent plane distance criterion of Michelsen.
//! Fugacity coefficients are provided by the Peng-Robinson (1978) or
//! Soave-Redlich-Kwong equation of state.
//!
//! ```
//! use gibbs::{CubicEquationOfState, Mixture, SoaveRedlichKwong, SolverOptions};
//! use ndarray::{arr1, arr2};
//! use std::sync::Arc;
//!
//! # fn main() -> gibbs::EosResult<()> {
//! // methane / propane
//! let mixture = Mixture::new(
//!     arr1(&[0.4, 0.6]),
//!     arr1(&[190.56, 369.83]),
//!     arr1(&[45.99e5, 42.48e5]),
//!     arr1(&[0.011, 0.152]),
//! )?;
//! let k_ij = arr2(&[[0.0, 0.029], [0.029, 0.0]]);
//! let eos = CubicEquationOfState::new(SoaveRedlichKwong, Arc::new(mixture), Some(k_ij))?;
//! let result = eos.stability_test(50e5, 277.6, &arr1(&[0.4, 0.6]), SolverOptions::default())?;
//! assert!(result.phase_split());
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all)]

pub use gibbs_core as core;

pub mod cubic;
pub use cubic::{CubicVariant, PengRobinson1978, SoaveRedlichKwong};

pub use gibbs_core::parameter::{BinaryRecord, CubicRecord, Identifier, PureRecord};
pub use gibbs_core::{
    CubicEquationOfState, CubicModel, EosError, EosResult, Mixture, RootSelection, SolverOptions,
    StabilityAnalyzer, StabilityResult, TrialPhase, TrialSeed, TrialStatus, Verbosity,
};
