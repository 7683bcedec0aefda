#![warn(clippy::all)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]

#[doc(hidden)]
pub use tracing;

/// Log messages with level `Verbosity::Iter` or higher.
#[macro_export]
macro_rules! log_iter {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Iter {
            $crate::tracing::debug!($($arg)*);
        }
    }
}

/// Log messages with level `Verbosity::Result` or higher.
#[macro_export]
macro_rules! log_result {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::Verbosity::Result {
            $crate::tracing::info!($($arg)*);
        }
    }
}

pub mod cubic;
mod errors;
pub mod mixture;
pub mod parameter;
pub mod phase_equilibria;

pub use cubic::{CubicEquationOfState, CubicModel, PhaseProperties, RootSelection, RGAS};
pub use errors::{EosError, EosResult};
pub use mixture::Mixture;
pub use phase_equilibria::{
    SolverOptions, StabilityAnalyzer, StabilityResult, TrialPhase, TrialSeed, TrialStatus,
    Verbosity,
};
