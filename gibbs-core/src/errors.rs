use crate::parameter::ParameterError;
use thiserror::Error;

/// Error type for improperly defined states and parameters.
#[derive(Error, Debug)]
pub enum EosError {
    #[error("Invalid composition: {0}.")]
    InvalidComposition(String),
    #[error("No physical root (Z > B) of the cubic equation of state at T = {temperature} K and p = {pressure} Pa.")]
    NoPhysicalRoot { temperature: f64, pressure: f64 },
    #[error("Equation of state is initialized for {0} components while the input specifies {1} components.")]
    IncompatibleComponents(usize, usize),
    #[error("Invalid state in {0}: {1} = {2}.")]
    InvalidState(String, String, f64),
    #[error(transparent)]
    ParameterError(#[from] ParameterError),
}

/// Convenience type for `Result<T, EosError>`.
pub type EosResult<T> = Result<T, EosError>;
