//! Structures used to build the input of a cubic equation of state.
//!
//! Pure component records only carry the critical data and the acentric factor.
//! Looking them up in a substance database is the job of the caller: the
//! records are plain `serde` structs that can be parsed from any JSON source.
use ndarray::Array2;
use std::collections::HashMap;
use thiserror::Error;

mod identifier;
mod model_record;

pub use identifier::{Identifier, IdentifierOption};
pub use model_record::{BinaryRecord, CubicRecord, PureRecord};

/// Build a symmetric matrix of binary interaction parameters from a list of records.
///
/// Pairs that are not contained in `binary_records` get a value of zero, and so does
/// the diagonal. Records can be given in either order of the two identifiers.
pub fn k_ij_from_records<M>(
    pure_records: &[PureRecord<M>],
    binary_records: &[BinaryRecord<Identifier, f64>],
    identifier_option: IdentifierOption,
) -> Result<Array2<f64>, ParameterError> {
    let binary_map: HashMap<(String, String), f64> = binary_records
        .iter()
        .filter_map(|br| {
            let id1 = br.id1.as_string(identifier_option);
            let id2 = br.id2.as_string(identifier_option);
            id1.and_then(|id1| id2.map(|id2| ((id1, id2), br.model_record)))
        })
        .collect();

    let ids = pure_records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.identifier.as_string(identifier_option).ok_or_else(|| {
                ParameterError::InsufficientInformation(format!(
                    "no identifier of type {:?} for pure record {}",
                    identifier_option, i
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let n = pure_records.len();
    Ok(Array2::from_shape_fn([n, n], |(i, j)| {
        if i == j {
            return 0.0;
        }
        binary_map
            .get(&(ids[i].clone(), ids[j].clone()))
            .or_else(|| binary_map.get(&(ids[j].clone(), ids[i].clone())))
            .copied()
            .unwrap_or_default()
    }))
}

/// Error type for incomplete parameter information and IO problems.
#[derive(Error, Debug)]
pub enum ParameterError {
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("Information missing: {0}")]
    InsufficientInformation(String),
    #[error("Incompatible parameters: {0}")]
    IncompatibleParameters(String),
    #[error("Invalid parameter {0} = {1} for component {2}.")]
    InvalidParameter(String, f64, usize),
}
