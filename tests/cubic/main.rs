use gibbs::core::parameter::{k_ij_from_records, IdentifierOption};
use gibbs::{BinaryRecord, CubicEquationOfState, CubicModel, CubicRecord, Identifier, Mixture, PureRecord};
use ndarray::Array1;
use std::error::Error;
use std::fs;
use std::sync::Arc;

mod gibbs_energy;
mod stability_analysis;

/// Cubic equation of state for the given substances of `tests/cubic/test_parameters.json`.
///
/// Binary interaction parameters are read from `tests/cubic/test_binary_parameters.json`
/// if `binary` is set, otherwise they are zero.
pub fn eos<M: CubicModel>(
    model: M,
    substances: &[&str],
    binary: bool,
) -> Result<CubicEquationOfState<M>, Box<dyn Error>> {
    let records = PureRecord::<CubicRecord>::from_json_str(&fs::read_to_string(
        "tests/cubic/test_parameters.json",
    )?)?;
    let records = substances
        .iter()
        .map(|&s| {
            records
                .iter()
                .find(|r| r.identifier.name.as_deref() == Some(s))
                .cloned()
                .ok_or_else(|| format!("no parameters for {s}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let k_ij = if binary {
        let binary_records: Vec<BinaryRecord<Identifier, f64>> = serde_json::from_str(
            &fs::read_to_string("tests/cubic/test_binary_parameters.json")?,
        )?;
        Some(k_ij_from_records(
            &records,
            &binary_records,
            IdentifierOption::Name,
        )?)
    } else {
        None
    };
    let n = records.len();
    let mixture = Mixture::from_records(&records, Array1::from_elem(n, 1.0 / n as f64))?;
    Ok(CubicEquationOfState::new(model, Arc::new(mixture), k_ij)?)
}
