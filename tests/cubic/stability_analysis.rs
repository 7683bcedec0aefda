use super::eos;
use approx::assert_relative_eq;
use gibbs::{
    CubicRecord, CubicEquationOfState, EosError, Mixture, PengRobinson1978, SoaveRedlichKwong,
    SolverOptions, StabilityAnalyzer, TrialStatus,
};
use ndarray::arr1;
use std::error::Error;
use std::sync::Arc;

const BAR: f64 = 1e5;

#[test]
fn test_methane_hydrogen_sulfide() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "hydrogen sulfide"], true)?;
    assert_eq!(eos.k_ij()[[0, 1]], 0.08);
    let (p, t) = (40.53 * BAR, 190.0);
    let options = SolverOptions::default();
    assert!(!eos.is_stable(p, t, &arr1(&[0.5, 0.5]), options)?);
    assert!(eos.is_stable(p, t, &arr1(&[0.9885, 0.0115]), options)?);
    // only reached from the cube root Wilson estimates: a methane rich liquid
    let result = eos.stability_test(p, t, &arr1(&[0.9813, 0.0187]), options)?;
    assert!(result.phase_split());
    assert!(result.candidates().iter().all(|c| c.composition[0] > 0.9));
    Ok(())
}

#[test]
fn test_ethane_nitrogen() -> Result<(), Box<dyn Error>> {
    let eos = eos(PengRobinson1978, &["ethane", "nitrogen"], true)?;
    let (p, t) = (76.0 * BAR, 270.0);
    let options = SolverOptions::default();
    assert!(eos.is_stable(p, t, &arr1(&[0.9, 0.1]), options)?);
    assert!(!eos.is_stable(p, t, &arr1(&[0.82, 0.18]), options)?);
    Ok(())
}

#[test]
fn test_methane_propane_pressure_dependence() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let t = 277.6;
    let options = SolverOptions::default();

    assert!(eos.is_stable(50.0 * BAR, t, &arr1(&[0.1, 0.9]), options)?);
    assert!(!eos.is_stable(50.0 * BAR, t, &arr1(&[0.4, 0.6]), options)?);

    // the same feed is stable at higher pressure
    assert!(eos.is_stable(100.0 * BAR, t, &arr1(&[0.4, 0.6]), options)?);
    assert!(!eos.is_stable(100.0 * BAR, t, &arr1(&[0.68, 0.32]), options)?);
    Ok(())
}

#[test]
fn test_methane_carbon_dioxide() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "carbon dioxide"], true)?;
    // The published reference table lists this feed as stable. That entry is a
    // typo: the feed is unstable with these parameters.
    assert!(!eos.is_stable(60.8 * BAR, 220.0, &arr1(&[0.8, 0.2]), SolverOptions::default())?);
    Ok(())
}

#[test]
fn test_ternary() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane", "pentane"], false)?;
    let (p, t) = (50.0 * BAR, 300.0);
    let options = SolverOptions::default();
    assert!(!eos.is_stable(p, t, &arr1(&[0.5, 0.2, 0.3]), options)?);
    assert!(eos.is_stable(p, t, &arr1(&[0.97, 0.02, 0.01]), options)?);
    assert!(!eos.is_stable(p, t, &arr1(&[0.9, 0.05, 0.05]), options)?);

    // one trial phase rich in each component
    let result = eos.stability_test(p, t, &arr1(&[0.5, 0.2, 0.3]), options)?;
    assert_eq!(result.trials().len(), 7);
    Ok(())
}

#[test]
fn test_candidate_phase() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let z = arr1(&[0.4, 0.6]);
    let result = eos.stability_test(50.0 * BAR, 277.6, &z, SolverOptions::default())?;
    assert_eq!(result.trials().len(), 6);
    assert!(result.not_converged().next().is_none());

    // several seeds end up in the same vapor-like minimum
    let candidates = result.candidates();
    assert_eq!(candidates.len(), 1);
    let vapor = candidates[0];
    assert_relative_eq!(vapor.composition[0], 0.8659, max_relative = 1e-4);
    assert_relative_eq!(vapor.sum_moles, 1.1672, max_relative = 1e-4);
    assert_relative_eq!(vapor.tpd, 1.0 - vapor.sum_moles);
    assert_relative_eq!(vapor.composition.sum(), 1.0, max_relative = 1e-12);
    assert_relative_eq!(
        vapor.moles,
        &vapor.composition * vapor.sum_moles,
        max_relative = 1e-12
    );
    let k = vapor.k_values(&z);
    assert!(k[0] > 1.0 && k[1] < 1.0);
    assert!(result
        .minimum_tpd()
        .is_some_and(|t| t.status == TrialStatus::Unstable));
    Ok(())
}

#[test]
fn test_stored_feed() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let z = arr1(&[0.4, 0.6]);
    let mixture = eos.mixture().with_composition(z.clone())?;
    let eos = CubicEquationOfState::new(SoaveRedlichKwong, Arc::new(mixture), Some(eos.k_ij().clone()))?;
    let options = SolverOptions::default();
    let stored = eos.stability_test_feed(50.0 * BAR, 277.6, options)?;
    let given = eos.stability_test(50.0 * BAR, 277.6, &z, options)?;
    assert!(stored.phase_split());
    assert_eq!(stored.trials().len(), given.trials().len());
    for (a, b) in stored.trials().iter().zip(given.trials()) {
        assert_eq!(a.status, b.status);
        assert_eq!(a.composition, b.composition);
    }
    let analyzer = StabilityAnalyzer::new(&eos, options);
    assert!(analyzer.stability_test_feed(100.0 * BAR, 277.6)?.is_stable());
    Ok(())
}

#[test]
fn test_trivial_solutions() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let z = arr1(&[0.1, 0.9]);
    let result = eos.stability_test(50.0 * BAR, 277.6, &z, SolverOptions::default())?;
    assert!(result.is_stable());
    for trial in result
        .trials()
        .iter()
        .filter(|t| t.status == TrialStatus::Trivial)
    {
        for (y, z) in trial.composition.iter().zip(z.iter()) {
            assert!((y / z).ln().abs() < 1e-4);
        }
        assert!(trial.tpd.abs() < 1e-6);
    }
    Ok(())
}

#[test]
fn test_idempotence() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "hydrogen sulfide"], true)?;
    let z = arr1(&[0.9813, 0.0187]);
    let analyzer = StabilityAnalyzer::new(&eos, SolverOptions::default());
    let first = analyzer.stability_test(40.53 * BAR, 190.0, &z)?;
    let second = analyzer.stability_test(40.53 * BAR, 190.0, &z)?;
    assert_eq!(first.phase_split(), second.phase_split());
    assert_eq!(first.trials().len(), second.trials().len());
    for (a, b) in first.trials().iter().zip(second.trials()) {
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.status, b.status);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.composition, b.composition);
    }
    Ok(())
}

#[test]
fn test_single_component() -> Result<(), Box<dyn Error>> {
    let mixture = Mixture::pure(CubicRecord::new(190.56, 45.99e5, 0.011))?;
    let eos = CubicEquationOfState::new(PengRobinson1978, Arc::new(mixture), None)?;
    // at the vapor pressure of methane
    let result = eos.stability_test(25e5, 170.0, &arr1(&[1.0]), SolverOptions::default())?;
    assert!(!result.phase_split());
    assert!(result.trials().is_empty());

    // a binary mixture with only one component present
    let eos = eos_binary()?;
    let result = eos.stability_test(76.0 * BAR, 270.0, &arr1(&[1.0, 0.0]), SolverOptions::default())?;
    assert!(!result.phase_split());
    assert!(result.trials().is_empty());
    Ok(())
}

fn eos_binary() -> Result<CubicEquationOfState<PengRobinson1978>, Box<dyn Error>> {
    eos(PengRobinson1978, &["ethane", "nitrogen"], true)
}

#[test]
fn test_absent_component() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane", "pentane"], false)?;
    let result = eos.stability_test(
        50.0 * BAR,
        300.0,
        &arr1(&[0.5, 0.5, 0.0]),
        SolverOptions::default(),
    )?;
    // no trial phase rich in the absent component
    assert_eq!(result.trials().len(), 6);
    for trial in result.trials() {
        assert_eq!(trial.moles[2], 0.0);
        assert_eq!(trial.composition[2], 0.0);
    }
    Ok(())
}

#[test]
fn test_not_converged() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let options = SolverOptions::new().max_iter(1);
    let result = eos.stability_test(50.0 * BAR, 277.6, &arr1(&[0.4, 0.6]), options)?;
    // unconverged trial phases are reported but do not decide
    assert!(result.not_converged().count() > 0);
    assert!(!result.phase_split());
    assert!(result.not_converged().all(|t| t.iterations == 1));
    Ok(())
}

#[test]
fn test_invalid_feed() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let options = SolverOptions::default();
    for z in [arr1(&[0.5, 0.6]), arr1(&[1.1, -0.1]), arr1(&[f64::NAN, 0.5])] {
        assert!(matches!(
            eos.stability_test(50.0 * BAR, 277.6, &z, options),
            Err(EosError::InvalidComposition(_))
        ));
    }
    assert!(matches!(
        eos.stability_test(50.0 * BAR, 277.6, &arr1(&[0.2, 0.3, 0.5]), options),
        Err(EosError::IncompatibleComponents(2, 3))
    ));
    assert!(matches!(
        eos.stability_test(-50.0 * BAR, 277.6, &arr1(&[0.4, 0.6]), options),
        Err(EosError::InvalidState(_, _, _))
    ));
    Ok(())
}

#[test]
fn test_serialize_result() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let result = eos.stability_test(50.0 * BAR, 277.6, &arr1(&[0.4, 0.6]), SolverOptions::default())?;
    let json = serde_json::to_value(&result)?;
    assert_eq!(json["phase_split"], true);
    assert_eq!(json["trials"][0]["seed"], "WilsonVapor");
    Ok(())
}
