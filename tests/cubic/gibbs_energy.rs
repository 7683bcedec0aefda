use super::eos;
use approx::assert_relative_eq;
use gibbs::{EosError, RootSelection, SoaveRedlichKwong, SolverOptions};
use ndarray::{arr1, arr2, stack, Array1, Axis};
use std::error::Error;

#[test]
fn test_unstable_phase_lowers_gibbs_energy() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let (p, t) = (50e5, 277.6);
    let z = arr1(&[0.4, 0.6]);
    let result = eos.stability_test(p, t, &z, SolverOptions::default())?;
    let trial = result.minimum_tpd().ok_or("no candidate phase")?;

    let feed = z.clone().insert_axis(Axis(0));
    let g_feed = eos.reduced_gibbs_energy(p, t, &feed)?;
    for epsilon in [1e-4, 1e-3, 1e-2] {
        let incipient: Array1<f64> = &trial.composition * epsilon;
        let remainder = &z - &incipient;
        let split = stack![Axis(0), remainder, incipient];
        let g_split = eos.reduced_gibbs_energy(p, t, &split)?;
        assert!(g_split < g_feed);
    }
    Ok(())
}

#[test]
fn test_stable_feed_gibbs_energy() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let (p, t) = (50e5, 277.6);
    let z = arr1(&[0.1, 0.9]);
    let g_feed = eos.reduced_gibbs_energy(p, t, &z.clone().insert_axis(Axis(0)))?;
    // any small second phase raises the Gibbs energy of a stable feed
    for y1 in [0.02, 0.3, 0.6, 0.95] {
        let incipient = arr1(&[y1, 1.0 - y1]) * 1e-3;
        let remainder = &z - &incipient;
        let split = stack![Axis(0), remainder, incipient];
        assert!(eos.reduced_gibbs_energy(p, t, &split)? > g_feed);
    }
    Ok(())
}

#[test]
fn test_reduced_gibbs_energy() -> Result<(), Box<dyn Error>> {
    let eos = eos(SoaveRedlichKwong, &["methane", "propane"], true)?;
    let (p, t) = (100e5, 277.6);
    let single = arr2(&[[0.4, 0.6]]);
    let g = eos.reduced_gibbs_energy(p, t, &single)?;

    // sum of n ln f of the phase
    let x = arr1(&[0.4, 0.6]);
    let z = eos.compressibility_factor(p, t, &x, RootSelection::MinimumGibbsEnergy)?;
    let f = eos.calculate_fugacity(p, t, &x, z)?;
    assert_relative_eq!(g, x.dot(&f.mapv(f64::ln)), max_relative = 1e-12);

    // homogeneous of degree one in the mole numbers
    let halves = arr2(&[[0.2, 0.3], [0.2, 0.3]]);
    assert_relative_eq!(eos.reduced_gibbs_energy(p, t, &halves)?, g, max_relative = 1e-12);

    // vanishing phases are skipped
    let trace = arr2(&[[0.4, 0.6], [1e-7, 2e-7]]);
    assert_eq!(eos.reduced_gibbs_energy(p, t, &trace)?, g);

    assert!(matches!(
        eos.reduced_gibbs_energy(p, t, &arr2(&[[0.2, 0.3, 0.5]])),
        Err(EosError::IncompatibleComponents(2, 3))
    ));
    Ok(())
}
