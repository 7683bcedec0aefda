//! Generic two-parameter cubic equations of state.
//!
//! All cubic equations of state handled here share the pressure explicit form
//!
//! $p=\frac{RT}{v-b}-\frac{a(T)}{(v+\delta_1b)(v+\delta_2b)}$
//!
//! and differ only in the constants $\Omega_a$, $\Omega_b$, $\delta_1$, $\delta_2$
//! and in the temperature dependence $\alpha(T)$ of the attractive parameter.
//! These are provided by implementors of [CubicModel]; everything else (mixing
//! rules, root finding, root selection, fugacity coefficients) is implemented
//! once in [CubicEquationOfState].
use crate::errors::{EosError, EosResult};
use crate::mixture::{validate_composition, Mixture};
use crate::parameter::ParameterError;
use arrayvec::ArrayVec;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::fmt;
use std::sync::Arc;

mod roots;
pub use roots::solve_cubic;

/// Ideal gas constant in J/(mol K).
pub const RGAS: f64 = 8.31446261815324;

/// Phases with a total amount below this value are ignored in
/// [CubicEquationOfState::reduced_gibbs_energy].
const MIN_PHASE_AMOUNT: f64 = 1e-5;

/// Capabilities a specific cubic equation of state has to provide.
///
/// Only the constants and the alpha function are required. The cubic
/// polynomial and the departure functions follow from $\delta_1$ and
/// $\delta_2$ and have default implementations.
pub trait CubicModel: Send + Sync {
    /// Name of the equation of state.
    fn name(&self) -> &'static str;

    /// Constant of the attractive parameter at the critical point.
    fn omega_a(&self) -> f64;

    /// Constant of the covolume at the critical point.
    fn omega_b(&self) -> f64;

    /// The constants $(\delta_1, \delta_2)$ of the attractive term.
    fn delta(&self) -> (f64, f64);

    /// The alpha function $\alpha(\omega, T_r)$.
    fn alpha(&self, acentric_factor: f64, reduced_temperature: f64) -> f64;

    /// Coefficients $[c_2, c_1, c_0]$ of $Z^3+c_2Z^2+c_1Z+c_0=0$ for the
    /// dimensionless parameters $A=ap/(RT)^2$ and $B=bp/(RT)$.
    fn cubic_coefficients(&self, a: f64, b: f64) -> [f64; 3] {
        let (d1, d2) = self.delta();
        let s = d1 + d2;
        let p = d1 * d2;
        [
            (s - 1.0) * b - 1.0,
            a + p * b * b - s * b * (b + 1.0),
            -(a * b + p * b * b * (b + 1.0)),
        ]
    }

    /// Residual molar Gibbs energy $g^\mathrm{res}/RT$ of the phase with
    /// compressibility factor `z`.
    fn residual_gibbs_energy(&self, a: f64, b: f64, z: f64) -> f64 {
        z - 1.0 - (z - b).ln() - a / b * attraction_term(self.delta(), b, z)
    }

    /// Logarithmic fugacity coefficient of a component with
    /// `b_ratio` $=b_i/b$ and `a_ratio` $=2\sum_jx_ja_{ij}/a$.
    fn ln_fugacity_coefficient(&self, a: f64, b: f64, z: f64, b_ratio: f64, a_ratio: f64) -> f64 {
        b_ratio * (z - 1.0)
            - (z - b).ln()
            - a / b * (a_ratio - b_ratio) * attraction_term(self.delta(), b, z)
    }
}

/// $\frac{1}{\delta_1-\delta_2}\ln\frac{Z+\delta_1B}{Z+\delta_2B}$
fn attraction_term((d1, d2): (f64, f64), b: f64, z: f64) -> f64 {
    ((z + d1 * b) / (z + d2 * b)).ln() / (d1 - d2)
}

/// Rule to pick one of several admissible roots of the cubic equation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RootSelection {
    /// The root with the lowest Gibbs energy, i.e., the stable phase.
    #[default]
    MinimumGibbsEnergy,
    /// The smallest root.
    Liquid,
    /// The largest root.
    Vapor,
}

/// Mixture parameters at given temperature and composition.
#[derive(Clone, Debug)]
pub struct MixingParameters {
    /// Attractive parameter $a=\sum_i\sum_jx_ix_ja_{ij}$ in Pa m⁶/mol².
    pub a: f64,
    /// Covolume $b=\sum_ix_ib_i$ in m³/mol.
    pub b: f64,
    /// $\sum_jx_ja_{ij}$ for every component.
    pub a_i: Array1<f64>,
    /// Pure component covolumes $b_i$.
    pub b_i: Array1<f64>,
}

/// Compressibility factor and fugacity coefficients of a single phase.
#[derive(Clone, Debug)]
pub struct PhaseProperties {
    pub compressibility_factor: f64,
    pub ln_phi: Array1<f64>,
}

/// Dimensionless state of the cubic equation at given (p, T, x).
struct CubicState {
    a: f64,
    b: f64,
    b_ratio: Array1<f64>,
    a_ratio: Array1<f64>,
}

/// A cubic equation of state for a specific mixture.
///
/// The struct is read-only after construction and can be shared between
/// threads.
pub struct CubicEquationOfState<M> {
    model: M,
    mixture: Arc<Mixture>,
    k_ij: Array2<f64>,
    a_c: Array1<f64>,
    b: Array1<f64>,
}

impl<M: CubicModel> CubicEquationOfState<M> {
    /// Create the equation of state for a mixture.
    ///
    /// `k_ij` has to be symmetric with a zero diagonal. If it is omitted,
    /// all binary interaction parameters are zero.
    pub fn new(model: M, mixture: Arc<Mixture>, k_ij: Option<Array2<f64>>) -> EosResult<Self> {
        let n = mixture.components();
        let k_ij = k_ij.unwrap_or_else(|| Array2::zeros([n; 2]));
        if k_ij.dim() != (n, n) {
            return Err(ParameterError::IncompatibleParameters(format!(
                "binary interaction matrix of shape {:?} for {} components",
                k_ij.dim(),
                n
            ))
            .into());
        }
        for i in 0..n {
            if k_ij[[i, i]] != 0.0 {
                return Err(ParameterError::InvalidParameter("k_ii".into(), k_ij[[i, i]], i).into());
            }
            for j in i + 1..n {
                if !k_ij[[i, j]].is_finite() || k_ij[[i, j]] != k_ij[[j, i]] {
                    return Err(ParameterError::IncompatibleParameters(format!(
                        "binary interaction matrix is not symmetric: k_{0}{1} = {2}, k_{1}{0} = {3}",
                        i,
                        j,
                        k_ij[[i, j]],
                        k_ij[[j, i]]
                    ))
                    .into());
                }
            }
        }

        let (omega_a, omega_b) = (model.omega_a(), model.omega_b());
        let a_c = (mixture.tc() * RGAS).mapv(|rtc| rtc * rtc) / mixture.pc() * omega_a;
        let b = mixture.tc() * RGAS / mixture.pc() * omega_b;
        Ok(Self {
            model,
            mixture,
            k_ij,
            a_c,
            b,
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn mixture(&self) -> &Arc<Mixture> {
        &self.mixture
    }

    pub fn k_ij(&self) -> &Array2<f64> {
        &self.k_ij
    }

    pub fn components(&self) -> usize {
        self.b.len()
    }

    /// Temperature dependent attractive parameters $a_i(T)$ of the pure components.
    pub fn attractive_parameters(&self, temperature: f64) -> Array1<f64> {
        let tc = self.mixture.tc();
        let w = self.mixture.acentric_factor();
        Array1::from_shape_fn(self.components(), |i| {
            self.a_c[i] * self.model.alpha(w[i], temperature / tc[i])
        })
    }

    /// Covolumes $b_i$ of the pure components.
    pub fn covolumes(&self) -> &Array1<f64> {
        &self.b
    }

    /// Quadratic mixing rule for $a$ with geometric combining rule
    /// $a_{ij}=\sqrt{a_ia_j}(1-k_{ij})$ and linear mixing rule for $b$.
    pub fn mixing_rule(&self, temperature: f64, molefracs: ArrayView1<f64>) -> MixingParameters {
        let a_pure = self.attractive_parameters(temperature);
        let n = self.components();
        let a_ij = Array2::from_shape_fn([n, n], |(i, j)| {
            (a_pure[i] * a_pure[j]).sqrt() * (1.0 - self.k_ij[[i, j]])
        });
        let a_i = a_ij.dot(&molefracs);
        MixingParameters {
            a: molefracs.dot(&a_i),
            b: molefracs.dot(&self.b),
            a_i,
            b_i: self.b.clone(),
        }
    }

    fn cubic_state(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
    ) -> EosResult<CubicState> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(EosError::InvalidState(
                String::from("CubicEquationOfState"),
                String::from("temperature"),
                temperature,
            ));
        }
        if !(pressure.is_finite() && pressure > 0.0) {
            return Err(EosError::InvalidState(
                String::from("CubicEquationOfState"),
                String::from("pressure"),
                pressure,
            ));
        }
        validate_composition(molefracs, self.components())?;

        let mix = self.mixing_rule(temperature, molefracs.view());
        let rt = RGAS * temperature;
        Ok(CubicState {
            a: mix.a * pressure / (rt * rt),
            b: mix.b * pressure / rt,
            b_ratio: &mix.b_i / mix.b,
            a_ratio: mix.a_i * 2.0 / mix.a,
        })
    }

    /// Dimensionless parameters $A=ap/(RT)^2$ and $B=bp/(RT)$ of the mixture.
    pub fn dimensionless_parameters(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
    ) -> EosResult<(f64, f64)> {
        let state = self.cubic_state(pressure, temperature, molefracs)?;
        Ok((state.a, state.b))
    }

    fn admissible_roots(
        &self,
        state: &CubicState,
        pressure: f64,
        temperature: f64,
    ) -> EosResult<ArrayVec<f64, 3>> {
        let [c2, c1, c0] = self.model.cubic_coefficients(state.a, state.b);
        let roots: ArrayVec<f64, 3> = solve_cubic(c2, c1, c0)
            .into_iter()
            .filter(|&z| z > state.b)
            .collect();
        if roots.is_empty() {
            return Err(EosError::NoPhysicalRoot {
                temperature,
                pressure,
            });
        }
        Ok(roots)
    }

    fn select_root(&self, state: &CubicState, roots: &[f64], selection: RootSelection) -> f64 {
        match selection {
            RootSelection::Liquid => roots[0],
            RootSelection::Vapor => roots[roots.len() - 1],
            RootSelection::MinimumGibbsEnergy => roots
                .iter()
                .map(|&z| (z, self.model.residual_gibbs_energy(state.a, state.b, z)))
                .fold((roots[0], f64::INFINITY), |(z_min, g_min), (z, g)| {
                    if g < g_min {
                        (z, g)
                    } else {
                        (z_min, g_min)
                    }
                })
                .0,
        }
    }

    /// All roots of the cubic equation with $Z>B$ in ascending order.
    ///
    /// Fails with [EosError::NoPhysicalRoot] if there is no such root.
    pub fn compressibility_roots(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
    ) -> EosResult<ArrayVec<f64, 3>> {
        let state = self.cubic_state(pressure, temperature, molefracs)?;
        self.admissible_roots(&state, pressure, temperature)
    }

    /// Compressibility factor of the root picked by `selection`.
    pub fn compressibility_factor(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
        selection: RootSelection,
    ) -> EosResult<f64> {
        let state = self.cubic_state(pressure, temperature, molefracs)?;
        let roots = self.admissible_roots(&state, pressure, temperature)?;
        Ok(self.select_root(&state, &roots, selection))
    }

    /// Compressibility factor of the phase with the lowest Gibbs energy.
    ///
    /// If the cubic equation has three real roots, every root with $Z>B$ is
    /// compared by its residual Gibbs energy. Near the critical point the
    /// largest root is not necessarily the vapor.
    pub fn calculate_z_minimal_energy(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
    ) -> EosResult<f64> {
        self.compressibility_factor(
            pressure,
            temperature,
            molefracs,
            RootSelection::MinimumGibbsEnergy,
        )
    }

    /// Residual molar Gibbs energy $g^\mathrm{res}/RT$ for a given compressibility factor.
    pub fn residual_gibbs_energy(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
        compressibility_factor: f64,
    ) -> EosResult<f64> {
        let state = self.cubic_state(pressure, temperature, molefracs)?;
        Ok(self
            .model
            .residual_gibbs_energy(state.a, state.b, compressibility_factor))
    }

    fn ln_phi_from_state(&self, state: &CubicState, z: f64) -> Array1<f64> {
        Array1::from_shape_fn(self.components(), |i| {
            self.model.ln_fugacity_coefficient(
                state.a,
                state.b,
                z,
                state.b_ratio[i],
                state.a_ratio[i],
            )
        })
    }

    /// Logarithmic fugacity coefficients for a given compressibility factor.
    pub fn ln_phi(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
        compressibility_factor: f64,
    ) -> EosResult<Array1<f64>> {
        let state = self.cubic_state(pressure, temperature, molefracs)?;
        if compressibility_factor <= state.b {
            return Err(EosError::InvalidState(
                String::from("ln_phi"),
                String::from("compressibility factor"),
                compressibility_factor,
            ));
        }
        Ok(self.ln_phi_from_state(&state, compressibility_factor))
    }

    /// Fugacity coefficients for a given compressibility factor.
    pub fn fugacity_coefficients(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
        compressibility_factor: f64,
    ) -> EosResult<Array1<f64>> {
        Ok(self
            .ln_phi(pressure, temperature, molefracs, compressibility_factor)?
            .mapv(f64::exp))
    }

    /// Fugacities $f_i=\varphi_ix_ip$ in Pa for a given compressibility factor.
    ///
    /// Components with vanishing mole fraction have zero fugacity.
    pub fn calculate_fugacity(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
        compressibility_factor: f64,
    ) -> EosResult<Array1<f64>> {
        let phi = self.fugacity_coefficients(
            pressure,
            temperature,
            molefracs,
            compressibility_factor,
        )?;
        Ok(phi * molefracs * pressure)
    }

    /// Compressibility factor and logarithmic fugacity coefficients of a phase,
    /// evaluated with a single solution of the cubic equation.
    pub fn phase_properties(
        &self,
        pressure: f64,
        temperature: f64,
        molefracs: &Array1<f64>,
        selection: RootSelection,
    ) -> EosResult<PhaseProperties> {
        let state = self.cubic_state(pressure, temperature, molefracs)?;
        let roots = self.admissible_roots(&state, pressure, temperature)?;
        let z = self.select_root(&state, &roots, selection);
        Ok(PhaseProperties {
            compressibility_factor: z,
            ln_phi: self.ln_phi_from_state(&state, z),
        })
    }

    /// Reduced Gibbs energy $\sum_k\sum_in_{ki}\ln f_{ki}$ of a distribution of
    /// the components over several phases.
    ///
    /// Every row of `moles` contains the amounts of all components in one phase.
    /// Each phase is evaluated at its root of minimal Gibbs energy. Phases with a
    /// total amount below 1e-5 are skipped.
    pub fn reduced_gibbs_energy(
        &self,
        pressure: f64,
        temperature: f64,
        moles: &Array2<f64>,
    ) -> EosResult<f64> {
        if moles.ncols() != self.components() {
            return Err(EosError::IncompatibleComponents(
                self.components(),
                moles.ncols(),
            ));
        }
        let mut g = 0.0;
        for n in moles.axis_iter(Axis(0)) {
            let total = n.sum();
            if total < MIN_PHASE_AMOUNT {
                continue;
            }
            let x = &n / total;
            let phase = self.phase_properties(
                pressure,
                temperature,
                &x,
                RootSelection::MinimumGibbsEnergy,
            )?;
            for i in 0..self.components() {
                if n[i] > 0.0 {
                    g += n[i] * (phase.ln_phi[i] + x[i].ln() + pressure.ln());
                }
            }
        }
        Ok(g)
    }
}

impl<M: CubicModel> fmt::Display for CubicEquationOfState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} components)", self.model.name(), self.components())
    }
}
