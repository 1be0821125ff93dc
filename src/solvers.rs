use core::f64::consts::{PI, TAU};

use log::{trace, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    keplers_equation, keplers_equation_derivative, ConvergenceError, B, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TOLERANCE,
};

/// Where the Kepler solver starts iterating from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitialGuess {
    /// Start at `E₀ = M`.
    ///
    /// Exact for circular orbits, and good enough for the low
    /// eccentricities of planets.
    #[default]
    MeanAnomaly,

    /// Start at the "rational seed" of Tommasini and Olivieri.
    ///
    /// Usually a few iterations closer for very eccentric orbits.
    ///
    /// Source:
    /// "Two fast and accurate routines for solving the elliptic Kepler
    /// equation for all values of the eccentricity and mean anomaly"
    /// by Daniele Tommasini and David N. Olivieri,
    /// section 2.1.2, 'The "rational seed"'
    RationalSeed,
}

impl InitialGuess {
    /// Gets the starting eccentric anomaly for the given mean anomaly.
    pub fn seed(self, mean_anomaly: f64, eccentricity: f64) -> f64 {
        match self {
            InitialGuess::MeanAnomaly => mean_anomaly,
            InitialGuess::RationalSeed => rational_seed(mean_anomaly, eccentricity),
        }
    }
}

fn rational_seed(mean_anomaly: f64, eccentricity: f64) -> f64 {
    // The seed is only defined for 0 <= M <= pi, so use the symmetry
    // and periodicity of the eccentric anomaly to get there.
    // Equation 2 of the aforementioned paper.
    let wrapped = (mean_anomaly + PI).rem_euclid(TAU) - PI;
    let offset = mean_anomaly - wrapped;
    let sign = wrapped.signum();
    let m = wrapped.abs();

    // Equation 19:
    // E_0 = M + (4beM(pi - M)) / (8eM + 4e(e-pi) + pi^2)
    let seed = m
        + (4.0 * eccentricity * B * m * (PI - m))
            / (8.0 * eccentricity * m + 4.0 * eccentricity * (eccentricity - PI) + PI * PI);

    offset + sign * seed
}

/// A bounded Newton-Raphson solver for Kepler's equation.
///
/// Given a mean anomaly `M` and an eccentricity `0 ≤ e < 1`, it finds the
/// eccentric anomaly `E` such that `E - e sin E = M`.
///
/// # Bounded Iteration
/// The solver gives up after [`max_iterations`][Self::max_iterations] steps
/// and returns a [`ConvergenceError`] instead of looping forever.
///
/// Each Newton step is kept inside the interval `[M - e, M + e]`, which
/// always contains the root (because `|E - M| = e |sin E| ≤ e`). A step that
/// would leave the interval is replaced by a bisection step, which stops
/// the oscillation that plain Newton-Raphson shows for eccentricities close
/// to 1.
///
/// # Example
/// ```
/// use orrery_kepler::KeplerSolver;
///
/// let solver = KeplerSolver::default();
/// let (mean_anomaly, eccentricity) = (1.0, 0.5);
///
/// let ecc_anom = solver.solve(mean_anomaly, eccentricity).unwrap();
/// let residual = ecc_anom - eccentricity * ecc_anom.sin() - mean_anomaly;
///
/// assert!(residual.abs() < solver.tolerance());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerSolver {
    tolerance: f64,
    max_iterations: u32,
    initial_guess: InitialGuess,
}

impl KeplerSolver {
    /// Creates a solver with the given tolerance and iteration cap, starting
    /// from `E₀ = M`.
    pub const fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            initial_guess: InitialGuess::MeanAnomaly,
        }
    }

    /// Returns a copy of this solver with a different tolerance.
    #[must_use]
    pub const fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    /// Returns a copy of this solver with a different iteration cap.
    #[must_use]
    pub const fn with_max_iterations(self, max_iterations: u32) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Returns a copy of this solver with a different initial guess.
    #[must_use]
    pub const fn with_initial_guess(self, initial_guess: InitialGuess) -> Self {
        Self {
            initial_guess,
            ..self
        }
    }

    /// The largest accepted `|E - e sin E - M|`.
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The maximum number of Newton-Raphson steps.
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Where iteration starts from.
    pub const fn initial_guess(&self) -> InitialGuess {
        self.initial_guess
    }

    /// Solves Kepler's equation `E - e sin E = M` for the eccentric anomaly.
    ///
    /// The mean anomaly is used as-is. Callers propagating over long times
    /// should wrap it into `[0, 2π)` first, as
    /// [`OrbitPropagator`][crate::OrbitPropagator] does, or the residual may
    /// not be representable within the tolerance.
    ///
    /// # Unchecked Operation
    /// This function does not check that `0 ≤ e < 1`; that is checked when
    /// [`OrbitalElements`][crate::OrbitalElements] are built. Other
    /// eccentricities still terminate, but the result may be meaningless.
    ///
    /// # Errors
    /// Returns a [`ConvergenceError`] if the residual is still above the
    /// tolerance after the iteration cap, or if it stops being finite.
    pub fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, ConvergenceError> {
        // The root is always within e of the mean anomaly
        let mut lower = mean_anomaly - eccentricity;
        let mut upper = mean_anomaly + eccentricity;

        // Not `clamp`, which panics on NaN bounds
        let mut ecc_anom = self
            .initial_guess
            .seed(mean_anomaly, eccentricity)
            .max(lower.min(upper))
            .min(upper.max(lower));
        let mut residual = keplers_equation(mean_anomaly, ecc_anom, eccentricity);
        let mut iterations = 0;

        loop {
            if residual.abs() < self.tolerance {
                trace!(
                    "Kepler solve converged in {iterations} iterations (M = {mean_anomaly}, e = {eccentricity})"
                );
                return Ok(ecc_anom);
            }

            if iterations >= self.max_iterations || !residual.is_finite() {
                let err = ConvergenceError {
                    mean_anomaly,
                    eccentricity,
                    iterations,
                    residual,
                    tolerance: self.tolerance,
                };
                warn!("{err}");
                return Err(err);
            }

            // Shrink the bracket around the root
            if residual < 0.0 {
                lower = lower.max(ecc_anom);
            } else {
                upper = upper.min(ecc_anom);
            }

            let newton = ecc_anom - residual / keplers_equation_derivative(ecc_anom, eccentricity);
            ecc_anom = if newton > lower && newton < upper {
                newton
            } else {
                0.5 * (lower + upper)
            };

            residual = keplers_equation(mean_anomaly, ecc_anom, eccentricity);
            iterations += 1;
        }
    }
}

impl Default for KeplerSolver {
    /// Creates a solver with a tolerance of `1e-6`, at most 100 iterations,
    /// starting from `E₀ = M`.
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS)
    }
}
