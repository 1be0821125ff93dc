//! # Keplerian Orbit Propagation
//! This library crate contains the orbital core of an animated solar-system
//! visualization: given a body's classical orbital elements and a simulation
//! time, it computes where the body is, and it traces the closed curve of the
//! body's whole orbit so a renderer can draw it.
//!
//! Keplerian propagation doesn't step through time. The position at any time
//! is computed directly from the elements, by solving Kepler's equation
//! `E - e sin E = M` for the eccentric anomaly `E`, converting it into the
//! true anomaly, and rotating the resulting point out of the orbital plane.
//! Calling it twice with the same inputs gives bit-identical results, and
//! nothing is carried over from one frame to the next.
//!
//! Only closed (elliptic) orbits are supported: `0 ≤ e < 1`. The orbital
//! period must be finite and nonzero.
//!
//! ## Getting started
//! - [`OrbitalElements`]: The validated, immutable elements of one body.
//! - [`KeplerSolver`]: A bounded Newton-Raphson solver for Kepler's equation.
//! - [`OrbitPropagator`]: Turns elements and a time into a position, and
//!   elements into a sampled orbit curve.
//! - [`SimulationClock`]: The time source, advanced once per render tick.
//! - [`SolarSystem`]: A list of [`Body`]s driven by one clock.
//!
//! Bodies can be loaded from a JSON table with the `catalog` module
//! (`serde` feature, on by default), or taken from [`body_presets`].
//!
//! ## Frame
//! Positions are [`DVec3`]s centered on the primary, with **Y as the
//! out-of-plane axis**. An orbit with no inclination lies in the XZ plane,
//! with periapsis along +X when the argument of periapsis and the longitude
//! of the ascending node are zero.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//!
//! use orrery_kepler::{OrbitalElements, OrbitPropagator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // A circular orbit with a radius of 1 and a period of 1
//! let elements = OrbitalElements::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0)?;
//! let propagator = OrbitPropagator::default();
//!
//! let position = propagator.position_at(&elements, 0.0, 1.0)?;
//! assert_eq!(position, DVec3::new(1.0, 0.0, 0.0));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod anomaly;
mod body;
pub mod body_presets;
#[cfg(feature = "serde")]
pub mod catalog;
mod clock;
mod curve;
mod elements;
mod error;
mod propagator;
mod solvers;
mod system;

pub use anomaly::{
    eccentric_anomaly_at_true_anomaly, mean_anomaly_at_eccentric_anomaly, radial_distance,
    true_anomaly,
};
pub use body::{Body, BodyClass};
pub use clock::SimulationClock;
#[cfg(feature = "rayon")]
pub use curve::sample_orbits_par;
pub use curve::OrbitCurve;
pub use elements::OrbitalElements;
#[cfg(feature = "serde")]
pub use error::CatalogError;
pub use error::{
    BodyAddError, ConvergenceError, InvalidEccentricityError, InvalidElementsError,
    InvalidPeriodError,
};
pub use propagator::{OrbitPropagator, OrbitState};
pub use solvers::{InitialGuess, KeplerSolver};
pub use system::SolarSystem;

use glam::{DVec2, DVec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The default convergence tolerance of the Kepler solver.
///
/// The solver stops once `|E - e sin E - M|` is below this value.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// The default maximum number of solver iterations.
///
/// This is used to prevent infinite loops in case the method fails to converge.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// The default number of samples in an orbit curve.
pub const DEFAULT_ORBIT_STEPS: usize = 360;

/// A constant used to get the "rational seed" for the eccentric anomaly.
///
/// It's very arbitrary, but according to some testing, a value just
/// below 1 works better than exactly 1.
///
/// Source:
/// "Two fast and accurate routines for solving the elliptic Kepler
/// equation for all values of the eccentricity and mean anomaly"
/// by Daniele Tommasini and David N. Olivieri,
/// section 2.1.2, 'The "rational seed"'
///
/// <https://doi.org/10.1051/0004-6361/202141423>
const B: f64 = 0.999999;

/// A struct representing a 3x2 matrix.
///
/// This struct is used to store the transformation matrix
/// for transforming a 2D vector in the orbital plane into a 3D vector.
///
/// Namely, it is used in
/// [`OrbitalElements::transform_pqw_vector`] to tilt a 2D
/// position into 3D, using the orbital elements.
///
/// Each element is named `eXY`, where `X` is the row and `Y` is the column.
/// Rows are in render order: X, then the out-of-plane Y, then Z.
///
/// # Example
/// ```
/// use glam::{DVec2, DVec3};
///
/// use orrery_kepler::Matrix3x2;
///
/// let matrix = Matrix3x2 {
///    e11: 1.0, e12: 0.0,
///    e21: 0.0, e22: 0.0,
///    e31: 0.0, e32: 1.0,
/// };
///
/// let vec = DVec2::new(1.0, 2.0);
///
/// let result = matrix.dot_vec(vec);
///
/// assert_eq!(result, DVec3::new(1.0, 0.0, 2.0));
/// ```
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix3x2 {
    // Element XY
    pub e11: f64,
    pub e12: f64,
    pub e21: f64,
    pub e22: f64,
    pub e31: f64,
    pub e32: f64,
}

impl Matrix3x2 {
    /// Computes a dot product between this matrix and a 2D vector.
    ///
    /// # Example
    /// ```
    /// use glam::{DVec2, DVec3};
    ///
    /// use orrery_kepler::Matrix3x2;
    ///
    /// let matrix = Matrix3x2 {
    ///     e11: 1.0, e12: 0.0,
    ///     e21: 1.0, e22: 1.0,
    ///     e31: 0.0, e32: 1.0,
    /// };
    ///
    /// let vec = DVec2::new(1.0, 2.0);
    ///
    /// let result = matrix.dot_vec(vec);
    ///
    /// assert_eq!(result, DVec3::new(1.0, 3.0, 2.0));
    /// ```
    pub fn dot_vec(&self, vec: DVec2) -> DVec3 {
        DVec3::new(
            vec.x * self.e11 + vec.y * self.e12,
            vec.x * self.e21 + vec.y * self.e22,
            vec.x * self.e31 + vec.y * self.e32,
        )
    }
}

#[cfg(test)]
mod tests;

#[inline]
fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - (eccentricity * eccentric_anomaly.sin()) - mean_anomaly
}
#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - (eccentricity * eccentric_anomaly.cos())
}
