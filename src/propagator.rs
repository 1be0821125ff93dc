use glam::DVec3;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    anomaly::wrap_angle, radial_distance, true_anomaly, ConvergenceError, KeplerSolver,
    OrbitCurve, OrbitalElements, SimulationClock,
};

/// Everything the propagator works out for one body at one time.
///
/// Useful for renderers that display the anomalies next to the body.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitState {
    /// The mean anomaly, wrapped into `[0, 2π)`.
    pub mean_anomaly: f64,
    /// The eccentric anomaly, in radians.
    pub eccentric_anomaly: f64,
    /// The true anomaly, in `(-π, π]`.
    pub true_anomaly: f64,
    /// The distance from the focus.
    pub radius: f64,
    /// The 3D position in the Y-up frame.
    pub position: DVec3,
}

/// Turns orbital elements into positions.
///
/// The propagator holds nothing but its [`KeplerSolver`] configuration.
/// Every method is a pure function of its arguments, so a single
/// propagator can be shared between threads and bodies.
///
/// # Example
/// ```
/// use orrery_kepler::{OrbitalElements, OrbitPropagator};
///
/// let earth = OrbitalElements::new(1.0, 0.0167, 0.0, 0.0, 0.0, 0.0, 1.0).unwrap();
/// let propagator = OrbitPropagator::default();
///
/// let position = propagator.position_at(&earth, 0.0, 1.0).unwrap();
///
/// // At t = 0 the body sits at periapsis
/// assert!((position.length() - 0.9833).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitPropagator {
    solver: KeplerSolver,
}

impl OrbitPropagator {
    /// Creates a propagator that uses the given solver.
    pub const fn with_solver(solver: KeplerSolver) -> Self {
        Self { solver }
    }

    /// Gets the solver used by this propagator.
    pub const fn solver(&self) -> &KeplerSolver {
        &self.solver
    }

    /// Gets the eccentric anomaly at a given mean anomaly.
    ///
    /// The mean anomaly is wrapped into `[0, 2π)` before solving, so the
    /// result is in roughly the same range.
    ///
    /// # Errors
    /// Returns a [`ConvergenceError`] if Kepler's equation can't be solved
    /// within the solver's iteration cap.
    pub fn eccentric_anomaly_at_mean_anomaly(
        &self,
        elements: &OrbitalElements,
        mean_anomaly: f64,
    ) -> Result<f64, ConvergenceError> {
        self.solver
            .solve(wrap_angle(mean_anomaly), elements.get_eccentricity())
    }

    /// Gets the 3D position at a given mean anomaly.
    ///
    /// # Errors
    /// Returns a [`ConvergenceError`] if Kepler's equation can't be solved
    /// within the solver's iteration cap.
    pub fn position_at_mean_anomaly(
        &self,
        elements: &OrbitalElements,
        mean_anomaly: f64,
    ) -> Result<DVec3, ConvergenceError> {
        let ecc_anom = self.eccentric_anomaly_at_mean_anomaly(elements, mean_anomaly)?;
        let true_anom = true_anomaly(ecc_anom, elements.get_eccentricity());

        Ok(elements.get_position_at_true_anomaly(true_anom))
    }

    /// Gets the 3D position of a body at a given simulation time.
    ///
    /// The mean anomaly is `M0 + n · speed · t`, where `n = 2π / period`.
    /// It is wrapped, solved for the eccentric anomaly, converted into the
    /// true anomaly and focal distance, and rotated out of the orbital plane.
    ///
    /// Calling this twice with the same arguments gives bit-identical results.
    ///
    /// # Errors
    /// Returns a [`ConvergenceError`] if Kepler's equation can't be solved
    /// within the solver's iteration cap.
    pub fn position_at(
        &self,
        elements: &OrbitalElements,
        t: f64,
        speed_multiplier: f64,
    ) -> Result<DVec3, ConvergenceError> {
        self.position_at_mean_anomaly(
            elements,
            elements.get_mean_anomaly_at_time(t, speed_multiplier),
        )
    }

    /// Gets the 3D position of a body at the clock's
    /// [orbital time][SimulationClock::orbital_time].
    ///
    /// The speed multiplier is already folded into the orbital time, so a
    /// speed change on the clock doesn't move the body until the next tick.
    ///
    /// # Errors
    /// Same as [`position_at`][Self::position_at].
    pub fn position_at_clock(
        &self,
        elements: &OrbitalElements,
        clock: &SimulationClock,
    ) -> Result<DVec3, ConvergenceError> {
        self.position_at(elements, clock.orbital_time(), 1.0)
    }

    /// Gets the anomalies, focal distance and position of a body at a
    /// given simulation time.
    ///
    /// The position is the same as [`position_at`][Self::position_at]'s.
    ///
    /// # Errors
    /// Same as [`position_at`][Self::position_at].
    pub fn state_at(
        &self,
        elements: &OrbitalElements,
        t: f64,
        speed_multiplier: f64,
    ) -> Result<OrbitState, ConvergenceError> {
        let eccentricity = elements.get_eccentricity();
        let mean_anomaly = wrap_angle(elements.get_mean_anomaly_at_time(t, speed_multiplier));
        let eccentric_anomaly = self.solver.solve(mean_anomaly, eccentricity)?;
        let true_anomaly = true_anomaly(eccentric_anomaly, eccentricity);

        Ok(OrbitState {
            mean_anomaly,
            eccentric_anomaly,
            true_anomaly,
            radius: radial_distance(elements.get_semi_major_axis(), eccentricity, true_anomaly),
            position: elements.get_position_at_true_anomaly(true_anomaly),
        })
    }

    /// Samples the whole orbit as a closed polyline of `steps` points.
    ///
    /// The mean anomaly is spread evenly over `[0, 2π)`. Points are therefore
    /// evenly spaced in *time*, which bunches them up near apoapsis; this is
    /// a drawing aid, not an ephemeris.
    ///
    /// The last point is adjacent to the first one; the first point is not
    /// repeated at the end.
    ///
    /// # Errors
    /// Returns the first [`ConvergenceError`] met while sampling.
    ///
    /// # Example
    /// ```
    /// use orrery_kepler::{OrbitalElements, OrbitPropagator, DEFAULT_ORBIT_STEPS};
    ///
    /// let elements = OrbitalElements::new(1.5, 0.3, 10.0, 45.0, 20.0, 0.0, 2.0).unwrap();
    /// let points = OrbitPropagator::default()
    ///     .sample_orbit(&elements, DEFAULT_ORBIT_STEPS)
    ///     .unwrap();
    ///
    /// assert_eq!(points.len(), 360);
    /// ```
    pub fn sample_orbit(
        &self,
        elements: &OrbitalElements,
        steps: usize,
    ) -> Result<Vec<DVec3>, ConvergenceError> {
        let points = self.orbit_curve(elements, steps).collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Sampled {} orbit points (a = {}, e = {})",
            points.len(),
            elements.get_semi_major_axis(),
            elements.get_eccentricity()
        );

        Ok(points)
    }

    /// Gets a lazy iterator over the points of the orbit curve.
    ///
    /// See [`sample_orbit`][Self::sample_orbit] for how points are placed.
    pub fn orbit_curve<'a>(&self, elements: &'a OrbitalElements, steps: usize) -> OrbitCurve<'a> {
        OrbitCurve::new(*self, elements, steps)
    }
}
