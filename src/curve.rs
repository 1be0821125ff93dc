use core::{f64::consts::TAU, iter::FusedIterator};

use glam::DVec3;

use crate::{ConvergenceError, OrbitPropagator, OrbitalElements};

/// A lazy, finite iterator over the points of an orbit curve.
///
/// Yields `steps` positions, one for each mean anomaly
/// `M_k = 2π k / steps`, for `k` in `0..steps`.
///
/// The curve is geometry, not a trajectory: it doesn't depend on time or
/// the mean anomaly at epoch. It can be restarted, or cloned to walk it again
/// from where the clone was taken.
///
/// Created by [`OrbitPropagator::orbit_curve`].
///
/// # Example
/// ```
/// use orrery_kepler::{OrbitalElements, OrbitPropagator};
///
/// let elements = OrbitalElements::default();
/// let mut curve = OrbitPropagator::default().orbit_curve(&elements, 4);
///
/// let first: Vec<_> = curve.by_ref().collect::<Result<_, _>>().unwrap();
/// curve.restart();
/// let second: Vec<_> = curve.collect::<Result<_, _>>().unwrap();
///
/// assert_eq!(first.len(), 4);
/// assert_eq!(first, second);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitCurve<'a> {
    propagator: OrbitPropagator,
    elements: &'a OrbitalElements,
    steps: usize,
    index: usize,
}

impl<'a> OrbitCurve<'a> {
    pub(crate) fn new(
        propagator: OrbitPropagator,
        elements: &'a OrbitalElements,
        steps: usize,
    ) -> Self {
        Self {
            propagator,
            elements,
            steps,
            index: 0,
        }
    }

    /// Goes back to the first point of the curve.
    pub fn restart(&mut self) {
        self.index = 0;
    }

    /// The total number of points in the curve.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The mean anomaly of the `index`th point of the curve.
    fn mean_anomaly_of(&self, index: usize) -> f64 {
        (index as f64 / self.steps as f64) * TAU
    }
}

impl Iterator for OrbitCurve<'_> {
    type Item = Result<DVec3, ConvergenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.steps {
            return None;
        }

        let mean_anomaly = self.mean_anomaly_of(self.index);
        self.index += 1;

        Some(
            self.propagator
                .position_at_mean_anomaly(self.elements, mean_anomaly),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OrbitCurve<'_> {}

impl FusedIterator for OrbitCurve<'_> {}

/// Samples the orbit curves of many bodies in parallel.
///
/// Results are in the same order as `elements`. Each curve succeeds or
/// fails on its own.
#[cfg(feature = "rayon")]
pub fn sample_orbits_par(
    propagator: &OrbitPropagator,
    elements: &[OrbitalElements],
    steps: usize,
) -> Vec<Result<Vec<DVec3>, ConvergenceError>> {
    use rayon::prelude::*;

    elements
        .par_iter()
        .map(|elements| propagator.sample_orbit(elements, steps))
        .collect()
}
