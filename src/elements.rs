use core::f64::consts::TAU;

use glam::{DVec2, DVec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    radial_distance, InvalidEccentricityError, InvalidElementsError, InvalidPeriodError, Matrix3x2,
};

/// The classical orbital elements of one body, validated and immutable.
///
/// Angles that come from body tables (inclination, argument of periapsis,
/// longitude of ascending node) are in **degrees**. The mean anomaly at
/// epoch is in **radians**.
///
/// The rate at which the body moves is given by its orbital period, in
/// simulation time units. The mean motion is always derived from it as
/// `n = 2π / period`.
///
/// The transformation matrix that tilts the orbital plane into 3D is
/// computed once, on construction.
///
/// # Example
/// ```
/// use orrery_kepler::OrbitalElements;
///
/// let elements = OrbitalElements::new(
///     // Semi-major axis
///     1.00000011,
///
///     // Eccentricity
///     0.01671022,
///
///     // Inclination, in degrees
///     0.00005,
///
///     // Argument of periapsis, in degrees
///     102.94719,
///
///     // Longitude of ascending node, in degrees
///     0.0,
///
///     // Mean anomaly at epoch, in radians
///     0.0,
///
///     // Orbital period
///     1.0000174,
/// ).unwrap();
///
/// assert!(OrbitalElements::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "ElementsRepr", into = "ElementsRepr")
)]
pub struct OrbitalElements {
    /// The semi-major axis of the orbit.
    semi_major_axis: f64,

    /// The eccentricity of the orbit, in `[0, 1)`.
    eccentricity: f64,

    /// The inclination of the orbit, in degrees.
    inclination: f64,

    /// The argument of periapsis of the orbit, in degrees.
    arg_pe: f64,

    /// The longitude of ascending node of the orbit, in degrees.
    long_asc_node: f64,

    /// The mean anomaly at epoch, in radians.
    mean_anomaly: f64,

    /// The orbital period, in simulation time units.
    period: f64,

    /// The transformation matrix to tilt the 2D planar orbit into 3D space.
    transformation_matrix: Matrix3x2,
}

// Initialization
impl OrbitalElements {
    /// Creates a new set of orbital elements.
    ///
    /// # Parameters
    /// - `semi_major_axis`: The semi-major axis of the orbit.
    /// - `eccentricity`: The eccentricity of the orbit, in `[0, 1)`.
    /// - `inclination`: The inclination of the orbit, in degrees.
    /// - `arg_pe`: The argument of periapsis of the orbit, in degrees.
    /// - `long_asc_node`: The longitude of ascending node of the orbit, in degrees.
    /// - `mean_anomaly`: The mean anomaly of the orbit at epoch, in radians.
    /// - `period`: The orbital period, in simulation time units.
    ///
    /// # Errors
    /// Returns [`InvalidElementsError::Eccentricity`] if the eccentricity is
    /// negative, NaN, or at least 1, and [`InvalidElementsError::Period`] if
    /// the period is zero, infinite, or NaN.
    ///
    /// No other element is checked. A zero semi-major axis gives a
    /// degenerate orbit at the origin.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        arg_pe: f64,
        long_asc_node: f64,
        mean_anomaly: f64,
        period: f64,
    ) -> Result<Self, InvalidElementsError> {
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(InvalidEccentricityError { eccentricity }.into());
        }
        check_period(period)?;

        Ok(Self::new_unchecked(
            semi_major_axis,
            eccentricity,
            inclination,
            arg_pe,
            long_asc_node,
            mean_anomaly,
            period,
        ))
    }

    /// Creates a new set of orbital elements without checking the
    /// eccentricity or the period. Only for hardcoded tables.
    pub(crate) fn new_unchecked(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        arg_pe: f64,
        long_asc_node: f64,
        mean_anomaly: f64,
        period: f64,
    ) -> Self {
        debug_assert!((0.0..1.0).contains(&eccentricity));
        debug_assert!(check_period(period).is_ok());

        Self {
            semi_major_axis,
            eccentricity,
            inclination,
            arg_pe,
            long_asc_node,
            mean_anomaly,
            period,
            transformation_matrix: Self::compute_transformation_matrix(
                inclination,
                arg_pe,
                long_asc_node,
            ),
        }
    }

    /// Creates a new set of orbital elements from a mean motion instead of
    /// a period.
    ///
    /// The mean motion is in radians per simulation time unit, and is
    /// converted into a period as `2π / mean_motion`.
    ///
    /// # Errors
    /// Same as [`OrbitalElements::new`].
    pub fn with_mean_motion(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        arg_pe: f64,
        long_asc_node: f64,
        mean_anomaly: f64,
        mean_motion: f64,
    ) -> Result<Self, InvalidElementsError> {
        Self::new(
            semi_major_axis,
            eccentricity,
            inclination,
            arg_pe,
            long_asc_node,
            mean_anomaly,
            TAU / mean_motion,
        )
    }

    /// Creates a new set of orbital elements with no inclination.
    ///
    /// The orbit lies entirely in the XZ plane.
    ///
    /// # Errors
    /// Same as [`OrbitalElements::new`].
    pub fn new_flat(
        semi_major_axis: f64,
        eccentricity: f64,
        arg_pe: f64,
        mean_anomaly: f64,
        period: f64,
    ) -> Result<Self, InvalidElementsError> {
        Self::new(
            semi_major_axis,
            eccentricity,
            0.0,
            arg_pe,
            0.0,
            mean_anomaly,
            period,
        )
    }

    /// Creates a new circular orbit.
    ///
    /// A circular orbit has no periapsis to point at, so it can't fail
    /// the eccentricity check and doesn't take an argument of periapsis.
    ///
    /// # Errors
    /// Returns an [`InvalidPeriodError`] if the period is zero, infinite,
    /// or NaN.
    pub fn new_circular(
        radius: f64,
        inclination: f64,
        long_asc_node: f64,
        mean_anomaly: f64,
        period: f64,
    ) -> Result<Self, InvalidPeriodError> {
        check_period(period)?;

        Ok(Self::new_unchecked(
            radius,
            0.0,
            inclination,
            0.0,
            long_asc_node,
            mean_anomaly,
            period,
        ))
    }

    /// Builds the rotation from the perifocal plane into the Y-up frame.
    ///
    /// The rotation is the usual one: by the argument of periapsis within
    /// the plane, then by the inclination about the line of nodes, then by
    /// the longitude of ascending node about the reference pole.
    /// The reference pole is then mapped onto +Y, and the reference
    /// direction stays on +X.
    fn compute_transformation_matrix(
        inclination: f64,
        arg_pe: f64,
        long_asc_node: f64,
    ) -> Matrix3x2 {
        let (sin_inc, cos_inc) = inclination.to_radians().sin_cos();
        let (sin_arg_pe, cos_arg_pe) = arg_pe.to_radians().sin_cos();
        let (sin_lan, cos_lan) = long_asc_node.to_radians().sin_cos();

        // https://downloads.rene-schwarz.com/download/M001-Keplerian_Orbit_Elements_to_Cartesian_State_Vectors.pdf
        // Rows are X, Z (the pole, rendered as Y), then Y (rendered as Z).
        Matrix3x2 {
            e11: cos_arg_pe * cos_lan - sin_arg_pe * cos_inc * sin_lan,
            e12: -(sin_arg_pe * cos_lan + cos_arg_pe * cos_inc * sin_lan),

            e21: sin_arg_pe * sin_inc,
            e22: cos_arg_pe * sin_inc,

            e31: cos_arg_pe * sin_lan + sin_arg_pe * cos_inc * cos_lan,
            e32: cos_arg_pe * cos_inc * cos_lan - sin_arg_pe * sin_lan,
        }
    }
}

/// Both the period and the mean motion `2π / period` must be finite and
/// nonzero.
fn check_period(period: f64) -> Result<(), InvalidPeriodError> {
    let mean_motion = TAU / period;

    if period.is_finite() && mean_motion.is_finite() && mean_motion != 0.0 {
        Ok(())
    } else {
        Err(InvalidPeriodError { period })
    }
}

// Getters
impl OrbitalElements {
    /// Gets the semi-major axis of the orbit.
    #[inline]
    pub fn get_semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// Gets the eccentricity of the orbit.
    ///
    /// This is always in `[0, 1)`.
    #[inline]
    pub fn get_eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// Gets the inclination of the orbit, in degrees.
    #[inline]
    pub fn get_inclination(&self) -> f64 {
        self.inclination
    }

    /// Gets the argument of periapsis of the orbit, in degrees.
    #[inline]
    pub fn get_arg_pe(&self) -> f64 {
        self.arg_pe
    }

    /// Gets the longitude of ascending node of the orbit, in degrees.
    #[inline]
    pub fn get_long_asc_node(&self) -> f64 {
        self.long_asc_node
    }

    /// Gets the mean anomaly at epoch, in radians.
    #[inline]
    pub fn get_mean_anomaly_at_epoch(&self) -> f64 {
        self.mean_anomaly
    }

    /// Gets the orbital period, in simulation time units.
    #[inline]
    pub fn get_orbital_period(&self) -> f64 {
        self.period
    }

    /// Gets the mean motion, in radians per simulation time unit.
    ///
    /// `n = 2π / period`
    #[inline]
    pub fn get_mean_motion(&self) -> f64 {
        TAU / self.period
    }

    /// Gets the distance from the focus at periapsis, `a(1 - e)`.
    pub fn get_periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Gets the distance from the focus at apoapsis, `a(1 + e)`.
    pub fn get_apoapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Gets the semi-minor axis of the orbit, `a √(1 - e²)`.
    ///
    /// Learn more: <https://en.wikipedia.org/wiki/Semi-major_and_semi-minor_axes>
    pub fn get_semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    /// Gets the semi-latus rectum of the orbit, `a(1 - e²)`.
    ///
    /// Learn more: <https://en.wikipedia.org/wiki/Ellipse#Semi-latus_rectum>
    pub fn get_semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Gets the mean anomaly at a given simulation time.
    ///
    /// `M = M0 + n · speed · t`
    ///
    /// The mean anomaly accumulates linearly and is not wrapped.
    pub fn get_mean_anomaly_at_time(&self, t: f64, speed_multiplier: f64) -> f64 {
        self.mean_anomaly + self.get_mean_motion() * speed_multiplier * t
    }

    /// Gets the transformation matrix needed to tilt a 2D vector into the
    /// tilted orbital plane.
    ///
    /// # Example
    /// ```
    /// use orrery_kepler::{Matrix3x2, OrbitalElements};
    ///
    /// let elements = OrbitalElements::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0).unwrap();
    ///
    /// assert_eq!(elements.get_transformation_matrix(), Matrix3x2 {
    ///     e11: 1.0, e12: 0.0,
    ///     e21: 0.0, e22: 0.0,
    ///     e31: 0.0, e32: 1.0,
    /// });
    /// ```
    #[inline]
    pub fn get_transformation_matrix(&self) -> Matrix3x2 {
        self.transformation_matrix
    }

    /// Transforms a position from the perifocal coordinate (PQW) system into
    /// the 3D Y-up frame, using the orbital elements.
    ///
    /// # Perifocal Coordinate (PQW) System
    /// The perifocal coordinate (PQW) system is a frame of reference using
    /// the basis vectors p-hat, q-hat, and w-hat, where p-hat points to the
    /// periapsis, q-hat has a true anomaly 90 degrees more than p-hat, and
    /// w-hat points perpendicular to the orbital plane.
    ///
    /// Learn more: <https://en.wikipedia.org/wiki/Perifocal_coordinate_system>
    #[inline]
    pub fn transform_pqw_vector(&self, position: DVec2) -> DVec3 {
        self.transformation_matrix.dot_vec(position)
    }

    /// Gets the 2D position at a given true anomaly, in the perifocal
    /// coordinate (PQW) system.
    ///
    /// This is `(r cos ν, r sin ν)`, before any tilting.
    pub fn get_pqw_position_at_true_anomaly(&self, true_anomaly: f64) -> DVec2 {
        let radius = radial_distance(self.semi_major_axis, self.eccentricity, true_anomaly);
        let (sin, cos) = true_anomaly.sin_cos();

        DVec2::new(radius * cos, radius * sin)
    }

    /// Gets the 3D position at a given true anomaly.
    ///
    /// This needs no numerical solving, unlike the position at a time.
    ///
    /// # Example
    /// ```
    /// use glam::DVec3;
    ///
    /// use orrery_kepler::OrbitalElements;
    ///
    /// let elements = OrbitalElements::new_flat(100.0, 0.0, 0.0, 0.0, 1.0).unwrap();
    ///
    /// let pos = elements.get_position_at_true_anomaly(0.0);
    ///
    /// assert_eq!(pos, DVec3::new(100.0, 0.0, 0.0));
    /// ```
    #[doc(alias = "get_position_at_angle")]
    pub fn get_position_at_true_anomaly(&self, true_anomaly: f64) -> DVec3 {
        self.transform_pqw_vector(self.get_pqw_position_at_true_anomaly(true_anomaly))
    }

    /// Gets the unit normal of the orbital plane (the w-hat basis vector).
    pub fn get_orbit_normal(&self) -> DVec3 {
        let m = self.transformation_matrix;

        let p = DVec3::new(m.e11, m.e21, m.e31);
        let q = DVec3::new(m.e12, m.e22, m.e32);
        p.cross(q)
    }
}

/// The plain, unvalidated shape of [`OrbitalElements`] on the wire.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ElementsRepr {
    semi_major_axis: f64,
    eccentricity: f64,
    #[serde(default)]
    inclination: f64,
    #[serde(default)]
    arg_pe: f64,
    #[serde(default)]
    long_asc_node: f64,
    #[serde(default)]
    mean_anomaly: f64,
    period: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ElementsRepr> for OrbitalElements {
    type Error = InvalidElementsError;

    fn try_from(repr: ElementsRepr) -> Result<Self, Self::Error> {
        Self::new(
            repr.semi_major_axis,
            repr.eccentricity,
            repr.inclination,
            repr.arg_pe,
            repr.long_asc_node,
            repr.mean_anomaly,
            repr.period,
        )
    }
}

#[cfg(feature = "serde")]
impl From<OrbitalElements> for ElementsRepr {
    fn from(elements: OrbitalElements) -> Self {
        Self {
            semi_major_axis: elements.semi_major_axis,
            eccentricity: elements.eccentricity,
            inclination: elements.inclination,
            arg_pe: elements.arg_pe,
            long_asc_node: elements.long_asc_node,
            mean_anomaly: elements.mean_anomaly,
            period: elements.period,
        }
    }
}

impl Default for OrbitalElements {
    /// Creates a unit orbit.
    ///
    /// The unit orbit is a perfect circle of radius 1 and no "tilt",
    /// with a period of 1.
    fn default() -> Self {
        Self::new_unchecked(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0)
    }
}
