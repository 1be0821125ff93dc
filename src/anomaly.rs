//! Conversions between the mean, eccentric, and true anomalies, and the
//! focal distance at a given true anomaly.
//!
//! These are free functions of the eccentricity alone; none of them need
//! the rest of the orbital elements.

use core::f64::consts::TAU;

/// Gets the true anomaly at a given eccentric anomaly.
///
/// The true anomaly is the angle between the direction of periapsis
/// and the current position of the body, as seen from the main focus
/// of the ellipse.
///
/// \- [Wikipedia](https://en.wikipedia.org/wiki/True_anomaly)
///
/// Any eccentric anomaly is accepted; it is wrapped into `(-π, π]` first,
/// and the result is in the same range. The function is odd in the
/// eccentric anomaly: `true_anomaly(-E, e) == -true_anomaly(E, e)`.
///
/// # Unchecked Operation
/// This function does not check that `0 ≤ e < 1`. Other eccentricities
/// produce NaNs or nonsensical values.
///
/// # Example
/// ```
/// use std::f64::consts::PI;
///
/// use orrery_kepler::true_anomaly;
///
/// // Periapsis and apoapsis are where all three anomalies agree
/// assert_eq!(true_anomaly(0.0, 0.5), 0.0);
/// assert!((true_anomaly(PI, 0.5) - PI).abs() < 1e-12);
/// ```
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    // https://en.wikipedia.org/wiki/True_anomaly#From_the_eccentric_anomaly
    //
    // tan(v / 2) = sqrt((1 + e) / (1 - e)) * tan(E / 2)
    //
    // Splitting the fraction over atan2 keeps the quadrant of v / 2, so
    // E = +/- pi doesn't blow up the tangent.
    // E is wrapped first so that v / 2 stays within (-pi/2, pi/2].
    let eccentric_anomaly = wrap_signed(eccentric_anomaly);
    let (sin_half, cos_half) = (eccentric_anomaly * 0.5).sin_cos();

    2.0 * ((1.0 + eccentricity).sqrt() * sin_half).atan2((1.0 - eccentricity).sqrt() * cos_half)
}

/// Gets the distance from the focus at a given true anomaly.
///
/// `r = a(1 - e²) / (1 + e cos ν)`
///
/// At periapsis (`ν = 0`) this is `a(1 - e)`, and at apoapsis (`ν = π`)
/// it is `a(1 + e)`.
///
/// A semi-major axis of zero simply yields zero.
///
/// # Example
/// ```
/// use std::f64::consts::PI;
///
/// use orrery_kepler::radial_distance;
///
/// let periapsis = radial_distance(2.0, 0.5, 0.0);
/// let apoapsis = radial_distance(2.0, 0.5, PI);
///
/// assert!((periapsis - 1.0).abs() < 1e-12);
/// assert!((apoapsis - 3.0).abs() < 1e-12);
/// ```
pub fn radial_distance(semi_major_axis: f64, eccentricity: f64, true_anomaly: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity * eccentricity)
        / (1.0 + eccentricity * true_anomaly.cos())
}

/// Gets the mean anomaly at a given eccentric anomaly.
///
/// This is Kepler's equation evaluated forwards, and is exact:
///
/// `M = E - e sin E`
///
/// The result is not wrapped.
pub fn mean_anomaly_at_eccentric_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    // https://en.wikipedia.org/wiki/Kepler%27s_equation#Equation
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// Gets the eccentric anomaly at a given true anomaly.
///
/// This is the inverse of [`true_anomaly`], for the same eccentricity.
/// The true anomaly is first wrapped into `(-π, π]`, and so is the result.
///
/// # Example
/// ```
/// use orrery_kepler::{eccentric_anomaly_at_true_anomaly, true_anomaly};
///
/// let e = 0.3;
/// let ecc_anom = 1.2;
/// let back = eccentric_anomaly_at_true_anomaly(true_anomaly(ecc_anom, e), e);
///
/// assert!((back - ecc_anom).abs() < 1e-12);
/// ```
pub fn eccentric_anomaly_at_true_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    // https://en.wikipedia.org/wiki/Eccentric_anomaly#From_the_true_anomaly
    //
    // tan(E / 2) = sqrt((1 - e) / (1 + e)) * tan(v / 2)
    let true_anomaly = wrap_signed(true_anomaly);
    let (sin_half, cos_half) = (true_anomaly * 0.5).sin_cos();

    2.0 * ((1.0 - eccentricity).sqrt() * sin_half).atan2((1.0 + eccentricity).sqrt() * cos_half)
}

/// Wraps an angle into `[0, 2π)`.
#[inline]
pub(crate) fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Wraps an angle into `(-π, π]`.
#[inline]
fn wrap_signed(angle: f64) -> f64 {
    let wrapped = wrap_angle(angle);
    if wrapped > core::f64::consts::PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
