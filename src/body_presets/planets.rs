//! This module contains presets for the eight planets of the Solar System.
//!
//! "A planet is a large, rounded astronomical body that is generally
//! required to be in orbit around a star, stellar remnant, or brown dwarf,
//! and is not one itself."
//!
//! \- [Wikipedia](https://en.wikipedia.org/wiki/Planet)
//!
//! The elements are the J2000 mean elements, given the way almanacs list
//! them: with the mean longitude `L` and the longitude of periapsis `ϖ`.
//! They are converted as `ω = ϖ - Ω` and `M₀ = L - ϖ`.
//!
//! Radii are display sizes, not physical ones.

use crate::{Body, BodyClass, OrbitalElements};

#[allow(clippy::too_many_arguments)]
fn planet(
    name: &str,
    radius: f64,
    color: &str,
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    mean_longitude: f64,
    long_pe: f64,
    long_asc_node: f64,
    period: f64,
) -> Body {
    let elements = OrbitalElements::new_unchecked(
        semi_major_axis,
        eccentricity,
        inclination,
        long_pe - long_asc_node,
        long_asc_node,
        (mean_longitude - long_pe).to_radians(),
        period,
    );

    Body::new(name.to_string(), BodyClass::Planet, radius, elements).with_color(color)
}

/// Returns Mercury, the smallest and innermost planet.
pub fn mercury() -> Body {
    planet(
        "Mercury", 1.0, "#aaaaaa", 0.387098, 0.205630, 7.00487, 252.25084, 77.45645, 48.330,
        0.2408467,
    )
}

/// Returns Venus.
pub fn venus() -> Body {
    planet(
        "Venus", 2.0, "#ffcc00", 0.723332, 0.006772, 3.39471, 181.97973, 131.53298, 76.68069,
        0.61519726,
    )
}

/// Returns the Earth.
///
/// Its longitude of ascending node is taken as zero, since the reference
/// plane is its own orbit.
pub fn earth() -> Body {
    planet(
        "Earth", 2.2, "#0066ff", 1.00000011, 0.01671022, 0.00005, 100.46435, 102.94719, 0.0,
        1.0000174,
    )
}

/// Returns Mars.
pub fn mars() -> Body {
    planet(
        "Mars", 1.5, "#ff3300", 1.52366231, 0.09341233, 1.85061, 355.45332, 336.04084, 49.57854,
        1.8808476,
    )
}

/// Returns Jupiter.
pub fn jupiter() -> Body {
    planet(
        "Jupiter", 4.0, "#ff9933", 5.20336301, 0.04839266, 1.30530, 34.40438, 14.33121,
        100.55615, 11.862615,
    )
}

/// Returns Saturn.
pub fn saturn() -> Body {
    planet(
        "Saturn", 3.5, "#ffcc66", 9.53707032, 0.05415060, 2.48446, 49.94432, 92.43194,
        113.71504, 29.447498,
    )
}

/// Returns Uranus.
pub fn uranus() -> Body {
    planet(
        "Uranus", 2.8, "#33ccff", 19.19126393, 0.04716771, 0.76986, 313.23218, 170.96424,
        74.22988, 84.016846,
    )
}

/// Returns Neptune, the outermost planet.
pub fn neptune() -> Body {
    planet(
        "Neptune", 2.5, "#3333ff", 30.06896348, 0.00858587, 1.76917, 304.88003, 44.97135,
        131.72169, 164.79132,
    )
}

/// Returns all eight planets, in order from the Sun.
pub fn all() -> Vec<Body> {
    vec![
        mercury(),
        venus(),
        earth(),
        mars(),
        jupiter(),
        saturn(),
        uranus(),
        neptune(),
    ]
}
