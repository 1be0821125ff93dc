use core::fmt;

use crate::OrbitalElements;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What kind of body this is.
///
/// The class only affects how a renderer might draw the body. Every class is
/// propagated and oriented in exactly the same way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyClass {
    /// A major planet.
    #[default]
    Planet,
    /// A large asteroid.
    LargeAsteroid,
    /// A small asteroid.
    SmallAsteroid,
    /// A potentially hazardous asteroid.
    PotentiallyHazardous,
}

impl fmt::Display for BodyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BodyClass::Planet => "planet",
            BodyClass::LargeAsteroid => "large asteroid",
            BodyClass::SmallAsteroid => "small asteroid",
            BodyClass::PotentiallyHazardous => "potentially hazardous asteroid",
        })
    }
}

/// A struct representing a celestial body orbiting the primary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// The name of the celestial body.
    pub name: String,

    /// What kind of body it is.
    pub class: BodyClass,

    /// The display radius of the celestial body.
    pub radius: f64,

    /// The display color of the celestial body, such as `"#0066ff"`.
    pub color: Option<String>,

    /// The orbit of the celestial body.
    pub elements: OrbitalElements,
}

impl Body {
    /// Creates a new `Body` instance.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the celestial body.
    /// * `class` - What kind of body it is.
    /// * `radius` - The display radius of the celestial body.
    /// * `elements` - The orbit of the celestial body.
    ///
    /// The body has no color; set it with [`Body::with_color`].
    pub fn new(name: String, class: BodyClass, radius: f64, elements: OrbitalElements) -> Self {
        Self {
            name,
            class,
            radius,
            color: None,
            elements,
        }
    }

    /// Returns this body with the given display color.
    #[must_use]
    pub fn with_color(self, color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..self
        }
    }
}
