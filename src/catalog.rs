//! Loading bodies from a JSON table.
//!
//! A catalog is a JSON array of records, one per body, using the field names
//! of common small-body tables:
//!
//! | Field | Meaning | Default |
//! |-------|---------|---------|
//! | `name` | Display name | required |
//! | `class` | `planet`, `large_asteroid`, `small_asteroid`, `potentially_hazardous` | `planet` |
//! | `a` | Semi-major axis | required |
//! | `e` | Eccentricity, in `[0, 1)` | required |
//! | `i` | Inclination, in degrees | `0` |
//! | `w` | Argument of periapsis `ω`, in degrees | see below |
//! | `long_pe` (or `ϖ`) | Longitude of periapsis `ϖ = Ω + ω`, in degrees | none |
//! | `Ω` (or `om`, `node`) | Longitude of ascending node, in degrees | `0` |
//! | `M0` (or `ma`) | Mean anomaly at epoch, in radians | see below |
//! | `L` | Mean longitude at epoch `L = ϖ + M₀`, in degrees | none |
//! | `per_y` (or `period`) | Orbital period | see below |
//! | `orbitalSpeed` | Mean motion, in radians per time unit | see below |
//! | `radius`, or `diameter` | Display size | `1` |
//! | `color` | Display color | none |
//!
//! Every record needs either a period or an orbital speed. When both are
//! given, the period wins.
//!
//! `w` is always the argument of periapsis, measured from the ascending
//! node. Almanac tables list the longitude of periapsis instead; give it as
//! `long_pe` and the argument of periapsis becomes `long_pe - Ω`, the same
//! conversion the [planet presets][crate::body_presets::planets] use. When
//! both are given, `w` wins. With neither, the periapsis sits at the node.
//!
//! Likewise, `M0` wins over `L`. Without `M0`, the mean anomaly is
//! `L - ϖ` converted to radians, or zero if there is no `L` either.
//!
//! Unknown fields are ignored.
//!
//! # Example
//! ```
//! use orrery_kepler::catalog::Catalog;
//!
//! let catalog = Catalog::from_json_str(r##"[
//!     { "name": "Tierra", "a": 1.00000011, "e": 0.01671022, "i": 0.00005,
//!       "w": 102.94719, "Ω": 0.0, "per_y": 1.0000174, "color": "#0066ff" },
//!     { "name": "433 Eros", "class": "large_asteroid", "a": 1.458, "e": 0.2226,
//!       "i": 10.83, "w": 178.9, "om": 304.3, "per_y": 1.76, "diameter": 16.84 }
//! ]"##).unwrap();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.get("433 Eros").unwrap().radius, 8.42);
//! ```

use std::{fs::File, io::Read, path::Path};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::{Body, BodyClass, CatalogError, OrbitalElements};

/// The display size of a body whose record has neither a radius nor a
/// diameter.
const DEFAULT_RADIUS: f64 = 1.0;

/// One body, as written in the JSON table.
#[derive(Debug, Deserialize)]
struct BodyRecord {
    name: String,

    #[serde(default)]
    class: BodyClass,

    a: f64,
    e: f64,

    #[serde(default)]
    i: f64,

    #[serde(default)]
    w: Option<f64>,

    #[serde(default, alias = "ϖ")]
    long_pe: Option<f64>,

    #[serde(default, rename = "Ω", alias = "om", alias = "node")]
    long_asc_node: f64,

    #[serde(default, rename = "M0", alias = "ma")]
    mean_anomaly: Option<f64>,

    #[serde(default, rename = "L")]
    mean_longitude: Option<f64>,

    #[serde(default, alias = "period")]
    per_y: Option<f64>,

    #[serde(default, rename = "orbitalSpeed")]
    orbital_speed: Option<f64>,

    #[serde(default)]
    radius: Option<f64>,

    #[serde(default)]
    diameter: Option<f64>,

    #[serde(default)]
    color: Option<String>,
}

impl BodyRecord {
    /// The argument of periapsis `ω`, in degrees.
    fn arg_pe(&self, index: usize) -> f64 {
        match (self.w, self.long_pe) {
            (Some(arg_pe), long_pe) => {
                if long_pe.is_some() {
                    warn!(
                        "Body #{index} ({}) has both `w` and `long_pe`; using `w`",
                        self.name
                    );
                }
                arg_pe
            }
            (None, Some(long_pe)) => long_pe - self.long_asc_node,
            (None, None) => 0.0,
        }
    }

    /// The mean anomaly at epoch `M₀`, in radians.
    fn mean_anomaly(&self, arg_pe: f64) -> f64 {
        match (self.mean_anomaly, self.mean_longitude) {
            (Some(mean_anomaly), _) => mean_anomaly,
            (None, Some(mean_longitude)) => {
                let long_pe = self.long_pe.unwrap_or(self.long_asc_node + arg_pe);
                (mean_longitude - long_pe).to_radians()
            }
            (None, None) => 0.0,
        }
    }

    fn into_body(self, index: usize) -> Result<Body, CatalogError> {
        let arg_pe = self.arg_pe(index);
        let mean_anomaly = self.mean_anomaly(arg_pe);

        let elements = match (self.per_y, self.orbital_speed) {
            (Some(period), speed) => {
                if speed.is_some() {
                    warn!(
                        "Body #{index} ({}) has both a period and an orbital speed; using the period",
                        self.name
                    );
                }
                OrbitalElements::new(
                    self.a,
                    self.e,
                    self.i,
                    arg_pe,
                    self.long_asc_node,
                    mean_anomaly,
                    period,
                )
            }
            (None, Some(speed)) => OrbitalElements::with_mean_motion(
                self.a,
                self.e,
                self.i,
                arg_pe,
                self.long_asc_node,
                mean_anomaly,
                speed,
            ),
            (None, None) => {
                return Err(CatalogError::MissingMeanMotion {
                    index,
                    name: self.name,
                })
            }
        };

        let elements = match elements {
            Ok(elements) => elements,
            Err(source) => {
                return Err(CatalogError::InvalidBody {
                    index,
                    name: self.name,
                    source,
                })
            }
        };

        let radius = self
            .radius
            .or(self.diameter.map(|diameter| diameter / 2.0))
            .unwrap_or(DEFAULT_RADIUS);

        debug!("Loaded {} {:?} (a = {}, e = {})", self.class, self.name, self.a, self.e);

        Ok(Body {
            name: self.name,
            class: self.class,
            radius,
            color: self.color,
            elements,
        })
    }
}

/// A validated list of bodies loaded from a JSON table.
///
/// Bodies keep the order of the table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    bodies: Vec<Body>,
}

impl Catalog {
    /// Parses a catalog from a JSON string.
    ///
    /// # Errors
    /// Fails if the JSON is malformed, or on the first record that can't be
    /// turned into a body.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<BodyRecord> = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Self::from_records(records)
    }

    /// Parses a catalog from a reader yielding JSON.
    ///
    /// # Errors
    /// Same as [`Catalog::from_json_str`], plus read failures.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, CatalogError> {
        let mut json = String::new();
        reader
            .read_to_string(&mut json)
            .map_err(CatalogError::Read)?;
        Self::from_json_str(&json)
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Errors
    /// Same as [`Catalog::from_reader`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(CatalogError::Read)?;

        let catalog = Self::from_reader(file)?;
        info!("Loaded {} bodies from {}", catalog.len(), path.display());

        Ok(catalog)
    }

    fn from_records(records: Vec<BodyRecord>) -> Result<Self, CatalogError> {
        let bodies = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_body(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { bodies })
    }

    /// Gets all bodies in the catalog.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Takes the bodies out of the catalog.
    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }

    /// Gets the first body with the given name.
    pub fn get(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|body| body.name == name)
    }

    /// Gets the number of bodies in the catalog.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the catalog has no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
