//! Error types for element construction, Kepler solving, and catalog loading.

/// The Kepler solver ran out of iterations before the residual of
/// `E - e sin E - M` dropped below the requested tolerance.
///
/// This happens mostly for eccentricities very close to 1, where
/// Newton-Raphson started from `E₀ = M` converges slowly or oscillates.
/// Callers may retry with a relaxed tolerance, a larger iteration cap, or a
/// different [initial guess][crate::InitialGuess].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error(
    "Kepler's equation did not converge after {iterations} iterations \
    (M = {mean_anomaly}, e = {eccentricity}, residual = {residual:e}, tolerance = {tolerance:e})"
)]
pub struct ConvergenceError {
    /// The mean anomaly the solver was given, in radians.
    pub mean_anomaly: f64,
    /// The eccentricity the solver was given.
    pub eccentricity: f64,
    /// How many Newton-Raphson steps were performed.
    pub iterations: u32,
    /// The value of `E - e sin E - M` at the last iterate.
    pub residual: f64,
    /// The tolerance that was not reached.
    pub tolerance: f64,
}

/// The eccentricity is outside of the closed-orbit range `0 ≤ e < 1`.
///
/// Parabolic and hyperbolic trajectories are not supported, and negative or
/// NaN eccentricities are meaningless.
/// This is reported when the [`OrbitalElements`][crate::OrbitalElements] are
/// built, so the per-frame path never sees it.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("eccentricity {eccentricity} is outside of the elliptic range [0, 1)")]
pub struct InvalidEccentricityError {
    /// The rejected eccentricity.
    pub eccentricity: f64,
}

/// The orbital period is zero, infinite, or NaN.
///
/// Such a period has no finite, nonzero mean motion `2π / period`, and
/// would turn the mean anomaly into NaN at some time. A mean motion of zero
/// shows up here as an infinite period.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("orbital period {period} does not give a finite, nonzero mean motion")]
pub struct InvalidPeriodError {
    /// The rejected period.
    pub period: f64,
}

/// Why a set of [`OrbitalElements`][crate::OrbitalElements] was rejected.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidElementsError {
    /// The orbit isn't closed.
    #[error(transparent)]
    Eccentricity(#[from] InvalidEccentricityError),

    /// The body has no usable rate of motion.
    #[error(transparent)]
    Period(#[from] InvalidPeriodError),
}

/// An error to describe why adding a body to a
/// [`SolarSystem`][crate::SolarSystem] failed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BodyAddError {
    /// Bodies are looked up by name, so names must be unique.
    #[error("there is already a body named {0:?}")]
    DuplicateName(String),
}

/// Errors that can occur while loading a body catalog.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog from disk or from a reader.
    #[error("failed to read body catalog: {0}")]
    Read(#[source] std::io::Error),

    /// The catalog is not valid JSON, or a record has the wrong shape.
    #[error("failed to parse body catalog: {0}")]
    Parse(#[source] serde_json::Error),

    /// A record has orbital elements that cannot describe a closed orbit
    /// with a usable period.
    #[error("body #{index} ({name}) has invalid orbital elements: {source}")]
    InvalidBody {
        /// Position of the record in the catalog.
        index: usize,
        /// Name of the record.
        name: String,
        /// What was wrong with it.
        #[source]
        source: InvalidElementsError,
    },

    /// A record has neither `per_y`, `period` nor `orbitalSpeed`.
    #[error("body #{index} ({name}) has no period or orbital speed")]
    MissingMeanMotion {
        /// Position of the record in the catalog.
        index: usize,
        /// Name of the record.
        name: String,
    },
}
