//! This module contains presets for common celestial bodies.
//!
//! Each preset is a [`Body`][crate::Body] ready to be added to a
//! [`SolarSystem`][crate::SolarSystem]. Distances are in astronomical units
//! and periods in years, so a clock ticking in years moves every body at
//! its real relative pace.

pub mod planets;
