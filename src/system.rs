use core::fmt;

use glam::DVec3;
use log::debug;

use crate::{Body, BodyAddError, ConvergenceError, OrbitPropagator, SimulationClock};

/// A set of bodies orbiting one primary, driven by one clock.
///
/// This is the per-frame contract for a renderer: tick the clock once, then
/// ask for every body's position. The primary sits at the origin.
///
/// # Example
/// ```
/// use orrery_kepler::{body_presets::planets, SolarSystem};
///
/// let mut system = SolarSystem::from_bodies(planets::all()).unwrap();
/// system.clock_mut().set_speed_multiplier(10.0);
/// system.tick(0.016);
///
/// let positions = system.positions().unwrap();
/// assert_eq!(positions.len(), 8);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolarSystem {
    /// The celestial bodies, in insertion order.
    bodies: Vec<Body>,

    /// The simulation time source.
    clock: SimulationClock,

    /// Turns each body's elements into a position.
    propagator: OrbitPropagator,
}

impl SolarSystem {
    /// Creates an empty system with a fresh clock and the given propagator.
    pub fn new(propagator: OrbitPropagator) -> Self {
        Self {
            bodies: Vec::new(),
            clock: SimulationClock::new(),
            propagator,
        }
    }

    /// Creates a system with the default propagator from a list of bodies.
    ///
    /// # Errors
    /// Fails on the first body whose name is already taken, handing it back.
    pub fn from_bodies(
        bodies: impl IntoIterator<Item = Body>,
    ) -> Result<Self, (BodyAddError, Body)> {
        let mut system = Self::default();
        for body in bodies {
            system.add_body(body)?;
        }
        Ok(system)
    }

    /// Adds a body to the system.
    ///
    /// Returns: The index of the newly-added body.
    ///
    /// # Errors
    /// Fails if a body with the same name already exists, handing the body back.
    pub fn add_body(&mut self, body: Body) -> Result<usize, (BodyAddError, Body)> {
        if self.get_body_index_with_name(&body.name).is_some() {
            return Err((BodyAddError::DuplicateName(body.name.clone()), body));
        }

        debug!("Adding {} {:?}", body.class, body.name);
        self.bodies.push(body);

        Ok(self.bodies.len() - 1)
    }

    /// Removes the body with the given name.
    ///
    /// The indices of the bodies added after it shift down by one.
    pub fn remove_body(&mut self, name: &str) -> Option<Body> {
        let index = self.get_body_index_with_name(name)?;
        Some(self.bodies.remove(index))
    }

    /// Gets all bodies in the system.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Gets an immutable reference to a body in the system.
    pub fn get_body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Gets the index of a body with a given name.
    pub fn get_body_index_with_name(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|body| body.name == name)
    }

    /// Gets the simulation clock.
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Gets the simulation clock, to pause it or change its speed.
    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    /// Gets the propagator used for every body.
    pub fn propagator(&self) -> &OrbitPropagator {
        &self.propagator
    }

    /// Advances the simulation by `dt`, unless the clock is paused.
    ///
    /// Returns the new time.
    pub fn tick(&mut self, dt: f64) -> f64 {
        self.clock.tick(dt)
    }

    /// Gets the position of a body at the current time.
    ///
    /// Returns `None` if there is no body at that index.
    pub fn body_position(&self, index: usize) -> Option<Result<DVec3, ConvergenceError>> {
        let body = self.bodies.get(index)?;
        Some(self.propagator.position_at_clock(&body.elements, &self.clock))
    }

    /// Gets the position of every body at the current time, in body order.
    ///
    /// # Errors
    /// Returns the first [`ConvergenceError`] met.
    pub fn positions(&self) -> Result<Vec<DVec3>, ConvergenceError> {
        self.bodies
            .iter()
            .map(|body| self.propagator.position_at_clock(&body.elements, &self.clock))
            .collect()
    }

    /// Samples the orbit curve of every body, in body order.
    ///
    /// # Errors
    /// Returns the first [`ConvergenceError`] met.
    pub fn orbit_curves(&self, steps: usize) -> Result<Vec<Vec<DVec3>>, ConvergenceError> {
        self.bodies
            .iter()
            .map(|body| self.propagator.sample_orbit(&body.elements, steps))
            .collect()
    }
}

impl fmt::Display for SolarSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Solar system with {} bodies, {}", self.bodies.len(), self.clock)
    }
}
