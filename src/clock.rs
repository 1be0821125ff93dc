use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The simulation time source.
///
/// The clock is owned by whatever drives the frames, and is advanced once per
/// render tick with [`tick`][Self::tick]. The propagator only reads it.
///
/// The speed multiplier scales how fast the bodies move for a given time,
/// without changing the time itself. Each tick adds `dt · speed` to the
/// [orbital time][Self::orbital_time], which is what positions are computed
/// from, so a speed change only affects the ticks after it. Pausing freezes
/// both times, so every position stays where it was last computed.
///
/// # Example
/// ```
/// use orrery_kepler::SimulationClock;
///
/// let mut clock = SimulationClock::new();
/// clock.tick(0.5);
/// assert_eq!(clock.time(), 0.5);
///
/// clock.pause();
/// clock.set_speed_multiplier(10.0);
/// clock.tick(0.5);
/// assert_eq!(clock.time(), 0.5);
/// assert_eq!(clock.orbital_time(), 0.5);
///
/// clock.resume();
/// clock.tick(0.5);
/// assert_eq!(clock.orbital_time(), 5.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationClock {
    /// The time elapsed in the simulation, in simulation time units.
    time: f64,

    /// The sum of `dt · speed` over every tick that wasn't ignored.
    orbital_time: f64,

    /// How fast the bodies move along their orbits, relative to the time.
    speed_multiplier: f64,

    /// Whether ticking the clock is currently ignored.
    paused: bool,
}

impl SimulationClock {
    /// Creates a running clock at time zero, with a speed multiplier of 1.
    pub const fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Creates a running clock at the given time, with a speed multiplier of 1.
    ///
    /// The orbital time starts out equal to `time`.
    pub const fn starting_at(time: f64) -> Self {
        Self {
            time,
            orbital_time: time,
            speed_multiplier: 1.0,
            paused: false,
        }
    }

    /// Gets the current simulation time.
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Gets the time the bodies have travelled along their orbits.
    ///
    /// This is the elapsed time scaled by the speed multiplier that was in
    /// effect during each tick.
    pub const fn orbital_time(&self) -> f64 {
        self.orbital_time
    }

    /// Gets the current speed multiplier.
    pub const fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Sets the speed multiplier for the following ticks.
    ///
    /// Neither time changes, so the bodies stay where they are and only
    /// move faster or slower from the next tick on.
    pub fn set_speed_multiplier(&mut self, speed_multiplier: f64) {
        self.speed_multiplier = speed_multiplier;
    }

    /// Whether the clock is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses the clock.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes the clock.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggles between paused and running.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Advances the clock by `dt`, unless it is paused.
    ///
    /// Negative steps are ignored, so the time never runs backwards. The
    /// orbital time advances by `dt · speed`.
    ///
    /// Returns the new time.
    pub fn tick(&mut self, dt: f64) -> f64 {
        if !self.paused && dt > 0.0 {
            self.time += dt;
            self.orbital_time += dt * self.speed_multiplier;
        }

        self.time
    }

    /// Advances the clock by `ticks` steps of `dt`, unless it is paused.
    ///
    /// Returns the new time.
    pub fn warp(&mut self, ticks: u64, dt: f64) -> f64 {
        self.tick(ticks as f64 * dt)
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationClock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "t={} (x{})", self.time, self.speed_multiplier)?;
        if self.paused {
            write!(f, " [paused]")?;
        }
        Ok(())
    }
}
