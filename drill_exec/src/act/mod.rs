//! # Actuator facade
//!
//! Read/write interface over the physical actuators of the rig. Reads are pure, writes are
//! fire-and-forget: writing the same value twice has no further effect, and no error is raised
//! for a write to an actuator which was never resolved.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod group;
pub mod sim;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use group::PistonGroup;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A linear actuator.
pub trait Piston {
    /// Current extension as last reported by the actuator.
    ///
    /// Units: meters
    fn current_position(&self) -> f32;

    /// Configured lower travel limit.
    ///
    /// Units: meters
    fn lowest_position(&self) -> f32;

    /// Configured upper travel limit.
    ///
    /// Units: meters
    fn highest_position(&self) -> f32;

    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Signed velocity demand, positive extends the piston.
    ///
    /// Units: meters/second
    fn velocity(&self) -> f32;

    fn set_velocity(&mut self, velocity: f32);
}

/// A rotary actuator.
pub trait Rotor {
    /// Current angle.
    ///
    /// Units: radians
    fn angle(&self) -> f32;

    /// Configured upper angular limit.
    ///
    /// Units: radians
    fn upper_limit_angle(&self) -> f32;

    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Signed rate demand, positive turns clockwise.
    ///
    /// Units: revolutions/minute
    fn target_velocity_rpm(&self) -> f32;

    fn set_target_velocity_rpm(&mut self, rpm: f32);
}

/// The tool mounted on the rig head. It can only be switched on or off.
pub trait Drill {
    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);
}
