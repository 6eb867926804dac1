//! Logical piston groups

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use super::Piston;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A set of pistons intended to move in lock-step.
///
/// Every piston in the group is always commanded with the same velocity and enabled flag. The
/// group assumes, but does not check, that its members stay synchronised.
#[derive(Default)]
pub struct PistonGroup {
    pistons: Vec<Box<dyn Piston>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PistonGroup {
    pub fn new(pistons: Vec<Box<dyn Piston>>) -> Self {
        Self { pistons }
    }

    pub fn len(&self) -> usize {
        self.pistons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pistons.is_empty()
    }

    /// Position of the first piston of the group, used as the reference reading for the whole
    /// group.
    pub fn first_position(&self) -> Option<f32> {
        self.pistons.first().map(|p| p.current_position())
    }

    /// True if the predicate holds for every piston. An empty group is vacuously true.
    pub fn all<F>(&self, pred: F) -> bool
    where
        F: Fn(&dyn Piston) -> bool,
    {
        self.pistons.iter().all(|p| pred(p.as_ref()))
    }

    /// Sum a per-piston reading over the group.
    pub fn sum<F>(&self, f: F) -> f32
    where
        F: Fn(&dyn Piston) -> f32,
    {
        self.pistons.iter().map(|p| f(p.as_ref())).sum()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        for piston in self.pistons.iter_mut() {
            piston.set_enabled(enabled);
        }
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        for piston in self.pistons.iter_mut() {
            piston.set_velocity(velocity);
        }
    }
}
