//! # Drill cycle
//!
//! The shared phase ordering of the drilling actions:
//!
//! 1. Begin - stop the drill and any travel, start lifting and capture the target.
//! 2. Lift - wait for the drill to clear the ground.
//! 3. Seek - with the drill raised, move towards the target.
//! 4. Bore - drill down at the target until the drill is fully lowered.
//!
//! The drill is never lowered away from the target, and the rig never travels while the drill is
//! below its raised position.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Debug;

use log::{debug, info};

use crate::{
    action::{Stage, Transition},
    drill_ctrl::{ActuatorGroup, DrillState},
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A target a drill cycle travels to before drilling.
pub trait SeekTarget: Copy + Debug {
    /// Short name for diagnostics.
    fn label(self) -> &'static str;

    /// Compute the target from the current feedback and store it in the state.
    ///
    /// Called once per cycle, when the cycle begins.
    fn capture(self, state: &mut DrillState);

    /// True if the rig is at or past the stored target.
    fn reached(self, state: &DrillState) -> bool;

    /// Command the travel towards the stored target.
    fn drive(self, state: &mut DrillState);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Stage of a drill cycle towards a target of type `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillCycle<T> {
    target: T,
    phase: Phase,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Begin,
    Lift,
    Seek,
    Bore,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T> DrillCycle<T> {
    /// The first stage of a cycle towards `target`.
    pub fn new(target: T) -> Self {
        Self {
            target,
            phase: Phase::Begin,
        }
    }

    fn to(self, phase: Phase) -> Transition<Self> {
        Transition::Next(Self { phase, ..self })
    }
}

impl<T: SeekTarget> Stage<DrillState> for DrillCycle<T> {
    fn run(self, state: &mut DrillState) -> Transition<Self> {
        match self.phase {
            Phase::Begin => {
                state.set_drill_enabled(false);
                state.set_group_enabled(ActuatorGroup::Horizontal, false);
                state.set_rotor_enabled(false);
                state.raise_drill();

                self.target.capture(state);

                info!(
                    "{}: raising drill (depth {:.3} m)",
                    self.target.label(),
                    state.drill_depth()
                );

                self.to(Phase::Lift)
            }
            Phase::Lift => {
                if state.drill_raised() {
                    debug!("{}: drill raised", self.target.label());
                    self.seek(state)
                } else {
                    self.to(Phase::Lift)
                }
            }
            Phase::Seek => self.seek(state),
            Phase::Bore => {
                if state.drill_lowered() && self.target.reached(state) {
                    state.disable_all();
                    info!("{}: drilling complete", self.target.label());
                    return Transition::Done;
                }

                // The speed depends on the depth, so it's refreshed every tick
                state.start_drilling();
                self.to(Phase::Bore)
            }
        }
    }

    fn id(self) -> i32 {
        self.phase as i32
    }
}

impl<T: SeekTarget> DrillCycle<T> {
    fn seek(self, state: &mut DrillState) -> Transition<Self> {
        state.set_group_enabled(ActuatorGroup::Vertical, false);

        if self.target.reached(state) {
            info!("{}: target reached, drilling", self.target.label());
            state.start_drilling();
            self.to(Phase::Bore)
        } else {
            self.target.drive(state);
            self.to(Phase::Seek)
        }
    }
}
