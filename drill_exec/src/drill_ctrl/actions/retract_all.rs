//! # Retract all action
//!
//! Brings the rig back to its stowed pose: drill raised, horizontal pistons home and the rotor at
//! its upper angular limit. The drill is raised before anything else moves.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};

use crate::{
    action::{Stage, Transition},
    drill_ctrl::{ActuatorGroup, DrillState, HorizontalDirection},
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetractAllStage {
    /// Switch the drill off and pick the first movement.
    Begin,

    /// Raise the drill, nothing else moves.
    Lift,

    /// Bring the horizontal pistons and rotor home.
    Home,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Stage<DrillState> for RetractAllStage {
    fn run(self, state: &mut DrillState) -> Transition<Self> {
        if let RetractAllStage::Begin = self {
            state.set_drill_enabled(false);
        }

        // Every stage re-evaluates from the feedback, so a repeated request picks up wherever the
        // rig is rather than where the last request left it.
        if state.drill_raised() && state.horizontal_home() && state.rotor_at_upper_limit() {
            state.disable_all();
            info!("Rig retracted");
            return Transition::Done;
        }

        if state.drill_raised() {
            if self != RetractAllStage::Home {
                debug!("Drill raised, returning horizontal pistons and rotor home");
            }
            drive_home(state);
            Transition::Next(RetractAllStage::Home)
        } else {
            state.set_group_enabled(ActuatorGroup::Horizontal, false);
            state.set_rotor_enabled(false);
            state.raise_drill();
            Transition::Next(RetractAllStage::Lift)
        }
    }

    fn id(self) -> i32 {
        self as i32
    }
}

/// Hold the drill up and drive the horizontal pistons and rotor towards their home limits.
fn drive_home(state: &mut DrillState) {
    let fast_speed = state.params.fast_speed;
    let home_rpm = state.params.home_rotor_rpm;
    let home_direction = state.horizontal_piston_direction(HorizontalDirection::Retract);

    state.set_group_enabled(ActuatorGroup::Vertical, false);

    state.set_group_velocity(ActuatorGroup::Horizontal, home_direction.sign() * fast_speed);
    state.set_group_enabled(ActuatorGroup::Horizontal, true);

    state.set_rotor_velocity(home_rpm);
    state.set_rotor_enabled(true);
}
