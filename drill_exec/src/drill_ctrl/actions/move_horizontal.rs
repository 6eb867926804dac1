//! # Horizontal drill cycle target

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;

use super::SeekTarget;
use crate::drill_ctrl::{ActuatorGroup, DrillState, HorizontalDirection};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SeekTarget for HorizontalDirection {
    fn label(self) -> &'static str {
        match self {
            HorizontalDirection::Extend => "extendAndDrill",
            HorizontalDirection::Retract => "retractAndDrill",
        }
    }

    fn capture(self, state: &mut DrillState) {
        let direction = state.horizontal_piston_direction(self);
        let current = state
            .group(ActuatorGroup::Horizontal)
            .first_position()
            .unwrap_or_default();

        state.target_horizontal_position =
            current + direction.sign() * state.params.horizontal_increment;

        debug!(
            "{}: horizontal target {:.3} m (from {:.3} m)",
            self.label(),
            state.target_horizontal_position,
            current
        );
    }

    fn reached(self, state: &DrillState) -> bool {
        state.reached_target_horizontal(state.horizontal_piston_direction(self))
    }

    fn drive(self, state: &mut DrillState) {
        let velocity =
            state.horizontal_piston_direction(self).sign() * state.params.safe_horizontal_speed;

        state.set_group_velocity(ActuatorGroup::Horizontal, velocity);
        state.set_group_enabled(ActuatorGroup::Horizontal, true);
    }
}
