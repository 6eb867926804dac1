//! # Extend drill line action
//!
//! Only the lift is implemented. Once the drill is raised the action finishes without moving
//! along the line.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};

use crate::{
    action::{Stage, Transition},
    drill_ctrl::{ActuatorGroup, DrillState},
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillLineStage {
    Begin,
    Lift,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Stage<DrillState> for DrillLineStage {
    fn run(self, state: &mut DrillState) -> Transition<Self> {
        match self {
            DrillLineStage::Begin => {
                state.set_drill_enabled(false);
                state.raise_drill();
                info!("extendDrillLine: raising drill");
                Transition::Next(DrillLineStage::Lift)
            }
            DrillLineStage::Lift => {
                if !state.drill_raised() {
                    return Transition::Next(DrillLineStage::Lift);
                }

                state.set_group_enabled(ActuatorGroup::Vertical, false);
                warn!("extendDrillLine: drill raised, line drilling is not implemented");
                Transition::Done
            }
        }
    }

    fn id(self) -> i32 {
        self as i32
    }
}
