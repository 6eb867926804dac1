//! # Stop action

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use crate::{
    action::{Stage, Transition},
    drill_ctrl::DrillState,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Stages of the stop action, which finishes in the tick it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopStage {
    Disable,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Stage<DrillState> for StopStage {
    fn run(self, state: &mut DrillState) -> Transition<Self> {
        state.disable_all();
        info!("Rig stopped");

        Transition::Done
    }

    fn id(self) -> i32 {
        0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        act::sim::{SimRig, SimRigParams},
        action::{ActionHandler, StagedHandler},
        drill_ctrl::{ActuatorGroup, Params},
    };

    #[test]
    fn test_stop_in_one_tick() {
        let rig = SimRig::new(&SimRigParams::default());
        let mut state = DrillState::resolve(&rig, Params::default());
        state.start_drilling();
        state.set_group_enabled(ActuatorGroup::Horizontal, true);

        let mut handler = StagedHandler::new(StopStage::Disable);
        assert!(handler.start(&mut state));
        assert!(rig.is_disabled());
    }
}
