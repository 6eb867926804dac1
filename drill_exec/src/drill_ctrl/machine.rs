//! Drill action registry

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use super::{
    actions::{DrillCycle, DrillLineStage, RetractAllStage, StopStage},
    DrillAction, DrillState, HorizontalDirection, RotationDirection,
};
use crate::action::{ActionError, ActionHandler, ActionMachine, StagedHandler};

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// The action machine of the drill rig.
pub type DrillMachine = ActionMachine<DrillAction, DrillState>;

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Register a handler for every [`DrillAction`] and build the machine.
pub fn new_machine(state: DrillState) -> Result<DrillMachine, ActionError> {
    let mut handlers: HashMap<DrillAction, Box<dyn ActionHandler<DrillState>>> = HashMap::new();

    handlers.insert(
        DrillAction::Stop,
        Box::new(StagedHandler::new(StopStage::Disable)),
    );
    handlers.insert(
        DrillAction::RetractAll,
        Box::new(StagedHandler::new(RetractAllStage::Begin)),
    );
    handlers.insert(
        DrillAction::RetractAndDrill,
        Box::new(StagedHandler::new(DrillCycle::new(
            HorizontalDirection::Retract,
        ))),
    );
    handlers.insert(
        DrillAction::ExtendAndDrill,
        Box::new(StagedHandler::new(DrillCycle::new(
            HorizontalDirection::Extend,
        ))),
    );
    handlers.insert(
        DrillAction::RotateCcwAndDrill,
        Box::new(StagedHandler::new(DrillCycle::new(
            RotationDirection::CounterClockwise,
        ))),
    );
    handlers.insert(
        DrillAction::RotateCwAndDrill,
        Box::new(StagedHandler::new(DrillCycle::new(
            RotationDirection::Clockwise,
        ))),
    );
    handlers.insert(
        DrillAction::ExtendDrillLine,
        Box::new(StagedHandler::new(DrillLineStage::Begin)),
    );

    ActionMachine::new(handlers, state)
}
