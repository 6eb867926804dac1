//! # Drill control module
//!
//! The drilling rig control program, built on the [`action`](crate::action) engine. The rig is a
//! set of horizontal pistons carrying a rotor, which in turn carries a set of vertical pistons
//! tipped with a drill. Actions:
//!
//! - `stop` - disable everything.
//! - `retractAll` - raise the drill clear, bring the horizontal pistons home and turn the rotor to
//!   its upper limit.
//! - `extendAndDrill` / `retractAndDrill` - raise the drill, move one horizontal increment away
//!   from / towards the base, then drill down.
//! - `rotateCWAndDrill` / `rotateCCWAndDrill` - raise the drill, turn one angular increment, then
//!   drill down.
//! - `extendDrillLine` - raise the drill. The rest of the line sequence is not implemented.
//!
//! `stop` and `retractAll` override any action in progress.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod action_id;
mod actions;
mod machine;
mod params;
mod program;
mod runtime;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use action_id::DrillAction;
pub use machine::{new_machine, DrillMachine};
pub use params::Params;
pub use program::{BlockSource, InputData, Program, StatusReport};
pub use runtime::{LocalRuntime, Runtime, UpdateFrequency, UpdateSource};
pub use state::{ActuatorGroup, DrillState, HorizontalDirection, PistonDirection, RotationDirection};

use crate::action::ActionError;
use util::params::LoadError;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur during DrillCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum DrillCtrlError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Invalid DrillCtrl parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to load DrillCtrl parameters: {0}")]
    ParamLoad(#[from] LoadError),

    #[error("Block group ({0}) not found")]
    GroupNotFound(String),
}

// ------------------------------------------------------------------------------------------------
// BLOCK NAMES
// ------------------------------------------------------------------------------------------------

/// Names under which the rig's blocks are resolved on the host.
pub mod names {
    pub fn horizontal_group(prefix: &str) -> String {
        format!("{} Pistons H", prefix)
    }

    pub fn vertical_group(prefix: &str) -> String {
        format!("{} Pistons V", prefix)
    }

    pub fn rotor(prefix: &str) -> String {
        format!("{} Rotor", prefix)
    }

    pub fn drill(prefix: &str) -> String {
        format!("{} Drill", prefix)
    }
}
