//! # Action sequencing engine
//!
//! A reusable state machine which runs one staged, resumable action at a time against an owned
//! action state:
//!
//! - [`Stage`] - one checkpoint of a multi-tick action, with a pure transition function.
//! - [`ActionHandler`] - runs an action's stages, keeping only the current stage between ticks.
//! - [`ActionMachine`] - maps a closed set of action identifiers to handlers, tracks whether an
//!   action is in flight, and applies the override rules when a new request arrives.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod handler;
mod machine;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use handler::{ActionHandler, Stage, StagedHandler, Transition, TERMINAL_STAGE};
pub use machine::{ActionId, ActionMachine, MachineStatus};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// State operated on by the actions of an [`ActionMachine`].
pub trait ActionState {
    /// True if the state holds everything the actions need to run.
    ///
    /// An incomplete state is a configuration error, not a transient condition. No action is
    /// processed until the state is rebuilt.
    fn is_complete(&self) -> bool;

    /// Description of what is missing from an incomplete state.
    fn error(&self) -> String;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised by the action engine.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Not all actions were implemented, no handler for {0}")]
    MissingHandler(String),

    #[error("Action state is incomplete: {0}")]
    ConfigurationIncomplete(String),
}
