//! Staged action handlers

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Debug;

use log::trace;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Stage identifier reported by a handler which has finished (or never started).
pub const TERMINAL_STAGE: i32 = -1;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// One checkpoint of a multi-tick action.
///
/// Each stage is a pure function of itself and the state: it reads the actuator feedback held in
/// the state, commands actuators as a side effect, and names the stage to run on the next tick.
pub trait Stage<S>: Copy + Debug {
    /// Run this stage once.
    fn run(self, state: &mut S) -> Transition<Self>;

    /// Integer identifier of the stage, used for status reporting.
    fn id(self) -> i32;
}

/// Object-safe interface the [`ActionMachine`](super::ActionMachine) uses to drive an action.
pub trait ActionHandler<S> {
    /// Reset to the first stage and run it immediately.
    ///
    /// Returns `true` if the action finished during this call.
    fn start(&mut self, state: &mut S) -> bool;

    /// Run the stage recorded by the last call.
    ///
    /// Returns `true` if the action finished during this call.
    fn resume(&mut self, state: &mut S) -> bool;

    /// Identifier of the stage which will run next, or [`TERMINAL_STAGE`].
    fn stage_id(&self) -> i32;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// [`ActionHandler`] running the stages of one stage type.
///
/// The handler keeps nothing between ticks except the stage it has reached, all durable data
/// belongs to the state.
#[derive(Debug)]
pub struct StagedHandler<St> {
    initial: St,
    stage: Option<St>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Outcome of running one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<St> {
    /// Run the given stage on the next tick.
    Next(St),

    /// The action is finished.
    Done,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<St> StagedHandler<St> {
    /// Create a handler which begins every run at `initial`.
    pub fn new(initial: St) -> Self {
        Self {
            initial,
            stage: None,
        }
    }
}

impl<S, St> ActionHandler<S> for StagedHandler<St>
where
    St: Stage<S>,
{
    fn start(&mut self, state: &mut S) -> bool {
        self.stage = Some(self.initial);
        self.resume(state)
    }

    fn resume(&mut self, state: &mut S) -> bool {
        let stage = match self.stage {
            Some(s) => s,
            None => return true,
        };

        self.stage = match stage.run(state) {
            Transition::Next(next) => {
                trace!("{:?} -> {:?}", stage, next);
                Some(next)
            }
            Transition::Done => {
                trace!("{:?} -> done", stage);
                None
            }
        };

        self.stage.is_none()
    }

    fn stage_id(&self) -> i32 {
        self.stage.map_or(TERMINAL_STAGE, |s| s.id())
    }
}
