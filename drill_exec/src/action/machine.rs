//! Action registry and state machine

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    collections::HashMap,
    fmt::{Debug, Display},
    hash::Hash,
};

use log::{debug, info, warn};
use serde::Serialize;

use super::{ActionError, ActionHandler, ActionState};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Identifier of an action in a closed set of actions.
pub trait ActionId: Copy + Eq + Hash + Debug + Display + 'static {
    /// Every action the machine declares as runnable. Each must have a registered handler.
    fn actions() -> &'static [Self];

    /// True if this action may preempt an action already in progress.
    fn can_override(self) -> bool;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Runs at most one action at a time against an owned state.
pub struct ActionMachine<A, S> {
    handlers: HashMap<A, Box<dyn ActionHandler<S>>>,

    state: S,

    /// The action currently in flight, `None` when idle.
    in_progress: Option<A>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Status of an [`ActionMachine`] after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachineStatus<A> {
    Idle,
    Active { action: A, stage: i32 },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<A, S> ActionMachine<A, S>
where
    A: ActionId,
    S: ActionState,
{
    /// Build a new idle machine.
    ///
    /// Fails if any action in [`ActionId::actions`] has no handler.
    pub fn new(
        handlers: HashMap<A, Box<dyn ActionHandler<S>>>,
        state: S,
    ) -> Result<Self, ActionError> {
        if let Some(missing) = A::actions().iter().find(|a| !handlers.contains_key(*a)) {
            return Err(ActionError::MissingHandler(missing.to_string()));
        }

        Ok(Self {
            handlers,
            state,
            in_progress: None,
        })
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.in_progress.is_some()
    }

    pub fn status(&self) -> MachineStatus<A> {
        match self.in_progress {
            Some(action) => MachineStatus::Active {
                action,
                stage: self
                    .handlers
                    .get(&action)
                    .map_or(super::TERMINAL_STAGE, |h| h.stage_id()),
            },
            None => MachineStatus::Idle,
        }
    }

    /// Process one tick.
    ///
    /// `action` is the newly requested action, or `None` to continue whatever is running. A new
    /// request starts its handler if the machine is idle or the request is override-eligible,
    /// otherwise it is ignored and the action in flight is resumed.
    ///
    /// Nothing is run while the state is incomplete.
    pub fn process(&mut self, action: Option<A>) -> Result<MachineStatus<A>, ActionError> {
        if !self.state.is_complete() {
            return Err(ActionError::ConfigurationIncomplete(self.state.error()));
        }

        match (self.in_progress, action) {
            (None, None) => (),
            (None, Some(new)) => self.start(new)?,
            (Some(current), Some(new)) if new.can_override() => {
                if current != new {
                    info!("{} overrides {}", new, current);
                }
                self.start(new)?
            }
            (Some(current), Some(new)) => {
                if current != new {
                    warn!("{} is in progress, request for {} ignored", current, new);
                }
                self.resume(current)?
            }
            (Some(current), None) => self.resume(current)?,
        }

        Ok(self.status())
    }

    fn start(&mut self, action: A) -> Result<(), ActionError> {
        let handler = self
            .handlers
            .get_mut(&action)
            .ok_or_else(|| ActionError::MissingHandler(action.to_string()))?;

        debug!("Starting {}", action);

        let done = handler.start(&mut self.state);
        self.update_status(action, done);

        Ok(())
    }

    fn resume(&mut self, action: A) -> Result<(), ActionError> {
        let handler = self
            .handlers
            .get_mut(&action)
            .ok_or_else(|| ActionError::MissingHandler(action.to_string()))?;

        let done = handler.resume(&mut self.state);
        self.update_status(action, done);

        Ok(())
    }

    fn update_status(&mut self, action: A, done: bool) {
        if done {
            debug!("{} complete", action);
            self.in_progress = None;
        } else {
            self.in_progress = Some(action);
        }
    }
}
