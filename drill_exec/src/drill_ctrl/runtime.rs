//! Host scheduling interface
//!
//! The host decides when the program runs. The program only asks for a periodic tick while an
//! action is in flight, and cancels it once idle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// The host's scheduling facility.
pub trait Runtime {
    fn update_frequency(&self) -> UpdateFrequency;

    fn set_update_frequency(&mut self, frequency: UpdateFrequency);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A [`Runtime`] which only records the requested frequency, for hosts which poll it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalRuntime {
    frequency: UpdateFrequency,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Periodic tick modes the host offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateFrequency {
    /// No periodic tick, the program only runs when triggered.
    None,

    /// A single tick on the next host cycle, after which the host falls back to `None`.
    Once,

    /// Every host cycle.
    Update1,

    /// Every 10th host cycle.
    Update10,

    /// Every 100th host cycle.
    Update100,
}

/// What caused the host to invoke the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateSource {
    /// An operator entered an action.
    Terminal,

    /// Another block triggered the program.
    Trigger,

    /// A timed script delivered an action.
    Script,

    /// The single tick requested with [`UpdateFrequency::Once`].
    Once,

    /// A periodic tick requested through [`Runtime::set_update_frequency`].
    Update1,
    Update10,
    Update100,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl UpdateFrequency {
    /// Number of host cycles between ticks, or `None` if no periodic tick is requested.
    pub fn period_cycles(self) -> Option<u64> {
        match self {
            UpdateFrequency::None => None,
            UpdateFrequency::Once | UpdateFrequency::Update1 => Some(1),
            UpdateFrequency::Update10 => Some(10),
            UpdateFrequency::Update100 => Some(100),
        }
    }

    /// The update source of a periodic tick at this frequency.
    pub fn source(self) -> Option<UpdateSource> {
        match self {
            UpdateFrequency::None => None,
            UpdateFrequency::Once => Some(UpdateSource::Once),
            UpdateFrequency::Update1 => Some(UpdateSource::Update1),
            UpdateFrequency::Update10 => Some(UpdateSource::Update10),
            UpdateFrequency::Update100 => Some(UpdateSource::Update100),
        }
    }
}

impl Default for UpdateFrequency {
    fn default() -> Self {
        UpdateFrequency::None
    }
}

impl UpdateSource {
    /// True for ticks resuming an action rather than delivering one.
    pub fn is_periodic(self) -> bool {
        matches!(
            self,
            UpdateSource::Once
                | UpdateSource::Update1
                | UpdateSource::Update10
                | UpdateSource::Update100
        )
    }
}

impl Runtime for LocalRuntime {
    fn update_frequency(&self) -> UpdateFrequency {
        self.frequency
    }

    fn set_update_frequency(&mut self, frequency: UpdateFrequency) {
        self.frequency = frequency;
    }
}
