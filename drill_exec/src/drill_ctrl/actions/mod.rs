//! # Drill actions
//!
//! One stage enumeration per action. The horizontal and angular drilling actions share the
//! [`DrillCycle`] phases and differ only in the [`SeekTarget`] they chase.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod drill_cycle;
mod drill_line;
mod move_horizontal;
mod retract_all;
mod rotate;
mod stop;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use drill_cycle::{DrillCycle, SeekTarget};
pub use drill_line::DrillLineStage;
pub use retract_all::RetractAllStage;
pub use stop::StopStage;
