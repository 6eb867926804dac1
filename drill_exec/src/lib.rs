//! # Drill rig library.
//!
//! This library allows the executable, benches and other crates in the workspace to access the
//! drill rig control program.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Actuator facade - traits for the rig's pistons, rotor and drill, plus a simulated rig
pub mod act;

/// Action engine - runs staged, resumable actions one at a time with override rules
pub mod action;

/// Drill control - the drilling rig program built on the action engine
pub mod drill_ctrl;

/// Executable parameters
pub mod params;
