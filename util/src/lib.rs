//! Utility library for the Drill Rig Software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Host platform helpers
pub mod host;

/// Logging initialisation
pub mod logger;

/// Control module interfaces
pub mod module;

/// Parameter file loading
pub mod params;

/// Timed command scripts
pub mod script_interpreter;

/// Session management, the session epoch and directory
pub mod session;

/// Time conversion helpers
pub mod time;
