//! # Drill rig script interpreter module
//!
//! This module provides an interpreter for timed rig scripts, allowing actions to be delivered to
//! the control program at fixed times after the start of the session.
//!
//! A script is a list of `<seconds>: <action>;` entries, for example:
//!
//! ```text
//! 0.5: retractAll;
//! 20.0: extendAndDrill;
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The argument to deliver to the control program
    arg: String,
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use `.get_pending_cmds` to acquire a
/// list of commands that need executing.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an empty command at {0} s")]
    EmptyCmd(f64),
}

#[derive(Debug, PartialEq)]
pub enum PendingCmds {
    None,
    Some(Vec<String>),
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        // Load the script into a string
        let script = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e)),
        };

        Ok(ScriptInterpreter {
            _script_path: path,
            cmds: parse_script(&script)?,
        })
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {
        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            cmds: parse_script(script)?,
        })
    }

    /// Return the commands due at the current session time.
    pub fn get_pending_cmds(&mut self) -> PendingCmds {
        self.get_pending_cmds_at(get_elapsed_seconds())
    }

    /// Return the commands due at the given time, or `None` if no commands need executing.
    pub fn get_pending_cmds_at(&mut self, current_time_s: f64) -> PendingCmds {
        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingCmds::EndOfScript;
        }

        let mut cmd_vec: Vec<String> = vec![];

        // Pop items from the queue while the head's exec time is lower than the current time
        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s >= current_time_s {
                break;
            }
            if let Some(cmd) = self.cmds.pop_front() {
                cmd_vec.push(cmd.arg);
            }
        }

        // If the vector is longer than 0 return Some, otherwise None
        if !cmd_vec.is_empty() {
            PendingCmds::Some(cmd_vec)
        } else {
            PendingCmds::None
        }
    }

    /// Get the number of commands remaining in the script
    pub fn get_num_cmds(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64,
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn parse_script(script: &str) -> Result<VecDeque<Command>, ScriptError> {
    // Empty queue of commands
    let mut cmd_queue: VecDeque<Command> = VecDeque::new();

    // Go through the script executing __the magic regex__.
    let re = match RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
        .multi_line(true)
        .build()
    {
        Ok(r) => r,
        Err(_) => return Err(ScriptError::ScriptEmpty),
    };

    for cap in re.captures_iter(script) {
        let time_str = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
        let arg = cap.get(3).map(|m| m.as_str().trim()).unwrap_or_default();

        // Parse the exec time
        let exec_time_s: f64 = match time_str.parse() {
            Ok(t) => t,
            Err(e) => return Err(ScriptError::InvalidTimestamp(format!("{}", e))),
        };

        if arg.is_empty() {
            return Err(ScriptError::EmptyCmd(exec_time_s));
        }

        // Build command from the match
        cmd_queue.push_back(Command {
            exec_time_s,
            arg: arg.to_string(),
        });
    }

    if cmd_queue.is_empty() {
        return Err(ScriptError::ScriptEmpty);
    }

    Ok(cmd_queue)
}
