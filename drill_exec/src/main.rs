//! Main drill rig executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Build the simulated rig and resolve the drill control program against it
//!     - Main loop:
//!         - Action delivery, from a timed script or the terminal
//!         - Periodic tick, at the frequency the program requested
//!         - Simulation step
//!         - Status reporting
//!
//! Execution ends once the action source is exhausted and the program is idle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::{
    env,
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::{Duration, Instant},
};

// Internal
use drill_lib::{
    act::sim::SimRig,
    action::MachineStatus,
    drill_ctrl::{
        InputData, LocalRuntime, Params, Program, Runtime, UpdateFrequency, UpdateSource,
    },
    params::DrillExecParams,
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("drill_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Drill Rig Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: DrillExecParams =
        util::params::load("drill_exec.toml").wrap_err("Could not load exec params")?;
    exec_params
        .validate()
        .wrap_err("Invalid exec params")?;

    let drill_params: Params =
        util::params::load("drill_ctrl.toml").wrap_err("Could not load DrillCtrl params")?;

    info!("Parameters loaded");

    // ---- INITIALISE ACTION SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // If we have a single argument use it as the script path, otherwise read the terminal
    let mut action_source = if args.len() == 2 {
        info!("Loading script from \"{}\"", &args[1]);

        let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

        info!(
            "Loaded script lasts {:.02} s and contains {} actions\n",
            si.get_duration(),
            si.get_num_cmds()
        );

        ActionSource::Script(si)
    } else if args.len() == 1 {
        info!("No script provided, enter actions on the terminal\n");
        ActionSource::Terminal(spawn_terminal_reader())
    } else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}",
            args.len() - 1
        ));
    };

    // ---- INITIALISE RIG ----

    let rig = SimRig::new(&exec_params.sim);
    info!(
        "Simulated rig \"{}\" with {} horizontal and {} vertical pistons",
        rig.group_prefix,
        rig.horizontal.len(),
        rig.vertical.len()
    );

    let mut program = Program::resolve(&rig, drill_params, LocalRuntime::default())
        .wrap_err("Failed to initialise DrillCtrl")?;

    // ---- MAIN LOOP ----

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let mut num_cycles: u64 = 0;
    let mut cycles_since_tick: u64 = 0;
    let mut source_exhausted = false;
    let mut last_status = program.status();

    info!("Beginning main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- ACTION DELIVERY ----

        let mut inputs: Vec<InputData> = vec![];

        match action_source.pending() {
            Some(actions) => inputs.extend(actions.into_iter().map(|argument| InputData {
                argument,
                source: action_source.update_source(),
            })),
            None => {
                if !source_exhausted {
                    info!("End of actions reached, stopping once idle");
                    source_exhausted = true;
                }
            }
        }

        // ---- PERIODIC TICK ----

        let frequency = program.runtime().update_frequency();
        match (frequency.period_cycles(), frequency.source()) {
            (Some(period), Some(source)) => {
                cycles_since_tick += 1;

                if cycles_since_tick >= period {
                    cycles_since_tick = 0;

                    // A single tick is consumed by the host
                    if frequency == UpdateFrequency::Once {
                        program
                            .runtime_mut()
                            .set_update_frequency(UpdateFrequency::None);
                    }

                    inputs.push(InputData {
                        argument: String::new(),
                        source,
                    });
                }
            }
            _ => cycles_since_tick = 0,
        }

        // ---- DRILLCTRL PROCESSING ----

        let mut report = None;
        for input in inputs.iter() {
            match program.proc(input) {
                Ok((_, r)) => report = Some(r),
                Err(e) => warn!(
                    "Error during DrillCtrl processing of \"{}\" ({:?}): {}",
                    input.argument, input.source, e
                ),
            }
        }

        // ---- SIMULATION ----

        rig.step(exec_params.cycle_period_s as f32);

        // ---- STATUS REPORT ----

        let status = program.status();
        if status != last_status {
            if let Some(ref r) = report {
                info!(
                    "DrillCtrl status: {}",
                    serde_json::to_string(r).wrap_err("Failed to serialise the status report")?
                );
            }
            last_status = status;
        }

        if source_exhausted && status == MachineStatus::Idle {
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            ),
        }

        // Increment cycle counter
        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution after {} cycles", num_cycles);

    Ok(())
}

/// Read lines from the terminal on a background thread.
///
/// The channel disconnects when the terminal is closed.
fn spawn_terminal_reader() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if sender.send(l).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Could not read from the terminal: {}", e);
                    break;
                }
            }
        }
    });

    receiver
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Sources of the actions delivered to the program.
enum ActionSource {
    Script(ScriptInterpreter),
    Terminal(Receiver<String>),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ActionSource {
    /// Actions which became due since the last cycle, or `None` once the source is exhausted.
    fn pending(&mut self) -> Option<Vec<String>> {
        match self {
            ActionSource::Script(si) => match si.get_pending_cmds() {
                PendingCmds::None => Some(vec![]),
                PendingCmds::Some(cmds) => Some(cmds),
                PendingCmds::EndOfScript => None,
            },
            ActionSource::Terminal(receiver) => {
                let mut lines = vec![];
                loop {
                    match receiver.try_recv() {
                        Ok(l) => {
                            // Blank lines aren't actions
                            if !l.trim().is_empty() {
                                lines.push(l);
                            }
                        }
                        Err(TryRecvError::Empty) => return Some(lines),
                        Err(TryRecvError::Disconnected) => {
                            return match lines.is_empty() {
                                true => None,
                                false => Some(lines),
                            }
                        }
                    }
                }
            }
        }
    }

    fn update_source(&self) -> UpdateSource {
        match self {
            ActionSource::Script(_) => UpdateSource::Script,
            ActionSource::Terminal(_) => UpdateSource::Terminal,
        }
    }
}
