//! # Drill control program
//!
//! The per-tick entry point. The host calls [`Program::main`] once per tick with the argument it
//! was invoked with (empty for a periodic tick) and the source of the invocation. Each call:
//!
//! 1. Checks the rig is complete, nothing runs on an incomplete rig.
//! 2. Parses the argument into a [`DrillAction`].
//! 3. Processes one tick of the action machine.
//! 4. Requests a periodic tick from the host while an action is in flight, and cancels it once
//!    idle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error, info, trace, warn};
use serde::Serialize;
use util::module::State;

use super::{
    new_machine, DrillAction, DrillCtrlError, DrillMachine, DrillState, Params, Runtime,
    UpdateFrequency, UpdateSource,
};
use crate::{
    act::{Drill, Piston, Rotor},
    action::{ActionError, ActionState, MachineStatus},
};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Name based lookup of the rig's blocks on the host.
pub trait BlockSource {
    /// Every piston in the named group, or `None` if the group doesn't exist.
    fn piston_group(&self, name: &str) -> Option<Vec<Box<dyn Piston>>>;

    fn rotor(&self, name: &str) -> Option<Box<dyn Rotor>>;

    fn drill(&self, name: &str) -> Option<Box<dyn Drill>>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Program<R> {
    machine: DrillMachine,
    runtime: R,
}

/// Input data to one [`Program`] tick.
#[derive(Debug, Clone)]
pub struct InputData {
    /// The argument the host was invoked with, empty for a periodic tick.
    pub argument: String,

    pub source: UpdateSource,
}

/// Snapshot of the program for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub action: Option<DrillAction>,
    pub stage: i32,
    pub active: bool,

    pub target_horizontal_position_m: f32,
    pub target_angle_rad: f32,
    pub drill_depth_m: f32,
    pub drill_enabled: bool,

    pub update_frequency: UpdateFrequency,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<R: Runtime> Program<R> {
    /// Build the program around an already resolved rig.
    ///
    /// An incomplete rig is accepted here and reported on every tick.
    pub fn new(state: DrillState, mut runtime: R) -> Result<Self, DrillCtrlError> {
        state.params().validate()?;

        if !state.is_complete() {
            error!("Drill rig is incomplete: {}", state.error());
        }

        let machine = new_machine(state)?;
        runtime.set_update_frequency(UpdateFrequency::None);

        info!("DrillCtrl initialised");

        Ok(Self { machine, runtime })
    }

    /// Resolve the rig's blocks from `source` and build the program.
    pub fn resolve<B: BlockSource>(
        source: &B,
        params: Params,
        runtime: R,
    ) -> Result<Self, DrillCtrlError> {
        Self::new(DrillState::resolve(source, params), runtime)
    }

    /// Run one tick.
    ///
    /// `argument` is an action name, or empty/whitespace to continue the action in flight.
    pub fn main(
        &mut self,
        argument: &str,
        source: UpdateSource,
    ) -> Result<MachineStatus<DrillAction>, DrillCtrlError> {
        let state = self.machine.state();
        if !state.is_complete() {
            let err = ActionError::ConfigurationIncomplete(state.error());
            error!("{}", err);
            return Err(err.into());
        }

        let argument = argument.trim();
        let action = if argument.is_empty() {
            if !source.is_periodic() {
                trace!("Invoked without an action ({:?}), continuing", source);
            }
            None
        } else {
            match argument.parse::<DrillAction>() {
                Ok(a) => {
                    debug!("{} requested ({:?})", a, source);
                    Some(a)
                }
                Err(e) => {
                    warn!("{} ({:?})", e, source);
                    return Err(e);
                }
            }
        };

        let status = self.machine.process(action)?;

        let frequency = match status {
            MachineStatus::Active { .. } => self.machine.state().params().update_frequency,
            MachineStatus::Idle => UpdateFrequency::None,
        };
        if self.runtime.update_frequency() != frequency {
            debug!("Requesting update frequency {:?}", frequency);
            self.runtime.set_update_frequency(frequency);
        }

        Ok(status)
    }

    pub fn status(&self) -> MachineStatus<DrillAction> {
        self.machine.status()
    }

    pub fn state(&self) -> &DrillState {
        self.machine.state()
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn report(&self) -> StatusReport {
        let state = self.machine.state();
        let (action, stage) = match self.machine.status() {
            MachineStatus::Active { action, stage } => (Some(action), stage),
            MachineStatus::Idle => (None, crate::action::TERMINAL_STAGE),
        };

        StatusReport {
            action,
            stage,
            active: action.is_some(),
            target_horizontal_position_m: state.target_horizontal_position(),
            target_angle_rad: state.target_angle(),
            drill_depth_m: state.drill_depth(),
            drill_enabled: state.drill_enabled(),
            update_frequency: self.runtime.update_frequency(),
        }
    }
}

impl<R: Runtime> State for Program<R> {
    type InputData = InputData;
    type OutputData = MachineStatus<DrillAction>;
    type StatusReport = StatusReport;
    type ProcError = DrillCtrlError;

    /// Run one tick and report on it.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let status = self.main(&input_data.argument, input_data.source)?;

        Ok((status, self.report()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        act::sim::{SimRig, SimRigParams},
        drill_ctrl::LocalRuntime,
    };

    const DT_S: f32 = 0.1;

    fn program(rig: &SimRig) -> Program<LocalRuntime> {
        Program::resolve(rig, Params::default(), LocalRuntime::default()).unwrap()
    }

    fn start(program: &mut Program<LocalRuntime>, action: &str) -> MachineStatus<DrillAction> {
        program.main(action, UpdateSource::Terminal).unwrap()
    }

    /// Nothing travels unless the drill is raised and held, and the drill is only on when
    /// nothing travels.
    fn assert_safe(rig: &SimRig, program: &Program<LocalRuntime>) {
        let travelling = rig.horizontal.iter().any(|p| p.enabled())
            || rig.rotor.as_ref().map_or(false, |r| r.enabled());

        if travelling {
            assert!(program.state().drill_raised());
            assert!(rig.vertical.iter().all(|p| !p.enabled()));
            assert!(!program.state().drill_enabled());
        }
    }

    /// Step the rig and tick the program until it goes idle, returning the number of ticks.
    fn run_to_idle(program: &mut Program<LocalRuntime>, rig: &SimRig) -> usize {
        let mut ticks = 0;
        while program.status() != MachineStatus::Idle {
            rig.step(DT_S);
            program.main("", UpdateSource::Update100).unwrap();
            assert_safe(rig, program);

            ticks += 1;
            assert!(ticks < 10_000, "action did not finish");
        }
        ticks
    }

    #[test]
    fn test_extend_and_drill() {
        let rig = SimRig::new(&SimRigParams::default());
        let mut program = program(&rig);
        assert_eq!(program.runtime().update_frequency(), UpdateFrequency::None);

        let status = start(&mut program, "extendAndDrill");
        assert_eq!(
            status,
            MachineStatus::Active {
                action: DrillAction::ExtendAndDrill,
                stage: 1
            }
        );
        assert_eq!(
            program.runtime().update_frequency(),
            UpdateFrequency::Update100
        );
        assert_eq!(program.state().target_horizontal_position(), 0.5);

        run_to_idle(&mut program, &rig);

        assert!(rig.is_disabled());
        assert!(program.state().drill_lowered());
        assert!(rig.horizontal.iter().all(|p| p.current_position() >= 0.5));
        assert_eq!(program.runtime().update_frequency(), UpdateFrequency::None);
    }

    #[test]
    fn test_rotate_and_drill() {
        let cases = [("rotateCWAndDrill", 1.0f32), ("rotateCCWAndDrill", -1.0f32)];
        for &(name, direction) in cases.iter() {
            let rig = SimRig::new(&SimRigParams::default());
            let mut program = program(&rig);
            let increment = program.state().params().angle_increment;

            start(&mut program, name);
            assert_eq!(program.state().target_angle(), direction * increment);

            run_to_idle(&mut program, &rig);

            let angle = rig.rotor.as_ref().unwrap().angle();
            assert!(angle * direction >= increment);
            assert!(program.state().drill_lowered());
            assert!(rig.is_disabled());
        }
    }

    #[test]
    fn test_lift_before_travel() {
        let rig = SimRig::new(&SimRigParams {
            horizontal_initial_m: 3.0,
            vertical_initial_m: 4.0,
            ..Default::default()
        });
        let mut program = program(&rig);

        start(&mut program, "retractAndDrill");
        assert_eq!(program.state().target_horizontal_position(), 2.5);

        // Lifting 6 m at fast speed, no horizontal travel until raised
        for _ in 0..59 {
            rig.step(DT_S);
            program.main("", UpdateSource::Update100).unwrap();
            assert!(rig.horizontal.iter().all(|p| !p.enabled()));
            assert!(rig.horizontal.iter().all(|p| p.current_position() == 3.0));
        }

        run_to_idle(&mut program, &rig);
        assert!(rig.horizontal.iter().all(|p| p.current_position() <= 2.5));
    }

    #[test]
    fn test_stop_while_lifting() {
        let rig = SimRig::new(&SimRigParams {
            vertical_initial_m: 4.0,
            ..Default::default()
        });
        let mut program = program(&rig);

        start(&mut program, "retractAndDrill");
        rig.step(DT_S);
        program.main("", UpdateSource::Update100).unwrap();
        assert_eq!(
            program.status(),
            MachineStatus::Active {
                action: DrillAction::RetractAndDrill,
                stage: 1
            }
        );
        assert!(!rig.is_disabled());

        assert_eq!(start(&mut program, "stop"), MachineStatus::Idle);
        assert!(rig.is_disabled());
        assert_eq!(program.runtime().update_frequency(), UpdateFrequency::None);
    }

    #[test]
    fn test_stop_overrides() {
        // While seeking
        let rig = SimRig::new(&SimRigParams {
            horizontal_initial_m: 3.0,
            ..Default::default()
        });
        let mut program = program(&rig);

        start(&mut program, "retractAndDrill");
        program.main("", UpdateSource::Update100).unwrap();
        assert_eq!(
            program.status(),
            MachineStatus::Active {
                action: DrillAction::RetractAndDrill,
                stage: 2
            }
        );
        assert!(!rig.is_disabled());

        assert_eq!(start(&mut program, "stop"), MachineStatus::Idle);
        assert!(rig.is_disabled());
        assert_eq!(program.runtime().update_frequency(), UpdateFrequency::None);

        // And while drilling
        start(&mut program, "retractAndDrill");
        for _ in 0..20 {
            rig.step(DT_S);
            program.main("", UpdateSource::Update100).unwrap();
        }
        assert!(program.state().drill_enabled());
        assert_eq!(start(&mut program, "stop"), MachineStatus::Idle);
        assert!(rig.is_disabled());
    }

    #[test]
    fn test_non_override_request_ignored() {
        let rig = SimRig::new(&SimRigParams {
            horizontal_initial_m: 2.0,
            ..Default::default()
        });
        let mut program = program(&rig);

        start(&mut program, "extendAndDrill");
        for _ in 0..4 {
            rig.step(DT_S);
            program.main("", UpdateSource::Update100).unwrap();
        }
        assert!(rig.horizontal[0].current_position() > 2.0);

        // Neither another action nor the same one restarts the cycle
        let status = start(&mut program, "rotateCWAndDrill");
        assert_eq!(
            status,
            MachineStatus::Active {
                action: DrillAction::ExtendAndDrill,
                stage: 2
            }
        );
        assert_eq!(program.state().target_angle(), 0.0);

        start(&mut program, "extendAndDrill");
        assert_eq!(program.state().target_horizontal_position(), 2.5);
    }

    #[test]
    fn test_retract_all_converges() {
        let rig = SimRig::new(&SimRigParams {
            horizontal_initial_m: 3.0,
            rotor_initial_rad: -1.0,
            ..Default::default()
        });
        rig.vertical[1].set_position(7.0);
        let mut program = program(&rig);

        start(&mut program, "extendAndDrill");
        start(&mut program, "retractAll");
        run_to_idle(&mut program, &rig);

        let state = program.state();
        assert!(state.drill_raised() && state.horizontal_home() && state.rotor_at_upper_limit());
        assert!(rig.is_disabled());

        // Repeated requests hold the stowed pose
        for _ in 0..3 {
            assert_eq!(start(&mut program, "retractAll"), MachineStatus::Idle);
            rig.step(DT_S);
            assert!(rig.is_disabled());
        }
    }

    #[test]
    fn test_unknown_action() {
        let rig = SimRig::new(&SimRigParams::default());
        let mut program = program(&rig);

        start(&mut program, "extendAndDrill");
        let before = program.status();

        assert!(matches!(
            program.main("drillEverything", UpdateSource::Terminal),
            Err(DrillCtrlError::UnknownAction(_))
        ));
        assert_eq!(program.status(), before);

        // Whitespace is trimmed, empty continues
        assert!(program.main("  stop \n", UpdateSource::Terminal).is_ok());
        assert!(program.main("   ", UpdateSource::Trigger).is_ok());
        assert!(rig.is_disabled());
    }

    #[test]
    fn test_incomplete_rig() {
        let rig = SimRig::new(&SimRigParams {
            num_vertical_pistons: 0,
            ..Default::default()
        });
        let mut program = program(&rig);

        let mut piston = rig.horizontal[0].clone();
        piston.set_enabled(true);

        for action in ["stop", "retractAll", "", "notAnAction"].iter() {
            assert!(matches!(
                program.main(action, UpdateSource::Terminal),
                Err(DrillCtrlError::Action(ActionError::ConfigurationIncomplete(_)))
            ));
        }

        assert!(piston.enabled());
        assert_eq!(program.status(), MachineStatus::Idle);
    }

    #[test]
    fn test_invalid_params() {
        let rig = SimRig::new(&SimRigParams::default());
        let params = Params {
            fast_speed: 0.0,
            ..Default::default()
        };

        assert!(matches!(
            Program::resolve(&rig, params, LocalRuntime::default()),
            Err(DrillCtrlError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_configured_frequency() {
        let rig = SimRig::new(&SimRigParams::default());
        let params = Params {
            update_frequency: UpdateFrequency::Update10,
            ..Default::default()
        };
        let mut program = Program::resolve(&rig, params, LocalRuntime::default()).unwrap();

        start(&mut program, "extendDrillLine");
        assert_eq!(
            program.runtime().update_frequency(),
            UpdateFrequency::Update10
        );

        // The drill is already raised, so the line finishes on the next tick
        program.main("", UpdateSource::Update10).unwrap();
        assert_eq!(program.status(), MachineStatus::Idle);
        assert_eq!(program.runtime().update_frequency(), UpdateFrequency::None);
    }

    #[test]
    fn test_proc() {
        let rig = SimRig::new(&SimRigParams::default());
        let mut program = program(&rig);

        let (status, report) = program
            .proc(&InputData {
                argument: String::from("extendAndDrill"),
                source: UpdateSource::Script,
            })
            .unwrap();
        assert!(matches!(status, MachineStatus::Active { .. }));
        assert!(report.active);
        assert_eq!(report.target_horizontal_position_m, 0.5);

        let tick = InputData {
            argument: String::new(),
            source: UpdateSource::Update100,
        };
        rig.step(DT_S);
        let (status, report) = program.proc(&tick).unwrap();
        assert_eq!(status, program.status());
        assert_eq!(report.action, Some(DrillAction::ExtendAndDrill));
        assert_eq!(report.update_frequency, UpdateFrequency::Update100);

        assert!(matches!(
            program.proc(&InputData {
                argument: String::from("drillFaster"),
                source: UpdateSource::Script,
            }),
            Err(DrillCtrlError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_report() {
        let rig = SimRig::new(&SimRigParams::default());
        let mut program = program(&rig);

        let report = program.report();
        assert!(!report.active);
        assert_eq!(report.stage, crate::action::TERMINAL_STAGE);

        start(&mut program, "extendAndDrill");
        let report = program.report();
        assert_eq!(report.action, Some(DrillAction::ExtendAndDrill));
        assert_eq!(report.stage, 1);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"active\":true"));
        assert!(json.contains("\"update_frequency\":\"Update100\""));
    }
}
