//! # Angular drill cycle target

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;

use super::SeekTarget;
use crate::drill_ctrl::{DrillState, RotationDirection};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SeekTarget for RotationDirection {
    fn label(self) -> &'static str {
        match self {
            RotationDirection::Clockwise => "rotateCWAndDrill",
            RotationDirection::CounterClockwise => "rotateCCWAndDrill",
        }
    }

    fn capture(self, state: &mut DrillState) {
        let current = state.rotor_angle();
        state.target_angle = current + self.sign() * state.params.angle_increment;

        debug!(
            "{}: angle target {:.4} rad (from {:.4} rad)",
            self.label(),
            state.target_angle,
            current
        );
    }

    fn reached(self, state: &DrillState) -> bool {
        state.reached_target_angle(self)
    }

    fn drive(self, state: &mut DrillState) {
        let rpm = self.sign() * state.params.safe_angle_rpm;

        state.set_rotor_velocity(rpm);
        state.set_rotor_enabled(true);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        act::{
            sim::{SimRig, SimRigParams},
            Rotor,
        },
        drill_ctrl::Params,
    };

    #[test]
    fn test_rotation_targets() {
        let rig = SimRig::new(&SimRigParams {
            rotor_initial_rad: 1.0,
            ..Default::default()
        });
        let params = Params {
            angle_increment: 0.25,
            ..Default::default()
        };
        let mut state = DrillState::resolve(&rig, params);
        let rotor = rig.rotor.as_ref().unwrap();

        RotationDirection::Clockwise.capture(&mut state);
        assert_eq!(state.target_angle(), 1.25);
        RotationDirection::Clockwise.drive(&mut state);
        assert!(rotor.enabled());
        assert_eq!(rotor.target_velocity_rpm(), 1.0);
        assert!(!RotationDirection::Clockwise.reached(&state));
        rotor.set_angle(1.25);
        assert!(RotationDirection::Clockwise.reached(&state));

        rotor.set_angle(1.0);
        RotationDirection::CounterClockwise.capture(&mut state);
        assert_eq!(state.target_angle(), 0.75);
        RotationDirection::CounterClockwise.drive(&mut state);
        assert_eq!(rotor.target_velocity_rpm(), -1.0);
        assert!(!RotationDirection::CounterClockwise.reached(&state));
        rotor.set_angle(0.7);
        assert!(RotationDirection::CounterClockwise.reached(&state));
    }
}
