//! Implementations for the DrillCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{error, trace};

// Internal
use super::{BlockSource, DrillCtrlError, Params};
use crate::{
    act::{Drill, PistonGroup, Rotor},
    action::ActionState,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The rig's actuators, its configuration, and the targets of the action in progress.
///
/// Owned by the action machine and mutated only by the handler running in the current tick.
pub struct DrillState {
    pub(crate) params: Params,

    horizontal: PistonGroup,
    vertical: PistonGroup,
    rotor: Option<Box<dyn Rotor>>,
    drill: Option<Box<dyn Drill>>,

    /// Horizontal piston position being sought, captured when a horizontal action starts.
    ///
    /// Units: meters
    pub(crate) target_horizontal_position: f32,

    /// Rotor angle being sought, captured when a rotate action starts.
    ///
    /// Units: radians
    pub(crate) target_angle: f32,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The logical piston groups of the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorGroup {
    Horizontal,
    Vertical,
}

/// Direction of travel of a piston.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PistonDirection {
    Extending,
    Retracting,
}

/// Horizontal movement of the drill head relative to the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalDirection {
    /// Away from the base.
    Extend,

    /// Towards the base.
    Retract,
}

/// Direction of rotation, clockwise is a positive rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PistonDirection {
    pub fn sign(self) -> f32 {
        match self {
            PistonDirection::Extending => 1.0,
            PistonDirection::Retracting => -1.0,
        }
    }
}

impl RotationDirection {
    pub fn sign(self) -> f32 {
        match self {
            RotationDirection::Clockwise => 1.0,
            RotationDirection::CounterClockwise => -1.0,
        }
    }
}

impl ActionState for DrillState {
    fn is_complete(&self) -> bool {
        self.rotor.is_some()
            && self.drill.is_some()
            && !self.horizontal.is_empty()
            && !self.vertical.is_empty()
    }

    fn error(&self) -> String {
        format!(
            "required components missing: [rotor {}] [drill {}] [hPistons {}] [vPistons {}]",
            self.rotor.is_none(),
            self.drill.is_none(),
            self.horizontal.len(),
            self.vertical.len()
        )
    }
}

impl DrillState {
    pub fn new(
        params: Params,
        horizontal: PistonGroup,
        vertical: PistonGroup,
        rotor: Option<Box<dyn Rotor>>,
        drill: Option<Box<dyn Drill>>,
    ) -> Self {
        Self {
            params,
            horizontal,
            vertical,
            rotor,
            drill,
            target_horizontal_position: 0.0,
            target_angle: 0.0,
        }
    }

    /// Resolve the rig's actuators by name.
    ///
    /// Anything which can't be found is left empty, so that the state reports itself incomplete
    /// rather than failing here.
    pub fn resolve<B: BlockSource>(source: &B, params: Params) -> Self {
        let group = |name: String| match source.piston_group(&name) {
            Some(pistons) => PistonGroup::new(pistons),
            None => {
                error!("{}", DrillCtrlError::GroupNotFound(name));
                PistonGroup::default()
            }
        };

        let horizontal = group(params.horizontal_group_name());
        let vertical = group(params.vertical_group_name());
        let rotor = source.rotor(&params.rotor_name());
        let drill = source.drill(&params.drill_name());

        Self::new(params, horizontal, vertical, rotor, drill)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn target_horizontal_position(&self) -> f32 {
        self.target_horizontal_position
    }

    pub fn target_angle(&self) -> f32 {
        self.target_angle
    }

    pub fn group(&self, group: ActuatorGroup) -> &PistonGroup {
        match group {
            ActuatorGroup::Horizontal => &self.horizontal,
            ActuatorGroup::Vertical => &self.vertical,
        }
    }

    fn group_mut(&mut self, group: ActuatorGroup) -> &mut PistonGroup {
        match group {
            ActuatorGroup::Horizontal => &mut self.horizontal,
            ActuatorGroup::Vertical => &mut self.vertical,
        }
    }

    // ---- PISTON QUERIES ----
    //
    // Limits are compared for exact equality with the last reported positions, the actuators
    // stop exactly on their limits.

    /// True if every vertical piston is at its highest position.
    pub fn full_extension(&self) -> bool {
        self.vertical
            .all(|p| p.current_position() == p.highest_position())
    }

    /// True if every vertical piston is at its lowest position.
    pub fn full_retraction(&self) -> bool {
        self.vertical
            .all(|p| p.current_position() == p.lowest_position())
    }

    /// True if every horizontal piston is at its lowest position.
    pub fn full_horizontal_retraction(&self) -> bool {
        self.horizontal
            .all(|p| p.current_position() == p.lowest_position())
    }

    /// True if every horizontal piston is at its highest position.
    pub fn full_horizontal_extension(&self) -> bool {
        self.horizontal
            .all(|p| p.current_position() == p.highest_position())
    }

    /// Total distance of the vertical pistons below their highest positions.
    ///
    /// Summed over the group, so it scales with the number of pistons.
    pub fn vertical_retraction_depth(&self) -> f32 {
        self.vertical
            .sum(|p| p.highest_position() - p.current_position())
    }

    /// Total distance of the vertical pistons above their lowest positions.
    pub fn vertical_extension_depth(&self) -> f32 {
        self.vertical
            .sum(|p| p.current_position() - p.lowest_position())
    }

    /// True if every horizontal piston has reached the target moving in the given direction.
    pub fn reached_target_horizontal(&self, direction: PistonDirection) -> bool {
        let target = self.target_horizontal_position;
        match direction {
            PistonDirection::Extending => self.horizontal.all(|p| p.current_position() >= target),
            PistonDirection::Retracting => self.horizontal.all(|p| p.current_position() <= target),
        }
    }

    /// Drilling speed of a single vertical piston, such that the whole group moves the drill at
    /// the configured safe speed.
    pub fn safe_vertical_drill_speed(&self) -> f32 {
        self.params.safe_vertical_drill_speed / self.vertical.len() as f32
    }

    // ---- ROTOR QUERIES ----

    pub fn rotor_angle(&self) -> f32 {
        self.rotor.as_ref().map_or(0.0, |r| r.angle())
    }

    pub fn rotor_at_upper_limit(&self) -> bool {
        self.rotor
            .as_ref()
            .map_or(false, |r| r.angle() == r.upper_limit_angle())
    }

    pub fn reached_target_angle(&self, direction: RotationDirection) -> bool {
        let angle = self.rotor_angle();
        match direction {
            RotationDirection::Clockwise => angle >= self.target_angle,
            RotationDirection::CounterClockwise => angle <= self.target_angle,
        }
    }

    pub fn drill_enabled(&self) -> bool {
        self.drill.as_ref().map_or(false, |d| d.enabled())
    }

    // ---- RIG QUERIES ----

    /// Piston direction which lifts the drill out of the ground.
    fn lift_direction(&self) -> PistonDirection {
        if self.params.invert_vertical {
            PistonDirection::Extending
        } else {
            PistonDirection::Retracting
        }
    }

    /// True if the drill is fully lifted clear of the ground.
    pub fn drill_raised(&self) -> bool {
        match self.lift_direction() {
            PistonDirection::Extending => self.full_extension(),
            PistonDirection::Retracting => self.full_retraction(),
        }
    }

    /// True if the drill is at the bottom of its travel.
    pub fn drill_lowered(&self) -> bool {
        match self.lift_direction() {
            PistonDirection::Extending => self.full_retraction(),
            PistonDirection::Retracting => self.full_extension(),
        }
    }

    /// How far the drill is below its raised position.
    pub fn drill_depth(&self) -> f32 {
        match self.lift_direction() {
            PistonDirection::Extending => self.vertical_retraction_depth(),
            PistonDirection::Retracting => self.vertical_extension_depth(),
        }
    }

    /// Per-piston speed at which to drill down from the current depth.
    ///
    /// While the drill is still within the clearance above the ground it moves at the fast speed,
    /// from the clearance depth onwards at the safe speed.
    pub fn drill_down_speed(&self) -> f32 {
        if self.drill_depth() < self.params.vertical_clearance {
            self.params.fast_speed
        } else {
            self.safe_vertical_drill_speed()
        }
    }

    /// Vertical piston velocity which lifts the drill at fast speed.
    pub fn lift_velocity(&self) -> f32 {
        self.lift_direction().sign() * self.params.fast_speed
    }

    /// Vertical piston velocity which lowers the drill at `speed`.
    pub fn lower_velocity(&self, speed: f32) -> f32 {
        -self.lift_direction().sign() * speed
    }

    /// Piston direction which moves the drill head in the given horizontal direction.
    pub fn horizontal_piston_direction(&self, direction: HorizontalDirection) -> PistonDirection {
        match (direction, self.params.invert_horizontal) {
            (HorizontalDirection::Extend, false) | (HorizontalDirection::Retract, true) => {
                PistonDirection::Extending
            }
            (HorizontalDirection::Extend, true) | (HorizontalDirection::Retract, false) => {
                PistonDirection::Retracting
            }
        }
    }

    /// True if the horizontal pistons hold the drill head as close to the base as possible.
    pub fn horizontal_home(&self) -> bool {
        match self.horizontal_piston_direction(HorizontalDirection::Retract) {
            PistonDirection::Retracting => self.full_horizontal_retraction(),
            PistonDirection::Extending => self.full_horizontal_extension(),
        }
    }

    // ---- COMMANDS ----

    pub fn set_group_enabled(&mut self, group: ActuatorGroup, enabled: bool) {
        self.group_mut(group).set_enabled(enabled);
    }

    pub fn set_group_velocity(&mut self, group: ActuatorGroup, velocity: f32) {
        self.group_mut(group).set_velocity(velocity);
    }

    pub fn set_rotor_enabled(&mut self, enabled: bool) {
        if let Some(ref mut r) = self.rotor {
            r.set_enabled(enabled);
        }
    }

    pub fn set_rotor_velocity(&mut self, rpm: f32) {
        if let Some(ref mut r) = self.rotor {
            r.set_target_velocity_rpm(rpm);
        }
    }

    pub fn set_drill_enabled(&mut self, enabled: bool) {
        if let Some(ref mut d) = self.drill {
            d.set_enabled(enabled);
        }
    }

    /// Disable every actuator of the rig.
    pub fn disable_all(&mut self) {
        self.set_group_enabled(ActuatorGroup::Horizontal, false);
        self.set_group_enabled(ActuatorGroup::Vertical, false);
        self.set_rotor_enabled(false);
        self.set_drill_enabled(false);
    }

    /// Lift the drill towards its raised position at fast speed.
    pub fn raise_drill(&mut self) {
        let velocity = self.lift_velocity();
        self.set_group_velocity(ActuatorGroup::Vertical, velocity);
        self.set_group_enabled(ActuatorGroup::Vertical, true);
    }

    /// Switch the drill on and lower it at the depth-dependent speed, holding everything else.
    pub fn start_drilling(&mut self) {
        let velocity = self.lower_velocity(self.drill_down_speed());

        trace!(
            "Drilling at depth {} with piston velocity {}",
            self.drill_depth(),
            velocity
        );

        self.set_drill_enabled(true);
        self.set_group_velocity(ActuatorGroup::Vertical, velocity);
        self.set_group_enabled(ActuatorGroup::Vertical, true);
        self.set_group_enabled(ActuatorGroup::Horizontal, false);
        self.set_rotor_enabled(false);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::act::{
        sim::{SimRig, SimRigParams},
        Piston,
    };

    fn rig(num_vertical: usize) -> SimRig {
        SimRig::new(&SimRigParams {
            num_vertical_pistons: num_vertical,
            ..Default::default()
        })
    }

    #[test]
    fn test_safe_speed_scaling() {
        for n in 1..=4 {
            let state = DrillState::resolve(&rig(n), Params::default());
            assert_eq!(state.safe_vertical_drill_speed(), 0.3 / n as f32);
        }
    }

    #[test]
    fn test_limits_are_exact() {
        let rig = rig(3);
        let state = DrillState::resolve(&rig, Params::default());

        assert!(state.full_extension());
        assert!(state.drill_raised());
        assert!(!state.full_retraction());
        assert!(state.full_horizontal_retraction());
        assert!(state.horizontal_home());

        // No tolerance, a hair off the limit is off the limit
        rig.vertical[1].set_position(10.0 - 1e-5);
        assert!(!state.full_extension());
        assert!(!state.drill_raised());

        for p in rig.vertical.iter() {
            p.set_position(0.0);
        }
        assert!(state.full_retraction());
        assert!(state.drill_lowered());
    }

    #[test]
    fn test_depth_is_summed() {
        let rig = rig(3);
        let state = DrillState::resolve(&rig, Params::default());

        assert_eq!(state.vertical_retraction_depth(), 0.0);

        rig.vertical[0].set_position(9.0);
        rig.vertical[2].set_position(7.5);
        assert_eq!(state.vertical_retraction_depth(), 3.5);
        assert_eq!(state.drill_depth(), 3.5);
        assert_eq!(state.vertical_extension_depth(), 26.5);
    }

    #[test]
    fn test_drill_down_speed_boundary() {
        let rig = rig(3);
        let state = DrillState::resolve(&rig, Params::default());
        let safe = 0.3 / 3.0;

        assert_eq!(state.drill_down_speed(), 1.0);

        rig.vertical[0].set_position(8.51);
        assert!(state.drill_depth() < 1.5);
        assert_eq!(state.drill_down_speed(), 1.0);

        // Exactly on the clearance is past it
        rig.vertical[0].set_position(8.5);
        assert_eq!(state.drill_depth(), 1.5);
        assert_eq!(state.drill_down_speed(), safe);

        rig.vertical[0].set_position(8.0);
        assert_eq!(state.drill_down_speed(), safe);
    }

    #[test]
    fn test_single_piston_boundary() {
        let rig = rig(1);
        let state = DrillState::resolve(&rig, Params::default());

        rig.vertical[0].set_position(8.5);
        assert_eq!(state.drill_depth(), 1.5);
        assert_eq!(state.drill_down_speed(), 0.3);
    }

    #[test]
    fn test_reached_target_horizontal() {
        let rig = rig(3);
        let mut state = DrillState::resolve(&rig, Params::default());
        state.target_horizontal_position = 2.5;

        rig.horizontal[0].set_position(2.5);
        rig.horizontal[1].set_position(2.4);
        assert!(!state.reached_target_horizontal(PistonDirection::Extending));
        assert!(state.reached_target_horizontal(PistonDirection::Retracting));

        rig.horizontal[1].set_position(2.6);
        assert!(state.reached_target_horizontal(PistonDirection::Extending));
        assert!(!state.reached_target_horizontal(PistonDirection::Retracting));
    }

    #[test]
    fn test_disable_all() {
        let rig = rig(3);
        let mut state = DrillState::resolve(&rig, Params::default());

        state.raise_drill();
        state.set_group_enabled(ActuatorGroup::Horizontal, true);
        state.set_rotor_enabled(true);
        state.set_drill_enabled(true);
        assert!(!rig.is_disabled());

        state.disable_all();
        assert!(rig.is_disabled());
        assert!(rig.vertical.iter().all(|p| !p.enabled()));
    }

    #[test]
    fn test_start_drilling_holds_other_axes() {
        let rig = rig(3);
        let mut state = DrillState::resolve(&rig, Params::default());

        state.set_group_enabled(ActuatorGroup::Horizontal, true);
        state.set_rotor_enabled(true);
        state.start_drilling();

        assert!(state.drill_enabled());
        assert!(rig.vertical.iter().all(|p| p.enabled() && p.velocity() == -1.0));
        assert!(rig.horizontal.iter().all(|p| !p.enabled()));
        assert!(!rig.rotor.as_ref().unwrap().model().enabled);
    }

    #[test]
    fn test_inverted_axes() {
        let rig = SimRig::new(&SimRigParams {
            vertical_initial_m: 0.0,
            horizontal_initial_m: 10.0,
            ..Default::default()
        });
        let params = Params {
            invert_vertical: false,
            invert_horizontal: true,
            ..Default::default()
        };
        let mut state = DrillState::resolve(&rig, params);

        // Retracted vertical pistons hold the drill up
        assert!(state.drill_raised());
        assert_eq!(state.drill_depth(), 0.0);
        state.raise_drill();
        assert_eq!(rig.vertical[0].velocity(), -1.0);

        rig.vertical[0].set_position(2.0);
        assert_eq!(state.drill_depth(), 2.0);
        state.start_drilling();
        assert_eq!(rig.vertical[0].velocity(), 0.3 / 3.0);

        // Extended horizontal pistons hold the drill head at the base
        assert!(state.horizontal_home());
        assert_eq!(
            state.horizontal_piston_direction(HorizontalDirection::Extend),
            PistonDirection::Retracting
        );
    }

    #[test]
    fn test_completeness() {
        let mut rig = rig(0);
        let state = DrillState::resolve(&rig, Params::default());
        assert!(!state.is_complete());
        assert_eq!(
            state.error(),
            "required components missing: [rotor false] [drill false] [hPistons 2] [vPistons 0]"
        );

        rig.vertical.push(crate::act::sim::SimPiston::new(0.0, 10.0, 10.0));
        rig.rotor = None;
        let state = DrillState::resolve(&rig, Params::default());
        assert!(!state.is_complete());

        let state = DrillState::resolve(
            &rig,
            Params {
                group_prefix: String::from("Other Rig"),
                ..Default::default()
            },
        );
        assert_eq!(
            state.error(),
            "required components missing: [rotor true] [drill true] [hPistons 0] [vPistons 0]"
        );
    }
}
