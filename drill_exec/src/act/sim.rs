//! # Simulated rig
//!
//! Kinematic models of the rig's actuators. Each handle shares its model with the [`SimRig`] that
//! created it, so the control program can own its handles while the host steps the physics
//! between ticks.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, f32::consts::TAU, rc::Rc};

use serde::Deserialize;

use super::{Drill, Piston, Rotor};
use crate::drill_ctrl::{names, BlockSource};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters describing the simulated rig.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimRigParams {
    /// Naming prefix of the simulated blocks.
    pub group_prefix: String,

    pub num_horizontal_pistons: usize,

    pub num_vertical_pistons: usize,

    /// Travel limits of every piston.
    ///
    /// Units: meters
    pub piston_lowest_m: f32,
    pub piston_highest_m: f32,

    /// Initial extension of the horizontal and vertical pistons.
    ///
    /// Units: meters
    pub horizontal_initial_m: f32,
    pub vertical_initial_m: f32,

    /// Angular limits and initial angle of the rotor.
    ///
    /// Units: radians
    pub rotor_lower_limit_rad: f32,
    pub rotor_upper_limit_rad: f32,
    pub rotor_initial_rad: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PistonModel {
    pub position_m: f32,
    pub lowest_m: f32,
    pub highest_m: f32,
    pub enabled: bool,
    pub velocity_ms: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotorModel {
    pub angle_rad: f32,
    pub lower_limit_rad: f32,
    pub upper_limit_rad: f32,
    pub enabled: bool,
    pub rpm: f32,
}

/// Shared handle to a simulated piston.
#[derive(Debug, Clone)]
pub struct SimPiston(Rc<RefCell<PistonModel>>);

/// Shared handle to a simulated rotor.
#[derive(Debug, Clone)]
pub struct SimRotor(Rc<RefCell<RotorModel>>);

/// Shared handle to a simulated drill.
#[derive(Debug, Clone, Default)]
pub struct SimDrill(Rc<RefCell<bool>>);

/// A complete simulated rig.
///
/// Missing blocks are modelled by empty groups or `None`, which is how resolution failures show
/// up on a real host.
#[derive(Debug, Clone)]
pub struct SimRig {
    pub group_prefix: String,
    pub horizontal: Vec<SimPiston>,
    pub vertical: Vec<SimPiston>,
    pub rotor: Option<SimRotor>,
    pub drill: Option<SimDrill>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimRigParams {
    fn default() -> Self {
        Self {
            group_prefix: String::from("Drill Rig"),
            num_horizontal_pistons: 2,
            num_vertical_pistons: 3,
            piston_lowest_m: 0.0,
            piston_highest_m: 10.0,
            horizontal_initial_m: 0.0,
            vertical_initial_m: 10.0,
            rotor_lower_limit_rad: -std::f32::consts::PI,
            rotor_upper_limit_rad: std::f32::consts::PI,
            rotor_initial_rad: 0.0,
        }
    }
}

impl SimPiston {
    pub fn new(lowest_m: f32, highest_m: f32, position_m: f32) -> Self {
        Self(Rc::new(RefCell::new(PistonModel {
            position_m,
            lowest_m,
            highest_m,
            enabled: false,
            velocity_ms: 0.0,
        })))
    }

    /// Teleport the piston, ignoring its velocity.
    pub fn set_position(&self, position_m: f32) {
        self.0.borrow_mut().position_m = position_m;
    }

    /// Integrate the piston over `dt_s`, stopping exactly on the travel limits.
    pub fn step(&self, dt_s: f32) {
        let mut m = self.0.borrow_mut();
        if m.enabled {
            m.position_m = (m.position_m + m.velocity_ms * dt_s).max(m.lowest_m).min(m.highest_m);
        }
    }
}

impl Piston for SimPiston {
    fn current_position(&self) -> f32 {
        self.0.borrow().position_m
    }

    fn lowest_position(&self) -> f32 {
        self.0.borrow().lowest_m
    }

    fn highest_position(&self) -> f32 {
        self.0.borrow().highest_m
    }

    fn enabled(&self) -> bool {
        self.0.borrow().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().enabled = enabled;
    }

    fn velocity(&self) -> f32 {
        self.0.borrow().velocity_ms
    }

    fn set_velocity(&mut self, velocity: f32) {
        self.0.borrow_mut().velocity_ms = velocity;
    }
}

impl SimRotor {
    pub fn new(lower_limit_rad: f32, upper_limit_rad: f32, angle_rad: f32) -> Self {
        Self(Rc::new(RefCell::new(RotorModel {
            angle_rad,
            lower_limit_rad,
            upper_limit_rad,
            enabled: false,
            rpm: 0.0,
        })))
    }

    pub fn model(&self) -> RotorModel {
        self.0.borrow().clone()
    }

    pub fn set_angle(&self, angle_rad: f32) {
        self.0.borrow_mut().angle_rad = angle_rad;
    }

    /// Integrate the rotor over `dt_s`, stopping exactly on the angular limits.
    pub fn step(&self, dt_s: f32) {
        let mut m = self.0.borrow_mut();
        if m.enabled {
            let rate_rads = m.rpm * TAU / 60.0;
            m.angle_rad = (m.angle_rad + rate_rads * dt_s)
                .max(m.lower_limit_rad)
                .min(m.upper_limit_rad);
        }
    }
}

impl Rotor for SimRotor {
    fn angle(&self) -> f32 {
        self.0.borrow().angle_rad
    }

    fn upper_limit_angle(&self) -> f32 {
        self.0.borrow().upper_limit_rad
    }

    fn enabled(&self) -> bool {
        self.0.borrow().enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().enabled = enabled;
    }

    fn target_velocity_rpm(&self) -> f32 {
        self.0.borrow().rpm
    }

    fn set_target_velocity_rpm(&mut self, rpm: f32) {
        self.0.borrow_mut().rpm = rpm;
    }
}

impl Drill for SimDrill {
    fn enabled(&self) -> bool {
        *self.0.borrow()
    }

    fn set_enabled(&mut self, enabled: bool) {
        *self.0.borrow_mut() = enabled;
    }
}

impl SimRig {
    pub fn new(params: &SimRigParams) -> Self {
        let piston = |initial_m: f32| {
            SimPiston::new(params.piston_lowest_m, params.piston_highest_m, initial_m)
        };

        Self {
            group_prefix: params.group_prefix.clone(),
            horizontal: (0..params.num_horizontal_pistons)
                .map(|_| piston(params.horizontal_initial_m))
                .collect(),
            vertical: (0..params.num_vertical_pistons)
                .map(|_| piston(params.vertical_initial_m))
                .collect(),
            rotor: Some(SimRotor::new(
                params.rotor_lower_limit_rad,
                params.rotor_upper_limit_rad,
                params.rotor_initial_rad,
            )),
            drill: Some(SimDrill::default()),
        }
    }

    /// Advance every actuator by `dt_s` seconds.
    pub fn step(&self, dt_s: f32) {
        for p in self.horizontal.iter().chain(self.vertical.iter()) {
            p.step(dt_s);
        }
        if let Some(ref r) = self.rotor {
            r.step(dt_s);
        }
    }

    /// True if nothing on the rig is enabled.
    pub fn is_disabled(&self) -> bool {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .all(|p| !p.enabled())
            && self.rotor.as_ref().map_or(true, |r| !r.enabled())
            && self.drill.as_ref().map_or(true, |d| !d.enabled())
    }

    fn boxed_pistons(pistons: &[SimPiston]) -> Vec<Box<dyn Piston>> {
        pistons
            .iter()
            .map(|p| Box::new(p.clone()) as Box<dyn Piston>)
            .collect()
    }
}

impl BlockSource for SimRig {
    fn piston_group(&self, name: &str) -> Option<Vec<Box<dyn Piston>>> {
        if name == names::horizontal_group(&self.group_prefix) {
            Some(Self::boxed_pistons(&self.horizontal))
        } else if name == names::vertical_group(&self.group_prefix) {
            Some(Self::boxed_pistons(&self.vertical))
        } else {
            None
        }
    }

    fn rotor(&self, name: &str) -> Option<Box<dyn Rotor>> {
        if name != names::rotor(&self.group_prefix) {
            return None;
        }
        self.rotor
            .as_ref()
            .map(|r| Box::new(r.clone()) as Box<dyn Rotor>)
    }

    fn drill(&self, name: &str) -> Option<Box<dyn Drill>> {
        if name != names::drill(&self.group_prefix) {
            return None;
        }
        self.drill
            .as_ref()
            .map(|d| Box::new(d.clone()) as Box<dyn Drill>)
    }
}
