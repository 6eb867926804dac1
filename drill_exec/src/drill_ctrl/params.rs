//! Parameters structure for DrillCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{names, DrillCtrlError, UpdateFrequency};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Drill control.
///
/// All speeds are positive magnitudes, the direction is chosen by the actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // ---- NAMING ----
    /// Prefix of the rig's block and group names.
    pub group_prefix: String,

    // ---- GEOMETRY ----
    /// If true extending the vertical pistons lifts the drill out of the ground.
    pub invert_vertical: bool,

    /// If true extending the horizontal pistons brings the drill closer to the base.
    pub invert_horizontal: bool,

    /// Distance between the raised drill head and the ground, which the drill may cover at fast
    /// speed.
    ///
    /// Units: meters
    pub vertical_clearance: f32,

    // ---- SPEEDS ----
    /// Rig-level drilling speed, shared between the vertical pistons.
    ///
    /// Units: meters/second
    pub safe_vertical_drill_speed: f32,

    /// Units: meters/second
    pub safe_horizontal_speed: f32,

    /// Units: revolutions/minute
    pub safe_angle_rpm: f32,

    /// Speed for movements which don't touch the ground.
    ///
    /// Units: meters/second
    pub fast_speed: f32,

    /// Rotor rate used when returning to the upper angular limit.
    ///
    /// Units: revolutions/minute
    pub home_rotor_rpm: f32,

    // ---- INCREMENTS ----
    /// Horizontal distance moved by each extend/retract action.
    ///
    /// Units: meters
    pub horizontal_increment: f32,

    /// Angle turned by each rotate action.
    ///
    /// Units: radians
    pub angle_increment: f32,

    // ---- SCHEDULING ----
    /// Tick rate requested from the host while an action is in progress.
    pub update_frequency: UpdateFrequency,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            group_prefix: String::from("Drill Rig"),
            invert_vertical: true,
            invert_horizontal: false,
            vertical_clearance: 1.5,
            safe_vertical_drill_speed: 0.3,
            safe_horizontal_speed: 0.5,
            safe_angle_rpm: 1.0,
            fast_speed: 1.0,
            home_rotor_rpm: 100.0,
            horizontal_increment: 0.5,
            angle_increment: 3f32.to_radians(),
            update_frequency: UpdateFrequency::Update100,
        }
    }
}

impl Params {
    /// Check that every speed and increment is a positive magnitude.
    pub fn validate(&self) -> Result<(), DrillCtrlError> {
        let magnitudes = [
            ("vertical_clearance", self.vertical_clearance),
            ("safe_vertical_drill_speed", self.safe_vertical_drill_speed),
            ("safe_horizontal_speed", self.safe_horizontal_speed),
            ("safe_angle_rpm", self.safe_angle_rpm),
            ("fast_speed", self.fast_speed),
            ("home_rotor_rpm", self.home_rotor_rpm),
            ("horizontal_increment", self.horizontal_increment),
            ("angle_increment", self.angle_increment),
        ];

        for (name, value) in magnitudes.iter() {
            // Written to also reject NaN
            if !(*value > 0.0) {
                return Err(DrillCtrlError::InvalidParams(format!(
                    "{} must be positive, found {}",
                    name, value
                )));
            }
        }

        if matches!(
            self.update_frequency,
            UpdateFrequency::None | UpdateFrequency::Once
        ) {
            return Err(DrillCtrlError::InvalidParams(String::from(
                "update_frequency must request a periodic tick",
            )));
        }

        Ok(())
    }

    pub fn horizontal_group_name(&self) -> String {
        names::horizontal_group(&self.group_prefix)
    }

    pub fn vertical_group_name(&self) -> String {
        names::vertical_group(&self.group_prefix)
    }

    pub fn rotor_name(&self) -> String {
        names::rotor(&self.group_prefix)
    }

    pub fn drill_name(&self) -> String {
        names::drill(&self.group_prefix)
    }
}
