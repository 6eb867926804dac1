//! Parameters of the drill executable

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::act::sim::SimRigParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of `drill_exec`, loaded from `drill_exec.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrillExecParams {
    /// Target period of one host cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// The simulated rig driven by the executable.
    pub sim: SimRigParams,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ExecParamsError {
    #[error("The cycle period must be a positive number of seconds, found {0}")]
    InvalidCyclePeriod(f64),

    #[error("The simulated rig's piston limits are inverted ({0} m > {1} m)")]
    InvalidPistonLimits(f32, f32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DrillExecParams {
    /// Check the parameters can drive the main loop and the simulation.
    pub fn validate(&self) -> Result<(), ExecParamsError> {
        // Written to also reject NaN and infinity
        if !(self.cycle_period_s > 0.0 && self.cycle_period_s.is_finite()) {
            return Err(ExecParamsError::InvalidCyclePeriod(self.cycle_period_s));
        }

        if !(self.sim.piston_lowest_m <= self.sim.piston_highest_m) {
            return Err(ExecParamsError::InvalidPistonLimits(
                self.sim.piston_lowest_m,
                self.sim.piston_highest_m,
            ));
        }

        Ok(())
    }
}

impl Default for DrillExecParams {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.01,
            sim: SimRigParams::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_exec_params() {
        let p: DrillExecParams = util::params::from_str(
            "cycle_period_s = 0.05\n\
             \n\
             [sim]\n\
             num_vertical_pistons = 4\n\
             vertical_initial_m = 2.0\n",
        )
        .unwrap();

        assert_eq!(p.cycle_period_s, 0.05);
        assert_eq!(p.sim.num_vertical_pistons, 4);
        assert_eq!(p.sim.vertical_initial_m, 2.0);
        assert_eq!(p.sim.num_horizontal_pistons, 2);
        assert_eq!(p.sim.group_prefix, "Drill Rig");
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_cycle_period() {
        for period in [0.0, -0.01, std::f64::NAN, std::f64::INFINITY].iter() {
            let p = DrillExecParams {
                cycle_period_s: *period,
                ..Default::default()
            };
            assert!(matches!(
                p.validate(),
                Err(ExecParamsError::InvalidCyclePeriod(_))
            ));
        }

        let mut p = DrillExecParams::default();
        p.sim.piston_lowest_m = 12.0;
        assert!(matches!(
            p.validate(),
            Err(ExecParamsError::InvalidPistonLimits(_, _))
        ));
    }
}
