//! Drill action identifiers

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{fmt, str::FromStr};

use serde::Serialize;

use super::DrillCtrlError;
use crate::action::ActionId;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const ALL_ACTIONS: [DrillAction; 7] = [
    DrillAction::Stop,
    DrillAction::RetractAll,
    DrillAction::RetractAndDrill,
    DrillAction::ExtendAndDrill,
    DrillAction::RotateCcwAndDrill,
    DrillAction::RotateCwAndDrill,
    DrillAction::ExtendDrillLine,
];

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Actions the drill rig can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DrillAction {
    Stop,
    RetractAll,
    RetractAndDrill,
    ExtendAndDrill,
    RotateCcwAndDrill,
    RotateCwAndDrill,
    ExtendDrillLine,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DrillAction {
    /// The name used to request this action from the host.
    pub fn as_str(self) -> &'static str {
        match self {
            DrillAction::Stop => "stop",
            DrillAction::RetractAll => "retractAll",
            DrillAction::RetractAndDrill => "retractAndDrill",
            DrillAction::ExtendAndDrill => "extendAndDrill",
            DrillAction::RotateCcwAndDrill => "rotateCCWAndDrill",
            DrillAction::RotateCwAndDrill => "rotateCWAndDrill",
            DrillAction::ExtendDrillLine => "extendDrillLine",
        }
    }
}

impl ActionId for DrillAction {
    fn actions() -> &'static [Self] {
        &ALL_ACTIONS
    }

    fn can_override(self) -> bool {
        matches!(self, DrillAction::Stop | DrillAction::RetractAll)
    }
}

impl fmt::Display for DrillAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrillAction {
    type Err = DrillCtrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ACTIONS
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| DrillCtrlError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_names() {
        for a in DrillAction::actions() {
            assert_eq!(a.to_string().parse::<DrillAction>().unwrap(), *a);
        }

        assert_eq!(
            "rotateCCWAndDrill".parse::<DrillAction>().unwrap(),
            DrillAction::RotateCcwAndDrill
        );

        // Names are case sensitive
        assert!(matches!(
            "RetractAll".parse::<DrillAction>(),
            Err(DrillCtrlError::UnknownAction(_))
        ));
        assert!("".parse::<DrillAction>().is_err());
    }

    #[test]
    fn test_override_eligibility() {
        let overriding: Vec<_> = DrillAction::actions()
            .iter()
            .filter(|a| a.can_override())
            .collect();

        assert_eq!(
            overriding,
            vec![&DrillAction::Stop, &DrillAction::RetractAll]
        );
    }
}
