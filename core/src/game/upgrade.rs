use anyhow::{Result, bail};

/// One-shot facility upgrades. Effects are applied by the game state when the
/// purchase clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeKind {
    BaySpeed,
    Comfort,
    Marketing,
    NanoCoating,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::BaySpeed,
        UpgradeKind::Comfort,
        UpgradeKind::Marketing,
        UpgradeKind::NanoCoating,
    ];

    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(UpgradeKind::BaySpeed),
            2 => Ok(UpgradeKind::Comfort),
            3 => Ok(UpgradeKind::Marketing),
            4 => Ok(UpgradeKind::NanoCoating),
            other => bail!("unknown upgrade id: {other} (expected 1..=4)"),
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            UpgradeKind::BaySpeed => 1,
            UpgradeKind::Comfort => 2,
            UpgradeKind::Marketing => 3,
            UpgradeKind::NanoCoating => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::BaySpeed => "Bay Speed",
            UpgradeKind::Comfort => "Comfort",
            UpgradeKind::Marketing => "Marketing",
            UpgradeKind::NanoCoating => "Nano Coating",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::BaySpeed => "increase hourly processing speed",
            UpgradeKind::Comfort => "raise the satisfaction bonus",
            UpgradeKind::Marketing => "attract extra demand",
            UpgradeKind::NanoCoating => "enhance wax services (price and rating)",
        }
    }

    pub fn cost(&self) -> f64 {
        match self {
            UpgradeKind::BaySpeed => 120.0,
            UpgradeKind::Comfort => 90.0,
            UpgradeKind::Marketing => 110.0,
            UpgradeKind::NanoCoating => 140.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for kind in UpgradeKind::ALL {
            assert_eq!(UpgradeKind::from_id(kind.id()).unwrap(), kind);
        }
        assert!(UpgradeKind::from_id(0).is_err());
        assert!(UpgradeKind::from_id(5).is_err());
    }
}
