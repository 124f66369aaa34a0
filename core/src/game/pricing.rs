use anyhow::{Result, bail};

/// Day-start repricing policy, switchable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingMode {
    Aggressive,
    #[default]
    Balanced,
    Conservative,
}

impl PricingMode {
    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_lowercase().as_str() {
            "aggressive" => Ok(PricingMode::Aggressive),
            "balanced" => Ok(PricingMode::Balanced),
            "conservative" => Ok(PricingMode::Conservative),
            other => bail!("unknown pricing mode: {other}"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PricingMode::Aggressive => "aggressive",
            PricingMode::Balanced => "balanced",
            PricingMode::Conservative => "conservative",
        }
    }

    /// Multiplicative factor to apply at day start, if any. Aggressive cuts
    /// prices when business is weak; conservative raises them when it booms.
    pub(crate) fn day_start_factor(&self, demand: i32, avg_satisfaction: f64) -> Option<f64> {
        match self {
            PricingMode::Aggressive if demand < 3 || avg_satisfaction < 3.5 => Some(0.95),
            PricingMode::Conservative if demand > 4 && avg_satisfaction > 4.0 => Some(1.05),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggressive_discounts_when_business_is_weak() {
        let mode = PricingMode::Aggressive;
        assert_eq!(mode.day_start_factor(2, 4.5), Some(0.95));
        assert_eq!(mode.day_start_factor(5, 3.0), Some(0.95));
        assert_eq!(mode.day_start_factor(5, 4.5), None);
    }

    #[test]
    fn conservative_raises_prices_when_business_booms() {
        let mode = PricingMode::Conservative;
        assert_eq!(mode.day_start_factor(5, 4.5), Some(1.05));
        assert_eq!(mode.day_start_factor(4, 4.5), None);
        assert_eq!(mode.day_start_factor(5, 4.0), None);
    }

    #[test]
    fn balanced_never_adjusts() {
        assert_eq!(PricingMode::Balanced.day_start_factor(1, 1.0), None);
        assert_eq!(PricingMode::Balanced.day_start_factor(20, 5.0), None);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            PricingMode::parse("Aggressive").unwrap(),
            PricingMode::Aggressive
        );
        assert!(PricingMode::parse("bold").is_err());
    }
}
