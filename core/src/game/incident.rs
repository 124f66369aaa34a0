use rand::Rng;
use rand::rngs::StdRng;

/// Stochastic conditions a new day can open with. Generated at rollover and
/// applied immediately; reputation shifts the inspection odds.
#[derive(Debug, Clone, PartialEq)]
pub enum DayIncident {
    Weather { intensity: f64 },
    Holiday,
    Inspection { severity: f64 },
}

pub(crate) fn roll_incidents(rng: &mut StdRng, reputation_score: f64) -> Vec<DayIncident> {
    let mut incidents = Vec::new();

    let roll: f64 = rng.gen_range(0.0..1.0);
    if roll < 0.4 {
        incidents.push(DayIncident::Weather {
            intensity: rng.gen_range(0.0..1.0),
        });
    }
    if roll > 0.6 {
        incidents.push(DayIncident::Holiday);
    }

    let inspection_probability = if reputation_score < 3.5 { 0.5 } else { 0.2 };
    if rng.gen_range(0.0..1.0) < inspection_probability {
        incidents.push(DayIncident::Inspection {
            severity: rng.gen_range(0.0..1.0),
        });
    }

    incidents
}

impl DayIncident {
    /// (pending demand delta, comfort bonus delta, cash delta given the
    /// current average satisfaction).
    pub(crate) fn effects(&self, avg_satisfaction: f64) -> (i32, f64, f64) {
        match self {
            DayIncident::Weather { intensity } => {
                let mut demand = 0;
                let mut comfort = 0.0;
                if *intensity > 0.3 {
                    demand += 1;
                }
                if *intensity > 0.6 {
                    demand += 1;
                    comfort -= 0.1;
                }
                (demand, comfort, 0.0)
            }
            DayIncident::Holiday => (2, 0.2, 0.0),
            DayIncident::Inspection { severity } => {
                let cash = if avg_satisfaction < 3.0 {
                    -150.0 * severity
                } else if avg_satisfaction < 4.0 {
                    -50.0 * severity
                } else {
                    50.0 * severity
                };
                (0, 0.0, cash)
            }
        }
    }

    pub(crate) fn describe(&self, avg_satisfaction: f64) -> String {
        match self {
            DayIncident::Weather { intensity } => format!(
                "Dirty weather rolls in (intensity {intensity:.2}); expect more traffic"
            ),
            DayIncident::Holiday => "Holiday traffic: extra demand and cheerful customers".to_string(),
            DayIncident::Inspection { severity } => {
                let (_, _, cash) = self.effects(avg_satisfaction);
                if cash >= 0.0 {
                    format!("Inspection passed with praise (+{cash:.2} EUR)")
                } else {
                    format!("Inspection found issues: fined {:.2} EUR", -cash)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn weather_scales_with_intensity() {
        let calm = DayIncident::Weather { intensity: 0.2 };
        assert_eq!(calm.effects(4.0), (0, 0.0, 0.0));
        let wet = DayIncident::Weather { intensity: 0.5 };
        assert_eq!(wet.effects(4.0), (1, 0.0, 0.0));
        let storm = DayIncident::Weather { intensity: 0.9 };
        assert_eq!(storm.effects(4.0), (2, -0.1, 0.0));
    }

    #[test]
    fn inspection_outcome_depends_on_satisfaction() {
        let inspection = DayIncident::Inspection { severity: 1.0 };
        assert_eq!(inspection.effects(2.0).2, -150.0);
        assert_eq!(inspection.effects(3.5).2, -50.0);
        assert_eq!(inspection.effects(4.5).2, 50.0);
    }

    #[test]
    fn low_reputation_attracts_more_inspections() {
        let samples = 400;
        let mut low = 0;
        let mut high = 0;
        for seed in 0..samples {
            let mut rng = StdRng::seed_from_u64(seed);
            if roll_incidents(&mut rng, 2.0)
                .iter()
                .any(|incident| matches!(incident, DayIncident::Inspection { .. }))
            {
                low += 1;
            }
            let mut rng = StdRng::seed_from_u64(seed);
            if roll_incidents(&mut rng, 4.5)
                .iter()
                .any(|incident| matches!(incident, DayIncident::Inspection { .. }))
            {
                high += 1;
            }
        }
        assert!(low > high);
    }
}
