use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServiceSales {
    pub cars: u32,
    pub revenue: f64,
}

/// Per-day aggregate. Begun at day start, frozen by `finalize` at rollover,
/// then appended to the report history and never mutated again.
#[derive(Debug, Clone, Default)]
pub struct DailyReport {
    day: u32,
    cars_served: u32,
    lost: u32,
    revenue: f64,
    avg_satisfaction: f64,
    per_service: BTreeMap<String, ServiceSales>,
    finalized: bool,
}

impl DailyReport {
    pub fn begin(day: u32) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    pub(crate) fn add_sale(&mut self, service_name: &str, price: f64) {
        debug_assert!(!self.finalized, "sales must not land on a frozen report");
        let entry = self.per_service.entry(service_name.to_string()).or_default();
        entry.cars += 1;
        entry.revenue += price;
    }

    pub(crate) fn finalize(&mut self, cars_served: u32, lost: u32, avg_satisfaction: f64, revenue: f64) {
        self.cars_served = cars_served;
        self.lost = lost;
        self.avg_satisfaction = avg_satisfaction;
        self.revenue = revenue;
        self.finalized = true;
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn cars_served(&self) -> u32 {
        self.cars_served
    }

    pub fn lost(&self) -> u32 {
        self.lost
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn avg_satisfaction(&self) -> f64 {
        self.avg_satisfaction
    }

    pub fn per_service(&self) -> &BTreeMap<String, ServiceSales> {
        &self.per_service
    }
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day {}: served={} lost={} revenue={:.2} EUR avg satisfaction={:.2}",
            self.day, self.cars_served, self.lost, self.revenue, self.avg_satisfaction
        )?;
        for (name, sales) in &self.per_service {
            write!(f, "\n  {}: {} cars, {:.2} EUR", name, sales.cars, sales.revenue)?;
        }
        Ok(())
    }
}

/// Read-only analytics over the finalized report history.
pub struct Statistics<'a> {
    reports: &'a [DailyReport],
}

impl<'a> Statistics<'a> {
    pub fn new(reports: &'a [DailyReport]) -> Self {
        Self { reports }
    }

    pub fn days(&self) -> usize {
        self.reports.len()
    }

    pub fn total_cars(&self) -> u64 {
        self.reports.iter().map(|r| u64::from(r.cars_served)).sum()
    }

    pub fn total_lost(&self) -> u64 {
        self.reports.iter().map(|r| u64::from(r.lost)).sum()
    }

    pub fn total_revenue(&self) -> f64 {
        self.reports.iter().map(|r| r.revenue).sum()
    }

    pub fn avg_cars_per_day(&self) -> f64 {
        safe_div(self.total_cars() as f64, self.days() as f64)
    }

    pub fn avg_revenue_per_day(&self) -> f64 {
        safe_div(self.total_revenue(), self.days() as f64)
    }

    /// Satisfaction averaged over served cars, not over days.
    pub fn avg_satisfaction_weighted(&self) -> f64 {
        let weighted: f64 = self
            .reports
            .iter()
            .map(|r| r.avg_satisfaction * f64::from(r.cars_served))
            .sum();
        safe_div(weighted, self.total_cars() as f64)
    }

    pub fn best_day_by_revenue(&self) -> Option<&DailyReport> {
        self.reports
            .iter()
            .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
    }

    pub fn worst_day_by_revenue(&self) -> Option<&DailyReport> {
        self.reports
            .iter()
            .min_by(|a, b| a.revenue.total_cmp(&b.revenue))
    }

    pub fn best_day_by_satisfaction(&self) -> Option<&DailyReport> {
        self.reports
            .iter()
            .max_by(|a, b| a.avg_satisfaction.total_cmp(&b.avg_satisfaction))
    }

    pub fn top_services_by_revenue(&self, limit: usize) -> Vec<(String, ServiceSales)> {
        let mut totals: BTreeMap<String, ServiceSales> = BTreeMap::new();
        for report in self.reports {
            for (name, sales) in &report.per_service {
                let entry = totals.entry(name.clone()).or_default();
                entry.cars += sales.cars;
                entry.revenue += sales.revenue;
            }
        }
        let mut ranked: Vec<(String, ServiceSales)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.revenue.total_cmp(&a.1.revenue));
        ranked.truncate(limit);
        ranked
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(day: u32, served: u32, lost: u32, revenue: f64, satisfaction: f64) -> DailyReport {
        let mut report = DailyReport::begin(day);
        for _ in 0..served {
            report.add_sale("Basic", revenue / f64::from(served.max(1)));
        }
        report.finalize(served, lost, satisfaction, revenue);
        report
    }

    #[test]
    fn finalize_freezes_the_aggregate() {
        let report = report(1, 4, 2, 40.0, 4.0);
        assert_eq!(report.day(), 1);
        assert_eq!(report.cars_served(), 4);
        assert_eq!(report.lost(), 2);
        assert_eq!(report.per_service()["Basic"].cars, 4);
    }

    #[test]
    fn statistics_aggregate_across_days() {
        let reports = vec![
            report(1, 4, 1, 40.0, 4.0),
            report(2, 8, 0, 90.0, 3.0),
            report(3, 2, 5, 15.0, 4.5),
        ];
        let stats = Statistics::new(&reports);
        assert_eq!(stats.days(), 3);
        assert_eq!(stats.total_cars(), 14);
        assert_eq!(stats.total_lost(), 6);
        assert!((stats.total_revenue() - 145.0).abs() < 1e-9);
        assert_eq!(stats.best_day_by_revenue().unwrap().day(), 2);
        assert_eq!(stats.worst_day_by_revenue().unwrap().day(), 3);
        assert_eq!(stats.best_day_by_satisfaction().unwrap().day(), 3);
    }

    #[test]
    fn weighted_satisfaction_favours_busier_days() {
        let reports = vec![report(1, 1, 0, 10.0, 5.0), report(2, 9, 0, 90.0, 3.0)];
        let stats = Statistics::new(&reports);
        assert!((stats.avg_satisfaction_weighted() - 3.2).abs() < 1e-9);
    }

    #[test]
    fn empty_history_yields_zeroes() {
        let stats = Statistics::new(&[]);
        assert_eq!(stats.avg_cars_per_day(), 0.0);
        assert_eq!(stats.avg_revenue_per_day(), 0.0);
        assert!(stats.best_day_by_revenue().is_none());
    }

    #[test]
    fn top_services_rank_by_revenue() {
        let mut day_one = DailyReport::begin(1);
        day_one.add_sale("Basic", 8.5);
        day_one.add_sale("Wax", 16.0);
        day_one.add_sale("Wax", 16.0);
        day_one.finalize(3, 0, 4.0, 40.5);
        let reports = vec![day_one];
        let stats = Statistics::new(&reports);
        let ranked = stats.top_services_by_revenue(2);
        assert_eq!(ranked[0].0, "Wax");
        assert_eq!(ranked[0].1.cars, 2);
    }
}
