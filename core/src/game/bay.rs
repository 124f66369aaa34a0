use std::collections::BTreeSet;
use std::fmt;

use anyhow::{Result, ensure};

use super::MAX_BAYS;
use super::service::ServiceCategory;

#[derive(Debug, Clone)]
pub struct WashBay {
    id: u32,
    label: String,
    available_at: i32,
    capabilities: BTreeSet<ServiceCategory>,
}

impl WashBay {
    pub fn new(
        id: u32,
        label: impl Into<String>,
        start_minute: i32,
        capabilities: impl IntoIterator<Item = ServiceCategory>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            available_at: start_minute,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn available_at(&self) -> i32 {
        self.available_at
    }

    pub fn supports(&self, category: ServiceCategory) -> bool {
        self.capabilities.contains(&category)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = ServiceCategory> + '_ {
        self.capabilities.iter().copied()
    }

    /// Capability grants are idempotent; capabilities are never removed.
    pub fn add_capability(&mut self, category: ServiceCategory) {
        self.capabilities.insert(category);
    }

    fn book(&mut self, duration_minutes: i32, earliest_start: i32) -> i32 {
        let start = earliest_start.max(self.available_at);
        self.available_at = start + duration_minutes;
        self.available_at
    }

    fn reset(&mut self, opening_minute: i32) {
        self.available_at = opening_minute;
    }
}

impl fmt::Display for WashBay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capabilities: Vec<&str> = self
            .capabilities
            .iter()
            .map(|category| category.label())
            .collect();
        write!(
            f,
            "Bay #{} \"{}\" (free at {}m, [{}])",
            self.id,
            self.label,
            self.available_at,
            capabilities.join(",")
        )
    }
}

/// Fixed-size pool of service bays. The creation counter is an explicit pool
/// field so tests stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct BayPool {
    bays: Vec<WashBay>,
    total_created: u32,
}

impl BayPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bay: WashBay) -> Result<()> {
        ensure!(
            self.bays.len() < MAX_BAYS,
            "the bay pool is full ({MAX_BAYS} bays)"
        );
        ensure!(
            self.bays.iter().all(|existing| existing.id != bay.id),
            "a bay with id {} already exists",
            bay.id
        );
        self.bays.push(bay);
        self.total_created += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bays.is_empty()
    }

    pub fn total_created(&self) -> u32 {
        self.total_created
    }

    pub fn bays(&self) -> &[WashBay] {
        &self.bays
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut WashBay> {
        self.bays.iter_mut().find(|bay| bay.id == id)
    }

    /// Earliest-available bay supporting `category`; ties break towards the
    /// lowest bay id to keep scheduling deterministic.
    pub fn find_earliest_capable(&self, category: ServiceCategory) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, bay) in self.bays.iter().enumerate() {
            if !bay.supports(category) {
                continue;
            }
            match best {
                None => best = Some(idx),
                Some(current)
                    if bay.available_at < self.bays[current].available_at
                        || (bay.available_at == self.bays[current].available_at
                            && bay.id < self.bays[current].id) =>
                {
                    best = Some(idx)
                }
                Some(_) => {}
            }
        }
        best
    }

    pub fn book(&mut self, idx: usize, duration_minutes: i32, earliest_start: i32) -> i32 {
        self.bays[idx].book(duration_minutes, earliest_start)
    }

    pub fn reset_all(&mut self, opening_minute: i32) {
        for bay in &mut self.bays {
            bay.reset(opening_minute);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_bay(id: u32, start: i32) -> WashBay {
        WashBay::new(
            id,
            format!("Bay{id}"),
            start,
            [ServiceCategory::Basic, ServiceCategory::Eco],
        )
    }

    #[test]
    fn earliest_capable_bay_wins() {
        let mut pool = BayPool::new();
        pool.add(basic_bay(1, 10)).unwrap();
        pool.add(basic_bay(2, 0)).unwrap();

        let idx = pool.find_earliest_capable(ServiceCategory::Basic).unwrap();
        assert_eq!(pool.bays()[idx].id(), 2);

        let finish = pool.book(idx, 20, 0);
        assert_eq!(finish, 20);

        // bay 1 at minute 10 is now the earliest again
        let idx = pool.find_earliest_capable(ServiceCategory::Basic).unwrap();
        assert_eq!(pool.bays()[idx].id(), 1);
    }

    #[test]
    fn ties_break_towards_the_lowest_id() {
        let mut pool = BayPool::new();
        pool.add(basic_bay(7, 30)).unwrap();
        pool.add(basic_bay(3, 30)).unwrap();
        let idx = pool.find_earliest_capable(ServiceCategory::Basic).unwrap();
        assert_eq!(pool.bays()[idx].id(), 3);
    }

    #[test]
    fn unsupported_category_yields_none() {
        let mut pool = BayPool::new();
        pool.add(basic_bay(1, 0)).unwrap();
        assert!(pool.find_earliest_capable(ServiceCategory::Wax).is_none());
    }

    #[test]
    fn booking_never_moves_availability_backwards() {
        let mut bay = basic_bay(1, 100);
        let finish = bay.book(20, 50);
        assert_eq!(finish, 120);
        assert_eq!(bay.available_at(), 120);
        let finish = bay.book(15, 130);
        assert_eq!(finish, 145);
    }

    #[test]
    fn reset_returns_every_bay_to_opening() {
        let mut pool = BayPool::new();
        pool.add(basic_bay(1, 0)).unwrap();
        pool.add(basic_bay(2, 0)).unwrap();
        pool.book(0, 45, 0);
        pool.reset_all(480);
        assert!(pool.bays().iter().all(|bay| bay.available_at() == 480));
    }

    #[test]
    fn capability_grants_are_idempotent() {
        let mut bay = basic_bay(1, 0);
        assert!(!bay.supports(ServiceCategory::Wax));
        bay.add_capability(ServiceCategory::Wax);
        bay.add_capability(ServiceCategory::Wax);
        assert!(bay.supports(ServiceCategory::Wax));
        assert_eq!(bay.capabilities().count(), 3);
    }

    #[test]
    fn duplicate_bay_ids_are_rejected() {
        let mut pool = BayPool::new();
        pool.add(basic_bay(1, 0)).unwrap();
        assert!(pool.add(basic_bay(1, 0)).is_err());
        assert_eq!(pool.total_created(), 1);
    }
}
