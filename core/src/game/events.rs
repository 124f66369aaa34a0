use std::cell::RefCell;
use std::rc::Rc;

use super::report::DailyReport;

/// One notable state transition, dispatched to every registered observer.
/// Achievement and goal subsystems consume these; their content lives outside
/// the core.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Served {
        day: u32,
        service: String,
        price: f64,
        satisfaction: f64,
    },
    Lost {
        day: u32,
    },
    DayEnd {
        report: DailyReport,
    },
    Purchase {
        item: String,
        quantity: i32,
        cost: f64,
    },
    StructuralChange {
        description: String,
    },
}

pub trait EventObserver {
    fn on_event(&mut self, event: &GameEvent);
}

/// Synchronous fan-out in registration order; dispatch completes before the
/// driver proceeds.
#[derive(Default)]
pub struct EventDispatcher {
    observers: Vec<Box<dyn EventObserver>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn EventObserver>) {
        self.observers.push(observer);
    }

    pub fn dispatch(&mut self, event: &GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Human-readable event log. Share it as `Rc<RefCell<EventJournal>>` to both
/// register it as an observer and read it back later.
#[derive(Debug, Default)]
pub struct EventJournal {
    lines: Vec<String>,
}

impl EventJournal {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn record(&mut self, event: &GameEvent) {
        let line = match event {
            GameEvent::Served {
                day,
                service,
                price,
                satisfaction,
            } => format!(
                "day {day}: served a {service} wash for {price:.2} EUR (satisfaction {satisfaction:.2})"
            ),
            GameEvent::Lost { day } => format!("day {day}: lost a customer"),
            GameEvent::DayEnd { report } => format!(
                "day {} closed: {} served, {} lost, {:.2} EUR revenue",
                report.day(),
                report.cars_served(),
                report.lost(),
                report.revenue()
            ),
            GameEvent::Purchase {
                item,
                quantity,
                cost,
            } => format!("purchased {quantity} x {item} for {cost:.2} EUR"),
            GameEvent::StructuralChange { description } => description.clone(),
        };
        self.lines.push(line);
    }
}

impl EventObserver for Rc<RefCell<EventJournal>> {
    fn on_event(&mut self, event: &GameEvent) {
        self.borrow_mut().record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tagger {
        tag: &'static str,
        sink: Rc<RefCell<Vec<&'static str>>>,
    }

    impl EventObserver for Tagger {
        fn on_event(&mut self, _event: &GameEvent) {
            self.sink.borrow_mut().push(self.tag);
        }
    }

    #[test]
    fn dispatch_visits_observers_in_registration_order() {
        let sink = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Box::new(Tagger {
            tag: "first",
            sink: Rc::clone(&sink),
        }));
        dispatcher.register(Box::new(Tagger {
            tag: "second",
            sink: Rc::clone(&sink),
        }));

        dispatcher.dispatch(&GameEvent::Lost { day: 1 });
        assert_eq!(*sink.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn journal_records_served_events() {
        let journal = EventJournal::shared();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Box::new(Rc::clone(&journal)));

        dispatcher.dispatch(&GameEvent::Served {
            day: 2,
            service: "Wax".to_string(),
            price: 16.0,
            satisfaction: 4.5,
        });
        dispatcher.dispatch(&GameEvent::Purchase {
            item: "water".to_string(),
            quantity: 2,
            cost: 40.0,
        });

        let journal = journal.borrow();
        assert_eq!(journal.lines().len(), 2);
        assert!(journal.lines()[0].contains("Wax"));
        assert!(journal.lines()[1].contains("water"));
    }
}
