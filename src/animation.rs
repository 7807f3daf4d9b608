//! Cosmetic count-up counters.
//!
//! Nothing here feeds back into catalog state: counters start when the page
//! reports a counter element as revealed and advance on frame ticks.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::core::format_count;
use crate::document::{DocumentHost, ElementId};

fn ease_out_quad(t: f64) -> f64 {
    t * (2.0 - t)
}

/// Count-up from 0 to a target over a fixed duration
#[derive(Debug, Clone, PartialEq)]
pub struct CounterAnimation {
    target: u64,
    duration: Duration,
    elapsed: Duration,
}

impl CounterAnimation {
    pub fn new(target: u64, duration: Duration) -> Self {
        Self {
            target,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Value shown `elapsed` after start; monotone, equal to the target once finished
    pub fn value_at(&self, elapsed: Duration) -> u64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.target;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let value = (self.target as f64 * ease_out_quad(t)).floor() as u64;
        value.min(self.target)
    }

    /// Advance by one frame and return the value to display
    pub fn advance(&mut self, frame: Duration) -> u64 {
        self.elapsed = self.elapsed.saturating_add(frame);
        self.value()
    }

    pub fn value(&self) -> u64 {
        self.value_at(self.elapsed)
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Counter animations of one page, keyed by element
#[derive(Debug, Clone, Default)]
pub struct CounterSet {
    duration: Duration,
    running: BTreeMap<ElementId, CounterAnimation>,
    started: BTreeSet<ElementId>,
}

impl CounterSet {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    /// Start the counter of a revealed element.
    ///
    /// Each counter runs once; elements that are not counters or whose
    /// `count` is not a number are ignored. Returns whether a counter started.
    pub fn reveal<D: DocumentHost + ?Sized>(&mut self, document: &mut D, id: ElementId) -> bool {
        if self.started.contains(&id) || !document.counter_elements().contains(&id) {
            return false;
        }

        let target = match document.dataset(id, "count").map(|c| c.replace(',', "").trim().parse::<u64>()) {
            Some(Ok(target)) => target,
            Some(Err(e)) => {
                tracing::debug!("Counter {} has an invalid target: {}", id, e);
                return false;
            }
            None => return false,
        };

        let animation = CounterAnimation::new(target, self.duration);
        document.set_text(id, &format_count(animation.value()));
        self.started.insert(id);
        if !animation.is_finished() {
            self.running.insert(id, animation);
        }
        true
    }

    /// Advance every running counter by one frame. Returns how many are still running.
    pub fn tick<D: DocumentHost + ?Sized>(&mut self, document: &mut D, frame: Duration) -> usize {
        for (&id, animation) in self.running.iter_mut() {
            let value = animation.advance(frame);
            document.set_text(id, &format_count(value));
        }
        self.running.retain(|_, animation| !animation.is_finished());
        self.running.len()
    }

    /// Number of counters still animating
    pub fn active(&self) -> usize {
        self.running.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StaticDocument;

    #[test]
    fn test_counter_is_monotone_and_ends_on_target() {
        let animation = CounterAnimation::new(1716, Duration::from_millis(2000));
        let mut last = 0;
        for ms in (0..=2200).step_by(16) {
            let value = animation.value_at(Duration::from_millis(ms));
            assert!(value >= last);
            assert!(value <= 1716);
            last = value;
        }
        assert_eq!(last, 1716);
        assert_eq!(animation.value_at(Duration::ZERO), 0);
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let animation = CounterAnimation::new(42, Duration::ZERO);
        assert_eq!(animation.value(), 42);
        assert!(animation.is_finished());
    }

    #[test]
    fn test_counter_set_runs_each_counter_once() {
        let mut doc = StaticDocument::new();
        let counter = doc.add_counter(1000);
        let mut counters = CounterSet::new(Duration::from_millis(100));

        assert!(counters.reveal(&mut doc, counter));
        assert!(!counters.reveal(&mut doc, counter));
        assert_eq!(doc.element(counter).unwrap().text.as_deref(), Some("0"));

        assert_eq!(counters.tick(&mut doc, Duration::from_millis(50)), 1);
        assert_eq!(counters.tick(&mut doc, Duration::from_millis(60)), 0);
        assert_eq!(doc.element(counter).unwrap().text.as_deref(), Some("1,000"));
    }

    #[test]
    fn test_reveal_ignores_items() {
        let mut doc = StaticDocument::from_items(vec![vec![("title", "Pong")]]);
        let mut counters = CounterSet::new(Duration::from_millis(100));
        assert!(!counters.reveal(&mut doc, 0));
        assert_eq!(counters.active(), 0);
    }
}
