use crate::event_log::SortedMergeList;
use crate::schedule::{F64Key, ScheduleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Initial,
    Start,
    End,
}

/// One entry of a pool's chronological log.
///
/// `available` is the pool level in effect from `time` on, after every event
/// at that timestamp has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleEvent {
    pub time: f64,
    pub delta: i64,
    pub available: i64,
    pub seq_id: i64,
    pub kind: EventKind,
}

/// Net change at one timestamp and the level after it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Step {
    delta: i64,
    available: i64,
}

/// Event-ordered availability of one contractor pool.
///
/// The log starts with an `Initial` event at time zero carrying the full
/// capacity. Every reservation adds a `Start` and an `End` event; events at
/// equal timestamps are ordered by their sequence id, which grows with every
/// insertion. Per-timestamp deltas are folded into a step profile that
/// answers availability queries.
#[derive(Debug, Clone)]
pub struct ResourceLog {
    capacity: usize,
    events: SortedMergeList<(F64Key, i64), ScheduleEvent>,
    steps: SortedMergeList<F64Key, Step>,
    next_seq: i64,
}

fn key(t: f64) -> Result<F64Key, ScheduleError> {
    F64Key::new(t)
}

impl ResourceLog {
    pub fn new(capacity: usize) -> Self {
        let cap = capacity as i64;
        let mut events = SortedMergeList::new();
        let mut steps = SortedMergeList::new();
        events.insert(
            (F64Key::ZERO, -1),
            ScheduleEvent {
                time: 0.0,
                delta: cap,
                available: cap,
                seq_id: -1,
                kind: EventKind::Initial,
            },
        );
        steps.insert(
            F64Key::ZERO,
            Step {
                delta: cap,
                available: cap,
            },
        );
        Self {
            capacity,
            events,
            steps,
            next_seq: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn events(&self) -> impl Iterator<Item = &ScheduleEvent> + '_ {
        self.events.iter().map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pool level at `t`; nothing is available before time zero.
    pub fn available_at(&self, t: f64) -> Result<i64, ScheduleError> {
        Ok(self.steps.floor(&key(t)?).map_or(0, |(_, s)| s.available))
    }

    /// Lowest pool level anywhere in `[from, to)`.
    pub fn min_available(&self, from: f64, to: f64) -> Result<i64, ScheduleError> {
        let mut level = self.available_at(from)?;
        if to > from {
            let (lo, hi) = (key(from)?, key(to)?);
            for (k, step) in self.steps.range(lo..hi) {
                if *k > lo {
                    level = level.min(step.available);
                }
            }
        }
        Ok(level)
    }

    /// Times at which the level may rise.
    pub fn change_points(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.keys().map(F64Key::value)
    }

    /// Takes `count` units over `[start, end)`.
    ///
    /// The caller is responsible for having checked availability; the log
    /// only records.
    pub fn reserve(&mut self, count: usize, start: f64, end: f64) -> Result<(), ScheduleError> {
        if count == 0 || end <= start {
            return Ok(());
        }
        let c = count as i64;
        let (ks, ke) = (key(start)?, key(end)?);

        for (k, delta) in [(ks, -c), (ke, c)] {
            self.steps.upsert_with(
                k,
                Step {
                    delta,
                    available: 0,
                },
                |old, new| old.delta += new.delta,
            );
        }
        let from = self.steps.position(&ks).unwrap_or_else(|i| i);
        let mut level = from
            .checked_sub(1)
            .and_then(|i| self.steps.at(i))
            .map_or(0, |(_, s)| s.available);
        for step in self.steps.values_mut_from(from) {
            level += step.delta;
            step.available = level;
        }

        for (t, delta, kind) in [(start, -c, EventKind::Start), (end, c, EventKind::End)] {
            let seq_id = self.next_seq;
            self.next_seq += 1;
            self.events.insert(
                (key(t)?, seq_id),
                ScheduleEvent {
                    time: t,
                    delta,
                    available: 0,
                    seq_id,
                    kind,
                },
            );
        }
        self.refresh_event_levels(ks);
        Ok(())
    }

    /// Rewrites `available` on the events at or after `from`; earlier events
    /// are untouched by a reservation starting there.
    fn refresh_event_levels(&mut self, from: F64Key) {
        let first = self
            .events
            .position(&(from, i64::MIN))
            .unwrap_or_else(|i| i);
        let mut idx = self.steps.position(&from).unwrap_or_else(|i| i);
        let mut level = idx
            .checked_sub(1)
            .and_then(|i| self.steps.at(i))
            .map_or(0, |(_, s)| s.available);
        for event in self.events.values_mut_from(first) {
            while let Some((k, step)) = self.steps.at(idx) {
                if k.value() > event.time {
                    break;
                }
                level = step.available;
                idx += 1;
            }
            event.available = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_event_carries_capacity() {
        let log = ResourceLog::new(4);
        let first = log.events().next().unwrap();
        assert_eq!(first.kind, EventKind::Initial);
        assert_eq!(first.seq_id, -1);
        assert_eq!(first.time, 0.0);
        assert_eq!(first.available, 4);
        assert_eq!(log.available_at(-1.0).unwrap(), 0);
        assert_eq!(log.available_at(100.0).unwrap(), 4);
    }

    #[test]
    fn reservations_shape_the_profile() {
        let mut log = ResourceLog::new(5);
        log.reserve(2, 1.0, 4.0).unwrap();
        log.reserve(3, 2.0, 6.0).unwrap();
        assert_eq!(log.available_at(0.5).unwrap(), 5);
        assert_eq!(log.available_at(1.0).unwrap(), 3);
        assert_eq!(log.available_at(3.0).unwrap(), 0);
        assert_eq!(log.available_at(4.0).unwrap(), 2);
        assert_eq!(log.available_at(6.0).unwrap(), 5);
        assert_eq!(log.min_available(0.0, 2.0).unwrap(), 3);
        assert_eq!(log.min_available(4.0, 10.0).unwrap(), 2);
        assert_eq!(log.min_available(6.0, 10.0).unwrap(), 5);
    }

    #[test]
    fn back_to_back_reservations_merge_at_the_boundary() {
        let mut log = ResourceLog::new(1);
        log.reserve(1, 3.0, 5.0).unwrap();
        log.reserve(1, 0.0, 3.0).unwrap();
        assert_eq!(log.min_available(0.0, 5.0).unwrap(), 0);
        assert_eq!(log.available_at(5.0).unwrap(), 1);
        // 0.0 merges with the initial step, 3.0 merges end and start
        assert_eq!(log.change_points().count(), 3);
    }

    #[test]
    fn events_are_sorted_with_sequence_ties_and_never_negative() {
        let mut log = ResourceLog::new(2);
        log.reserve(2, 5.0, 7.0).unwrap();
        log.reserve(2, 0.0, 5.0).unwrap();
        log.reserve(1, 7.0, 8.0).unwrap();

        let events: Vec<&ScheduleEvent> = log.events().collect();
        assert_eq!(events.len(), 7);
        for pair in events.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.time < b.time || (a.time == b.time && a.seq_id < b.seq_id));
        }
        assert!(events.iter().all(|e| e.available >= 0));

        let at_five: Vec<(i64, EventKind)> = events
            .iter()
            .filter(|e| e.time == 5.0)
            .map(|e| (e.seq_id, e.kind))
            .collect();
        assert_eq!(at_five, vec![(0, EventKind::Start), (3, EventKind::End)]);
    }

    #[test]
    fn event_levels_follow_the_profile() {
        let mut log = ResourceLog::new(3);
        log.reserve(1, 4.0, 9.0).unwrap();
        log.reserve(2, 1.0, 3.0).unwrap();
        log.reserve(1, 6.0, 8.0).unwrap();
        log.reserve(1, 4.0, 5.0).unwrap();
        for event in log.events() {
            assert_eq!(
                event.available,
                log.available_at(event.time).unwrap(),
                "{event:?}"
            );
        }
        let levels: Vec<i64> = log.events().map(|e| e.available).collect();
        assert_eq!(levels, vec![3, 1, 3, 1, 1, 2, 1, 2, 3]);
    }

    #[test]
    fn empty_reservations_are_ignored() {
        let mut log = ResourceLog::new(2);
        log.reserve(0, 1.0, 2.0).unwrap();
        log.reserve(1, 2.0, 2.0).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn nan_is_rejected() {
        let mut log = ResourceLog::new(2);
        assert_eq!(log.reserve(1, f64::NAN, 2.0), Err(ScheduleError::NaNTime));
    }
}
