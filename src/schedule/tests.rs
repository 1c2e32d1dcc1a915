//! Test suite for the Schedule module.

use super::*;
use crate::interval::Interval;
use qtty::{Hour, Quantity};

fn sw(id: &str, start: f64, end: f64) -> ScheduledWork {
    ScheduledWork::new(id, format!("work {id}"), Interval::from_f64(start, end))
}

#[cfg(test)]
mod basic_operations {
    use super::*;

    #[test]
    fn test_new_schedule_is_empty() {
        let schedule = Schedule::new();
        assert!(schedule.is_empty());
        assert_eq!(schedule.len(), 0);
        assert_eq!(schedule.execution_time().value(), 0.0);
        assert_eq!(schedule.span(), None);
    }

    #[test]
    fn test_insert_and_get() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("1", 0.0, 10.0)).unwrap();
        assert!(schedule.contains("1"));
        assert_eq!(schedule.get("1").unwrap().finish().value(), 10.0);
        assert!(schedule.get("2").is_none());
    }

    #[test]
    fn test_duplicate_work_fails() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("1", 0.0, 10.0)).unwrap();
        assert_eq!(
            schedule.insert(sw("1", 20.0, 30.0)),
            Err(ScheduleError::DuplicateWork("1".to_string()))
        );
    }

    #[test]
    fn test_require_missing() {
        let schedule = Schedule::new();
        assert_eq!(
            schedule.require("x").unwrap_err(),
            ScheduleError::WorkNotFound("x".to_string())
        );
    }

    #[test]
    fn test_remove() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("1", 0.0, 10.0)).unwrap();
        schedule.insert(sw("2", 5.0, 7.0)).unwrap();
        let removed = schedule.remove("1").unwrap();
        assert_eq!(removed.start().value(), 0.0);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.ids().collect::<Vec<_>>(), vec!["2"]);
        assert!(schedule.remove("1").is_none());
    }

    #[test]
    fn test_clear() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("1", 0.0, 1.0)).unwrap();
        schedule.clear();
        assert!(schedule.is_empty());
        assert_eq!(schedule.ids().count(), 0);
    }
}

#[cfg(test)]
mod ordering {
    use super::*;

    #[test]
    fn test_iter_is_chronological_with_id_ties() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("c", 4.0, 6.0)).unwrap();
        schedule.insert(sw("b", 0.0, 2.0)).unwrap();
        schedule.insert(sw("a", 4.0, 5.0)).unwrap();
        let ids: Vec<&str> = schedule.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_overlapping_works_are_allowed() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("1", 0.0, 10.0)).unwrap();
        schedule.insert(sw("2", 5.0, 15.0)).unwrap();
        let active: Vec<&str> = schedule
            .active_at(crate::units::time(7.0))
            .unwrap()
            .into_iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(active, vec!["1", "2"]);
    }

    #[test]
    fn test_active_at_is_half_open() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("1", 0.0, 10.0)).unwrap();
        assert!(schedule
            .active_at(crate::units::time(10.0))
            .unwrap()
            .is_empty());
        assert!(matches!(
            schedule.active_at(crate::units::time(f64::NAN)),
            Err(ScheduleError::NaNTime)
        ));
    }

    #[test]
    fn test_span_and_execution_time() {
        let mut schedule = Schedule::new();
        schedule.insert(sw("1", 2.0, 10.0)).unwrap();
        schedule.insert(sw("2", 3.0, 14.0)).unwrap();
        schedule.insert(sw("3", 5.0, 6.0)).unwrap();
        assert_eq!(schedule.execution_time().value(), 14.0);
        assert_eq!(schedule.earliest_start().map(|t| t.value()), Some(2.0));
        assert_eq!(schedule.span().map(|t| t.value()), Some(12.0));
    }
}

#[cfg(test)]
mod entry_key {
    use super::*;

    #[test]
    fn test_nan_rejected() {
        assert_eq!(F64Key::new(f64::NAN), Err(ScheduleError::NaNTime));
    }

    #[test]
    fn test_total_order() {
        let mut keys: Vec<F64Key> = [3.0, -1.0, 0.0, 2.5]
            .into_iter()
            .map(|v| F64Key::new(v).unwrap())
            .collect();
        keys.sort();
        let values: Vec<f64> = keys.iter().map(F64Key::value).collect();
        assert_eq!(values, vec![-1.0, 0.0, 2.5, 3.0]);
    }
}

#[cfg(test)]
mod work_spec {
    use super::*;

    #[test]
    fn test_missing_spec_is_default() {
        let spec = ScheduleSpec::new();
        let ws = spec.get("anything");
        assert!(ws.assigned_workers().is_empty());
        assert_eq!(ws.assigned_time(), None);
        assert!(!ws.is_independent());
    }

    #[test]
    fn test_overrides() {
        let spec = ScheduleSpec::new().with(
            "a",
            WorkSpec::new()
                .with_workers("driver", 3)
                .with_time(Quantity::<Hour>::new(36.0))
                .independent(true),
        );
        let ws = spec.get("a");
        assert_eq!(ws.assigned_count("driver"), Some(3));
        assert_eq!(ws.assigned_count("welder"), None);
        assert!((ws.assigned_time().unwrap().value() - 1.5).abs() < 1e-12);
        assert!(ws.is_independent());
        assert_eq!(spec.len(), 1);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_schedule_roundtrip_keeps_order() {
        let mut schedule = Schedule::new();
        let mut work = sw("b", 1.0, 2.0);
        work.workers.insert("driver".into(), 2);
        schedule.insert(work).unwrap();
        schedule.insert(sw("a", 0.0, 3.0)).unwrap();

        let json = serde_json::to_string(&schedule).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        let ids: Vec<&str> = back.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(back.get("b").unwrap().workers["driver"], 2);
    }

    #[test]
    fn test_duplicate_rejected_on_deserialize() {
        let one = serde_json::to_value(sw("a", 0.0, 1.0)).unwrap();
        let json = serde_json::Value::Array(vec![one.clone(), one]);
        assert!(serde_json::from_value::<Schedule>(json).is_err());
    }
}
