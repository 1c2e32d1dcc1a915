//! Half-open time windows `[start, end)` on the scheduling axis.

use std::fmt::Display;

use qtty::{Quantity, Unit};

use crate::units::Axis;

/// Continuous range `[start, end)`.
///
/// Back-to-back windows (`a.end == b.start`) do not overlap, and an empty
/// window (`start == end`) overlaps nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<U: Unit = Axis> {
    start: Quantity<U>,
    end: Quantity<U>,
}

impl<U: Unit> Interval<U> {
    /// Creates interval `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub const fn new(start: Quantity<U>, end: Quantity<U>) -> Self {
        assert!(
            start.value() <= end.value(),
            "Interval start must be <= end"
        );
        Self { start, end }
    }

    pub const fn from_f64(start: f64, end: f64) -> Self {
        Self::new(Quantity::<U>::new(start), Quantity::<U>::new(end))
    }

    pub const fn start(&self) -> Quantity<U> {
        self.start
    }

    pub const fn end(&self) -> Quantity<U> {
        self.end
    }

    pub fn duration(&self) -> Quantity<U> {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start.value() >= self.end.value()
    }

    /// Returns true if `position` ∈ `[start, end)`.
    pub const fn contains(&self, position: Quantity<U>) -> bool {
        self.start.value() <= position.value() && position.value() < self.end.value()
    }

    /// Returns true if `other` lies entirely inside this window.
    pub const fn covers(&self, other: &Interval<U>) -> bool {
        self.start.value() <= other.start.value() && other.end.value() <= self.end.value()
    }

    /// Checks if this interval shares at least one instant with another.
    pub const fn overlaps(&self, other: &Interval<U>) -> bool {
        self.start.value() < other.end.value() && other.start.value() < self.end.value()
    }

    pub fn intersection(&self, other: &Interval<U>) -> Option<Interval<U>> {
        if !self.overlaps(other) {
            return None;
        }
        let start = if self.start.value() > other.start.value() {
            self.start
        } else {
            other.start
        };
        let end = if self.end.value() < other.end.value() {
            self.end
        } else {
            other.end
        };
        Some(Interval::new(start, end))
    }

    /// Shifts both bounds by `offset`.
    pub fn shifted(&self, offset: Quantity<U>) -> Interval<U> {
        Interval::new(self.start + offset, self.end + offset)
    }
}

impl<U: Unit> Display for Interval<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.3}, {:.3})", self.start.value(), self.end.value())
    }
}

#[cfg(feature = "serde")]
impl<U: Unit> serde::Serialize for Interval<U> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Interval", 2)?;
        s.serialize_field("start", &self.start.value())?;
        s.serialize_field("end", &self.end.value())?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, U: Unit> serde::Deserialize<'de> for Interval<U> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Raw {
            start: f64,
            end: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        if raw.start.is_nan() || raw.end.is_nan() || raw.start > raw.end {
            return Err(serde::de::Error::custom("interval start must be <= end"));
        }
        Ok(Self::new(
            Quantity::<U>::new(raw.start),
            Quantity::<U>::new(raw.end),
        ))
    }
}
