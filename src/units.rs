//! Time axis and unit conversion helpers.
//!
//! Schedules are laid out on a single axis measured in days. Callers may
//! express fixed durations in any unit of the time dimension (hours, minutes,
//! seconds); [`convert`] brings them onto the axis with compile-time checked
//! dimensions.

use qtty::{Day, Quantity, Unit};

/// Unit of the scheduling axis.
pub type Axis = Day;

/// A point or a duration on the scheduling axis.
pub type Time = Quantity<Axis>;

/// Builds a [`Time`] from a raw axis value.
#[inline]
pub const fn time(value: f64) -> Time {
    Quantity::<Axis>::new(value)
}

/// Marker trait for units that share the same physical dimension.
///
/// Automatically implemented for any pair of units where
/// `From::Dim == To::Dim`.
///
/// # Example
///
/// ```ignore
/// use qtty::{Hour, Day};
/// use worksched::units::SameDim;
///
/// fn accepts_same_dim<From, To>()
/// where
///     From: SameDim<To>,
/// {}
///
/// accepts_same_dim::<Hour, Day>(); // OK
/// ```
pub trait SameDim<To: Unit>: Unit<Dim = To::Dim> {}

impl<From, To> SameDim<To> for From
where
    From: Unit,
    To: Unit<Dim = From::Dim>,
{
}

/// Converts a quantity from one unit to another unit of the same dimension.
#[inline]
pub const fn convert<From, To>(q: Quantity<From>) -> Quantity<To>
where
    From: SameDim<To>,
    To: Unit,
{
    q.to_const::<To>()
}

/// Converts any time-dimension quantity onto the scheduling axis.
#[inline]
pub const fn to_axis<From>(q: Quantity<From>) -> Time
where
    From: SameDim<Axis>,
{
    convert::<From, Axis>(q)
}
