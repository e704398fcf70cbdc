//! Cost - the single-level measure of schedule quality.
//!
//! Lower is better. Penalty weights are non-negative integers; an outright
//! double-booking of a group is infinitely expensive, so the value saturates
//! at [`Cost::INFINITE`] instead of wrapping.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// A non-negative schedule cost.
///
/// # Examples
///
/// ```
/// use slotforge_core::Cost;
///
/// let a = Cost::of(100);
/// let b = Cost::of(5);
///
/// assert!(b < a);
/// assert_eq!(a + b, Cost::of(105));
/// assert!((a + Cost::INFINITE).is_infinite());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cost {
    value: u64,
}

impl Cost {
    /// The zero cost.
    pub const ZERO: Cost = Cost { value: 0 };

    /// An unresolvable cost, larger than any finite cost.
    pub const INFINITE: Cost = Cost { value: u64::MAX };

    /// Creates a cost with the given value.
    #[inline]
    pub const fn of(value: u64) -> Self {
        Cost { value }
    }

    /// Returns the raw value. [`Cost::INFINITE`] maps to `u64::MAX`.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    #[inline]
    pub const fn is_infinite(&self) -> bool {
        self.value == u64::MAX
    }

    /// Multiplies this cost by a count, saturating at infinity.
    #[inline]
    pub fn times(self, count: usize) -> Self {
        Cost::of(self.value.saturating_mul(count as u64))
    }
}

impl Add for Cost {
    type Output = Cost;

    #[inline]
    fn add(self, rhs: Cost) -> Cost {
        Cost::of(self.value.saturating_add(rhs.value))
    }
}

impl AddAssign for Cost {
    #[inline]
    fn add_assign(&mut self, rhs: Cost) {
        *self = *self + rhs;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl From<u64> for Cost {
    fn from(value: u64) -> Self {
        Cost::of(value)
    }
}

impl fmt::Debug for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cost({})", self)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "inf")
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Violations and cost produced by evaluating (part of) a schedule.
///
/// Violations are human-readable and kept in evaluation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CostReport {
    pub violations: Vec<String>,
    pub cost: Cost,
}

impl CostReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one violation together with the cost it contributes.
    pub fn push(&mut self, violation: impl Into<String>, cost: Cost) {
        self.violations.push(violation.into());
        self.cost += cost;
    }

    /// Appends another report, consuming it.
    pub fn absorb(&mut self, other: CostReport) {
        self.violations.extend(other.violations);
        self.cost += other.cost;
    }

    /// Appends a copy of another report.
    pub fn extend_from(&mut self, other: &CostReport) {
        self.violations.extend(other.violations.iter().cloned());
        self.cost += other.cost;
    }

    pub fn is_clean(&self) -> bool {
        self.cost.is_zero() && self.violations.is_empty()
    }
}
