//! A handful of executor independent synchronization primitives.
//!
//! The driver expects its pump and its foreground operations to run inside
//! one task, combined with [`join::join`] or [`select::select`]. These
//! primitives synchronize the parts of that task.
pub(crate) mod interrupt;
pub mod join;
pub(crate) mod mutex;
pub mod select;
pub mod yield_now;

#[cfg(test)]
pub(crate) mod test;

/// Type representing 2 possible outcomes/states
#[cfg_attr(feature = "std", derive(Debug))]
#[derive(PartialEq)]
pub enum Either<T, S> {
    /// Outcome of the first future.
    First(T),
    /// Outcome of the second future.
    Second(S),
}

impl<T, S> Either<T, S> {
    /// Returns `true` for [`Either::First`].
    pub fn is_first(&self) -> bool {
        matches!(self, Either::First(_))
    }

    /// Returns `true` for [`Either::Second`].
    pub fn is_second(&self) -> bool {
        matches!(self, Either::Second(_))
    }
}
