#![deny(missing_docs)]

//! The **eq-relation** crate represents equivalence relations (set partitions) over
//! the indices `0..n`, and provides the usual combinatorics around them.
//!
//! An `EqRelation` starts out with every element in its own group. Groups are joined
//! with `merge` and queried with `equivalent`; internally this is a union-find forest.
//!
//! Every relation has a canonical representative, its *canonical group labeling*:
//! one group number per element, where group numbers are handed out in ascending
//! order of each group's smallest element. Equality, hashing, printing and the
//! refinement order are all defined on that labeling, so two relations built by
//! different sequences of merges compare equal as soon as they describe the same
//! partition.
//!
//! # How to use
//!
//! Use `EqRelation::new` for `n` singleton groups and `universal_relation` for a
//! single group. Relations can be reversed with `reverse`, concatenated with `+` and
//! truncated with `-` (a number of trailing elements to drop). `<`, `>` and `compare`
//! order relations by fineness; this is a partial order, so `partial_cmp` may return `None`.
//!
//! To get every relation of a given size, use `enumerate`, or iterate `Partitions` to
//! generate them lazily; `bell` gives their number.
//!
//! Relations can be used as hash keys (see `ErHash`), and `ErStore` assigns them stable ids.
//!
//! The index type defaults to `u16`; a relation over `T` holds at most `T::max_value()`
//! elements. Nothing here is thread-safe: relations cache their labeling behind
//! shared references and are therefore not `Sync`.

/// Module for the `Incrementable` and `ElementIndex` traits
pub mod traits
{
    use num_traits::{NumAssign, NumCast, One, PrimInt, ToPrimitive, Unsigned};
    use std::fmt::{Debug, Display};
    use std::hash::Hash;
    use std::ops::{Add, AddAssign};

    /// Trait for things that can be incremented, like numbers
    pub trait Incrementable
    {
        /// Increment self by mutable reference
        fn increment(&mut self);

        /// Increment self and return it
        fn incremented(mut self) -> Self
            where Self: Sized
        {
            self.increment();
            self
        }
    }

    impl<T> Incrementable for T
        where T: One + Add<T, Output = T> + AddAssign<T>
    {
        fn increment(&mut self) {
            *self += One::one();
        }

        fn incremented(self) -> T {
            self + <T as One>::one()
        }
    }

    /// Unsigned integer type used to store element indices and group labels.
    ///
    /// Implemented for all unsigned primitive integers.
    pub trait ElementIndex: PrimInt + Unsigned + NumAssign + Incrementable + Hash + Debug + Display
    {
        /// Convert a position, or return `None` if it does not fit
        fn try_from_index(i: usize) -> Option<Self> {
            <Self as NumCast>::from(i)
        }

        /// Convert a position, panicking if it does not fit
        fn from_index(i: usize) -> Self {
            Self::try_from_index(i)
                .unwrap_or_else(|| panic!("index {} does not fit into {}", i, std::any::type_name::<Self>()))
        }

        /// Convert back to a position
        fn to_index(self) -> usize {
            self.to_usize()
                .unwrap_or_else(|| panic!("index {} does not fit into usize", self))
        }
    }

    impl<T> ElementIndex for T
        where T: PrimInt + Unsigned + NumAssign + Incrementable + Hash + Debug + Display
    {
    }
}

mod enumerate;
mod error;
mod hash;
mod relation;
mod store;

pub use crate::enumerate::{enumerate, Partitions};
pub use crate::error::Error;
pub use crate::hash::ErHash;
pub use crate::relation::{universal_relation, EqRelation, Fineness};
pub use crate::store::{get_er, get_id, ErStore};

/// Index type used when none is given
pub type DefaultIndex = u16;

// bigger ones don't fit into u64
static BELL_NUMBERS: [u64; 26] = [
    1,
    1,
    2,
    5,
    15,
    52,
    203,
    877,
    4140,
    21147,
    115975,
    678570,
    4213597,
    27644437,
    190899322,
    1382958545,
    10480142147,
    82864869804,
    682076806159,
    5832742205057,
    51724158235372,
    474869816156751,
    4506715738447323,
    44152005855084346,
    445958869294805289,
    4638590332229999353
];

/// Number of partitions of a set of `n` elements.
///
/// Simply returns the `n`-th Bell number, or `None` if it's too large to fit into `u64`.
pub fn set_partitions(n: usize) -> Option<u64>
{
    BELL_NUMBERS.get(n).copied()
}

/// Returns the `n`-th Bell number, the number of relations `enumerate(n)` returns.
///
/// # Panics
///
/// If `n > 25`; use `set_partitions` to check instead.
pub fn bell(n: usize) -> u64
{
    set_partitions(n).unwrap_or_else(|| panic!("bell({}) does not fit into u64, n must be at most 25", n))
}
