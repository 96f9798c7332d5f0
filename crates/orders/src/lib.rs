//! Finite orders over the elements `0..n`.
//!
//! The most general type is [`PartialOrder`](partial_order::PartialOrder), a
//! reflexive, antisymmetric and transitive relation stored as a boolean
//! matrix. A [`TotalOrder`](total::TotalOrder) is a permutation of every
//! element, lowest first, and can always be turned into a `PartialOrder`.
//!
//! Relations are values here: extending one order into another never mutates
//! the original, it returns a new order.

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod partial_order;
pub mod total;

pub use partial_order::{PartialOrder, PartialOrderManual, Violation};
pub use total::TotalOrder;

pub trait Order {
    /// The number of elements that can be in this order.
    fn elements(&self) -> usize;

    /// The number of elements currently part of this order.
    fn len(&self) -> usize;

    /// Shorthand for `self.len() == 0`
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_partial(self) -> PartialOrder;
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};
    use rand::{SeedableRng, rngs::StdRng};

    // `Gen` contains a rng, but it's a private member so this method is used to get
    // a standard rng generated from `Gen`
    pub fn std_rng(g: &mut Gen) -> StdRng {
        let mut seed = [0u8; 32];
        for b in &mut seed {
            *b = Arbitrary::arbitrary(g);
        }
        StdRng::from_seed(seed)
    }
}
