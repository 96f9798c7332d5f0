//! Maximal chains, Zorn's lemma and linear extensions over finite orders.
//!
//! The construction follows the usual proof of Zorn's lemma, run as an
//! algorithm:
//! - [`chain`] decides whether a set is pairwise comparable,
//! - [`successor`] grows a chain by one step when it isn't maximal,
//! - [`closure`] builds the least family of chains closed under the
//!   successor and under unions, which is totally ordered by inclusion,
//! - [`maximal`] takes the union of that family, a maximal chain,
//! - [`zorn`] bounds the maximal chain to get a maximal element,
//! - [`extension`] applies all of it to the poset of partial orders extending
//!   a given one, where maximal elements are total orders.
//!
//! Example usage:
//! ```
//! use orders::PartialOrder;
//! use zorn::extension::{extend_to_linear_order, is_extension};
//!
//! // 0 ≤ 1, and 2 unrelated to both
//! let r = PartialOrder::from_pairs(3, &[(0, 1)]).unwrap();
//! let t = extend_to_linear_order(&r).unwrap();
//! assert!(is_extension(&r, &t));
//! ```
//!
//! Everything is deterministic for a given strategy, and terminates when the
//! carrier is finite. For infinite carriers the closure family is a
//! transfinite object, and the worklist gives up after
//! [`ClosureConfig::max_steps`] steps.

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod chain;
pub mod closure;
pub mod config;
pub mod error;
pub mod extension;
pub mod maximal;
pub mod relation;
pub mod successor;
pub mod zorn;

pub use config::ClosureConfig;
pub use error::ZornError;

/// Commonly used traits
pub mod prelude {
    pub use super::{
        relation::{Carrier, Relation},
        successor::Strategy,
    };
}

#[cfg(test)]
mod tests {
    use orders::{Order, PartialOrder};
    use quickcheck::{Arbitrary, Gen};
    use rand::{rngs::StdRng, SeedableRng};

    // `Gen` contains a rng, but it's a private member so this method is used to get
    // a standard rng generated from `Gen`
    pub fn std_rng(g: &mut Gen) -> StdRng {
        let mut seed = [0u8; 32];
        for b in &mut seed {
            *b = Arbitrary::arbitrary(g);
        }
        StdRng::from_seed(seed)
    }

    /// A partial order on at most 6 elements, small enough to enumerate its
    /// chains.
    #[derive(Debug, Clone)]
    pub struct SmallPoset(pub PartialOrder);

    impl Arbitrary for SmallPoset {
        fn arbitrary(g: &mut Gen) -> Self {
            let elements = <usize as Arbitrary>::arbitrary(g) % 7;
            let p = f64::from(<u8 as Arbitrary>::arbitrary(g)) / 255.0;
            SmallPoset(PartialOrder::random(&mut std_rng(g), elements, p))
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let po = self.0.clone();
            Box::new((0..po.elements()).rev().map(move |x| {
                let mut smaller = po.clone();
                smaller.remove_subset(&[x]);
                SmallPoset(smaller)
            }))
        }
    }
}
