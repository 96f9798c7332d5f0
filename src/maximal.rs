//! Hausdorff maximality: the union of the closure family is a maximal chain.
//!
//! The union is itself a member (union rule), so `Succ` of it is a member
//! too and hence contained in it. `Succ` only returns its argument for
//! chains without a strict superchain, so nothing strictly contains the union.

use tracing::debug;

use crate::{
    chain::{is_chain, Chain},
    closure::ClosureFamily,
    config::ClosureConfig,
    error::Result,
    relation::{Carrier, Relation},
    successor::Strategy,
};

/// A chain no chain strictly contains.
pub fn maximal_chain<R, S>(
    relation: &R,
    strategy: S,
    config: &ClosureConfig,
) -> Result<Chain<R::Element>>
where
    R: Relation,
    S: Strategy<R>,
{
    maximal_chain_containing(relation, strategy, Chain::empty(), config)
}

/// A maximal chain containing `seed`.
pub fn maximal_chain_containing<R, S>(
    relation: &R,
    strategy: S,
    seed: Chain<R::Element>,
    config: &ClosureConfig,
) -> Result<Chain<R::Element>>
where
    R: Relation,
    S: Strategy<R>,
{
    let family = ClosureFamily::build_from(relation, strategy, seed, config)?;
    debug!(len = family.union().len(), members = family.len(), "maximal chain");
    Ok(family.into_union())
}

/// Check exhaustively that `chain` is a chain and that no carrier element can
/// be added to it. Any strict superchain would contain such an element, so
/// this is the same as having no strict superchain.
pub fn is_maximal_chain<R: Carrier>(relation: &R, chain: &Chain<R::Element>) -> bool {
    is_chain(relation, chain) && relation.carrier().iter().all(|x| !chain.accepts(relation, x))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use orders::{Order, PartialOrder};

    use super::*;
    use crate::{
        error::ZornError,
        successor::{FirstFit, Seeded},
        tests::SmallPoset,
    };

    // Every subset of `0..n` that is a chain.
    fn all_chains(po: &PartialOrder) -> Vec<BTreeSet<usize>> {
        let n = po.elements();
        (0..(1u32 << n))
            .map(|mask| (0..n).filter(|&i| mask & (1u32 << i) != 0).collect::<BTreeSet<usize>>())
            .filter(|set| is_chain(po, set))
            .collect()
    }

    #[test]
    fn maximal_in_diamond() {
        let po = PartialOrder::from_pairs(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        let chain = maximal_chain(&po, FirstFit, &ClosureConfig::default()).unwrap();
        assert_eq!(chain.into_set(), [0, 1, 3].into_iter().collect());
    }

    #[test]
    fn containing_seed() {
        let po = PartialOrder::from_pairs(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        let seed = Chain::new(&po, [2]).unwrap();
        let chain = maximal_chain_containing(&po, FirstFit, seed, &ClosureConfig::default()).unwrap();
        assert_eq!(chain.into_set(), [0, 2, 3].into_iter().collect());
    }

    #[test]
    fn lazy_strategy_is_not_maximal() {
        // A strategy that never extends anything makes `Succ` the identity, so
        // the construction stops at the seed.
        let po = PartialOrder::from_pairs(2, &[(0, 1)]).unwrap();
        let never = |_: &Chain<usize>| -> Option<Chain<usize>> { None };
        let chain = maximal_chain(&po, never, &ClosureConfig::default()).unwrap();
        assert!(chain.is_empty());
        assert!(!is_maximal_chain(&po, &chain));
    }

    #[test]
    fn infinite_carrier_hits_step_limit() {
        // The integers under ≤: every finite chain has a strict superchain.
        struct Integers;
        impl Relation for Integers {
            type Element = i64;

            fn related(&self, a: &i64, b: &i64) -> bool {
                a <= b
            }
        }
        let mut next = 0;
        let upward = |c: &Chain<i64>| {
            next += 1;
            let mut set = c.as_set().clone();
            set.insert(next);
            Some(Chain::from_set_unchecked(set))
        };
        let config = ClosureConfig::default().with_max_steps(50);
        assert_eq!(
            maximal_chain(&Integers, upward, &config),
            Err(ZornError::StepLimit { limit: 50 })
        );
    }

    #[quickcheck]
    fn hausdorff(po: SmallPoset, seed: u64) -> bool {
        let po = po.0;
        let chain = maximal_chain(&po, Seeded::new(seed), &ClosureConfig::default()).unwrap();
        let set = chain.as_set();
        is_maximal_chain(&po, &chain)
            && all_chains(&po).iter().all(|c| !(set.is_subset(c) && set.len() < c.len()))
    }
}
