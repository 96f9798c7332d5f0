//! The successor operator `Succ`.
//!
//! `Succ(C)` is a strictly larger chain when one exists and `C` itself
//! otherwise. Which superchain is picked is up to a [`Strategy`]. The
//! [`Successor`] wrapper checks every proposal and remembers its answers, so
//! `Succ` stays single-valued for a whole construction even when the strategy
//! is randomized.

use std::collections::BTreeMap;

use rand::{seq::IndexedRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::{
    chain::{comparable, Chain},
    error::{Result, ZornError},
    relation::{Carrier, Relation},
};

/// An "extend if possible" oracle.
pub trait Strategy<R: Relation> {
    /// A chain strictly containing `chain`, or `None` if `chain` is maximal.
    fn extend(&mut self, relation: &R, chain: &Chain<R::Element>) -> Option<Chain<R::Element>>;
}

impl<R, F> Strategy<R> for F
where
    R: Relation,
    F: FnMut(&Chain<R::Element>) -> Option<Chain<R::Element>>,
{
    fn extend(&mut self, _relation: &R, chain: &Chain<R::Element>) -> Option<Chain<R::Element>> {
        self(chain)
    }
}

/// Insert the first element of the carrier that keeps the set a chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl<R: Carrier> Strategy<R> for FirstFit {
    fn extend(&mut self, relation: &R, chain: &Chain<R::Element>) -> Option<Chain<R::Element>> {
        let x = relation.carrier().into_iter().find(|x| chain.accepts(relation, x))?;
        let mut members = chain.as_set().clone();
        members.insert(x);
        Some(Chain::from_set_unchecked(members))
    }
}

/// Insert a random element of the carrier that keeps the set a chain. The
/// choices only depend on the seed.
#[derive(Debug, Clone)]
pub struct Seeded {
    rng: ChaCha8Rng,
}

impl Seeded {
    pub fn new(seed: u64) -> Self {
        Seeded { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl<R: Carrier> Strategy<R> for Seeded {
    fn extend(&mut self, relation: &R, chain: &Chain<R::Element>) -> Option<Chain<R::Element>> {
        let candidates: Vec<R::Element> =
            relation.carrier().into_iter().filter(|x| chain.accepts(relation, x)).collect();
        let x = candidates.choose(&mut self.rng)?.clone();
        let mut members = chain.as_set().clone();
        members.insert(x);
        Some(Chain::from_set_unchecked(members))
    }
}

/// `Succ`, backed by a strategy.
pub struct Successor<'r, R: Relation, S> {
    relation: &'r R,
    strategy: S,
    // `None` when the caller never asks twice for the same chain.
    memo: Option<BTreeMap<Chain<R::Element>, Chain<R::Element>>>,
    evaluated: usize,
}

impl<'r, R, S> Successor<'r, R, S>
where
    R: Relation,
    S: Strategy<R>,
{
    pub fn new(relation: &'r R, strategy: S) -> Self {
        Successor { relation, strategy, memo: Some(BTreeMap::new()), evaluated: 0 }
    }

    /// A successor that doesn't remember its answers. Only single-valued if
    /// it is applied at most once to each chain.
    pub fn once(relation: &'r R, strategy: S) -> Self {
        Successor { relation, strategy, memo: None, evaluated: 0 }
    }

    pub fn relation(&self) -> &'r R {
        self.relation
    }

    /// `Succ(chain)`. Always a superset of `chain`, and equal to it exactly
    /// when the strategy finds nothing to add.
    pub fn apply(&mut self, chain: &Chain<R::Element>) -> Result<Chain<R::Element>> {
        if let Some(next) = self.memo.as_ref().and_then(|memo| memo.get(chain)) {
            trace!(len = chain.len(), "successor already known");
            return Ok(next.clone());
        }
        let next = match self.strategy.extend(self.relation, chain) {
            None => chain.clone(),
            Some(next) => {
                self.validate(chain, &next)?;
                next
            }
        };
        debug!(from = chain.len(), to = next.len(), "successor");
        self.evaluated += 1;
        if let Some(memo) = self.memo.as_mut() {
            memo.insert(chain.clone(), next.clone());
        }
        Ok(next)
    }

    // `chain` is already a chain, so only the added elements need checking.
    fn validate(&self, chain: &Chain<R::Element>, next: &Chain<R::Element>) -> Result<()> {
        let invalid = |reason: String| ZornError::InvalidSuccessor {
            chain: chain.describe(),
            reason,
        };
        if !next.is_superchain_of(chain) {
            return Err(invalid(format!("{} is not a strict superset", next.describe())));
        }
        let added: Vec<&R::Element> = next.iter().filter(|x| !chain.contains(x)).collect();
        if let Some(x) = added.iter().find(|x| !self.relation.contains(x)) {
            return Err(ZornError::OutsideCarrier { element: format!("{x:?}") });
        }
        for a in &added {
            if let Some(b) = next.iter().find(|b| !comparable(self.relation, a, b)) {
                return Err(invalid(format!("{a:?} and {b:?} are incomparable")));
            }
        }
        Ok(())
    }

    /// Number of times the strategy has been consulted.
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }
}

#[cfg(test)]
mod tests {
    use orders::PartialOrder;

    use super::*;
    use crate::tests::SmallPoset;

    fn diamond() -> PartialOrder {
        PartialOrder::from_pairs(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap()
    }

    #[test]
    fn first_fit_order() {
        let po = diamond();
        let mut succ = Successor::new(&po, FirstFit);
        let c0 = Chain::empty();
        let c1 = succ.apply(&c0).unwrap();
        assert_eq!(c1.iter().copied().collect::<Vec<_>>(), vec![0]);
        let c2 = succ.apply(&c1).unwrap();
        let c3 = succ.apply(&c2).unwrap();
        assert_eq!(c3.iter().copied().collect::<Vec<_>>(), vec![0, 1, 3]);
        // 2 is incomparable to 1
        assert_eq!(succ.apply(&c3).unwrap(), c3);
    }

    #[test]
    fn memoized() {
        let po = PartialOrder::new_empty(5);
        let mut succ = Successor::new(&po, Seeded::new(7));
        let a = succ.apply(&Chain::empty()).unwrap();
        for _ in 0..10 {
            assert_eq!(succ.apply(&Chain::empty()).unwrap(), a);
        }
        assert_eq!(succ.evaluated(), 1);
    }

    #[test]
    fn once_asks_every_time() {
        let po = PartialOrder::new_empty(3);
        let mut succ = Successor::once(&po, FirstFit);
        let a = succ.apply(&Chain::empty()).unwrap();
        assert_eq!(succ.apply(&Chain::empty()).unwrap(), a);
        assert_eq!(succ.evaluated(), 2);
    }

    #[test]
    fn rejects_bad_proposals() {
        let po = diamond();
        let shrink = |_: &Chain<usize>| -> Option<Chain<usize>> { Some(Chain::empty()) };
        let mut succ = Successor::new(&po, shrink);
        let c = Chain::new(&po, [0]).unwrap();
        assert!(matches!(succ.apply(&c), Err(ZornError::InvalidSuccessor { .. })));

        let incomparable = |c: &Chain<usize>| -> Option<Chain<usize>> {
            Some(Chain::from_set_unchecked(c.iter().copied().chain([1, 2]).collect()))
        };
        let mut succ = Successor::new(&po, incomparable);
        assert!(matches!(succ.apply(&c), Err(ZornError::InvalidSuccessor { .. })));

        let outside = |c: &Chain<usize>| -> Option<Chain<usize>> {
            Some(Chain::from_set_unchecked(c.iter().copied().chain([9]).collect()))
        };
        let mut succ = Successor::new(&po, outside);
        assert!(matches!(succ.apply(&c), Err(ZornError::OutsideCarrier { .. })));
    }

    #[quickcheck]
    fn successor_monotone(po: SmallPoset, seed: u64) -> bool {
        let po = po.0;
        let mut succ = Successor::new(&po, Seeded::new(seed));
        let mut chain = Chain::empty();
        loop {
            let next = succ.apply(&chain).unwrap();
            if !chain.is_subset(&next) {
                return false;
            }
            if next == chain {
                break;
            }
            chain = next;
        }
        true
    }

    #[quickcheck]
    fn successor_idempotent_on_maximal(po: SmallPoset) -> bool {
        let po = po.0;
        let mut succ = Successor::new(&po, FirstFit);
        let mut chain = Chain::empty();
        while let Ok(next) = succ.apply(&chain) {
            if next == chain {
                break;
            }
            chain = next;
        }
        // Nothing else can be inserted, and `Succ` leaves the chain alone.
        po.carrier().iter().all(|x| !chain.accepts(&po, x)) && succ.apply(&chain) == Ok(chain)
    }
}
