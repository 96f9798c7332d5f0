//! The closure family: the least set of chains containing a seed chain and
//! closed under `Succ` and under unions of members.
//!
//! Over a finite carrier the family is reached by a worklist. Every chain is
//! fed to `Succ` once, and after every step the union of all members is
//! offered as a member too. Since members are totally ordered by inclusion,
//! the union of any subfamily is one of its members, so the union of the whole
//! family is the only union that can be new. Over an infinite carrier the
//! family need not stabilize, and the worklist stops at
//! [`ClosureConfig::max_steps`].
//!
//! Started from a single seed, `Succ` only ever produces strict supersets, so
//! the members form one nested sequence and the whole-family union is always
//! the largest member. The union rule and the totality and fixpoint checks
//! never fire then. They guard the invariants the construction relies on.

use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    fmt::Debug,
};

use tracing::{debug, trace};

use crate::{
    chain::{find_incomparable, Chain},
    config::ClosureConfig,
    error::{Result, ZornError},
    relation::Relation,
    successor::{Strategy, Successor},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId(usize);

impl ChainId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The rule that put a chain into the family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOrigin {
    /// The chain the construction started from.
    Seed,
    /// `Succ` of another member.
    Successor(ChainId),
    /// The union of these members.
    Union(Vec<ChainId>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<T> {
    chain: Chain<T>,
    origin: ChainOrigin,
}

impl<T> Member<T> {
    pub fn chain(&self) -> &Chain<T> {
        &self.chain
    }

    pub fn origin(&self) -> &ChainOrigin {
        &self.origin
    }
}

#[derive(Debug, Clone)]
pub struct ClosureFamily<T> {
    members: Vec<Member<T>>,
    fixpoint: ChainId,
    steps: usize,
}

impl<T: Clone + Ord + Debug> ClosureFamily<T> {
    /// The closure family generated from the empty chain.
    pub fn build<R, S>(relation: &R, strategy: S, config: &ClosureConfig) -> Result<Self>
    where
        R: Relation<Element = T>,
        S: Strategy<R>,
    {
        Self::build_from(relation, strategy, Chain::empty(), config)
    }

    /// The closure family generated from `seed`. Every member contains `seed`.
    pub fn build_from<R, S>(
        relation: &R,
        strategy: S,
        seed: Chain<T>,
        config: &ClosureConfig,
    ) -> Result<Self>
    where
        R: Relation<Element = T>,
        S: Strategy<R>,
    {
        let mut worklist = Worklist::new(relation, strategy, config.check_invariants);
        worklist.insert(seed, ChainOrigin::Seed)?;
        let mut steps = 0;
        while let Some(id) = worklist.queue.pop_front() {
            if steps == config.max_steps {
                return Err(ZornError::StepLimit { limit: config.max_steps });
            }
            steps += 1;
            worklist.step(id)?;
            debug!(step = steps, members = worklist.members.len(), "closure step");
        }
        let fixpoint = worklist.fixpoint()?;
        debug!(members = worklist.members.len(), steps, "closure family complete");
        Ok(ClosureFamily { members: worklist.members, fixpoint, steps })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, id: ChainId) -> Option<&Member<T>> {
        self.members.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChainId, &Member<T>)> {
        self.members.iter().enumerate().map(|(i, m)| (ChainId(i), m))
    }

    pub fn find(&self, chain: &Chain<T>) -> Option<ChainId> {
        self.members.iter().position(|m| &m.chain == chain).map(ChainId)
    }

    /// The member with `Succ(C) = C`, which is also the union of the family.
    pub fn fixpoint(&self) -> ChainId {
        self.fixpoint
    }

    /// The union of every member of the family.
    pub fn union(&self) -> &Chain<T> {
        &self.members[self.fixpoint.0].chain
    }

    pub fn into_union(mut self) -> Chain<T> {
        self.members.swap_remove(self.fixpoint.0).chain
    }

    /// Number of times `Succ` was applied.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Every two members are comparable by inclusion. Checked incrementally
    /// during construction unless invariants were switched off.
    pub fn is_total(&self) -> bool {
        self.members.iter().enumerate().all(|(i, a)| {
            self.members[(i + 1)..].iter().all(|b| a.chain.comparable_by_inclusion(&b.chain))
        })
    }
}

struct Worklist<'r, R: Relation, S> {
    successor: Successor<'r, R, S>,
    members: Vec<Member<R::Element>>,
    // Members by size. Nested members all have different sizes.
    by_len: BTreeMap<usize, Vec<ChainId>>,
    union: BTreeSet<R::Element>,
    largest: Option<ChainId>,
    queue: VecDeque<ChainId>,
    fixpoints: Vec<ChainId>,
    check: bool,
}

impl<'r, R, S> Worklist<'r, R, S>
where
    R: Relation,
    S: Strategy<R>,
{
    // Every member is stepped once, so `Succ` needs no memo to stay
    // single-valued.
    fn new(relation: &'r R, strategy: S, check: bool) -> Self {
        Worklist {
            successor: Successor::once(relation, strategy),
            members: Vec::new(),
            by_len: BTreeMap::new(),
            union: BTreeSet::new(),
            largest: None,
            queue: VecDeque::new(),
            fixpoints: Vec::new(),
            check,
        }
    }

    fn step(&mut self, id: ChainId) -> Result<()> {
        let next = self.successor.apply(&self.members[id.0].chain)?;
        if next == self.members[id.0].chain {
            trace!(id = id.0, "successor fixpoint");
            self.fixpoints.push(id);
        } else {
            self.insert(next, ChainOrigin::Successor(id))?;
        }

        // Every member is contained in `union`, so the largest member is equal
        // to it exactly when their sizes agree.
        if self.union_is_member() {
            return Ok(());
        }
        let union = Chain::from_set_unchecked(self.union.clone());
        if let Some((a, b)) = find_incomparable(self.successor.relation(), &union) {
            return Err(ZornError::ClosureNotTotal {
                left: format!("{a:?}"),
                right: format!("{b:?}"),
            });
        }
        let all = (0..self.members.len()).map(ChainId).collect();
        self.insert(union, ChainOrigin::Union(all))
    }

    fn union_is_member(&self) -> bool {
        self.largest.is_some_and(|id| self.members[id.0].chain.len() == self.union.len())
    }

    fn find(&self, chain: &Chain<R::Element>) -> Option<ChainId> {
        let same_len = self.by_len.get(&chain.len())?;
        same_len.iter().copied().find(|id| &self.members[id.0].chain == chain)
    }

    fn insert(&mut self, chain: Chain<R::Element>, origin: ChainOrigin) -> Result<()> {
        if self.find(&chain).is_some() {
            return Ok(());
        }
        if self.check {
            self.check_nested(&chain)?;
        }
        let id = ChainId(self.members.len());
        self.by_len.entry(chain.len()).or_default().push(id);
        if self.largest.is_none_or(|l| self.members[l.0].chain.len() < chain.len()) {
            self.largest = Some(id);
        }
        for x in chain.iter() {
            if !self.union.contains(x) {
                self.union.insert(x.clone());
            }
        }
        self.members.push(Member { chain, origin });
        self.queue.push_back(id);
        Ok(())
    }

    // The members so far are nested, so it is enough to compare `chain` with
    // its neighbours by size.
    fn check_nested(&self, chain: &Chain<R::Element>) -> Result<()> {
        let len = chain.len();
        let same = self.by_len.get(&len).and_then(|ids| ids.first());
        let below = self.by_len.range(..len).next_back().and_then(|(_, ids)| ids.first());
        let above = self.by_len.range((len + 1)..).next().and_then(|(_, ids)| ids.first());
        let offending = same
            .or(below.filter(|id| !self.members[id.0].chain.is_subset(chain)))
            .or(above.filter(|id| !chain.is_subset(&self.members[id.0].chain)));
        if let Some(id) = offending {
            return Err(ZornError::ClosureNotTotal {
                left: self.members[id.0].chain.describe(),
                right: chain.describe(),
            });
        }
        trace!(len, "new member is nested with every member");
        Ok(())
    }

    // Any member fixed by `Succ` must be the union of the whole family.
    fn fixpoint(&self) -> Result<ChainId> {
        let mut found = None;
        for &id in &self.fixpoints {
            if self.members[id.0].chain.as_set() != &self.union {
                return Err(ZornError::MissingFixpoint);
            }
            found = Some(id);
        }
        found.ok_or(ZornError::MissingFixpoint)
    }
}

#[cfg(test)]
mod tests {
    use orders::PartialOrder;

    use super::*;
    use crate::{
        chain::union_set,
        successor::{FirstFit, Seeded},
        tests::SmallPoset,
    };

    fn chain_of(n: usize) -> PartialOrder {
        let pairs: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
        PartialOrder::from_pairs(n, &pairs).unwrap()
    }

    #[test]
    fn tower_on_a_chain() {
        let po = chain_of(4);
        let family = ClosureFamily::build(&po, FirstFit, &ClosureConfig::default()).unwrap();
        // ∅ ⊂ {0} ⊂ {0,1} ⊂ {0,1,2} ⊂ {0,1,2,3}
        assert_eq!(family.len(), 5);
        assert_eq!(family.union().len(), 4);
        assert!(family.is_total());
        let (first, _) = family.iter().next().unwrap();
        assert_eq!(family.get(first).unwrap().origin(), &ChainOrigin::Seed);
        for (id, member) in family.iter().skip(1) {
            assert_eq!(member.origin(), &ChainOrigin::Successor(ChainId(id.index() - 1)));
        }
    }

    #[test]
    fn empty_carrier() {
        let po = PartialOrder::new_empty(0);
        let family = ClosureFamily::build(&po, FirstFit, &ClosureConfig::default()).unwrap();
        assert_eq!(family.len(), 1);
        assert!(family.union().is_empty());
        assert_eq!(family.steps(), 1);
    }

    #[test]
    fn step_limit() {
        let po = chain_of(5);
        let config = ClosureConfig::default().with_max_steps(3);
        assert_eq!(
            ClosureFamily::build(&po, FirstFit, &config).unwrap_err(),
            ZornError::StepLimit { limit: 3 }
        );
    }

    #[test]
    fn seeded_family_contains_seed() {
        let po = PartialOrder::from_pairs(4, &[(0, 1), (2, 1), (1, 3)]).unwrap();
        let seed = Chain::new(&po, [2]).unwrap();
        let family =
            ClosureFamily::build_from(&po, FirstFit, seed.clone(), &ClosureConfig::default())
                .unwrap();
        assert!(family.iter().all(|(_, m)| seed.is_subset(m.chain())));
        assert_eq!(family.union().iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[quickcheck]
    fn family_is_total(po: SmallPoset, seed: u64) -> bool {
        let po = po.0;
        let config = ClosureConfig::default().with_invariants(false);
        let family = ClosureFamily::build(&po, Seeded::new(seed), &config).unwrap();
        family.is_total()
    }

    #[quickcheck]
    fn fixpoint_is_union(po: SmallPoset, seed: u64) -> bool {
        let po = po.0;
        let family = ClosureFamily::build(&po, Seeded::new(seed), &ClosureConfig::default()).unwrap();
        let union = union_set(family.iter().map(|(_, m)| m.chain()));
        family.union().as_set() == &union
            && family.find(family.union()) == Some(family.fixpoint())
    }

    fn never(_: &Chain<usize>) -> Option<Chain<usize>> {
        None
    }

    #[test]
    fn members_must_be_nested() {
        let po = chain_of(3);
        let mut worklist = Worklist::new(&po, never, true);
        worklist.insert(Chain::new(&po, [0]).unwrap(), ChainOrigin::Seed).unwrap();
        let same_size = worklist.insert(Chain::new(&po, [1]).unwrap(), ChainOrigin::Seed);
        assert!(matches!(same_size, Err(ZornError::ClosureNotTotal { .. })));
        let larger = worklist.insert(Chain::new(&po, [1, 2]).unwrap(), ChainOrigin::Seed);
        assert!(matches!(larger, Err(ZornError::ClosureNotTotal { .. })));
        assert!(worklist.insert(Chain::new(&po, [0, 2]).unwrap(), ChainOrigin::Seed).is_ok());
        assert_eq!(worklist.members.len(), 2);
    }

    #[test]
    fn union_of_unnested_members() {
        // With checks off, two seeds that aren't nested force a union member.
        let po = chain_of(2);
        let mut worklist = Worklist::new(&po, never, false);
        worklist.insert(Chain::new(&po, [0]).unwrap(), ChainOrigin::Seed).unwrap();
        worklist.insert(Chain::new(&po, [1]).unwrap(), ChainOrigin::Seed).unwrap();
        worklist.step(ChainId(0)).unwrap();
        let union = &worklist.members[2];
        assert_eq!(union.origin(), &ChainOrigin::Union(vec![ChainId(0), ChainId(1)]));
        assert_eq!(union.chain().iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        // {0} is fixed by `Succ` without being the union.
        assert_eq!(worklist.fixpoint(), Err(ZornError::MissingFixpoint));
    }

    #[test]
    fn union_must_be_a_chain() {
        let po = PartialOrder::new_empty(2);
        let mut worklist = Worklist::new(&po, never, false);
        worklist.insert(Chain::new(&po, [0]).unwrap(), ChainOrigin::Seed).unwrap();
        worklist.insert(Chain::new(&po, [1]).unwrap(), ChainOrigin::Seed).unwrap();
        assert!(matches!(worklist.step(ChainId(0)), Err(ZornError::ClosureNotTotal { .. })));
    }

    #[test]
    fn no_fixpoint_before_stepping() {
        let po = chain_of(2);
        let mut worklist = Worklist::new(&po, FirstFit, true);
        worklist.insert(Chain::empty(), ChainOrigin::Seed).unwrap();
        assert_eq!(worklist.fixpoint(), Err(ZornError::MissingFixpoint));
    }

    #[test]
    fn each_member_stepped_once() {
        let po = chain_of(30);
        let family = ClosureFamily::build(&po, FirstFit, &ClosureConfig::default()).unwrap();
        assert_eq!(family.len(), 31);
        assert_eq!(family.steps(), family.len());
        assert!(family.iter().all(|(_, m)| !matches!(m.origin(), ChainOrigin::Union(_))));
    }
}
