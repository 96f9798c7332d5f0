//! Chains: sets whose elements are pairwise comparable.
//!
//! A [`Chain`] is only ever built through a relation that vouches for it, and
//! is never mutated afterwards. Growing a chain returns a new value.

use std::{
    collections::{btree_set, BTreeSet},
    fmt::Debug,
};

use crate::{
    error::{Result, ZornError},
    relation::Relation,
};

/// `a = b`, `R a b` or `R b a`.
pub fn comparable<R: Relation>(relation: &R, a: &R::Element, b: &R::Element) -> bool {
    a == b || relation.related(a, b) || relation.related(b, a)
}

/// The first pair of incomparable elements, in iteration order.
pub fn find_incomparable<'a, R, I>(relation: &R, elements: I) -> Option<(R::Element, R::Element)>
where
    R: Relation,
    R::Element: 'a,
    I: IntoIterator<Item = &'a R::Element>,
{
    let elements: Vec<&R::Element> = elements.into_iter().collect();
    for (i, a) in elements.iter().enumerate() {
        for b in &elements[(i + 1)..] {
            if !comparable(relation, a, b) {
                return Some(((*a).clone(), (*b).clone()));
            }
        }
    }
    None
}

/// Returns true if every two elements of `elements` are comparable under
/// `relation`. The empty set and every singleton are chains.
pub fn is_chain<'a, R, I>(relation: &R, elements: I) -> bool
where
    R: Relation,
    R::Element: 'a,
    I: IntoIterator<Item = &'a R::Element>,
{
    find_incomparable(relation, elements).is_none()
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Chain<T> {
    members: BTreeSet<T>,
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Chain { members: BTreeSet::new() }
    }
}

impl<T: Clone + Ord + Debug> Chain<T> {
    pub fn empty() -> Self {
        Chain::default()
    }

    /// Collect `elements` into a chain, checking that every element is in the
    /// carrier of `relation` and that every two are comparable.
    pub fn new<R>(relation: &R, elements: impl IntoIterator<Item = T>) -> Result<Self>
    where
        R: Relation<Element = T>,
    {
        let members: BTreeSet<T> = elements.into_iter().collect();
        if let Some(x) = members.iter().find(|x| !relation.contains(x)) {
            return Err(ZornError::OutsideCarrier { element: format!("{x:?}") });
        }
        if let Some((a, b)) = find_incomparable(relation, &members) {
            return Err(ZornError::NotAChain {
                left: format!("{a:?}"),
                right: format!("{b:?}"),
            });
        }
        Ok(Chain { members })
    }

    /// `members` must be pairwise comparable.
    pub(crate) fn from_set_unchecked(members: BTreeSet<T>) -> Self {
        Chain { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, x: &T) -> bool {
        self.members.contains(x)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.members.iter()
    }

    pub fn as_set(&self) -> &BTreeSet<T> {
        &self.members
    }

    pub fn into_set(self) -> BTreeSet<T> {
        self.members
    }

    /// Whether `x` is a new carrier element comparable with every member, i.e.
    /// whether `self ∪ {x}` is a strictly larger chain.
    pub fn accepts<R>(&self, relation: &R, x: &T) -> bool
    where
        R: Relation<Element = T>,
    {
        relation.contains(x)
            && !self.contains(x)
            && self.members.iter().all(|m| comparable(relation, m, x))
    }

    /// The chain `self ∪ {x}`.
    pub fn with<R>(&self, relation: &R, x: T) -> Result<Self>
    where
        R: Relation<Element = T>,
    {
        if !relation.contains(&x) {
            return Err(ZornError::OutsideCarrier { element: format!("{x:?}") });
        }
        if let Some(m) = self.members.iter().find(|m| !comparable(relation, m, &x)) {
            return Err(ZornError::NotAChain {
                left: format!("{m:?}"),
                right: format!("{x:?}"),
            });
        }
        let mut members = self.members.clone();
        members.insert(x);
        Ok(Chain { members })
    }

    /// The union of `chains`. The union of chains is not a chain in general,
    /// so the result is checked against `relation`.
    pub fn union_of<'a, R, I>(relation: &R, chains: I) -> Result<Self>
    where
        R: Relation<Element = T>,
        T: 'a,
        I: IntoIterator<Item = &'a Chain<T>>,
    {
        let members = union_set(chains);
        if let Some((a, b)) = find_incomparable(relation, &members) {
            return Err(ZornError::NotAChain {
                left: format!("{a:?}"),
                right: format!("{b:?}"),
            });
        }
        Ok(Chain { members })
    }

    /// Keep only the members satisfying `keep`. A subset of a chain is a
    /// chain, so nothing needs to be rechecked.
    #[must_use]
    pub fn restrict(&self, mut keep: impl FnMut(&T) -> bool) -> Self {
        Chain { members: self.members.iter().filter(|x| keep(x)).cloned().collect() }
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.members.is_subset(&other.members)
    }

    pub fn is_strict_subset(&self, other: &Self) -> bool {
        self.len() < other.len() && self.is_subset(other)
    }

    /// `other ⊏ self`: `self` strictly contains `other`.
    pub fn is_superchain_of(&self, other: &Self) -> bool {
        other.is_strict_subset(self)
    }

    /// Inclusion as a partial order on chains.
    pub fn comparable_by_inclusion(&self, other: &Self) -> bool {
        self.is_subset(other) || other.is_subset(self)
    }

    pub(crate) fn describe(&self) -> String {
        format!("{:?}", self.members)
    }
}

pub(crate) fn union_set<'a, T, I>(chains: I) -> BTreeSet<T>
where
    T: Clone + Ord + 'a,
    I: IntoIterator<Item = &'a Chain<T>>,
{
    chains.into_iter().flat_map(|c| c.members.iter().cloned()).collect()
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
