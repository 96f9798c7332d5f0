//! Relations as first-class values.
//!
//! A [`Relation`] decides `R a b` for elements of its carrier. Relations whose
//! carrier can be listed implement [`Carrier`], which the exhaustive
//! strategies and checks need.

use std::{collections::BTreeSet, fmt::Debug};

use orders::{Order, PartialOrder};

use crate::chain::Chain;

pub trait Relation {
    /// Elements of the carrier. `Ord` is only used for storage and
    /// tie-breaking, it need not agree with the relation.
    type Element: Clone + Ord + Debug;

    /// Returns true if and only if `R a b`.
    fn related(&self, a: &Self::Element, b: &Self::Element) -> bool;

    /// Whether `x` belongs to the carrier.
    fn contains(&self, _x: &Self::Element) -> bool {
        true
    }
}

/// A relation with a finite, listable carrier.
pub trait Carrier: Relation {
    /// Every element of the carrier, in a fixed order.
    fn carrier(&self) -> Vec<Self::Element>;
}

impl<R: Relation + ?Sized> Relation for &R {
    type Element = R::Element;

    fn related(&self, a: &Self::Element, b: &Self::Element) -> bool {
        (**self).related(a, b)
    }

    fn contains(&self, x: &Self::Element) -> bool {
        (**self).contains(x)
    }
}

impl<R: Carrier + ?Sized> Carrier for &R {
    fn carrier(&self) -> Vec<Self::Element> {
        (**self).carrier()
    }
}

impl Relation for PartialOrder {
    type Element = usize;

    fn related(&self, a: &usize, b: &usize) -> bool {
        self.le(*a, *b)
    }

    fn contains(&self, x: &usize) -> bool {
        *x < self.elements()
    }
}

impl Carrier for PartialOrder {
    fn carrier(&self) -> Vec<usize> {
        (0..self.elements()).collect()
    }
}

/// An explicitly listed carrier together with a predicate deciding the
/// relation.
#[derive(Clone)]
pub struct FiniteRelation<T, F> {
    carrier: Vec<T>,
    related: F,
}

impl<T, F> FiniteRelation<T, F>
where
    T: Clone + Ord + Debug,
    F: Fn(&T, &T) -> bool,
{
    /// Duplicates in `carrier` are dropped, keeping the first occurrence.
    pub fn new(carrier: impl IntoIterator<Item = T>, related: F) -> Self {
        let mut seen = BTreeSet::new();
        let carrier = carrier.into_iter().filter(|x| seen.insert(x.clone())).collect();
        FiniteRelation { carrier, related }
    }
}

impl<T, F> Relation for FiniteRelation<T, F>
where
    T: Clone + Ord + Debug,
    F: Fn(&T, &T) -> bool,
{
    type Element = T;

    fn related(&self, a: &T, b: &T) -> bool {
        (self.related)(a, b)
    }

    fn contains(&self, x: &T) -> bool {
        self.carrier.contains(x)
    }
}

impl<T, F> Carrier for FiniteRelation<T, F>
where
    T: Clone + Ord + Debug,
    F: Fn(&T, &T) -> bool,
{
    fn carrier(&self) -> Vec<T> {
        self.carrier.clone()
    }
}

/// A finite family of sets, ordered by inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion<T> {
    sets: Vec<BTreeSet<T>>,
}

impl<T: Clone + Ord + Debug> Inclusion<T> {
    pub fn new(sets: impl IntoIterator<Item = BTreeSet<T>>) -> Self {
        let mut sets: Vec<BTreeSet<T>> = sets.into_iter().collect();
        sets.sort();
        sets.dedup();
        Inclusion { sets }
    }

    pub fn sets(&self) -> &[BTreeSet<T>] {
        &self.sets
    }

    /// The union of every set in `chain`, if the family contains it. When the
    /// family is closed under unions of chains this is always `Some`, which is
    /// the hypothesis of Zorn's lemma for families of sets.
    pub fn union_bound(&self, chain: &Chain<BTreeSet<T>>) -> Option<BTreeSet<T>> {
        let union: BTreeSet<T> = chain.iter().flat_map(|s| s.iter().cloned()).collect();
        self.contains(&union).then_some(union)
    }
}

impl<T: Clone + Ord + Debug> Relation for Inclusion<T> {
    type Element = BTreeSet<T>;

    fn related(&self, a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
        a.is_subset(b)
    }

    fn contains(&self, x: &BTreeSet<T>) -> bool {
        self.sets.binary_search(x).is_ok()
    }
}

impl<T: Clone + Ord + Debug> Carrier for Inclusion<T> {
    fn carrier(&self) -> Vec<BTreeSet<T>> {
        self.sets.clone()
    }
}
