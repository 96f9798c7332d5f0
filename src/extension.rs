//! Extending a partial order to a total order with Zorn's lemma.
//!
//! The poset searched is [`Extensions`]: every partial order on the same
//! elements that contains a fixed base order, ordered by inclusion. Chains of
//! such orders are bounded by their pointwise union, and a maximal extension
//! is total. If `x` and `y` were incomparable, forcing `x ≤ y` would give a
//! strictly larger extension.

use orders::{Order, PartialOrder, TotalOrder};
use rand::{seq::IndexedRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use crate::{
    chain::Chain,
    config::ClosureConfig,
    error::Result,
    relation::Relation,
    successor::Strategy,
    zorn::maximal_element,
};

/// Partial orders extending `base`, ordered by pointwise inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    base: PartialOrder,
}

impl Extensions {
    pub fn new(base: PartialOrder) -> Self {
        Extensions { base }
    }

    pub fn base(&self) -> &PartialOrder {
        &self.base
    }

}

impl Relation for Extensions {
    type Element = PartialOrder;

    fn related(&self, a: &PartialOrder, b: &PartialOrder) -> bool {
        a.is_subrelation_of(b)
    }

    fn contains(&self, x: &PartialOrder) -> bool {
        self.base.is_subrelation_of(x)
    }
}

/// The pointwise union of a chain of extensions, which is the base order for
/// the empty chain.
///
/// The union is transitive because any two members are nested: `a ≤ b` from
/// one member and `b ≤ c` from another both hold in the larger of the two.
pub fn chain_union(extensions: &Extensions, chain: &Chain<PartialOrder>) -> Option<PartialOrder> {
    let base = extensions.base();
    PartialOrder::union(base.elements(), chain.iter().chain([base])).ok()
}

/// A successor strategy for [`Extensions`] that finds a strict superchain
/// whenever one exists.
///
/// A chain of extensions, sorted by size, can grow in three places:
/// - below its least member, if that isn't the base order,
/// - between two consecutive members differing in more than one pair, by
///   adding one of those pairs to the smaller member and closing it,
/// - above its greatest member, if that isn't total, by forcing an
///   incomparable pair.
///
/// Between `lo ⊂ hi`, if the closure of `lo` with any single pair of
/// `hi \ lo` were all of `hi`, every pair `(x, y)` of `hi \ lo` would satisfy
/// `x ≤ a` and `b ≤ y` in `lo` for every other such pair `(a, b)`, so by
/// antisymmetry `hi \ lo` would have only one pair.
#[derive(Debug, Clone)]
pub struct ExtensionStrategy {
    rng: Option<ChaCha8Rng>,
}

impl ExtensionStrategy {
    /// Always take the first option found, scanning pairs in index order.
    pub fn first() -> Self {
        ExtensionStrategy { rng: None }
    }

    /// Choose uniformly among every option, reproducibly for a given seed.
    pub fn seeded(seed: u64) -> Self {
        ExtensionStrategy { rng: Some(ChaCha8Rng::seed_from_u64(seed)) }
    }

    fn options(&self, extensions: &Extensions, chain: &Chain<PartialOrder>) -> Vec<PartialOrder> {
        let exhaustive = self.rng.is_some();
        let base = extensions.base();
        // Members with their number of pairs, smallest first.
        let mut sorted: Vec<(usize, &PartialOrder)> = chain.iter().map(|s| (s.pairs(), s)).collect();
        sorted.sort_unstable_by_key(|&(pairs, _)| pairs);

        let mut out = Vec::new();
        match sorted.first() {
            None => return vec![base.clone()],
            Some(&(_, least)) if least != base => {
                out.push(base.clone());
                if !exhaustive {
                    return out;
                }
            }
            Some(_) => {}
        }

        for w in sorted.windows(2) {
            let ((lo_pairs, lo), (hi_pairs, hi)) = (w[0], w[1]);
            if hi_pairs - lo_pairs < 2 {
                continue;
            }
            if exhaustive {
                out.extend(refinements(lo, hi));
            } else if let Some(t) = refinements(lo, hi).next() {
                return vec![t];
            }
        }

        if let Some(&(_, top)) = sorted.last() {
            for (x, y) in top.incomparable_pairs() {
                out.push(top.with(x, y));
                if !exhaustive {
                    return out;
                }
                out.push(top.with(y, x));
            }
        }
        out
    }
}

// Orders strictly between `lo` and `hi`, obtained by adding one pair of `hi`
// to `lo`.
fn refinements<'a>(lo: &'a PartialOrder, hi: &'a PartialOrder) -> impl Iterator<Item = PartialOrder> + 'a {
    let n = lo.elements();
    (0..n)
        .flat_map(move |a| (0..n).map(move |b| (a, b)))
        .filter(move |&(a, b)| a != b && hi.le(a, b) && !lo.le(a, b))
        .map(move |(a, b)| lo.with(a, b))
        .filter(move |t| t != hi)
}

impl Strategy<Extensions> for ExtensionStrategy {
    fn extend(&mut self, extensions: &Extensions, chain: &Chain<PartialOrder>) -> Option<Chain<PartialOrder>> {
        let options = self.options(extensions, chain);
        let pick = match self.rng.as_mut() {
            Some(rng) => options.choose(rng)?.clone(),
            None => options.into_iter().next()?,
        };
        let mut members = chain.as_set().clone();
        members.insert(pick);
        Some(Chain::from_set_unchecked(members))
    }
}

/// A total order extending a partial order, with the saturated chain of
/// extensions leading to it.
#[derive(Debug, Clone)]
pub struct LinearExtension {
    pub order: TotalOrder,
    pub chain: Chain<PartialOrder>,
}

/// Extend `r` to a total order.
pub fn extend_to_linear_order(r: &PartialOrder) -> Result<TotalOrder> {
    extend_to_linear_order_with(r, ExtensionStrategy::first(), &ClosureConfig::default())
}

pub fn extend_to_linear_order_with(
    r: &PartialOrder,
    strategy: ExtensionStrategy,
    config: &ClosureConfig,
) -> Result<TotalOrder> {
    Ok(linear_extension(r, strategy, config)?.order)
}

/// Extend a relation given as a matrix, where `order[a + elements * b]` is
/// `true` if `a ≤ b`. Fails unless the relation is a partial order.
pub fn extend_relation(order: Vec<bool>, elements: usize) -> Result<TotalOrder> {
    let r = PartialOrder::try_new(order, elements)?;
    extend_to_linear_order(&r)
}

pub fn linear_extension(
    r: &PartialOrder,
    strategy: ExtensionStrategy,
    config: &ClosureConfig,
) -> Result<LinearExtension> {
    let extensions = Extensions::new(r.clone());
    let maximal = maximal_element(
        &extensions,
        strategy,
        |chain: &Chain<PartialOrder>| chain_union(&extensions, chain),
        Chain::empty(),
        config,
    )?;
    let mut s = maximal.element;
    // A maximal extension is already total, this never runs.
    while let Some((x, y)) = s.first_incomparable() {
        warn!(x, y, "maximal extension is not total, forcing pair");
        s = s.with(x, y);
    }
    let Some(order) = TotalOrder::from_partial(&s) else {
        unreachable!("every pair was made comparable");
    };
    debug!(elements = r.elements(), chain = maximal.chain.len(), "linear extension");
    Ok(LinearExtension { order, chain: maximal.chain })
}

/// Every `a ≤ b` in `r` also holds in `t`.
pub fn is_extension(r: &PartialOrder, t: &TotalOrder) -> bool {
    let n = r.elements();
    if n != t.elements() {
        return false;
    }
    let pos = t.positions();
    (0..n).all(|a| (0..n).all(|b| !r.le(a, b) || pos[a] <= pos[b]))
}
