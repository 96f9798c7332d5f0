//! Zorn's lemma: if every chain has an upper bound, a maximal element exists.
//!
//! The maximal element is an upper bound of a maximal chain. If something
//! were strictly above it, adding that element to the chain would give a
//! strictly larger chain, by transitivity through the bound. The relation is
//! therefore expected to be a preorder.

use tracing::debug;

use crate::{
    chain::Chain,
    config::ClosureConfig,
    error::{Result, ZornError},
    maximal::maximal_chain_containing,
    relation::{Carrier, Relation},
    successor::Strategy,
};

/// A maximal element together with the maximal chain it bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maximal<T> {
    pub element: T,
    pub chain: Chain<T>,
}

/// Find a maximal element of `relation`, given a way to bound chains.
///
/// `upper_bound` has to return an element `R`-above every member of the chain
/// it's given, for every chain. Returning `None` for the empty chain means
/// the carrier is empty.
pub fn find_maximal<R, S, U>(
    relation: &R,
    strategy: S,
    upper_bound: U,
    config: &ClosureConfig,
) -> Result<R::Element>
where
    R: Relation,
    S: Strategy<R>,
    U: FnOnce(&Chain<R::Element>) -> Option<R::Element>,
{
    maximal_element(relation, strategy, upper_bound, Chain::empty(), config).map(|m| m.element)
}

/// Find a maximal element `m` with `R a m`.
pub fn find_maximal_above<R, S, U>(
    relation: &R,
    strategy: S,
    upper_bound: U,
    a: R::Element,
    config: &ClosureConfig,
) -> Result<R::Element>
where
    R: Relation,
    S: Strategy<R>,
    U: FnOnce(&Chain<R::Element>) -> Option<R::Element>,
{
    let seed = Chain::new(relation, [a])?;
    maximal_element(relation, strategy, upper_bound, seed, config).map(|m| m.element)
}

/// Bound a maximal chain containing `seed`.
///
/// `EmptyCarrier` takes the bound function at its word: if it has no witness
/// for the empty chain, the carrier is assumed empty. [`carrier_upper_bound`]
/// searches the carrier itself, so with it the error is only reported for
/// empty carriers, even when the strategy never extends the empty chain.
pub fn maximal_element<R, S, U>(
    relation: &R,
    strategy: S,
    upper_bound: U,
    seed: Chain<R::Element>,
    config: &ClosureConfig,
) -> Result<Maximal<R::Element>>
where
    R: Relation,
    S: Strategy<R>,
    U: FnOnce(&Chain<R::Element>) -> Option<R::Element>,
{
    let chain = maximal_chain_containing(relation, strategy, seed, config)?;
    let element = match upper_bound(&chain) {
        Some(m) => m,
        None if chain.is_empty() => return Err(ZornError::EmptyCarrier),
        None => return Err(ZornError::UnboundedChain { chain: chain.describe() }),
    };
    if !relation.contains(&element) {
        return Err(ZornError::OutsideCarrier { element: format!("{element:?}") });
    }
    if chain.iter().any(|c| c != &element && !relation.related(c, &element)) {
        return Err(ZornError::NotAnUpperBound {
            candidate: format!("{element:?}"),
            chain: chain.describe(),
        });
    }
    debug!(chain = chain.len(), element = ?element, "maximal element");
    Ok(Maximal { element, chain })
}

/// Nothing is strictly above `m`: `R m a` implies `R a m` for every `a`.
pub fn is_maximal_element<R: Carrier>(relation: &R, m: &R::Element) -> bool {
    relation.carrier().iter().all(|a| !relation.related(m, a) || relation.related(a, m))
}

/// Search the carrier for an upper bound of a chain, returning the first one.
pub fn carrier_upper_bound<R: Carrier>(
    relation: &R,
) -> impl Fn(&Chain<R::Element>) -> Option<R::Element> + '_ {
    move |chain| {
        relation
            .carrier()
            .into_iter()
            .find(|x| chain.iter().all(|c| c == x || relation.related(c, x)))
    }
}
