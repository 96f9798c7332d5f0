//! Errors surfaced by the chain and maximal-element machinery.
//!
//! Every operation is total on inputs meeting its preconditions, so each
//! variant names a violated precondition rather than a transient failure.

use orders::Violation;

/// Precondition failures of chain construction, Zorn and order extension.
///
/// Elements are rendered with their `Debug` representation so the error type
/// doesn't depend on the element type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZornError {
    /// There is nothing to be maximal: the carrier has no elements.
    #[error("empty carrier: no maximal element exists")]
    EmptyCarrier,

    /// The upper bound oracle found nothing above a chain.
    #[error("chain {chain} has no upper bound")]
    UnboundedChain { chain: String },

    /// The upper bound oracle returned an element that isn't above the chain.
    #[error("{candidate} is not an upper bound of chain {chain}")]
    NotAnUpperBound { candidate: String, chain: String },

    /// Two elements of a would-be chain are incomparable.
    #[error("not a chain: {left} and {right} are incomparable")]
    NotAChain { left: String, right: String },

    /// A successor strategy proposed something other than a strict superchain.
    #[error("invalid successor of {chain}: {reason}")]
    InvalidSuccessor { chain: String, reason: String },

    /// An element outside the carrier of the relation.
    #[error("{element} is not in the carrier")]
    OutsideCarrier { element: String },

    /// Two members of a closure family are incomparable by inclusion.
    #[error("closure family is not totally ordered: {left} and {right} are incomparable")]
    ClosureNotTotal { left: String, right: String },

    /// The closure family stopped without a member that is its own successor
    /// and equal to the union of the family.
    #[error("closure family has no successor fixpoint equal to its union")]
    MissingFixpoint,

    /// The worklist kept producing new chains. Expected for infinite carriers.
    #[error("no fixpoint reached within {limit} steps")]
    StepLimit { limit: usize },

    #[error("relation is not a partial order: {0}")]
    NotPartialOrder(#[from] Violation),
}

pub type Result<T, E = ZornError> = std::result::Result<T, E>;
