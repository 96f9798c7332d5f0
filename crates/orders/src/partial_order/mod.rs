use std::{cmp::Ordering, error::Error, fmt};

use bool_matrix::MatrixBool;
use rand::{Rng, seq::SliceRandom};

use super::Order;

mod bool_matrix;

/// The reason a relation is not a partial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `a ≤ a` is missing.
    Reflexive(usize),
    /// `a ≤ b` and `b ≤ a` for distinct `a` and `b`.
    Antisymmetric(usize, usize),
    /// `a ≤ b` and `b ≤ c`, but not `a ≤ c`.
    Transitive(usize, usize, usize),
    /// The relation was given `len` values, which isn't `elements²`.
    Dimension { elements: usize, len: usize },
    /// Two relations over a different number of elements were combined.
    Elements { expected: usize, actual: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Violation::Reflexive(a) => write!(f, "{a} ≤ {a} does not hold"),
            Violation::Antisymmetric(a, b) => {
                write!(f, "{a} ≤ {b} and {b} ≤ {a} hold for distinct elements")
            }
            Violation::Transitive(a, b, c) => {
                write!(f, "{a} ≤ {b} and {b} ≤ {c} hold, but not {a} ≤ {c}")
            }
            Violation::Dimension { elements, len } => {
                write!(f, "{len} values can't describe a relation on {elements} elements")
            }
            Violation::Elements { expected, actual } => {
                write!(f, "expected a relation on {expected} elements, got {actual}")
            }
        }
    }
}

impl Error for Violation {}

/// A partial order on the elements `0..n`.
///
/// The derived `Ord` is lexicographic on the underlying matrix. It only exists
/// so orders can be stored in sorted collections, use
/// [`PartialOrder::is_subrelation_of`] to compare orders as relations.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartialOrder {
    // 2D matrix of length n*n, `matrix[(a, b)]` is `true` if a ≤ b
    matrix: MatrixBool,
}

impl Clone for PartialOrder {
    fn clone(&self) -> Self {
        Self { matrix: self.matrix.clone() }
    }

    fn clone_from(&mut self, source: &Self) {
        self.matrix.clone_from(&source.matrix);
    }
}

impl PartialOrder {
    pub(crate) fn valid(&self) -> bool {
        self.matrix.violation().is_none()
    }

    /// Create a partial order from a matrix where `order[a + elements * b]`
    /// is `true` if `a ≤ b`.
    ///
    /// # Panics
    ///
    /// Panics if `order` isn't a partial order, see [`PartialOrder::try_new`].
    pub fn new(order: Vec<bool>, elements: usize) -> Self {
        match Self::try_new(order, elements) {
            Ok(po) => po,
            Err(v) => panic!("not a partial order: {v}"),
        }
    }

    pub fn try_new(order: Vec<bool>, elements: usize) -> Result<Self, Violation> {
        let matrix = MatrixBool::from_vec(order, elements)?;
        match matrix.violation() {
            Some(v) => Err(v),
            None => Ok(Self { matrix }),
        }
    }

    /// Build the smallest partial order containing every pair `(a, b)`, read
    /// as `a ≤ b`.
    pub fn from_pairs(elements: usize, pairs: &[(usize, usize)]) -> Result<Self, Violation> {
        let mut manual = PartialOrderManual::new(elements);
        for &(a, b) in pairs {
            manual.set(a, b);
        }
        manual.finish()
    }

    /// The partial order where no two distinct elements are comparable.
    pub fn new_empty(n: usize) -> Self {
        Self { matrix: MatrixBool::identity(n) }
    }

    /// Generate a random partial order on `elements` elements. Every pair
    /// is related with probability `p` before the transitive closure is taken,
    /// so larger `p` gives orders closer to total.
    pub fn random<R: Rng>(rng: &mut R, elements: usize, p: f64) -> Self {
        let mut perm: Vec<usize> = (0..elements).collect();
        perm.shuffle(rng);
        let mut matrix = MatrixBool::identity(elements);
        for i in 0..elements {
            for j in (i + 1)..elements {
                if rng.random_bool(p) {
                    matrix[(perm[i], perm[j])] = true;
                }
            }
        }
        matrix.close();
        let out = Self { matrix };
        debug_assert!(out.valid());
        out
    }

    /// Returns true if and only if `a ≤ b`.
    #[must_use]
    pub fn le(&self, a: usize, b: usize) -> bool {
        assert!(a < self.elements() && b < self.elements());
        self.matrix[(a, b)]
    }

    /// Returns true if and only if `a < b`.
    #[must_use]
    pub fn lt(&self, a: usize, b: usize) -> bool {
        a != b && self.le(a, b)
    }

    #[must_use]
    pub fn comparable(&self, a: usize, b: usize) -> bool {
        self.le(a, b) || self.le(b, a)
    }

    pub fn ord(&self, i: usize, j: usize) -> Option<Ordering> {
        assert!(i < self.elements() && j < self.elements());
        if i == j {
            Some(Ordering::Equal)
        } else if self.le(i, j) {
            Some(Ordering::Less)
        } else if self.le(j, i) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }

    /// Number of related pairs `(a, b)`, including every `(a, a)`.
    pub fn pairs(&self) -> usize {
        self.matrix.count()
    }

    /// Returns a new order where `x ≤ y` holds, together with everything that
    /// follows by transitivity: `a ≤ b` whenever `a ≤ x` and `y ≤ b`.
    ///
    /// # Panics
    ///
    /// Panics if `y < x`, as the result would not be antisymmetric.
    #[must_use]
    pub fn with(&self, x: usize, y: usize) -> Self {
        assert!(!self.lt(y, x), "can't set {x} ≤ {y} when {y} < {x}");
        let mut out = self.clone();
        if self.le(x, y) {
            return out;
        }
        let n = self.elements();
        for a in (0..n).filter(|&a| self.le(a, x)) {
            for b in (0..n).filter(|&b| self.le(y, b)) {
                out.matrix[(a, b)] = true;
            }
        }
        debug_assert!(out.valid());
        out
    }

    /// Every pair of elements is comparable.
    pub fn is_total(&self) -> bool {
        self.first_incomparable().is_none()
    }

    /// Pairs `(a, b)` with `a < b` as indices, where neither `a ≤ b` nor
    /// `b ≤ a` holds.
    pub fn incomparable_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.elements();
        (0..n)
            .flat_map(move |a| ((a + 1)..n).map(move |b| (a, b)))
            .filter(|&(a, b)| !self.comparable(a, b))
    }

    pub fn first_incomparable(&self) -> Option<(usize, usize)> {
        self.incomparable_pairs().next()
    }

    /// Every `a ≤ b` in `self` also holds in `other`. Orders on a different
    /// number of elements are never subrelations of each other.
    pub fn is_subrelation_of(&self, other: &Self) -> bool {
        self.matrix.is_subset(&other.matrix)
    }

    /// The pointwise union of `orders`, or the discrete order if `orders` is
    /// empty. The union of arbitrary partial orders needn't be one, so the
    /// result is checked.
    pub fn union<'a, I>(elements: usize, orders: I) -> Result<Self, Violation>
    where
        I: IntoIterator<Item = &'a PartialOrder>,
    {
        let mut matrix = MatrixBool::identity(elements);
        for po in orders {
            if po.elements() != elements {
                return Err(Violation::Elements { expected: elements, actual: po.elements() });
            }
            matrix.or_mut(&po.matrix);
        }
        match matrix.violation() {
            Some(v) => Err(v),
            None => Ok(Self { matrix }),
        }
    }

    /// Remove the elements in `x`, which has to be sorted, renumbering the
    /// rest.
    pub fn remove_subset(&mut self, x: &[usize]) {
        self.matrix = self.matrix.remove_rows_set(x);
    }

    /// `order` must be a valid partial order.
    pub(crate) fn from_raw(order: Vec<bool>, elements: usize) -> Self {
        debug_assert!(order.len() == elements * elements);
        let out = Self { matrix: MatrixBool { dim: elements, elements: order } };
        debug_assert!(out.valid());
        out
    }
}

impl Order for PartialOrder {
    fn elements(&self) -> usize {
        self.matrix.dim
    }

    fn len(&self) -> usize {
        self.matrix.dim
    }

    fn to_partial(self) -> PartialOrder {
        self
    }
}

/// Like `PartialOrder` but transitive relations may not be set. Finish it with
/// [`PartialOrderManual::finish`] to take the transitive closure.
#[derive(Debug, Clone)]
pub struct PartialOrderManual {
    matrix: MatrixBool,
}

impl PartialOrderManual {
    pub fn elements(&self) -> usize {
        self.matrix.dim
    }

    pub fn new(n: usize) -> Self {
        Self { matrix: MatrixBool::identity(n) }
    }

    /// Set only `i ≤ j`, without setting transitive relations.
    pub fn set(&mut self, i: usize, j: usize) {
        assert!(i < self.elements() && j < self.elements());
        self.matrix[(i, j)] = true;
    }

    pub fn set_ord(&mut self, i: usize, j: usize, o: Ordering) {
        match o {
            Ordering::Less => self.set(i, j),
            Ordering::Equal => assert!(i == j, "distinct elements can't be equal"),
            Ordering::Greater => self.set(j, i),
        }
    }

    /// Take the transitive closure. Fails if the pairs set so far form a
    /// cycle.
    pub fn finish(mut self) -> Result<PartialOrder, Violation> {
        self.matrix.close();
        match self.matrix.violation() {
            Some(v) => Err(v),
            None => Ok(PartialOrder { matrix: self.matrix }),
        }
    }
}
