use std::cmp::Ordering;

use rand::{Rng, seq::SliceRandom};

use crate::{Order, partial_order::PartialOrder};

/// A linear order containing every element, stored lowest first.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TotalOrder {
    pub(crate) order: Vec<usize>,
}

impl Clone for TotalOrder {
    fn clone(&self) -> Self {
        Self { order: self.order.clone() }
    }

    fn clone_from(&mut self, source: &Self) {
        self.order.clone_from(&source.order);
    }
}

// Every value is less than `s.len()` and unique, i.e. the slice is a
// permutation of `0..s.len()`.
fn permutation_valid(s: &[usize]) -> bool {
    let mut seen = vec![false; s.len()];
    for &a in s {
        if a >= s.len() || seen[a] {
            return false;
        }
        seen[a] = true;
    }
    true
}

impl TotalOrder {
    /// # Panics
    ///
    /// Panics if `v` isn't a permutation of `0..v.len()`.
    pub fn new(v: Vec<usize>) -> Self {
        assert!(permutation_valid(&v));
        Self { order: v }
    }

    pub fn try_new(v: Vec<usize>) -> Option<Self> {
        if permutation_valid(&v) { Some(Self { order: v }) } else { None }
    }

    /// The order `0 < 1 < ... < n - 1`.
    pub fn new_default(n: usize) -> Self {
        TotalOrder { order: (0..n).collect() }
    }

    pub fn random<R: Rng>(rng: &mut R, elements: usize) -> Self {
        let mut order: Vec<usize> = (0..elements).collect();
        order.shuffle(rng);
        TotalOrder { order }
    }

    /// Read off the linear order of `po`, or `None` if `po` isn't total.
    pub fn from_partial(po: &PartialOrder) -> Option<Self> {
        if !po.is_total() {
            return None;
        }
        let mut order: Vec<usize> = (0..po.elements()).collect();
        order.sort_by(|&a, &b| po.ord(a, b).unwrap_or(Ordering::Equal));
        Some(TotalOrder { order })
    }

    /// Elements, lowest first.
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    pub fn into_inner(self) -> Vec<usize> {
        let Self { order } = self;
        order
    }

    /// Index of `a` in the order, `0` being the lowest.
    pub fn position(&self, a: usize) -> usize {
        assert!(a < self.order.len());
        self.positions()[a]
    }

    /// Returns true if and only if `a ≤ b`. Linear in the number of elements,
    /// use [`TotalOrder::positions`] to compare many pairs.
    pub fn le(&self, a: usize, b: usize) -> bool {
        assert!(a < self.order.len() && b < self.order.len());
        // Whichever of the two comes first is the lower one.
        self.order.iter().find(|&&x| x == a || x == b) == Some(&a)
    }

    /// `positions()[a]` is the index of `a` in the order.
    pub fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0; self.order.len()];
        for (i, &a) in self.order.iter().enumerate() {
            pos[a] = i;
        }
        pos
    }
}

impl Order for TotalOrder {
    fn elements(&self) -> usize {
        self.order.len()
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn to_partial(self) -> PartialOrder {
        let n = self.order.len();
        let pos = self.positions();
        let mut matrix = vec![false; n * n];
        for a in 0..n {
            for b in 0..n {
                matrix[a + n * b] = pos[a] <= pos[b];
            }
        }
        PartialOrder::from_raw(matrix, n)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::{Arbitrary, Gen};

    use super::*;
    use crate::tests::std_rng;

    impl Arbitrary for TotalOrder {
        fn arbitrary(g: &mut Gen) -> Self {
            let elements = <usize as Arbitrary>::arbitrary(g) % g.size();
            TotalOrder::random(&mut std_rng(g), elements)
        }
    }

    #[test]
    fn invalid_permutations() {
        assert!(TotalOrder::try_new(vec![0, 0]).is_none());
        assert!(TotalOrder::try_new(vec![2, 0]).is_none());
        assert!(TotalOrder::try_new(vec![1, 2, 0]).is_some());
        assert!(TotalOrder::try_new(Vec::new()).is_some());
    }

    #[test]
    fn positions() {
        let t = TotalOrder::new(vec![2, 0, 1]);
        assert_eq!(t.position(2), 0);
        assert_eq!(t.position(1), 2);
        assert!(t.le(2, 1));
        assert!(!t.le(1, 0));
    }

    #[quickcheck]
    fn le_matches_positions(t: TotalOrder) -> bool {
        let pos = t.positions();
        let n = t.elements();
        (0..n).all(|a| (0..n).all(|b| t.le(a, b) == (pos[a] <= pos[b])))
    }

    #[quickcheck]
    fn to_partial_is_total(t: TotalOrder) -> bool {
        let po = t.clone().to_partial();
        po.valid() && po.is_total() && po.pairs() == t.elements() * (t.elements() + 1) / 2
    }

    #[quickcheck]
    fn partial_round_trip(t: TotalOrder) -> bool {
        let po = t.clone().to_partial();
        TotalOrder::from_partial(&po) == Some(t)
    }

    #[test]
    fn from_non_total() {
        assert!(TotalOrder::from_partial(&PartialOrder::new_empty(2)).is_none());
        assert_eq!(
            TotalOrder::from_partial(&PartialOrder::new_empty(1)),
            Some(TotalOrder::new_default(1))
        );
    }
}
