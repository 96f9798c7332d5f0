use std::ops::{Index, IndexMut};

use super::Violation;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub(crate) struct MatrixBool {
    pub(crate) dim: usize,
    pub(crate) elements: Vec<bool>,
}

impl Clone for MatrixBool {
    fn clone(&self) -> Self {
        Self { dim: self.dim, elements: self.elements.clone() }
    }

    fn clone_from(&mut self, source: &Self) {
        self.dim = source.dim;
        self.elements.clone_from(&source.elements);
    }
}

impl MatrixBool {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim, elements: vec![false; dim * dim] }
    }

    #[must_use]
    pub fn identity(dim: usize) -> Self {
        let mut matrix = MatrixBool::new(dim);
        for i in 0..dim {
            matrix[(i, i)] = true;
        }
        matrix
    }

    pub fn from_vec(elements: Vec<bool>, dim: usize) -> Result<Self, Violation> {
        if dim * dim != elements.len() {
            return Err(Violation::Dimension { elements: dim, len: elements.len() });
        }
        Ok(Self { elements, dim })
    }

    /// Number of set entries, the diagonal included.
    pub fn count(&self) -> usize {
        self.elements.iter().filter(|&&b| b).count()
    }

    /// Every entry set in `self` is also set in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.dim == other.dim && self.elements.iter().zip(&other.elements).all(|(&a, &b)| !a || b)
    }

    pub fn or_mut(&mut self, other: &Self) {
        debug_assert!(self.dim == other.dim);
        for (a, &b) in self.elements.iter_mut().zip(&other.elements) {
            *a |= b;
        }
    }

    /// Close the relation transitively.
    pub fn close(&mut self) {
        // Warshall, with `k` as the intermediate element.
        for k in 0..self.dim {
            for i in 0..self.dim {
                if !self[(i, k)] {
                    continue;
                }
                for j in 0..self.dim {
                    if self[(k, j)] {
                        self[(i, j)] = true;
                    }
                }
            }
        }
    }

    /// The first reason this matrix is not a partial order, if any.
    pub fn violation(&self) -> Option<Violation> {
        for a in 0..self.dim {
            if !self[(a, a)] {
                return Some(Violation::Reflexive(a));
            }
        }
        for a in 0..self.dim {
            for b in (a + 1)..self.dim {
                if self[(a, b)] && self[(b, a)] {
                    return Some(Violation::Antisymmetric(a, b));
                }
            }
        }
        for a in 0..self.dim {
            for b in 0..self.dim {
                if a == b || !self[(a, b)] {
                    continue;
                }
                for c in 0..self.dim {
                    if self[(b, c)] && !self[(a, c)] {
                        return Some(Violation::Transitive(a, b, c));
                    }
                }
            }
        }
        None
    }

    // Remove has to be sorted
    #[must_use]
    pub fn remove_rows_set(&self, remove: &[usize]) -> Self {
        debug_assert!(remove.is_sorted());
        debug_assert!(is_subset(self.dim, remove));
        let mut skipped = vec![false; self.dim];
        for &i in remove {
            skipped[i] = true;
        }
        let map: Vec<usize> = (0..self.dim).filter(|&i| !skipped[i]).collect();
        let j = map.len();
        let mut new_matrix = MatrixBool::new(j);
        for y in 0..j {
            for x in 0..j {
                new_matrix[(x, y)] = self[(map[x], map[y])];
            }
        }

        new_matrix
    }
}

fn is_subset(max: usize, sorted_set: &[usize]) -> bool {
    if sorted_set.is_empty() {
        return true;
    }
    if max <= sorted_set[0] {
        return false;
    }
    for i in 1..sorted_set.len() {
        if sorted_set[i] == sorted_set[i - 1] || max <= sorted_set[i] {
            return false;
        }
    }
    true
}

impl Index<(usize, usize)> for MatrixBool {
    type Output = bool;

    fn index(&self, i: (usize, usize)) -> &Self::Output {
        &self.elements[i.0 + self.dim * i.1]
    }
}

impl IndexMut<(usize, usize)> for MatrixBool {
    fn index_mut(&mut self, i: (usize, usize)) -> &mut Self::Output {
        &mut self.elements[i.0 + self.dim * i.1]
    }
}
