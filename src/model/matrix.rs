//! Pairwise together-count matrix.

/// Symmetric `N×N` matrix counting the games each pair of players shared.
///
/// Only the pair operations are exposed, so the matrix stays symmetric by
/// construction. The diagonal is never written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TogetherMatrix {
    n: usize,
    cells: Vec<u32>,
}

impl TogetherMatrix {
    /// Creates an all-zero matrix for `n` players.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![0; n * n],
        }
    }

    /// Number of players.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Games shared by players `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.n + j]
    }

    /// Row `i`: games player `i` shared with every other player.
    pub fn row(&self, i: usize) -> &[u32] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    pub(crate) fn increment_pair(&mut self, i: usize, j: usize) {
        self.cells[i * self.n + j] += 1;
        self.cells[j * self.n + i] += 1;
    }

    pub(crate) fn decrement_pair(&mut self, i: usize, j: usize) {
        self.cells[i * self.n + j] -= 1;
        self.cells[j * self.n + i] -= 1;
    }

    /// Unordered pairs `(i, j)` with `i < j`, in index order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        (0..self.n).flat_map(move |i| ((i + 1)..self.n).map(move |j| (i, j, self.get(i, j))))
    }

    /// Number of off-diagonal cells that are non-zero (both halves).
    pub fn nonzero_entries(&self) -> usize {
        (0..self.n)
            .flat_map(|i| (0..self.n).map(move |j| (i, j)))
            .filter(|&(i, j)| i != j && self.get(i, j) > 0)
            .count()
    }
}
