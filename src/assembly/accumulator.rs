use crate::error::Error;
use log::warn;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::pattern::SparsityPattern;
use nalgebra_sparse::{CscMatrix, CsrMatrix};
use std::collections::BTreeSet;

/// Receives matrix and right-hand-side contributions during assembly.
pub trait SystemAccumulator {
    fn add_to_matrix(&mut self, row: usize, col: usize, value: f64);

    fn add_to_rhs(&mut self, row: usize, value: f64);
}

/// Receives the matrix coordinates that assembly will write to.
pub trait PatternAccumulator {
    fn insert_in_sparsity_pattern(&mut self, row: usize, col: usize);
}

impl PatternAccumulator for BTreeSet<(usize, usize)> {
    fn insert_in_sparsity_pattern(&mut self, row: usize, col: usize) {
        self.insert((row, col));
    }
}

/// Collects matrix coordinates of a square system and turns them into a CSR sparsity pattern.
#[derive(Debug, Clone)]
pub struct SparsityPatternBuilder {
    size: usize,
    entries: BTreeSet<(usize, usize)>,
}

impl SparsityPatternBuilder {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            entries: BTreeSet::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn entries(&self) -> &BTreeSet<(usize, usize)> {
        &self.entries
    }

    pub fn build(&self) -> SparsityPattern {
        let mut offsets = vec![0; self.size + 1];
        for &(row, _) in &self.entries {
            offsets[row + 1] += 1;
        }
        for i in 0..self.size {
            offsets[i + 1] += offsets[i];
        }
        let indices = self.entries.iter().map(|&(_, col)| col).collect();
        SparsityPattern::try_from_offsets_and_indices(self.size, self.size, offsets, indices)
            .expect("Internal error: sorted, in-bounds entries must form a valid pattern")
    }
}

impl PatternAccumulator for SparsityPatternBuilder {
    fn insert_in_sparsity_pattern(&mut self, row: usize, col: usize) {
        assert!(
            row < self.size && col < self.size,
            "entry ({}, {}) is out of bounds for a system of size {}",
            row,
            col,
            self.size
        );
        self.entries.insert((row, col));
    }
}

/// A square CSR system with a fixed sparsity pattern.
#[derive(Debug, Clone)]
pub struct SparseLinearSystem {
    matrix: CsrMatrix<f64>,
    rhs: DVector<f64>,
}

impl SparseLinearSystem {
    /// A zero system with the given pattern.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is not square.
    pub fn from_pattern(pattern: SparsityPattern) -> Self {
        assert_eq!(pattern.major_dim(), pattern.minor_dim(), "pattern must be square");
        let size = pattern.major_dim();
        let nnz = pattern.nnz();
        let matrix = CsrMatrix::try_from_pattern_and_values(pattern, vec![0.0; nnz])
            .expect("Internal error: value count matches pattern");
        Self {
            matrix,
            rhs: DVector::zeros(size),
        }
    }

    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    pub fn matrix(&self) -> &CsrMatrix<f64> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// Resets all values to zero, keeping the pattern.
    pub fn fill_zero(&mut self) {
        self.matrix.values_mut().fill(0.0);
        self.rhs.fill(0.0);
    }

    /// Solves the system with a sparse Cholesky factorization.
    pub fn solve(&self) -> Result<DVector<f64>, Error> {
        if self.size() == 0 {
            warn!("Solving a linear system without free dofs");
            return Ok(DVector::zeros(0));
        }
        let cholesky = CscCholesky::factor(&CscMatrix::from(&self.matrix))
            .map_err(|err| Error::SolveFailed(format!("{}", err)))?;
        let solution = cholesky.solve(&self.rhs);
        Ok(DVector::from_column_slice(solution.as_slice()))
    }
}

impl SystemAccumulator for SparseLinearSystem {
    /// # Panics
    ///
    /// Panics if the entry is not part of the sparsity pattern.
    fn add_to_matrix(&mut self, row: usize, col: usize, value: f64) {
        let mut csr_row = self.matrix.row_mut(row);
        let (cols, values) = csr_row.cols_and_values_mut();
        match cols.binary_search(&col) {
            Ok(idx) => values[idx] += value,
            Err(_) => panic!("entry ({}, {}) is not part of the sparsity pattern", row, col),
        }
    }

    fn add_to_rhs(&mut self, row: usize, value: f64) {
        self.rhs[row] += value;
    }
}

/// A dense square system that also records which matrix entries were written.
#[derive(Debug, Clone)]
pub struct DenseLinearSystem {
    matrix: DMatrix<f64>,
    rhs: DVector<f64>,
    written: BTreeSet<(usize, usize)>,
}

impl DenseLinearSystem {
    pub fn new(size: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
            written: BTreeSet::new(),
        }
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// Coordinates of all matrix entries that received a contribution.
    pub fn written_entries(&self) -> &BTreeSet<(usize, usize)> {
        &self.written
    }

    pub fn fill_zero(&mut self) {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);
    }

    pub fn solve(&self) -> Result<DVector<f64>, Error> {
        self.matrix
            .clone()
            .lu()
            .solve(&self.rhs)
            .ok_or_else(|| Error::SolveFailed(String::from("matrix is singular")))
    }
}

impl SystemAccumulator for DenseLinearSystem {
    fn add_to_matrix(&mut self, row: usize, col: usize, value: f64) {
        self.matrix[(row, col)] += value;
        self.written.insert((row, col));
    }

    fn add_to_rhs(&mut self, row: usize, value: f64) {
        self.rhs[row] += value;
    }
}

/// Contributions of a single element, recorded for later replay into a global accumulator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementContribution {
    matrix: Vec<(usize, usize, f64)>,
    rhs: Vec<(usize, f64)>,
}

impl ElementContribution {
    /// Adds the recorded contributions to `target` in the order they were recorded.
    pub fn replay<A: SystemAccumulator + ?Sized>(&self, target: &mut A) {
        for &(row, col, value) in &self.matrix {
            target.add_to_matrix(row, col, value);
        }
        for &(row, value) in &self.rhs {
            target.add_to_rhs(row, value);
        }
    }
}

impl SystemAccumulator for ElementContribution {
    fn add_to_matrix(&mut self, row: usize, col: usize, value: f64) {
        self.matrix.push((row, col, value));
    }

    fn add_to_rhs(&mut self, row: usize, value: f64) {
        self.rhs.push((row, value));
    }
}
