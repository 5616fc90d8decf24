use super::accumulator::{ElementContribution, PatternAccumulator, SystemAccumulator};
use super::formulation::Formulation;
use crate::dof_manager::{DofManager, DofStatus};
use crate::error::Error;
use crate::space::{FunctionSpace, GroupOfDof};
use log::debug;
use rayon::prelude::*;

/// Accumulates element contributions into a global system, eliminating fixed dofs.
///
/// Rows of fixed test dofs are skipped entirely. Columns of fixed trial dofs are moved to the
/// right-hand side, weighted by the prescribed value.
#[derive(Debug, Copy, Clone)]
pub struct SystemAssembler<'a> {
    dof_manager: &'a DofManager,
}

impl<'a> SystemAssembler<'a> {
    /// The dof manager must already be numbered.
    pub fn new(dof_manager: &'a DofManager) -> Self {
        Self { dof_manager }
    }

    pub fn dof_manager(&self) -> &'a DofManager {
        self.dof_manager
    }

    fn resolve(&self, group: &GroupOfDof) -> Result<Vec<DofStatus>, Error> {
        group
            .dofs()
            .iter()
            .map(|dof| self.dof_manager.global_id(dof))
            .collect()
    }

    /// Adds the contributions of a single group.
    ///
    /// All dofs of the group are resolved before anything is written, so a failing lookup
    /// leaves the accumulator untouched.
    pub fn assemble<F, A>(
        &self,
        group: &GroupOfDof,
        group_index: usize,
        formulation: &F,
        accumulator: &mut A,
    ) -> Result<(), Error>
    where
        F: Formulation + ?Sized,
        A: SystemAccumulator + ?Sized,
    {
        let statuses = self.resolve(group)?;
        for (i, test) in statuses.iter().enumerate() {
            let row = match *test {
                DofStatus::Free(row) => row,
                DofStatus::Fixed(_) => continue,
            };
            for (j, trial) in statuses.iter().enumerate() {
                match *trial {
                    DofStatus::Free(col) => accumulator.add_to_matrix(row, col, formulation.term(i, j, group_index)),
                    DofStatus::Fixed(value) => accumulator.add_to_rhs(row, -value * formulation.term(i, j, group_index)),
                }
            }
            accumulator.add_to_rhs(row, formulation.rhs(i, group_index));
        }
        Ok(())
    }

    /// Declares the matrix entries that [`assemble`](Self::assemble) writes for the group.
    pub fn sparsity<P>(&self, group: &GroupOfDof, pattern: &mut P) -> Result<(), Error>
    where
        P: PatternAccumulator + ?Sized,
    {
        let statuses = self.resolve(group)?;
        for test in &statuses {
            if let DofStatus::Free(row) = *test {
                for trial in &statuses {
                    if let DofStatus::Free(col) = *trial {
                        pattern.insert_in_sparsity_pattern(row, col);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn assemble_all<F, A>(&self, space: &FunctionSpace, formulation: &F, accumulator: &mut A) -> Result<(), Error>
    where
        F: Formulation + ?Sized,
        A: SystemAccumulator + ?Sized,
    {
        debug!("Assembling {} element groups", space.num_groups());
        for (group_index, group) in space.groups().iter().enumerate() {
            self.assemble(group, group_index, formulation, accumulator)?;
        }
        Ok(())
    }

    pub fn sparsity_all<P>(&self, space: &FunctionSpace, pattern: &mut P) -> Result<(), Error>
    where
        P: PatternAccumulator + ?Sized,
    {
        for group in space.groups() {
            self.sparsity(group, pattern)?;
        }
        Ok(())
    }

    /// Computes element contributions in parallel and adds them to the accumulator in group
    /// order. The result is identical to [`assemble_all`](Self::assemble_all).
    ///
    /// If any group fails, nothing is written.
    pub fn par_assemble_all<F, A>(&self, space: &FunctionSpace, formulation: &F, accumulator: &mut A) -> Result<(), Error>
    where
        F: Formulation + ?Sized,
        A: SystemAccumulator + ?Sized,
    {
        debug!("Assembling {} element groups in parallel", space.num_groups());
        let contributions = space
            .groups()
            .par_iter()
            .enumerate()
            .map(|(group_index, group)| {
                let mut contribution = ElementContribution::default();
                self.assemble(group, group_index, formulation, &mut contribution)?;
                Ok(contribution)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        for contribution in &contributions {
            contribution.replay(accumulator);
        }
        Ok(())
    }
}
