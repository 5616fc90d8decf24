use super::accumulator::{SparseLinearSystem, SparsityPatternBuilder};
use super::assembler::SystemAssembler;
use super::essential::impose_essential_condition;
use super::formulation::{Formulation, TargetFunction};
use crate::dof_manager::{DofManager, DofStatus};
use crate::error::Error;
use crate::mesh::Support;
use crate::space::{FunctionSpace, GroupIdAllocator, GroupOfDof};
use log::info;
use nalgebra::DVector;

/// A formulation on a function space together with its constraints, global system and
/// solution.
///
/// Constraints are added first. [`assemble`](Self::assemble) then numbers the free dofs and
/// builds the global system, after which no further constraints are accepted.
#[derive(Debug)]
pub struct System<'a, F> {
    space: &'a FunctionSpace<'a>,
    formulation: F,
    dof_manager: DofManager,
    linear_system: Option<SparseLinearSystem>,
    solution: Option<DVector<f64>>,
}

impl<'a, F: Formulation> System<'a, F> {
    pub fn new(space: &'a FunctionSpace<'a>, formulation: F) -> Self {
        Self {
            space,
            formulation,
            dof_manager: DofManager::new(space),
            linear_system: None,
            solution: None,
        }
    }

    pub fn space(&self) -> &'a FunctionSpace<'a> {
        self.space
    }

    pub fn formulation(&self) -> &F {
        &self.formulation
    }

    pub fn dof_manager(&self) -> &DofManager {
        &self.dof_manager
    }

    pub fn linear_system(&self) -> Option<&SparseLinearSystem> {
        self.linear_system.as_ref()
    }

    /// Fixes every dof in the closure of `domain` to `value`.
    pub fn fix_coefficients(&mut self, domain: &Support, value: f64) -> Result<(), Error> {
        let values: Vec<_> = self
            .space
            .keys_of_closure(domain)?
            .into_iter()
            .map(|dof| (dof, value))
            .collect();
        self.dof_manager.fix_values(&values)
    }

    /// Fixes the dofs on `domain` to the projection of `target`, see
    /// [`impose_essential_condition`].
    pub fn impose_essential_condition(
        &mut self,
        domain: &Support,
        target: TargetFunction,
        ids: &mut GroupIdAllocator,
    ) -> Result<(), Error> {
        impose_essential_condition(&mut self.dof_manager, self.space, domain, target, ids)
    }

    /// Numbers the free dofs and assembles the global system.
    pub fn assemble(&mut self) -> Result<(), Error> {
        self.dof_manager.number();
        let assembler = SystemAssembler::new(&self.dof_manager);
        let mut pattern = SparsityPatternBuilder::new(self.dof_manager.num_free());
        assembler.sparsity_all(self.space, &mut pattern)?;
        let mut linear_system = SparseLinearSystem::from_pattern(pattern.build());
        assembler.par_assemble_all(self.space, &self.formulation, &mut linear_system)?;
        self.linear_system = Some(linear_system);
        self.solution = None;
        Ok(())
    }

    pub fn solve(&mut self) -> Result<&DVector<f64>, Error> {
        let linear_system = self.linear_system.as_ref().ok_or(Error::NotAssembled)?;
        let solution = linear_system.solve()?;
        info!("Solved linear system with {} free dofs", solution.len());
        Ok(&*self.solution.insert(solution))
    }

    /// The values of the free dofs, if the system has been solved.
    pub fn solution(&self) -> Option<&DVector<f64>> {
        self.solution.as_ref()
    }

    /// Coefficients of the group's dofs in group order, taking fixed values for fixed dofs.
    pub fn element_coefficients(&self, group: &GroupOfDof) -> Result<Vec<f64>, Error> {
        let solution = self.solution.as_ref().ok_or(Error::NotAssembled)?;
        group
            .dofs()
            .iter()
            .map(|dof| match self.dof_manager.global_id(dof)? {
                DofStatus::Free(index) => Ok(solution[index]),
                DofStatus::Fixed(value) => Ok(value),
            })
            .collect()
    }
}
