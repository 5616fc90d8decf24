use super::accumulator::{SparseLinearSystem, SparsityPatternBuilder};
use super::assembler::SystemAssembler;
use super::formulation::{Projection, TargetFunction};
use crate::basis::Basis;
use crate::dof_manager::{DofManager, DofStatus};
use crate::error::Error;
use crate::mesh::Support;
use crate::space::{FunctionSpace, GroupIdAllocator};
use log::debug;

/// Constrains the dofs of `space` on `domain` to the L² projection of `target`.
///
/// The target is projected onto an auxiliary space with the same basis family and order on
/// `domain`, and every dof of the auxiliary space that `dof_manager` knows is fixed to the
/// resulting coefficient. Dofs that are already fixed keep their value, so conditions on
/// adjacent domains can be imposed one after another. The domain must live on the same mesh as
/// the space, and the target must have the same field kind.
pub fn impose_essential_condition(
    dof_manager: &mut DofManager,
    space: &FunctionSpace,
    domain: &Support,
    target: TargetFunction,
    ids: &mut GroupIdAllocator,
) -> Result<(), Error> {
    if !space.support().shares_mesh_with(domain) {
        return Err(Error::ForeignMesh);
    }
    if target.field_kind() != space.field_kind() {
        return Err(Error::FieldKindMismatch {
            expected: space.field_kind(),
            found: target.field_kind(),
        });
    }

    let basis = Basis::new(domain.element_type()?, space.basis().family(), space.basis().order())?;
    let auxiliary = FunctionSpace::new(domain.clone(), basis, ids)?;
    let mut auxiliary_dofs = DofManager::new(&auxiliary);
    auxiliary_dofs.number();

    let projection = Projection::new(&auxiliary, target)?;
    let assembler = SystemAssembler::new(&auxiliary_dofs);
    let mut pattern = SparsityPatternBuilder::new(auxiliary_dofs.num_free());
    assembler.sparsity_all(&auxiliary, &mut pattern)?;
    let mut system = SparseLinearSystem::from_pattern(pattern.build());
    assembler.par_assemble_all(&auxiliary, &projection, &mut system)?;
    let coefficients = system.solve()?;

    let mut values = Vec::new();
    let mut num_already_fixed = 0;
    for dof in auxiliary.dofs().iter().filter(|dof| dof_manager.contains(dof)) {
        if dof_manager.is_fixed(dof) {
            num_already_fixed += 1;
            continue;
        }
        if let DofStatus::Free(index) = auxiliary_dofs.global_id(dof)? {
            values.push((*dof, coefficients[index]));
        }
    }
    dof_manager.fix_values(&values)?;
    debug!(
        "Imposed essential condition on {} dofs ({} already fixed)",
        values.len(),
        num_already_fixed
    );
    Ok(())
}
