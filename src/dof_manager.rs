//! Global numbering and constraints of dofs.
use crate::error::Error;
use crate::space::{Dof, FunctionSpace};
use log::debug;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// The resolved status of a dof.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DofStatus {
    /// A free dof and its row/column in the global system.
    Free(usize),
    /// A constrained dof and its prescribed value.
    Fixed(f64),
}

/// Assigns global indices to free dofs and records prescribed values of fixed dofs.
///
/// Dofs are fixed first. Calling [`number`](Self::number) then numbers the remaining free dofs
/// densely, in ascending dof order. After numbering, the manager only resolves dofs; further
/// constraints are rejected, so the numbering is stable for the lifetime of the manager.
#[derive(Debug, Clone, Default)]
pub struct DofManager {
    dofs: BTreeSet<Dof>,
    fixed: BTreeMap<Dof, f64>,
    numbering: Option<FxHashMap<Dof, usize>>,
}

impl DofManager {
    /// Manages all dofs of the given space.
    pub fn new(space: &FunctionSpace) -> Self {
        Self::from_dofs(space.dofs().iter().copied())
    }

    pub fn from_dofs(dofs: impl IntoIterator<Item = Dof>) -> Self {
        Self {
            dofs: dofs.into_iter().collect(),
            fixed: BTreeMap::new(),
            numbering: None,
        }
    }

    /// Constrains the dof to the given value.
    ///
    /// Fixing a dof again with the same value has no effect. Fixing it with a different value
    /// is rejected and leaves the manager unchanged, as is a non-finite value.
    pub fn fix_value(&mut self, dof: Dof, value: f64) -> Result<(), Error> {
        self.check_fixable(dof, value)?;
        match self.fixed.get(&dof) {
            Some(&existing) if existing == value => Ok(()),
            Some(&existing) => Err(Error::ConflictingFixedValue {
                dof,
                existing,
                requested: value,
            }),
            None => {
                self.fixed.insert(dof, value);
                Ok(())
            }
        }
    }

    /// Constrains several dofs at once. Either all values are recorded, or none are.
    pub fn fix_values(&mut self, values: &[(Dof, f64)]) -> Result<(), Error> {
        let mut pending = BTreeMap::new();
        for &(dof, value) in values {
            self.check_fixable(dof, value)?;
            let existing = self.fixed.get(&dof).or_else(|| pending.get(&dof)).copied();
            pending.insert(dof, value);
            if let Some(existing) = existing {
                if existing != value {
                    return Err(Error::ConflictingFixedValue {
                        dof,
                        existing,
                        requested: value,
                    });
                }
            }
        }
        for &(dof, value) in values {
            self.fix_value(dof, value)?;
        }
        Ok(())
    }

    fn check_fixable(&self, dof: Dof, value: f64) -> Result<(), Error> {
        if !self.dofs.contains(&dof) {
            return Err(Error::UnknownDof(dof));
        }
        if self.numbering.is_some() {
            return Err(Error::DofAlreadyNumbered(dof));
        }
        if !value.is_finite() {
            return Err(Error::NonFiniteValue { dof, value });
        }
        Ok(())
    }

    /// Numbers the free dofs `0..num_free()` in ascending dof order.
    ///
    /// Numbering an already numbered manager has no effect.
    pub fn number(&mut self) {
        if self.numbering.is_some() {
            return;
        }
        let numbering: FxHashMap<Dof, usize> = self
            .dofs
            .iter()
            .filter(|dof| !self.fixed.contains_key(dof))
            .enumerate()
            .map(|(index, dof)| (*dof, index))
            .collect();
        debug!(
            "Numbered {} free dofs ({} fixed)",
            numbering.len(),
            self.fixed.len()
        );
        self.numbering = Some(numbering);
    }

    pub fn is_numbered(&self) -> bool {
        self.numbering.is_some()
    }

    /// Resolves the dof to its global index or its prescribed value.
    ///
    /// Fixed dofs resolve even before numbering. Free dofs require [`number`](Self::number)
    /// to have been called.
    pub fn global_id(&self, dof: &Dof) -> Result<DofStatus, Error> {
        if let Some(&value) = self.fixed.get(dof) {
            return Ok(DofStatus::Fixed(value));
        }
        if !self.dofs.contains(dof) {
            return Err(Error::UnknownDof(*dof));
        }
        let numbering = self
            .numbering
            .as_ref()
            .ok_or(Error::DofNotNumbered(*dof))?;
        let index = numbering
            .get(dof)
            .expect("Internal error: every free dof must be numbered");
        Ok(DofStatus::Free(*index))
    }

    pub fn contains(&self, dof: &Dof) -> bool {
        self.dofs.contains(dof)
    }

    pub fn dofs(&self) -> &BTreeSet<Dof> {
        &self.dofs
    }

    pub fn num_dofs(&self) -> usize {
        self.dofs.len()
    }

    pub fn num_fixed(&self) -> usize {
        self.fixed.len()
    }

    pub fn num_free(&self) -> usize {
        self.dofs.len() - self.fixed.len()
    }

    pub fn is_fixed(&self, dof: &Dof) -> bool {
        self.fixed.contains_key(dof)
    }

    pub fn fixed_value(&self, dof: &Dof) -> Option<f64> {
        self.fixed.get(dof).copied()
    }

    /// All fixed dofs with their values, in ascending dof order.
    pub fn fixed_values(&self) -> impl Iterator<Item = (&Dof, &f64)> {
        self.fixed.iter()
    }
}
