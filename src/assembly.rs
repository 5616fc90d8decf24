//! Assembly of global linear systems from element groups.
//!
//! The [`SystemAssembler`] walks the dof groups of a function space, queries a [`Formulation`]
//! for local terms and writes them into a [`SystemAccumulator`], eliminating fixed dofs on the
//! way. [`System`] drives the complete pipeline from constraints to solution.
mod accumulator;
mod assembler;
mod essential;
mod formulation;
mod system;

pub use accumulator::*;
pub use assembler::SystemAssembler;
pub use essential::impose_essential_condition;
pub use formulation::{Formulation, Laplace, Projection, TargetFunction};
pub use system::System;
