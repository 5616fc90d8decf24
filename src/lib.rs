//! Finite element assembly with exact polynomial bases.
//!
//! The crate is organized bottom-up:
//!
//! - [`polynomial`]: exact polynomial algebra used to construct basis functions.
//! - [`element`], [`mesh`] and [`quadrature`]: reference elements, meshes with stable edge and
//!   face identities, and quadrature rules.
//! - [`basis`]: Lagrange and Nedelec bases on reference elements.
//! - [`space`]: function spaces that turn a basis on a support into shared degrees of freedom.
//! - [`dof_manager`]: global numbering and constraints.
//! - [`assembly`]: global system assembly, essential conditions and the [`System`](assembly::System)
//!   driver.
pub mod assembly;
pub mod basis;
pub mod dof_manager;
pub mod element;
pub mod error;
pub mod mesh;
pub mod quadrature;
pub mod space;

#[cfg(feature = "proptest-support")]
pub mod proptest;

pub mod polynomial {
    pub use galerkin_polynomial::*;
}

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
