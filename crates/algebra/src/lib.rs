//! Graded coalgebras and comodules over $\mathbb{F}_p$.
//!
//! Every object in this crate is graded by a [`Grading`] and stores its structure maps one grade
//! at a time, as [`fp::matrix::Matrix`]es. The coaction of a coalgebra or comodule lands in a
//! tensor product, whose basis is addressed through the index tables built in [`tensor`].

#![allow(clippy::too_many_arguments)]
#![warn(clippy::if_not_else)]
#![warn(clippy::redundant_closure_for_method_calls)]

pub mod algebra;
pub mod basis;
mod error;
pub mod grading;
pub mod module;
pub mod tensor;

pub use algebra::CoAlgebra;
pub use basis::{Basis, BasisElement, BasisIndex, GradedMap};
pub use error::StructureError;
pub use grading::Grading;
pub use module::{
    homomorphism::{cokernel, Morphism, StructureLine},
    CoModule,
};
