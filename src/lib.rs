//! Minimal resolutions of comodules over graded coalgebras.
//!
//! Given a comodule `M` over a coalgebra `A` over $\mathbb{F}_p$, this crate computes the
//! beginning of a resolution
//! $$ 0 \to M \to F_0 \to F_1 \to \cdots $$
//! by free comodules `F_s`, a direct sum of shifted copies of `A`. The generators of `F_s` give a
//! basis of $\mathrm{Ext}_A^s(\mathbb{F}_p, M)$, which is what one draws in an Adams chart.
//!
//! The coalgebra is typically infinite dimensional, so everything is truncated at a grading
//! bound, see [`Config`]. Each stage is the cokernel of the previous map followed by an injective
//! envelope computed by [`resolve`].
//!
//! # Example
//! ```
//! use std::sync::Arc;
//!
//! use algebra::{Basis, BasisElement, CoAlgebra, CoModule, GradedMap, Grading};
//! use coext::{resolution, Config};
//! use fp::{matrix::Matrix, prime::ValidPrime};
//!
//! // The dual of an exterior algebra on one class x.
//! let p = ValidPrime::new(2);
//! let basis: Basis = [
//!     BasisElement::new(Grading::ZERO, "1").with_generator(true),
//!     BasisElement::new(Grading::new(1, 0), "x"),
//! ]
//! .into_iter()
//! .collect();
//! let mut coaction = GradedMap::new();
//! coaction.insert(Grading::ZERO, Matrix::from_vec(p, &[vec![1]]));
//! coaction.insert(Grading::new(1, 0), Matrix::from_vec(p, &[vec![1], vec![1]]));
//! let a = Arc::new(CoAlgebra::new(p, basis, coaction, None));
//!
//! let config = Config {
//!     filtration_max: 3,
//!     grade_limit: Grading::new(5, 0),
//!     ..Config::default()
//! };
//! let res = resolution(Arc::new(CoModule::fp_module(a)), &config);
//! assert_eq!(res.graded_dimension_string(), "· \n· \n· \n");
//! ```

#![allow(clippy::too_many_arguments)]
#![warn(clippy::if_not_else)]
#![warn(clippy::needless_continue)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::explicit_iter_loop)]

pub mod envelope;
pub mod resolution;
pub mod utils;

pub use envelope::resolve;
pub use resolution::{resolution, Resolution};
pub use utils::Config;
