//! Dense matrices over $\mathbb{F}_p$.
//!
//! A [`Matrix`] is stored as a list of row vectors. Row reduction records the pivot columns it
//! found, which is what the kernel computations in [`null_space`] are built on.

mod matrix_inner;
pub mod null_space;

pub use matrix_inner::Matrix;
