//! Linear algebra over prime fields.
//!
//! Everything here works over $\mathbb{F}_p$ for a prime chosen at runtime. Vectors over
//! $\mathbb{F}_2$ are bit-packed, while vectors over odd primes store one entry per `u32`. Both
//! live behind the same [`vector::FpVector`] enum, so code using them never has to care which
//! representation is in use.

#![allow(clippy::many_single_char_names)]
#![warn(clippy::if_not_else)]
#![warn(clippy::needless_continue)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::explicit_iter_loop)]

pub mod matrix;
pub mod prime;
pub mod vector;
