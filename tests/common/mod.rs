#![allow(dead_code)]

use std::sync::Arc;

use algebra::{Basis, BasisElement, CoAlgebra, GradedMap, Grading};
use fp::{matrix::Matrix, prime::ValidPrime};

/// The dual of the exterior algebra on one class: `1`, and `x` in grading `(1, 0)`.
pub fn exterior(p: ValidPrime) -> Arc<CoAlgebra> {
    let basis: Basis = [
        BasisElement::new(Grading::ZERO, "1").with_generator(true),
        BasisElement::new(Grading::new(1, 0), "x"),
    ]
    .into_iter()
    .collect();
    let mut coaction = GradedMap::new();
    coaction.insert(Grading::ZERO, Matrix::from_vec(p, &[vec![1]]));
    // x|1, 1|x
    coaction.insert(Grading::new(1, 0), Matrix::from_vec(p, &[vec![1], vec![1]]));
    Arc::new(CoAlgebra::new(p, basis, coaction, None))
}

/// The dual of $\mathbb{F}_3[\xi]/\xi^3$, with `ψ(ξ^2) = ξ^2|1 + 2ξ|ξ + 1|ξ^2`.
pub fn truncated_polynomial() -> Arc<CoAlgebra> {
    let p = ValidPrime::new(3);
    let basis: Basis = [
        BasisElement::new(Grading::ZERO, "1").with_generator(true),
        BasisElement::new(Grading::new(1, 0), "ξ"),
        BasisElement::new(Grading::new(2, 0), "ξ^2"),
    ]
    .into_iter()
    .collect();
    let mut coaction = GradedMap::new();
    coaction.insert(Grading::ZERO, Matrix::from_vec(p, &[vec![1]]));
    coaction.insert(Grading::new(1, 0), Matrix::from_vec(p, &[vec![1], vec![1]]));
    coaction.insert(
        Grading::new(2, 0),
        Matrix::from_vec(p, &[vec![1], vec![2], vec![1]]),
    );
    Arc::new(CoAlgebra::new(p, basis, coaction, None))
}
