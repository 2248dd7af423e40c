use std::{
    fmt::{self, Display, Formatter},
    ops::Mul,
    sync::Arc,
};

use fp::matrix::Matrix;
use serde::Serialize;

use crate::{
    basis::{BasisIndex, GradedMap},
    error::StructureError,
    grading::Grading,
    module::CoModule,
    tensor::TensorIndex,
};

mod cokernel;

pub use cokernel::cokernel;

/// A grade preserving map of comodules over a common coalgebra.
///
/// The matrix at grade `g` has one column per element of the domain at `g` and one row per
/// element of the codomain at `g`. Every grade of the domain has a matrix, possibly with no rows.
#[derive(Debug, Clone)]
pub struct Morphism {
    domain: Arc<CoModule>,
    codomain: Arc<CoModule>,
    matrix: GradedMap,
}

/// A nonzero coefficient of a morphism between a primitive of the domain and a generator of the
/// codomain. `source` is the generator of the free summand the primitive lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StructureLine {
    pub source: BasisIndex,
    pub target: BasisIndex,
    pub primitive: usize,
}

impl Display for StructureLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ((s_gr, s_id), (t_gr, t_id)) = (self.source, self.target);
        write!(f, "{s_gr}[{s_id}] -> {t_gr}[{t_id}] : h_{}", self.primitive)
    }
}

/// Whether two handles refer to the same comodule, either literally or as comodules over the same
/// coalgebra with the same basis.
fn same_comodule(a: &Arc<CoModule>, b: &Arc<CoModule>) -> bool {
    Arc::ptr_eq(a, b) || (Arc::ptr_eq(a.coalgebra(), b.coalgebra()) && a.basis() == b.basis())
}

impl Morphism {
    /// Construct a morphism. Grades of the domain missing from `matrix` are filled with zero
    /// blocks.
    pub fn try_new(
        domain: Arc<CoModule>,
        codomain: Arc<CoModule>,
        mut matrix: GradedMap,
    ) -> Result<Self, StructureError> {
        let p = domain.prime();
        for (grade, elements) in domain.basis().iter() {
            matrix
                .entry(grade)
                .or_insert_with(|| Matrix::new(p, codomain.dimension_in(grade), elements.len()));
        }
        let morphism = Self {
            domain,
            codomain,
            matrix,
        };
        morphism.verify()?;
        Ok(morphism)
    }

    /// Panics if the matrices do not fit the domain and codomain. See [`Morphism::try_new`].
    pub fn new(domain: Arc<CoModule>, codomain: Arc<CoModule>, matrix: GradedMap) -> Self {
        Self::try_new(domain, codomain, matrix).unwrap_or_else(|e| panic!("Invalid morphism: {e}"))
    }

    /// The zero map from `domain` to `codomain`.
    pub fn zero(domain: Arc<CoModule>, codomain: Arc<CoModule>) -> Self {
        Self::new(domain, codomain, GradedMap::new())
    }

    /// The map from `domain` to the zero comodule.
    pub fn empty(domain: Arc<CoModule>) -> Self {
        let codomain = Arc::new(domain.zero_module());
        Self::zero(domain, codomain)
    }

    pub fn domain(&self) -> &Arc<CoModule> {
        &self.domain
    }

    pub fn codomain(&self) -> &Arc<CoModule> {
        &self.codomain
    }

    pub fn matrix(&self) -> &GradedMap {
        &self.matrix
    }

    pub fn is_zero_at(&self, grade: Grading) -> bool {
        self.matrix.get(&grade).map_or(true, Matrix::is_zero)
    }

    /// Check that the domain and codomain share a coalgebra and that the matrix at every grade of
    /// the domain has the right shape.
    pub fn verify(&self) -> Result<(), StructureError> {
        if !Arc::ptr_eq(self.domain.coalgebra(), self.codomain.coalgebra()) {
            return Err(StructureError::Incompatible(
                "domain and codomain are comodules over different coalgebras",
            ));
        }
        let p = self.domain.prime();
        for (grade, elements) in self.domain.basis().iter() {
            let matrix = self.matrix.get(&grade).ok_or(StructureError::MissingGrade {
                grading: grade,
                what: "morphism matrix",
            })?;
            if matrix.prime() != p {
                return Err(StructureError::PrimeMismatch {
                    expected: p,
                    found: matrix.prime(),
                });
            }
            let expected = (self.codomain.dimension_in(grade), elements.len());
            let found = (matrix.rows(), matrix.columns());
            if expected != found {
                return Err(StructureError::Shape {
                    grading: grade,
                    what: "morphism matrix",
                    expected,
                    found,
                });
            }
        }
        if let Some(&grading) = self
            .matrix
            .keys()
            .find(|&&g| !self.domain.basis().contains(g))
        {
            return Err(StructureError::MissingGrade {
                grading,
                what: "domain basis of a morphism grade",
            });
        }
        Ok(())
    }

    /// The composite `self ∘ other`. The codomain of `other` must be the domain of `self`.
    pub fn compose(&self, other: &Self) -> Self {
        assert!(
            same_comodule(&self.domain, &other.codomain),
            "Cannot compose morphisms with incompatible domains and codomains"
        );
        let p = self.domain.prime();
        let matrix = other
            .matrix
            .iter()
            .map(|(&grade, m)| {
                let product = match self.matrix.get(&grade) {
                    Some(s) => s * m,
                    None => Matrix::new(p, self.codomain.dimension_in(grade), m.columns()),
                };
                (grade, product)
            })
            .collect();
        Self::new(Arc::clone(&other.domain), Arc::clone(&self.codomain), matrix)
    }

    /// The map `(f, g)` from the common domain into the direct sum of the codomains.
    ///
    /// The codomain of `f` comes first in every grade. Elements of the codomain of `g` are
    /// appended after those of `f`, and the coaction is the block sum of the two coactions, so
    /// neither summand is rebuilt.
    pub fn combine(f: &Self, g: &Self) -> Self {
        assert!(
            same_comodule(&f.domain, &g.domain),
            "Cannot combine morphisms with different domains"
        );
        assert!(
            Arc::ptr_eq(f.codomain.coalgebra(), g.codomain.coalgebra()),
            "Cannot combine morphisms into comodules over different coalgebras"
        );
        let (first, second) = (&*f.codomain, &*g.codomain);

        let mut basis = first.basis().clone();
        for (grade, elements) in second.basis().iter() {
            basis.extend_grade(grade, elements.to_vec());
        }

        let mut coaction = first.coaction().clone();
        for (&grade, b) in second.coaction() {
            let sum = match coaction.get(&grade) {
                Some(a) => a.block_sum(b),
                None => b.clone(),
            };
            coaction.insert(grade, sum);
        }

        let mut tensored: TensorIndex = first.tensored().clone();
        for (&grade, entries) in second.tensored() {
            tensored.entry(grade).or_default().extend(
                entries
                    .iter()
                    .map(|&(a, (m_gr, m_id))| (a, (m_gr, m_id + first.dimension_in(m_gr)))),
            );
        }

        let codomain = CoModule::from_parts(
            Arc::clone(first.coalgebra()),
            basis,
            coaction,
            tensored,
            None,
        );

        let mut matrix = f.matrix.clone();
        for (&grade, b) in &g.matrix {
            let stacked = match matrix.get(&grade) {
                Some(a) => a.stack(b),
                None => b.clone(),
            };
            matrix.insert(grade, stacked);
        }

        Self::new(Arc::clone(&f.domain), Arc::new(codomain), matrix)
    }

    /// Every nonzero coefficient from a primitive of the domain to a generator of the codomain.
    /// Primitives outside free summands of the domain are skipped.
    pub fn structure_lines(&self) -> Vec<StructureLine> {
        let mut lines = Vec::new();
        for (grade, index) in self.domain.primitive_indices() {
            let el = self.domain.basis().element((grade, index));
            let Some(primitive) = el.primitive else {
                continue;
            };
            let Some(source) = el
                .generated_index
                .and_then(|i| self.domain.find_generator(i))
            else {
                continue;
            };
            let targets = self.codomain.basis().elements_in(grade);
            for (target, row) in self.matrix[&grade].iter().enumerate() {
                if row.entry(index) != 0 && targets[target].generator {
                    lines.push(StructureLine {
                        source,
                        target: (grade, target),
                        primitive,
                    });
                }
            }
        }
        lines
    }
}

impl Mul for &Morphism {
    type Output = Morphism;

    fn mul(self, rhs: Self) -> Morphism {
        self.compose(rhs)
    }
}

impl Display for Morphism {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.domain, self.codomain)
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use fp::prime::ValidPrime;

    use super::*;
    use crate::{
        basis::{Basis, BasisElement},
        CoAlgebra,
    };

    fn exterior() -> Arc<CoAlgebra> {
        let p = ValidPrime::new(2);
        let basis: Basis = [
            BasisElement::new(Grading::ZERO, "1").with_generator(true),
            BasisElement::new(Grading::new(1, 0), "x"),
        ]
        .into_iter()
        .collect();
        let mut coaction = GradedMap::new();
        coaction.insert(Grading::ZERO, Matrix::from_vec(p, &[vec![1]]));
        coaction.insert(Grading::new(1, 0), Matrix::from_vec(p, &[vec![1], vec![1]]));
        Arc::new(CoAlgebra::new(p, basis, coaction, None))
    }

    fn single(grade: Grading, rows: &[Vec<u32>]) -> GradedMap {
        let mut matrix = GradedMap::new();
        matrix.insert(grade, Matrix::from_vec(ValidPrime::new(2), rows));
        matrix
    }

    #[test]
    fn zero_and_empty() {
        let a = exterior();
        let m = Arc::new(CoModule::fp_module(Arc::clone(&a)));
        let f = Arc::new(CoModule::free_module(a, Grading::ZERO, 0, "a"));

        let zero = Morphism::zero(Arc::clone(&m), Arc::clone(&f));
        assert!(zero.is_zero_at(Grading::ZERO));
        assert_eq!(zero.matrix()[&Grading::ZERO].to_vec(), vec![vec![0]]);

        let empty = Morphism::empty(f);
        assert_eq!(empty.codomain().dimension(), 0);
        for matrix in empty.matrix().values() {
            assert_eq!((matrix.rows(), matrix.columns()), (0, 1));
        }
        expect!["2 Elements | 1 Generators --> 0 Elements | 0 Generators"]
            .assert_eq(&empty.to_string());
    }

    #[test]
    fn rejects_bad_shape() {
        let a = exterior();
        let m = Arc::new(CoModule::fp_module(Arc::clone(&a)));
        let f = Arc::new(CoModule::free_module(a, Grading::ZERO, 0, "a"));
        let err = Morphism::try_new(m, f, single(Grading::ZERO, &[vec![1], vec![0]])).unwrap_err();
        expect!["morphism matrix at grade (0, 0) has shape 2x1, expected 1x1"]
            .assert_eq(&err.to_string());
    }

    #[test]
    fn compose() {
        let a = exterior();
        let m = Arc::new(CoModule::fp_module(Arc::clone(&a)));
        let f = Arc::new(CoModule::free_module(Arc::clone(&a), Grading::ZERO, 0, "a"));
        let g = Arc::new(CoModule::free_module(a, Grading::new(1, 0), 0, "b"));

        let inclusion = Morphism::new(
            Arc::clone(&m),
            Arc::clone(&f),
            single(Grading::ZERO, &[vec![1]]),
        );
        let identity = Morphism::new(
            Arc::clone(&m),
            Arc::clone(&m),
            single(Grading::ZERO, &[vec![1]]),
        );
        assert_eq!(inclusion.compose(&identity).matrix(), inclusion.matrix());

        // The inclusion has no matrix at the grades of `g`, which become zero blocks.
        let composite = &inclusion * &Morphism::zero(g, m);
        assert_eq!(composite.codomain().basis(), f.basis());
        let shapes: Vec<_> = composite
            .matrix()
            .iter()
            .map(|(g, m)| (*g, m.rows(), m.columns()))
            .collect();
        assert_eq!(
            shapes,
            vec![(Grading::new(1, 0), 1, 1), (Grading::new(2, 0), 0, 1)]
        );
    }

    #[test]
    #[should_panic(expected = "incompatible domains and codomains")]
    fn compose_mismatch() {
        let a = exterior();
        let m = Arc::new(CoModule::fp_module(Arc::clone(&a)));
        let f = Arc::new(CoModule::free_module(a, Grading::ZERO, 0, "a"));
        let inclusion = Morphism::new(m, f, single(Grading::ZERO, &[vec![1]]));
        inclusion.compose(&inclusion);
    }

    #[test]
    fn combine() {
        let a = exterior();
        let m = Arc::new(CoModule::fp_module(Arc::clone(&a)));
        let first = Arc::new(CoModule::free_module(Arc::clone(&a), Grading::ZERO, 0, "a"));
        let second = Arc::new(CoModule::free_module(a, Grading::ZERO, 1, "b"));
        let f = Morphism::new(Arc::clone(&m), first, single(Grading::ZERO, &[vec![1]]));
        let g = Morphism::new(m, second, single(Grading::ZERO, &[vec![1]]));

        let sum = Morphism::combine(&f, &g);
        let codomain = sum.codomain();
        codomain.verify().unwrap();
        assert_eq!(codomain.dimension_in(Grading::ZERO), 2);
        assert_eq!(codomain.dimension_in(Grading::new(1, 0)), 2);
        assert_eq!(codomain.symbol(), "A⊕A");
        assert_eq!(codomain.find_generator(1), Some((Grading::ZERO, 1)));
        assert_eq!(
            sum.matrix()[&Grading::ZERO].to_vec(),
            vec![vec![1], vec![1]]
        );

        // x | b only sees the second summand.
        let x_b = (Grading::new(1, 0), 1);
        assert_eq!(
            codomain.coaction_terms()[&x_b],
            vec![
                (1, (Grading::new(1, 0), 0), (Grading::ZERO, 1)),
                (1, (Grading::ZERO, 0), (Grading::new(1, 0), 1)),
            ]
        );
    }

    #[test]
    fn structure_lines() {
        let a = exterior();
        let f = Arc::new(CoModule::free_module(Arc::clone(&a), Grading::ZERO, 0, "a"));
        let g = Arc::new(CoModule::free_module_limit(
            a,
            Grading::new(1, 0),
            0,
            "b",
            Grading::ZERO,
        ));
        // x | a -> 1 | b
        let d = Morphism::new(f, g, single(Grading::new(1, 0), &[vec![1]]));
        let lines = d.structure_lines();
        assert_eq!(
            lines,
            vec![StructureLine {
                source: (Grading::ZERO, 0),
                target: (Grading::new(1, 0), 0),
                primitive: 0,
            }]
        );
        expect!["(0, 0)[0] -> (1, 0)[0] : h_0"].assert_eq(&lines[0].to_string());
    }
}
