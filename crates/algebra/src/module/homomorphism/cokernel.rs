use std::{collections::BTreeMap, sync::Arc};

use fp::{matrix::Matrix, vector::FpVector};

use super::Morphism;
use crate::{
    basis::{Basis, BasisElement, GradedMap},
    module::CoModule,
    tensor::build_tensor_index,
};

/// Restrict `row` to the given columns.
fn restrict(row: &FpVector, columns: &[usize]) -> FpVector {
    let mut result = FpVector::new(row.prime(), columns.len());
    for (i, &c) in columns.iter().enumerate() {
        result.set_entry(i, row.entry(c));
    }
    result
}

/// The projection from the codomain of `f` onto its quotient by the image of `f`.
///
/// At each grade, the projection is the left null space of `f` in reduced row echelon form. The
/// pivot columns of that matrix pick out the elements of the codomain that survive in the
/// quotient, and the quotient element attached to a pivot column is the image of that element.
/// The coaction of the quotient is the coaction of the codomain on those elements, pushed through
/// the projection in the module factor.
#[tracing::instrument(skip_all, fields(codomain = %f.codomain()))]
pub fn cokernel(f: &Morphism) -> Morphism {
    let source = f.codomain();
    let p = source.prime();
    let coalgebra = source.coalgebra();

    let projection: GradedMap = source
        .basis()
        .iter()
        .map(|(grade, elements)| {
            let m = match f.matrix().get(&grade) {
                Some(m) => m.left_null_space(),
                None => Matrix::identity(p, elements.len()),
            };
            (grade, m)
        })
        .collect();

    let mut basis = Basis::new();
    let mut pivots = BTreeMap::new();
    let mut count = 0;
    for (&grade, m) in &projection {
        let columns = m.pivot_columns();
        if columns.is_empty() {
            continue;
        }
        let elements = columns
            .iter()
            .map(|&c| BasisElement::new(grade, (count + c).to_string()))
            .collect();
        basis.extend_grade(grade, elements);
        count += columns.len();
        pivots.insert(grade, columns);
    }

    let (tensored, moduled) = build_tensor_index(coalgebra.basis(), &basis);

    let mut coaction = GradedMap::new();
    for (&grade, columns) in &pivots {
        let rows = tensored.get(&grade).map_or(0, Vec::len);
        let mut matrix = Matrix::new(p, rows, columns.len());
        let entries = source.tensored().get(&grade).map_or(&[][..], Vec::as_slice);
        for (row, &((a_gr, a_id), (m_gr, m_id))) in source.coaction()[&grade].iter().zip(entries) {
            let restricted = restrict(row, columns);
            if restricted.is_zero() {
                continue;
            }
            for (target_id, target) in projection[&m_gr].iter().enumerate() {
                let c = target.entry(m_id);
                if c == 0 {
                    continue;
                }
                let (t_gr, t_id) = moduled[&m_gr][target_id][&a_gr][a_id];
                debug_assert_eq!(t_gr, grade, "coaction term lands in the wrong grade");
                matrix[t_id].add(&restricted, c);
            }
        }
        coaction.insert(grade, matrix);
    }

    let quotient = CoModule::from_parts(
        Arc::clone(coalgebra),
        basis,
        coaction,
        tensored,
        Some(moduled),
    );
    tracing::debug!(dimension = quotient.dimension(), "built quotient");

    Morphism::new(Arc::clone(source), Arc::new(quotient), projection)
}

#[cfg(test)]
mod tests {
    use fp::prime::ValidPrime;
    use rstest::rstest;

    use super::*;
    use crate::{grading::Grading, CoAlgebra};

    fn exterior(p: ValidPrime) -> Arc<CoAlgebra> {
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

    fn assert_exact(f: &Morphism, c: &Morphism) {
        for (grade, m) in f.matrix() {
            let product = &c.matrix()[grade] * m;
            assert!(product.is_zero(), "composite is nonzero at {grade}");
        }
    }

    #[rstest]
    fn cokernel_of_zero(#[values(2, 3, 5, 7)] p: u32) {
        let a = exterior(ValidPrime::new(p));
        let m = Arc::new(CoModule::fp_module(a));
        let zero = Morphism::zero(Arc::new(m.zero_module()), Arc::clone(&m));
        let c = cokernel(&zero);

        let q = c.codomain();
        q.verify().unwrap();
        assert_eq!(q.dimension(), 1);
        assert_eq!(q.basis().element((Grading::ZERO, 0)).name, "0");
        assert_eq!(q.coaction(), m.coaction());
        assert_eq!(c.matrix()[&Grading::ZERO].to_vec(), vec![vec![1]]);
    }

    /// The inclusion of the ground field into the bottom of the coalgebra. The quotient is spanned
    /// by the image of `x`, with trivial coaction.
    #[rstest]
    fn cokernel_of_inclusion(#[values(2, 3, 5, 7)] p: u32) {
        let p = ValidPrime::new(p);
        let a = exterior(p);
        let m = Arc::new(CoModule::fp_module(Arc::clone(&a)));
        let f = Arc::new(CoModule::free_module(a, Grading::ZERO, 0, "a"));
        let mut matrix = GradedMap::new();
        matrix.insert(Grading::ZERO, Matrix::from_vec(p, &[vec![1]]));
        let inclusion = Morphism::new(m, Arc::clone(&f), matrix);

        let c = cokernel(&inclusion);
        assert_exact(&inclusion, &c);
        assert!(Arc::ptr_eq(c.domain(), &f));

        let q = c.codomain();
        q.verify().unwrap();
        assert_eq!(q.dimension_in(Grading::ZERO), 0);
        assert_eq!(q.dimension_in(Grading::new(1, 0)), 1);
        assert_eq!(
            q.coaction_terms()[&(Grading::new(1, 0), 0)],
            vec![(1, (Grading::ZERO, 0), (Grading::new(1, 0), 0))]
        );
        // The projection has no rows at grade zero.
        let zero_block = &c.matrix()[&Grading::ZERO];
        assert_eq!((zero_block.rows(), zero_block.columns()), (0, 1));
    }

    /// Over F_3, the quotient of two copies of the coalgebra by the diagonal is a single copy.
    #[test]
    fn cokernel_of_diagonal() {
        let p = ValidPrime::new(3);
        let a = exterior(p);
        let m = Arc::new(CoModule::free_module(Arc::clone(&a), Grading::ZERO, 0, "a"));
        let first = Arc::new(CoModule::free_module(Arc::clone(&a), Grading::ZERO, 0, "b"));
        let second = Arc::new(CoModule::free_module(a, Grading::ZERO, 1, "c"));

        let identity = |codomain: &Arc<CoModule>| {
            let matrix = m
                .basis()
                .grades()
                .map(|g| (g, Matrix::identity(p, 1)))
                .collect();
            Morphism::new(Arc::clone(&m), Arc::clone(codomain), matrix)
        };
        let diagonal = Morphism::combine(&identity(&first), &identity(&second));

        let c = cokernel(&diagonal);
        assert_exact(&diagonal, &c);

        let q = c.codomain();
        q.verify().unwrap();
        assert_eq!(q.dimension(), 2);
        for grade in [Grading::ZERO, Grading::new(1, 0)] {
            // The left kernel of (1, 1)^T over F_3 is spanned by (1, 2).
            assert_eq!(c.matrix()[&grade].to_vec(), vec![vec![1, 2]]);
        }
        assert_eq!(
            q.coaction_terms()[&(Grading::new(1, 0), 0)],
            vec![
                (1, (Grading::new(1, 0), 0), (Grading::ZERO, 0)),
                (1, (Grading::ZERO, 0), (Grading::new(1, 0), 0)),
            ]
        );
    }
}
