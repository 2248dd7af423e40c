//! Injective envelopes of comodules.
//!
//! Over a coalgebra, the free comodules `A ⊗ V` are the injective objects, and a map `M -> A ⊗ V`
//! is determined by its composite with the counit `A ⊗ V -> V`. In particular, a single linear
//! functional on `M` that is nonzero on an element `q` extends to a comodule map into a shifted
//! copy of `A`, which sends `q` to the generator. [`resolve`] adds such maps one at a time until
//! nothing is left in the kernel.

use std::sync::Arc;

use algebra::{CoModule, GradedMap, Grading, Morphism};
use fp::matrix::Matrix;

use crate::utils::generator_name;

/// The map of `quotient` into its own copy of `A`, shifted up to the grading of the element
/// `(grade, index)`. Only the part of `A` within `element_limit` is kept.
fn coaction_block(
    quotient: &CoModule,
    grade: Grading,
    index: usize,
    element_limit: Grading,
) -> GradedMap {
    let p = quotient.prime();
    let Some(moduled) = quotient.module_index() else {
        unreachable!("resolve always works with a module index");
    };
    let mut mapping = GradedMap::new();
    for (&a_gr, positions) in &moduled[&grade][index] {
        if !a_gr.within(element_limit) {
            continue;
        }
        let target = grade + a_gr;
        let mut block = Matrix::new(p, positions.len(), quotient.dimension_in(target));
        for (a_id, &(t_gr, t_id)) in positions.iter().enumerate() {
            debug_assert_eq!(t_gr, target, "module index points to the wrong grade");
            block[a_id] = quotient.coaction()[&t_gr][t_id].clone();
        }
        mapping.insert(target, block);
    }
    mapping
}

/// An injective map from `quotient` into a direct sum of free comodules, injective at every
/// grading within `grade_limit`.
///
/// Starting from the map into the zero comodule, repeatedly look for the lowest grade at which the
/// map has a kernel, pick the first nonzero entry of the kernel in row-major order and add a free
/// summand generated in that grade which detects it. The summands are truncated at
/// `element_limit`, and are named `a`, `b`, ... in the order they are added.
#[tracing::instrument(skip_all, fields(quotient = %quotient, limit = %grade_limit))]
pub fn resolve(quotient: &Arc<CoModule>, grade_limit: Grading, element_limit: Grading) -> Morphism {
    let quotient = match quotient.module_index() {
        Some(_) => Arc::clone(quotient),
        None => Arc::new(quotient.with_module_index()),
    };

    let mut growing = Morphism::empty(Arc::clone(&quotient));
    let grades = quotient.basis().sorted_grades_within(grade_limit);
    let mut start = 0;
    let mut generators = 0;

    loop {
        let mut next = None;
        for (i, &grade) in grades.iter().enumerate().skip(start) {
            let kernel = growing.matrix()[&grade].null_space();
            if let Some((_, _, index)) = quotient.lowest_graded_index_from_matrix(grade, &kernel) {
                next = Some((grade, index));
                start = i;
                break;
            }
        }
        let Some((grade, index)) = next else {
            break;
        };

        let name = generator_name(generators);
        tracing::debug!(%grade, index, %name, "adding generator");

        let mapping = coaction_block(&quotient, grade, index, element_limit);
        let free = CoModule::free_module_limit(
            Arc::clone(quotient.coalgebra()),
            grade,
            generators,
            &name,
            element_limit,
        );
        let to_free = Morphism::new(Arc::clone(&quotient), Arc::new(free), mapping);
        growing = Morphism::combine(&growing, &to_free);
        generators += 1;
    }

    tracing::debug!(generators, "injective");
    growing
}

#[cfg(test)]
mod tests {
    use algebra::{tensor::TensorIndex, BasisElement, CoAlgebra};
    use fp::prime::ValidPrime;

    use super::*;

    fn exterior(p: ValidPrime) -> Arc<CoAlgebra> {
        let basis = [
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

    #[test]
    fn envelope_of_ground_field() {
        let a = exterior(ValidPrime::new(2));
        let m = Arc::new(CoModule::fp_module(a));
        let inj = resolve(&m, Grading::new(5, 0), Grading::new(7, 0));

        let codomain = inj.codomain();
        assert_eq!(codomain.generators().len(), 1);
        assert_eq!(codomain.dimension(), 2);
        assert_eq!(codomain.basis().element((Grading::ZERO, 0)).name, "1 | a");
        assert_eq!(inj.matrix()[&Grading::ZERO].to_vec(), vec![vec![1]]);
    }

    /// Two copies of the ground field in the same grade need two generators. Without a module
    /// index the coaction is rebuilt first.
    #[test]
    fn envelope_of_sum() {
        let p = ValidPrime::new(3);
        let a = exterior(p);
        let basis = [
            BasisElement::new(Grading::ZERO, "u"),
            BasisElement::new(Grading::ZERO, "v"),
        ]
        .into_iter()
        .collect();
        let mut coaction = GradedMap::new();
        coaction.insert(Grading::ZERO, Matrix::identity(p, 2));
        let mut tensored = TensorIndex::new();
        tensored.insert(
            Grading::ZERO,
            vec![
                ((Grading::ZERO, 0), (Grading::ZERO, 0)),
                ((Grading::ZERO, 0), (Grading::ZERO, 1)),
            ],
        );
        let m = CoModule::new(a, basis, coaction, Some(tensored));
        assert!(m.module_index().is_none());

        let inj = resolve(&Arc::new(m), Grading::ZERO, Grading::new(2, 0));
        let names: Vec<_> = inj
            .codomain()
            .generators()
            .iter()
            .map(|el| el.name.clone())
            .collect();
        assert_eq!(names, ["1 | a", "1 | b"]);
        assert_eq!(
            inj.matrix()[&Grading::ZERO].to_vec(),
            vec![vec![1, 0], vec![0, 1]]
        );
    }

    /// Grades outside the limit are left alone.
    #[test]
    fn respects_grade_limit() {
        let a = exterior(ValidPrime::new(2));
        let f = Arc::new(CoModule::free_module(a, Grading::new(3, 0), 0, "a"));
        let inj = resolve(&f, Grading::new(2, 0), Grading::new(4, 0));
        assert_eq!(inj.codomain().dimension(), 0);
    }
}
