use fp::{matrix::Matrix, prime::ValidPrime};
use itertools::Itertools;

use crate::{
    basis::{Basis, BasisElement, GradedMap},
    error::StructureError,
    grading::Grading,
    tensor::{self, build_tensor_index, TensorIndex},
};

/// A graded coalgebra over $\mathbb{F}_p$.
///
/// The coproduct at grade `g` is a matrix whose columns are the basis elements at `g` and whose
/// rows are the elements of the tensor basis `A ⊗ A` at `g`, as listed in [`CoAlgebra::tensored`].
/// Tensor rows that vanish identically are dropped when the coalgebra is constructed, so the tensor
/// index usually only covers part of the full tensor product.
///
/// The only element in grade zero is assumed to be the unit, and every coproduct must contain
/// `1 ⊗ x` with coefficient one.
#[derive(Debug, Clone)]
pub struct CoAlgebra {
    p: ValidPrime,
    basis: Basis,
    coaction: GradedMap,
    tensored: TensorIndex,
}

impl CoAlgebra {
    /// Construct a coalgebra from a basis and its coproduct. If `tensored` is `None`, the coproduct
    /// is interpreted with respect to the full tensor basis produced by
    /// [`tensor::build_tensor_index`].
    ///
    /// The primitives of the basis are recomputed, and vanishing tensor rows are dropped.
    pub fn try_new(
        p: ValidPrime,
        mut basis: Basis,
        mut coaction: GradedMap,
        tensored: Option<TensorIndex>,
    ) -> Result<Self, StructureError> {
        let mut tensored = tensored.unwrap_or_else(|| build_tensor_index(&basis, &basis).0);
        tensor::check_coaction_shapes(p, &basis, &coaction, &tensored)?;
        tensor::verify_tensor_index(&basis, &basis, &tensored)?;

        tensor::check_counit(&coaction, &tensored)?;
        set_primitives(&mut basis, &coaction);
        tensor::drop_zero_rows(&mut coaction, &mut tensored);

        Ok(Self {
            p,
            basis,
            coaction,
            tensored,
        })
    }

    /// Panics if the data is inconsistent. See [`CoAlgebra::try_new`].
    pub fn new(
        p: ValidPrime,
        basis: Basis,
        coaction: GradedMap,
        tensored: Option<TensorIndex>,
    ) -> Self {
        Self::try_new(p, basis, coaction, tensored)
            .unwrap_or_else(|e| panic!("Invalid coalgebra: {e}"))
    }

    /// The ground field as a coalgebra: a single unit in grade zero.
    pub fn field(p: ValidPrime) -> Self {
        let basis = std::iter::once(BasisElement::new(Grading::ZERO, "1").with_generator(true))
            .collect();
        let mut coaction = GradedMap::new();
        coaction.insert(Grading::ZERO, Matrix::identity(p, 1));
        Self::new(p, basis, coaction, None)
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn coaction(&self) -> &GradedMap {
        &self.coaction
    }

    pub fn tensored(&self) -> &TensorIndex {
        &self.tensored
    }

    pub fn dimension(&self) -> usize {
        self.basis.dimension()
    }

    pub fn dimension_in(&self, grading: Grading) -> usize {
        self.basis.dimension_in(grading)
    }

    pub fn generators(&self) -> Vec<&BasisElement> {
        self.basis
            .indexed_elements()
            .map(|(_, el)| el)
            .filter(|el| el.generator)
            .collect()
    }

    pub fn primitives(&self) -> Vec<&BasisElement> {
        self.basis
            .indexed_elements()
            .map(|(_, el)| el)
            .filter(|el| el.primitive.is_some())
            .collect()
    }

    /// Drop the tensor rows that vanish identically. This already happens on construction, and
    /// running it again changes nothing.
    pub fn reduce(&mut self) {
        tensor::drop_zero_rows(&mut self.coaction, &mut self.tensored);
    }

    /// The total number of coaction rows and the number of those that are zero.
    pub fn zero_row_statistics(&self) -> (usize, usize) {
        tensor::zero_row_statistics(&self.coaction)
    }

    /// The coproduct as a table, one element per line.
    ///
    /// Over $\mathbb{F}_2$ each term is written `a|b`, otherwise `c*a|b`.
    pub fn coaction_to_string(&self) -> String {
        let mut result = String::new();
        for (&grade, matrix) in &self.coaction {
            let entries = self.tensored.get(&grade).map_or(&[][..], Vec::as_slice);
            for (column, el) in self.basis.elements_in(grade).iter().enumerate() {
                let terms = matrix
                    .iter()
                    .zip(entries)
                    .filter(|(row, _)| row.entry(column) != 0)
                    .map(|(row, &(a, b))| {
                        let a = self.basis.element(a).compact_name();
                        let b = self.basis.element(b).compact_name();
                        if self.p == 2 {
                            format!("{a}|{b}")
                        } else {
                            format!("{}*{a}|{b}", row.entry(column))
                        }
                    })
                    .join(" + ");
                result += &format!("{} : {terms}\n", el.compact_name());
            }
        }
        result
    }
}

/// Number the elements whose coproduct has exactly two terms, the counit term and one more.
fn set_primitives(basis: &mut Basis, coaction: &GradedMap) {
    let mut primitive_index = 0;
    for (grade, elements) in basis.iter_mut() {
        let matrix = &coaction[&grade];
        for (column, el) in elements.iter_mut().enumerate() {
            let terms = matrix
                .iter()
                .filter(|row| row.entry(column) != 0)
                .take(3)
                .count();
            el.primitive = if terms == 2 {
                primitive_index += 1;
                Some(primitive_index - 1)
            } else {
                None
            };
        }
    }
}
