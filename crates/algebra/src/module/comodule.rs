use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use fp::{matrix::Matrix, prime::ValidPrime};
use itertools::Itertools;

use crate::{
    algebra::CoAlgebra,
    basis::{Basis, BasisElement, BasisIndex, GradedMap},
    error::StructureError,
    grading::Grading,
    tensor::{self, build_tensor_index, ModuleIndex, TensorIndex},
};

/// A graded comodule over a [`CoAlgebra`].
///
/// The coaction at grade `g` has one column per basis element at `g` and one row per element of the
/// tensor basis `A ⊗ M` at `g`, as listed in [`CoModule::tensored`]. The tensor index need not
/// cover the whole tensor product. Comodules built from the full tensor product also carry the
/// inverse [`ModuleIndex`], which is what [`CoModule::module_index`] returns.
#[derive(Debug, Clone)]
pub struct CoModule {
    coalgebra: Arc<CoAlgebra>,
    basis: Basis,
    coaction: GradedMap,
    tensored: TensorIndex,
    moduled: Option<ModuleIndex>,
}

impl CoModule {
    /// Construct a comodule from a basis and its coaction. If `tensored` is `None`, the coaction
    /// is interpreted with respect to the full tensor basis produced by
    /// [`tensor::build_tensor_index`], and the module index is kept.
    pub fn try_new(
        coalgebra: Arc<CoAlgebra>,
        basis: Basis,
        coaction: GradedMap,
        tensored: Option<TensorIndex>,
    ) -> Result<Self, StructureError> {
        let (tensored, moduled) = match tensored {
            Some(tensored) => (tensored, None),
            None => {
                let (tensored, moduled) = build_tensor_index(coalgebra.basis(), &basis);
                (tensored, Some(moduled))
            }
        };
        let module = Self {
            coalgebra,
            basis,
            coaction,
            tensored,
            moduled,
        };
        module.verify()?;
        Ok(module)
    }

    /// Panics if the data is inconsistent. See [`CoModule::try_new`].
    pub fn new(
        coalgebra: Arc<CoAlgebra>,
        basis: Basis,
        coaction: GradedMap,
        tensored: Option<TensorIndex>,
    ) -> Self {
        Self::try_new(coalgebra, basis, coaction, tensored)
            .unwrap_or_else(|e| panic!("Invalid comodule: {e}"))
    }

    /// Assemble a comodule out of data that is consistent by construction. Nothing is checked;
    /// callers that want the invariants confirmed run [`CoModule::verify`].
    pub(crate) fn from_parts(
        coalgebra: Arc<CoAlgebra>,
        basis: Basis,
        coaction: GradedMap,
        tensored: TensorIndex,
        moduled: Option<ModuleIndex>,
    ) -> Self {
        Self {
            coalgebra,
            basis,
            coaction,
            tensored,
            moduled,
        }
    }

    /// Check the coaction shapes, the tensor and module indices and the counit law.
    pub fn verify(&self) -> Result<(), StructureError> {
        let p = self.prime();
        tensor::check_coaction_shapes(p, &self.basis, &self.coaction, &self.tensored)?;
        tensor::verify_tensor_index(self.coalgebra.basis(), &self.basis, &self.tensored)?;
        if let Some(moduled) = &self.moduled {
            tensor::verify_module_index(&self.tensored, moduled)?;
        }
        tensor::check_counit(&self.coaction, &self.tensored)
    }

    /// The zero comodule over `coalgebra`.
    pub fn zero(coalgebra: Arc<CoAlgebra>) -> Self {
        Self {
            coalgebra,
            basis: Basis::new(),
            coaction: GradedMap::new(),
            tensored: TensorIndex::new(),
            moduled: Some(ModuleIndex::new()),
        }
    }

    /// The zero comodule over the same coalgebra.
    pub fn zero_module(&self) -> Self {
        Self::zero(Arc::clone(&self.coalgebra))
    }

    /// The ground field, concentrated in grade zero. The coalgebra must have a single element in
    /// grade zero.
    pub fn fp_module(coalgebra: Arc<CoAlgebra>) -> Self {
        assert_eq!(
            coalgebra.dimension_in(Grading::ZERO),
            1,
            "the ground field is only a comodule when the unit spans grade zero"
        );
        let p = coalgebra.prime();
        let basis: Basis = std::iter::once(BasisElement::new(Grading::ZERO, "F_p")).collect();
        let (tensored, moduled) = build_tensor_index(coalgebra.basis(), &basis);
        let mut coaction = GradedMap::new();
        coaction.insert(Grading::ZERO, Matrix::identity(p, 1));
        Self::from_parts(coalgebra, basis, coaction, tensored, Some(moduled))
    }

    /// The free comodule on one generator in grade `shift`, that is the coalgebra itself moved up
    /// by `shift`. Every element is renamed to `"x | name"` and remembers `index` as the free
    /// summand it belongs to. The image of the unit is the generator.
    pub fn free_module(coalgebra: Arc<CoAlgebra>, shift: Grading, index: usize, name: &str) -> Self {
        Self::free_module_truncated(coalgebra, shift, index, name, None)
    }

    /// The free comodule of [`CoModule::free_module`], keeping only the part coming from elements
    /// of the coalgebra whose grading lies within `limit`.
    pub fn free_module_limit(
        coalgebra: Arc<CoAlgebra>,
        shift: Grading,
        index: usize,
        name: &str,
        limit: Grading,
    ) -> Self {
        Self::free_module_truncated(coalgebra, shift, index, name, Some(limit))
    }

    fn free_module_truncated(
        coalgebra: Arc<CoAlgebra>,
        shift: Grading,
        index: usize,
        name: &str,
        limit: Option<Grading>,
    ) -> Self {
        let keep = |g: &Grading| limit.map_or(true, |limit| g.within(limit));

        let mut basis = coalgebra.basis().shifted(shift, limit);
        for (grade, elements) in basis.iter_mut() {
            for el in elements {
                el.name = format!("{} | {name}", el.name);
                el.generator = grade == shift;
                el.generated_index = Some(index);
            }
        }

        let tensored = coalgebra
            .tensored()
            .iter()
            .filter(|(g, _)| keep(g))
            .map(|(&g, entries)| {
                let entries = entries
                    .iter()
                    .map(|&(a, (m_gr, m_id))| (a, (m_gr + shift, m_id)))
                    .collect();
                (g + shift, entries)
            })
            .collect();

        let coaction = coalgebra
            .coaction()
            .iter()
            .filter(|(g, _)| keep(g))
            .map(|(&g, m)| (g + shift, m.clone()))
            .collect();

        Self::from_parts(coalgebra, basis, coaction, tensored, None)
    }

    /// Re-express the coaction in terms of the full tensor basis, so that the module index is
    /// available. Returns a copy if it already is.
    pub fn with_module_index(&self) -> Self {
        if self.moduled.is_some() {
            return self.clone();
        }
        let p = self.prime();
        let (tensored, moduled) = build_tensor_index(self.coalgebra.basis(), &self.basis);
        let coaction = self
            .coaction
            .iter()
            .map(|(&grade, old)| {
                let rows = tensored.get(&grade).map_or(0, Vec::len);
                let mut matrix = Matrix::new(p, rows, old.columns());
                let entries = self.tensored.get(&grade).map_or(&[][..], Vec::as_slice);
                for (row, &((a_gr, a_id), (m_gr, m_id))) in old.iter().zip(entries) {
                    let (t_gr, t_id) = moduled[&m_gr][m_id][&a_gr][a_id];
                    debug_assert_eq!(t_gr, grade);
                    matrix[t_id] = row.clone();
                }
                (grade, matrix)
            })
            .collect();
        Self::from_parts(
            Arc::clone(&self.coalgebra),
            self.basis.clone(),
            coaction,
            tensored,
            Some(moduled),
        )
    }

    pub fn prime(&self) -> ValidPrime {
        self.coalgebra.prime()
    }

    pub fn coalgebra(&self) -> &Arc<CoAlgebra> {
        &self.coalgebra
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

    pub fn module_index(&self) -> Option<&ModuleIndex> {
        self.moduled.as_ref()
    }

    /// Vector space dimension
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

    pub fn primitive_indices(&self) -> Vec<BasisIndex> {
        self.basis
            .indexed_elements()
            .filter(|(_, el)| el.primitive.is_some())
            .map(|(index, _)| index)
            .collect()
    }

    /// The generator of the free summand `generated_index`.
    pub fn find_generator(&self, generated_index: usize) -> Option<BasisIndex> {
        let mut found = self
            .basis
            .indexed_elements()
            .filter(|(_, el)| el.generator && el.generated_index == Some(generated_index))
            .map(|(index, _)| index);
        let result = found.next();
        debug_assert!(
            found.next().is_none(),
            "free summand {generated_index} has several generators"
        );
        result
    }

    /// Scan `matrix` row by row and return the first nonzero entry, together with the basis element
    /// at `grade` indexed by its column.
    pub fn lowest_graded_index_from_matrix(
        &self,
        grade: Grading,
        matrix: &Matrix,
    ) -> Option<(&BasisElement, usize, usize)> {
        matrix.iter().enumerate().find_map(|(row, v)| {
            let (column, _) = v.first_nonzero()?;
            Some((&self.basis.elements_in(grade)[column], row, column))
        })
    }

    /// The tensor basis `A ⊗ M` as listed in the tensor index, with names `"a | m"`.
    pub fn tensor_basis(&self) -> Basis {
        let mut result = Basis::new();
        for (&grade, entries) in &self.tensored {
            let elements = entries
                .iter()
                .map(|&(a, m)| {
                    BasisElement::tensor(self.coalgebra.basis().element(a), self.basis.element(m))
                })
                .collect();
            result.extend_grade(grade, elements);
        }
        result
    }

    /// `"0"` for the zero comodule, otherwise one `A` per generator, e.g. `"A⊕A"`.
    pub fn symbol(&self) -> String {
        if self.basis.is_empty() {
            return "0".to_string();
        }
        std::iter::repeat("A")
            .take(self.generators().len())
            .join("⊕")
    }

    /// Drop the tensor rows on which the coaction vanishes. The module index no longer matches the
    /// tensor index afterwards and is discarded.
    pub fn reduce(&mut self) {
        if tensor::drop_zero_rows(&mut self.coaction, &mut self.tensored) {
            self.moduled = None;
        }
    }

    pub fn zero_row_statistics(&self) -> (usize, usize) {
        tensor::zero_row_statistics(&self.coaction)
    }

    /// The coaction of every element as a list of `(coefficient, algebra element, module element)`
    /// terms, keyed by the element.
    pub fn coaction_terms(&self) -> BTreeMap<BasisIndex, Vec<(u32, BasisIndex, BasisIndex)>> {
        let mut result = BTreeMap::new();
        for (&grade, matrix) in &self.coaction {
            let entries = self.tensored.get(&grade).map_or(&[][..], Vec::as_slice);
            for column in 0..matrix.columns() {
                let terms = matrix
                    .iter()
                    .zip(entries)
                    .filter_map(|(row, &(a, m))| {
                        let c = row.entry(column);
                        (c != 0).then_some((c, a, m))
                    })
                    .collect();
                result.insert((grade, column), terms);
            }
        }
        result
    }
}

impl Display for CoModule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Elements | {} Generators",
            self.dimension(),
            self.generators().len()
        )
    }
}
