//! Index tables for tensor products `A ⊗ M` of graded bases.
//!
//! A basis element of `A ⊗ M` is addressed in two ways. A [`TensorIndex`] lists, for each total
//! grade, the pairs `(a, m)` making up the tensor basis in that grade, so a row of a coaction
//! matrix can be decoded. A [`ModuleIndex`] goes the other way: for a module element `m` and an
//! algebra grade, it lists where each `a ⊗ m` sits in the tensor basis. The two tables are built
//! together by [`build_tensor_index`] and are inverse to each other.
//!
//! Only the grades present in the module basis are considered, so the tensor product is cut off
//! at the same grades as the module.

use std::collections::BTreeMap;

use fp::{matrix::Matrix, prime::ValidPrime};

use crate::{
    basis::{Basis, BasisIndex, GradedMap},
    error::StructureError,
    grading::Grading,
};

/// Tensor grade -> list of `(algebra element, module element)`.
pub type TensorIndex = BTreeMap<Grading, Vec<(BasisIndex, BasisIndex)>>;

/// Module grade -> module index -> algebra grade -> positions of `a ⊗ m` in the tensor basis,
/// listed in the order of the algebra elements of that grade.
pub type ModuleIndex = BTreeMap<Grading, Vec<BTreeMap<Grading, Vec<BasisIndex>>>>;

/// Build the tensor basis of `algebra ⊗ module`, restricted to the grades of `module`.
///
/// The tensor elements are enumerated by module grade, then module index, then algebra grade, then
/// algebra index. In particular, for a fixed module element and algebra grade, the tensor
/// elements are contiguous.
pub fn build_tensor_index(algebra: &Basis, module: &Basis) -> (TensorIndex, ModuleIndex) {
    let mut tensored = TensorIndex::new();
    let mut moduled = ModuleIndex::new();

    for (module_grade, module_elements) in module.iter() {
        let blocks = moduled.entry(module_grade).or_default();
        for module_index in 0..module_elements.len() {
            let mut block = BTreeMap::new();
            for (algebra_grade, algebra_elements) in algebra.iter() {
                let grade = module_grade + algebra_grade;
                if !module.contains(grade) {
                    continue;
                }
                let target = tensored.entry(grade).or_default();
                let mut positions = Vec::with_capacity(algebra_elements.len());
                for algebra_index in 0..algebra_elements.len() {
                    positions.push((grade, target.len()));
                    target.push(((algebra_grade, algebra_index), (module_grade, module_index)));
                }
                block.insert(algebra_grade, positions);
            }
            blocks.push(block);
        }
    }
    (tensored, moduled)
}

/// Check that `tensored` and `moduled` are inverse to each other.
pub fn verify_module_index(
    tensored: &TensorIndex,
    moduled: &ModuleIndex,
) -> Result<(), StructureError> {
    // tensored -> moduled -> tensored
    for (&grade, entries) in tensored {
        for (index, &((a_gr, a_id), (m_gr, m_id))) in entries.iter().enumerate() {
            let err = |reason| StructureError::TensorIndex {
                grading: grade,
                index,
                reason,
            };
            if a_gr + m_gr != grade {
                return Err(err("grading is not the sum of its factors"));
            }
            let position = moduled
                .get(&m_gr)
                .and_then(|blocks| blocks.get(m_id))
                .and_then(|block| block.get(&a_gr))
                .and_then(|positions| positions.get(a_id))
                .ok_or_else(|| err("missing from the module index"))?;
            if *position != (grade, index) {
                return Err(err("module index points elsewhere"));
            }
        }
    }

    // moduled -> tensored -> moduled
    for (&m_gr, blocks) in moduled {
        for (m_id, block) in blocks.iter().enumerate() {
            for (&a_gr, positions) in block {
                for (a_id, &(t_gr, t_id)) in positions.iter().enumerate() {
                    let err = |reason| StructureError::TensorIndex {
                        grading: t_gr,
                        index: t_id,
                        reason,
                    };
                    if a_gr + m_gr != t_gr {
                        return Err(err("grading is not the sum of its factors"));
                    }
                    let entry = tensored
                        .get(&t_gr)
                        .and_then(|entries| entries.get(t_id))
                        .ok_or_else(|| err("missing from the tensor index"))?;
                    if *entry != ((a_gr, a_id), (m_gr, m_id)) {
                        return Err(err("tensor index points elsewhere"));
                    }
                }
            }
        }
    }
    Ok(())
}

/// Check that every entry of `tensored` refers to existing elements of `algebra` and `module`, and
/// sits in a grade of `module`.
pub fn verify_tensor_index(
    algebra: &Basis,
    module: &Basis,
    tensored: &TensorIndex,
) -> Result<(), StructureError> {
    for (&grade, entries) in tensored {
        if !module.contains(grade) {
            return Err(StructureError::MissingGrade {
                grading: grade,
                what: "module basis of a tensor grade",
            });
        }
        for (index, &((a_gr, a_id), (m_gr, m_id))) in entries.iter().enumerate() {
            let err = |reason| StructureError::TensorIndex {
                grading: grade,
                index,
                reason,
            };
            if a_gr + m_gr != grade {
                return Err(err("grading is not the sum of its factors"));
            }
            if a_id >= algebra.dimension_in(a_gr) {
                return Err(err("algebra element does not exist"));
            }
            if m_id >= module.dimension_in(m_gr) {
                return Err(err("module element does not exist"));
            }
        }
    }
    Ok(())
}

/// Check that `coaction` has one matrix over `p` for every grade of `module`, of shape
/// `(tensor dimension, module dimension)`.
pub(crate) fn check_coaction_shapes(
    p: ValidPrime,
    module: &Basis,
    coaction: &GradedMap,
    tensored: &TensorIndex,
) -> Result<(), StructureError> {
    for (grade, elements) in module.iter() {
        let matrix = coaction
            .get(&grade)
            .ok_or(StructureError::MissingGrade {
                grading: grade,
                what: "coaction",
            })?;
        if matrix.prime() != p {
            return Err(StructureError::PrimeMismatch {
                expected: p,
                found: matrix.prime(),
            });
        }
        let expected = (tensored.get(&grade).map_or(0, Vec::len), elements.len());
        let found = (matrix.rows(), matrix.columns());
        if expected != found {
            return Err(StructureError::Shape {
                grading: grade,
                what: "coaction",
                expected,
                found,
            });
        }
    }
    if let Some(&grading) = coaction.keys().find(|&&g| !module.contains(g)) {
        return Err(StructureError::MissingGrade {
            grading,
            what: "basis of a coaction grade",
        });
    }
    Ok(())
}

/// Check that each tensor row `1 ⊗ m` is the dual of `m`: coefficient one in the column of `m` and
/// zero in every other column. Here `1` is the first coalgebra element of grade zero.
pub(crate) fn check_counit(
    coaction: &GradedMap,
    tensored: &TensorIndex,
) -> Result<(), StructureError> {
    for (&grade, entries) in tensored {
        let Some(matrix) = coaction.get(&grade) else {
            continue;
        };
        for (row, &((a_gr, a_id), (m_gr, m_id))) in entries.iter().enumerate() {
            if !a_gr.is_zero() || a_id != 0 {
                continue;
            }
            let dual = matrix[row]
                .iter_nonzero()
                .all(|(column, c)| column == m_id && c == 1);
            if m_gr != grade || matrix.entry(row, m_id) != 1 || !dual {
                return Err(StructureError::Counit {
                    grading: grade,
                    column: m_id,
                });
            }
        }
    }
    Ok(())
}

/// Drop the tensor rows that vanish in every column of the coaction, from both the coaction and
/// the tensor index. Returns whether anything was dropped.
pub(crate) fn drop_zero_rows(coaction: &mut GradedMap, tensored: &mut TensorIndex) -> bool {
    let mut changed = false;
    for (grade, matrix) in coaction.iter_mut() {
        let Some(entries) = tensored.get_mut(grade) else {
            continue;
        };
        let keep: Vec<usize> = (0..matrix.rows())
            .filter(|&r| !matrix[r].is_zero())
            .collect();
        if keep.len() == matrix.rows() {
            continue;
        }
        changed = true;
        *entries = keep.iter().map(|&r| entries[r]).collect();
        let vectors = keep.iter().map(|&r| matrix[r].clone()).collect();
        *matrix = Matrix::from_rows(matrix.prime(), vectors, matrix.columns());
    }
    tensored.retain(|_, entries| !entries.is_empty());
    changed
}

/// Returns `(rows, zero_rows)` over all grades of a coaction.
pub(crate) fn zero_row_statistics(coaction: &GradedMap) -> (usize, usize) {
    coaction.values().fold((0, 0), |(total, zero), m| {
        (
            total + m.rows(),
            zero + m.iter().filter(|row| row.is_zero()).count(),
        )
    })
}
