use std::fmt::{self, Display, Formatter};

use fp::prime::ValidPrime;

use crate::grading::Grading;

/// A coalgebra, comodule or morphism whose data is not internally consistent.
///
/// This is returned by the checked constructors, which are meant for data coming from outside the
/// crate. Everything built by the crate itself is consistent by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    PrimeMismatch {
        expected: ValidPrime,
        found: ValidPrime,
    },
    /// A grade of the basis has no coaction matrix, or the other way around.
    MissingGrade {
        grading: Grading,
        what: &'static str,
    },
    Shape {
        grading: Grading,
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// The tensor index and the module index do not describe the same bijection, or one of them
    /// points outside its basis.
    TensorIndex {
        grading: Grading,
        index: usize,
        reason: &'static str,
    },
    /// The coaction of the element in the given column does not contain `1 ⊗ x` with coefficient
    /// one.
    Counit {
        grading: Grading,
        column: usize,
    },
    /// Two objects that should share a coalgebra or a comodule do not.
    Incompatible(&'static str),
}

impl Display for StructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimeMismatch { expected, found } => {
                write!(f, "expected data over F_{expected}, found F_{found}")
            }
            Self::MissingGrade { grading, what } => {
                write!(f, "{what} is missing at grade {grading}")
            }
            Self::Shape {
                grading,
                what,
                expected,
                found,
            } => write!(
                f,
                "{what} at grade {grading} has shape {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::TensorIndex {
                grading,
                index,
                reason,
            } => write!(f, "tensor element {index} at grade {grading}: {reason}"),
            Self::Counit { grading, column } => write!(
                f,
                "coaction of element {column} at grade {grading} does not contain 1 ⊗ x"
            ),
            Self::Incompatible(reason) => f.write_str(reason),
        }
    }
}

impl std::error::Error for StructureError {}
