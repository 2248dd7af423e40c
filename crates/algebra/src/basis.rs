use std::{
    collections::BTreeMap,
    fmt::{self, Display, Formatter},
};

use fp::matrix::Matrix;
use serde::Serialize;

use crate::grading::Grading;

/// A basis element is identified by its grade and its position in the list of elements of that
/// grade.
pub type BasisIndex = (Grading, usize);

/// A family of matrices, one per grade. Which dimensions the matrix at a grade has depends on the
/// map it represents, but there are never entries between different grades.
pub type GradedMap = BTreeMap<Grading, Matrix>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BasisElement {
    pub grading: Grading,
    pub name: String,
    /// Whether this element was introduced as the generator of a free comodule.
    pub generator: bool,
    /// Set when the coaction of this element has exactly one term besides `1 ⊗ x`. Primitives are
    /// numbered consecutively in the order they are found.
    pub primitive: Option<usize>,
    /// The free summand this element belongs to, if it lives in a free comodule.
    pub generated_index: Option<usize>,
}

impl BasisElement {
    pub fn new(grading: Grading, name: impl Into<String>) -> Self {
        Self {
            grading,
            name: name.into(),
            generator: false,
            primitive: None,
            generated_index: None,
        }
    }

    #[must_use]
    pub fn with_generator(mut self, generator: bool) -> Self {
        self.generator = generator;
        self
    }

    /// The basis element `a ⊗ b` of a tensor product.
    ///
    /// # Example
    /// ```
    /// # use algebra::{BasisElement, Grading};
    /// let a = BasisElement::new(Grading::new(1, 0), "h0");
    /// let b = BasisElement::new(Grading::new(2, 1), "g");
    /// let t = BasisElement::tensor(&a, &b);
    /// assert_eq!(t.name, "h0 | g");
    /// assert_eq!(t.grading, Grading::new(3, 1));
    /// ```
    pub fn tensor(a: &Self, b: &Self) -> Self {
        Self::new(a.grading + b.grading, format!("{} | {}", a.name, b.name))
    }

    /// The name with all whitespace removed, as used in coaction tables.
    pub fn compact_name(&self) -> String {
        self.name.split_whitespace().collect()
    }
}

impl Display for BasisElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A graded basis. The position of an element in the list of its grade is its identity, so
/// elements are only ever appended, never reordered. Grades with no elements are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basis {
    elements: BTreeMap<Grading, Vec<BasisElement>>,
}

impl Basis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to the list of its grade and return its index.
    pub fn push(&mut self, element: BasisElement) -> BasisIndex {
        let grading = element.grading;
        let list = self.elements.entry(grading).or_default();
        list.push(element);
        (grading, list.len() - 1)
    }

    /// Append a list of elements at `grading`. Every element must have that grading.
    pub fn extend_grade(&mut self, grading: Grading, elements: Vec<BasisElement>) {
        assert!(
            elements.iter().all(|el| el.grading == grading),
            "basis element placed in the wrong grade {grading}"
        );
        if !elements.is_empty() {
            self.elements.entry(grading).or_default().extend(elements);
        }
    }

    pub fn get(&self, grading: Grading) -> Option<&[BasisElement]> {
        self.elements.get(&grading).map(Vec::as_slice)
    }

    /// The elements at `grading`, empty if there are none.
    pub fn elements_in(&self, grading: Grading) -> &[BasisElement] {
        self.get(grading).unwrap_or_default()
    }

    pub fn element(&self, (grading, index): BasisIndex) -> &BasisElement {
        &self.elements[&grading][index]
    }

    pub fn contains(&self, grading: Grading) -> bool {
        self.elements.contains_key(&grading)
    }

    pub fn grades(&self) -> impl Iterator<Item = Grading> + '_ {
        self.elements.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Grading, &[BasisElement])> + '_ {
        self.elements.iter().map(|(&g, v)| (g, v.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Grading, &mut Vec<BasisElement>)> + '_ {
        self.elements.iter_mut().map(|(&g, v)| (g, v))
    }

    /// Iterate over every element together with its index, in grade order.
    pub fn indexed_elements(&self) -> impl Iterator<Item = (BasisIndex, &BasisElement)> + '_ {
        self.elements.iter().flat_map(|(&g, v)| {
            v.iter()
                .enumerate()
                .map(move |(i, el)| ((g, i), el))
        })
    }

    pub fn dimension(&self) -> usize {
        self.elements.values().map(Vec::len).sum()
    }

    pub fn dimension_in(&self, grading: Grading) -> usize {
        self.elements_in(grading).len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The grades of this basis within `limit`, in ascending order.
    pub fn sorted_grades_within(&self, limit: Grading) -> Vec<Grading> {
        self.grades().filter(|g| g.within(limit)).collect()
    }

    /// A copy of this basis with every element moved up by `shift`, keeping only the grades whose
    /// original grading lies within `limit`. The elements keep their names and flags.
    pub fn shifted(&self, shift: Grading, limit: Option<Grading>) -> Self {
        let elements = self
            .elements
            .iter()
            .filter(|(g, _)| limit.map_or(true, |limit| g.within(limit)))
            .map(|(&g, list)| {
                let list = list
                    .iter()
                    .map(|el| BasisElement {
                        grading: el.grading + shift,
                        ..el.clone()
                    })
                    .collect();
                (g + shift, list)
            })
            .collect();
        Self { elements }
    }
}

impl FromIterator<BasisElement> for Basis {
    fn from_iter<T: IntoIterator<Item = BasisElement>>(iter: T) -> Self {
        let mut basis = Self::new();
        for el in iter {
            basis.push(el);
        }
        basis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Basis {
        [
            BasisElement::new(Grading::new(1, 0), "x"),
            BasisElement::new(Grading::ZERO, "1").with_generator(true),
            BasisElement::new(Grading::new(1, 0), "y"),
            BasisElement::new(Grading::new(3, 1), "z"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn insertion_order_within_grade() {
        let basis = sample();
        assert_eq!(basis.dimension(), 4);
        assert_eq!(basis.dimension_in(Grading::new(1, 0)), 2);
        assert_eq!(basis.dimension_in(Grading::new(2, 0)), 0);
        assert_eq!(basis.element((Grading::new(1, 0), 1)).name, "y");

        let names: Vec<_> = basis
            .indexed_elements()
            .map(|(_, el)| el.name.as_str())
            .collect();
        assert_eq!(names, ["1", "x", "y", "z"]);
    }

    #[test]
    fn truncation() {
        let basis = sample();
        assert_eq!(
            basis.sorted_grades_within(Grading::new(1, -5)),
            vec![Grading::ZERO, Grading::new(1, 0)]
        );

        let shifted = basis.shifted(Grading::new(2, 1), Some(Grading::new(1, 0)));
        assert_eq!(shifted.dimension(), 3);
        assert_eq!(
            shifted.grades().collect::<Vec<_>>(),
            vec![Grading::new(2, 1), Grading::new(3, 1)]
        );
        let unit = shifted.element((Grading::new(2, 1), 0));
        assert!(unit.generator);
        assert_eq!(unit.grading, Grading::new(2, 1));
    }

    #[test]
    fn compact_name() {
        let el = BasisElement::new(Grading::ZERO, "xi_1^2 xi_2 | a");
        assert_eq!(el.compact_name(), "xi_1^2xi_2|a");
    }
}
