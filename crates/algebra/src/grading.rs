use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Neg, Sub},
};

use serde::{Deserialize, Serialize};

/// A bidegree `(primary, secondary)`.
///
/// Gradings are ordered lexicographically, which is the order every graded structure in this crate
/// is iterated in. Truncation only looks at the primary component, see [`Grading::within`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Grading {
    pub primary: i32,
    pub secondary: i32,
}

impl Grading {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(primary: i32, secondary: i32) -> Self {
        Self { primary, secondary }
    }

    /// Whether `self` survives truncation at `limit`. The secondary component is ignored.
    ///
    /// # Example
    /// ```
    /// # use algebra::Grading;
    /// let limit = Grading::new(3, 0);
    /// assert!(Grading::new(3, 7).within(limit));
    /// assert!(!Grading::new(4, -1).within(limit));
    /// ```
    pub const fn within(self, limit: Self) -> bool {
        self.primary <= limit.primary
    }

    pub const fn is_zero(self) -> bool {
        self.primary == 0 && self.secondary == 0
    }
}

impl From<(i32, i32)> for Grading {
    fn from((primary, secondary): (i32, i32)) -> Self {
        Self::new(primary, secondary)
    }
}

impl From<Grading> for (i32, i32) {
    fn from(g: Grading) -> Self {
        (g.primary, g.secondary)
    }
}

impl Display for Grading {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.primary, self.secondary)
    }
}

impl Add for Grading {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.primary + rhs.primary, self.secondary + rhs.secondary)
    }
}

impl Sub for Grading {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.primary - rhs.primary, self.secondary - rhs.secondary)
    }
}

impl Neg for Grading {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.primary, -self.secondary)
    }
}
