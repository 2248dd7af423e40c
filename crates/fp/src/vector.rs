//! Vectors over $\mathbb{F}_p$.
//!
//! [`FpVector`] is an enum over two representations. Over $\mathbb{F}_2$ the entries are packed
//! into `u64` limbs and addition is a limbwise XOR. Over every other prime each entry occupies a
//! `u32` and arithmetic is done in `u64` before reducing. Binary operations panic if the two
//! operands live over different primes.

use std::fmt;

use itertools::Itertools;

use crate::prime::ValidPrime;

type Limb = u64;
const BITS_PER_LIMB: usize = Limb::BITS as usize;

/// A bit-packed vector over $\mathbb{F}_2$. Bits past `len` are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FpVector2 {
    len: usize,
    limbs: Vec<Limb>,
}

/// A vector over an arbitrary prime with entries stored in `0..p`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FpVectorBig {
    p: ValidPrime,
    entries: Vec<u32>,
}

impl FpVector2 {
    fn new(len: usize) -> Self {
        Self {
            len,
            limbs: vec![0; len.div_ceil(BITS_PER_LIMB)],
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn limb_bit(&self, index: usize) -> (usize, usize) {
        assert!(
            index < self.len,
            "index {index} out of bounds for vector of length {}",
            self.len
        );
        (index / BITS_PER_LIMB, index % BITS_PER_LIMB)
    }

    fn entry(&self, index: usize) -> u32 {
        let (limb, bit) = self.limb_bit(index);
        ((self.limbs[limb] >> bit) & 1) as u32
    }

    fn set_entry(&mut self, index: usize, value: u32) {
        let (limb, bit) = self.limb_bit(index);
        self.limbs[limb] &= !((1 as Limb) << bit);
        self.limbs[limb] |= ((value & 1) as Limb) << bit;
    }

    fn add_basis_element(&mut self, index: usize, value: u32) {
        let (limb, bit) = self.limb_bit(index);
        self.limbs[limb] ^= ((value & 1) as Limb) << bit;
    }

    fn add(&mut self, other: &Self, c: u32) {
        if c & 1 == 0 {
            return;
        }
        for (target, source) in self.limbs.iter_mut().zip_eq(&other.limbs) {
            *target ^= source;
        }
    }

    fn scale(&mut self, c: u32) {
        if c & 1 == 0 {
            self.set_to_zero();
        }
    }

    fn set_to_zero(&mut self) {
        self.limbs.fill(0);
    }

    fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&limb| limb == 0)
    }

    fn first_nonzero(&self) -> Option<(usize, u32)> {
        self.limbs
            .iter()
            .enumerate()
            .find(|(_, &limb)| limb != 0)
            .map(|(i, limb)| (i * BITS_PER_LIMB + limb.trailing_zeros() as usize, 1))
    }
}

impl FpVectorBig {
    fn new(p: ValidPrime, len: usize) -> Self {
        Self {
            p,
            entries: vec![0; len],
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> u32 {
        self.entries[index]
    }

    fn set_entry(&mut self, index: usize, value: u32) {
        self.entries[index] = value % self.p.as_u32();
    }

    fn add_basis_element(&mut self, index: usize, value: u32) {
        self.entries[index] = self.p.sum(self.entries[index], value % self.p.as_u32());
    }

    fn add(&mut self, other: &Self, c: u32) {
        let c = c % self.p.as_u32();
        if c == 0 {
            return;
        }
        let p = self.p.as_u32() as u64;
        let c = c as u64;
        for (target, &source) in self.entries.iter_mut().zip_eq(&other.entries) {
            *target = ((*target as u64 + c * source as u64) % p) as u32;
        }
    }

    fn scale(&mut self, c: u32) {
        let p = self.p;
        for entry in &mut self.entries {
            *entry = p.product(*entry, c);
        }
    }

    fn set_to_zero(&mut self) {
        self.entries.fill(0);
    }

    fn is_zero(&self) -> bool {
        self.entries.iter().all(|&x| x == 0)
    }

    fn first_nonzero(&self) -> Option<(usize, u32)> {
        self.entries
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, x)| x != 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FpVector {
    _2(FpVector2),
    Big(FpVectorBig),
}

macro_rules! dispatch_vector {
    () => {};
    ($vis:vis fn $method:ident(&self $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?; $($tail:tt)*) => {
        $vis fn $method(&self, $($arg: $ty),*) $(-> $ret)? {
            match self {
                Self::_2(x) => x.$method($($arg),*),
                Self::Big(x) => x.$method($($arg),*),
            }
        }
        dispatch_vector!{$($tail)*}
    };
    ($vis:vis fn $method:ident(&mut self $(, $arg:ident: $ty:ty)*) $(-> $ret:ty)?; $($tail:tt)*) => {
        $vis fn $method(&mut self, $($arg: $ty),*) $(-> $ret)? {
            match self {
                Self::_2(x) => x.$method($($arg),*),
                Self::Big(x) => x.$method($($arg),*),
            }
        }
        dispatch_vector!{$($tail)*}
    };
}

impl FpVector {
    pub fn new(p: ValidPrime, len: usize) -> Self {
        if p == 2 {
            Self::_2(FpVector2::new(len))
        } else {
            Self::Big(FpVectorBig::new(p, len))
        }
    }

    /// Build a vector from a slice of entries. The entries are reduced mod `p`.
    pub fn from_slice(p: ValidPrime, slice: &[u32]) -> Self {
        let mut result = Self::new(p, slice.len());
        for (i, &x) in slice.iter().enumerate() {
            result.set_entry(i, x);
        }
        result
    }

    pub fn prime(&self) -> ValidPrime {
        match self {
            Self::_2(_) => crate::prime::TWO,
            Self::Big(x) => x.p,
        }
    }

    dispatch_vector! {
        pub fn len(&self) -> usize;
        pub fn entry(&self, index: usize) -> u32;
        pub fn set_entry(&mut self, index: usize, value: u32);
        pub fn add_basis_element(&mut self, index: usize, value: u32);
        pub fn scale(&mut self, c: u32);
        pub fn set_to_zero(&mut self);
        pub fn is_zero(&self) -> bool;
        pub fn first_nonzero(&self) -> Option<(usize, u32)>;
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add `c` times `other` to `self`.
    pub fn add(&mut self, other: &Self, c: u32) {
        assert_eq!(self.len(), other.len(), "adding vectors of different lengths");
        match (self, other) {
            (Self::_2(x), Self::_2(y)) => x.add(y, c),
            (Self::Big(x), Self::Big(y)) if x.p == y.p => x.add(y, c),
            (x, y) => panic!(
                "adding vectors over different primes {} and {}",
                x.prime(),
                y.prime()
            ),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).map(move |i| self.entry(i))
    }

    /// Iterate over the `(index, value)` pairs of nonzero entries.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.iter().enumerate().filter(|&(_, x)| x != 0)
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Copy the entries `start..end` into a new vector.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        assert!(start <= end && end <= self.len());
        let mut result = Self::new(self.prime(), end - start);
        for (i, x) in self.iter_nonzero().filter(|&(i, _)| i >= start && i < end) {
            result.set_entry(i - start, x);
        }
        result
    }
}

impl fmt::Display for FpVector {
    /// # Example
    /// ```
    /// # use fp::{prime::ValidPrime, vector::FpVector};
    /// let v = FpVector::from_slice(ValidPrime::new(3), &[1, 2, 0]);
    /// assert_eq!(v.to_string(), "[1, 2, 0]");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().format(", "))
    }
}
