use std::{
    fmt::{self, Display, Formatter},
    num::ParseIntError,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const TWO: ValidPrime = ValidPrime::new(2);

/// Primes are stored as `u32`, and every product of two reduced entries is computed in `u64`. We
/// additionally require `p < 2^31` so that `p + (p - 1)^2` never overflows.
const MAX_PRIME: u32 = 1 << 31;

/// A prime number. Once constructed, the primality of the inner value is guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidPrime {
    p: u32,
}

pub const fn is_prime(p: u32) -> bool {
    if p < 2 {
        return false;
    }
    // (2..p).all(|k| p % k != 0), but make it const
    let mut k = 2;
    while (k as u64) * (k as u64) <= p as u64 {
        if p % k == 0 {
            return false;
        }
        k += 1;
    }
    true
}

impl ValidPrime {
    /// Panics if `p` is not a prime below `2^31`. Use [`ValidPrime::try_from`] for input that
    /// has not been checked yet.
    pub const fn new(p: u32) -> Self {
        assert!(is_prime(p) && p < MAX_PRIME);
        Self { p }
    }

    pub const fn as_u32(self) -> u32 {
        self.p
    }

    pub fn sum(self, n1: u32, n2: u32) -> u32 {
        ((n1 as u64 + n2 as u64) % self.p as u64) as u32
    }

    pub fn product(self, n1: u32, n2: u32) -> u32 {
        ((n1 as u64 * n2 as u64) % self.p as u64) as u32
    }

    pub fn negate(self, n: u32) -> u32 {
        let n = n % self.p;
        if n == 0 {
            0
        } else {
            self.p - n
        }
    }

    /// Reduce an arbitrary integer into `0..p`.
    pub fn reduce(self, n: i64) -> u32 {
        n.rem_euclid(self.p as i64) as u32
    }

    /// Computes the inverse of `k` mod `p`. Panics if `k` is divisible by `p`.
    pub fn inverse(self, k: u32) -> u32 {
        let k = k % self.p;
        assert!(k != 0, "0 has no inverse mod {}", self.p);
        // By Fermat's little theorem, k^(p - 2) = k^(-1)
        power_mod(self.p, k, self.p - 2)
    }
}

/// Compute `b^e mod p` by repeated squaring.
pub fn power_mod(p: u32, b: u32, mut e: u32) -> u32 {
    let p = p as u64;
    let mut result: u64 = 1;
    let mut b = b as u64 % p;
    while e > 0 {
        if (e & 1) == 1 {
            result = (result * b) % p;
        }
        b = (b * b) % p;
        e >>= 1;
    }
    result as u32
}

impl PartialEq<u32> for ValidPrime {
    fn eq(&self, other: &u32) -> bool {
        self.p == *other
    }
}

impl From<ValidPrime> for u32 {
    fn from(p: ValidPrime) -> Self {
        p.p
    }
}

impl TryFrom<u32> for ValidPrime {
    type Error = PrimeError;

    fn try_from(p: u32) -> Result<Self, PrimeError> {
        if is_prime(p) && p < MAX_PRIME {
            Ok(Self { p })
        } else {
            Err(PrimeError::InvalidPrime(p))
        }
    }
}

impl FromStr for ValidPrime {
    type Err = PrimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let p: u32 = s.trim().parse().map_err(PrimeError::NotAnInteger)?;
        Self::try_from(p)
    }
}

impl Display for ValidPrime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.p.fmt(f)
    }
}

impl Serialize for ValidPrime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.p.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValidPrime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let p: u32 = u32::deserialize(deserializer)?;
        Self::try_from(p).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug)]
pub enum PrimeError {
    NotAnInteger(ParseIntError),
    InvalidPrime(u32),
}

impl Display for PrimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnInteger(s) => write!(f, "Not an integer: {s}"),
            Self::InvalidPrime(p) => write!(f, "{p} is not a valid prime"),
        }
    }
}

impl std::error::Error for PrimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotAnInteger(e) => Some(e),
            Self::InvalidPrime(_) => None,
        }
    }
}
