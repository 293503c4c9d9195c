pub mod key_reader;
pub mod key_writer;
pub mod key_pair;

pub use key_pair::*;

use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use num_bigint::BigUint;

/// Public half of an SS key: the modulus `n = p*p*q` and an opaque owner
/// label carried through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicKey {
    pub n: BigUint,
    pub owner: String,
}

/// Private half: modulus `pq = p*q` and exponent `d = n^-1 mod lcm(p-1, q-1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateKey {
    pub pq: BigUint,
    pub d: BigUint,
}

pub enum KeyError {
    ParseError(String),
    FormatError,
}

impl KeyError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyError::ParseError(line) => write!(f, "Malformed hexadecimal in key file: `{}'", line),
            KeyError::FormatError => write!(f, "Key file is missing a line"),
        }
    }
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for KeyError {}
