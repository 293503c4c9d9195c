use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use num::Integer;
use num_bigint::{BigInt, BigUint, RandBigInt, ToBigInt};
use num_traits::{One, Zero};
use rand::rngs::StdRng;

pub enum NumError {
    NoInverse,
}

impl NumError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            NumError::NoInverse => write!(f, "No modular inverse exists (gcd != 1)"),
        }
    }
}

impl Display for NumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for NumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for NumError {}

pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut d = a.clone();
    let mut b2 = b.clone();
    while !b2.is_zero() {
        let r = &d % &b2;
        d = std::mem::replace(&mut b2, r);
    }
    d
}

pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) / gcd(a, b)
}

/// Extended Euclid over signed intermediates; the Bezout coefficient is
/// shifted back into `[0, n)` before returning.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, NumError> {
    let n_int = n.to_bigint().unwrap();
    let mut r = n_int.clone();
    let mut r1 = a.to_bigint().unwrap();
    let mut t = BigInt::zero();
    let mut t1 = BigInt::one();
    while !r1.is_zero() {
        let q = &r / &r1;
        let r2 = &r - &q * &r1;
        r = std::mem::replace(&mut r1, r2);
        let t2 = &t - &q * &t1;
        t = std::mem::replace(&mut t1, t2);
    }
    if r > BigInt::one() {
        return Err(NumError::NoInverse);
    }
    if t < BigInt::zero() {
        t += &n_int;
    }
    Ok(t.to_biguint().unwrap())
}

/// Square-and-multiply, walking the exponent from the least significant bit.
/// An exponent of zero yields one, whatever the base.
pub fn pow_mod(a: &BigUint, d: &BigUint, n: &BigUint) -> BigUint {
    assert!(!n.is_zero(), "pow_mod requires n >= 1");
    let mut base = a.clone();
    let mut exp = d.clone();
    let mut o = BigUint::one();
    while !exp.is_zero() {
        if exp.is_odd() {
            o = (o * &base) % n;
        }
        base = (&base * &base) % n;
        exp >>= 1;
    }
    o
}

/// Miller-Rabin with `iters` random witnesses drawn from `[2, n-2]`.
/// False positives occur with probability at most 4^(-iters).
pub fn is_prime(n: &BigUint, iters: u64, rng: &mut StdRng) -> bool {
    let two = BigUint::from(2u32);
    if n < &two || (n != &two && n.is_even()) {
        return false;
    }
    if n == &two || n == &BigUint::from(3u32) {
        return true;
    }

    // n - 1 = (2^s)r with r odd
    let n1 = n - 1u32;
    let mut r = n1.clone();
    let mut s = 0u64;
    while r.is_even() {
        r >>= 1;
        s += 1;
    }

    for _ in 0..iters {
        let a = rng.gen_biguint_range(&two, &n1);
        let mut y = pow_mod(&a, &r, n);
        if !y.is_one() && y != n1 {
            let mut j = 1u64;
            while j <= s - 1 && y != n1 {
                y = pow_mod(&y, &two, n);
                if y.is_one() {
                    return false;
                }
                j += 1;
            }
            if y != n1 {
                return false;
            }
        }
    }
    true
}
