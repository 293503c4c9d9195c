use chrono::Local;
use num::Integer;
use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::rngs::StdRng;
use crate::ss::config::verbose;
use crate::ss::numtheory::is_prime;

/// Keeps drawing uniform candidates from `[2^(bits-1), 2^bits - 1]`, forced
/// odd, until one survives Miller-Rabin. No attempt cap; expected tries are
/// on the order of `bits * ln 2 / 2` by the prime density argument.
/// The candidate range is empty below two bits.
pub fn make_prime(bits: u64, iters: u64, rng: &mut StdRng) -> BigUint {
    assert!(bits >= 2, "make_prime requires bits >= 2");
    let one = BigUint::one();
    let low = &one << (bits - 1);
    let up = (&one << bits) - 1u32 - &low;
    let start = Local::now().timestamp_millis();
    let mut try_times = 0u64;
    loop {
        try_times += 1;
        // random starts from 0 so add the lower bound afterwards
        let mut p = rng.gen_biguint_below(&up) + &low;
        if p.is_even() {
            p += 1u32;
        }
        if is_prime(&p, iters, rng) {
            if verbose() {
                let time = Local::now().timestamp_millis() - start;
                println!("Generated {} bit prime in {} tries after {} ms", bits, try_times, time);
            }
            return p;
        }
    }
}
