mod ss;

pub use crate::ss::*;
pub use crate::ss::config::SILENT;

use std::error::Error;
use clap::Parser;

fn main() -> Result<(), Box<dyn Error>> {
    let mut ss = SS::parse();
    if ss.output == "stdout" && (ss.mode == "encrypt" || ss.mode == "decrypt") {
        ss.silent = true;
    }
    if !SILENT.is_set().unwrap() {
        SILENT.set(ss.silent).unwrap();
    }
    if !ss.silent {
        println!("Run args: {:?}", ss);
    }
    ss.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::io::Cursor;
    use num_bigint::BigUint;
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::ss::keys::{PrivateKey, PublicKey};
    use crate::ss::numtheory::{gcd, lcm};
    use crate::ss::{decrypt, decrypt_stream, encrypt, encrypt_stream, make_priv, make_pub, SsError};

    fn test_keys(seed: u64, nbits: u64, iters: u64) -> (PublicKey, PrivateKey) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (p, q, n) = make_pub(nbits, iters, &mut rng).unwrap();
        let (d, pq) = make_priv(&p, &q).unwrap();
        (PublicKey { n, owner: "test".to_string() }, PrivateKey { pq, d })
    }

    #[test]
    fn test_key_consistency() -> Result<(), Box<dyn Error>> {
        let mut rng = StdRng::seed_from_u64(42);
        let (p, q, n) = make_pub(256, 50, &mut rng)?;
        let (d, pq) = make_priv(&p, &q)?;
        assert!(n.bits() >= 256);
        assert_eq!(n, &p * &p * &q);
        assert_eq!(pq, &p * &q);
        let lambda = lcm(&(&p - 1u32), &(&q - 1u32));
        assert_eq!((&n * &d) % &lambda, BigUint::one());
        assert_ne!(gcd(&p, &(&q - 1u32)), p);
        assert_ne!(gcd(&q, &(&p - 1u32)), q);
        Ok(())
    }

    #[test]
    fn test_keygen_deterministic() -> Result<(), Box<dyn Error>> {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        let (p1, q1, n1) = make_pub(256, 50, &mut rng1)?;
        let (p2, q2, n2) = make_pub(256, 50, &mut rng2)?;
        assert_eq!((&p1, &q1, &n1), (&p2, &q2, &n2));
        assert_eq!(make_priv(&p1, &q1)?, make_priv(&p2, &q2)?);
        Ok(())
    }

    #[test]
    fn test_scalar_round_trip() -> Result<(), Box<dyn Error>> {
        let (public, private) = test_keys(9, 128, 25);
        for m in [0u64, 1, 2, 0xff, 12345, 0xdeadbeef] {
            let m = BigUint::from(m);
            let c = encrypt(&m, &public.n)?;
            assert_eq!(decrypt(&c, &private.d, &private.pq), m);
        }
        Ok(())
    }

    #[test]
    fn test_decrypt_reduces_ciphertext_above_pq() -> Result<(), Box<dyn Error>> {
        // encryption reduces mod n = p*p*q, so all but a ~1/p sliver of
        // ciphertexts land in [pq, n); decryption must reduce them, not
        // reject them
        let (public, private) = test_keys(9, 128, 25);
        let mut seen_large = false;
        for m in 2u64..34 {
            let m = BigUint::from(m);
            let c = encrypt(&m, &public.n)?;
            seen_large |= c >= private.pq;
            assert_eq!(decrypt(&c, &private.d, &private.pq), m);
        }
        assert!(seen_large);
        Ok(())
    }

    #[test]
    fn test_encrypt_out_of_range() {
        let (public, _) = test_keys(9, 128, 25);
        assert!(matches!(encrypt(&public.n, &public.n), Err(SsError::MessageOutOfRange)));
    }

    #[test]
    fn test_stream_round_trip_single_block() -> Result<(), Box<dyn Error>> {
        let (public, private) = test_keys(7, 128, 25);
        let data = b"hi!".to_vec();
        let mut encrypted = Vec::new();
        encrypt_stream(&mut Cursor::new(&data), &mut encrypted, &public)?;
        let mut decrypted = Vec::new();
        decrypt_stream(&mut Cursor::new(&encrypted), &mut decrypted, &private)?;
        assert_eq!(decrypted, data);
        Ok(())
    }

    #[test]
    fn test_stream_round_trip_multi_block() -> Result<(), Box<dyn Error>> {
        let (public, private) = test_keys(7, 256, 25);
        let data = b"The quick brown fox jumps over the lazy dog. "
            .iter()
            .cycle()
            .take(500)
            .cloned()
            .collect::<Vec<u8>>();
        let mut encrypted = Vec::new();
        encrypt_stream(&mut Cursor::new(&data), &mut encrypted, &public)?;
        assert!(encrypted.iter().filter(|b| **b == b'\n').count() > 1);
        let mut decrypted = Vec::new();
        decrypt_stream(&mut Cursor::new(&encrypted), &mut decrypted, &private)?;
        assert_eq!(decrypted, data);
        Ok(())
    }

    #[test]
    fn test_stream_round_trip_empty() -> Result<(), Box<dyn Error>> {
        let (public, private) = test_keys(7, 128, 25);
        let mut encrypted = Vec::new();
        encrypt_stream(&mut Cursor::new(&[]), &mut encrypted, &public)?;
        assert!(encrypted.is_empty());
        let mut decrypted = Vec::new();
        decrypt_stream(&mut Cursor::new(&encrypted), &mut decrypted, &private)?;
        assert!(decrypted.is_empty());
        Ok(())
    }

    #[test]
    fn test_encrypt_rejects_nul_byte() {
        let (public, _) = test_keys(7, 128, 25);
        let data = [0x41u8, 0x00, 0x42];
        let mut encrypted = Vec::new();
        let err = encrypt_stream(&mut Cursor::new(&data), &mut encrypted, &public).unwrap_err();
        assert!(matches!(err.downcast_ref::<SsError>(), Some(SsError::NulByte)));
    }

    #[test]
    fn test_decrypt_rejects_bad_hex() {
        let (_, private) = test_keys(7, 128, 25);
        let mut decrypted = Vec::new();
        let err = decrypt_stream(&mut Cursor::new(b"not-hex\n"), &mut decrypted, &private).unwrap_err();
        assert!(matches!(err.downcast_ref::<SsError>(), Some(SsError::MalformedCiphertext(_))));
    }

    #[test]
    fn test_make_pub_rejects_tiny_bits() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(make_pub(4, 10, &mut rng), Err(SsError::BitsTooSmall(4))));
    }
}
