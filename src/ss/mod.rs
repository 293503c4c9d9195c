use std::env;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use chrono::Local;
use clap::Parser;
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod config;
pub mod numtheory;
pub mod prime_gen;
pub mod keys;

use config::*;
use keys::*;
use numtheory::*;
use prime_gen::*;

#[derive(Debug, Clone)]
pub enum RunMode {
    Keygen,
    Encrypt,
    Decrypt,
}

#[macro_export]
macro_rules! ss_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Parser)]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode: keygen, encrypt, decrypt")]
    pub mode: String,
    #[clap(short = 'n', long, value_parser, default_value = $CONFIG.pubkey.as_str(), help = "Public key file")]
    pub pubkey: String,
    #[clap(short = 'd', long, value_parser, default_value = $CONFIG.privkey.as_str(), help = "Private key file")]
    pub privkey: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.input.as_str(), help = "Input filename")]
    pub input: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.output.as_str(), help = "Output filename")]
    pub output: String,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.bits, help = "Minimum bits in the public modulus n")]
    pub bits: u64,
    #[clap(long, value_parser, default_value_t = $CONFIG.iters, help = "Miller-Rabin iterations for primality checks")]
    pub iters: u64,
    #[clap(short, long, value_parser, help = "Random seed, defaults to current time")]
    pub seed: Option<u64>,
    #[clap(short = 'u', long, value_parser, default_value = $CONFIG.owner.as_str(), help = "Owner recorded in the public key, defaults to $USER")]
    pub owner: String,
    #[clap(long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
}
    };
}

ss_t!(CONFIG_DEF, SS);

pub enum SsError {
    BitsTooSmall(u64),
    KeyTooSmall(u64),
    NoInverse,
    MessageOutOfRange,
    MalformedCiphertext(String),
    NulByte,
}

impl SsError {
    fn display(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SsError::BitsTooSmall(bits) => write!(f, "Cannot split {} bits into two prime sizes, need at least 5", bits),
            SsError::KeyTooSmall(bits) => write!(f, "Modulus of {} bits leaves no room for block payload", bits),
            SsError::NoInverse => write!(f, "n has no inverse modulo lcm(p-1, q-1)"),
            SsError::MessageOutOfRange => write!(f, "Message must be in [0, n)"),
            SsError::MalformedCiphertext(line) => write!(f, "Ciphertext line is not valid hexadecimal: `{}'", line),
            SsError::NulByte => write!(f, "Plaintext block contains a NUL byte, refusing to lose data"),
        }
    }
}

impl Display for SsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Debug for SsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f)
    }
}

impl Error for SsError {}

impl From<NumError> for SsError {
    fn from(_: NumError) -> Self {
        SsError::NoInverse
    }
}

/// Chooses prime sizes, generates `p` and `q`, and builds `n = p*p*q`.
///
/// `pbits` is drawn uniformly from `[nbits/5, 2*nbits/5)` and `qbits` takes
/// the rest; both get one extra bit so `n` reaches at least `nbits` bits.
/// Pairs where `p | q-1` or `q | p-1` are thrown out wholesale: they
/// collapse `lcm(p-1, q-1)` and with it the private exponent.
pub fn make_pub(nbits: u64, iters: u64, rng: &mut StdRng) -> Result<(BigUint, BigUint, BigUint), SsError> {
    if nbits < 5 {
        return Err(SsError::BitsTooSmall(nbits));
    }
    let low = nbits / 5;
    let up = (2 * nbits) / 5 - low;
    let pbits = rng.gen_range(0..up) + low;
    let qbits = nbits - 2 * pbits + 1;
    let pbits = pbits + 1;

    let mut p = make_prime(pbits, iters, rng);
    let mut q = make_prime(qbits, iters, rng);
    while gcd(&p, &(&q - 1u32)) == p || gcd(&q, &(&p - 1u32)) == q {
        p = make_prime(pbits, iters, rng);
        q = make_prime(qbits, iters, rng);
    }
    let n = &p * &p * &q;
    Ok((p, q, n))
}

/// Derives the private half `(d, pq)` from the generated primes.
pub fn make_priv(p: &BigUint, q: &BigUint) -> Result<(BigUint, BigUint), SsError> {
    let p1 = p - 1u32;
    let q1 = q - 1u32;
    let pq = p * q;
    let lambda = &p1 * &q1 / gcd(&p1, &q1);
    let n = &pq * p;
    let d = mod_inverse(&n, &lambda)?;
    Ok((d, pq))
}

/// `c = m^n mod n`
pub fn encrypt(m: &BigUint, n: &BigUint) -> Result<BigUint, SsError> {
    if m >= n {
        return Err(SsError::MessageOutOfRange);
    }
    Ok(pow_mod(m, n, n))
}

/// `m = c^d mod pq`
///
/// Ciphertexts live in `[0, n)` with `n = p*p*q`, so `c` routinely exceeds
/// `pq`; the modular reduction brings it home.
pub fn decrypt(c: &BigUint, d: &BigUint, pq: &BigUint) -> BigUint {
    pow_mod(c, d, pq)
}

pub fn read_block(reader: &mut dyn Read, bytes: usize) -> io::Result<Vec<u8>> {
    let mut byte = [0u8; 1];
    let mut res = Vec::new();
    loop {
        match reader.read(&mut byte)? {
            0 => break,
            _ => {
                res.push(byte[0]);
                if res.len() >= bytes {
                    break;
                }
            }
        }
    }
    Ok(res)
}

/// Splits the input into blocks of up to `k-2` bytes, prepends the 0xFF
/// sentinel, and writes each encrypted block as one lowercase hex line.
///
/// Block width `k = (bits(n)/2 - 1) / 8` keeps every block integer below
/// `pq`, so decryption round-trips. A NUL byte in the plaintext is refused
/// instead of silently truncating the block.
pub fn encrypt_stream(reader: &mut dyn Read, writer: &mut dyn Write, key: &PublicKey) -> Result<(), Box<dyn Error>> {
    let k = (key.n.bits() / 2 - 1) / 8;
    if k < 3 {
        return Err(SsError::KeyTooSmall(key.n.bits()).into());
    }
    loop {
        let block = read_block(reader, (k - 2) as usize)?;
        if block.is_empty() {
            break;
        }
        if block.contains(&0u8) {
            return Err(SsError::NulByte.into());
        }
        let mut kbytes = Vec::with_capacity(block.len() + 1);
        kbytes.push(0xffu8);
        kbytes.extend_from_slice(&block);
        let m = BigUint::from_bytes_be(&kbytes);
        let c = encrypt(&m, &key.n)?;
        writeln!(writer, "{:x}", c)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses one hex integer per line, decrypts it, and emits the recovered
/// block minus its leading sentinel byte. Blank lines are skipped; anything
/// else that fails to parse is an error, not garbage output.
pub fn decrypt_stream(reader: &mut dyn Read, writer: &mut dyn Write, key: &PrivateKey) -> Result<(), Box<dyn Error>> {
    let reader = BufReader::new(reader);
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let c = BigUint::parse_bytes(line.as_bytes(), 16)
            .ok_or_else(|| SsError::MalformedCiphertext(line.to_string()))?;
        let m = decrypt(&c, &key.d, &key.pq);
        let kbytes = m.to_bytes_be();
        writer.write_all(&kbytes[1..])?;
    }
    writer.flush()?;
    Ok(())
}

impl SS {
    pub fn reader(&self) -> io::Result<Box<dyn Read>> {
        match self.input.as_str() {
            "stdin" => Ok(Box::new(io::stdin())),
            f => Ok(Box::new(File::open(f)?)),
        }
    }

    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        match self.output.as_str() {
            "stdout" => Ok(Box::new(io::stdout())),
            f => Ok(Box::new(File::create(f)?)),
        }
    }

    fn run_mode(&self) -> Result<RunMode, Box<dyn Error>> {
        match self.mode.as_str() {
            "keygen" => Ok(RunMode::Keygen),
            "encrypt" => Ok(RunMode::Encrypt),
            "decrypt" => Ok(RunMode::Decrypt),
            _ => Err("Unknown run mode! available: keygen(default), encrypt, decrypt".into()),
        }
    }

    fn resolve_owner(&self) -> String {
        if self.owner.is_empty() {
            env::var("USER").unwrap_or_else(|_| String::from("unknown"))
        } else {
            self.owner.clone()
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        match self.run_mode()? {
            RunMode::Keygen => {
                let seed = self.seed.unwrap_or_else(|| Local::now().timestamp_millis() as u64);
                let mut rng = StdRng::seed_from_u64(seed);
                let (p, q, n) = make_pub(self.bits, self.iters, &mut rng)?;
                let (d, pq) = make_priv(&p, &q)?;
                let key_pair = KeyPair {
                    public: PublicKey { n, owner: self.resolve_owner() },
                    private: PrivateKey { pq, d },
                };
                key_pair.save(&self.pubkey, &self.privkey)?;
                if !self.silent {
                    println!("user = {}", key_pair.public.owner);
                    println!("p ({} bits) = {}", p.bits(), p);
                    println!("q ({} bits) = {}", q.bits(), q);
                    println!("n ({} bits) = {}", key_pair.public.n.bits(), key_pair.public.n);
                    println!("d ({} bits) = {}", key_pair.private.d.bits(), key_pair.private.d);
                    println!("pq ({} bits) = {}", key_pair.private.pq.bits(), key_pair.private.pq);
                    println!("Generated key files: {}, {}", self.pubkey, self.privkey);
                }
            }
            RunMode::Encrypt => {
                let key = PublicKey::load(&self.pubkey)?;
                if !self.silent {
                    println!("user = {}", key.owner);
                    println!("n ({} bits) = {}", key.n.bits(), key.n);
                }
                let mut reader = self.reader()?;
                let mut writer = self.writer()?;
                encrypt_stream(&mut reader, &mut writer, &key)?;
            }
            RunMode::Decrypt => {
                let key = PrivateKey::load(&self.privkey)?;
                if !self.silent {
                    println!("pq ({} bits) = {}", key.pq.bits(), key.pq);
                    println!("d ({} bits) = {}", key.d.bits(), key.d);
                }
                let mut reader = self.reader()?;
                let mut writer = self.writer()?;
                decrypt_stream(&mut reader, &mut writer, &key)?;
            }
        }
        Ok(())
    }
}
