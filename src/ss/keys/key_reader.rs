use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use num_bigint::BigUint;
use crate::ss::keys::{KeyError, PrivateKey, PublicKey};

fn read_line_trim(reader: &mut dyn BufRead) -> Result<String, Box<dyn Error>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(KeyError::FormatError.into());
    }
    Ok(line.trim().to_string())
}

fn read_hex_line(reader: &mut dyn BufRead) -> Result<BigUint, Box<dyn Error>> {
    let line = read_line_trim(reader)?;
    BigUint::parse_bytes(line.as_bytes(), 16)
        .ok_or_else(|| KeyError::ParseError(line).into())
}

impl PublicKey {
    /// Two lines: `n` in lowercase hex, then the owner token.
    pub fn read(reader: &mut dyn BufRead) -> Result<Self, Box<dyn Error>> {
        let n = read_hex_line(reader)?;
        let owner = read_line_trim(reader)?;
        if owner.is_empty() || owner.contains(char::is_whitespace) {
            return Err(KeyError::ParseError(owner).into());
        }
        Ok(Self { n, owner })
    }

    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        Self::read(&mut BufReader::new(File::open(path)?))
    }
}

impl PrivateKey {
    /// Two lines: `pq` then `d`, both lowercase hex.
    pub fn read(reader: &mut dyn BufRead) -> Result<Self, Box<dyn Error>> {
        let pq = read_hex_line(reader)?;
        let d = read_hex_line(reader)?;
        Ok(Self { pq, d })
    }

    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        Self::read(&mut BufReader::new(File::open(path)?))
    }
}
