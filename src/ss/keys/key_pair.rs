use std::error::Error;
use crate::ss::keys::{PrivateKey, PublicKey};

/// A matched key pair. Nothing in the serialized forms ties the halves
/// together; decrypting correctly is the only evidence of a match.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    pub fn save(&self, pubpath: &str, privpath: &str) -> Result<(), Box<dyn Error>> {
        self.public.save(pubpath)?;
        self.private.save(privpath)?;
        Ok(())
    }

    pub fn load(pubpath: &str, privpath: &str) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            public: PublicKey::load(pubpath)?,
            private: PrivateKey::load(privpath)?,
        })
    }
}
