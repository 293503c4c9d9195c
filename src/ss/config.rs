use lazy_static::lazy_static;
use mut_static::MutStatic;
use crate::SS;

lazy_static! {
    pub static ref CONFIG_DEF: SS = SS {
        mode: String::from("keygen"),
        pubkey: String::from("ss.pub"),
        privkey: String::from("ss.priv"),
        input: String::from("stdin"),
        output: String::from("stdout"),
        bits: 256,
        iters: 50,
        seed: None,
        owner: String::from(""),
        silent: false,
    };
    pub static ref SILENT: MutStatic<bool> = MutStatic::new();
}

/// Unset means not running as the CLI (tests, library use): stay quiet.
pub fn verbose() -> bool {
    match SILENT.is_set() {
        Ok(true) => !*SILENT.read().unwrap(),
        _ => false,
    }
}
