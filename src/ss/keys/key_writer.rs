use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use crate::ss::keys::{PrivateKey, PublicKey};

// Key files are readable and writable by their owner only.
#[cfg(unix)]
fn restrict_permissions(file: &File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> io::Result<()> {
    Ok(())
}

impl PublicKey {
    pub fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{:x}", self.n)?;
        writeln!(writer, "{}", self.owner)
    }

    pub fn save(&self, path: &str) -> Result<(), Box<dyn Error>> {
        let mut file = File::create(path)?;
        restrict_permissions(&file)?;
        self.write(&mut file)?;
        Ok(())
    }
}

impl PrivateKey {
    pub fn write(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{:x}", self.pq)?;
        writeln!(writer, "{:x}", self.d)
    }

    pub fn save(&self, path: &str) -> Result<(), Box<dyn Error>> {
        let mut file = File::create(path)?;
        restrict_permissions(&file)?;
        self.write(&mut file)?;
        Ok(())
    }
}
