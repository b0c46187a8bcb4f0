use std::fs::File;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use crate::analysis::memory::{MemoryError, MemoryView};
use crate::error::Result;

/// Positional reads from a process memory file such as `/proc/<pid>/mem`.
#[derive(Debug)]
pub struct ProcMemory {
    file: File,
    path: PathBuf,
}

impl ProcMemory {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MemoryView for ProcMemory {
    fn read_bytes(&self, addr: u64, len: usize) -> std::result::Result<Vec<u8>, MemoryError> {
        let mut buf = vec![0u8; len];
        let mut filled = 0;
        while filled < len {
            match self.file.read_at(&mut buf[filled..], addr + filled as u64) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(MemoryError::Access {
                        address: addr,
                        message: e.to_string(),
                    })
                }
            }
        }
        if filled < len {
            return Err(MemoryError::ShortRead {
                address: addr,
                wanted: len,
                got: filled,
            });
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_at_offset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&(0u8..32).collect::<Vec<_>>()).unwrap();
        let mem = ProcMemory::open(file.path()).unwrap();
        assert_eq!(mem.read_bytes(8, 4).unwrap(), vec![8, 9, 10, 11]);
        assert!(matches!(
            mem.read_bytes(30, 4),
            Err(MemoryError::ShortRead { got: 2, .. })
        ));
    }
}
