//! A live process exposed through a procfs-style directory.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::catalog::RegionCatalog;
use crate::error::{InspectError, Result};
use crate::process::mem::ProcMemory;

/// Handle on an inspectable process.
///
/// Holding a `ProcessTarget` only means the process was alive when attached;
/// every catalog built from it is a fresh snapshot.
#[derive(Debug, Clone)]
pub struct ProcessTarget {
    pid: u32,
    dir: PathBuf,
}

impl ProcessTarget {
    /// Attach to `pid`, failing with `ProcessNotRunning` unless it has at
    /// least one thread and is neither a zombie nor dead.
    pub fn attach(pid: u32, proc_root: impl AsRef<Path>) -> Result<Self> {
        let dir = proc_root.as_ref().join(pid.to_string());

        let has_threads = fs::read_dir(dir.join("task"))
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if !has_threads {
            debug!(pid, "no threads under task/");
            return Err(InspectError::ProcessNotRunning { pid });
        }

        if let Ok(stat) = fs::read_to_string(dir.join("stat")) {
            if matches!(process_state(&stat), Some('Z' | 'X' | 'x')) {
                debug!(pid, "process is zombie or dead");
                return Err(InspectError::ProcessNotRunning { pid });
            }
        }

        Ok(Self { pid, dir })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Build a fresh region catalog from the process's memory map listing.
    pub fn catalog(&self) -> Result<RegionCatalog> {
        let file = File::open(self.dir.join("maps")).map_err(|source| self.unavailable(source))?;
        let catalog = RegionCatalog::from_reader(BufReader::new(file)).map_err(|e| match e {
            InspectError::Io(source) => self.unavailable(source),
            other => other,
        })?;
        info!(pid = self.pid, regions = catalog.len(), "region catalog built");
        Ok(catalog)
    }

    /// Open the process's memory for reading.
    pub fn memory(&self) -> Result<ProcMemory> {
        ProcMemory::open(self.dir.join("mem"))
    }

    fn unavailable(&self, source: std::io::Error) -> InspectError {
        InspectError::CatalogUnavailable {
            pid: self.pid,
            source,
        }
    }
}

/// State letter from a `stat` line. The command name is parenthesized and
/// may itself contain spaces or parentheses, so scan from the last `)`.
fn process_state(stat: &str) -> Option<char> {
    let after = &stat[stat.rfind(')')? + 1..];
    after.trim_start().chars().next()
}
