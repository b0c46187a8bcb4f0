//! Inspection session over one live process.
//!
//! A session ties together the pieces a debugger front-end needs: the
//! attached target, its frozen region catalog, a pointer reader over its
//! memory and a decoder for code addresses. The process is always named
//! explicitly; there is no notion of a globally selected process.

use tracing::info;

use crate::analysis::code::MemoryDisassembler;
use crate::analysis::memory::PointerView;
use crate::analysis::walker;
use crate::config::InspectConfig;
use crate::core::catalog::RegionCatalog;
use crate::core::chain::PointerChain;
use crate::core::region::MemoryRegion;
use crate::disasm::registry::{self, Backend};
use crate::error::{InspectError, Result};
use crate::process::{ProcMemory, ProcessTarget};
use crate::timeout::Deadline;

pub struct InspectionSession {
    target: ProcessTarget,
    catalog: RegionCatalog,
    memory: ProcMemory,
    backend: Backend,
    config: InspectConfig,
}

impl InspectionSession {
    /// Attach to `pid` and snapshot its regions.
    pub fn open(pid: u32, config: &InspectConfig) -> Result<Self> {
        let target = ProcessTarget::attach(pid, &config.proc_root)?;
        let catalog = target.catalog()?;
        let memory = target.memory()?;
        let backend = registry::for_arch_with(
            config.architecture,
            config.layout.endianness,
            config.backend,
        )
        .map_err(|e| {
            InspectError::InvalidInput(format!(
                "no decoder for {}: {}",
                config.architecture, e
            ))
        })?;
        info!(pid, regions = catalog.len(), "inspection session opened");

        Ok(Self {
            target,
            catalog,
            memory,
            backend,
            config: config.clone(),
        })
    }

    pub fn pid(&self) -> u32 {
        self.target.pid()
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    /// Region containing `address`.
    pub fn find(&self, address: u64) -> Result<&MemoryRegion> {
        self.catalog.find(address)
    }

    /// Follow the pointer chain starting at `address`.
    pub fn refchain(&self, address: u64) -> Result<PointerChain> {
        let reader = PointerView::new(&self.memory, self.config.layout);
        let code = MemoryDisassembler::new(&self.memory, &self.backend, &self.catalog);
        match self.config.deadline_seconds {
            Some(seconds) => {
                let mut deadline = Deadline::new(seconds, "refchain");
                walker::walk_with_deadline(address, &self.catalog, &reader, &code, &mut deadline)
            }
            None => walker::walk(address, &self.catalog, &reader, &code),
        }
    }

    /// Rebuild the catalog from the current state of the process.
    pub fn refresh(&mut self) -> Result<()> {
        self.catalog = self.target.catalog()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain::Termination;
    use crate::core::disassembler::{Architecture, Endianness};
    use crate::disasm::registry::BackendKind;
    use std::fs;
    use std::path::Path;

    const PID: u32 = 4242;
    const MAPS: &str = "1000-2000 rw-p 00000000 00:00 0 [heap]\n3000-4000 r-xp 00000000 08:01 77 /usr/bin/app\n";

    fn put_u64(mem: &mut [u8], at: u64, value: u64) {
        let at = at as usize;
        mem[at..at + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// Lay out a fake procfs entry whose `mem` file is indexed by address.
    fn fake_process(root: &Path) {
        let dir = root.join(PID.to_string());
        fs::create_dir_all(dir.join("task").join(PID.to_string())).unwrap();
        fs::write(dir.join("stat"), format!("{} (app) S 1 {}", PID, PID)).unwrap();
        fs::write(dir.join("maps"), MAPS).unwrap();

        let mut mem = vec![0u8; 0x4000];
        put_u64(&mut mem, 0x1000, 0x1008);
        put_u64(&mut mem, 0x1008, 0x3000);
        put_u64(&mut mem, 0x1010, 0x1010);
        put_u64(&mut mem, 0x1018, 0xdead_0000);
        // ret
        mem[0x3000] = 0xc3;
        fs::write(dir.join("mem"), mem).unwrap();
    }

    fn config(root: &Path) -> InspectConfig {
        let mut config =
            InspectConfig::for_target(Architecture::X86_64, Endianness::Little).with_proc_root(root);
        config.backend = Some(BackendKind::Iced);
        config
    }

    #[test]
    fn walks_heap_into_code() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path());
        let session = InspectionSession::open(PID, &config(root.path())).unwrap();
        assert_eq!(session.pid(), PID);
        assert_eq!(session.catalog().len(), 2);

        let chain = session.refchain(0x1000).unwrap();
        assert_eq!(chain.addresses().collect::<Vec<_>>(), vec![0x1000, 0x1008, 0x3000]);
        assert_eq!(chain.terminated_by(), Termination::CodeTail);
        assert_eq!(chain.code().unwrap().mnemonic, "ret");
    }

    #[test]
    fn other_terminations_through_session() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path());
        let session = InspectionSession::open(PID, &config(root.path())).unwrap();

        let cycle = session.refchain(0x1010).unwrap();
        assert_eq!(cycle.terminated_by(), Termination::Cycle);
        assert_eq!(cycle.len(), 1);

        let tail = session.refchain(0x1018).unwrap();
        assert_eq!(tail.terminated_by(), Termination::UnmappedTail);
        assert_eq!(tail.unmapped_value(), Some(0xdead_0000));

        assert!(matches!(
            session.refchain(0x5000),
            Err(InspectError::AddressNotMapped(0x5000))
        ));
    }

    #[test]
    fn deadline_from_config_still_completes() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path());
        let config = config(root.path()).with_deadline(60);
        let session = InspectionSession::open(PID, &config).unwrap();
        assert_eq!(session.config().deadline_seconds, Some(60));

        let chain = session.refchain(0x1000).unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(session.refchain(0x1010).unwrap().terminated_by(), Termination::Cycle);
    }

    #[test]
    fn refresh_rebuilds_catalog() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path());
        let mut session = InspectionSession::open(PID, &config(root.path())).unwrap();
        assert!(session.find(0x2800).is_err());

        let maps = format!("{}2000-3000 rw-p 00000000 00:00 0\n", MAPS);
        fs::write(root.path().join(PID.to_string()).join("maps"), maps).unwrap();
        // The snapshot is frozen until refreshed.
        assert!(session.find(0x2800).is_err());

        session.refresh().unwrap();
        assert_eq!(session.catalog().len(), 3);
        assert!(session.find(0x2800).unwrap().perms.is_data());
        assert!(session.find(0x1000).is_ok());
    }

    #[test]
    fn refresh_reports_vanished_listing() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path());
        let mut session = InspectionSession::open(PID, &config(root.path())).unwrap();
        fs::remove_file(root.path().join(PID.to_string()).join("maps")).unwrap();
        assert!(matches!(
            session.refresh(),
            Err(InspectError::CatalogUnavailable { pid: PID, .. })
        ));
    }
}
