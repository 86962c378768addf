//! # Módulo `custom_reclaim`
//!
//! Carga: resolve `do_try_to_free_pages`, monta o reclaimer e registra
//!
//! ```text
//! custom_reclaim/                    0555
//! ├── custom_reclaim                 0200  (escrita: "node_index byte_count")
//! └── total_nr_reclaimed_pages       0444  (leitura: total de páginas liberadas)
//! ```
//!
//! Descarga: remove a tabela. O contador vive enquanto o módulo vive.

use alloc::sync::Arc;
use alloc::vec;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::fs::sysctl::{AtomicULongHandler, CtlTable, CtlTableHeader, FileMode, SysctlRoot};
use crate::mm::config::ReclaimConfig;
use crate::mm::reclaim::{CustomReclaimHandler, CustomReclaimer, FreePagesEntry, ReclaimHost};

use super::symbols::{self, SymbolResolver};
use super::{ModuleError, ModuleState, MODULE_INFO};

/// Diretório registrado na raiz do sysctl
pub const CTL_DIR: &str = "custom_reclaim";
/// Arquivo de controle
pub const CTL_TRIGGER: &str = "custom_reclaim";
/// Contador de páginas liberadas
pub const CTL_TOTAL: &str = "total_nr_reclaimed_pages";

/// Caminho completo do arquivo de controle
pub const TRIGGER_PATH: &str = "custom_reclaim/custom_reclaim";
/// Caminho completo do contador
pub const TOTAL_PATH: &str = "custom_reclaim/total_nr_reclaimed_pages";

/// Instância carregada do módulo.
///
/// Descarregar (`exit` ou drop) remove a árvore de sysctl.
pub struct CustomReclaimModule<'r> {
    sysctl: &'r SysctlRoot,
    header: Option<CtlTableHeader>,
    total: Arc<AtomicU64>,
}

impl<'r> CustomReclaimModule<'r> {
    /// Carrega o módulo resolvendo o entry point pela tabela de símbolos.
    pub fn load(
        host: Arc<dyn ReclaimHost>,
        resolver: &dyn SymbolResolver,
        sysctl: &'r SysctlRoot,
        config: ReclaimConfig,
    ) -> Result<Self, ModuleError> {
        crate::kinfo!("(CustomReclaim) Carregando módulo...");

        let entry = symbols::resolve_free_pages(resolver)?;
        Self::load_with_entry(host, Arc::new(entry), sysctl, config)
    }

    /// Carrega o módulo com um entry point já resolvido.
    pub fn load_with_entry(
        host: Arc<dyn ReclaimHost>,
        entry: Arc<dyn FreePagesEntry>,
        sysctl: &'r SysctlRoot,
        config: ReclaimConfig,
    ) -> Result<Self, ModuleError> {
        let total = Arc::new(AtomicU64::new(0));
        let reclaimer = Arc::new(CustomReclaimer::new(host.clone(), entry, config));
        let handler = Arc::new(CustomReclaimHandler::new(host, reclaimer, total.clone()));

        let table = CtlTable::dir(
            CTL_DIR,
            FileMode::DIR,
            vec![
                CtlTable::entry(CTL_TRIGGER, FileMode::WRITE_ONLY, handler),
                CtlTable::entry(
                    CTL_TOTAL,
                    FileMode::READ_ONLY,
                    Arc::new(AtomicULongHandler::new(total.clone())),
                ),
            ],
        );

        let header = sysctl.register_table(table).map_err(|err| {
            crate::kfail!("(CustomReclaim) Falha ao registrar sysctl: {}", err);
            ModuleError::RegistrationFailed(err)
        })?;

        crate::kok!(
            "(CustomReclaim) {} v{} carregado (may_swap={})",
            MODULE_INFO.name,
            MODULE_INFO.version,
            config.may_swap
        );

        Ok(Self {
            sysctl,
            header: Some(header),
            total,
        })
    }

    /// Total de páginas liberadas desde a carga
    pub fn total_reclaimed(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> ModuleState {
        if self.header.is_some() {
            ModuleState::Active
        } else {
            ModuleState::Unloaded
        }
    }

    /// Descarrega o módulo.
    pub fn exit(mut self) {
        self.unregister();
    }

    fn unregister(&mut self) {
        if let Some(header) = self.header.take() {
            self.sysctl.unregister_table(header);
            crate::kinfo!("(CustomReclaim) Módulo descarregado");
        }
    }
}

impl Drop for CustomReclaimModule<'_> {
    fn drop(&mut self) {
        self.unregister();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mm::config::SWAP_CLUSTER_MAX;
    use crate::sys::Errno;
    use crate::testing::{self, FakeHost, FakeSymbols, RecordingEntry};

    fn read_total(root: &SysctlRoot) -> std::string::String {
        let mut buf = [0u8; 32];
        let mut pos = 0;
        let n = root.read(TOTAL_PATH, &mut buf, &mut pos).unwrap();
        std::string::String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    fn write_trigger(root: &SysctlRoot, text: &str) -> Result<usize, Errno> {
        let mut pos = 0;
        root.write(TRIGGER_PATH, text.as_bytes(), &mut pos)
    }

    fn load_recording<'r>(
        root: &'r SysctlRoot,
        nodes: usize,
        freed: u64,
    ) -> (CustomReclaimModule<'r>, Arc<RecordingEntry>) {
        let entry = Arc::new(RecordingEntry::returning(freed));
        let module = CustomReclaimModule::load_with_entry(
            Arc::new(FakeHost::new(nodes, 4096)),
            entry.clone(),
            root,
            ReclaimConfig::default(),
        )
        .unwrap();
        (module, entry)
    }

    #[test]
    fn test_load_registers_tree() {
        let root = SysctlRoot::new();
        let (module, _) = load_recording(&root, 1, 0);

        assert_eq!(module.state(), ModuleState::Active);
        assert_eq!(root.list("").unwrap(), std::vec![CTL_DIR]);
        assert_eq!(root.list(CTL_DIR).unwrap(), std::vec![CTL_TRIGGER, CTL_TOTAL]);
        assert_eq!(root.mode(CTL_DIR), Ok(FileMode::DIR));
        assert_eq!(root.mode(TRIGGER_PATH), Ok(FileMode::WRITE_ONLY));
        assert_eq!(root.mode(TOTAL_PATH), Ok(FileMode::READ_ONLY));
        assert_eq!(read_total(&root), "0\n");
    }

    #[test]
    fn test_write_then_read_counter() {
        let root = SysctlRoot::new();
        let (module, entry) = load_recording(&root, 2, 20);

        assert_eq!(write_trigger(&root, "1 1048576\n"), Ok(10));
        assert_eq!(write_trigger(&root, "0 4096"), Ok(6));

        let calls = entry.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].nr_to_reclaim, 256);
        assert_eq!(calls[1].nr_to_reclaim, SWAP_CLUSTER_MAX);
        assert_eq!(module.total_reclaimed(), 40);
        assert_eq!(read_total(&root), "40\n");
    }

    #[test]
    fn test_trigger_is_not_readable() {
        let root = SysctlRoot::new();
        let (_module, _) = load_recording(&root, 1, 0);

        let mut buf = [0u8; 8];
        let mut pos = 0;
        assert_eq!(root.read(TRIGGER_PATH, &mut buf, &mut pos), Err(Errno::EINVAL));
    }

    #[test]
    fn test_counter_is_not_writable() {
        let root = SysctlRoot::new();
        let (module, _) = load_recording(&root, 1, 0);

        let mut pos = 0;
        assert_eq!(root.write(TOTAL_PATH, b"100", &mut pos), Err(Errno::EACCES));
        assert_eq!(module.total_reclaimed(), 0);
    }

    #[test]
    fn test_invalid_node_leaves_counter() {
        let root = SysctlRoot::new();
        let (module, entry) = load_recording(&root, 1, 10);

        assert_eq!(write_trigger(&root, "99999 4096"), Err(Errno::EINVAL));
        assert!(entry.calls().is_empty());
        assert_eq!(module.total_reclaimed(), 0);
    }

    #[test]
    fn test_load_resolves_symbol() {
        let _guard = testing::raw_entry_lock();
        testing::reset_raw_entry();

        let root = SysctlRoot::new();
        let module = CustomReclaimModule::load(
            Arc::new(FakeHost::new(1, 4096)),
            &FakeSymbols::with_free_pages(),
            &root,
            ReclaimConfig::default(),
        )
        .unwrap();

        assert_eq!(write_trigger(&root, "0 8192"), Ok(6));
        assert_eq!(testing::raw_entry_calls(), 1);
        assert_eq!(testing::raw_entry_last_node(), 0);
        assert_eq!(module.total_reclaimed(), SWAP_CLUSTER_MAX);
    }

    #[test]
    fn test_missing_symbol_aborts_load() {
        let root = SysctlRoot::new();
        let result = CustomReclaimModule::load(
            Arc::new(FakeHost::new(1, 4096)),
            &FakeSymbols::empty(),
            &root,
            ReclaimConfig::default(),
        );

        let err = result.err().unwrap();
        assert_eq!(err, ModuleError::SymbolNotFound(symbols::FREE_PAGES_SYMBOL));
        assert_eq!(err.as_errno(), Errno::ENOENT);
        assert!(!root.exists(CTL_DIR));
    }

    #[test]
    fn test_second_load_fails_registration() {
        let root = SysctlRoot::new();
        let (_first, _) = load_recording(&root, 1, 0);

        let second = CustomReclaimModule::load_with_entry(
            Arc::new(FakeHost::new(1, 4096)),
            Arc::new(RecordingEntry::returning(0)),
            &root,
            ReclaimConfig::default(),
        );

        let err = second.err().unwrap();
        assert_eq!(err, ModuleError::RegistrationFailed(Errno::EEXIST));
        assert_eq!(err.as_errno(), Errno::EFAULT);
    }

    #[test]
    fn test_exit_removes_tree() {
        let root = SysctlRoot::new();
        let (module, _) = load_recording(&root, 1, 0);

        module.exit();

        assert!(!root.exists(CTL_DIR));
        assert!(!root.exists(TRIGGER_PATH));
        assert_eq!(write_trigger(&root, "0 4096"), Err(Errno::ENOENT));
    }

    #[test]
    fn test_drop_removes_tree_and_allows_reload() {
        let root = SysctlRoot::new();
        {
            let (_module, _) = load_recording(&root, 1, 0);
            assert!(root.exists(CTL_DIR));
        }
        assert!(!root.exists(CTL_DIR));

        // Nova carga começa com o contador zerado
        let (module, _) = load_recording(&root, 1, 3);
        write_trigger(&root, "0 4096").unwrap();
        assert_eq!(module.total_reclaimed(), 3);
    }

    #[test]
    fn test_config_disables_swap() {
        let root = SysctlRoot::new();
        let entry = Arc::new(RecordingEntry::returning(0));
        let _module = CustomReclaimModule::load_with_entry(
            Arc::new(FakeHost::new(1, 4096)),
            entry.clone(),
            &root,
            ReclaimConfig::new().with_swap(false),
        )
        .unwrap();

        write_trigger(&root, "0 4096").unwrap();
        assert!(!entry.calls()[0].may_swap);
    }
}
