//! # Kernel Module System
//!
//! Ciclo de vida do módulo `custom_reclaim`.
//!
//! ## Componentes
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | `abi` | Metadados (nome, descrição, licença) |
//! | `symbols` | Resolução de símbolos internos do hospedeiro |
//! | `custom_reclaim` | Carga/descarga e a árvore de sysctl |
//!
//! ## Uso
//!
//! ```ignore
//! module::init(host, &kallsyms)?;   // registra custom_reclaim/ em SYSCTL
//! // ... echo "0 1048576" > /proc/sys/custom_reclaim/custom_reclaim
//! module::exit();
//! ```

pub mod abi;
pub mod custom_reclaim;
pub mod symbols;

use alloc::sync::Arc;
use core::fmt;

use spin::Mutex;

use crate::fs::sysctl::SYSCTL;
use crate::mm::config::ReclaimConfig;
use crate::mm::reclaim::ReclaimHost;
use crate::sys::Errno;

// Re-exports
pub use abi::{ModuleInfo, MODULE_INFO};
pub use custom_reclaim::CustomReclaimModule;
pub use symbols::SymbolResolver;

/// Estado de uma instância do módulo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Tabela registrada, aceitando pedidos
    Active,
    /// Tabela removida
    Unloaded,
}

/// Erros do sistema de módulos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleError {
    /// Símbolo interno do hospedeiro não encontrado
    SymbolNotFound(&'static str),
    /// Registro da tabela de sysctl falhou
    RegistrationFailed(Errno),
    /// Já existe uma instância carregada
    AlreadyLoaded,
}

impl ModuleError {
    /// Código devolvido ao hospedeiro pela rotina de init
    pub fn as_errno(&self) -> Errno {
        match self {
            ModuleError::SymbolNotFound(_) => Errno::ENOENT,
            ModuleError::RegistrationFailed(_) => Errno::EFAULT,
            ModuleError::AlreadyLoaded => Errno::EEXIST,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleError::SymbolNotFound(_) => "symbol not found",
            ModuleError::RegistrationFailed(_) => "sysctl registration failed",
            ModuleError::AlreadyLoaded => "module already loaded",
        }
    }
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::SymbolNotFound(name) => write!(f, "{}: {}", self.as_str(), name),
            ModuleError::RegistrationFailed(err) => write!(f, "{}: {}", self.as_str(), err),
            ModuleError::AlreadyLoaded => f.write_str(self.as_str()),
        }
    }
}

/// Instância ligada à árvore global
static LOADED: Mutex<Option<CustomReclaimModule<'static>>> = Mutex::new(None);

/// Carrega o módulo em `SYSCTL` com a configuração padrão.
pub fn init(host: Arc<dyn ReclaimHost>, resolver: &dyn SymbolResolver) -> Result<(), ModuleError> {
    let mut loaded = LOADED.lock();
    if loaded.is_some() {
        crate::kwarn!("(Module) {} já carregado", MODULE_INFO.name);
        return Err(ModuleError::AlreadyLoaded);
    }

    let module = CustomReclaimModule::load(host, resolver, &SYSCTL, ReclaimConfig::default())?;
    *loaded = Some(module);
    Ok(())
}

/// Rotina de init no formato do hospedeiro: 0 ou `-errno`.
pub fn init_module(host: Arc<dyn ReclaimHost>, resolver: &dyn SymbolResolver) -> isize {
    match init(host, resolver) {
        Ok(()) => 0,
        Err(err) => err.as_errno().as_isize(),
    }
}

/// Descarrega a instância global, se houver.
pub fn exit() {
    if let Some(module) = LOADED.lock().take() {
        module.exit();
    }
}

/// Total reclamado pela instância global
pub fn total_reclaimed() -> Option<u64> {
    LOADED.lock().as_ref().map(|m| m.total_reclaimed())
}
