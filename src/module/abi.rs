//! Metadados do módulo (o que `modinfo` mostraria)

/// Informações do módulo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Nome do módulo
    pub name: &'static str,
    /// Descrição curta
    pub description: &'static str,
    /// Licença declarada ao hospedeiro
    pub license: &'static str,
    /// Versão do módulo
    pub version: &'static str,
}

impl ModuleInfo {
    /// Licença compatível com os símbolos internos que o módulo usa
    pub fn is_gpl_compatible(&self) -> bool {
        matches!(
            self.license,
            "GPL" | "GPL v2" | "GPL and additional rights" | "Dual BSD/GPL" | "Dual MIT/GPL"
        )
    }
}

/// Metadados do `custom_reclaim`
pub const MODULE_INFO: ModuleInfo = ModuleInfo {
    name: "custom_reclaim",
    description: "Module to provide per-node interface similar to cgroup-v2 memory.reclaim.",
    license: "GPL",
    version: env!("CARGO_PKG_VERSION"),
};
