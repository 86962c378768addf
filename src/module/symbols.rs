//! # Resolução de Símbolos
//!
//! `do_try_to_free_pages` não é exportado pelo hospedeiro. O endereço vem
//! da tabela de símbolos (kallsyms) e é resolvido uma única vez, na carga.
//! Símbolo ausente aborta a carga.

use crate::mm::reclaim::RawFreePagesEntry;

use super::ModuleError;

/// Nome do entry point de reclaim direto
pub const FREE_PAGES_SYMBOL: &str = "do_try_to_free_pages";

/// Lookup de símbolos por nome (`kallsyms_lookup_name`).
///
/// # Safety
///
/// Um endereço devolvido para `FREE_PAGES_SYMBOL` precisa ser o de uma
/// função com a assinatura `RawFreePagesFn`, válida enquanto o módulo
/// estiver carregado.
pub unsafe trait SymbolResolver {
    fn lookup_name(&self, name: &str) -> Option<usize>;
}

/// Endereço de `name`. Endereço nulo conta como não encontrado.
pub fn resolve(resolver: &dyn SymbolResolver, name: &'static str) -> Result<usize, ModuleError> {
    match resolver.lookup_name(name) {
        Some(addr) if addr != 0 => Ok(addr),
        _ => {
            crate::kfail!("(Module) Símbolo '{}' não encontrado", name);
            Err(ModuleError::SymbolNotFound(name))
        }
    }
}

/// Resolve o entry point de reclaim direto.
pub fn resolve_free_pages(resolver: &dyn SymbolResolver) -> Result<RawFreePagesEntry, ModuleError> {
    let addr = resolve(resolver, FREE_PAGES_SYMBOL)?;
    crate::kdebug!("(Module) {} @ {:#x}", FREE_PAGES_SYMBOL, addr);

    // SAFETY: contrato de `SymbolResolver`
    unsafe { RawFreePagesEntry::from_addr(addr) }.ok_or(ModuleError::SymbolNotFound(FREE_PAGES_SYMBOL))
}
