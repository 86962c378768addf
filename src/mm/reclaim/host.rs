//! # Interface com o Kernel Hospedeiro
//!
//! O algoritmo de reclaim (scan das LRUs, back-off de prioridade,
//! throttling de writeback) pertence ao kernel hospedeiro. Este módulo só
//! descreve o que precisamos dele:
//!
//! | Trait | Papel |
//! |-------|-------|
//! | `ReclaimHost` | Topologia (nodos online, page size) e construção de zonelist |
//! | `FreePagesEntry` | O entry point interno `do_try_to_free_pages` |
//! | `NodeReclaim` | Capability usada pelo handler de sysctl: `reclaim(pages, node)` |
//!
//! O entry point não é exportado pelo hospedeiro. Ele é resolvido por nome
//! na carga do módulo (ver `module::symbols`) e embrulhado em
//! `RawFreePagesEntry`; daí em diante ninguém lida com ponteiro cru.

use crate::mm::gfp::GfpFlags;
use crate::mm::zones::{NodeId, Zonelist};

use super::scan::ScanControl;

/// Serviços do hospedeiro consultados a cada pedido.
pub trait ReclaimHost: Send + Sync {
    /// Número de nodos NUMA online
    fn nr_online_nodes(&self) -> usize;

    /// Tamanho de página em bytes
    fn page_size(&self) -> usize;

    /// `vm.laptop_mode` ativo (writeback adiado)
    fn laptop_mode(&self) -> bool;

    /// Zonelist de `node` para a máscara `gfp` (a do `pg_data_t` do nodo)
    fn node_zonelist(&self, node: NodeId, gfp: GfpFlags) -> &Zonelist;
}

/// Entry point de reclaim do hospedeiro.
///
/// Retorna quantas páginas foram efetivamente liberadas. Best-effort: pode
/// ser menos que `sc.nr_to_reclaim`, inclusive zero. O hospedeiro atualiza
/// os campos de saída de `sc`.
pub trait FreePagesEntry: Send + Sync {
    fn do_try_to_free_pages(&self, zonelist: &Zonelist, sc: &mut ScanControl) -> u64;
}

impl<F> FreePagesEntry for F
where
    F: Fn(&Zonelist, &mut ScanControl) -> u64 + Send + Sync,
{
    fn do_try_to_free_pages(&self, zonelist: &Zonelist, sc: &mut ScanControl) -> u64 {
        self(zonelist, sc)
    }
}

/// Assinatura ABI de `do_try_to_free_pages`:
/// `unsigned long (struct zonelist *, struct scan_control *)`.
pub type RawFreePagesFn =
    unsafe extern "C" fn(zonelist: *const Zonelist, sc: *mut ScanControl) -> u64;

/// Entry point resolvido a partir de um endereço da tabela de símbolos.
#[derive(Clone, Copy)]
pub struct RawFreePagesEntry {
    func: RawFreePagesFn,
}

impl RawFreePagesEntry {
    pub const fn new(func: RawFreePagesFn) -> Self {
        Self { func }
    }

    /// Converte um endereço resolvido em entry point. `None` para endereço nulo.
    ///
    /// # Safety
    ///
    /// `addr`, se não nulo, deve ser o endereço de uma função com a
    /// assinatura `RawFreePagesFn` que permaneça válida enquanto o valor
    /// retornado existir.
    pub unsafe fn from_addr(addr: usize) -> Option<Self> {
        if addr == 0 {
            return None;
        }
        // SAFETY: endereço não nulo de uma função com esta assinatura (contrato do chamador)
        let func = unsafe { core::mem::transmute::<usize, RawFreePagesFn>(addr) };
        Some(Self { func })
    }

    pub fn addr(&self) -> usize {
        self.func as usize
    }
}

impl FreePagesEntry for RawFreePagesEntry {
    fn do_try_to_free_pages(&self, zonelist: &Zonelist, sc: &mut ScanControl) -> u64 {
        // SAFETY: `Zonelist` e `ScanControl` têm o layout do hospedeiro;
        // `sc` é exclusivo durante a chamada; validade de `func` garantida
        // na construção.
        unsafe { (self.func)(zonelist, sc) }
    }
}

impl core::fmt::Debug for RawFreePagesEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RawFreePagesEntry({:#x})", self.addr())
    }
}

/// Capability de reclaim por nodo.
///
/// O chamador já validou o nodo; a implementação só executa.
pub trait NodeReclaim: Send + Sync {
    fn reclaim(&self, nr_pages: u64, node: NodeId) -> u64;
}
