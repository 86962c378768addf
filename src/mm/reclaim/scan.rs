//! # Scan Control
//!
//! Descritor de um pedido de reclaim. Vive na stack do gatilho durante uma
//! chamada e é passado por ponteiro mutável ao entry point do hospedeiro,
//! que atualiza os campos de saída (`nr_scanned`, `nr_reclaimed`, `nr`,
//! `priority`).
//!
//! ## 🏗️ Layout (x86_64)
//!
//! Espelho de `struct scan_control` do hospedeiro:
//!
//! ```text
//!   0  nr_to_reclaim          56  nr_scanned
//!   8  nodemask *             64  nr_reclaimed
//!  16  target_mem_cgroup *    72  nr { dirty .. taken }   (7 x u32)
//!  24  anon_cost             104  reclaim_state
//!  32  file_cost             112  (fim)
//!  40  bitfields (13 bits)
//!  42  order  43 priority  44 reclaim_idx
//!  48  gfp_mask
//! ```
//!
//! Os bitfields ocupam só os bytes 40..42; `order` vem logo depois, por
//! isso a palavra é `u16`.

use core::ptr;

use bitflags::bitflags;

use crate::mm::config::{ReclaimConfig, DEF_PRIORITY, SWAP_CLUSTER_MAX};
use crate::mm::gfp::{reclaim_gfp_mask, GfpFlags};
use crate::mm::zones::{Nodemask, ZoneType};

bitflags! {
    /// Bitfields de `scan_control`, do bit menos significativo em diante
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScanFlags: u16 {
        /// `may_deactivate`: LRU anônima ativa pode ser desativada
        const DEACTIVATE_ANON = 1 << 0;
        /// `may_deactivate`: LRU de arquivo ativa pode ser desativada
        const DEACTIVATE_FILE = 1 << 1;
        const FORCE_DEACTIVATE = 1 << 2;
        const SKIPPED_DEACTIVATE = 1 << 3;
        /// Pode escrever páginas sujas
        const MAY_WRITEPAGE = 1 << 4;
        /// Pode reclamar páginas mapeadas
        const MAY_UNMAP = 1 << 5;
        /// Pode mandar páginas anônimas para o swap
        const MAY_SWAP = 1 << 6;
        const MEMCG_LOW_RECLAIM = 1 << 7;
        const MEMCG_LOW_SKIPPED = 1 << 8;
        const HIBERNATION_MODE = 1 << 9;
        const COMPACTION_READY = 1 << 10;
        const CACHE_TRIM_MODE = 1 << 11;
        const FILE_IS_TINY = 1 << 12;
    }
}

/// `struct mem_cgroup` do hospedeiro. Sem cgroup alvo aqui: sempre nulo.
#[repr(C)]
pub struct MemCgroup {
    _opaque: [u8; 0],
}

/// Contadores por passada (`sc->nr`), preenchidos pelo hospedeiro
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct ScanCounters {
    pub dirty: u32,
    pub unqueued_dirty: u32,
    pub congested: u32,
    pub writeback: u32,
    pub immediate: u32,
    pub file_taken: u32,
    pub taken: u32,
}

/// `struct reclaim_state`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct ReclaimState {
    pub reclaimed_slab: u64,
}

/// Pedido de reclaim (`struct scan_control`)
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ScanControl {
    /// Quantas páginas tentar liberar
    pub nr_to_reclaim: u64,
    /// Nodos permitidos; nulo = todos
    pub nodemask: *const Nodemask,
    /// Cgroup alvo; nulo = reclaim global
    pub target_mem_cgroup: *const MemCgroup,
    pub anon_cost: u64,
    pub file_cost: u64,
    pub flags: ScanFlags,
    /// Ordem da alocação
    pub order: i8,
    /// Varre `lru_size >> priority` páginas por passada
    pub priority: i8,
    /// Zona mais alta de onde isolar páginas
    pub reclaim_idx: i8,
    /// Contexto de alocação permitido
    pub gfp_mask: GfpFlags,
    /// Saída: páginas inativas varridas
    pub nr_scanned: u64,
    /// Saída: páginas liberadas até agora
    pub nr_reclaimed: u64,
    pub nr: ScanCounters,
    pub reclaim_state: ReclaimState,
}

impl ScanControl {
    /// Pedido de reclaim forçado por nodo.
    ///
    /// Mesma política do `memory.reclaim` do cgroup v2, sem cgroup alvo:
    /// lote mínimo `SWAP_CLUSTER_MAX`, todas as zonas, prioridade padrão,
    /// writeback bloqueado em laptop mode.
    pub fn node_reclaim(nr_to_reclaim: u64, laptop_mode: bool, config: &ReclaimConfig) -> Self {
        let mut flags = ScanFlags::MAY_UNMAP;
        flags.set(ScanFlags::MAY_WRITEPAGE, !laptop_mode);
        flags.set(ScanFlags::MAY_SWAP, config.may_swap);

        Self {
            nr_to_reclaim: nr_to_reclaim.max(SWAP_CLUSTER_MAX),
            nodemask: ptr::null(),
            target_mem_cgroup: ptr::null(),
            anon_cost: 0,
            file_cost: 0,
            flags,
            order: 0,
            priority: DEF_PRIORITY,
            reclaim_idx: ZoneType::highest().index() as i8,
            gfp_mask: reclaim_gfp_mask(),
            nr_scanned: 0,
            nr_reclaimed: 0,
            nr: ScanCounters::default(),
            reclaim_state: ReclaimState::default(),
        }
    }

    pub fn may_writepage(&self) -> bool {
        self.flags.contains(ScanFlags::MAY_WRITEPAGE)
    }

    pub fn may_unmap(&self) -> bool {
        self.flags.contains(ScanFlags::MAY_UNMAP)
    }

    pub fn may_swap(&self) -> bool {
        self.flags.contains(ScanFlags::MAY_SWAP)
    }
}
