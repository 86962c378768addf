//! Fakes do kernel hospedeiro usados pelos testes.

use std::boxed::Box;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::vec::Vec;

use crate::mm::gfp::{gfp_zonelist, GfpFlags};
use crate::mm::reclaim::{FreePagesEntry, RawFreePagesFn, ReclaimHost, ScanControl};
use crate::mm::zones::{NodeId, Zone, ZoneType, Zonelist, ZonelistKind, MAX_NR_ZONES};
use crate::module::SymbolResolver;

// =============================================================================
// ZONAS FALSAS
// =============================================================================

/// Endereço fictício da `struct zone` (`zone`, `node`). Nunca é desreferenciado.
pub fn fake_zone(node: NodeId, zone: ZoneType) -> *const Zone {
    ((node.as_usize() * MAX_NR_ZONES + zone.index() + 1) << 6) as *const Zone
}

/// Nodo dono de um endereço gerado por `fake_zone`.
pub fn fake_zone_node(zone: *const Zone) -> NodeId {
    NodeId::new((((zone as usize >> 6) - 1) / MAX_NR_ZONES) as u32)
}

static EMPTY_ZONELIST: Zonelist = Zonelist::new();

// =============================================================================
// HOSPEDEIRO
// =============================================================================

/// Topologia fixa, zonelists na ordem de fallback padrão.
pub struct FakeHost {
    nr_nodes: usize,
    page_size: usize,
    laptop_mode: bool,
    zonelists: Vec<Box<[Zonelist; 2]>>,
    zonelist_calls: AtomicUsize,
}

impl FakeHost {
    pub fn new(nr_nodes: usize, page_size: usize) -> Self {
        let zonelists = (0..nr_nodes)
            .map(|n| {
                let node = NodeId::new(n as u32);
                Box::new([
                    Zonelist::build(ZonelistKind::Fallback, node, nr_nodes, fake_zone),
                    Zonelist::build(ZonelistKind::NoFallback, node, nr_nodes, fake_zone),
                ])
            })
            .collect();

        Self {
            nr_nodes,
            page_size,
            laptop_mode: false,
            zonelists,
            zonelist_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_laptop_mode(mut self, on: bool) -> Self {
        self.laptop_mode = on;
        self
    }

    pub fn zonelist_calls(&self) -> usize {
        self.zonelist_calls.load(Ordering::Relaxed)
    }
}

impl ReclaimHost for FakeHost {
    fn nr_online_nodes(&self) -> usize {
        self.nr_nodes
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn laptop_mode(&self) -> bool {
        self.laptop_mode
    }

    fn node_zonelist(&self, node: NodeId, gfp: GfpFlags) -> &Zonelist {
        self.zonelist_calls.fetch_add(1, Ordering::Relaxed);
        match self.zonelists.get(node.as_usize()) {
            Some(lists) => &lists[gfp_zonelist(gfp) as usize],
            None => &EMPTY_ZONELIST,
        }
    }
}

// =============================================================================
// ENTRY POINT
// =============================================================================

/// O que o entry point viu em uma chamada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCall {
    pub nr_to_reclaim: u64,
    pub preferred_node: Option<NodeId>,
    pub gfp_mask: GfpFlags,
    pub may_writepage: bool,
    pub may_swap: bool,
}

/// Entry point que registra cada chamada e devolve `min(freed, pedido)`.
pub struct RecordingEntry {
    freed: u64,
    calls: Mutex<Vec<EntryCall>>,
}

impl RecordingEntry {
    pub fn returning(freed: u64) -> Self {
        Self {
            freed,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<EntryCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl FreePagesEntry for RecordingEntry {
    fn do_try_to_free_pages(&self, zonelist: &Zonelist, sc: &mut ScanControl) -> u64 {
        self.calls.lock().unwrap().push(EntryCall {
            nr_to_reclaim: sc.nr_to_reclaim,
            preferred_node: zonelist.first().map(|z| fake_zone_node(z.zone)),
            gfp_mask: sc.gfp_mask,
            may_writepage: sc.may_writepage(),
            may_swap: sc.may_swap(),
        });
        sc.nr_reclaimed = self.freed.min(sc.nr_to_reclaim);
        sc.nr_reclaimed
    }
}

// =============================================================================
// ENTRY POINT CRU (ABI C)
// =============================================================================

static RAW_LOCK: Mutex<()> = Mutex::new(());
static RAW_CALLS: AtomicU64 = AtomicU64::new(0);
static RAW_LAST_NODE: AtomicU64 = AtomicU64::new(u64::MAX);
static RAW_LAST_GFP: AtomicU64 = AtomicU64::new(0);

/// Libera exatamente o que foi pedido, escrevendo os campos de saída como
/// o hospedeiro faz.
unsafe extern "C" fn fake_do_try_to_free_pages(
    zonelist: *const Zonelist,
    sc: *mut ScanControl,
) -> u64 {
    let (zonelist, sc) = unsafe { (&*zonelist, &mut *sc) };
    RAW_CALLS.fetch_add(1, Ordering::SeqCst);
    let node = zonelist
        .first()
        .map_or(u64::MAX, |z| fake_zone_node(z.zone).as_u32() as u64);
    RAW_LAST_NODE.store(node, Ordering::SeqCst);
    RAW_LAST_GFP.store(sc.gfp_mask.bits() as u64, Ordering::SeqCst);

    sc.nr_scanned = sc.nr_to_reclaim;
    sc.nr_reclaimed = sc.nr_to_reclaim;
    sc.priority -= 1;
    sc.nr_reclaimed
}

/// Serializa testes que usam o entry point cru (estado global).
pub fn raw_entry_lock() -> MutexGuard<'static, ()> {
    RAW_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

pub fn reset_raw_entry() {
    RAW_CALLS.store(0, Ordering::SeqCst);
    RAW_LAST_NODE.store(u64::MAX, Ordering::SeqCst);
    RAW_LAST_GFP.store(0, Ordering::SeqCst);
}

pub fn raw_entry_addr() -> usize {
    fake_do_try_to_free_pages as RawFreePagesFn as usize
}

pub fn raw_entry_calls() -> u64 {
    RAW_CALLS.load(Ordering::SeqCst)
}

pub fn raw_entry_last_node() -> u64 {
    RAW_LAST_NODE.load(Ordering::SeqCst)
}

pub fn raw_entry_last_gfp() -> u32 {
    RAW_LAST_GFP.load(Ordering::SeqCst) as u32
}

// =============================================================================
// TABELA DE SÍMBOLOS
// =============================================================================

/// kallsyms de mentira
#[derive(Default)]
pub struct FakeSymbols {
    table: BTreeMap<&'static str, usize>,
}

impl FakeSymbols {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tabela com `do_try_to_free_pages` apontando para o entry point cru.
    pub fn with_free_pages() -> Self {
        Self::empty().with("do_try_to_free_pages", raw_entry_addr())
    }

    pub fn with(mut self, name: &'static str, addr: usize) -> Self {
        self.table.insert(name, addr);
        self
    }
}

// SAFETY: nos testes, `do_try_to_free_pages` só aponta para `fake_do_try_to_free_pages`
unsafe impl SymbolResolver for FakeSymbols {
    fn lookup_name(&self, name: &str) -> Option<usize> {
        self.table.get(name).copied()
    }
}
