//! # Máscara GFP (classe de pressão)
//!
//! Descreve em que contextos de alocação o reclaim pode operar: se pode
//! dormir, fazer I/O, entrar no filesystem, etc. Os bits seguem o layout do
//! kernel hospedeiro, porque a máscara é repassada sem tradução para
//! `do_try_to_free_pages`.

use bitflags::bitflags;

use super::zones::ZonelistKind;

bitflags! {
    /// Flags `__GFP_*`
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GfpFlags: u32 {
        // Modificadores de zona
        const DMA = 0x01;
        const HIGHMEM = 0x02;
        const DMA32 = 0x04;
        const MOVABLE = 0x08;

        // Mobilidade
        const RECLAIMABLE = 0x10;

        // Modificadores de ação
        const HIGH = 0x20;
        const IO = 0x40;
        const FS = 0x80;
        const ZERO = 0x100;
        const ATOMIC = 0x200;
        const DIRECT_RECLAIM = 0x400;
        const KSWAPD_RECLAIM = 0x800;
        const WRITE = 0x1000;
        const NOWARN = 0x2000;
        const RETRY_MAYFAIL = 0x4000;
        const NOFAIL = 0x8000;
        const NORETRY = 0x10000;
        const MEMALLOC = 0x20000;
        const COMP = 0x40000;
        const NOMEMALLOC = 0x80000;
        const HARDWALL = 0x100000;
        const THISNODE = 0x200000;
        const ACCOUNT = 0x400000;

        /// Reclaim direto ou via kswapd
        const RECLAIM = Self::DIRECT_RECLAIM.bits() | Self::KSWAPD_RECLAIM.bits();
    }
}

// =============================================================================
// COMBINAÇÕES PADRÃO
// =============================================================================

/// Alocação normal do kernel: pode dormir, I/O e FS.
pub const GFP_KERNEL: GfpFlags = GfpFlags::RECLAIM.union(GfpFlags::IO).union(GfpFlags::FS);

/// Alocação de userspace restrita ao cpuset.
pub const GFP_USER: GfpFlags = GFP_KERNEL.union(GfpFlags::HARDWALL);

pub const GFP_HIGHUSER: GfpFlags = GFP_USER.union(GfpFlags::HIGHMEM);

/// Páginas de usuário migráveis (page cache, anônimas).
pub const GFP_HIGHUSER_MOVABLE: GfpFlags = GFP_HIGHUSER.union(GfpFlags::MOVABLE);

/// Bits que o reclaim herda do contexto de quem pediu.
pub const GFP_RECLAIM_MASK: GfpFlags = GfpFlags::RECLAIM
    .union(GfpFlags::HIGH)
    .union(GfpFlags::IO)
    .union(GfpFlags::FS)
    .union(GfpFlags::NOWARN)
    .union(GfpFlags::RETRY_MAYFAIL)
    .union(GfpFlags::NOFAIL)
    .union(GfpFlags::NORETRY)
    .union(GfpFlags::MEMALLOC)
    .union(GfpFlags::NOMEMALLOC)
    .union(GfpFlags::ATOMIC);

/// Máscara do reclaim forçado por nodo.
///
/// Comportamento de reclaim de `GFP_KERNEL`, zonas elegíveis de
/// `GFP_HIGHUSER_MOVABLE`. Mesma composição que `memory.reclaim` do cgroup v2.
pub const fn reclaim_gfp_mask() -> GfpFlags {
    GFP_KERNEL
        .intersection(GFP_RECLAIM_MASK)
        .union(GFP_HIGHUSER_MOVABLE.difference(GFP_RECLAIM_MASK))
}

/// Qual zonelist do nodo atende estas flags.
pub fn gfp_zonelist(flags: GfpFlags) -> ZonelistKind {
    if flags.contains(GfpFlags::THISNODE) {
        ZonelistKind::NoFallback
    } else {
        ZonelistKind::Fallback
    }
}
