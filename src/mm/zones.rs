//! # Zonas, Nodos e Zonelists
//!
//! Tipos que o gatilho de reclaim troca com o kernel hospedeiro.
//!
//! ## 🎯 Propósito
//!
//! A memória física de cada nodo NUMA é dividida em zonas (DMA, DMA32,
//! Normal, Movable). O reclaim não recebe o nodo diretamente: recebe uma
//! **zonelist**, a lista ordenada de zonas candidatas para uma máscara GFP.
//! Para mirar um nodo, usamos a zonelist do próprio nodo, que começa pelas
//! zonas dele.
//!
//! ## 🏗️ Layout
//!
//! `ZoneRef` e `Zonelist` espelham `struct zoneref` / `struct zonelist` do
//! hospedeiro (x86_64, `NODES_SHIFT = 6`). A zonelist é do hospedeiro: vive
//! no `pg_data_t` do nodo e só é lida daqui.
//!
//! ```text
//! Fallback   → zonas do nodo alvo (da mais alta para a mais baixa),
//!              depois os demais nodos online em ordem circular
//! NoFallback → apenas as zonas do nodo alvo
//! ```

use core::fmt;
use core::ptr;

use super::config::MAX_NUMNODES;

// =============================================================================
// DEFINIÇÃO DE ZONAS
// =============================================================================

/// Tipo de zona de memória
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ZoneType {
    /// DMA Zone: 0 - 16 MB
    DMA = 0,

    /// DMA32 Zone: 16 MB - 4 GB
    DMA32 = 1,

    /// Normal Zone: 4 GB+
    Normal = 2,

    /// Movable Zone: memória que pode ser migrada/compactada
    Movable = 3,
}

/// Número de zonas por nodo
pub const MAX_NR_ZONES: usize = 4;

impl ZoneType {
    /// Índice da zona (`reclaim_idx` compara contra isso)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Todas as zonas em ordem
    pub fn all() -> &'static [Self] {
        &[Self::DMA, Self::DMA32, Self::Normal, Self::Movable]
    }

    /// Zona mais alta do nodo
    pub const fn highest() -> Self {
        Self::Movable
    }
}

/// `struct zone` do hospedeiro. Só existe atrás de ponteiro.
#[repr(C)]
pub struct Zone {
    _opaque: [u8; 0],
}

// =============================================================================
// NODOS
// =============================================================================

/// Índice de nodo NUMA
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

/// `nodemask_t` do hospedeiro. O reclaim por nodo passa sempre ponteiro
/// nulo (todos os nodos); o nodo vem da zonelist.
#[repr(C)]
pub struct Nodemask {
    _opaque: [u8; 0],
}

// =============================================================================
// ZONELIST
// =============================================================================

/// Qual das zonelists de um nodo usar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonelistKind {
    /// Nodo alvo primeiro, depois os outros
    Fallback = 0,
    /// Apenas o nodo alvo (`__GFP_THISNODE`)
    NoFallback = 1,
}

/// `struct zoneref`: zona + índice dela no nodo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ZoneRef {
    pub zone: *const Zone,
    pub zone_idx: i32,
}

impl ZoneRef {
    /// Terminador da zonelist (`zone == NULL`)
    pub const END: Self = Self {
        zone: ptr::null(),
        zone_idx: 0,
    };

    pub fn is_end(&self) -> bool {
        self.zone.is_null()
    }
}

/// Zonas por zonelist, sem contar o terminador
pub const MAX_ZONES_PER_ZONELIST: usize = MAX_NUMNODES * MAX_NR_ZONES;

/// `struct zonelist`: zonas candidatas, terminada por `ZoneRef::END`.
#[repr(C)]
pub struct Zonelist {
    zonerefs: [ZoneRef; MAX_ZONES_PER_ZONELIST + 1],
}

// SAFETY: zonelists do hospedeiro são montadas no boot/hotplug e lidas
// sem lock por todas as CPUs; daqui só são lidas.
unsafe impl Send for Zonelist {}
unsafe impl Sync for Zonelist {}

impl Zonelist {
    pub const fn new() -> Self {
        Self {
            zonerefs: [ZoneRef::END; MAX_ZONES_PER_ZONELIST + 1],
        }
    }

    /// Monta a zonelist de `node` na ordem de fallback padrão.
    ///
    /// `zone_of` devolve a `struct zone` de um nodo. Nodos fora de
    /// `0..nr_online_nodes` não entram.
    pub fn build<F>(kind: ZonelistKind, node: NodeId, nr_online_nodes: usize, zone_of: F) -> Self
    where
        F: Fn(NodeId, ZoneType) -> *const Zone,
    {
        let mut list = Self::new();
        let nr_nodes = nr_online_nodes.min(MAX_NUMNODES);
        if node.as_usize() >= nr_nodes {
            return list;
        }

        let span = match kind {
            ZonelistKind::Fallback => nr_nodes,
            ZonelistKind::NoFallback => 1,
        };

        for step in 0..span {
            let nid = NodeId::new(((node.as_usize() + step) % nr_nodes) as u32);
            for zone in ZoneType::all().iter().rev() {
                list.push(ZoneRef {
                    zone: zone_of(nid, *zone),
                    zone_idx: zone.index() as i32,
                });
            }
        }

        list
    }

    /// Adiciona uma zona no fim. Retorna `false` se a lista está cheia
    /// (o último slot é sempre o terminador).
    pub fn push(&mut self, zref: ZoneRef) -> bool {
        let len = self.len();
        if len == MAX_ZONES_PER_ZONELIST || zref.is_end() {
            return false;
        }
        self.zonerefs[len] = zref;
        true
    }

    /// Zonas até o terminador
    pub fn iter(&self) -> impl Iterator<Item = &ZoneRef> + '_ {
        self.zonerefs.iter().take_while(|z| !z.is_end())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.zonerefs[0].is_end()
    }

    /// Zona preferida (primeira da lista)
    pub fn first(&self) -> Option<&ZoneRef> {
        self.iter().next()
    }
}

impl Default for Zonelist {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Zonelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::mem::{offset_of, size_of};

    use super::*;
    use crate::testing::{fake_zone, fake_zone_node};

    fn nodes_and_zones(list: &Zonelist) -> std::vec::Vec<(u32, i32)> {
        list.iter()
            .map(|z| (fake_zone_node(z.zone).as_u32(), z.zone_idx))
            .collect()
    }

    #[test]
    fn test_fallback_starts_at_target_node() {
        let list = Zonelist::build(ZonelistKind::Fallback, NodeId::new(1), 3, fake_zone);

        assert_eq!(list.len(), 3 * MAX_NR_ZONES);
        let order = nodes_and_zones(&list);
        assert_eq!(&order[..5], &[(1, 3), (1, 2), (1, 1), (1, 0), (2, 3)]);
        assert_eq!(order[11], (0, 0));
    }

    #[test]
    fn test_nofallback_stays_on_node() {
        let list = Zonelist::build(ZonelistKind::NoFallback, NodeId::new(2), 4, fake_zone);
        assert_eq!(list.len(), MAX_NR_ZONES);
        assert!(list.iter().all(|z| fake_zone_node(z.zone) == NodeId::new(2)));
    }

    #[test]
    fn test_offline_node_gives_empty_list() {
        let list = Zonelist::build(ZonelistKind::Fallback, NodeId::new(5), 2, fake_zone);
        assert!(list.is_empty());
        assert!(list.first().is_none());
    }

    #[test]
    fn test_push_keeps_terminator() {
        let mut list = Zonelist::new();
        let zref = ZoneRef {
            zone: fake_zone(NodeId::new(0), ZoneType::Normal),
            zone_idx: ZoneType::Normal.index() as i32,
        };
        for _ in 0..MAX_ZONES_PER_ZONELIST {
            assert!(list.push(zref));
        }
        assert!(!list.push(zref));
        assert!(!Zonelist::new().push(ZoneRef::END));
        assert_eq!(list.len(), MAX_ZONES_PER_ZONELIST);
        assert!(list.zonerefs[MAX_ZONES_PER_ZONELIST].is_end());
    }

    #[test]
    fn test_highest_zone_index() {
        assert_eq!(ZoneType::highest().index(), MAX_NR_ZONES - 1);
        assert_eq!(ZoneType::all().len(), MAX_NR_ZONES);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_host_layout() {
        assert_eq!(size_of::<ZoneRef>(), 16);
        assert_eq!(offset_of!(ZoneRef, zone_idx), 8);
        assert_eq!(size_of::<Zonelist>(), 16 * (MAX_ZONES_PER_ZONELIST + 1));
    }
}
