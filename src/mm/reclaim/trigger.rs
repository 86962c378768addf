//! # Reclaim Trigger
//!
//! Monta o `ScanControl`, resolve a zonelist do nodo e chama o entry point
//! do hospedeiro. Não valida o nodo: isso é feito pelo handler de sysctl.

use alloc::sync::Arc;

use crate::mm::config::ReclaimConfig;
use crate::mm::zones::NodeId;

use super::host::{FreePagesEntry, NodeReclaim, ReclaimHost};
use super::scan::ScanControl;

/// Pede ao hospedeiro que libere `nr_to_reclaim` páginas de `node`.
///
/// O pedido é arredondado para cima até `SWAP_CLUSTER_MAX`. Retorna quantas
/// páginas foram de fato liberadas (pode ser zero).
pub fn do_custom_reclaim(
    host: &dyn ReclaimHost,
    entry: &dyn FreePagesEntry,
    config: &ReclaimConfig,
    nr_to_reclaim: u64,
    node: NodeId,
) -> u64 {
    let mut sc = ScanControl::node_reclaim(nr_to_reclaim, host.laptop_mode(), config);
    let zonelist = host.node_zonelist(node, sc.gfp_mask);

    crate::ktrace!("(Reclaim) {} {:?} zonas={}", node, sc, zonelist.len());

    let freed = entry.do_try_to_free_pages(zonelist, &mut sc);
    crate::ktrace!(
        "(Reclaim) {} freed={} scanned={} priority={}",
        node,
        freed,
        sc.nr_scanned,
        sc.priority
    );
    freed
}

/// Implementação de `NodeReclaim` sobre o hospedeiro e o entry point resolvido.
pub struct CustomReclaimer {
    host: Arc<dyn ReclaimHost>,
    entry: Arc<dyn FreePagesEntry>,
    config: ReclaimConfig,
}

impl CustomReclaimer {
    pub fn new(
        host: Arc<dyn ReclaimHost>,
        entry: Arc<dyn FreePagesEntry>,
        config: ReclaimConfig,
    ) -> Self {
        Self {
            host,
            entry,
            config,
        }
    }
}

impl NodeReclaim for CustomReclaimer {
    fn reclaim(&self, nr_pages: u64, node: NodeId) -> u64 {
        do_custom_reclaim(
            self.host.as_ref(),
            self.entry.as_ref(),
            &self.config,
            nr_pages,
            node,
        )
    }
}
