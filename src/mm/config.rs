//! # Configuração do Reclaim
//!
//! Constantes herdadas do subsistema de reclaim do kernel hospedeiro e a
//! configuração de runtime do gatilho manual.

// =============================================================================
// CONSTANTES DO RECLAIM
// =============================================================================

/// Lote mínimo de páginas por pedido de reclaim.
///
/// Pedidos menores são arredondados para cima antes de chegar ao
/// `do_try_to_free_pages`.
pub const SWAP_CLUSTER_MAX: u64 = 32;

/// Prioridade inicial de scan (varre `lru_size >> priority` por passada).
pub const DEF_PRIORITY: i8 = 12;

/// Número máximo de nodos NUMA (`1 << NODES_SHIFT`, dimensiona a zonelist).
pub const MAX_NUMNODES: usize = 64;

/// Limite do contador de páginas para um tamanho de página.
///
/// Mesmo teto que o page_counter de cgroups aplica (`LONG_MAX / PAGE_SIZE`).
#[inline]
pub const fn page_counter_max(page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    i64::MAX as u64 / page_size as u64
}

// =============================================================================
// CONFIGURAÇÃO DE RUNTIME
// =============================================================================

/// Política fixa aplicada a cada pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReclaimConfig {
    /// Páginas anônimas podem ir para o swap
    pub may_swap: bool,
}

impl ReclaimConfig {
    pub const fn new() -> Self {
        Self { may_swap: true }
    }

    pub const fn with_swap(mut self, may_swap: bool) -> Self {
        self.may_swap = may_swap;
        self
    }
}

impl Default for ReclaimConfig {
    fn default() -> Self {
        Self::new()
    }
}
