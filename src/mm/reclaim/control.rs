//! # Handler do Arquivo de Controle
//!
//! Atende `custom_reclaim/custom_reclaim` (modo 0200). O operador escreve
//! `node_index byte_count`; o handler valida, converte bytes em páginas e
//! dispara o reclaim. O total reclamado é somado em um contador atômico
//! exposto em `custom_reclaim/total_nr_reclaimed_pages`.
//!
//! ## Regras
//! - Leitura: sempre `EINVAL`.
//! - `node_index >= nr_online_nodes`: `EINVAL`, nada é reclamado.
//! - Menos de uma página: sucesso sem reclaim.
//! - Depois de validado, a escrita é sucesso não importa quantas páginas
//!   o hospedeiro conseguiu liberar.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::fs::sysctl::ulongvec::{parse_ulong_vec, ULongBounds};
use crate::fs::sysctl::{ProcHandler, ProcOp};
use crate::mm::config::page_counter_max;
use crate::mm::zones::NodeId;
use crate::sys::{Errno, SysResult};

use super::host::{NodeReclaim, ReclaimHost};

/// Um pedido lido do arquivo de controle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReclaimRequest {
    /// Índice do nodo alvo
    pub node: u64,
    /// Quantidade de memória a reclamar, em bytes
    pub bytes: u64,
}

impl ReclaimRequest {
    pub const fn new(node: u64, bytes: u64) -> Self {
        Self { node, bytes }
    }

    /// Lê o par `node_index byte_count`. Retorna o pedido e os bytes consumidos.
    pub fn parse(data: &[u8]) -> SysResult<(Self, usize)> {
        let mut values = [0u64; 2];
        let parsed = parse_ulong_vec(data, &mut values, ULongBounds::NONE)?;
        if parsed.count < values.len() {
            return Err(Errno::EINVAL);
        }
        Ok((Self::new(values[0], values[1]), parsed.consumed))
    }

    /// Bytes convertidos em páginas inteiras, limitado a `page_counter_max`.
    pub fn nr_pages(&self, page_size: usize) -> u64 {
        if page_size == 0 {
            return 0;
        }
        (self.bytes / page_size as u64).min(page_counter_max(page_size))
    }
}

/// Handler de `custom_reclaim/custom_reclaim`
pub struct CustomReclaimHandler {
    host: Arc<dyn ReclaimHost>,
    reclaimer: Arc<dyn NodeReclaim>,
    total: Arc<AtomicU64>,
}

impl CustomReclaimHandler {
    pub fn new(
        host: Arc<dyn ReclaimHost>,
        reclaimer: Arc<dyn NodeReclaim>,
        total: Arc<AtomicU64>,
    ) -> Self {
        Self {
            host,
            reclaimer,
            total,
        }
    }

    /// Valida e executa um pedido. Retorna as páginas liberadas nesta chamada.
    pub fn submit(&self, request: ReclaimRequest) -> SysResult<u64> {
        let nr_online = self.host.nr_online_nodes();
        if request.node >= nr_online as u64 {
            crate::kwarn!(
                "(Reclaim) node_idx={} fora do range (nr_online_nodes={})",
                request.node,
                nr_online
            );
            return Err(Errno::EINVAL);
        }

        let nr_pages = request.nr_pages(self.host.page_size());
        crate::kdebug!(
            "(Reclaim) node_idx={} bytes={} nr_pages={}",
            request.node,
            request.bytes,
            nr_pages
        );

        let reclaimed = if nr_pages > 0 {
            self.reclaimer.reclaim(nr_pages, NodeId::new(request.node as u32))
        } else {
            0
        };

        let before = self.total.fetch_add(reclaimed, Ordering::Relaxed);
        crate::ktrace!(
            "(Reclaim) reclaimed={} total={}",
            reclaimed,
            before.wrapping_add(reclaimed)
        );

        Ok(reclaimed)
    }

    /// Total acumulado desde a carga
    pub fn total_reclaimed(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl ProcHandler for CustomReclaimHandler {
    fn handle(&self, op: ProcOp<'_>, pos: &mut u64) -> SysResult<usize> {
        let data = match op {
            ProcOp::Read(_) => return Err(Errno::EINVAL),
            ProcOp::Write(data) => data,
        };

        if data.is_empty() {
            return Ok(0);
        }
        // Só a escrita no início do arquivo carrega um pedido
        if *pos != 0 {
            *pos = pos.saturating_add(data.len() as u64);
            return Ok(data.len());
        }

        let (request, consumed) = ReclaimRequest::parse(data)?;
        self.submit(request)?;

        *pos = pos.saturating_add(consumed as u64);
        Ok(consumed)
    }
}
