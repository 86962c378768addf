//! # Custom Reclaim
//!
//! Gatilho de reclaim por nodo NUMA, no estilo do `memory.reclaim` do
//! cgroup v2, exposto como arquivo de sysctl.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Controle:** `custom_reclaim/custom_reclaim` recebe `node_index byte_count`.
//! - **Contabilidade:** `custom_reclaim/total_nr_reclaimed_pages` mostra o total liberado.
//! - **Reclaim:** monta o descritor de scan e chama a rotina de reclaim direto do kernel
//!   hospedeiro, resolvida por nome na carga.
//!
//! ## 🏗️ Arquitetura dos Módulos
//!
//! | Módulo   | Responsabilidade |
//! |----------|------------------|
//! | `core`   | Macros de log (`kinfo!`, `kwarn!`, ...). |
//! | `sys`    | `Errno` e `SysResult`. |
//! | `mm`     | Flags GFP, zonas/zonelists, descritor de scan e o gatilho de reclaim. |
//! | `fs`     | Árvore de sysctl e parser de vetores `unsigned long`. |
//! | `module` | Ciclo de vida (carga/descarga) e resolução de símbolos. |

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[doc(hidden)]
pub use log as __log;

pub mod core;
pub mod fs;
pub mod mm;
pub mod module;
pub mod sys;

#[cfg(test)]
mod testing;
