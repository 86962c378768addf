//! # Memory Management Subsystem (MM)
//!
//! Só a parte do MM que o gatilho de reclaim precisa enxergar do kernel
//! hospedeiro: flags de alocação, zonas e zonelists, e o próprio reclaim.
//!
//! | Módulo    | Responsabilidade |
//! |-----------|------------------|
//! | `config`  | Constantes de reclaim e `ReclaimConfig`. |
//! | `gfp`     | Flags GFP e a máscara usada pelo reclaim por nodo. |
//! | `zones`   | `ZoneType`, `NodeId` e `Zonelist` (layout do hospedeiro). |
//! | `reclaim` | Descritor de scan, contrato com o hospedeiro, gatilho e handler. |

pub mod config;
pub mod gfp;
pub mod reclaim;
pub mod zones;

pub use config::ReclaimConfig;
pub use zones::{NodeId, ZoneType, Zonelist};
