//! # Page Reclaim Subsystem
//!
//! Reclaim disparado pelo operador, um nodo por vez.
//!
//! ## Fluxo
//!
//! ```text
//! write("node bytes") -> CustomReclaimHandler -> NodeReclaim::reclaim
//!     -> do_custom_reclaim -> ScanControl + Zonelist -> do_try_to_free_pages
//! ```
//!
//! O kernel hospedeiro entra por dois traits: `ReclaimHost` (topologia,
//! tamanho de página, laptop mode, zonelists) e `FreePagesEntry` (a rotina
//! de reclaim direto).

pub mod control;
pub mod host;
pub mod scan;
pub mod trigger;

pub use control::{CustomReclaimHandler, ReclaimRequest};
pub use host::{FreePagesEntry, NodeReclaim, RawFreePagesEntry, RawFreePagesFn, ReclaimHost};
pub use scan::{ScanControl, ScanCounters, ScanFlags};
pub use trigger::{do_custom_reclaim, CustomReclaimer};
