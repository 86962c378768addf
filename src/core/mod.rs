//! Core Module
//!
//! Infraestrutura comum do módulo: macros de log.

pub mod logging;
