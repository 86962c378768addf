//! # Filesystem
//!
//! Apenas a árvore de controle administrativo (`sysctl`), que é por onde o
//! operador dispara o reclaim.

pub mod sysctl;
