//! System Definitions (ABI).
//!
//! Códigos de erro devolvidos ao processo que escreve/lê os arquivos de controle.

pub mod error;

pub use error::{Errno, SysResult};
