//! # Sysctl - Árvore de Controle Administrativo
//!
//! Árvore hierárquica de arquivos chave/valor (`/proc/sys`). Módulos
//! registram uma tabela (diretório + entradas) na carga e removem na
//! descarga; cada entrada tem um `ProcHandler` que atende leitura/escrita.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Registro:** `register_table` / `unregister_table` com handle próprio.
//! - **Resolução de caminho:** `custom_reclaim/custom_reclaim` → handler.
//! - **Permissões:** escrita exige bit de escrita no modo da entrada.
//!   Leitura é sempre entregue ao handler, que decide se aceita.
//!
//! ## 🔍 Concorrência
//!
//! A tabela fica sob `spin::Mutex`, mas o lock é solto antes de chamar o
//! handler: um reclaim pode demorar e não deve travar outros acessos.

pub mod table;
pub mod ulongvec;


use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use spin::Mutex;

use crate::sys::{Errno, SysResult};

pub use table::{CtlKind, CtlTable, FileMode, ProcHandler, ProcOp};
pub use ulongvec::{AtomicULongHandler, ULongBounds};

/// Handle de uma tabela registrada. Consumido por `unregister_table`.
#[derive(Debug, PartialEq, Eq)]
pub struct CtlTableHeader {
    id: u64,
    procname: &'static str,
}

impl CtlTableHeader {
    pub fn procname(&self) -> &'static str {
        self.procname
    }
}

/// Nó resolvido, copiado para fora do lock
enum Resolved {
    Dir(FileMode, Vec<&'static str>),
    Entry(FileMode, Arc<dyn ProcHandler>),
}

/// Raiz de uma árvore de sysctl
pub struct SysctlRoot {
    tables: Mutex<BTreeMap<u64, CtlTable>>,
    next_id: AtomicU64,
}

/// Árvore global do kernel
pub static SYSCTL: SysctlRoot = SysctlRoot::new();

impl SysctlRoot {
    pub const fn new() -> Self {
        Self {
            tables: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registra uma tabela na raiz.
    ///
    /// `EINVAL` para nomes vazios, com `/`, `.`/`..` ou repetidos no mesmo
    /// diretório; `EEXIST` se outro registro já usa o nome de topo.
    pub fn register_table(&self, table: CtlTable) -> SysResult<CtlTableHeader> {
        validate(&table)?;

        let mut tables = self.tables.lock();
        if tables.values().any(|t| t.procname == table.procname) {
            crate::kwarn!("(Sysctl) '{}' já registrado", table.procname);
            return Err(Errno::EEXIST);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let procname = table.procname;
        tables.insert(id, table);

        crate::kdebug!("(Sysctl) Registrado '{}' (id={})", procname, id);
        Ok(CtlTableHeader { id, procname })
    }

    /// Remove a tabela registrada com `header`.
    pub fn unregister_table(&self, header: CtlTableHeader) {
        if self.tables.lock().remove(&header.id).is_none() {
            crate::kwarn!("(Sysctl) '{}' não estava registrado", header.procname);
            return;
        }
        crate::kdebug!("(Sysctl) Removido '{}'", header.procname);
    }

    /// Lê de uma entrada a partir de `pos`.
    pub fn read(&self, path: &str, buf: &mut [u8], pos: &mut u64) -> SysResult<usize> {
        match self.resolve(path)? {
            Resolved::Dir(..) => Err(Errno::EISDIR),
            Resolved::Entry(_, handler) => handler.handle(ProcOp::Read(buf), pos),
        }
    }

    /// Escreve em uma entrada a partir de `pos`.
    pub fn write(&self, path: &str, data: &[u8], pos: &mut u64) -> SysResult<usize> {
        match self.resolve(path)? {
            Resolved::Dir(..) => Err(Errno::EISDIR),
            Resolved::Entry(mode, _) if !mode.can_write() => Err(Errno::EACCES),
            Resolved::Entry(_, handler) => handler.handle(ProcOp::Write(data), pos),
        }
    }

    /// Nomes dentro de um diretório (`""` é a raiz).
    pub fn list(&self, path: &str) -> SysResult<Vec<&'static str>> {
        match self.resolve(path)? {
            Resolved::Dir(_, names) => Ok(names),
            Resolved::Entry(..) => Err(Errno::ENOTDIR),
        }
    }

    /// Modo de um caminho.
    pub fn mode(&self, path: &str) -> SysResult<FileMode> {
        match self.resolve(path)? {
            Resolved::Dir(mode, _) | Resolved::Entry(mode, _) => Ok(mode),
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    fn resolve(&self, path: &str) -> SysResult<Resolved> {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let tables = self.tables.lock();

        let Some(top) = parts.next() else {
            let names = tables.values().map(|t| t.procname).collect();
            return Ok(Resolved::Dir(FileMode::DIR, names));
        };

        let mut node = tables
            .values()
            .find(|t| t.procname == top)
            .ok_or(Errno::ENOENT)?;

        for part in parts {
            if !node.is_dir() {
                return Err(Errno::ENOTDIR);
            }
            node = node.child(part).ok_or(Errno::ENOENT)?;
        }

        Ok(match &node.kind {
            CtlKind::Dir(children) => {
                Resolved::Dir(node.mode, children.iter().map(|c| c.procname).collect())
            }
            CtlKind::Entry(handler) => Resolved::Entry(node.mode, handler.clone()),
        })
    }
}

impl Default for SysctlRoot {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(table: &CtlTable) -> SysResult<()> {
    let name = table.procname;
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        crate::kwarn!("(Sysctl) Nome inválido: '{}'", name);
        return Err(Errno::EINVAL);
    }

    if let CtlKind::Dir(children) = &table.kind {
        for (i, child) in children.iter().enumerate() {
            if children[..i].iter().any(|c| c.procname == child.procname) {
                crate::kwarn!("(Sysctl) '{}' repetido em '{}'", child.procname, name);
                return Err(Errno::EINVAL);
            }
            validate(child)?;
        }
    }
    Ok(())
}
