//! Tabelas de sysctl: entradas, diretórios e o contrato dos handlers.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::sys::SysResult;

/// Permissões de uma entrada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(pub u32);

impl FileMode {
    pub const ANY_WRITE: u32 = 0o222;

    /// Diretório percorrível (0555)
    pub const DIR: FileMode = FileMode(0o555);
    /// Somente leitura (0444)
    pub const READ_ONLY: FileMode = FileMode(0o444);
    /// Somente escrita pelo dono (0200)
    pub const WRITE_ONLY: FileMode = FileMode(0o200);

    pub fn can_write(&self) -> bool {
        (self.0 & Self::ANY_WRITE) != 0
    }
}

/// Operação pedida a um handler
pub enum ProcOp<'a> {
    /// Preencher o buffer a partir da posição corrente
    Read(&'a mut [u8]),
    /// Consumir os bytes escritos
    Write(&'a [u8]),
}

/// Handler de uma entrada de sysctl.
///
/// Retorna quantos bytes foram produzidos (leitura) ou consumidos (escrita)
/// e avança `pos` de acordo.
pub trait ProcHandler: Send + Sync {
    fn handle(&self, op: ProcOp<'_>, pos: &mut u64) -> SysResult<usize>;
}

/// Conteúdo de um nó da tabela
pub enum CtlKind {
    Dir(Vec<CtlTable>),
    Entry(Arc<dyn ProcHandler>),
}

/// Nó da árvore de sysctl
pub struct CtlTable {
    pub procname: &'static str,
    pub mode: FileMode,
    pub kind: CtlKind,
}

impl CtlTable {
    pub fn dir(procname: &'static str, mode: FileMode, children: Vec<CtlTable>) -> Self {
        Self {
            procname,
            mode,
            kind: CtlKind::Dir(children),
        }
    }

    pub fn entry(procname: &'static str, mode: FileMode, handler: Arc<dyn ProcHandler>) -> Self {
        Self {
            procname,
            mode,
            kind: CtlKind::Entry(handler),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, CtlKind::Dir(_))
    }

    /// Filho direto com este nome
    pub fn child(&self, name: &str) -> Option<&CtlTable> {
        match &self.kind {
            CtlKind::Dir(children) => children.iter().find(|c| c.procname == name),
            CtlKind::Entry(_) => None,
        }
    }
}

impl fmt::Debug for CtlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("CtlTable");
        s.field("procname", &self.procname);
        s.field("mode", &format_args!("{:#o}", self.mode.0));
        match &self.kind {
            CtlKind::Dir(children) => s.field("children", children),
            CtlKind::Entry(_) => s.field("handler", &"<proc_handler>"),
        };
        s.finish()
    }
}
