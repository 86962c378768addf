//! # Standard Error Codes (Errno)
//!
//! Códigos de erro retornados pelos handlers de sysctl e pelo ciclo de vida
//! do módulo. Numeração POSIX/Linux, para que o valor negativo devolvido à
//! syscall `write(2)` seja o mesmo que o operador veria num kernel Linux.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Uniformidade:** Todo caminho de erro (parser, validação, registro) devolve `Errno`.
//! - **Conversion:** `as_isize` produz o retorno negativo da syscall.

use core::fmt;

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    ENOENT = 2,   // No such file or directory
    EACCES = 13,  // Permission denied
    EFAULT = 14,  // Bad address
    EEXIST = 17,  // File exists
    ENOTDIR = 20, // Not a directory
    EISDIR = 21,  // Is a directory
    EINVAL = 22,  // Invalid argument
}

impl Errno {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Valor de retorno de syscall (`-errno`).
    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }

    /// Descrição curta, no formato de `strerror`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ENOENT => "No such file or directory",
            Self::EACCES => "Permission denied",
            Self::EFAULT => "Bad address",
            Self::EEXIST => "File exists",
            Self::ENOTDIR => "Not a directory",
            Self::EISDIR => "Is a directory",
            Self::EINVAL => "Invalid argument",
        }
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (errno {})", self.as_str(), self.as_i32())
    }
}

/// Result usado por toda a interface de controle.
pub type SysResult<T> = Result<T, Errno>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syscall_return_is_negative_errno() {
        assert_eq!(Errno::EINVAL.as_isize(), -22);
        assert_eq!(Errno::EFAULT.as_isize(), -14);
    }

    #[test]
    fn test_display_carries_number() {
        let text = std::format!("{}", Errno::EACCES);
        assert_eq!(text, "Permission denied (errno 13)");
    }
}
