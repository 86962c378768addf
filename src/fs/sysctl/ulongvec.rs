//! # Vetores de `unsigned long`
//!
//! Parser e formatador no formato de `proc_doulongvec_minmax`:
//!
//! - escrita: inteiros sem sinal separados por espaço/tab/newline, em
//!   decimal, `0x` hexadecimal ou octal com `0` na frente;
//! - leitura: valores separados por `\t`, newline no final.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt::Write;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::sys::{Errno, SysResult};

use super::table::{ProcHandler, ProcOp};

/// Maior token aceito (20 dígitos decimais ou `0x` + 16 dígitos)
const MAX_TOKEN_LEN: usize = 21;

/// Limites opcionais de cada valor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ULongBounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl ULongBounds {
    pub const NONE: Self = Self { min: None, max: None };

    pub const fn new(min: u64, max: u64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn check(&self, val: u64) -> bool {
        self.min.map_or(true, |min| val >= min) && self.max.map_or(true, |max| val <= max)
    }
}

/// Resultado de um parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    /// Valores escritos em `out`
    pub count: usize,
    /// Bytes consumidos da entrada
    pub consumed: usize,
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn skip_spaces(data: &[u8], mut p: usize) -> usize {
    while p < data.len() && is_space(data[p]) {
        p += 1;
    }
    p
}

/// Converte um token, detectando a base como `kstrtoul(.., 0, ..)`.
fn parse_token(token: &[u8]) -> SysResult<u64> {
    let (digits, radix) = match token {
        [b'0', b'x' | b'X', rest @ ..] => (rest, 16),
        [b'0', rest @ ..] if !rest.is_empty() => (rest, 8),
        _ => (token, 10),
    };
    if digits.is_empty() {
        return Err(Errno::EINVAL);
    }

    let mut val: u64 = 0;
    for &b in digits {
        let digit = (b as char).to_digit(radix).ok_or(Errno::EINVAL)?;
        val = val
            .checked_mul(radix as u64)
            .and_then(|v| v.checked_add(digit as u64))
            .ok_or(Errno::EINVAL)?;
    }
    Ok(val)
}

/// Lê até `out.len()` valores de `data`.
///
/// Para quando o vetor enche; o que sobrar na entrada não é consumido.
/// Espaços depois do último valor lido são consumidos. Entrada sem nenhum
/// valor é `EINVAL`, assim como sinal, lixo após um número, overflow ou
/// valor fora de `bounds`.
pub fn parse_ulong_vec(data: &[u8], out: &mut [u64], bounds: ULongBounds) -> SysResult<Parsed> {
    // Escritas vindas de userspace podem trazer o NUL do final da string
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let data = &data[..end];

    let mut p = 0;
    let mut count = 0;

    while count < out.len() {
        p = skip_spaces(data, p);
        if p == data.len() {
            break;
        }

        let start = p;
        while p < data.len() && !is_space(data[p]) {
            p += 1;
        }
        let token = &data[start..p];

        if token.len() > MAX_TOKEN_LEN || token[0] == b'-' {
            return Err(Errno::EINVAL);
        }
        let val = parse_token(token)?;
        if !bounds.check(val) {
            return Err(Errno::EINVAL);
        }

        out[count] = val;
        count += 1;
    }

    if count == 0 {
        return Err(Errno::EINVAL);
    }

    Ok(Parsed {
        count,
        consumed: skip_spaces(data, p),
    })
}

/// Renderiza `values` (`\t` entre valores, `\n` no fim).
pub fn format_ulong_vec(values: &[u64]) -> String {
    let mut out = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push('\t');
        }
        let _ = write!(out, "{}", v);
    }
    if !values.is_empty() {
        out.push('\n');
    }
    out
}

/// Leitura de sysctl a partir de `pos`: só a primeira leitura produz dados.
pub fn read_ulong_vec(values: &[u64], buf: &mut [u8], pos: &mut u64) -> usize {
    if buf.is_empty() || *pos != 0 {
        return 0;
    }
    let text = format_ulong_vec(values);
    let n = text.len().min(buf.len());
    buf[..n].copy_from_slice(&text.as_bytes()[..n]);
    *pos = pos.saturating_add(n as u64);
    n
}

/// Entrada de sysctl com um único `unsigned long` atômico.
pub struct AtomicULongHandler {
    value: Arc<AtomicU64>,
}

impl AtomicULongHandler {
    pub fn new(value: Arc<AtomicU64>) -> Self {
        Self { value }
    }
}

impl ProcHandler for AtomicULongHandler {
    fn handle(&self, op: ProcOp<'_>, pos: &mut u64) -> SysResult<usize> {
        match op {
            ProcOp::Read(buf) => {
                let current = self.value.load(Ordering::Relaxed);
                Ok(read_ulong_vec(&[current], buf, pos))
            }
            ProcOp::Write(data) => {
                if data.is_empty() {
                    return Ok(0);
                }
                // Escrita fora do início do arquivo é ignorada
                if *pos != 0 {
                    *pos = pos.saturating_add(data.len() as u64);
                    return Ok(data.len());
                }
                let mut parsed = [0u64; 1];
                let result = parse_ulong_vec(data, &mut parsed, ULongBounds::NONE)?;
                self.value.store(parsed[0], Ordering::Relaxed);
                *pos = pos.saturating_add(result.consumed as u64);
                Ok(result.consumed)
            }
        }
    }
}
