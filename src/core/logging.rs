// =============================================================================
// KERNEL LOGGING - CUSTOM RECLAIM
// =============================================================================
//
// Macros de log do módulo, no mesmo formato do resto do kernel:
//
//   kinfo!("(Reclaim) Carregando módulo...");
//   kwarn!("(Reclaim) node_idx={} >= nr_online_nodes={}", node, nr);
//
// ARQUITETURA:
// - As macros encaminham para a fachada `log` com target fixo (LOG_TARGET).
//   O backend (serial, ring buffer, dmesg) é instalado pelo kernel hospedeiro.
// - O nível ativo é escolhido em compile-time pelas features do Cargo.
//   Com "no_logs" TODAS as macros viram expressões vazias.
//
// NÍVEIS ATIVOS POR FEATURE:
//
//   feature     | ERROR | WARN | INFO | DEBUG | TRACE
//   ------------+-------+------+------+-------+------
//   no_logs     |       |      |      |       |
//   log_error   |   x   |  x   |      |       |
//   log_info    |   x   |  x   |  x   |       |
//   log_debug   |   x   |  x   |  x   |   x   |
//   log_trace   |   x   |  x   |  x   |   x   |  x
//
// =============================================================================

/// Target usado em todas as linhas de log do módulo.
pub const LOG_TARGET: &str = "custom_reclaim";

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)+) => {{
        $crate::__log::error!(target: $crate::core::logging::LOG_TARGET, $($arg)+);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)+) => {{
        $crate::__log::warn!(target: $crate::core::logging::LOG_TARGET, $($arg)+);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================

#[cfg(any(feature = "log_info", feature = "log_debug", feature = "log_trace"))]
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)+) => {{
        $crate::__log::info!(target: $crate::core::logging::LOG_TARGET, $($arg)+);
    }};
}

#[cfg(not(any(feature = "log_info", feature = "log_debug", feature = "log_trace")))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================

#[cfg(any(feature = "log_debug", feature = "log_trace"))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)+) => {{
        $crate::__log::debug!(target: $crate::core::logging::LOG_TARGET, $($arg)+);
    }};
}

#[cfg(not(any(feature = "log_debug", feature = "log_trace")))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================

#[cfg(feature = "log_trace")]
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)+) => {{
        $crate::__log::trace!(target: $crate::core::logging::LOG_TARGET, $($arg)+);
    }};
}

#[cfg(not(feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Etapa concluída com sucesso (nível INFO).
#[macro_export]
macro_rules! kok {
    ($($arg:tt)+) => {{
        $crate::kinfo!("[OK] {}", format_args!($($arg)+));
    }};
}

/// kfail! - Etapa que abortou uma operação (nível ERROR).
#[macro_export]
macro_rules! kfail {
    ($($arg:tt)+) => {{
        $crate::kerror!("[FAIL] {}", format_args!($($arg)+));
    }};
}
