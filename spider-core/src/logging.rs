//! src/logging.rs
//! ============================================================================
//! # Logger: file-only tracing setup
//!
//! The terminal belongs to the UI, so events go to a daily rolling file and
//! never to stderr. The filter comes from `SPIDER_LOG` (default `info`).

use std::{
    fs,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use tracing::Metadata;
use tracing_appender::rolling::{RollingFileAppender, daily};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::error::{AppError, AppResult};

pub const LOG_ENV: &str = "SPIDER_LOG";
const LOG_FILE_PREFIX: &str = "spider";

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`.
    pub fn init_tracing(log_dir: &Path) -> AppResult<()> {
        fs::create_dir_all(log_dir)?;

        // daily rolling file appender → <log_dir>/spider.YYYY-MM-DD
        let file: RollingFileAppender = daily(log_dir, LOG_FILE_PREFIX);

        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

        let file_layer = fmt::layer()
            .event_format(SeqFileMod) // our compact formatter
            .with_writer(file)
            .with_ansi(false)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .map_err(|e| AppError::Other(format!("failed to install tracing subscriber: {e}")))
    }
}

static SEQ: AtomicUsize = AtomicUsize::new(1);

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically-increasing sequence number
        let seq: usize = SEQ.fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}
