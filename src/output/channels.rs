use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::output::buffer::SharedBuffer;
use crate::suite::error::KutError;

// ============================================================================
// LineLog: append-only, line-counting text writer
// ============================================================================

/// Line-oriented writer that counts every line it emits.
///
/// The first I/O error is latched: later writes are skipped and the error is
/// handed out once through [`LineLog::take_error`].
pub struct LineLog {
    out: Box<dyn Write>,
    lines: usize,
    error: Option<io::Error>,
}

impl LineLog {
    pub fn new(out: impl Write + 'static) -> Self {
        Self {
            out: Box::new(out),
            lines: 0,
            error: None,
        }
    }

    /// Create (truncating) a file-backed log.
    pub fn create(path: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{}", text) {
            Ok(()) => self.lines += text.matches('\n').count() + 1,
            Err(e) => self.error = Some(e),
        }
    }

    pub fn blank(&mut self) {
        self.line("");
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn flush(&mut self) {
        if self.error.is_none() {
            if let Err(e) = self.out.flush() {
                self.error = Some(e);
            }
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

// ============================================================================
// Channels: the three output streams of a suite run
// ============================================================================

/// Output streams shared by the runner and the unit test contexts it creates.
pub struct Channels {
    /// Exhaustive log file
    pub detail: LineLog,

    /// Diagnostic stream for live debugging
    pub diag: LineLog,

    /// At-a-glance console summary
    pub summary: LineLog,

    /// Whether per-assertion lines and loop summaries are written
    pub verbose: bool,
}

/// Readable handles on the buffers behind [`Channels::in_memory`].
#[derive(Debug, Clone)]
pub struct Captured {
    pub detail: SharedBuffer,
    pub diag: SharedBuffer,
    pub summary: SharedBuffer,
}

impl Channels {
    /// Open the detail log and diagnostic files (both truncated) and use stdout
    /// for the summary.
    pub fn open(detail_path: &str, diag_path: &str, verbose: bool) -> Result<Self, KutError> {
        let detail = LineLog::create(detail_path).map_err(|source| KutError::ChannelOpen {
            channel: "log file",
            path: detail_path.to_string(),
            source,
        })?;
        let diag = LineLog::create(diag_path).map_err(|source| KutError::ChannelOpen {
            channel: "diagnostic file",
            path: diag_path.to_string(),
            source,
        })?;

        Ok(Self {
            detail,
            diag,
            summary: LineLog::stdout(),
            verbose,
        })
    }

    /// Channels backed by memory buffers, returned alongside for inspection.
    pub fn in_memory(verbose: bool) -> (Self, Captured) {
        let captured = Captured {
            detail: SharedBuffer::new(),
            diag: SharedBuffer::new(),
            summary: SharedBuffer::new(),
        };
        let channels = Self {
            detail: LineLog::new(captured.detail.clone()),
            diag: LineLog::new(captured.diag.clone()),
            summary: LineLog::new(captured.summary.clone()),
            verbose,
        };
        (channels, captured)
    }

    pub fn flush(&mut self) {
        self.detail.flush();
        self.diag.flush();
        self.summary.flush();
    }

    /// First latched write error across all three streams.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.detail
            .take_error()
            .or_else(|| self.diag.take_error())
            .or_else(|| self.summary.take_error())
    }
}
