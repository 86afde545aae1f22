// src/exec/readiness.rs

use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time;
use tracing::debug;

use crate::errors::{Result, TestbenchError};
use crate::plan::Role;

/// What counts as the ready line.
#[derive(Debug, Clone)]
pub enum ReadyMatcher {
    /// Substring match against each line.
    Literal(String),
    Pattern(Regex),
}

impl ReadyMatcher {
    pub fn literal(s: impl Into<String>) -> Self {
        ReadyMatcher::Literal(s.into())
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(ReadyMatcher::Pattern)
            .map_err(|e| TestbenchError::ConfigError(format!("invalid ready_line regex: {e}")))
    }

    pub fn from_config(line: &str, is_regex: bool) -> Result<Self> {
        if is_regex {
            Self::regex(line)
        } else {
            Ok(Self::literal(line))
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            ReadyMatcher::Literal(s) => line.contains(s.as_str()),
            ReadyMatcher::Pattern(re) => re.is_match(line),
        }
    }
}

/// How a readiness wait ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyOutcome {
    Ready { line: String, lines_seen: usize },
    StreamClosed { lines_seen: usize },
    TimedOut { lines_seen: usize },
}

/// Read lines from `reader` until one matches, the stream ends, or `timeout`
/// elapses.
///
/// The timeout bounds the whole wait, not each line. Lines are decoded
/// lossily; a trailing `\r\n` or `\n` is stripped before matching.
pub async fn wait_for_ready<R>(
    reader: &mut R,
    matcher: &ReadyMatcher,
    timeout: Duration,
) -> Result<ReadyOutcome>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines_seen = 0usize;

    let scan = async {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                return Ok::<_, std::io::Error>(None);
            }
            lines_seen += 1;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            debug!(role = %Role::DebugBridge, "stdout: {}", line);

            if matcher.is_match(line) {
                return Ok(Some(line.to_string()));
            }
        }
    };

    let outcome = time::timeout(timeout, scan).await;
    match outcome {
        Ok(Ok(Some(line))) => Ok(ReadyOutcome::Ready { line, lines_seen }),
        Ok(Ok(None)) => Ok(ReadyOutcome::StreamClosed { lines_seen }),
        Ok(Err(e)) => Err(e.into()),
        Err(_elapsed) => Ok(ReadyOutcome::TimedOut { lines_seen }),
    }
}

/// Keep consuming `reader` in the background so the child never blocks on a
/// full pipe; lines are logged at debug, tagged with `stream`.
pub fn drain_in_background<R>(mut reader: R, role: Role, stream: &'static str)
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    debug!(%role, stream, "{}", line.trim_end_matches(['\n', '\r']));
                }
            }
        }
        debug!(%role, stream, "drain ended");
    });
}
