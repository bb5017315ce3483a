//! External move-search process.
//!
//! Invocation contract:
//!
//! ```text
//! <program> <engine-bits> <opponent-bits> <budget-ms>
//! ```
//!
//! Both bitsets are decimal `u64` values in the board's packed layout. The column is
//! read from the first non-empty line on stdout; a program that prints nothing
//! reports the column through its exit status instead.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::debug;
use tokio::process::Command;

use crate::core::{EngineFault, SearchRequest};
use crate::types::BOARD_WIDTH;

#[derive(Debug, Clone)]
pub struct ExternalEngine {
    program: PathBuf,
}

impl ExternalEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the program once. The child is killed if this future is dropped.
    pub async fn search(&self, request: SearchRequest) -> Result<u8, EngineFault> {
        debug!(
            "external: {} {} {} {}",
            self.program.display(),
            request.engine_bits(),
            request.opponent_bits(),
            request.budget_ms
        );
        let output = Command::new(&self.program)
            .arg(request.engine_bits().to_string())
            .arg(request.opponent_bits().to_string())
            .arg(request.budget_ms.to_string())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| EngineFault::Unavailable(format!("{}: {e}", self.program.display())))?;

        parse_reply(&output.stdout, output.status.code())
    }
}

/// Turn the program's output into a column.
pub fn parse_reply(stdout: &[u8], exit_code: Option<i32>) -> Result<u8, EngineFault> {
    let text = String::from_utf8_lossy(stdout);
    let raw = match text.lines().map(str::trim).find(|line| !line.is_empty()) {
        Some(line) => line
            .parse::<i64>()
            .map_err(|_| EngineFault::Unparseable(line.to_string()))?,
        None => match exit_code {
            Some(code) => i64::from(code),
            None => return Err(EngineFault::Unparseable("no output, no exit status".into())),
        },
    };
    to_column(raw)
}

fn to_column(raw: i64) -> Result<u8, EngineFault> {
    u8::try_from(raw)
        .ok()
        .filter(|&c| c < BOARD_WIDTH)
        .ok_or(EngineFault::OutOfRange(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BitBoard;
    use crate::types::Side;

    #[test]
    fn test_parse_stdout_line() {
        assert_eq!(parse_reply(b"4\n", Some(0)), Ok(4));
        assert_eq!(parse_reply(b"\n  2  \nignored\n", Some(0)), Ok(2));
    }

    #[test]
    fn test_parse_falls_back_to_exit_status() {
        assert_eq!(parse_reply(b"", Some(5)), Ok(5));
        assert_eq!(parse_reply(b"  \n", Some(0)), Ok(0));
        assert!(matches!(
            parse_reply(b"", None),
            Err(EngineFault::Unparseable(_))
        ));
    }

    #[test]
    fn test_parse_rejects_garbage_and_range() {
        assert_eq!(
            parse_reply(b"left\n", Some(0)),
            Err(EngineFault::Unparseable("left".into()))
        );
        assert_eq!(parse_reply(b"7\n", Some(0)), Err(EngineFault::OutOfRange(7)));
        assert_eq!(parse_reply(b"-1\n", Some(0)), Err(EngineFault::OutOfRange(-1)));
        assert_eq!(parse_reply(b"", Some(127)), Err(EngineFault::OutOfRange(127)));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let engine = ExternalEngine::new("/nonexistent/connect4-search");
        let request = SearchRequest::new(BitBoard::new(), Side::B, 10);
        assert!(matches!(
            engine.search(request).await,
            Err(EngineFault::Unavailable(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_programs() {
        let request = SearchRequest::new(BitBoard::new(), Side::B, 10);
        assert_eq!(ExternalEngine::new("true").search(request).await, Ok(0));
        assert_eq!(ExternalEngine::new("false").search(request).await, Ok(1));
    }
}
