//! Clipboard copy for converted links, plus the short-lived "copied" state
//! shown after a successful copy.

mod indicator;

use std::io::{self, Write};

use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use drivelink_core::{DriveLinkError, DriveLinkResult};
use tracing::debug;

pub use indicator::{COPIED_DURATION, CopyIndicator};

/// Copies `text` to the system clipboard through the terminal (OSC 52).
///
/// Returns `Ok(false)` without touching the terminal when `text` is empty.
pub fn copy_to_clipboard(text: &str) -> DriveLinkResult<bool> {
    copy_via(&mut io::stdout(), text)
}

pub fn copy_via<W: Write>(writer: &mut W, text: &str) -> DriveLinkResult<bool> {
    if text.is_empty() {
        return Ok(false);
    }
    execute!(writer, CopyToClipboard::to_clipboard_from(text))
        .map_err(|err| DriveLinkError::Clipboard(format!("failed to write clipboard: {err}")))?;
    debug!(len = text.len(), "copied to clipboard");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenTerminal;

    impl Write for BrokenTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn empty_text_is_not_copied() {
        let mut out = Vec::new();
        assert!(!copy_via(&mut out, "").unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn text_is_written_as_osc52_sequence() {
        let mut out = Vec::new();
        assert!(copy_via(&mut out, "hi").unwrap());
        let written = String::from_utf8(out).unwrap();
        assert!(written.starts_with("\x1b]52;"));
        assert!(written.contains("aGk="));
    }

    #[test]
    fn write_failure_is_reported() {
        let result = copy_via(&mut BrokenTerminal, "https://drive.google.com/uc");
        match result {
            Err(DriveLinkError::Clipboard(msg)) => assert!(msg.contains("failed to write clipboard")),
            other => panic!("Expected Clipboard error, got {other:?}"),
        }
    }
}
