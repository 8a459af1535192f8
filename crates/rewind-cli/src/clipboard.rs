//! Clipboard via the OSC 52 terminal escape.
//!
//! Works over SSH and inside tmux (with `set-clipboard on`) since the
//! terminal emulator, not this process, owns the clipboard.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rewind_core::{Clipboard, ShareError};
use std::io::{self, IsTerminal, Write};

pub struct Osc52Clipboard;

impl Osc52Clipboard {
    fn sequence(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for Osc52Clipboard {
    fn copy(&self, text: &str) -> Result<(), ShareError> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(ShareError::Unavailable("stdout is not a terminal".to_string()));
        }
        stdout.write_all(Self::sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_encodes_payload() {
        assert_eq!(Osc52Clipboard::sequence("hi"), "\x1b]52;c;aGk=\x07");
    }
}
