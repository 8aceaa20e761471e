#![forbid(unsafe_code)]

use de_sync::{Acknowledgement, ClipboardPort, Notice, NotificationPort};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};

/// Prints notices to stderr. With `confirm` set, each notice blocks until the
/// operator presses Enter on the terminal. Stdin is left alone when a terminal
/// is available, since `paste` consumes it for rows.
#[derive(Debug)]
pub struct TerminalNotifier {
    confirm: bool,
}

impl TerminalNotifier {
    pub fn new(confirm: bool) -> Self {
        Self { confirm }
    }
}

impl NotificationPort for TerminalNotifier {
    fn notify(&self, notice: &Notice) -> Acknowledgement {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}: {}", notice.title, notice.message);
        if !self.confirm {
            return Acknowledgement::Acknowledged;
        }

        let _ = write!(stderr, "[{}] ", notice.button);
        let _ = stderr.flush();
        drop(stderr);
        match File::open(TERMINAL) {
            Ok(tty) => await_enter(BufReader::new(tty)),
            Err(err) => {
                tracing::debug!(error = %err, "no terminal, confirming on stdin");
                await_enter(io::stdin().lock())
            }
        }
    }
}

#[cfg(not(windows))]
const TERMINAL: &str = "/dev/tty";
#[cfg(windows)]
const TERMINAL: &str = "CONIN$";

fn await_enter(mut input: impl BufRead) -> Acknowledgement {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => Acknowledgement::Dismissed,
        Ok(_) => Acknowledgement::Acknowledged,
    }
}

/// Clipboard backed by the process streams: reads come from stdin, writes go
/// to stdout.
#[derive(Debug, Default)]
pub struct StdioClipboard;

impl ClipboardPort for StdioClipboard {
    fn get_text(&self) -> Option<String> {
        let mut text = String::new();
        match io::stdin().lock().read_to_string(&mut text) {
            Ok(_) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "clipboard read failed");
                None
            }
        }
    }

    fn set_text(&self, text: String) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
            tracing::warn!(error = %err, "clipboard write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn enter_acknowledges_and_closed_input_dismisses() {
        assert_eq!(await_enter(Cursor::new("\n")), Acknowledgement::Acknowledged);
        assert_eq!(await_enter(Cursor::new("")), Acknowledgement::Dismissed);
    }

    #[test]
    fn unconfirmed_notices_never_wait() {
        let notice = Notice::warning("row repaired");
        assert_eq!(
            TerminalNotifier::new(false).notify(&notice),
            Acknowledgement::Acknowledged
        );
    }
}
