//! System clipboard delivery.
//!
//! On Linux an X11/Wayland selection only lives as long as the process that
//! owns it. `copyall` hands the text to a detached copy of itself (the
//! *holder*), which takes the selection, reports `ready`, and keeps serving
//! it until another client takes ownership. Success is only reported once
//! the holder has confirmed.

use anyhow::{Context, Result};

use crate::sink::Sink;

/// Set in the environment of the holder process.
pub const HOLDER_ENV: &str = "COPYALL_CLIPBOARD_HOLDER";

#[cfg(target_os = "linux")]
const READY: &str = "ready";

#[derive(Debug, Default)]
pub struct ClipboardSink;

impl Sink for ClipboardSink {
    fn name(&self) -> &str {
        "clipboard"
    }

    #[cfg(target_os = "linux")]
    fn write_text(&mut self, text: &str) -> Result<()> {
        use std::os::unix::process::CommandExt;
        use std::process::{Command, Stdio};

        let exe = std::env::current_exe().context("locating the copyall executable")?;
        let child = Command::new(exe)
            .env(HOLDER_ENV, "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            // Own process group: Ctrl-C in the terminal must not drop the selection.
            .process_group(0)
            .spawn()
            .context("starting clipboard holder")?;
        hand_off(child, text)
    }

    #[cfg(not(target_os = "linux"))]
    fn write_text(&mut self, text: &str) -> Result<()> {
        // macOS and Windows keep clipboard contents after the writer exits.
        let mut clipboard = arboard::Clipboard::new().context("opening system clipboard")?;
        clipboard
            .set_text(text)
            .context("writing to system clipboard")
    }
}

/// Send `text` to a holder and wait until it reports owning the selection.
#[cfg(target_os = "linux")]
pub fn hand_off(mut child: std::process::Child, text: &str) -> Result<()> {
    use std::io::{BufRead, BufReader, Write};

    let mut stdin = child.stdin.take().context("clipboard holder has no stdin")?;
    stdin
        .write_all(text.as_bytes())
        .context("sending text to clipboard holder")?;
    drop(stdin);

    let stdout = child.stdout.take().context("clipboard holder has no stdout")?;
    let mut line = String::new();
    BufReader::new(stdout)
        .read_line(&mut line)
        .context("waiting for clipboard holder")?;
    if line.trim_end() == READY {
        tracing::debug!(pid = child.id(), "clipboard holder owns the selection");
        return Ok(());
    }

    let status = child.wait().context("waiting for clipboard holder")?;
    anyhow::bail!("clipboard holder exited before taking the selection ({status})")
}

/// Holder entry point: read the text from stdin and serve it.
#[cfg(target_os = "linux")]
pub fn hold_from_stdin() -> Result<()> {
    use arboard::SetExtLinux;
    use std::io::{Read, Write};

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading clipboard text")?;

    let mut clipboard = arboard::Clipboard::new().context("opening system clipboard")?;
    clipboard
        .set_text(text.as_str())
        .context("writing to system clipboard")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{READY}").context("signalling readiness")?;
    stdout.flush().context("signalling readiness")?;
    drop(stdout);

    // Blocks until another client takes ownership of the selection.
    clipboard
        .set()
        .wait()
        .text(text)
        .context("holding clipboard selection")
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    fn holder(script: &str) -> std::process::Child {
        Command::new("sh")
            .args(["-c", script])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap()
    }

    #[test]
    fn hand_off_delivers_text_and_waits_for_ready() {
        let dir = tempfile::tempdir().unwrap();
        let received = dir.path().join("received.txt");
        let script = format!("cat > '{}'; echo ready", received.display());

        hand_off(holder(&script), "\n\n\n\n\nfile: /p/a.txt\n\nA\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(&received).unwrap(),
            "\n\n\n\n\nfile: /p/a.txt\n\nA\n"
        );
    }

    #[test]
    fn holder_that_dies_is_a_failure() {
        let err = hand_off(holder("cat > /dev/null; exit 3"), "text").unwrap_err();
        assert!(err.to_string().contains("exited before taking the selection"), "{err:#}");
    }

    #[test]
    fn holder_that_answers_garbage_is_a_failure() {
        let err = hand_off(holder("cat > /dev/null; echo nope"), "text").unwrap_err();
        assert!(err.to_string().contains("exited before taking the selection"), "{err:#}");
    }
}
