//! A [`Browser`] for terminals: the system browser plus pasted redirect URLs.
//!
//! The desktop redirect (`oauth20_desktop.srf`) cannot be intercepted outside
//! an embedded web view, so the user finishes the flow in their own browser
//! and pastes the final address-bar URL back into the terminal. Each pasted
//! line counts as one completed navigation.

use async_trait::async_trait;
use msalive_types::{Browser, traits::Result};
use std::io::{BufRead, BufReader};
use tokio::sync::mpsc;

const NAVIGATION_BUFFER: usize = 8;

/// Opens provider pages in the system browser (or prints them).
#[derive(Debug, Default, Clone)]
pub struct TerminalBrowser {
    /// Print the URL only, without launching the system browser.
    pub print_only: bool,
}

#[async_trait]
impl Browser for TerminalBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        if self.print_only {
            eprintln!("Open this URL in a browser:");
            eprintln!("{url}");
        } else {
            open_browser(url);
        }
        eprintln!(
            "When the browser lands on a blank page, paste its full address here and press Enter."
        );
        Ok(())
    }
}

/// Forward each non-empty stdin line as a navigation event.
///
/// The channel closes at end of input.
#[must_use]
pub fn stdin_navigations() -> mpsc::Receiver<String> {
    line_navigations(BufReader::new(std::io::stdin()))
}

/// Forward each non-empty, trimmed line of `reader` as a navigation event.
///
/// Lines are read on a dedicated OS thread, not a runtime blocking task, so a
/// read that never returns does not hold the runtime open after the flow
/// ends. The thread exits at end of input, on a read error, or on the first
/// line after the receiver is dropped.
#[must_use]
pub fn line_navigations<R>(reader: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(NAVIGATION_BUFFER);
    let spawned = std::thread::Builder::new()
        .name("msalive-navigations".into())
        .spawn(move || forward_lines(reader, &tx));
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "failed to start navigation reader");
    }
    rx
}

fn forward_lines(reader: impl BufRead, tx: &mpsc::Sender<String>) {
    for line in reader.lines() {
        match line {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if tx.blocking_send(line.to_owned()).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read navigation input");
                break;
            }
        }
    }
}

fn open_browser(url: &str) {
    eprintln!("Opening browser: {url}");
    if let Err(e) = open::that(url) {
        eprintln!("Failed to open browser automatically: {e}");
        eprintln!("Please open the following URL manually:");
        eprintln!("{url}");
    }
}
