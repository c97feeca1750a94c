use std::io::{BufRead, Write};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::core::models::KeyIdentifier;
use crate::global_constants::{
    KEY_HELPER_ARGUMENT, KEY_HELPER_DONE, KEY_HELPER_ERROR_PREFIX, KEY_HELPER_READY,
    KEY_HELPER_STARTUP_TIMEOUT, LOG_TAG_KEY_HELPER,
};

/// Long-lived child process that presses keys on request, one line per key.
///
/// The child is killed when the handle is dropped; `shutdown` does the same
/// explicitly and waits for the acknowledgment reader to stop. Once the
/// helper reports an error, exits, or stops accepting input it is marked
/// failed and callers should press keys another way.
pub struct KeyHelperProcess {
    child: Child,
    stdin: Mutex<ChildStdin>,
    failed: Arc<AtomicBool>,
    acknowledgements: JoinHandle<()>,
}

impl KeyHelperProcess {
    /// Starts this executable in key helper mode.
    pub async fn spawn_current_executable() -> Result<Self> {
        let executable =
            std::env::current_exe().context("failed to resolve current executable")?;
        let mut command = Command::new(executable);
        command.arg(KEY_HELPER_ARGUMENT);
        Self::spawn(command).await
    }

    pub async fn spawn(mut command: Command) -> Result<Self> {
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = command.spawn().context("failed to start key helper")?;
        let stdin = child.stdin.take().context("key helper stdin unavailable")?;
        let stdout = child.stdout.take().context("key helper stdout unavailable")?;

        let mut lines = BufReader::new(stdout).lines();
        let handshake = tokio::time::timeout(KEY_HELPER_STARTUP_TIMEOUT, lines.next_line())
            .await
            .context("key helper did not report ready in time")?
            .context("failed to read key helper handshake")?;

        match handshake.as_deref().map(str::trim) {
            Some(KEY_HELPER_READY) => {}
            Some(other) => bail!("unexpected key helper handshake: {:?}", other),
            None => bail!("key helper exited before reporting ready"),
        }

        log::info!(
            "{} Key helper ready (pid {:?})",
            LOG_TAG_KEY_HELPER,
            child.id()
        );

        let failed = Arc::new(AtomicBool::new(false));
        Ok(Self {
            child,
            stdin: Mutex::new(stdin),
            failed: Arc::clone(&failed),
            acknowledgements: tokio::spawn(drain_acknowledgements(lines, failed)),
        })
    }

    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    /// Queues a key press. Does not wait for the helper's acknowledgment.
    pub async fn send(&self, key: &KeyIdentifier) -> Result<()> {
        let result = self.write_request(key).await;
        if result.is_err() {
            self.failed.store(true, Ordering::SeqCst);
        }
        result
    }

    async fn write_request(&self, key: &KeyIdentifier) -> Result<()> {
        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(format!("{}\n", key.name()).as_bytes())
            .await
            .context("failed to write to key helper")?;
        stdin.flush().await.context("failed to flush key helper")?;
        Ok(())
    }

    pub async fn shutdown(mut self) {
        match self.child.kill().await {
            Ok(()) => log::info!("{} Key helper stopped", LOG_TAG_KEY_HELPER),
            Err(error) => log::warn!(
                "{} Failed to stop key helper: {}",
                LOG_TAG_KEY_HELPER,
                error
            ),
        }
        if let Err(error) = self.acknowledgements.await {
            log::debug!(
                "{} Acknowledgment reader ended abnormally: {}",
                LOG_TAG_KEY_HELPER,
                error
            );
        }
    }
}

async fn drain_acknowledgements(
    mut lines: Lines<BufReader<ChildStdout>>,
    failed: Arc<AtomicBool>,
) {
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim() == KEY_HELPER_DONE => {
                log::debug!("{} Key press acknowledged", LOG_TAG_KEY_HELPER);
            }
            Ok(Some(line)) => {
                log::warn!("{} Key helper reported: {}", LOG_TAG_KEY_HELPER, line.trim());
                if line.trim_start().starts_with(KEY_HELPER_ERROR_PREFIX) {
                    failed.store(true, Ordering::SeqCst);
                }
            }
            Ok(None) => {
                log::debug!("{} Key helper output closed", LOG_TAG_KEY_HELPER);
                break;
            }
            Err(error) => {
                log::warn!(
                    "{} Failed to read key helper output: {}",
                    LOG_TAG_KEY_HELPER,
                    error
                );
                break;
            }
        }
    }
    failed.store(true, Ordering::SeqCst);
}

/// Presses with `primary`, then `secondary`. Fails only when both do.
pub fn press_with_fallback<P, S>(key: &KeyIdentifier, primary: P, secondary: S) -> Result<()>
where
    P: FnOnce(&KeyIdentifier) -> Result<()>,
    S: FnOnce(&KeyIdentifier) -> Result<()>,
{
    let primary_error = match primary(key) {
        Ok(()) => return Ok(()),
        Err(error) => error,
    };

    secondary(key).map_err(|secondary_error| {
        anyhow!(
            "primary: {:#}; secondary: {:#}",
            primary_error,
            secondary_error
        )
    })
}

/// Helper side of the protocol: announce readiness, then answer every key
/// line with `DONE` or `ERROR <message>` until input closes.
pub fn serve_key_helper<R, W, F>(input: R, mut output: W, mut press: F) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&KeyIdentifier) -> Result<()>,
{
    writeln!(output, "{}", KEY_HELPER_READY)?;
    output.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read key request")?;
        if line.is_empty() {
            continue;
        }

        let reply = match line.parse::<KeyIdentifier>() {
            Ok(key) => match press(&key) {
                Ok(()) => KEY_HELPER_DONE.to_string(),
                Err(error) => format!("{} {:#}", KEY_HELPER_ERROR_PREFIX, error),
            },
            Err(error) => format!("{} {}", KEY_HELPER_ERROR_PREFIX, error),
        };

        writeln!(output, "{}", reply)?;
        output.flush()?;
    }

    Ok(())
}
