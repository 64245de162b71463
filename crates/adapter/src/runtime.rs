//! Session runtime integration.
//!
//! Bridges the sync game loop with the async turn driver.

use std::time::Duration;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::core::GameState;
use crate::driver::run_driver;
use crate::events::{JournalRecord, PresentationEvent, SessionCommand};
use crate::journal::run_journal;

/// Upper bound on waiting for the driver and the journal to drain at shutdown.
const SHUTDOWN_DRAIN: Duration = Duration::from_secs(2);

/// Running session instance.
pub struct Session {
    rt: Runtime,
    cmd_tx: mpsc::Sender<SessionCommand>,
    event_rx: mpsc::UnboundedReceiver<PresentationEvent>,
    driver: JoinHandle<()>,
    journal: Option<JoinHandle<()>>,
    config: SessionConfig,
}

impl Session {
    /// Start a session: build the game, spawn the driver and the journal.
    pub fn start(config: SessionConfig) -> anyhow::Result<Self> {
        let game = GameState::with_config(config.game, config.seed)
            .context("invalid game configuration")?;

        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("[Session] failed to create tokio runtime: {e}");
                return Err(e).context("failed to create tokio runtime");
            }
        };

        let (cmd_tx, cmd_rx) = mpsc::channel::<SessionCommand>(config.max_pending.max(1));
        let (event_tx, event_rx) = mpsc::unbounded_channel::<PresentationEvent>();

        let (journal_tx, journal) = match config.journal_path.clone() {
            Some(path) => {
                let (tx, rx) = mpsc::unbounded_channel::<JournalRecord>();
                let handle = rt.spawn(async move {
                    if let Err(e) = run_journal(path, rx).await {
                        log::error!("journal stopped: {e:#}");
                    }
                });
                (Some(tx), Some(handle))
            }
            None => (None, None),
        };

        let driver = rt.spawn(async move {
            run_driver(game, cmd_rx, event_tx, journal_tx).await;
        });
        log::info!("session started with seed {}", config.seed);

        Ok(Self {
            rt,
            cmd_tx,
            event_rx,
            driver,
            journal,
            config,
        })
    }

    /// Start a session from environment variables.
    pub fn start_from_env() -> anyhow::Result<Self> {
        Self::start(SessionConfig::from_env())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Queue a command; returns false if the queue is full or closed.
    pub fn submit(&self, cmd: SessionCommand) -> bool {
        match self.cmd_tx.try_send(cmd) {
            Ok(()) => true,
            Err(TrySendError::Full(cmd)) => {
                log::debug!("command queue full, dropping {cmd:?}");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    pub fn try_recv(&mut self) -> Option<PresentationEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block until the next event or until `timeout` passes.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<PresentationEvent> {
        let event_rx = &mut self.event_rx;
        self.rt
            .block_on(async { tokio::time::timeout(timeout, event_rx.recv()).await })
            .ok()
            .flatten()
    }

    /// Stop the driver, let the journal write every committed turn, then stop
    /// the runtime.
    ///
    /// Closing the command channel ends the driver; the driver owns the
    /// journal sender, so the journal ends once it has drained.
    pub fn shutdown(self) {
        let Self {
            rt,
            cmd_tx,
            event_rx,
            driver,
            journal,
            ..
        } = self;
        drop(cmd_tx);
        // Pending `Animate` events go with the receiver; their dropped `done`
        // handles release a driver still waiting on an animation.
        drop(event_rx);

        let drained = rt.block_on(async {
            tokio::time::timeout(SHUTDOWN_DRAIN, async {
                if let Err(e) = driver.await {
                    log::error!("turn driver failed: {e}");
                }
                if let Some(journal) = journal {
                    if let Err(e) = journal.await {
                        log::error!("journal task failed: {e}");
                    }
                }
            })
            .await
        });
        if drained.is_err() {
            log::warn!("session did not drain within {SHUTDOWN_DRAIN:?}");
        }
        rt.shutdown_timeout(Duration::from_millis(200));
    }
}
