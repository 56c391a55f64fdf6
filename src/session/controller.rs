use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use crate::joints::JointId;
use crate::landmarks::LandmarkFrame;
use crate::report::AssessmentReport;
use crate::settings::AssessmentSettings;

use super::{
    error::SessionError,
    state::{SamplingSession, SessionSnapshot, SessionStatus, TickOutcome},
};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

/// Drives a `SamplingSession` from concurrent frame and timer callers.
///
/// All mutation goes through one async mutex, so frames, countdown ticks and
/// control calls are serialized. The countdown runs on its own tokio task and
/// is cancelled while the session lock is held, so a stale ticker can never
/// touch a later session.
#[derive(Clone)]
pub struct SessionController {
    session: Arc<Mutex<SamplingSession>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
    heartbeat_every_ticks: u32,
    snapshot_tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionController {
    pub fn new(settings: &AssessmentSettings) -> Result<Self> {
        if settings.duration_secs == 0 {
            bail!("durationSecs must be greater than zero");
        }

        let debug_mode = std::env::var("ROMSCAN_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let session = SamplingSession::new(settings.default_joint, settings.duration_secs)
            .with_min_visibility(settings.min_visibility);
        let (snapshot_tx, _) = watch::channel(session.snapshot());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
            heartbeat_every_ticks: if debug_mode {
                1
            } else {
                settings.heartbeat_every_ticks.max(1)
            },
            snapshot_tx: Arc::new(snapshot_tx),
        })
    }

    /// Receiver that sees a fresh snapshot on every state change and
    /// heartbeat.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn latest_report(&self) -> Option<AssessmentReport> {
        self.session.lock().await.report().cloned()
    }

    /// Configure joint and patient, then start recording.
    pub async fn start_assessment(
        &self,
        joint: JointId,
        patient_id: &str,
    ) -> Result<SessionSnapshot> {
        let mut session = self.session.lock().await;
        if session.status() == SessionStatus::Recording {
            return Err(SessionError::AlreadyRecording.into());
        }
        session.configure(joint, patient_id)?;
        self.begin(&mut session).await
    }

    /// Start recording with the current joint and patient.
    pub async fn start(&self) -> Result<SessionSnapshot> {
        let mut session = self.session.lock().await;
        self.begin(&mut session).await
    }

    /// Cancel the running window. Once this returns no further samples are
    /// recorded and no report is produced for the window.
    pub async fn stop(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.stop()?;
        self.cancel_ticker().await;
        self.publish(&session);
        Ok(())
    }

    pub async fn reset(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.reset()?;
        self.publish(&session);
        Ok(())
    }

    /// Push one landmark frame. Returns the number of samples recorded.
    /// Every frame seen while recording publishes a snapshot, including
    /// frames that only bump `dropped_frames`.
    pub async fn feed_frame(&self, frame: &LandmarkFrame) -> usize {
        let mut session = self.session.lock().await;
        if session.status() != SessionStatus::Recording {
            return 0;
        }
        let appended = session.feed_frame(frame);
        self.publish(&session);
        appended
    }

    /// Stop the countdown task without touching session state.
    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
    }

    async fn begin(&self, session: &mut SamplingSession) -> Result<SessionSnapshot> {
        session.start()?;
        self.spawn_ticker().await;
        self.publish(session);
        Ok(session.snapshot())
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel_token.cancel();
            previous.handle.abort();
        }

        let session = self.session.clone();
        let snapshot_tx = self.snapshot_tx.clone();
        let tick_interval = self.tick_interval;
        let heartbeat_every = self.heartbeat_every_ticks;
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let first_tick = time::Instant::now() + tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(first_tick, tick_interval);
            let mut ticks: u32 = 0;
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = token.cancelled() => break,
                }

                let mut guard = session.lock().await;
                if token.is_cancelled() {
                    break;
                }

                match guard.advance_one_second() {
                    TickOutcome::Ignored => break,
                    TickOutcome::Counting { remaining_secs } => {
                        ticks = ticks.wrapping_add(1);
                        if ticks % heartbeat_every == 0 {
                            log_debug!("{}s remaining", remaining_secs);
                            snapshot_tx.send_replace(guard.snapshot());
                        }
                    }
                    TickOutcome::Completed => {
                        if let Some(report) = guard.report() {
                            log_info!(
                                "Countdown finished for {} ({})",
                                report.joint,
                                report.assessment_id
                            );
                        }
                        snapshot_tx.send_replace(guard.snapshot());
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some(Ticker {
            handle,
            cancel_token,
        });
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel_token.cancel();
            ticker.handle.abort();
        }
    }

    fn publish(&self, session: &SamplingSession) {
        self.snapshot_tx.send_replace(session.snapshot());
    }
}
