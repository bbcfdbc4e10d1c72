//! # Ad slot controller.
//!
//! [`AdSlotController`] bridges the event-driven SDK to callers that want a
//! "request a reward, await an outcome" contract. All state transitions
//! happen on one event loop; callers talk to it through a cloneable
//! [`AdSlotHandle`].
//!
//! ## Control flow
//! ```text
//! request_load ──► Command::Load ──┐
//! request_show ──► Command::Show ──┼──► select! loop ◄── SdkEvent stream
//! reset        ──► Command::Reset ─┘         │              (via bridge)
//! timer tasks  ──► Command::Timeout ─────────┘
//!
//! loop owns:  AdSlot (status + handle)
//!             PendingSlot (the one outstanding show request)
//!             armed timeout (CancellationToken + cycle number)
//! ```
//!
//! ## Rules
//! - At most one show request is outstanding; a second fails fast with
//!   [`AdError::InFlight`] and does not disturb the first.
//! - Every terminal transition performs, in order: complete the pending
//!   request, cancel the armed timeout, release the slot, return to idle.
//!   Clearing the timeout before releasing prevents a stale timer from
//!   terminating the *next* attempt.
//! - Timers carry the cycle number they were armed for; a timeout command
//!   whose cycle no longer matches is ignored.
//! - Once the pending request is consumed, later signals for the same cycle
//!   (`Dismissed` after `Rewarded`, duplicate terminal events) are no-ops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, RwLock};
use tokio_util::sync::CancellationToken;

use crate::config::ControllerConfig;
use crate::error::AdError;
use crate::events::{self, AdSignal, Bus, Event, EventKind};
use crate::pending::{PendingRequest, PendingSlot, Responder, Stage};
use crate::rewards::{AdPurpose, RewardBackend, RewardOutcome, RewardResolver, ShowPayload};
use crate::sdk::{EventSink, LoadOptions, SdkEvent, SdkRef, ShowOptions};
use crate::slot::{AdSlot, SlotStatus};
use crate::subscribers::Subscribe;

/// Caller-facing commands processed by the event loop.
enum Command {
    Load {
        purpose: AdPurpose,
    },
    Show {
        purpose: AdPurpose,
        payload: ShowPayload,
        responder: Responder,
    },
    Reset {
        ack: oneshot::Sender<()>,
    },
    Timeout {
        cycle: u64,
        phase: TimeoutPhase,
    },
}

/// Which bound a timer task was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeoutPhase {
    Load,
    Show,
}

/// Mutable controller state. The event loop is the only writer; handles
/// take read locks for status queries.
struct ControllerState {
    slot: AdSlot,
    pending: PendingSlot,
    timer: Option<CancellationToken>,
    cycle: u64,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            slot: AdSlot::new(),
            pending: PendingSlot::new(),
            timer: None,
            cycle: 0,
        }
    }
}

/// Handle for driving the controller.
///
/// Cheap to clone; all methods go through the controller's command channel
/// and fail with [`AdError::Closed`] once the loop is gone.
#[derive(Clone)]
pub struct AdSlotHandle {
    cmd_tx: mpsc::Sender<Command>,
    state: Arc<RwLock<ControllerState>>,
}

impl AdSlotHandle {
    /// Current slot status.
    pub async fn status(&self) -> SlotStatus {
        self.state.read().await.slot.status()
    }

    /// Whether a show request is currently outstanding.
    pub async fn in_flight(&self) -> bool {
        self.state.read().await.pending.is_pending()
    }

    /// Asks the controller to pre-load an ad resource.
    ///
    /// No-op when a load is already in progress or a resource is already
    /// held. Load failures are reported through [`status`](Self::status) and
    /// the event bus, not through this call.
    pub async fn request_load(&self, purpose: AdPurpose) -> Result<(), AdError> {
        self.cmd_tx
            .send(Command::Load { purpose })
            .await
            .map_err(|_| AdError::Closed)
    }

    /// Shows a rewarded ad and awaits its outcome.
    ///
    /// If no resource is loaded, one load is triggered and awaited up to the
    /// configured bound. The returned future completes when the viewer earns
    /// the reward (resolved per `purpose`), dismisses the ad, a timeout
    /// fires, or the attempt fails.
    pub async fn request_show(
        &self,
        purpose: AdPurpose,
        payload: ShowPayload,
    ) -> Result<RewardOutcome, AdError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Show {
                purpose,
                payload,
                responder: tx,
            })
            .await
            .map_err(|_| AdError::Closed)?;
        rx.await.map_err(|_| AdError::Closed)?
    }

    /// Forces the slot back to idle.
    ///
    /// Any outstanding show request is rejected with [`AdError::Cancelled`],
    /// timers are cleared, and the resource handle is released. Safe to call
    /// at any time; calling it twice is equivalent to calling it once.
    pub async fn reset(&self) -> Result<(), AdError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Reset { ack: tx })
            .await
            .map_err(|_| AdError::Closed)?;
        rx.await.map_err(|_| AdError::Closed)
    }
}

/// The rewarded-ad lifecycle controller.
///
/// Owns the single ad slot, the pending-request registry, and the SDK event
/// stream. Create with [`new`](Self::new), start with [`run`](Self::run),
/// drive through [`handle`](Self::handle).
pub struct AdSlotController {
    cfg: ControllerConfig,
    sdk: SdkRef,
    resolver: RewardResolver,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,

    state: Arc<RwLock<ControllerState>>,

    cmd_tx: mpsc::Sender<Command>,
    cmd_rx: RwLock<Option<mpsc::Receiver<Command>>>,
    sdk_tx: mpsc::UnboundedSender<SdkEvent>,
    sdk_rx: RwLock<Option<mpsc::UnboundedReceiver<SdkEvent>>>,
}

impl AdSlotController {
    /// Creates a controller (must call [`run`](Self::run) to start).
    pub fn new(cfg: ControllerConfig, sdk: SdkRef, backend: Arc<dyn RewardBackend>) -> Arc<Self> {
        Self::with_subscribers(cfg, sdk, backend, Vec::new())
    }

    /// Creates a controller with event subscribers attached.
    pub fn with_subscribers(
        cfg: ControllerConfig,
        sdk: SdkRef,
        backend: Arc<dyn RewardBackend>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Arc<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel(cfg.queue_capacity_clamped());
        let (sdk_tx, sdk_rx) = mpsc::unbounded_channel();
        let bus = Bus::new(cfg.bus_capacity);

        Arc::new(Self {
            cfg,
            sdk,
            resolver: RewardResolver::new(backend),
            bus,
            subscribers,
            state: Arc::new(RwLock::new(ControllerState::new())),
            cmd_tx,
            cmd_rx: RwLock::new(Some(cmd_rx)),
            sdk_tx,
            sdk_rx: RwLock::new(Some(sdk_rx)),
        })
    }

    /// Returns a handle for driving the controller.
    pub fn handle(&self) -> AdSlotHandle {
        AdSlotHandle {
            cmd_tx: self.cmd_tx.clone(),
            state: Arc::clone(&self.state),
        }
    }

    /// Returns the event bus (subscribe for observability).
    pub fn bus(&self) -> Bus {
        self.bus.clone()
    }

    /// Starts the event loop (spawns in the background).
    ///
    /// Cancelling `token` tears the loop down: the slot is released and any
    /// in-flight request is rejected with [`AdError::Cancelled`].
    pub fn run(self: Arc<Self>, token: CancellationToken) {
        tokio::spawn(async move {
            if let Err(e) = self.run_inner(token).await {
                log::error!("ad slot controller stopped: {e:?}");
            }
        });
    }

    async fn run_inner(&self, token: CancellationToken) -> anyhow::Result<()> {
        let mut cmd_rx = self
            .cmd_rx
            .write()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("controller already running"))?;
        let mut sdk_rx = self
            .sdk_rx
            .write()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("controller already running"))?;

        self.subscriber_listener();

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    self.do_reset().await;
                    break;
                }
                Some(cmd) = cmd_rx.recv() => {
                    self.handle_command(cmd).await;
                }
                Some(event) = sdk_rx.recv() => {
                    if let Some(signal) = events::normalize(event) {
                        self.handle_signal(signal).await;
                    }
                }
            }
        }

        Ok(())
    }

    /// Subscribes to the bus and drives the attached subscribers.
    fn subscriber_listener(&self) {
        if self.subscribers.is_empty() {
            return;
        }
        let mut rx = self.bus.subscribe();
        let subs = self.subscribers.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        for sub in &subs {
                            sub.on_event(&ev).await;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        log::warn!("subscriber listener lagged, skipped {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    async fn handle_command(&self, cmd: Command) {
        match cmd {
            Command::Load { purpose } => self.on_request_load(purpose).await,
            Command::Show {
                purpose,
                payload,
                responder,
            } => self.on_request_show(purpose, payload, responder).await,
            Command::Reset { ack } => {
                self.publish(Event::now(EventKind::ResetRequested));
                self.do_reset().await;
                let _ = ack.send(());
            }
            Command::Timeout { cycle, phase } => self.on_timeout(cycle, phase).await,
        }
    }

    async fn handle_signal(&self, signal: AdSignal) {
        match signal {
            AdSignal::Loaded { handle } => self.on_loaded(handle).await,
            AdSignal::LoadFailed { reason } => self.on_load_failed(reason).await,
            AdSignal::RewardEarned => self.on_reward_earned().await,
            AdSignal::Dismissed => self.on_dismissed().await,
            AdSignal::ShowFailed { reason } => self.on_show_failed(reason).await,
        }
    }

    // === entry points ===

    async fn on_request_load(&self, purpose: AdPurpose) {
        if !self.sdk.is_supported() {
            let mut st = self.state.write().await;
            st.slot.fail(self.sdk.as_ref());
            drop(st);
            self.publish(
                Event::now(EventKind::LoadFailed)
                    .with_purpose(purpose)
                    .with_reason("rewarded ads unsupported"),
            );
            return;
        }

        let status = self.state.read().await.slot.status();
        if matches!(status, SlotStatus::Loading | SlotStatus::Loaded) {
            return;
        }
        self.start_load(purpose).await;
    }

    async fn on_request_show(&self, purpose: AdPurpose, payload: ShowPayload, responder: Responder) {
        if !self.sdk.is_supported() {
            let _ = responder.send(Err(AdError::SdkUnsupported));
            return;
        }

        let mut st = self.state.write().await;
        if st.pending.is_pending() {
            drop(st);
            let _ = responder.send(Err(AdError::InFlight));
            return;
        }

        let cycle = st.cycle;
        let status = st.slot.status();
        let stage = if status == SlotStatus::Loaded {
            Stage::Presenting
        } else {
            Stage::AwaitingLoad
        };
        if let Err(refused) = st
            .pending
            .register(PendingRequest::new(purpose, payload, stage, responder))
        {
            drop(st);
            refused.finish(Err(AdError::InFlight));
            return;
        }

        match status {
            SlotStatus::Loaded => {
                self.arm_timer(&mut st, TimeoutPhase::Show, self.cfg.show_bound());
                drop(st);
                self.publish(
                    Event::now(EventKind::ShowRequested)
                        .with_purpose(purpose)
                        .with_cycle(cycle),
                );
                self.do_present(purpose).await;
            }
            SlotStatus::Loading => {
                // ride the in-flight load
                self.arm_timer(&mut st, TimeoutPhase::Load, self.cfg.load_bound());
                drop(st);
                self.publish(
                    Event::now(EventKind::ShowRequested)
                        .with_purpose(purpose)
                        .with_cycle(cycle),
                );
            }
            SlotStatus::Unloaded | SlotStatus::Failed => {
                self.arm_timer(&mut st, TimeoutPhase::Load, self.cfg.load_bound());
                drop(st);
                self.publish(
                    Event::now(EventKind::ShowRequested)
                        .with_purpose(purpose)
                        .with_cycle(cycle),
                );
                self.start_load(purpose).await;
            }
        }
    }

    async fn do_reset(&self) {
        self.finish_cycle(AdError::Cancelled, None).await;
    }

    // === load flow ===

    async fn start_load(&self, purpose: AdPurpose) {
        {
            let mut st = self.state.write().await;
            st.slot.mark_loading(self.sdk.as_ref());
        }
        self.publish(Event::now(EventKind::LoadRequested).with_purpose(purpose));

        let options = LoadOptions {
            placement: Some(purpose.as_label().to_string()),
        };
        let sink = EventSink::new(self.sdk_tx.clone());
        if let Err(e) = self.sdk.load(&options, sink).await {
            self.on_load_failed(e.to_string()).await;
        }
    }

    async fn on_loaded(&self, handle: crate::sdk::AdHandle) {
        let mut st = self.state.write().await;
        if st.slot.status() == SlotStatus::Loaded {
            // duplicate ready: keep the resource we own, dispose the newcomer
            drop(st);
            log::warn!("duplicate ready event, disposing extra resource");
            self.sdk.release(handle);
            return;
        }

        st.slot.store(handle);
        let waiting = st.pending.stage() == Some(Stage::AwaitingLoad);
        let purpose = st.pending.purpose();
        if waiting {
            st.pending.set_stage(Stage::Presenting);
            self.arm_timer(&mut st, TimeoutPhase::Show, self.cfg.show_bound());
        }
        drop(st);

        self.publish(Event::now(EventKind::Loaded));
        if waiting {
            if let Some(purpose) = purpose {
                self.do_present(purpose).await;
            }
        }
    }

    async fn on_load_failed(&self, reason: String) {
        let mut st = self.state.write().await;
        if st.slot.status() != SlotStatus::Loading {
            drop(st);
            log::debug!("stale load-failed signal ignored: {reason}");
            return;
        }

        // the single triggered load cannot succeed anymore; a show request
        // waiting on it fails with it instead of idling out the bound
        let rejected = if st.pending.stage() == Some(Stage::AwaitingLoad) {
            if let Some(timer) = st.timer.take() {
                timer.cancel();
            }
            st.cycle = st.cycle.wrapping_add(1);
            st.pending.take()
        } else {
            None
        };
        st.slot.fail(self.sdk.as_ref());
        drop(st);

        self.publish(Event::now(EventKind::LoadFailed).with_reason(reason.clone()));
        if let Some(req) = rejected {
            req.finish(Err(AdError::LoadFailed { reason }));
        }
    }

    // === show flow ===

    async fn do_present(&self, purpose: AdPurpose) {
        let handle = self.state.read().await.slot.handle().cloned();
        let Some(handle) = handle else {
            log::debug!("present skipped: slot no longer holds a resource");
            return;
        };

        let options = ShowOptions {
            custom_data: Some(purpose.as_label().to_string()),
        };
        let sink = EventSink::new(self.sdk_tx.clone());
        match self.sdk.present(&handle, &options, sink).await {
            Ok(()) => {
                self.publish(Event::now(EventKind::Presented).with_purpose(purpose));
            }
            Err(e) => {
                let reason = e.to_string();
                self.finish_cycle(
                    AdError::ShowFailed {
                        reason: reason.clone(),
                    },
                    Some(Event::now(EventKind::ShowFailed).with_reason(reason)),
                )
                .await;
            }
        }
    }

    async fn on_reward_earned(&self) {
        let taken = {
            let mut st = self.state.write().await;
            if st.pending.stage() != Some(Stage::Presenting) {
                None
            } else {
                if let Some(timer) = st.timer.take() {
                    timer.cancel();
                }
                st.cycle = st.cycle.wrapping_add(1);
                st.pending.take()
            }
        };
        let Some(req) = taken else {
            log::debug!("reward signal with no pending request ignored");
            return;
        };

        let (purpose, payload, responder) = req.split();
        self.publish(Event::now(EventKind::RewardEarned).with_purpose(purpose));

        let outcome = self.resolver.resolve(purpose, payload).await;

        {
            let mut st = self.state.write().await;
            st.slot.release(self.sdk.as_ref());
        }

        let resolved = match &outcome {
            Ok(_) => Event::now(EventKind::RewardResolved).with_purpose(purpose),
            Err(e) => Event::now(EventKind::RewardResolved)
                .with_purpose(purpose)
                .with_reason(e.to_string()),
        };
        self.publish(resolved);
        self.publish(Event::now(EventKind::SlotReleased));

        let _ = responder.send(outcome);
    }

    async fn on_dismissed(&self) {
        if !self.state.read().await.pending.is_pending() {
            // reward already consumed the request, or no cycle is active
            log::debug!("dismiss signal outside an active cycle ignored");
            return;
        }
        self.finish_cycle(AdError::UserCancelled, Some(Event::now(EventKind::Dismissed)))
            .await;
    }

    async fn on_show_failed(&self, reason: String) {
        if !self.state.read().await.pending.is_pending() {
            log::debug!("stale show-failed signal ignored: {reason}");
            return;
        }
        self.finish_cycle(
            AdError::ShowFailed {
                reason: reason.clone(),
            },
            Some(Event::now(EventKind::ShowFailed).with_reason(reason)),
        )
        .await;
    }

    async fn on_timeout(&self, cycle: u64, phase: TimeoutPhase) {
        {
            let st = self.state.read().await;
            if st.cycle != cycle || !st.pending.is_pending() {
                return;
            }
        }
        let (error, bound, label) = match phase {
            TimeoutPhase::Load => (
                AdError::LoadTimeout {
                    timeout: self.cfg.load_timeout,
                },
                self.cfg.load_timeout,
                "load",
            ),
            TimeoutPhase::Show => (
                AdError::ShowTimeout {
                    timeout: self.cfg.show_timeout,
                },
                self.cfg.show_timeout,
                "show",
            ),
        };
        self.finish_cycle(
            error,
            Some(
                Event::now(EventKind::TimeoutHit)
                    .with_timeout(bound)
                    .with_reason(label)
                    .with_cycle(cycle),
            ),
        )
        .await;
    }

    // === terminal transition ===

    /// Ends the current cycle: completes the pending request (if any) with
    /// `error`, cancels the armed timeout, releases the slot, returns to
    /// idle. The timeout is cleared before release so a stale timer can
    /// never terminate a subsequent attempt.
    async fn finish_cycle(&self, error: AdError, event: Option<Event>) {
        let req = {
            let mut st = self.state.write().await;
            let req = st.pending.take();
            if let Some(timer) = st.timer.take() {
                timer.cancel();
            }
            st.slot.release(self.sdk.as_ref());
            st.cycle = st.cycle.wrapping_add(1);
            req
        };

        if let Some(event) = event {
            self.publish(event);
        }
        self.publish(Event::now(EventKind::SlotReleased));

        if let Some(req) = req {
            req.finish(Err(error));
        }
    }

    /// Arms a fresh timeout for the current cycle, replacing any previous
    /// one. `None` bound disables the timer.
    fn arm_timer(&self, st: &mut ControllerState, phase: TimeoutPhase, bound: Option<Duration>) {
        if let Some(previous) = st.timer.take() {
            previous.cancel();
        }
        let Some(duration) = bound else {
            return;
        };

        let token = CancellationToken::new();
        st.timer = Some(token.clone());
        let cycle = st.cycle;
        let tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    let _ = tx.send(Command::Timeout { cycle, phase }).await;
                }
            }
        });
    }

    fn publish(&self, event: Event) {
        self.bus.publish(event);
    }
}
