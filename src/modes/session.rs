//! The game loop that ties engine, renderer and device together.
//!
//! A [`GameSession`] exclusively owns its [`GameEngine`]. Everything else
//! talks to it through a [`SessionHandle`]: directions go in over a channel
//! and are applied right before the next tick, and immutable [`Snapshot`]s
//! come out after every rendered frame.

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time,
};
use tracing::{debug, error, info, warn};

use crate::device::{DisplayDevice, DisplayStreamer};
use crate::game::{Direction, GameConfig, GameEngine, GameState};
use crate::metrics::SessionStats;
use crate::render::{FrameRenderer, PixelBuffer};

/// What observers see after each frame
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The frame that was (or is being) sent to the device
    pub frame: PixelBuffer,
    /// Copy of the game state the frame was rendered from
    pub state: GameState,
    pub stats: SessionStats,
}

impl Snapshot {
    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_over
    }
}

/// Input and output side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    input: mpsc::UnboundedSender<Direction>,
    snapshots: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    /// Queue a direction change. Returns false once the session is gone.
    pub fn steer(&self, direction: Direction) -> bool {
        self.input.send(direction).is_ok()
    }

    /// The most recent snapshot
    pub fn latest(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait for the next snapshot. Returns false once the session is gone.
    pub async fn changed(&mut self) -> bool {
        self.snapshots.changed().await.is_ok()
    }
}

/// An endless sequence of rounds: play until the snake dies, show the
/// score, start over.
pub struct GameSession<D> {
    engine: GameEngine,
    renderer: FrameRenderer,
    streamer: DisplayStreamer<D>,
    stats: SessionStats,
    input: mpsc::UnboundedReceiver<Direction>,
    snapshots: watch::Sender<Snapshot>,
}

impl<D: DisplayDevice> GameSession<D> {
    pub fn new(config: GameConfig, streamer: DisplayStreamer<D>) -> (Self, SessionHandle) {
        Self::with_engine(GameEngine::new(config), streamer)
    }

    /// Build a session around an existing engine
    pub fn with_engine(engine: GameEngine, streamer: DisplayStreamer<D>) -> (Self, SessionHandle) {
        let renderer = FrameRenderer::new();
        let stats = SessionStats::new();
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot {
            frame: renderer.render(engine.state()),
            state: engine.snapshot(),
            stats: stats.clone(),
        });

        let session = Self {
            engine,
            renderer,
            streamer,
            stats,
            input: input_rx,
            snapshots: snapshot_tx,
        };
        let handle = SessionHandle {
            input: input_tx,
            snapshots: snapshot_rx,
        };

        (session, handle)
    }

    /// Carry totals over from an earlier session
    pub fn with_stats(mut self, stats: SessionStats) -> Self {
        self.snapshots
            .send_modify(|snapshot| snapshot.stats = stats.clone());
        self.stats = stats;
        self
    }

    /// Run rounds until the task is cancelled
    pub async fn run(mut self) {
        info!(device = %self.streamer.device().describe(), "session started");

        loop {
            self.play_round().await;
            self.show_game_over().await;

            // Input that arrived during the game-over screen belongs to the
            // finished round
            self.drain_input();
            self.engine.reset();
        }
    }

    async fn play_round(&mut self) {
        self.stats.start_round();
        info!("round started");

        loop {
            self.drain_input();

            let step = self.engine.tick();
            if !step.continues {
                info!(score = self.engine.score(), end = ?step.end, "round over");
                return;
            }

            let score = self.engine.score();
            let frame = self.renderer.render(self.engine.state());
            self.publish(frame).await;

            time::sleep(self.engine.config().tick_delay(score)).await;
        }
    }

    async fn show_game_over(&mut self) {
        let score = self.engine.score();
        self.stats.finish_round(score);

        time::sleep(self.engine.config().game_over_pause()).await;
        let frame = self.renderer.render_game_over(score);
        self.publish(frame).await;
        time::sleep(self.engine.config().game_over_hold()).await;
    }

    /// Hand the frame to observers, then to the device.
    ///
    /// Device errors end here: the frame is counted as dropped and the loop
    /// carries on with the next tick.
    async fn publish(&mut self, frame: PixelBuffer) {
        self.stats.tick_clock();
        self.snapshots.send_replace(Snapshot {
            frame: frame.clone(),
            state: self.engine.snapshot(),
            stats: self.stats.clone(),
        });

        let result = self.streamer.publish(&frame).await;
        self.stats.record_publish(result.is_ok());

        if let Err(err) = result {
            if err.is_transient() {
                warn!(error = %err, "frame dropped");
            } else {
                error!(error = %err, "frame could not be encoded");
            }
        }

        let stats = &self.stats;
        self.snapshots.send_modify(|snapshot| snapshot.stats = stats.clone());
    }

    fn drain_input(&mut self) {
        while let Ok(direction) = self.input.try_recv() {
            debug!(?direction, "direction queued");
            self.engine.set_pending_direction(direction);
        }
    }
}

/// Keeps at most one session running.
///
/// Starting a session cancels the previous one first, so two loops never
/// race to draw on the same device.
#[derive(Debug, Default)]
pub struct SessionSupervisor {
    current: Option<JoinHandle<()>>,
}

impl SessionSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start<D>(&mut self, session: GameSession<D>)
    where
        D: DisplayDevice + 'static,
    {
        self.stop().await;
        self.current = Some(tokio::spawn(session.run()));
    }

    /// Cancel the running session, if any, and wait for it to wind down
    pub async fn stop(&mut self) {
        if let Some(task) = self.current.take() {
            task.abort();
            let _ = task.await;
            debug!("session stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SessionSupervisor {
    fn drop(&mut self) {
        if let Some(task) = self.current.take() {
            task.abort();
        }
    }
}
