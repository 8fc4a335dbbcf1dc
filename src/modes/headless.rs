use anyhow::{bail, Result};
use tracing::info;

use super::session::{GameSession, SessionSupervisor};
use crate::device::{DisplayDevice, DisplayStreamer, FrameMetadata};
use crate::game::GameConfig;

/// Drive the LED matrix with no terminal UI until Ctrl+C.
///
/// Nobody steers, so the snake circles the torus until it eats itself.
pub struct HeadlessMode<D> {
    config: GameConfig,
    device: D,
    metadata: FrameMetadata,
}

impl<D> HeadlessMode<D>
where
    D: DisplayDevice + 'static,
{
    pub fn new(config: GameConfig, device: D, metadata: FrameMetadata) -> Self {
        Self {
            config,
            device,
            metadata,
        }
    }

    pub async fn run(self) -> Result<()> {
        let streamer = DisplayStreamer::new(self.device, self.metadata);
        let (session, mut handle) = GameSession::new(self.config, streamer);
        let mut supervisor = SessionSupervisor::new();
        supervisor.start(session).await;

        let mut games_reported = 0;
        loop {
            tokio::select! {
                alive = handle.changed() => {
                    if !alive {
                        bail!("game session ended unexpectedly");
                    }
                    let snapshot = handle.latest();
                    if snapshot.is_game_over() && snapshot.stats.games_played > games_reported {
                        games_reported = snapshot.stats.games_played;
                        info!(
                            score = snapshot.score(),
                            best = snapshot.stats.best_score,
                            games = games_reported,
                            dropped = snapshot.stats.frames_dropped,
                            "game over"
                        );
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted, shutting down");
                    break;
                }
            }
        }

        supervisor.stop().await;
        Ok(())
    }
}
