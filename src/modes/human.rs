use anyhow::{bail, Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use super::session::{GameSession, SessionHandle, SessionSupervisor, Snapshot};
use crate::device::{DisplayDevice, DisplayStreamer, FrameMetadata};
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::PreviewRenderer;

/// Play from the keyboard while watching a terminal copy of the LED matrix
pub struct HumanMode<D> {
    config: GameConfig,
    device: D,
    metadata: FrameMetadata,
    supervisor: SessionSupervisor,
    preview: PreviewRenderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl<D> HumanMode<D>
where
    D: DisplayDevice + Clone + 'static,
{
    pub fn new(config: GameConfig, device: D, metadata: FrameMetadata) -> Self {
        let preview = PreviewRenderer::new(device.describe());

        Self {
            config,
            device,
            metadata,
            supervisor: SessionSupervisor::new(),
            preview,
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        self.supervisor.stop().await;
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut events = EventStream::new();
        let mut handle = self.start_session(SessionStats::new()).await;
        self.draw(terminal, &handle.latest())?;

        loop {
            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if let Some(new_handle) = self.handle_key(key, &handle).await {
                                handle = new_handle;
                            }
                        }
                        Some(Ok(Event::Resize(..))) => self.draw(terminal, &handle.latest())?,
                        Some(Ok(_)) => {}
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Redraw whenever the session produced a frame
                alive = handle.changed() => {
                    if !alive {
                        bail!("game session ended unexpectedly");
                    }
                    self.draw(terminal, &handle.latest())?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Returns a new handle when the key restarted the session
    async fn handle_key(
        &mut self,
        key: crossterm::event::KeyEvent,
        handle: &SessionHandle,
    ) -> Option<SessionHandle> {
        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                handle.steer(direction);
                None
            }
            KeyAction::Restart => {
                let stats = handle.latest().stats;
                Some(self.start_session(stats).await)
            }
            KeyAction::Quit => {
                self.should_quit = true;
                None
            }
            KeyAction::None => None,
        }
    }

    /// Replace whatever session is running with a fresh one
    async fn start_session(&mut self, stats: SessionStats) -> SessionHandle {
        let streamer = DisplayStreamer::new(self.device.clone(), self.metadata);
        let (session, handle) = GameSession::new(self.config.clone(), streamer);
        self.supervisor.start(session.with_stats(stats)).await;
        handle
    }

    fn draw(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
        snapshot: &Snapshot,
    ) -> Result<()> {
        terminal
            .draw(|frame| self.preview.render(frame, snapshot))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DryRunDevice;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode<DryRunDevice> {
        HumanMode::new(GameConfig::default(), DryRunDevice, FrameMetadata::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_session() {
        let mut mode = mode();
        let first = mode.start_session(SessionStats::new()).await;
        assert!(mode.supervisor.is_running());

        let restart = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        let second = mode.handle_key(restart, &first).await;

        assert!(second.is_some());
        assert!(mode.supervisor.is_running());
        // The old session is gone, so its input channel is closed
        assert!(!first.steer(crate::game::Direction::Up));
        mode.supervisor.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_key_sets_flag() {
        let mut mode = mode();
        let handle = mode.start_session(SessionStats::new()).await;

        let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(mode.handle_key(quit, &handle).await.is_none());
        assert!(mode.should_quit);
        mode.supervisor.stop().await;
    }
}
