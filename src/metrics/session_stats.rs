use std::time::Duration;

use tokio::time::Instant;

/// Running totals for one play session. Kept in memory only.
///
/// The round clock runs on tokio time, so it follows the paced loop (and a
/// paused test clock) rather than wall time.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub games_played: u32,
    pub best_score: u32,
    pub frames_published: u64,
    pub frames_dropped: u64,
    round_started: Option<Instant>,
    round_time: Duration,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_round(&mut self) {
        self.round_started = Some(Instant::now());
        self.round_time = Duration::ZERO;
    }

    /// Catch the round clock up. Between rounds it stays frozen.
    pub fn tick_clock(&mut self) {
        if let Some(started) = self.round_started {
            self.round_time = started.elapsed();
        }
    }

    pub fn finish_round(&mut self, score: u32) {
        self.tick_clock();
        self.round_started = None;
        self.games_played += 1;
        self.best_score = self.best_score.max(score);
    }

    pub fn record_publish(&mut self, delivered: bool) {
        if delivered {
            self.frames_published += 1;
        } else {
            self.frames_dropped += 1;
        }
    }

    pub fn round_time(&self) -> Duration {
        self.round_time
    }

    /// Round time as `m:ss`
    pub fn round_clock(&self) -> String {
        let secs = self.round_time.as_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time;

    #[tokio::test(start_paused = true)]
    async fn test_round_clock_freezes_at_game_over() {
        let mut stats = SessionStats::new();
        stats.start_round();

        time::advance(Duration::from_secs(75)).await;
        stats.tick_clock();
        assert_eq!(stats.round_clock(), "1:15");

        stats.finish_round(4);
        time::advance(Duration::from_secs(30)).await;
        stats.tick_clock();
        assert_eq!(stats.round_time(), Duration::from_secs(75));

        stats.start_round();
        stats.tick_clock();
        assert_eq!(stats.round_clock(), "0:00");
    }

    #[test]
    fn test_clock_idle_before_first_round() {
        let mut stats = SessionStats::new();
        stats.tick_clock();
        assert_eq!(stats.round_time(), Duration::ZERO);
    }

    #[test]
    fn test_totals_across_rounds() {
        let mut stats = SessionStats::new();
        for score in [7, 2, 11] {
            stats.start_round();
            stats.finish_round(score);
        }
        stats.record_publish(true);
        stats.record_publish(false);
        stats.record_publish(true);

        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.best_score, 11);
        assert_eq!(stats.frames_published, 2);
        assert_eq!(stats.frames_dropped, 1);
    }
}
