//! App: terminal init, main loop, key handling and wall-clock pacing.

use crate::game::GameController;
use crate::highscores::HighScoreStore;
use crate::input::{Action, key_to_action};
use crate::random::SeededRandomness;
use crate::ui::{self, ClearFade};
use anyhow::Result;
use crossterm::event::{self, Event};
use log::info;
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Poll budget for one frame: the tick interval rounded up past the next
/// whole millisecond, so one frame's elapsed time always exceeds it.
fn frame_budget(tick_interval: Duration) -> Duration {
    let ms = tick_interval.as_nanos() / 1_000_000 + 1;
    Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
}

pub type Game = GameController<SeededRandomness, Box<dyn HighScoreStore>>;

pub struct App {
    game: Game,
    /// Fade over the cells emptied by the latest clear, until it finishes.
    fade: Option<ClearFade>,
    last_advance: Instant,
}

impl App {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            fade: None,
            last_advance: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        // Terminals that support it report key repeats explicitly.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|mut terminal| self.run_loop(&mut terminal));

        // Restore
        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        info!(
            "exiting with score {}, best {}",
            self.game.score(),
            self.game.high_score()
        );
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let budget = frame_budget(self.game.config().tick_interval);
        self.last_advance = Instant::now();
        loop {
            let now = Instant::now();
            let game = &self.game;
            let fade = &mut self.fade;
            terminal.draw(|f| ui::draw(f, &game.snapshot(), fade.as_mut(), now))?;

            if self.fade.as_ref().is_some_and(ClearFade::done) {
                self.fade = None;
            }

            let timeout = budget.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if !self.apply_action(key_to_action(key)) {
                            return Ok(());
                        }
                    }
                }
            }

            let now = Instant::now();
            let elapsed = now.saturating_duration_since(self.last_advance);
            self.last_advance = now;
            self.advance(elapsed);
        }
    }

    /// Runs the simulation and starts a fade when the tick cleared cells.
    fn advance(&mut self, elapsed: Duration) {
        if !self.game.advance(elapsed) {
            return;
        }
        let cleared = self.game.snapshot().cleared;
        if !cleared.is_empty() {
            self.fade = Some(ClearFade::new(cleared));
        }
    }

    /// Returns false when the player asked to quit.
    fn apply_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.game.move_left(),
            Action::MoveRight => self.game.move_right(),
            Action::SoftDrop => self.game.soft_drop(),
            Action::Rotate => self.game.rotate(),
            Action::HardDrop => self.game.hard_drop(),
            Action::Pause => self.game.toggle_pause(),
            Action::Restart => {
                self.game.reset();
                self.fade = None;
            }
            Action::Quit => return false,
            Action::None => {}
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::highscores::MemoryHighScores;

    fn app() -> App {
        let store: Box<dyn HighScoreStore> = Box::new(MemoryHighScores::with_score(7));
        let game =
            GameController::new(GameConfig::default(), SeededRandomness::from_seed(3), store)
                .unwrap();
        App::new(game)
    }

    #[test]
    fn test_frame_budget_exceeds_tick_interval() {
        assert_eq!(
            frame_budget(GameConfig::default().tick_interval),
            Duration::from_millis(17)
        );
        assert_eq!(frame_budget(Duration::from_millis(17)), Duration::from_millis(18));
    }

    #[test]
    fn test_frames_tick_at_about_sixty_hz() {
        let mut a = app();
        let budget = frame_budget(a.game.config().tick_interval);
        let frames: u32 = 600;
        let mut ticks: u32 = 0;
        for _ in 0..frames {
            if a.game.advance(budget) {
                ticks += 1;
            }
        }
        assert_eq!(ticks, frames);
        let rate = f64::from(ticks) / (budget * frames).as_secs_f64();
        assert!((55.0..=61.0).contains(&rate), "{rate} Hz");
    }

    #[test]
    fn test_advance_without_clear_starts_no_fade() {
        let mut a = app();
        a.advance(Duration::from_millis(17));
        assert!(a.fade.is_none());
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let mut a = app();
        assert!(a.apply_action(Action::MoveLeft));
        assert!(a.apply_action(Action::None));
        assert!(!a.apply_action(Action::Quit));
    }

    #[test]
    fn test_actions_reach_the_game() {
        let mut a = app();
        let col = a.game.active().col;
        a.apply_action(Action::MoveRight);
        assert_eq!(a.game.active().col, col + 1);
        a.apply_action(Action::Pause);
        assert!(a.game.is_paused());
        a.apply_action(Action::Restart);
        assert!(!a.game.is_paused());
        assert_eq!(a.game.high_score(), 7);
    }
}
