//! App: terminal init, main loop, tick and key handling.

use crate::game::GameState;
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::{Args, GameConfig, highscores};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Playing,
    GameOver,
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    screen: Screen,
    /// Best displayed score, loaded once at startup and bumped on crash.
    best_score: u32,
    /// Set when the run that just ended beat the stored best.
    new_high_score: bool,
    last_tick: Instant,
    /// TachyonFX fade for the game-over overlay (created on first draw).
    game_over_effect: Option<Effect>,
    /// Last time we processed the game-over effect (for delta).
    game_over_effect_time: Option<Instant>,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let state = GameState::new(seed, config.start_speed);
        let screen = if args.no_menu {
            Screen::Playing
        } else {
            Screen::Title
        };
        Ok(Self {
            config,
            theme,
            state,
            screen,
            best_score: highscores::load_best_score(),
            new_high_score: false,
            last_tick: Instant::now(),
            game_over_effect: None,
            game_over_effect_time: None,
        })
    }

    /// Fresh run. An explicit `--seed` replays the same course every time;
    /// otherwise each run gets a new one.
    fn start_game(&mut self) {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.state = GameState::new(seed, self.config.start_speed);
        self.screen = Screen::Playing;
        self.new_high_score = false;
        self.last_tick = Instant::now();
        self.game_over_effect = None;
        self.game_over_effect_time = None;
    }

    /// Crash bookkeeping: persist the score, flag a new best.
    fn finish_game(&mut self) {
        let score = self.state.displayed_score();
        self.new_high_score = score > self.best_score;
        // Persistence failure should not take down the game over screen.
        if let Ok(best) = highscores::record_score(score) {
            self.best_score = best;
        } else if self.new_high_score {
            self.best_score = score;
        }
        self.screen = Screen::GameOver;
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{
                KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
                PushKeyboardEnhancementFlags,
            },
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Attempt to enable enhanced keyboard for Release events; ducking
        // falls back to press-toggles-only on terminals without support.
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        );

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let tick_interval = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    self.best_score,
                    self.new_high_score,
                    f.area(),
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_time,
                    now,
                )
            })?;

            // Outside a run there is no pending tick to catch; poll a full
            // interval so the title/game-over screens do not busy-wait.
            let timeout = if self.screen == Screen::Playing {
                tick_interval.saturating_sub(self.last_tick.elapsed())
            } else {
                tick_interval
            };
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        let action = key_to_action(key);

                        // Duck is level-triggered: Release stands back up.
                        if key.kind != KeyEventKind::Press {
                            if key.kind == KeyEventKind::Release
                                && action == Action::Duck
                                && self.screen == Screen::Playing
                            {
                                self.state.duck(false);
                            }
                            continue;
                        }

                        match self.screen {
                            Screen::Title => match action {
                                Action::Quit => return Ok(()),
                                Action::Jump => self.start_game(),
                                _ => {}
                            },
                            Screen::Playing => match action {
                                Action::Quit => return Ok(()),
                                Action::Jump => self.state.jump(),
                                Action::Duck => self.state.duck(true),
                                _ => {}
                            },
                            Screen::GameOver => match action {
                                Action::Quit => return Ok(()),
                                Action::Restart | Action::Jump => self.start_game(),
                                _ => {}
                            },
                        }
                    }
                }
            }

            if self.screen == Screen::Playing && self.last_tick.elapsed() >= tick_interval {
                self.last_tick = Instant::now();
                self.state.tick();
                if self.state.crashed {
                    self.finish_game();
                }
            }
        }
    }
}
