//! dashtui — Chrome-dino-style endless runner in the terminal.

mod app;
mod collision;
mod game;
mod highscores;
mod input;
mod spawn;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};

/// Options derived from CLI that affect the simulation itself.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed RNG seed; `None` means a fresh random course per run.
    pub seed: Option<u64>,
    pub start_speed: f32,
    pub tick_rate: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        seed: args.seed,
        start_speed: args.start_speed,
        tick_rate: args.tick_rate,
    };
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Endless-runner reflex game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "dashtui",
    version,
    about = "Endless runner in the terminal. Jump over cacti, duck under flyers, survive the speed-up.",
    long_about = "dashtui is a terminal endless runner in the style of the Chrome dino game.\n\n\
        Obstacles scroll in from the right and the world gets a little faster every tick. \
        Jump over ground obstacles, duck under low flyers, and survive as long as you can. \
        One hit ends the run; your best score is kept across sessions.\n\n\
        CONTROLS:\n  Space/Up/k  Jump    Down/j  Duck (hold)    R  Restart    Q / Esc  Quit\n\n\
        Use --seed to replay the same obstacle course, and --theme to load a btop-style \
        theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Game logic ticks per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub tick_rate: f64,

    /// Fixed RNG seed: same seed, same obstacle course. Random if not set.
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Starting scroll speed in field units per tick.
    #[arg(long, default_value = "6.0", value_name = "SPEED")]
    pub start_speed: f32,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Skip the title screen and start running immediately.
    #[arg(long)]
    pub no_menu: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
