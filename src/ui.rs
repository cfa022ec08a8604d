//! Layout and drawing: title screen, field, HUD, game over overlay.
//!
//! Rendering is a pure read of [`GameState`]; nothing here mutates the
//! simulation. The 800x400 logical field maps onto an 80x20 cell board
//! using half-blocks for two vertical pixels per terminal cell.

use crate::app::Screen;
use crate::game::{self, GameState};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// One logical pixel is this many field units; a terminal cell covers
/// one pixel horizontally and two vertically (via the half-block).
const PIXEL: f32 = 10.0;
/// Board size in terminal cells.
const BOARD_COLS: u16 = (game::FIELD_WIDTH / PIXEL) as u16;
const BOARD_ROWS: u16 = (game::FIELD_HEIGHT / (2.0 * PIXEL)) as u16;

/// Game-over fade duration in ms.
const GAME_OVER_FADE_MS: u32 = 600;

/// Draw the current screen. `effect`/`effect_time` carry the TachyonFX
/// game-over fade across frames; the driver resets them on restart.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    best_score: u32,
    new_high_score: bool,
    area: Rect,
    effect: &mut Option<Effect>,
    effect_time: &mut Option<Instant>,
    now: Instant,
) {
    match screen {
        Screen::Title => draw_title(frame, theme, best_score, area),
        Screen::Playing => {
            draw_game(frame, state, theme, best_score, area);
        }
        Screen::GameOver => {
            draw_game(frame, state, theme, best_score, area);
            apply_game_over_fade(frame, theme, area, effect, effect_time, now);
            draw_game_over(frame, state, theme, best_score, new_high_score, area);
        }
    }
}

/// Outer field rect (board + border), centered in the area.
fn field_outer_rect(area: Rect) -> Rect {
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(BOARD_COLS + 2),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(BOARD_ROWS + 2),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    vert[1]
}

/// Colour of the logical point (lx, ly), by entity priority.
fn point_color(state: &GameState, theme: &Theme, lx: f32, ly: f32) -> Color {
    let hit = |b: &game::Aabb| lx >= b.x && lx < b.x + b.width && ly >= b.y && ly < b.y + b.height;

    if hit(&state.player.hitbox()) {
        return theme.player;
    }
    for obstacle in &state.obstacles {
        if hit(&obstacle.hitbox()) {
            return match obstacle {
                game::Obstacle::Ground { .. } => theme.obstacle,
                game::Obstacle::Aerial { .. } => theme.flyer,
            };
        }
    }
    if ly >= game::GROUND_Y {
        return theme.ground;
    }
    for cloud in &state.clouds {
        if lx >= cloud.x
            && lx < cloud.x + game::CLOUD_WIDTH
            && ly >= cloud.y
            && ly < cloud.y + game::CLOUD_HEIGHT
        {
            return theme.cloud;
        }
    }
    theme.sky
}

/// Field + HUD. Read-only over the state.
fn draw_game(frame: &mut Frame, state: &GameState, theme: &Theme, best_score: u32, area: Rect) {
    let outer = field_outer_rect(area);
    let title = format!(
        " dashtui  HI {:05}  {:05} ",
        best_score,
        state.displayed_score()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.ground).bg(theme.sky))
        .title(Span::styled(title, Style::default().fg(theme.title)));
    let inner = block.inner(outer);
    block.render(outer, frame.buffer_mut());

    let board = Rect {
        x: inner.x,
        y: inner.y,
        width: BOARD_COLS.min(inner.width),
        height: BOARD_ROWS.min(inner.height),
    };

    let buf = frame.buffer_mut();
    for row in 0..board.height {
        for col in 0..board.width {
            // Sample the centre of the top and bottom half-pixels.
            let lx = (col as f32 + 0.5) * PIXEL;
            let ly_top = (row as f32 * 2.0 + 0.5) * PIXEL;
            let ly_bot = (row as f32 * 2.0 + 1.5) * PIXEL;
            let top = point_color(state, theme, lx, ly_top);
            let bot = point_color(state, theme, lx, ly_bot);
            buf[(board.x + col, board.y + row)]
                .set_symbol("▀")
                .set_style(Style::default().fg(top).bg(bot));
        }
    }
}

/// Fade the crashed field toward the sky colour behind the dialog.
fn apply_game_over_fade(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    effect: &mut Option<Effect>,
    effect_time: &mut Option<Instant>,
    now: Instant,
) {
    let board = field_outer_rect(area);
    let delta = effect_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *effect_time = Some(now);

    if effect.is_none() {
        let faded = fx::fade_to(
            theme.ground,
            theme.sky,
            (GAME_OVER_FADE_MS, Interpolation::Linear),
        )
        .with_area(board);
        *effect = Some(faded);
    }
    if let Some(effect) = effect {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn draw_title(frame: &mut Frame, theme: &Theme, best_score: u32, area: Rect) {
    let popup = centered_popup(area, 46, 12);

    let title = Line::from(vec![
        Span::styled(" dash ", Style::default().fg(theme.player).bold()),
        Span::styled(" tui ", Style::default().fg(theme.main_fg).bold()),
    ]);
    let fg = Style::default().fg(theme.main_fg);
    let lines: Vec<Line> = vec![
        Line::from(""),
        title,
        Line::from(""),
        Line::styled(" Jump over cacti, duck under flyers. ", fg),
        Line::styled(" It only gets faster. ", fg),
        Line::from(""),
        Line::styled(
            " Space/Up  jump    Down  duck    Q  quit ",
            Style::default().fg(theme.title),
        ),
        Line::from(""),
        Line::styled(format!(" Best: {:05} ", best_score), fg),
        Line::from(""),
        Line::styled(" Press Space to start ", Style::default().fg(theme.player).bold()),
    ];

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.sky))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.ground).bg(theme.sky)),
        );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    best_score: u32,
    new_high_score: bool,
    area: Rect,
) {
    let popup = centered_popup(area, 36, 10);
    let fg = Style::default().fg(theme.main_fg);

    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::styled(" G A M E  O V E R ", Style::default().fg(theme.obstacle).bold()),
        Line::from(""),
        Line::styled(format!(" Score: {:05} ", state.displayed_score()), fg),
        Line::styled(format!(" Best:  {:05} ", best_score), fg),
        // Replay this course with --seed.
        Line::styled(format!(" Seed:  {} ", state.seed), Style::default().fg(theme.cloud)),
    ];
    if new_high_score {
        lines.push(Line::styled(" New best! ", Style::default().fg(theme.title).bold()));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(" R restart   Q quit ", Style::default().fg(theme.title)));

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.sky))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.ground).bg(theme.sky))
                .title(Span::styled(" dashtui ", Style::default().fg(theme.title))),
        );
    p.render(popup, frame.buffer_mut());
}
