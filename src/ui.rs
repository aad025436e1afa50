//! Draw the game: sand board, sidebar, and the fade over freshly cleared cells.

use crate::board::{Cell, SandColor};
use crate::game::Snapshot;
use crate::piece::{BLOCK_SCALE, Piece};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

const BG: Color = Color::Rgb(0x05, 0x05, 0x15);
const BORDER: Color = Color::Rgb(0x4b, 0x52, 0x63);
const TITLE: Color = Color::Rgb(0x61, 0xaf, 0xef);
const TEXT: Color = Color::Rgb(0xab, 0xb2, 0xbf);
/// Cleared cells flash this colour, then fade to the background.
const FLASH: Color = Color::White;

const SIDEBAR_WIDTH: u16 = 24;
const CLEAR_FADE_MS: u32 = 400;

/// Preview block: two columns by one row, so blocks look square.
const PREVIEW_CELL_W: u16 = 2;

/// Fade over the cells emptied by one clear.
pub struct ClearFade {
    cells: Vec<usize>,
    effect: Option<Effect>,
    last_frame: Option<Instant>,
}

impl ClearFade {
    pub fn new(cells: &[usize]) -> Self {
        Self {
            cells: cells.to_vec(),
            effect: None,
            last_frame: None,
        }
    }

    pub fn done(&self) -> bool {
        self.effect.as_ref().is_some_and(|e| e.done())
    }
}

fn sand_color(color: SandColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

/// Terminal size (w, h) of the bordered board: one column per grain and
/// two grain rows per terminal row.
fn playfield_size(cols: usize, rows: usize) -> (u16, u16) {
    let side = |n: usize| u16::try_from(n).unwrap_or(u16::MAX).saturating_add(2);
    (side(cols), side(rows.div_ceil(2)))
}

pub fn draw(frame: &mut Frame, snap: &Snapshot<'_>, fade: Option<&mut ClearFade>, now: Instant) {
    let area = frame.area();
    let (pw, ph) = playfield_size(snap.board.cols(), snap.board.rows());
    let total_w = pw.saturating_add(SIDEBAR_WIDTH);

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let fading = fade.as_deref().map_or(&[][..], |f| f.cells.as_slice());
    let board_rect = draw_playfield(frame, snap, inner[0], fading);
    draw_sidebar(frame, snap, inner[1]);

    if let Some(fade) = fade {
        apply_clear_fade(frame, board_rect, snap.board.cols(), fade, now);
    }
}

/// Per-grain display colours: settled sand, then flashing cleared cells,
/// then the active piece on top.
fn grain_colors(snap: &Snapshot<'_>, fading: &[usize]) -> Vec<Color> {
    let board = snap.board;
    let mut colors: Vec<Color> = board
        .iter()
        .map(|(_, _, cell)| match cell {
            Cell::Empty => BG,
            Cell::Sand(c) => sand_color(c),
        })
        .collect();
    for &i in fading {
        if board.at(i).is_empty() {
            colors[i] = FLASH;
        }
    }
    if let Some(piece) = snap.active {
        let cols = board.cols() as i32;
        let rows = board.rows() as i32;
        let color = sand_color(piece.color);
        for (c, r) in piece.cells() {
            if (0..cols).contains(&c) && (0..rows).contains(&r) {
                colors[(r * cols + c) as usize] = color;
            }
        }
    }
    colors
}

/// Returns the inner board rect (used to place the clear fade).
fn draw_playfield(frame: &mut Frame, snap: &Snapshot<'_>, area: Rect, fading: &[usize]) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER).bg(BG))
        .title(Span::styled(" sandbridge ", Style::default().fg(TITLE)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let cols = snap.board.cols();
    let rows = snap.board.rows();
    let board_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: (cols as u16).min(inner.width),
        height: (rows.div_ceil(2) as u16).min(inner.height),
    };

    let colors = grain_colors(snap, fading);
    let buf = frame.buffer_mut();
    for y in (0..rows).step_by(2) {
        let ry = board_rect.y + (y / 2) as u16;
        if ry >= board_rect.bottom() {
            break;
        }
        for x in 0..cols.min(board_rect.width as usize) {
            let top = colors[y * cols + x];
            let bottom = if y + 1 < rows {
                colors[(y + 1) * cols + x]
            } else {
                BG
            };
            buf[(board_rect.x + x as u16, ry)]
                .set_symbol("▀")
                .set_style(Style::default().fg(top).bg(bottom));
        }
    }
    board_rect
}

fn draw_sidebar(frame: &mut Frame, snap: &Snapshot<'_>, area: Rect) {
    let title_style = Style::default().fg(TITLE);
    let fg_style = Style::default().fg(TEXT);
    let border_style = Style::default().fg(BORDER).bg(BG);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Next (border + title + 4 block rows)
            Constraint::Length(1),
            Constraint::Length(4), // Score, Best
            Constraint::Length(1),
            Constraint::Length(3), // Status
            Constraint::Length(1),
            Constraint::Length(9), // Keys
        ])
        .split(area);

    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    let next_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1)])
        .split(next_inner);
    Paragraph::new(Line::from(Span::styled("Next", title_style)))
        .render(next_layout[0], frame.buffer_mut());
    draw_next_preview(frame, snap.next, next_layout[1]);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let stats = vec![
        Line::from(vec![
            Span::styled("Score: ", title_style),
            Span::styled(snap.score.to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Best: ", title_style),
            Span::styled(snap.high_score.to_string(), fg_style),
        ]),
    ];
    Paragraph::new(Text::from(stats)).render(stats_inner, frame.buffer_mut());

    let (label, color) = if snap.game_over {
        ("GAME OVER  r: restart", Color::Red)
    } else if snap.paused {
        ("PAUSED", Color::Yellow)
    } else {
        ("PLAYING", Color::Green)
    };
    let status_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let status_inner = status_block.inner(chunks[4]);
    status_block.render(chunks[4], frame.buffer_mut());
    Paragraph::new(Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .render(status_inner, frame.buffer_mut());

    let keys_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let keys_inner = keys_block.inner(chunks[6]);
    keys_block.render(chunks[6], frame.buffer_mut());
    let keys = [
        ("←/→ h/l", "move"),
        ("↑ k", "rotate"),
        ("↓ j", "soft drop"),
        ("space", "hard drop"),
        ("p", "pause"),
        ("r", "restart"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(k, what)| {
            Line::from(vec![
                Span::styled(format!("{k:<9}"), title_style),
                Span::styled(*what, fg_style),
            ])
        })
        .collect();
    Paragraph::new(Text::from(lines)).render(keys_inner, frame.buffer_mut());
}

/// Next piece at block resolution: one preview cell per BLOCK_SCALE square.
fn draw_next_preview(frame: &mut Frame, piece: &Piece, area: Rect) {
    let shape = &piece.shape;
    let blocks: Vec<(u16, u16)> = (0..shape.height() / BLOCK_SCALE)
        .flat_map(|by| (0..shape.width() / BLOCK_SCALE).map(move |bx| (bx, by)))
        .filter(|&(bx, by)| shape.get(by * BLOCK_SCALE, bx * BLOCK_SCALE))
        .map(|(bx, by)| (bx as u16, by as u16))
        .collect();
    let Some(min_x) = blocks.iter().map(|b| b.0).min() else {
        return;
    };
    let min_y = blocks.iter().map(|b| b.1).min().unwrap_or(0);
    let max_x = blocks.iter().map(|b| b.0).max().unwrap_or(min_x);
    let max_y = blocks.iter().map(|b| b.1).max().unwrap_or(min_y);

    let bw = (max_x - min_x + 1) * PREVIEW_CELL_W;
    let bh = max_y - min_y + 1;
    let off_x = area.width.saturating_sub(bw) / 2;
    let off_y = area.height.saturating_sub(bh) / 2;
    let color = sand_color(piece.color);

    for (bx, by) in blocks {
        let r = Rect {
            x: area.x + off_x + (bx - min_x) * PREVIEW_CELL_W,
            y: area.y + off_y + (by - min_y),
            width: PREVIEW_CELL_W,
            height: 1,
        }
        .intersection(area);
        Paragraph::new("██")
            .style(Style::default().fg(color))
            .render(r, frame.buffer_mut());
    }
}

/// Builds the fade on first use, then advances it by the time since the
/// previous frame.
fn apply_clear_fade(
    frame: &mut Frame,
    board_rect: Rect,
    cols: usize,
    fade: &mut ClearFade,
    now: Instant,
) {
    let delta = fade
        .last_frame
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    fade.last_frame = Some(now);

    if fade.effect.is_none() {
        let positions: HashSet<(u16, u16)> = fade
            .cells
            .iter()
            .map(|&i| {
                (
                    board_rect.x.saturating_add((i % cols) as u16),
                    board_rect.y.saturating_add((i / cols / 2) as u16),
                )
            })
            .collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            positions.contains(&(pos.x, pos.y))
        }));
        let effect = fx::fade_to(BG, BG, (CLEAR_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board_rect);
        fade.effect = Some(effect);
    }

    if let Some(effect) = fade.effect.as_mut() {
        frame.render_effect(effect, board_rect, TfxDuration::from_millis(delta_ms));
    }
}
