use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use hoverspell::game::Snapshot;
use hoverspell::session::{GamePhase, Verdict};
use hoverspell::targets::Target;

use crate::{App, CELL_HEIGHT, CELL_WIDTH};

const HEADER_HEIGHT: u16 = 5;
const RESTART_WIDTH: u16 = 20;
const RESTART_HEIGHT: u16 = 3;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.game.snapshot(self.now());

        match snapshot.phase {
            GamePhase::Playing => render_playing(&snapshot, area, buf),
            GamePhase::GameOver => render_game_over(&snapshot, area, buf),
        }
    }
}

/// Where the restart button sits on the game over screen.
pub fn restart_button(area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(RESTART_WIDTH) / 2;
    let y = area.y + (area.height / 2 + 3).min(area.height.saturating_sub(RESTART_HEIGHT));
    Rect::new(x, y, RESTART_WIDTH, RESTART_HEIGHT).intersection(area)
}

/// Cell rectangle covered by a tile, clipped to `area`.
pub fn tile_rect(target: &Target, area: Rect) -> Option<Rect> {
    let half = target.size / 2.0;
    let x = ((target.center.x - half) / CELL_WIDTH).round().max(0.0) as u16;
    let y = ((target.center.y - half) / CELL_HEIGHT).round().max(0.0) as u16;
    let width = (target.size / CELL_WIDTH).round().max(3.0) as u16;
    let height = (target.size / CELL_HEIGHT).round().max(3.0) as u16;

    let rect = Rect::new(area.x.saturating_add(x), area.y.saturating_add(y), width, height)
        .intersection(area);
    (!rect.is_empty()).then_some(rect)
}

fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 1.0)) * width as f64).round() as usize;
    std::iter::repeat('━')
        .take(filled)
        .chain(std::iter::repeat('─').take(width - filled))
        .collect()
}

fn streak_pips(streak: u32, win: u32) -> String {
    (0..win)
        .map(|i| if i < streak { "★" } else { "☆" })
        .join("")
}

fn render_playing(snapshot: &Snapshot<'_>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    // prompt box
    let header = "Spell this word:";
    let typed = format!("Typed: {}", snapshot.typed);
    let inner_width = [header.width(), snapshot.prompt.width(), typed.width()]
        .into_iter()
        .max()
        .unwrap_or(0) as u16
        + 4;
    let header_rect = Rect::new(
        area.x + area.width.saturating_sub(inner_width + 2) / 2,
        area.y + 1,
        inner_width + 2,
        HEADER_HEIGHT,
    )
    .intersection(area);

    let border_color = match snapshot.flash {
        Some(Verdict::Miss) => Color::Red,
        Some(v) if v.is_correct() => Color::Green,
        _ => Color::Gray,
    };

    Paragraph::new(vec![
        Line::from(Span::styled(header, dim_style)),
        Line::from(Span::styled(
            snapshot.prompt,
            bold_style.fg(Color::Green),
        )),
        Line::from(Span::styled(typed, Style::default().fg(Color::Cyan))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)),
    )
    .render(header_rect, buf);

    // score
    let score_line = format!(
        "Score: {}  {}",
        snapshot.score,
        streak_pips(snapshot.streak, snapshot.win_streak)
    );
    Paragraph::new(Span::styled(score_line, bold_style.fg(Color::Yellow)))
        .alignment(Alignment::Right)
        .render(Rect::new(area.x, area.y, area.width.saturating_sub(1), 1), buf);

    // tiles
    for target in snapshot.targets {
        let Some(rect) = tile_rect(target, area) else {
            continue;
        };
        let hovered = snapshot.hovered == Some(target.id);

        let (border, label) = if hovered {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                bold_style.fg(Color::LightGreen),
            )
        } else {
            (Style::default().fg(Color::Gray), bold_style)
        };

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border);
        if hovered {
            let bar = progress_bar(
                snapshot.dwell_progress,
                rect.width.saturating_sub(2) as usize,
            );
            block = block.title_bottom(Line::from(Span::styled(bar, border)));
        }

        let inner = block.inner(rect);
        block.render(rect, buf);

        let middle = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1)
            .intersection(inner);
        Paragraph::new(Span::styled(target.label.to_string(), label))
            .alignment(Alignment::Center)
            .render(middle, buf);
    }

    // pointer
    if let Some(p) = snapshot.pointer {
        let x = area.x.saturating_add((p.x / CELL_WIDTH).max(0.0) as u16);
        let y = area.y.saturating_add((p.y / CELL_HEIGHT).max(0.0) as u16);
        if x < area.right() && y < area.bottom() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol("●")
                    .set_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
            }
        }
    }

    let help = "hover a tile to pick it  (esc)ape";
    Paragraph::new(Span::styled(help, dim_style.add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(
            Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1),
            buf,
        );
}

fn render_game_over(snapshot: &Snapshot<'_>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled(
            "Game over!",
            bold_style.fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            format!("{} words in a row!", snapshot.win_streak),
            bold_style,
        )),
        Line::from(""),
        Line::from(Span::styled("Final score", Style::default().fg(Color::Green))),
        Line::from(Span::styled(
            snapshot.score.to_string(),
            bold_style.fg(Color::LightGreen),
        )),
    ];

    let height = lines.len() as u16;
    let text_rect = Rect::new(
        area.x,
        area.y + (area.height / 2).saturating_sub(height + 1),
        area.width,
        height,
    )
    .intersection(area);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(text_rect, buf);

    let button = restart_button(area);
    Paragraph::new(Span::styled("Restart", bold_style.fg(Color::White)))
        .alignment(Alignment::Center)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green)),
        )
        .render(button, buf);

    let help = "(r)estart  (esc)ape";
    Paragraph::new(Span::styled(
        help,
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(
        Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1),
        buf,
    );
}
