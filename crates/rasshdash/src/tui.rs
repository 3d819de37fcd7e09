//! Terminal presenter for the honeypot dashboard.

use crate::connection::DotColor;
use crate::presenter::Presenter;
use crate::view::{FaceScale, FeedItem, RenderPatch, ViewModel, FEED_PLACEHOLDER};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use rassh_shared::EffectCategory;
use std::io;
use std::time::Duration;

pub struct TuiPresenter {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    restored: bool,
}

impl TuiPresenter {
    /// Take over the terminal
    pub fn new() -> Result<Self> {
        enable_raw_mode().map_err(|e| {
            anyhow::anyhow!(
                "Failed to enable raw mode: {}. Run rasshdash in a real terminal or pass --headless.",
                e
            )
        })?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            let _ = disable_raw_mode();
            anyhow::anyhow!("Failed to initialize terminal: {}", e)
        })?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }
}

impl Presenter for TuiPresenter {
    fn present(&mut self, view: &ViewModel, _patch: &RenderPatch) -> Result<()> {
        self.terminal.draw(|f| draw(f, view))?;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiPresenter {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

/// Block until the operator asks to quit.
///
/// Meant for a blocking thread; returns false when `keep_going` says stop.
pub fn wait_for_quit(keep_going: impl Fn() -> bool) -> io::Result<bool> {
    while keep_going() {
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match (key.code, key.modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Ok(true),
                (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return Ok(true),
                _ => {}
            }
        }
    }
    Ok(false)
}

fn draw(f: &mut Frame, view: &ViewModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Face + counters
            Constraint::Min(8),    // Leaderboard + feed
            Constraint::Length(3), // Footer
        ])
        .split(f.size());

    draw_header(f, chunks[0], view);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_face(f, top[0], view);
    draw_counters(f, top[1], view);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[2]);
    draw_leaderboard(f, bottom[0], view);
    draw_feed(f, bottom[1], view);

    draw_footer(f, chunks[3]);
}

fn draw_header(f: &mut Frame, area: Rect, view: &ViewModel) {
    let dot_color = match view.status.dot {
        DotColor::Green => Color::Green,
        DotColor::Red => Color::Red,
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "  RASSH Honeypot ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{}", env!("RASSH_DASH_VERSION")),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  |  "),
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::raw(view.status.text),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    )
    .alignment(Alignment::Left);

    f.render_widget(header, area);
}

fn effect_color(effect: EffectCategory) -> Color {
    match effect {
        EffectCategory::Excited => Color::LightGreen,
        EffectCategory::Alert => Color::Yellow,
        EffectCategory::Angry => Color::Red,
        EffectCategory::None => Color::Green,
    }
}

fn draw_face(f: &mut Frame, area: Rect, view: &ViewModel) {
    let glyph_style = match view.face.scale {
        FaceScale::Normal => Style::default().fg(Color::White),
        FaceScale::Shrunk => Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
        FaceScale::Bounce => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    };
    let border = effect_color(view.effect);
    let border_style = if view.effect.is_visible() {
        Style::default().fg(border).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(border)
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(view.face.glyph.clone(), glyph_style)),
        Line::from(Span::styled(
            view.face.description,
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            view.face.last_update.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let face = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Persona "),
        )
        .alignment(Alignment::Center);

    f.render_widget(face, area);
}

fn draw_counters(f: &mut Frame, area: Rect, view: &ViewModel) {
    let c = &view.counters;
    let row = |label: &'static str, value: u64| {
        Line::from(vec![
            Span::raw(format!("  {:<16}", label)),
            Span::styled(
                value.to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let counters = Paragraph::new(vec![
        row("Total sessions", c.total_sessions),
        row("Active sessions", c.active_sessions),
        row("Commands today", c.commands_today),
        row("Total commands", c.total_commands),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Stats "),
    );

    f.render_widget(counters, area);
}

fn draw_leaderboard(f: &mut Frame, area: Rect, view: &ViewModel) {
    let items: Vec<ListItem> = view
        .leaderboard
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Top Attackers "),
    );

    f.render_widget(list, area);
}

fn draw_feed(f: &mut Frame, area: Rect, view: &ViewModel) {
    let items: Vec<ListItem> = view
        .feed
        .iter()
        .map(|item| match item {
            FeedItem::Placeholder => ListItem::new(Span::styled(
                FEED_PLACEHOLDER,
                Style::default().fg(Color::Gray),
            )),
            FeedItem::Entry(entry) => {
                let (r, g, b) = entry.action_color;
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", entry.time), Style::default().fg(Color::Gray)),
                    Span::styled(
                        entry.address.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" executed: "),
                    Span::styled(entry.command.clone(), Style::default().fg(Color::Cyan)),
                    Span::raw("  "),
                    Span::styled(entry.action_label, Style::default().fg(Color::Rgb(r, g, b))),
                    Span::raw(format!(" (Reward: {})", entry.reward)),
                ]))
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Live Activity "),
    );

    f.render_widget(list, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" q/Esc ", Style::default().fg(Color::Black).bg(Color::Gray)),
        Span::raw(" Quit  "),
        Span::raw("  Stats every 5s, activity every 10s, live events pushed"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray)),
    )
    .alignment(Alignment::Left);

    f.render_widget(footer, area);
}
