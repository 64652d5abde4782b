use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::scorecard::{CARD_HEIGHT, MIN_CARD_WIDTH, ScoreCard};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, card_columns};

const LOG_PANE_HEIGHT: u16 = 10;

const HELP_LINES: &[(&str, &str)] = &[
    ("r", "refresh now"),
    ("← / h", "previous week"),
    ("→ / l", "next week"),
    ("↓ / j", "select next card"),
    ("↑ / k", "select previous card"),
    ("f", "toggle full screen"),
    ("\"", "toggle log pane"),
    ("?", "help"),
    ("Esc", "close help"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
            draw_footer(f, layout.footer, app);
        }

        let mut main = layout.main;
        if app.state.show_logs {
            let [top, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(LOG_PANE_HEIGHT),
            ])
            .areas(main);
            main = top;
            draw_logs(f, logs);
        }

        match app.state.active_tab {
            MenuItem::Scoreboard => draw_scoreboard(f, main, app),
            MenuItem::Help => draw_help(f, main),
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;
    let board = &app.state.scoreboard;

    let league = board.league_name.as_deref().unwrap_or("MyFantasyLeague");
    let mut spans = vec![
        Span::styled(format!(" {league} "), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("│ Week {} ", board.week)),
        Span::styled(
            format!("│ refreshes every {}s", app.settings.refresh_interval.as_secs()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(source) = board.source {
        spans.push(Span::styled(
            format!(" │ {}", source.label()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).style(style).block(
        Block::default()
            .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
            .border_type(border_type),
    );
    f.render_widget(title, header[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, header[1]);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = match (&app.state.last_error, &app.state.scoreboard.last_updated) {
        (Some(err), _) => Line::from(Span::styled(
            format!(" Refresh failed: {err}"),
            Style::default().fg(Color::Red),
        )),
        (None, Some(at)) => Line::from(Span::styled(
            format!(" Last updated {at}"),
            Style::default().fg(Color::DarkGray),
        )),
        (None, None) => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_scoreboard(f: &mut Frame, area: Rect, app: &App) {
    let board = &app.state.scoreboard;

    if board.matchups.is_empty() {
        let msg = if board.loaded_once {
            format!("No live matchups found for week {}.", board.week)
        } else {
            format!("Loading week {}...", board.week)
        };
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            middle,
        );
        return;
    }

    let cols = card_columns(area.width, MIN_CARD_WIDTH);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = board.selected / cols as usize;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let col_areas = Layout::horizontal(vec![Constraint::Fill(1); cols as usize]).split(area);
    let week = board.shown_week.unwrap_or(board.week);

    for (idx, matchup) in board.matchups.iter().enumerate() {
        let row = idx / cols as usize;
        if row < first_row || row >= first_row + visible_rows {
            continue;
        }
        let col = col_areas[idx % cols as usize];
        let y = area.y + ((row - first_row) as u16) * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        let card_area = Rect::new(col.x, y, col.width, height);

        f.render_widget(
            ScoreCard {
                matchup,
                week,
                updated_at: board.last_updated.as_deref(),
                selected: idx == board.selected,
            },
            card_area,
        );
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>8}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
