use mfl_api::{Matchup, MatchupSide, MatchupTag};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::{Block, BorderType, Borders, Widget};

/// Rows per card, borders included.
pub const CARD_HEIGHT: u16 = 10;

/// Narrowest card that still fits a name and a score on one line.
pub const MIN_CARD_WIDTH: u16 = 34;

const BAR_CHAR: &str = "█";
const FALLBACK_A: Color = Color::Rgb(0, 122, 195);
const FALLBACK_B: Color = Color::Rgb(255, 103, 31);

/// One matchup rendered as a bordered card.
///
/// ```text
/// ╭──────────────────────────────────╮
/// │ Closest Matchup       Week 4 • LIVE │
/// │ Ducks                        101.5 │
/// │   62% left · 4 players left        │
/// │ Geese                         99.0 │
/// │   40% left · 3 players left        │
/// │ ██████████████████░░░░░░░░░░░░░░░░ │
/// │ 55%                            45% │
/// │ Live scoring via MFL · 8:15:02 PM  │
/// ╰──────────────────────────────────╯
/// ```
pub struct ScoreCard<'a> {
    pub matchup: &'a Matchup,
    pub week: u8,
    pub updated_at: Option<&'a str>,
    pub selected: bool,
}

impl Widget for ScoreCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 8 || area.height < 3 {
            return;
        }

        let border = if self.selected { Color::White } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        let m = self.matchup;
        let a_color = side_color(&m.a, FALLBACK_A);
        let b_color = side_color(&m.b, FALLBACK_B);
        let dim = Style::default().fg(Color::DarkGray);

        let mut rows = inner.y..inner.bottom();

        // Header: tag badge on the left, week and clock on the right.
        if let Some(y) = rows.next() {
            if let Some(tag) = m.tag {
                put_left(buf, inner, y, &format!(" {} ", tag.label()), tag_style(tag));
            }
            put_right(buf, inner, y, &format!("Week {} • {}", self.week, m.clock), dim);
        }

        for (side, color) in [(&m.a, a_color), (&m.b, b_color)] {
            if let Some(y) = rows.next() {
                let score = format!("{:.1}", side.score);
                let name_width = inner.width.saturating_sub(score.chars().count() as u16 + 1);
                put_left(
                    buf,
                    Rect { width: name_width, ..inner },
                    y,
                    &side.name,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                );
                put_right(buf, inner, y, &score, Style::default().add_modifier(Modifier::BOLD));
            }
            if let Some(y) = rows.next()
                && let Some(detail) = side_detail(side)
            {
                put_left(buf, inner, y, &format!("  {detail}"), dim);
            }
        }

        let left_share = m.left_share();
        if let Some(y) = rows.next() {
            render_win_bar(buf, inner, y, left_share, a_color, b_color);
        }
        if let Some(y) = rows.next() {
            let right_share = 100.0 - left_share;
            put_left(buf, inner, y, &format!("{left_share:.0}%"), Style::default().fg(a_color));
            put_right(buf, inner, y, &format!("{right_share:.0}%"), Style::default().fg(b_color));
        }

        if let Some(y) = rows.next() {
            let footer = match self.updated_at {
                Some(at) => format!("Live scoring via MFL · {at}"),
                None => "Live scoring via MFL".to_string(),
            };
            put_left(buf, inner, y, &footer, dim);
        }
    }
}

fn render_win_bar(buf: &mut Buffer, inner: Rect, y: u16, left_share: f64, a: Color, b: Color) {
    let width = inner.width;
    let filled = ((f64::from(width) * left_share / 100.0).round() as u16).min(width);
    for x in 0..width {
        let color = if x < filled { a } else { b };
        buf.set_string(inner.x + x, y, BAR_CHAR, Style::default().fg(color));
    }
}

/// "62% left · 4 players left"; None when nothing is known about the side's clock.
fn side_detail(side: &MatchupSide) -> Option<String> {
    let pct = side.remaining_percent.map(|p| format!("{p:.0}% left"));
    let players = side.players_left.map(|n| match n {
        1 => "1 player left".to_string(),
        n => format!("{n} players left"),
    });
    match (pct, players) {
        (Some(p), Some(n)) => Some(format!("{p} · {n}")),
        (Some(p), None) => Some(p),
        (None, Some(n)) => Some(n),
        (None, None) => None,
    }
}

fn tag_style(tag: MatchupTag) -> Style {
    let bg = match tag {
        MatchupTag::GameOfTheWeek => Color::Yellow,
        MatchupTag::ClosestMatchup => Color::Green,
        MatchupTag::BlowoutRisk => Color::Red,
    };
    Style::default().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
}

fn side_color(side: &MatchupSide, fallback: Color) -> Color {
    side.color.as_deref().and_then(parse_hex_color).unwrap_or(fallback)
}

/// `#RRGGBB` or `RRGGBB` → RGB color.
pub fn parse_hex_color(raw: &str) -> Option<Color> {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn put_left(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    buf.set_stringn(area.x, y, text, area.width as usize, style);
}

fn put_right(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let len = (text.chars().count() as u16).min(area.width);
    let x = area.x + area.width - len;
    buf.set_stringn(x, y, text, len as usize, style);
}
