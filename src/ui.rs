pub mod charting;
pub mod screen;

use std::ops::Range;

use keysprint::{classifier::CharState, controller::Snapshot, session::Phase, TestDuration};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const VISIBLE_TEXT_LINES: usize = 3;

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Typing screen: duration picker or countdown, live stats, and the scrolling text.
pub struct TypingView<'a>(pub &'a App);

impl Widget for TypingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.0.controller.snapshot();
        let text_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2) as usize;
        let padding = area.height.saturating_sub(VISIBLE_TEXT_LINES as u16 + 6) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(1), // duration picker / countdown
                Constraint::Length(1),
                Constraint::Length(1), // live stats
                Constraint::Length(1),
                Constraint::Length(VISIBLE_TEXT_LINES as u16),
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        header(&snapshot).render(chunks[1], buf);

        let live = &snapshot.live;
        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {} errors",
                live.wpm, live.accuracy, live.errors
            ),
            dim_bold(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        Paragraph::new(text_window(&snapshot, text_width)).render(chunks[5], buf);

        let legend = match snapshot.phase {
            Phase::Idle => "(←/→) duration / (tab) new words / (esc)ape",
            _ => "(tab) restart / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic())).render(chunks[7], buf);
    }
}

fn header(snapshot: &Snapshot) -> Paragraph<'static> {
    let line = match snapshot.phase {
        Phase::Idle => Line::from(
            TestDuration::ALL
                .iter()
                .flat_map(|d| {
                    let style = if *d == snapshot.duration {
                        bold().fg(Color::Yellow)
                    } else {
                        dim_bold()
                    };
                    [Span::styled(d.to_string(), style), Span::raw("   ")]
                })
                .collect::<Vec<_>>(),
        ),
        _ => Line::from(Span::styled(
            snapshot.remaining_secs.to_string(),
            bold().fg(Color::Yellow),
        )),
    };
    Paragraph::new(line).alignment(Alignment::Center)
}

/// Characters to draw, styled by classification, with the cursor slot underlined.
fn styled_chars(snapshot: &Snapshot) -> Vec<(char, Style)> {
    let green = bold().fg(Color::Green);
    let red = bold().fg(Color::Red);

    let mut out: Vec<(char, Style)> = snapshot
        .states
        .iter()
        .enumerate()
        .map(|(idx, state)| {
            let expected = snapshot.target.get(idx).copied().unwrap_or(' ');
            match state {
                CharState::Correct => (expected, green),
                CharState::Incorrect => (if expected == ' ' { '·' } else { expected }, red),
                CharState::Extra => (
                    snapshot.typed.get(idx).copied().unwrap_or(' '),
                    red.add_modifier(Modifier::CROSSED_OUT),
                ),
                CharState::Unreached => (expected, dim_bold()),
            }
        })
        .collect();

    if snapshot.cursor >= out.len() {
        out.push((' ', dim_bold()));
    }
    if let Some(slot) = out.get_mut(snapshot.cursor) {
        slot.1 = slot.1.add_modifier(Modifier::UNDERLINED);
    }
    out
}

/// Greedy word wrap over display columns. A word wider than a line is split.
pub fn wrap_lines(chars: &[char], width: usize) -> Vec<Range<usize>> {
    let col_width = |c: &char| c.width().unwrap_or(0);
    if width == 0 || chars.is_empty() {
        return vec![0..chars.len()];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    let mut col = 0;
    let mut last_break = None;

    for (idx, c) in chars.iter().enumerate() {
        let w = col_width(c);
        if col + w > width && idx > start {
            let end = match last_break {
                Some(b) if b > start && b <= idx => b,
                _ => idx,
            };
            lines.push(start..end);
            start = end;
            col = chars[start..idx].iter().map(col_width).sum();
            last_break = None;
        }
        col += w;
        if *c == ' ' {
            last_break = Some(idx + 1);
        }
    }
    lines.push(start..chars.len());
    lines
}

/// The few wrapped lines around the cursor.
fn text_window(snapshot: &Snapshot, width: usize) -> Vec<Line<'static>> {
    let styled = styled_chars(snapshot);
    let chars: Vec<char> = styled.iter().map(|(c, _)| *c).collect();
    let lines = wrap_lines(&chars, width);

    let cursor_line = lines
        .iter()
        .position(|r| r.contains(&snapshot.cursor))
        .unwrap_or(lines.len().saturating_sub(1));
    let first = cursor_line.saturating_sub(1);

    lines
        .into_iter()
        .skip(first)
        .take(VISIBLE_TEXT_LINES)
        .map(|range| {
            Line::from(
                styled[range]
                    .iter()
                    .map(|(c, style)| Span::styled(c.to_string(), *style))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

/// Results screen: wpm over time plus the final numbers.
pub struct ResultsView<'a>(pub &'a App);

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.0;
        let Some(result) = app.last_result else {
            return;
        };
        let stats = result.stats;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),    // chart
                Constraint::Length(1), // stats
                Constraint::Length(1), // characters
                Constraint::Length(1), // personal best
                Constraint::Length(1),
                Constraint::Length(1), // legend
            ])
            .split(area);

        let tuples = app.controller.history().as_tuples();
        let (overall_duration, highest_wpm) =
            charting::compute_chart_params(&tuples, f64::from(result.duration.secs()));

        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&tuples)];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([0.0, overall_duration])
                    .labels(vec![
                        Span::styled("0", bold()),
                        Span::styled(charting::format_label(overall_duration), bold()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("wpm")
                    .bounds([0.0, highest_wpm])
                    .labels(vec![
                        Span::styled("0", bold()),
                        Span::styled(charting::format_label(highest_wpm), bold()),
                    ]),
            )
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {} raw   {}% acc   {}% consistency   {} errors",
                stats.wpm, stats.raw_wpm, stats.accuracy, stats.consistency, stats.errors
            ),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!(
                "characters {}/{}/{} (correct/incorrect/total)   {}",
                stats.correct_chars, stats.incorrect_chars, stats.total_chars, result.duration
            ),
            dim_bold(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        if app.new_best {
            Paragraph::new(Span::styled(
                "new personal best!",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled("(r)etry / (l)eaderboard / (esc)ape", italic()))
            .render(chunks[5], buf);
    }
}
