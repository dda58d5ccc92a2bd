use keysprint::store::LeaderboardEntry;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::{
    ui::{ResultsView, TypingView},
    App, AppState,
};

/// A UI Screen boundary: one per [`AppState`].
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(TypingView(app), f.area());
    }
}

pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(ResultsView(app), f.area());
    }
}

/// Best result per user for one duration.
pub struct LeaderboardScreen;

impl Screen for LeaderboardScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(5)
            .vertical_margin(1)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(f.area());

        render_leaderboard(app, f, chunks[0]);

        let legend = Paragraph::new(Span::styled(
            "(←/→) duration / (b)ack / (r)etry / (esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        ));
        f.render_widget(legend, chunks[1]);
    }
}

fn leaderboard_row(entry: &LeaderboardEntry, me: &str) -> Row<'static> {
    let style = if entry.user == me {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Row::new(vec![
        entry.rank.to_string(),
        entry.user.clone(),
        entry.wpm.to_string(),
        format!("{}%", entry.accuracy),
        entry.date.format("%Y-%m-%d").to_string(),
    ])
    .style(style)
}

fn render_leaderboard(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" leaderboard ({}) ", app.leaderboard_duration));

    if app.leaderboard.is_empty() {
        let empty = Paragraph::new("no results yet").block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .leaderboard
        .iter()
        .map(|entry| leaderboard_row(entry, app.user.as_str()))
        .collect();

    let header = Row::new(vec!["#", "user", "wpm", "acc", "date"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Typing => Box::new(TypingScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::Leaderboard => Box::new(LeaderboardScreen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use keysprint::{
        config::Config,
        controller::Controller,
        runtime::ManualClock,
        session::{SessionConfig, TargetText},
        store::UserToken,
        word_generator::FixedText,
        TestDuration,
    };
    use ratatui::{backend::TestBackend, Terminal};

    fn app_in(state: AppState) -> App {
        let controller = Controller::new(
            SessionConfig::default(),
            Box::new(FixedText::new(TargetText::new("cat").unwrap())),
            Box::new(ManualClock::new()),
        );
        let mut app = App::new(controller, UserToken::new("ada"), None, Config::default(), None);
        app.state = state;
        app
    }

    fn draw_to_string(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| crate::ui::draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_leaderboard() {
        let app = app_in(AppState::Leaderboard);
        let out = draw_to_string(&app);
        assert!(out.contains("leaderboard (30s)"));
        assert!(out.contains("no results yet"));
    }

    #[test]
    fn test_leaderboard_rows() {
        let mut app = app_in(AppState::Leaderboard);
        app.leaderboard_duration = TestDuration::Sixty;
        app.leaderboard = vec![
            LeaderboardEntry {
                rank: 1,
                user: "grace".into(),
                wpm: 112,
                accuracy: 98,
                date: Local::now(),
            },
            LeaderboardEntry {
                rank: 2,
                user: "ada".into(),
                wpm: 87,
                accuracy: 95,
                date: Local::now(),
            },
        ];

        let out = draw_to_string(&app);
        assert!(out.contains("leaderboard (60s)"));
        assert!(out.contains("grace"));
        assert!(out.contains("112"));
        assert!(out.contains("95%"));
    }

    #[test]
    fn test_current_screen_matches_state() {
        let app = app_in(AppState::Typing);
        assert!(draw_to_string(&app).contains("30s"));
    }
}
