mod ui;

use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keysprint::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::{CompletedTest, Controller},
    feedback::{KeystrokeFeedback, Silent, TerminalBell},
    language::Language,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Key, Runner, SystemClock},
    session::{Phase, SessionConfig, TargetText, TestDuration},
    store::{LeaderboardEntry, ResultsDb, UserToken, DEFAULT_LEADERBOARD_LIMIT},
    word_generator::{FixedText, TextSource, WordGenerator},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

const TICK_RATE_MS: u64 = 100;

/// timed typing benchmark with live stats, consistency scoring, and a local leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// test length in seconds: 15, 30 or 60
    #[clap(short = 'd', long)]
    duration: Option<TestDuration>,

    /// number of words to generate for each test
    #[clap(short = 'w', long = "words")]
    word_count: Option<usize>,

    /// custom prompt to type instead of random words
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// name to record results under (defaults to $USER)
    #[clap(short = 'u', long)]
    user: Option<String>,

    /// disable the bell on mistyped characters
    #[clap(long)]
    mute: bool,

    /// print the leaderboard for the selected duration and exit
    #[clap(long)]
    leaderboard: bool,
}

impl Cli {
    /// CLI flags win over the stored config.
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(words) = self.word_count {
            config.word_count = words;
        }
        if self.user.is_some() {
            config.user = self.user.clone();
        }
        if self.mute {
            config.sound = false;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Typing,
    Results,
    Leaderboard,
}

#[derive(Debug)]
pub struct App {
    pub controller: Controller,
    pub state: AppState,
    pub last_result: Option<CompletedTest>,
    pub new_best: bool,
    pub leaderboard_duration: TestDuration,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub user: UserToken,
    store: Option<ResultsDb>,
    config: Config,
    config_store: Option<FileConfigStore>,
}

impl App {
    pub fn new(
        controller: Controller,
        user: UserToken,
        store: Option<ResultsDb>,
        config: Config,
        config_store: Option<FileConfigStore>,
    ) -> Self {
        Self {
            leaderboard_duration: controller.duration(),
            controller,
            state: AppState::Typing,
            last_result: None,
            new_best: false,
            leaderboard: Vec::new(),
            user,
            store,
            config,
            config_store,
        }
    }

    /// Returns true when the app should exit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.state {
            AppState::Typing => match key.code {
                KeyCode::Esc => return true,
                KeyCode::Tab => self.controller.reset(None),
                KeyCode::Left if self.controller.phase() == Phase::Idle => {
                    self.change_duration(self.controller.duration().prev())
                }
                KeyCode::Right if self.controller.phase() == Phase::Idle => {
                    self.change_duration(self.controller.duration().next())
                }
                _ => {
                    self.controller.on_key(Key::from(&key));
                }
            },
            AppState::Results => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return true,
                KeyCode::Char('r') | KeyCode::Tab => self.new_test(),
                KeyCode::Char('l') => self.show_leaderboard(self.controller.duration()),
                _ => {}
            },
            AppState::Leaderboard => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return true,
                KeyCode::Char('r') | KeyCode::Tab => self.new_test(),
                KeyCode::Char('b') | KeyCode::Backspace => {
                    self.state = if self.last_result.is_some() {
                        AppState::Results
                    } else {
                        AppState::Typing
                    };
                }
                KeyCode::Left => self.show_leaderboard(self.leaderboard_duration.prev()),
                KeyCode::Right => self.show_leaderboard(self.leaderboard_duration.next()),
                _ => {}
            },
        }

        false
    }

    pub fn on_tick(&mut self) {
        if let Some(done) = self.controller.poll() {
            self.complete(done);
        }
    }

    fn complete(&mut self, done: CompletedTest) {
        self.new_best = match self.store.as_mut() {
            Some(store) => store.save_result(&self.user, &done).unwrap_or_else(|err| {
                log::warn!("could not save result: {err}");
                false
            }),
            None => false,
        };
        self.last_result = Some(done);
        self.state = AppState::Results;
    }

    fn new_test(&mut self) {
        self.controller.reset(None);
        self.last_result = None;
        self.new_best = false;
        self.state = AppState::Typing;
    }

    fn change_duration(&mut self, duration: TestDuration) {
        self.controller.reset(Some(duration));
        self.config.duration = duration;
        if let Some(store) = &self.config_store {
            if let Err(err) = store.save(&self.config) {
                log::warn!("could not save config: {err}");
            }
        }
    }

    fn show_leaderboard(&mut self, duration: TestDuration) {
        self.leaderboard_duration = duration;
        self.leaderboard = match &self.store {
            Some(store) => store
                .leaderboard(duration, DEFAULT_LEADERBOARD_LIMIT)
                .unwrap_or_else(|err| {
                    log::warn!("could not load leaderboard: {err}");
                    Vec::new()
                }),
            None => Vec::new(),
        };
        self.state = AppState::Leaderboard;
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = File::options().create(true).append(true).open(&path) else {
        return;
    };

    let _ = env_logger::Builder::from_env(
        env_logger::Env::new().filter_or("KEYSPRINT_LOG", "warn"),
    )
    .target(env_logger::Target::Pipe(Box::new(file)))
    .try_init();
}

fn open_store() -> Option<ResultsDb> {
    let path = AppDirs::db_path()?;
    ResultsDb::open(&path)
        .map_err(|err| log::warn!("results store unavailable at {}: {err}", path.display()))
        .ok()
}

fn print_leaderboard(store: Option<&ResultsDb>, duration: TestDuration) -> Result<(), Box<dyn Error>> {
    let entries = match store {
        Some(store) => store.leaderboard(duration, DEFAULT_LEADERBOARD_LIMIT)?,
        None => Vec::new(),
    };

    println!("leaderboard ({duration})");
    if entries.is_empty() {
        println!("no results yet");
    }
    for entry in entries {
        println!(
            "{:>3}. {:<20} {:>4} wpm {:>4}% acc  {}",
            entry.rank,
            entry.user,
            entry.wpm,
            entry.accuracy,
            entry.date.format("%Y-%m-%d")
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    let config_store = FileConfigStore::new();
    let config = cli.merge_into(config_store.load());
    let user = config
        .user
        .clone()
        .map(UserToken::new)
        .unwrap_or_else(UserToken::from_env);
    let store = open_store();

    if cli.leaderboard {
        return print_leaderboard(store.as_ref(), config.duration);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let source: Box<dyn TextSource> = match cli.prompt.as_deref().map(TargetText::new) {
        Some(Ok(text)) => Box::new(FixedText::new(text)),
        Some(Err(err)) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err).exit();
        }
        None => Box::new(WordGenerator::from_entropy(Language::english())),
    };
    let feedback: Box<dyn KeystrokeFeedback> = if config.sound {
        Box::new(TerminalBell::stdout())
    } else {
        Box::new(Silent)
    };
    let controller = Controller::new(SessionConfig::from(&config), source, Box::new(SystemClock))
        .with_feedback(feedback);

    let mut app = App::new(controller, user, store, config, Some(config_store));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        if let AppEvent::Key(key) = runner.step() {
            if app.on_key(key) {
                break;
            }
        }
        // after the key, so one landing on the final second still counts
        app.on_tick();
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keysprint::runtime::ManualClock;

    fn test_app(text: &str, duration: TestDuration) -> (App, ManualClock) {
        let clock = ManualClock::new();
        let controller = Controller::new(
            SessionConfig {
                duration,
                word_count: 3,
            },
            Box::new(FixedText::new(TargetText::new(text).unwrap())),
            Box::new(clock.clone()),
        );
        let app = App::new(
            controller,
            UserToken::new("tester"),
            Some(ResultsDb::open_in_memory().unwrap()),
            Config::default(),
            None,
        );
        (app, clock)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["keysprint", "-d", "60", "--words", "20", "--mute"]);
        let merged = cli.merge_into(Config::default());
        assert_eq!(merged.duration, TestDuration::Sixty);
        assert_eq!(merged.word_count, 20);
        assert!(!merged.sound);
    }

    #[test]
    fn test_cli_rejects_unknown_duration() {
        assert!(Cli::try_parse_from(["keysprint", "-d", "45"]).is_err());
    }

    #[test]
    fn test_duration_keys_only_while_idle() {
        let (mut app, _) = test_app("cat dog", TestDuration::Thirty);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.controller.duration(), TestDuration::Sixty);

        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.controller.duration(), TestDuration::Sixty);
        assert_eq!(app.controller.phase(), Phase::Running);
    }

    #[test]
    fn test_finished_test_is_saved_and_shown() {
        let (mut app, clock) = test_app("cat dog", TestDuration::Fifteen);
        for c in "cat".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        clock.advance_secs(15);
        app.on_tick();

        assert_eq!(app.state, AppState::Results);
        assert!(app.new_best);
        assert_eq!(app.last_result.map(|r| r.stats.correct_chars), Some(3));

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.state, AppState::Leaderboard);
        assert_eq!(app.leaderboard.len(), 1);
        assert_eq!(app.leaderboard[0].user, "tester");

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.state, AppState::Typing);
        assert_eq!(app.controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_late_key_finishes_test_on_next_tick() {
        let (mut app, clock) = test_app("cat dog", TestDuration::Fifteen);
        press(&mut app, KeyCode::Char('c'));
        clock.advance_secs(20);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::Typing);

        app.on_tick();
        assert_eq!(app.state, AppState::Results);
        assert_eq!(app.last_result.map(|r| r.stats.correct_chars), Some(1));
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _) = test_app("cat", TestDuration::Fifteen);
        assert!(app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(press(&mut app, KeyCode::Esc));
    }
}
