mod app;
mod config;
mod event;
mod generator;
mod mode;
mod session;
mod theme;
mod ui;
mod words;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use app::App;
use config::Config;
use event::{AppEvent, EventHandler};
use mode::Mode;
use theme::Theme;

#[derive(Parser)]
#[command(name = "klack", version, about = "Terminal typing practice")]
struct Cli {
    #[arg(short, long, help = "Starting mode (words, quote, timed, death, drill)")]
    mode: Option<String>,

    #[arg(short, long, help = "Words per session in word mode")]
    words: Option<usize>,

    #[arg(short, long, help = "Duration of a timed session in seconds")]
    seconds: Option<u64>,

    #[arg(short, long, help = "Drill difficulty (easy, medium, hard)")]
    difficulty: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Skip the background word list refresh")]
    offline: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(words) = cli.words {
        config.word_count = words;
    }
    if let Some(seconds) = cli.seconds {
        config.timed_seconds = seconds;
    }
    if let Some(ref difficulty) = cli.difficulty {
        config.difficulty = difficulty.clone();
    }
    if let Some(ref theme) = cli.theme {
        config.theme = theme.clone();
    }
    if cli.offline {
        config.fetch_words = false;
    }

    let theme = Theme::load(&config.theme).unwrap_or_default();
    let mut app = App::new(config, theme);
    if let Some(mode) = parse_mode(&cli, &app) {
        app.select_mode(mode);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn parse_mode(cli: &Cli, app: &App) -> Option<Mode> {
    match cli.mode.as_deref()? {
        "quote" => Some(Mode::Quote),
        "timed" => Some(Mode::Timed {
            seconds: app.config.timed_seconds,
        }),
        "death" => Some(Mode::SuddenDeath),
        "drill" => Some(Mode::Drill {
            difficulty: app.config.resolved_difficulty(),
        }),
        // "words" restates the default; anything unknown falls back too.
        _ => None,
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.on_key(key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
