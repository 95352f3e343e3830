mod app;
mod config;
mod engine;
mod event;
mod keys;
mod models;
mod round;
mod scheduler;
mod ui;
mod words;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use app::App;
use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser};
use config::AppConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use event::{AppEvent, EventHandler};
use keys::NullInjector;
use models::Mode;
use ratatui::{backend::CrosstermBackend, Terminal};

#[derive(Parser, Debug)]
#[command(name = "ketting")]
#[command(version)]
#[command(about = "A terminal helper overlay for word-chaining typing games", long_about = None)]
// disable the default flags so i can customize them manually below
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "\
{name} {version}
{about-section}
{usage-heading} {usage}

{all-args}
")]
struct Cli {
    /// Wordlist file, one word per line (defaults to the embedded english list)
    #[arg(short, long)]
    wordlist: Option<PathBuf>,

    /// Number of suggestions to show (1 to 10)
    #[arg(short, long, default_value_t = 5, value_parser = RangedU64ValueParser::<u64>::new().range(1..=10))]
    count: u64,

    /// Panic trigger key (wordbomb mode)
    #[arg(short, long, default_value_t = '=')]
    panic_key: char,

    // explicitly move these to a "Flags" heading
    /// WordBomb mode: match the typed fragment anywhere, enable Tab
    /// autocomplete and the panic key
    #[arg(short, long, default_value_t = false, help_heading = "Flags")]
    bomb: bool,

    /// Print help
    #[arg(short, long, action = ArgAction::Help, help_heading = "Flags")]
    help: Option<bool>,

    /// Print version
    #[arg(short = 'V', long, action = ArgAction::Version, help_heading = "Flags")]
    version: Option<bool>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let app_config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config, using defaults. Error: {}",
            e
        );
        AppConfig::default()
    });

    let word_pool = words::load_words(cli.wordlist.as_deref())?;
    let mode = if cli.bomb { Mode::Bomb } else { Mode::Chain };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        mode,
        word_pool,
        cli.count as usize,
        cli.panic_key,
        app_config.theme,
        app_config.timing,
        Box::new(NullInjector),
    );
    let events = EventHandler::new(Duration::from_millis(16), cli.panic_key, cli.bomb);

    let res = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        let snapshot = app.snapshot();
        terminal.draw(|f| ui::render(f, &snapshot, &app.theme))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key, Instant::now()),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
