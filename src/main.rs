mod app;
mod config;
mod engine;
mod error;
mod letter;
mod logging;
mod media;
mod models;
mod prefs;
mod scene;
mod ui;
pub mod utils;

use anyhow::Result;
use app::App;
use clap::{ArgAction, Parser};
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use engine::{Stage, SystemClock};
use letter::source::EMBEDDED_LETTER;
use letter::{ContentSource, EmbeddedSource, FileSource, Letter, SpeedFactor};
use media::{MediaTransport, SilentTransport, WavTransport};
use models::SegmenterKind;
use prefs::JsonPreferences;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(name = "wishletter")]
#[command(version)]
#[command(about = "A birthday letter, read aloud one line at a time", long_about = None)]
// disable the default flags so they can be customized below
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(help_template = "\
{name} {version}
{about-section}
{usage-heading} {usage}

{all-args}
")]
struct Cli {
    /// Letter to read: a text file path (defaults to the bundled letter)
    #[arg(short, long)]
    letter: Option<PathBuf>,

    /// Reading speed factor, 0.6 (slow) to 1.4 (fast)
    #[arg(short, long)]
    speed: Option<f64>,

    /// Sentence splitting strategy
    #[arg(long, value_enum)]
    segmenter: Option<SegmenterKind>,

    /// WAV file to loop as background music
    #[arg(short, long)]
    music: Option<PathBuf>,

    /// Start paused instead of advancing on its own
    #[arg(long, default_value_t = false, help_heading = "Flags")]
    no_autoplay: bool,

    /// Print the sentence sequence with its timing and exit
    #[arg(long, default_value_t = false, help_heading = "Flags")]
    print: bool,

    /// Print help
    #[arg(short, long, action = ArgAction::Help, help_heading = "Flags")]
    help: Option<bool>,

    /// Print version
    #[arg(short = 'V', long, action = ArgAction::Version, help_heading = "Flags")]
    version: Option<bool>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_guard = logging::init();

    let app_config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config, using defaults. Error: {}",
            e
        );
        warn!(error = %e, "config load failed");
        AppConfig::default()
    });

    let segmenter = cli.segmenter.unwrap_or(app_config.playback.segmenter);
    let (source, location): (Box<dyn ContentSource>, String) = match &cli.letter {
        Some(path) => (Box::new(FileSource), path.display().to_string()),
        None => (Box::new(EmbeddedSource), EMBEDDED_LETTER.to_string()),
    };

    let letter = match Letter::load(source.as_ref(), &location, segmenter) {
        Ok(letter) => letter,
        Err(e) => {
            error!(error = %e, "letter unavailable");
            eprintln!("{}", e.unavailable_message());
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let mut preferences = JsonPreferences::open_default();
    let speed = match cli.speed {
        Some(value) => {
            let speed = SpeedFactor::new(value);
            prefs::store_speed(&mut preferences, speed);
            speed
        }
        None => prefs::load_speed(&preferences),
    };

    if cli.print {
        print_sequence(&letter, speed);
        return Ok(());
    }

    let media = open_media(cli.music.or(app_config.playback.music));
    let autoplay = app_config.playback.autoplay && !cli.no_autoplay;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        Stage::new(letter, speed),
        app_config.theme,
        media,
        Box::new(preferences),
        Box::new(SystemClock::new()),
        app_config.playback.volume,
    );

    let res = run_app(&mut terminal, &mut app, autoplay);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn open_media(music: Option<PathBuf>) -> Box<dyn MediaTransport> {
    let Some(path) = music else {
        return Box::new(SilentTransport::new());
    };
    match WavTransport::open(&path) {
        Ok(transport) => Box::new(transport),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "music unavailable, continuing silently");
            Box::new(SilentTransport::new())
        }
    }
}

fn print_sequence(letter: &Letter, speed: SpeedFactor) {
    let mut total = 0;
    for (i, sentence) in letter.sentences().iter().enumerate() {
        let delay = crate::letter::timing::delay(sentence, speed);
        total += delay;
        println!("{:>3}  {:>5.1}s  {}", i + 1, delay as f64 / 1000.0, sentence);
    }
    println!(
        "{} sentences, {:.1}s at {}",
        letter.sentences().len(),
        total as f64 / 1000.0,
        speed
    );
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    autoplay: bool,
) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);
    app.start(autoplay);

    loop {
        terminal.draw(|f| ui::render(f, app))?;
        app.tick();

        if event::poll(std::time::Duration::from_millis(16))? {
            let ev = event::read()?;
            match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        app.on_key(key);
                    }
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(_) = mouse.kind {
                        app.on_mouse(mouse.column, mouse.row);
                    }
                }
                Event::Resize(w, h) => {
                    app.resize(w, h);
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
