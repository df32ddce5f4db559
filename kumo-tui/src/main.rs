//! Kumo TUI - Ichimoku chart in the terminal.
//!
//! Usage: `kumo-tui [BARS.csv]`. Without a file a synthetic series is shown.

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use kumo_core::cloud::CloudStyle;
use kumo_core::data::{generate_synthetic_bars, load_csv, symbol_seed};
use kumo_core::domain::Bar;
use kumo_core::indicators::IchimokuParams;
use kumo_tui::{handle_key_event, persistence, ui, App, Theme};

const SYNTHETIC_SYMBOL: &str = "SYNTH";
const SYNTHETIC_BARS: usize = 400;

fn main() -> Result<()> {
    // Restore the terminal before printing a panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kumo")
        .join("view.json");
    let persisted = persistence::load(&state_path);

    let (symbol, bars) = match std::env::args_os().nth(1) {
        Some(path) => load_bars(Path::new(&path))?,
        None => (SYNTHETIC_SYMBOL.to_string(), synthetic_bars()?),
    };

    let mut app = App::new(symbol, bars, IchimokuParams::default(), CloudStyle::default())?;
    persistence::apply(&mut app, persisted);
    let theme = Theme::default();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &theme);

    let _ = persistence::save(&state_path, &persistence::extract(&app));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app, theme))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(app, key);
                }
            }
        }
    }
    Ok(())
}

fn load_bars(path: &Path) -> Result<(String, Vec<Bar>)> {
    let bars = load_csv(path).with_context(|| format!("loading {}", path.display()))?;
    let symbol = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((symbol, bars))
}

fn synthetic_bars() -> Result<Vec<Bar>> {
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).context("invalid start date")?;
    Ok(generate_synthetic_bars(
        start,
        SYNTHETIC_BARS,
        symbol_seed(SYNTHETIC_SYMBOL),
    ))
}
