mod app;
mod layout;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use livemark_config::{Config, LoggingConfig};
use livemark_engine::{overlay::OverlayOptions, view::EditorOptions};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, Stdout, stdout},
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

use app::App;

const IDLE_POLL: Duration = Duration::from_millis(250);

/// Overlay distances in terminal cells; config file keys override them.
fn terminal_options() -> EditorOptions {
    EditorOptions {
        overlay: OverlayOptions {
            margin_tolerance: 0.0,
            edge_threshold: 2.0,
            max_scroll_speed: 1.0,
            tick_interval_ms: 60,
            handle_width: 2.0,
            handle_height: 1.0,
            drag_threshold: 1.0,
        },
        ..EditorOptions::default()
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let file = logging.resolved_file();
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    let target = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&file)
        .with_context(|| format!("Failed to open log file {}", file.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&logging.level))
        .target(env_logger::Target::Pipe(Box::new(target)))
        .init();
    Ok(())
}

fn read_document(path: &Path) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8(bytes)
            .with_context(|| format!("{} is not valid UTF-8", path.display())),
        // A missing file is a new document, created on first save.
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file.md>", args[0]);
        process::exit(1);
    }
    let path = PathBuf::from(&args[1]);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Config file location: {}", Config::config_path().display());
            process::exit(1);
        }
    };
    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&logging)?;
    let options = config
        .as_ref()
        .map_or_else(terminal_options, |c| c.editor_options(terminal_options()));

    log::info!("livemark starting on {}", path.display());
    let text = read_document(&path)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(path, &text, options);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.resize(ui::editor_area(Rect::new(0, 0, size.width, size.height)))?;
        terminal.draw(|f| ui::draw(f, app))?;
        if app.quit {
            return Ok(());
        }

        let timeout = app
            .next_deadline()
            .map_or(IDLE_POLL, |due| due.saturating_duration_since(Instant::now()));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => app.on_key(key)?,
                Event::Mouse(mouse) => app.on_mouse(mouse)?,
                Event::FocusLost => app.on_blur()?,
                Event::FocusGained => app.on_focus(),
                _ => {}
            }
        }
        app.on_tick(Instant::now())?;
    }
}
