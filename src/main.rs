//! devtab — a curate-able "new tab" dashboard for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//! │  poll.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread) │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └────┬─────┘          └──────────┘
//!      ▲                       │ dispatch(Action)
//!      │ build_sources()  ┌────▼─────┐  notify  ┌──────────┐
//!      └───────────────── │  prefs   │ ───────► │ persist  │
//!                         │ (store)  │          │ (JSON)   │
//!                         └──────────┘          └──────────┘
//! ```
//!
//! * **`prefs/`** — the preference store: card list, reconciler, reducer,
//!   persistence, import/export.
//! * **`catalog`** — the built-in source catalog.
//! * **`source/`** — the `DataSource` trait and concrete card sources.
//! * **`poll`** — background thread that fetches sources on a timer.
//! * **`app`** — owns all runtime state (items, focus, mode, status).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together and runs the event loop;
//!   `devtab import/export <file>` run headless against the same store.

mod app;
mod catalog;
mod input;
mod poll;
mod prefs;
mod source;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use prefs::persist::{self, PrefStorage};
use prefs::store::Store;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.  This prevents the common TUI bug where a panic leaves the
/// terminal in a broken state.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.  Without this, a panic inside the event loop would leave
/// raw mode enabled and the alternate screen active.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Headless commands
// ---------------------------------------------------------------------------

fn default_export_path() -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y-%m-%d");
    PathBuf::from(format!("devtab-settings-{stamp}.json"))
}

/// `devtab export [path]` — write the full settings document.
fn cli_export(path: Option<String>) -> Result<()> {
    let storage = PrefStorage::default_location()?;
    let prefs = storage
        .load()
        .with_context(|| format!("reading {}", storage.path().display()))?;

    let path = path.map(PathBuf::from).unwrap_or_else(default_export_path);
    persist::export_to_file(&prefs, &path)
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Exported settings to {}", path.display());
    Ok(())
}

/// `devtab import <path>` — apply a settings document field by field.
fn cli_import(path: Option<String>) -> Result<()> {
    let Some(path) = path.map(PathBuf::from) else {
        bail!("usage: devtab import <file.json>");
    };

    let doc = persist::import_from_file(&path)
        .with_context(|| format!("importing {}", path.display()))?;

    let storage = PrefStorage::default_location()?;
    let mut store = Store::new(storage.load().unwrap_or_default());
    persist::apply_import(&mut store, doc);
    storage.save(store.state())?;

    println!("Settings imported successfully!");
    Ok(())
}

fn print_usage() {
    println!("devtab: a curate-able news dashboard for the terminal");
    println!();
    println!("Usage:");
    println!("  devtab                 run the dashboard");
    println!("  devtab export [file]   export all settings to a JSON file");
    println!("  devtab import <file>   import settings from a JSON file");
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    install_panic_hook();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("export") => return cli_export(args.next()),
        Some("import") => return cli_import(args.next()),
        Some("--help" | "-h" | "help") => {
            print_usage();
            return Ok(());
        }
        Some(other) => bail!("unknown command {other:?} (try --help)"),
        None => {}
    }

    run_dashboard()
}

fn run_dashboard() -> Result<()> {
    // -- load preferences ----------------------------------------------------
    let storage = PrefStorage::default_location()?;
    let (prefs, load_note) = match storage.load() {
        Ok(prefs) => (prefs, None),
        // Corrupt state falls back to defaults; the file is left in place
        // until the next save overwrites it.
        Err(e) => (Default::default(), Some(format!("Preferences reset: {e}"))),
    };

    // -- store + persistence adapter -----------------------------------------
    // Persistence is fire-and-forget on every mutation: the adapter
    // subscribes to the store and writes the new state; a failed write only
    // surfaces on the next explicit export.
    let mut store = Store::new(prefs);
    let sink = storage.clone();
    store.subscribe(move |state| {
        let _ = sink.save(state);
    });

    let mut app = App::new(store);
    if let Some(note) = load_note {
        app.status = note;
    }

    // -- start background polling --------------------------------------------
    let mut rx = poll::spawn(source::build_sources(app.store.state()));

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the poller.
    //   2. Rebuild the poller if the card membership changed.
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Process poll messages
        while let Ok(msg) = rx.try_recv() {
            app.apply_poll(msg);
        }

        // 2. Swap source sets after a membership change.  Dropping the old
        //    receiver is the shutdown signal for the old poller thread.
        if app.take_sources_dirty() {
            rx = poll::spawn(source::build_sources(app.store.state()));
        }

        // 3. Render
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 4. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
