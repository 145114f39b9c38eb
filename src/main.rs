//! # dotdash CLI Entry Point
//!
//! Terminal dashboard for a dotfiles backend: view and edit config files,
//! browse Homebrew package lists and inspect each file's commit history.
//!
//! ## Usage
//!
//! ```bash
//! # Connect to the default backend (http://127.0.0.1:8765)
//! dotdash
//!
//! # Another backend and theme for this session
//! dotdash --server http://nas.local:8765 --theme Nord
//!
//! # Print the page projection and exit, optionally with a config selected
//! dotdash --dump --config zshrc
//! ```
//!
//! ## Key Bindings
//!
//! ### Sidebar
//! - `j` / `k` / arrows - Move selection
//! - `Enter` - Open config or package list
//! - `e` / `v` - Edit / view mode
//! - `h` - Commit history of the open config
//! - `d` - Download the open config
//! - `r` - Reload
//! - `/` - Search the package list
//! - `q` - Quit
//!
//! ### Editor
//! - `Ctrl+S` - Save
//! - `Ctrl+D` - Discard changes
//! - `Tab` - Back to the sidebar
//! - `Esc` - Leave edit mode
//!
//! ## Logging
//!
//! Logs go to a daily file under the platform data directory. The level is
//! read from `DOTDASH_LOG` (default `info`).

use dotdash::api::{ApiClient, HttpTransport, Transport};
use dotdash::ui::screen::TICK;
use dotdash::ui::{self, Controller, CrosstermEventReader, Document, FixedAnswer, Screen, Settings};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Instant;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// dotdash - a terminal dashboard for your dotfiles
#[derive(Parser, Debug)]
#[command(name = "dotdash")]
#[command(author = "Luckystrike561")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "View and edit dotfiles, browse packages and file history", long_about = None)]
struct Args {
    /// Base URL of the dashboard backend
    #[arg(short, long, value_name = "URL")]
    server: Option<String>,

    /// Theme name for this session
    #[arg(short, long, value_name = "NAME")]
    theme: Option<String>,

    /// Print the page projection and exit
    #[arg(long)]
    dump: bool,

    /// Config to select before dumping
    #[arg(short, long, value_name = "ID", requires = "dump")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging();

    // Restore the terminal before the panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_application(args).await;

    let _ = panic::take_hook();

    result
}

/// Install the file logger. Logging is skipped when no data directory
/// can be resolved.
fn init_logging() -> Option<WorkerGuard> {
    let dir = Settings::log_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "dotdash.log"));

    let filter = EnvFilter::try_from_env("DOTDASH_LOG")
        .or_else(|_| EnvFilter::try_new("info"))
        .ok()?;
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .ok()?;
    Some(guard)
}

/// Apply command-line overrides on top of the stored settings.
fn effective_settings(args: &Args, mut settings: Settings) -> Settings {
    if let Some(server) = &args.server {
        settings.server.clone_from(server);
    }
    if let Some(theme) = &args.theme {
        settings.theme.clone_from(theme);
    }
    settings
}

async fn run_application(args: Args) -> Result<()> {
    let settings = effective_settings(&args, Settings::load());
    tracing::info!(server = %settings.server, "starting");

    let client = ApiClient::new(HttpTransport::new(&settings.server));
    let download_dir = settings.resolved_download_dir();

    if args.dump {
        let markup = dump(client, download_dir, args.config.as_deref()).await?;
        print!("{markup}");
        return Ok(());
    }

    enable_raw_mode().context("Failed to enable raw mode for terminal")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;

    let screen = Screen::new(terminal, Box::new(CrosstermEventReader), settings.theme());
    let mut controller = Controller::new(client, screen, download_dir);

    let run_result = run_app(&mut controller).await;

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(controller.prompter.terminal_mut());

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Initialise headlessly and return the page markup.
async fn dump<T: Transport>(
    client: ApiClient<T>,
    download_dir: PathBuf,
    config: Option<&str>,
) -> Result<String> {
    let mut controller = Controller::new(client, FixedAnswer(true), download_dir);
    if !controller.init().await {
        bail!("Failed to load data from the dashboard backend");
    }
    if let Some(id) = config {
        if !controller.select_config(id).await {
            bail!("Failed to load config '{id}'");
        }
    }
    Ok(Document::project_now(&controller.state).to_markup())
}

async fn run_app<T: Transport, B: Backend>(
    controller: &mut Controller<T, Screen<B>>,
) -> Result<()> {
    controller.init().await;

    while !controller.state.should_quit {
        controller.state.expire_notification(Instant::now());
        controller.prompter.draw(&controller.state)?;

        let Some(event) = controller.prompter.next_event(TICK)? else {
            continue;
        };
        if let Event::Key(key) = event {
            if let Some(command) = ui::map_key(&controller.state, key) {
                controller.dispatch(command).await;
            }
        }
    }

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use dotdash::api::RawResponse;
    use dotdash::ui::theme::Theme;
    use dotdash::ui::EventReader;
    use ratatui::backend::TestBackend;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Answers every request with an empty JSON list.
    struct EmptyBackend;

    impl Transport for EmptyBackend {
        async fn get(&self, _path: &str) -> dotdash::api::Result<RawResponse> {
            Ok(RawResponse::ok("[]"))
        }

        async fn put_json(&self, _path: &str, _body: String) -> dotdash::api::Result<RawResponse> {
            Ok(RawResponse::ok(r#"{"success": true}"#))
        }
    }

    /// Mock event reader for testing that returns a predetermined sequence of events
    struct MockEventReader {
        events: VecDeque<Event>,
    }

    impl EventReader for MockEventReader {
        fn read_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
            Ok(self.events.pop_front())
        }
    }

    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn controller(events: Vec<Event>) -> Controller<EmptyBackend, Screen<TestBackend>> {
        let screen = Screen::new(
            Terminal::new(TestBackend::new(100, 30)).expect("terminal"),
            Box::new(MockEventReader {
                events: VecDeque::from(events),
            }),
            Theme::default_theme(),
        );
        Controller::new(ApiClient::new(EmptyBackend), screen, PathBuf::from("."))
    }

    #[tokio::test]
    async fn test_run_app_quits_on_q() {
        let mut controller = controller(vec![
            key_event(KeyCode::Char('j')),
            key_event(KeyCode::Char('q')),
        ]);
        run_app(&mut controller).await.expect("run");
        assert!(controller.state.should_quit);
        assert_eq!(controller.state.nav.sidebar_index, 1);
    }

    #[tokio::test]
    async fn test_run_app_opens_category() {
        let mut controller = controller(vec![
            key_event(KeyCode::Enter),
            key_event(KeyCode::Char('q')),
        ]);
        run_app(&mut controller).await.expect("run");
        assert_eq!(
            controller.state.view,
            dotdash::ui::app::View::Packages(dotdash::api::Category::Formulae)
        );
    }

    #[tokio::test]
    async fn test_dump_prints_markup() {
        let markup = dump(ApiClient::new(EmptyBackend), PathBuf::from("."), None)
            .await
            .expect("dump");
        assert!(markup.contains(r#"<div id="welcome-view" class="active">"#));
    }

    #[test]
    fn test_args_parsing_defaults() {
        let args = Args::try_parse_from(["dotdash"]).expect("parse");
        assert!(args.server.is_none());
        assert!(!args.dump);
    }

    #[test]
    fn test_config_requires_dump() {
        assert!(Args::try_parse_from(["dotdash", "--config", "zshrc"]).is_err());
        let args = Args::try_parse_from(["dotdash", "--dump", "--config", "zshrc"]).expect("parse");
        assert_eq!(args.config.as_deref(), Some("zshrc"));
    }

    #[test]
    fn test_cli_overrides_settings() {
        let args = Args::try_parse_from(["dotdash", "--server", "http://nas:8765", "-t", "Nord"])
            .expect("parse");
        let settings = effective_settings(&args, Settings::default());
        assert_eq!(settings.server, "http://nas:8765");
        assert_eq!(settings.theme, "Nord");
    }
}
