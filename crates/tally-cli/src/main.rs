//! `tally`: the satisfaction survey dashboard.
//!
//! # Usage
//!
//! ```text
//! tally                              # terminal dashboard
//! tally check                        # is the database reachable?
//! tally submit --sector Finance --material-missing Sim --quality Bom
//! tally list                         # every response as JSON
//! tally analyze                      # print a sentiment summary
//! tally report --out reports/        # draft, render and save the report
//! ```
//!
//! Settings come from `tally.toml` (or `--config`), `TALLY_*` environment
//! variables and a `.env` file; see [`settings::Settings`].

mod app;
mod dashboard;
mod settings;
mod ui;

#[cfg(test)]
mod testing;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context as _, Result, bail};
use app::App;
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dashboard::{Dashboard, DashboardError, save_artifact};
use ratatui::{Terminal, backend::CrosstermBackend};
use tally_core::response::NewResponse;
use tally_narrative::{NarrativeGenerator, OpenAiClient};
use tally_report::Renderer;
use tally_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

type LiveDashboard = Dashboard<SqliteStore, OpenAiClient>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Satisfaction survey dashboard")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "tally.toml", env = "TALLY_CONFIG")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Check that the database is reachable.
  Check,

  /// Record one survey response.
  Submit {
    #[arg(long)]
    sector:           String,
    /// `Sim` when material was missing; anything else means no.
    #[arg(long, default_value = "")]
    material_missing: String,
    /// Which material was missing.
    #[arg(long)]
    material_name:    Option<String>,
    /// Excelente, Bom, Regular or Ruim.
    #[arg(long)]
    quality:          String,
    #[arg(long)]
    message:          Option<String>,
  },

  /// Print every stored response as JSON.
  List,

  /// Summarise the sentiment of the stored responses.
  Analyze,

  /// Draft the executive report and save it.
  Report {
    /// Output directory (defaults to `report.output_dir`).
    #[arg(long, value_name = "DIR")]
    out:            Option<PathBuf>,
    /// Run the sentiment analysis first and include it in the report.
    #[arg(long)]
    with_sentiment: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // A missing .env file is normal.
  let _ = dotenvy::dotenv();

  init_tracing(cli.command.is_none())?;

  let settings = settings::Settings::load(&cli.config)?;

  let store = SqliteStore::new(&settings.database.path);
  if let Err(e) = store.ensure_schema().await {
    tracing::warn!(error = %e, path = %settings.database.path.display(), "could not create schema");
  }

  let narrative = NarrativeGenerator::from_config(&settings.narrative);
  let renderer = Renderer::new(settings.report.branding.clone());
  let mut dashboard: LiveDashboard = Dashboard::new(store, narrative, renderer);

  match cli.command {
    None => run_tui(dashboard, settings.report.output_dir).await,
    Some(Command::Check) => {
      if dashboard.check_connection().await {
        println!("database reachable: {}", settings.database.path.display());
        Ok(())
      } else {
        bail!("database unreachable: {}", settings.database.path.display())
      }
    }
    Some(Command::Submit { sector, material_missing, material_name, quality, message }) => {
      let input = NewResponse::from_form(
        &sector,
        &material_missing,
        material_name.as_deref(),
        &quality,
        message.as_deref(),
      )
      .context("invalid survey response")?;
      if !dashboard.submit(input).await {
        bail!("the response could not be recorded");
      }
      println!("response recorded");
      Ok(())
    }
    Some(Command::List) => {
      let batch = match dashboard.load().await {
        Ok(batch) => batch,
        Err(DashboardError::NoData) => Default::default(),
        Err(e) => return Err(e.into()),
      };
      println!("{}", serde_json::to_string_pretty(batch.as_slice())?);
      Ok(())
    }
    Some(Command::Analyze) => {
      let batch = dashboard.load().await?;
      println!("{}", dashboard.analyze(&batch).await?);
      Ok(())
    }
    Some(Command::Report { out, with_sentiment }) => {
      let batch = dashboard.load().await?;
      if with_sentiment {
        dashboard.analyze(&batch).await?;
      }
      let report = dashboard
        .executive_report(&batch, Local::now().naive_local())
        .await?;
      let dir = out.unwrap_or(settings.report.output_dir);
      let path = save_artifact(&report.artifact, &dir)?;
      println!("{}", path.display());
      Ok(())
    }
  }
}

/// Headless commands log to stderr; the dashboard logs to `tally.log` so
/// log lines do not corrupt the screen.
fn init_tracing(to_file: bool) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  if to_file {
    let file = File::create("tally.log").context("creating tally.log")?;
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::stderr)
      .init();
  }
  Ok(())
}

// ─── Terminal dashboard ───────────────────────────────────────────────────────

async fn run_tui(dashboard: LiveDashboard, output_dir: PathBuf) -> Result<()> {
  let mut app = App::new(dashboard, output_dir);

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<SqliteStore, OpenAiClient>,
) -> Result<()> {
  app.status_msg = "Loading responses…".into();
  terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;
  app.refresh().await;

  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if app.pending.is_some() {
      app.run_pending().await;
      let dropped = tokio::task::block_in_place(|| {
        app::drain_input(|| event::poll(Duration::ZERO), event::read)
      })?;
      if dropped > 0 {
        tracing::debug!(dropped, "discarded input typed while the action ran");
      }
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key)
    {
      break;
    }
  }

  Ok(())
}
