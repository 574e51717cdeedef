mod api;
mod cli;
mod clock;
mod config;
mod display;
mod logging;
mod paths;
mod reporter;
mod stats;
mod timer;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use api::{BackendClient, SaveRequest};
use cli::{Cli, Command};
use clock::{Clock, SystemClock};
use config::AppConfig;
use stats::{month_name, StatsQuery};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config()?;
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }

    match cli.command.unwrap_or(Command::Timer { minutes: None }) {
        Command::Timer { minutes } => run_timer(&mut config, minutes.as_deref()),
        Command::Save { count, year, month } => {
            logging::init_stderr();
            save(&config, count, year, month)
        }
        Command::Stats { year, month } => {
            logging::init_stderr();
            show_stats(&config, StatsQuery::new(year, month))
        }
        Command::Years => {
            logging::init_stderr();
            show_years(&config)
        }
        Command::Paths => {
            show_paths();
            Ok(())
        }
    }
}

fn client(config: &AppConfig) -> Result<BackendClient> {
    BackendClient::from_config(&config.server)
        .with_context(|| format!("Cannot talk to {}", config.server.base_url))
}

fn run_timer(config: &mut AppConfig, minutes: Option<&str>) -> Result<()> {
    let _log_guard = logging::init_file()?;
    if let Some(minutes) = minutes {
        config.timer.default_minutes = timer::engine::coerce_minutes(minutes) as i64;
    }
    tracing::info!(server = %config.server.base_url, "starting pomodoro timer");

    let client = client(config)?;
    let mut terminal = tui::init()?;
    let result = tui::screens::pomodoro::run(&mut terminal, config, client);
    tui::restore()?;
    let outcome = result?;

    if outcome.unsaved > 0 {
        println!(
            "  {} {} completed pomodoro(s) were not saved.",
            style("NOTE").yellow().bold(),
            outcome.unsaved
        );
        println!(
            "  Run {} to report them.",
            style(format!("pomotracker save {}", outcome.unsaved)).green()
        );
    }
    Ok(())
}

fn save(config: &AppConfig, count: u32, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let clock = SystemClock;
    let request = SaveRequest {
        pomodoros: count,
        year: year.unwrap_or_else(|| clock.current_year()),
        month: month.unwrap_or_else(|| clock.current_month()),
    };

    let notice = reporter::save_blocking(&client(config)?, &request)?;
    if notice.is_success() {
        println!("{}", style(notice.text()).green());
        Ok(())
    } else {
        anyhow::bail!("{} (backend: {})", notice.text(), config.server.base_url)
    }
}

fn show_stats(config: &AppConfig, query: StatsQuery) -> Result<()> {
    let snapshot = stats::load_stats_blocking(&client(config)?, &query)?;

    println!();
    println!("{}", style(format!("Statistics: {}", query.describe())).bold());
    println!();
    println!("  Total pomodoros: {}", style(snapshot.total_pomodoros).cyan());
    println!("  Total sessions:  {}", style(snapshot.total_sessions).cyan());
    println!();

    if snapshot.monthly_breakdown.is_empty() {
        println!("  No monthly data available.");
    } else {
        println!("  {:<12} {:>9}", style("Month").bold(), style("Pomodoros").bold());
        for entry in &snapshot.monthly_breakdown {
            println!("  {:<12} {:>9}", month_name(entry.month), entry.total);
        }
    }
    println!();
    Ok(())
}

fn show_years(config: &AppConfig) -> Result<()> {
    let years = stats::load_years_blocking(&client(config)?, config.stats.baseline_year)?;
    for year in years {
        println!("{year}");
    }
    Ok(())
}

fn show_paths() {
    println!("Config: {}", paths::config_file().display());
    println!("Logs:   {}", paths::logs_dir().display());
}
