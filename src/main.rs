//! ScoreRank CLI
//!
//! Держит рейтинг клиентов в памяти процесса. Читает по одной команде на
//! строку из stdin и печатает по одному JSON-конверту на строку в stdout.
//! Логи пишутся в stderr.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use scorerank::{
    command::{handle_line, Step},
    config::Settings,
    database::RankedScoreIndex,
    logging::{init_logging, LogFormat},
    service::LeaderboardService,
};
use tracing::info;

/// Аргументы командной строки. Переопределяют файл и переменные окружения.
#[derive(Parser, Debug)]
#[command(name = "scorerank")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ScoreRank - in-memory customer leaderboard", long_about = None)]
struct Cli {
    /// Путь к TOML-файлу настроек
    #[arg(short, long, help = "Файл настроек (TOML)")]
    config: Option<PathBuf>,
    /// Максимальное число клиентов
    #[arg(long, help = "Ёмкость рейтинга (по умолчанию 1000000)")]
    max_entries: Option<usize>,
    /// Уровень или директива логирования
    #[arg(long, help = "Уровень логирования, например info или scorerank=debug")]
    log_level: Option<String>,
    /// Формат логов
    #[arg(long, help = "Формат логов: compact, pretty или json")]
    log_format: Option<LogFormat>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(max_entries) = cli.max_entries {
        settings.max_entries = max_entries;
    }
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        settings.logging.console.format = format;
    }
    settings.validate().context("Invalid settings")?;

    init_logging(&settings.logging).context("Failed to initialize logging")?;

    let service = LeaderboardService::new(RankedScoreIndex::new(settings.max_entries));
    info!(
        max_entries = settings.max_entries,
        "ScoreRank ready, reading commands from stdin"
    );

    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;

        match handle_line(&service, &line)? {
            Step::Skip => continue,
            Step::Reply(json) => writeln!(out, "{json}")?,
            Step::Quit(json) => {
                writeln!(out, "{json}")?;
                break;
            }
        }
        out.flush()?;
    }

    out.flush()?;
    info!(entries = service.index().len(), "ScoreRank stopped");
    Ok(())
}
