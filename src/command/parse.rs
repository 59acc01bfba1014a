use std::str::FromStr;

use rust_decimal::Decimal;
use scorerank_error::{bail, ScoreRankResult, StatusCode};

use super::Command;

/// Разбирает одну строку ввода.
///
/// Пустые строки и строки, начинающиеся с `#`, дают `Ok(None)`. Имя команды
/// нечувствительно к регистру.
pub fn parse_line(line: &str) -> ScoreRankResult<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let command = match name.to_ascii_uppercase().as_str() {
        "UPSERT" => {
            expect_arity(name, &args, 2, 2)?;
            Command::Upsert {
                customer_id: arg(&args, 0, "customer_id")?,
                delta: arg::<Decimal>(&args, 1, "delta")?,
            }
        }
        "RANK" => {
            expect_arity(name, &args, 1, 1)?;
            Command::Rank {
                customer_id: arg(&args, 0, "customer_id")?,
            }
        }
        "RANGE" => {
            expect_arity(name, &args, 2, 2)?;
            Command::Range {
                start: arg(&args, 0, "start")?,
                end: arg(&args, 1, "end")?,
            }
        }
        "NEIGHBORS" => {
            expect_arity(name, &args, 1, 3)?;
            Command::Neighbors {
                customer_id: arg(&args, 0, "customer_id")?,
                high: optional_arg(&args, 1, "high")?,
                low: optional_arg(&args, 2, "low")?,
            }
        }
        "STATS" => {
            expect_arity(name, &args, 0, 0)?;
            Command::Stats
        }
        "QUIT" | "EXIT" => Command::Quit,
        _ => bail!(StatusCode::InvalidCommand, "Unknown command '{}'", name),
    };

    Ok(Some(command))
}

fn expect_arity(
    name: &str,
    args: &[&str],
    min: usize,
    max: usize,
) -> ScoreRankResult<()> {
    if args.len() < min || args.len() > max {
        if min == max {
            bail!(
                StatusCode::InvalidArgs,
                "{} expects {} argument(s), got {}",
                name.to_ascii_uppercase(),
                min,
                args.len()
            );
        }
        bail!(
            StatusCode::InvalidArgs,
            "{} expects {} to {} arguments, got {}",
            name.to_ascii_uppercase(),
            min,
            max,
            args.len()
        );
    }
    Ok(())
}

fn arg<T: FromStr>(
    args: &[&str],
    index: usize,
    field: &str,
) -> ScoreRankResult<T> {
    match optional_arg(args, index, field)? {
        Some(value) => Ok(value),
        None => bail!(StatusCode::InvalidArgs, "Missing argument '{}'", field),
    }
}

fn optional_arg<T: FromStr>(
    args: &[&str],
    index: usize,
    field: &str,
) -> ScoreRankResult<Option<T>> {
    let Some(raw) = args.get(index) else {
        return Ok(None);
    };

    match raw.parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => bail!(StatusCode::InvalidArgs, "Invalid {} '{}'", field, raw),
    }
}
