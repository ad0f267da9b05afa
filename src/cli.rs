//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::asset::Asset;
use crate::domain::config_validation::validate_position_config;
use crate::domain::currency::{relative_currency_strength, RcsPoint};
use crate::domain::error::IndicatoryError;
use crate::domain::factory::{
    open_long, open_long_spread_aware, open_long_with_stop_loss, OpenRequest,
};
use crate::domain::fees::FeeModel;
use crate::domain::position::{AnyLongPosition, Position};
use crate::domain::quote::{parse_date_time, PriceQuote};
use crate::domain::risk::RiskInputs;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "indicatory", about = "Long position sizing, risk and returns")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open (and optionally close) a position from a ticket file and print it as JSON
    Position {
        #[arg(short, long)]
        config: PathBuf,
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Relative currency strength of an asset against its trading currency
    Rcs {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        exchange: String,
        #[arg(long)]
        currency: String,
        /// Exchange of the currency series, defaults to FX
        #[arg(long, default_value = "FX")]
        currency_exchange: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// List instruments with data on an exchange
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        exchange: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Position { config, compact } => run_position(&config, compact),
        Command::Rcs {
            data_dir,
            code,
            exchange,
            currency,
            currency_exchange,
            start,
            end,
        } => {
            let adapter = CsvAdapter::new(data_dir);
            let result = rcs_report(
                &adapter,
                &code,
                &exchange,
                &currency,
                &currency_exchange,
                start,
                end,
            )
            .and_then(|points| write_rcs_csv(&points, std::io::stdout().lock()));
            finish(result)
        }
        Command::ListSymbols { data_dir, exchange } => {
            let adapter = CsvAdapter::new(data_dir);
            let result = adapter.list_symbols(&exchange).map(|symbols| {
                for symbol in symbols {
                    println!("{symbol}");
                }
            });
            finish(result)
        }
    }
}

fn finish(result: Result<(), IndicatoryError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = IndicatoryError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_position(config_path: &PathBuf, compact: bool) -> ExitCode {
    info!(path = %config_path.display(), "loading position ticket");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let result = open_from_config(&adapter)
        .and_then(|position| position.to_record())
        .and_then(|record| {
            if compact {
                Ok(serde_json::to_string(&record)?)
            } else {
                record.to_json_pretty()
            }
        });

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Validate a ticket, open the position with its strategy and close it when
/// the ticket has a `[closing]` quote.
pub fn open_from_config(config: &dyn ConfigPort) -> Result<AnyLongPosition, IndicatoryError> {
    validate_position_config(config)?;

    let request = build_open_request(config)?;
    let strategy = config
        .get_string("risk", "strategy")
        .unwrap_or_else(|| "plain".to_string());
    info!(symbol = %request.asset.symbol, strategy = %strategy.trim(), "opening position");

    let mut position = match strategy.trim() {
        "spread_aware" => AnyLongPosition::Plain(open_long_spread_aware(
            request,
            config.get_double("risk", "base_risk_percentage", 0.0),
        )?),
        "stop_loss" => AnyLongPosition::Plain(open_long_with_stop_loss(
            request,
            config.get_double("risk", "stop_loss", 0.0),
        )?),
        _ => open_long(
            request,
            config.get_opt_double("factor", "factor"),
            config.get_opt_double("factor", "subscription_ratio"),
        )?,
    };

    if let Some(closing) = build_quote(config, "closing")? {
        position.close(closing);
    }
    Ok(position)
}

pub fn build_open_request(config: &dyn ConfigPort) -> Result<OpenRequest, IndicatoryError> {
    let asset = Asset::new(
        config.get_string("asset", "symbol").unwrap_or_default(),
        config.get_string("asset", "exchange").unwrap_or_default(),
    );
    let quote = build_quote(config, "opening")?.ok_or_else(|| IndicatoryError::ConfigMissing {
        section: "opening".into(),
        key: "date_time".into(),
    })?;

    Ok(OpenRequest::new(config.get_double("account", "size", 0.0), asset, quote)
        .with_fees(FeeModel::new(
            config.get_double("fees", "fixed", 0.0),
            config.get_double("fees", "variable", 0.0),
        ))
        .with_risk(RiskInputs {
            proportion: config.get_opt_double("risk", "proportion"),
            risk_per_trade: config.get_opt_double("risk", "risk_per_trade"),
            risk_percentage: config.get_opt_double("risk", "risk_percentage"),
            risk_per_trade_percent: config.get_opt_double("risk", "risk_per_trade_percent"),
        }))
}

/// Quote from a `[opening]`/`[closing]` style section; `None` when the section
/// has no `date_time`.
pub fn build_quote(
    config: &dyn ConfigPort,
    section: &str,
) -> Result<Option<PriceQuote>, IndicatoryError> {
    let Some(raw) = config.get_string(section, "date_time") else {
        return Ok(None);
    };
    let date_time = parse_date_time(&raw).ok_or_else(|| IndicatoryError::ConfigInvalid {
        section: section.to_string(),
        key: "date_time".into(),
        reason: format!("invalid date_time '{}'", raw),
    })?;
    PriceQuote::new(
        date_time,
        config.get_opt_double(section, "ask"),
        config.get_opt_double(section, "bid"),
        config.get_opt_double(section, "spread"),
    )
    .map(Some)
}

pub fn rcs_report(
    data_port: &dyn DataPort,
    code: &str,
    exchange: &str,
    currency: &str,
    currency_exchange: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RcsPoint>, IndicatoryError> {
    let asset = data_port.fetch_ohlcv(code, exchange, start, end)?;
    if asset.is_empty() {
        return Err(IndicatoryError::NoData {
            code: code.to_string(),
            exchange: exchange.to_string(),
        });
    }
    let fx = data_port.fetch_ohlcv(currency, currency_exchange, start, end)?;
    if fx.is_empty() {
        return Err(IndicatoryError::NoData {
            code: currency.to_string(),
            exchange: currency_exchange.to_string(),
        });
    }
    info!(code, currency, bars = asset.len(), "computing relative currency strength");
    relative_currency_strength(&asset, &fx)
}

pub fn write_rcs_csv<W: Write>(points: &[RcsPoint], writer: W) -> Result<(), IndicatoryError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(point).map_err(|e| IndicatoryError::Data {
            reason: format!("CSV write error: {}", e),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
