//! CLI integration tests.
//!
//! Tests cover:
//! - Building quotes and open requests from ticket files
//! - Opening and closing positions with each ticket strategy
//! - Validation errors surfacing before construction
//! - RCS reports over a mock data port and over CSV files on disk

mod common;

use approx::assert_relative_eq;
use common::*;
use indicatory::adapters::csv_adapter::CsvAdapter;
use indicatory::adapters::file_config_adapter::FileConfigAdapter;
use indicatory::cli;
use indicatory::domain::error::IndicatoryError;
use indicatory::domain::factory::open_long;
use indicatory::domain::position::{Position, PositionStatus};
use std::path::PathBuf;

const PLAIN_TICKET: &str = r#"
[account]
size = 50000

[asset]
symbol = BHP
exchange = ASX

[opening]
date_time = 2024-01-15T10:00:00
ask = 50.0
bid = 49.0

[closing]
date_time = 2024-02-14T10:00:00
ask = 56.0
bid = 55.0

[risk]
strategy = plain
risk_per_trade = 500
risk_percentage = 0.08

[fees]
fixed = 5
variable = 0.001
"#;

mod ticket_loading {
    use super::*;

    #[test]
    fn build_quote_from_section() {
        let adapter = FileConfigAdapter::from_string(PLAIN_TICKET).unwrap();
        let opening = cli::build_quote(&adapter, "opening").unwrap().unwrap();
        assert_eq!(opening, quote("2024-01-15", 50.0, 49.0));
    }

    #[test]
    fn build_quote_from_ask_and_spread() {
        let ini = "[opening]\ndate_time = 2024-01-15T10:00:00\nask = 100\nspread = 0.02\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let opening = cli::build_quote(&adapter, "opening").unwrap().unwrap();
        assert_relative_eq!(opening.bid(), 100.0 * 0.99 / 1.01, epsilon = 1e-9);
    }

    #[test]
    fn build_quote_absent_section_is_none() {
        let adapter = FileConfigAdapter::from_string("[account]\nsize = 1\n").unwrap();
        assert!(cli::build_quote(&adapter, "closing").unwrap().is_none());
    }

    #[test]
    fn build_quote_with_one_price_is_invalid() {
        let ini = "[opening]\ndate_time = 2024-01-15\nask = 100\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        assert!(matches!(
            cli::build_quote(&adapter, "opening"),
            Err(IndicatoryError::InvalidQuote { .. })
        ));
    }

    #[test]
    fn build_open_request_reads_all_sections() {
        let adapter = FileConfigAdapter::from_string(PLAIN_TICKET).unwrap();
        let request = cli::build_open_request(&adapter).unwrap();
        assert_eq!(request.account_size, 50_000.0);
        assert_eq!(request.asset.symbol, "BHP");
        assert_eq!(request.fees.fixed, 5.0);
        assert_eq!(request.risk.risk_per_trade, Some(500.0));
        assert_eq!(request.risk.proportion, None);
    }

    #[test]
    fn load_config_missing_file_fails() {
        assert!(cli::load_config(&PathBuf::from("/nonexistent/ticket.ini")).is_err());
    }
}

mod open_from_config {
    use super::*;

    #[test]
    fn plain_ticket_matches_direct_construction() {
        let adapter = FileConfigAdapter::from_string(PLAIN_TICKET).unwrap();
        let from_ticket = cli::open_from_config(&adapter).unwrap();

        let request = cli::build_open_request(&adapter).unwrap();
        let mut direct = open_long(request, None, None).unwrap();
        direct.close(quote("2024-02-14", 56.0, 55.0));

        assert_eq!(from_ticket, direct);
        assert_eq!(from_ticket.status(), PositionStatus::Closed);
        let returns = from_ticket.returns().unwrap().unwrap();
        assert_relative_eq!(returns.after_costs, 601.75);
    }

    #[test]
    fn ticket_file_on_disk() {
        let file = write_temp_ini(PLAIN_TICKET);
        let adapter = cli::load_config(&file.path().to_path_buf()).unwrap();
        let position = cli::open_from_config(&adapter).unwrap();
        assert_eq!(position.shares(), 125);
    }

    #[test]
    fn open_ticket_without_closing_section() {
        let ini = PLAIN_TICKET.replace(
            "[closing]\ndate_time = 2024-02-14T10:00:00\nask = 56.0\nbid = 55.0\n",
            "",
        );
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let position = cli::open_from_config(&adapter).unwrap();
        assert!(position.is_open());
        let value = serde_json::to_value(position.to_record().unwrap()).unwrap();
        assert_eq!(value["status"], "open");
        assert_eq!(value["returns"], serde_json::json!({}));
    }

    #[test]
    fn factor_ticket() {
        let ini = format!("{PLAIN_TICKET}\n[factor]\nfactor = 3\nsubscription_ratio = 0.1\n");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let position = cli::open_from_config(&adapter).unwrap();
        assert!(position.is_factor());
        assert_eq!(position.shares(), 1250);
    }

    #[test]
    fn stop_loss_ticket() {
        let ini = PLAIN_TICKET
            .replace("strategy = plain", "strategy = stop_loss\nstop_loss = 45")
            .replace("risk_percentage = 0.08", "");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let position = cli::open_from_config(&adapter).unwrap();
        assert_relative_eq!(position.state().risk().risk_percentage, 0.1, epsilon = 1e-12);
        assert_relative_eq!(position.stop_loss(), 45.0);
    }

    #[test]
    fn stop_loss_inside_spread_ticket_fails() {
        let ini = PLAIN_TICKET.replace("strategy = plain", "strategy = stop_loss\nstop_loss = 49.5");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        assert!(matches!(
            cli::open_from_config(&adapter),
            Err(IndicatoryError::InvalidStopLoss { .. })
        ));
    }

    #[test]
    fn spread_aware_ticket() {
        let ini = PLAIN_TICKET
            .replace("strategy = plain", "strategy = spread_aware\nbase_risk_percentage = 0.05")
            .replace("risk_percentage = 0.08", "");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let position = cli::open_from_config(&adapter).unwrap();
        // spread of 50/49 is 1 / 49.5
        assert_relative_eq!(
            position.state().risk().risk_percentage,
            0.05 + 0.020202,
            epsilon = 1e-12
        );
    }

    #[test]
    fn underdetermined_risk_ticket_fails() {
        let ini = PLAIN_TICKET.replace("risk_percentage = 0.08", "");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        assert!(matches!(
            cli::open_from_config(&adapter),
            Err(IndicatoryError::InvalidRiskSpec { .. })
        ));
    }

    #[test]
    fn nan_stop_loss_ticket_is_rejected_before_opening() {
        let ini = PLAIN_TICKET.replace("strategy = plain", "strategy = stop_loss\nstop_loss = nan");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        assert!(matches!(
            cli::open_from_config(&adapter),
            Err(IndicatoryError::ConfigInvalid { key, .. }) if key == "stop_loss"
        ));
    }

    #[test]
    fn validation_runs_first() {
        let ini = PLAIN_TICKET.replace("symbol = BHP", "");
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        assert!(matches!(
            cli::open_from_config(&adapter),
            Err(IndicatoryError::ConfigMissing { key, .. }) if key == "symbol"
        ));
    }
}

mod rcs {
    use super::*;

    #[test]
    fn report_over_mock_port() {
        let port = MockDataPort::new()
            .with_bars(
                "AAPL",
                vec![
                    make_bar("AAPL", "2024-03-01", 100.0, 102.0),
                    make_bar("AAPL", "2024-03-04", 104.0, 103.0),
                ],
            )
            .with_bars(
                "USD",
                vec![
                    make_bar("USD", "2024-03-01", 2.0, 2.0),
                    make_bar("USD", "2024-03-04", 4.0, 2.0),
                ],
            );
        let points = cli::rcs_report(
            &port,
            "AAPL",
            "NYSE",
            "USD",
            "FX",
            date(2024, 3, 1),
            date(2024, 3, 31),
        )
        .unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].rcs_open, 26.0);
        assert_eq!(points[1].rcs_close, 51.5);
    }

    #[test]
    fn missing_asset_data_is_no_data() {
        let port = MockDataPort::new();
        let err = cli::rcs_report(
            &port,
            "AAPL",
            "NYSE",
            "USD",
            "FX",
            date(2024, 3, 1),
            date(2024, 3, 31),
        )
        .unwrap_err();
        assert!(matches!(err, IndicatoryError::NoData { code, .. } if code == "AAPL"));
    }

    #[test]
    fn missing_currency_data_is_no_data() {
        let port = MockDataPort::new()
            .with_bars("AAPL", vec![make_bar("AAPL", "2024-03-01", 100.0, 102.0)]);
        let err = cli::rcs_report(
            &port,
            "AAPL",
            "NYSE",
            "USD",
            "FX",
            date(2024, 3, 1),
            date(2024, 3, 31),
        )
        .unwrap_err();
        assert!(matches!(err, IndicatoryError::NoData { code, .. } if code == "USD"));
    }

    #[test]
    fn report_over_csv_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("AAPL_NYSE.csv"),
            "date,open,high,low,close,volume\n2024-03-01,100,103,99,102,1000\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("USD_FX.csv"),
            "date,open,high,low,close\n2024-03-01,2,2,2,4\n",
        )
        .unwrap();

        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let points = cli::rcs_report(
            &adapter,
            "AAPL",
            "NYSE",
            "USD",
            "FX",
            date(2024, 3, 1),
            date(2024, 3, 31),
        )
        .unwrap();

        let mut out = Vec::new();
        cli::write_rcs_csv(&points, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,rcs_open,rcs_close\n2024-03-01,50.0,25.5\n"
        );
    }
}
