use console::style;
use serde::Serialize;
use snapshot_common::{time_point::USAGE_HINT, AggregationResult, InputError};
use snapshot_pipeline::{PipelineError, Progress};

const DISPLAY_PRECISION: u8 = 6;

/// Console rendering of a run, amounts in the native currency.
pub struct Printer {
    ticker: String,
    decimals: u8,
}

impl Printer {
    pub fn new(ticker: impl Into<String>, decimals: u8) -> Self {
        Self {
            ticker: ticker.into(),
            decimals,
        }
    }

    pub fn format_progress(&self, progress: &Progress<'_>) -> String {
        match progress {
            Progress::Parsed(target) => format!(
                "Using date: {}\nFinding block number at timestamp: {target}",
                target.to_local_string()
            ),
            Progress::Resolved(block) => format!("Using block number: {}", block.height),
            Progress::Enumerated { holders, unique } if holders == unique => {
                format!("Total Holders: {holders}")
            }
            Progress::Enumerated { holders, unique } => {
                format!("Total Holders: {holders} ({unique} unique)")
            }
            Progress::Balance {
                index,
                address,
                balance,
            } => format!(
                "{index}) {address}: {} {}",
                balance.format_fixed(self.decimals, DISPLAY_PRECISION),
                self.ticker
            ),
        }
    }

    pub fn format_total(&self, result: &AggregationResult) -> String {
        format!(
            "Total {ticker}: {} {ticker}",
            result
                .total()
                .format_fixed(self.decimals, DISPLAY_PRECISION),
            ticker = self.ticker
        )
    }
}

/// What to tell the user about a date argument that could not be used.
pub fn input_message(err: &InputError) -> String {
    match err {
        InputError::UnrecognizedFormat(_) => USAGE_HINT.to_string(),
        _ => err.to_string(),
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub stage: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<PartialReport>,
}

/// What was computed before an aggregation failure.
#[derive(Debug, Serialize)]
pub struct PartialReport {
    pub balances: usize,
    pub total: String,
}

impl ErrorReport {
    pub fn from_pipeline(err: &PipelineError, decimals: u8) -> Self {
        let partial = match err {
            PipelineError::Aggregation(err) => Some(PartialReport {
                balances: err.partial().len(),
                total: err.partial().total().to_units(decimals),
            }),
            _ => None,
        };

        Self {
            stage: err.stage().to_string(),
            error: err.to_string(),
            partial,
        }
    }

    pub fn from_setup(err: &snapshot_utils::Error) -> Self {
        Self {
            stage: "configure".to_string(),
            error: err.to_string(),
            partial: None,
        }
    }

    pub fn print(&self) {
        let body = serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"));
        eprintln!("{} {body}", style("error:").red());
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use snapshot_common::{Balance, Block, HolderAddress, TimePoint};

    use super::*;

    fn eth(milli: u64) -> Balance {
        Balance::from_raw(U256::from(milli) * U256::from(10u64).pow(U256::from(15u8)))
    }

    #[test]
    fn test_format_progress() {
        let printer = Printer::new("ETH", 18);
        let address = HolderAddress::from("0xaaa");

        assert_eq!(
            printer.format_progress(&Progress::Resolved(Block::new(
                17_000_000,
                TimePoint::from_secs(1)
            ))),
            "Using block number: 17000000"
        );
        assert_eq!(
            printer.format_progress(&Progress::Enumerated {
                holders: 3,
                unique: 3
            }),
            "Total Holders: 3"
        );
        assert_eq!(
            printer.format_progress(&Progress::Enumerated {
                holders: 4,
                unique: 3
            }),
            "Total Holders: 4 (3 unique)"
        );
        assert_eq!(
            printer.format_progress(&Progress::Balance {
                index: 2,
                address: &address,
                balance: eth(250),
            }),
            "2) 0xaaa: 0.250000 ETH"
        );
    }

    #[test]
    fn test_format_total() {
        let mut result = AggregationResult::new();
        result.push("0xaaa".into(), eth(1500));
        result.push("0xbbb".into(), eth(250));

        assert_eq!(
            Printer::new("ETH", 18).format_total(&result),
            "Total ETH: 1.750000 ETH"
        );
    }

    #[test]
    fn test_setup_report() {
        let report = ErrorReport::from_setup(&snapshot_utils::Error::ContractNotSet);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stage"], "configure");
        assert!(json.get("partial").is_none());
    }

    #[test]
    fn test_input_message() {
        assert_eq!(
            input_message(&InputError::UnrecognizedFormat("not-a-date".to_string())),
            USAGE_HINT
        );

        let err = TimePoint::parse("2023-02-30").unwrap_err();
        let message = input_message(&err);
        assert_ne!(message, USAGE_HINT);
        assert!(message.contains("2023-02-30"), "{message}");

        let before_epoch = InputError::BeforeEpoch("1960-01-01T00:00:00Z".to_string());
        assert_eq!(input_message(&before_epoch), before_epoch.to_string());
    }
}
