//! CLI Interface Module
//!
//! Replays a JSON-lines stream of order requests through the matching
//! engine and prints every processed order as one JSON line on stdout.
//! Logs go to stderr.
//!
//! ## Responsibilities
//! - Parse command-line arguments
//! - Initialize logging
//! - Start the engine, feed it, drain its output
//! - Shut down once the input is exhausted

use crate::application::services::{EngineConfig, MatchingEngine};
use crate::application::use_cases::SubmitOrderUseCase;
use crate::domain::entities::{Order, OrderType};
use crate::domain::validation::{OrderValidator, ValidationConfig};
use crate::shared::asset_pool::AssetPool;
use crate::shared::error::EngineError;
use crate::shared::metrics::METRICS;
use crate::shared::protocol::{NewOrderRequest, OrderReport};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

/// 撮合引擎命令行配置
#[derive(Parser, Debug, Clone)]
#[command(name = "venue-matcher")]
#[command(version = "0.1.0")]
#[command(about = "Price-time matching engine for multi-asset order streams", long_about = None)]
pub struct CliConfig {
    /// JSON-lines order file (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// 日志级别
    #[arg(short = 'l', long, default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: String,

    /// Matching worker thread name
    #[arg(short = 'w', long, default_value = "matching-engine")]
    pub worker_name: String,

    /// Pin the matching worker to this core (cpu-affinity builds only)
    #[arg(long)]
    pub cpu_core: Option<usize>,

    /// Id of the first transaction
    #[arg(long, default_value_t = 1)]
    pub starting_transaction_id: u64,

    /// Restrict trading to these assets (repeatable)
    #[arg(short = 'a', long = "allowed-asset")]
    pub allowed_assets: Vec<String>,

    /// Largest accepted order size
    #[arg(long, default_value_t = 1_000_000_000)]
    pub max_shares: u64,

    /// Dump Prometheus metrics to stderr on exit
    #[arg(long, default_value_t = false)]
    pub print_metrics: bool,

    /// 仅显示配置不启动引擎
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            worker_name: self.worker_name.clone(),
            cpu_core: self.cpu_core,
            starting_transaction_id: self.starting_transaction_id,
        }
    }

    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig {
            max_shares: self.max_shares,
            allowed_assets: self.allowed_assets.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Totals reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub submitted: u64,
    pub rejected: u64,
    pub processed_orders: u64,
    pub transactions: usize,
    pub resting_orders: usize,
}

pub async fn run() -> Result<(), CliError> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    tracing::info!("配置: {:?}", config);

    if config.dry_run {
        tracing::info!("dry-run 模式，不启动引擎");
        return Ok(());
    }

    let input: Box<dyn AsyncRead + Unpin + Send> = match &config.input {
        Some(path) => Box::new(tokio::fs::File::open(path).await?),
        None => Box::new(tokio::io::stdin()),
    };

    let summary = replay(&config, input).await?;
    tracing::info!(
        submitted = summary.submitted,
        rejected = summary.rejected,
        processed = summary.processed_orders,
        transactions = summary.transactions,
        resting = summary.resting_orders,
        "replay finished"
    );

    if config.print_metrics {
        eprint!("{}", METRICS.export());
    }
    Ok(())
}

/// Feeds every line of `input` to a fresh engine and waits for it to drain.
pub async fn replay<R>(config: &CliConfig, input: R) -> Result<RunSummary, CliError>
where
    R: AsyncRead + Unpin,
{
    // shutdown 本身就是排空屏障，不需要 tracker
    let mut engine = MatchingEngine::start_untracked(config.engine_config())?;
    let use_case = SubmitOrderUseCase::new(
        OrderValidator::with_config(config.validation_config()),
        Arc::new(AssetPool::new()),
    );

    let processed = engine
        .take_processed()
        .ok_or(EngineError::InputClosed)?;
    let printer = tokio::spawn(print_processed(processed));

    let mut summary = RunSummary::default();
    let mut lines = BufReader::new(input).lines();
    let mut line_no = 0u64;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request = match serde_json::from_str::<NewOrderRequest>(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(line = line_no, "无法解析的订单: {}", e);
                METRICS
                    .rejected_orders_total
                    .with_label_values(&["malformed"])
                    .inc();
                summary.rejected += 1;
                continue;
            }
        };

        match use_case.execute(request, engine.inbound()) {
            Ok(order_id) => {
                tracing::trace!(line = line_no, order_id, "order submitted");
                summary.submitted += 1;
            }
            Err(EngineError::Validation(e)) => {
                tracing::warn!(line = line_no, "order rejected: {}", e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let book = tokio::task::spawn_blocking(move || engine.shutdown())
        .await
        .map_err(|_| EngineError::WorkerPanicked)??;
    summary.processed_orders = printer.await.map_err(|_| EngineError::WorkerPanicked)?;
    summary.transactions = book.transactions().len();
    summary.resting_orders = book.resting_orders().count();

    for order in book.resting_orders() {
        log_resting(order);
    }

    Ok(summary)
}

async fn print_processed(mut processed: UnboundedReceiver<Order>) -> u64 {
    let mut count = 0;
    while let Some(order) = processed.recv().await {
        match serde_json::to_string(&OrderReport::from(&order)) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!(order_id = order.id(), "failed to encode order report: {}", e),
        }
        count += 1;
    }
    count
}

fn log_resting(order: &Order) {
    let side = match order.order_type() {
        OrderType::Buy => "bid",
        OrderType::Sell => "ask",
    };
    tracing::debug!(
        asset = %order.asset_id(),
        side,
        order_id = order.id(),
        price = %order.price(),
        pending = order.pending_shares(),
        "resting"
    );
}

/// 初始化日志系统（RUST_LOG 优先）
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_default() {
        let config = CliConfig::parse_from(["venue-matcher"]);
        assert!(config.input.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.worker_name, "matching-engine");
        assert_eq!(config.cpu_core, None);
        assert_eq!(config.starting_transaction_id, 1);
        assert!(config.allowed_assets.is_empty());
        assert!(!config.print_metrics);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_cli_config_custom() {
        let config = CliConfig::parse_from([
            "venue-matcher",
            "--input", "orders.jsonl",
            "--log-level", "debug",
            "--worker-name", "matcher-0",
            "--cpu-core", "2",
            "--starting-transaction-id", "1000",
            "-a", "PETR4",
            "-a", "VALE3",
            "--max-shares", "5000",
            "--print-metrics",
            "--dry-run",
        ]);

        assert_eq!(config.input, Some(PathBuf::from("orders.jsonl")));
        assert_eq!(config.log_level, "debug");

        let engine = config.engine_config();
        assert_eq!(engine.worker_name, "matcher-0");
        assert_eq!(engine.cpu_core, Some(2));
        assert_eq!(engine.starting_transaction_id, 1000);

        let validation = config.validation_config();
        assert_eq!(validation.allowed_assets, vec!["PETR4", "VALE3"]);
        assert_eq!(validation.max_shares, 5000);
        assert!(config.print_metrics);
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_rejects_unknown_log_level() {
        assert!(CliConfig::try_parse_from(["venue-matcher", "-l", "verbose"]).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_replay_counts() {
        let config = CliConfig::parse_from(["venue-matcher", "--worker-name", "replay-test"]);
        let input = [
            r#"{"order_id":1,"investor_id":1,"asset_id":"X","order_type":"SELL","price":1000,"shares":20}"#,
            r#"{"order_id":2,"investor_id":2,"asset_id":"X","order_type":"SELL","price":1000,"shares":20}"#,
            "",
            "not json",
            r#"{"order_id":3,"investor_id":3,"asset_id":"X","order_type":"BUY","price":1000,"shares":0}"#,
            r#"{"order_id":4,"investor_id":4,"asset_id":"X","order_type":"BUY","price":1000,"shares":20}"#,
        ]
        .join("\n");

        let summary = replay(&config, input.as_bytes()).await.unwrap();
        assert_eq!(
            summary,
            RunSummary {
                submitted: 3,
                rejected: 2,
                processed_orders: 2,
                transactions: 1,
                resting_orders: 1,
            }
        );
    }
}
