//! Command line interface for the CLMM position rebalancer.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clmm_rebalancer_domain::enums::Protocol;
use clmm_rebalancer_domain::math::AmountPair;
use clmm_rebalancer_domain::rational::Percent;
use clmm_rebalancer_execution::prelude::*;
use clmm_rebalancer_protocols::prelude::*;
use dotenv::dotenv;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "clmm-rebalancer")]
#[command(about = "Range rebalancing and fee compounding for Sui CLMM positions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single cycle against a snapshot and print its report
    Plan(WorkerArgs),
    /// Run the worker loop against a snapshot until a fatal error
    Run(WorkerArgs),
}

#[derive(Args, Debug, Clone)]
struct WorkerArgs {
    /// Ledger snapshot JSON file
    #[arg(long, env = "SNAPSHOT_FILE")]
    snapshot: PathBuf,

    /// Protocol of the pool (CETUS or FLOWX_V3)
    #[arg(long, env = "PROTOCOL", default_value = "CETUS")]
    protocol: Protocol,

    /// Pool whose position is managed
    #[arg(long, env = "TARGET_POOL")]
    pool_id: String,

    /// Address owning the position
    #[arg(long, env = "OWNER_ADDRESS")]
    owner: String,

    /// Width of the active range in tick spacings
    #[arg(long, env = "MULTIPLIER", default_value_t = 2)]
    multiplier: u32,

    /// Base band shrink as a ratio (0.1 is 10%)
    #[arg(long, env = "BPRICE_PERCENT", default_value = "0.1")]
    base_price_percent: Decimal,

    /// Target band shrink as a ratio
    #[arg(long, env = "TPRICE_PERCENT", default_value = "0.2")]
    target_price_percent: Decimal,

    /// Slippage tolerance as a ratio (0.005 is 0.5%)
    #[arg(long, env = "SLIPPAGE_TOLERANCE", default_value = "0.005")]
    slippage_tolerance: Decimal,

    /// Maximum price impact accepted for swaps, as a ratio
    #[arg(long, env = "PRICE_IMPACT_PERCENT_THRESHOLD")]
    price_impact_threshold: Option<Decimal>,

    /// Smallest raw coin X amount worth zapping
    #[arg(long, env = "MIN_ZAP_AMOUNT_X", default_value_t = 0)]
    min_zap_amount_x: u64,

    /// Smallest raw coin Y amount worth zapping
    #[arg(long, env = "MIN_ZAP_AMOUNT_Y", default_value_t = 0)]
    min_zap_amount_y: u64,

    /// Smallest reward value worth collecting, in USD
    #[arg(long, env = "REWARD_THRESHOLD_USD")]
    reward_threshold_usd: Option<Decimal>,

    /// Minimum milliseconds between compounds; compounding is off when unset
    #[arg(long, env = "COMPOUND_REWARDS_SCHEDULE_MS")]
    compound_interval_ms: Option<u64>,

    /// Tick spacings added on the side the price left the base band
    #[arg(long, env = "WIDEN_SPACING_UNITS", default_value_t = 1)]
    widen_spacing_units: u32,

    /// Milliseconds between cycles
    #[arg(long, env = "TICK_INTERVAL_MS", default_value_t = 5_000)]
    tick_interval_ms: u64,

    /// Milliseconds a cycle may take before the worker stops
    #[arg(long, env = "PROCESSING_TIMEOUT_MS", default_value_t = 300_000)]
    processing_timeout_ms: u64,

    /// Milliseconds to wait before reading a newly created position
    #[arg(long, env = "SETTLE_DELAY_MS", default_value_t = 5_000)]
    settle_delay_ms: u64,
}

fn percent(name: &str, value: Decimal) -> Result<Percent> {
    Percent::try_from(value).with_context(|| format!("invalid {name} {value}"))
}

impl WorkerArgs {
    fn manager_options(&self) -> Result<PositionManagerOptions> {
        Ok(PositionManagerOptions {
            slippage_tolerance: percent("slippage tolerance", self.slippage_tolerance)?,
            price_impact_threshold: self
                .price_impact_threshold
                .map(|value| percent("price impact threshold", value))
                .transpose()?,
            min_zap_amounts: AmountPair::new(
                u128::from(self.min_zap_amount_x),
                u128::from(self.min_zap_amount_y),
            ),
            reward_threshold_usd: self.reward_threshold_usd,
        })
    }

    fn worker_config(&self) -> Result<WorkerConfig> {
        let mut config = WorkerConfig::new(self.protocol, &self.pool_id, &self.owner)
            .with_multiplier(self.multiplier);
        config.base_price_percent = percent("base price percent", self.base_price_percent)?;
        config.target_price_percent = percent("target price percent", self.target_price_percent)?;
        config.compound_interval = self.compound_interval_ms.map(Duration::from_millis);
        config.widen_spacing_units = self.widen_spacing_units;
        config.tick_interval = Duration::from_millis(self.tick_interval_ms);
        config.processing_timeout = Duration::from_millis(self.processing_timeout_ms);
        config.settle_delay = Duration::from_millis(self.settle_delay_ms);
        Ok(config)
    }

    async fn build_worker(&self) -> Result<RebalanceWorker> {
        let ledger = SnapshotLedger::from_file(&self.snapshot)
            .await
            .with_context(|| format!("loading snapshot {}", self.snapshot.display()))?;
        let adapter = ProtocolAdapter::for_protocol(self.protocol);
        let provider = PositionProvider::new(Arc::new(ledger), adapter.clone());
        let manager = PositionManager::new(self.manager_options()?, adapter)
            .context("invalid position manager options")?;
        RebalanceWorker::new(self.worker_config()?, provider, manager, Arc::new(DryRunSubmitter))
            .context("invalid worker configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Plan(args) => {
            let mut worker = args.build_worker().await?;
            let report = worker.run_cycle().await.context("cycle failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            for event in worker.history().events() {
                println!("{}", serde_json::to_string_pretty(event)?);
            }
        }
        Commands::Run(args) => {
            let mut worker = args.build_worker().await?;
            info!(snapshot = %args.snapshot.display(), "Running against snapshot");
            worker.run().await.context("worker stopped")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(extra: &[&str]) -> WorkerArgs {
        let mut argv = vec![
            "clmm-rebalancer",
            "plan",
            "--snapshot",
            "snapshot.json",
            "--pool-id",
            "0xa1",
            "--owner",
            "0xa11ce",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Plan(args) | Commands::Run(args) => args,
        }
    }

    #[test]
    fn test_defaults_build_valid_configuration() {
        let args = parse(&[]);
        assert_eq!(args.protocol, Protocol::Cetus);
        assert_eq!(args.slippage_tolerance, dec!(0.005));

        let options = args.manager_options().unwrap();
        assert!(options.validate().is_ok());
        assert_eq!(options.slippage_tolerance.to_fixed(1), "0.5");

        let config = args.worker_config().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.multiplier, 2);
        assert!(config.compound_interval.is_none());
        assert_eq!(config.processing_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let args = parse(&[
            "--protocol",
            "flowx-v3",
            "--multiplier",
            "4",
            "--compound-interval-ms",
            "3600000",
            "--slippage-tolerance",
            "0.01",
        ]);
        let config = args.worker_config().unwrap();
        assert_eq!(config.protocol, Protocol::FlowXV3);
        assert_eq!(config.multiplier, 4);
        assert_eq!(config.compound_interval, Some(Duration::from_secs(3_600)));
        assert_eq!(args.manager_options().unwrap().slippage_tolerance.to_fixed(0), "1");
    }

    #[test]
    fn test_out_of_range_slippage_fails_validation() {
        let args = parse(&["--slippage-tolerance", "1.5"]);
        assert!(args.manager_options().unwrap().validate().is_err());
    }

    #[test]
    fn test_unknown_protocol_is_rejected() {
        let argv = [
            "clmm-rebalancer",
            "run",
            "--snapshot",
            "s.json",
            "--pool-id",
            "0xa1",
            "--owner",
            "0xa11ce",
            "--protocol",
            "uniswap",
        ];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
