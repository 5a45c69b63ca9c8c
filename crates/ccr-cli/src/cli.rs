use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ccr",
    about = "Carbon Credit Registry — tamper-evident credit ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the ledger file.
    #[arg(long, global = true, default_value = "ledger.json")]
    pub ledger: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify a reduction submission and mint credits for it
    Submit(SubmitArgs),
    /// Mint credits for an approved reduction
    Mint(MintArgs),
    /// Buy a credit off the open market
    Buy(BuyArgs),
    /// Permanently retire a held credit
    Retire(RetireArgs),
    /// Show the current owner and state of a credit
    Owner(OwnerArgs),
    /// List credits held or retired by an entity
    Portfolio(PortfolioArgs),
    /// Show the full event history of a credit
    History(HistoryArgs),
    /// Show the ledger event log
    Log(LogArgs),
    /// Verify hash chain integrity
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Originating project id
    #[arg(long)]
    pub project: String,
    /// Entity the credits are issued on behalf of
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub solar_capacity_kw: Option<f64>,
    #[arg(long)]
    pub annual_generation_kwh: Option<f64>,
    #[arg(long)]
    pub baseline_energy_kwh: Option<f64>,
    #[arg(long)]
    pub post_project_energy_kwh: Option<f64>,
    #[arg(long)]
    pub waste_recycled_kg: Option<f64>,
}

#[derive(Args)]
pub struct MintArgs {
    /// Originating project id
    #[arg(long)]
    pub project: String,
    /// Entity the credits are issued on behalf of
    #[arg(long)]
    pub owner: String,
    /// Verified reduction in kg CO2
    #[arg(long)]
    pub kg: f64,
    /// Mint at most this many units in one run
    #[arg(long)]
    pub limit: Option<u64>,
}

#[derive(Args)]
pub struct BuyArgs {
    pub credit: String,
    #[arg(long)]
    pub buyer: String,
}

#[derive(Args)]
pub struct RetireArgs {
    pub credit: String,
    #[arg(long)]
    pub holder: String,
}

#[derive(Args)]
pub struct OwnerArgs {
    pub credit: String,
}

#[derive(Args)]
pub struct PortfolioArgs {
    pub entity: String,
    /// List retired credits instead of held ones
    #[arg(long)]
    pub retired: bool,
}

#[derive(Args)]
pub struct HistoryArgs {
    pub credit: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct VerifyArgs {}
