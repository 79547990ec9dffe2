//! Command-line definitions for `ratio-loader`.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `summary` | KPI top performers, risk screens and EPS growth CAGR |
//! | `rank` | Filtered, sorted view of one metric |
//! | `export` | Long-format metric rows as JSON |
//! | `options` | Sectors, subsectors and companies available for filtering |

use clap::{Args, Parser, Subcommand, ValueEnum};
use fundamental_metrics::{RecordFilter, SortDirection, UndefinedPolicy};
use ratio_core::Metric;
use std::path::PathBuf;

/// Financial ratio engine for the NASDAQ-100 fundamentals dashboard
#[derive(Debug, Parser)]
#[command(name = "ratio-loader", version)]
pub struct Cli {
    /// Wide CSV of raw line items: company, sector, subsector, year, then one column per line item
    #[arg(long, short, global = true, default_value = "financials.csv")]
    pub input: PathBuf,

    /// Pretty-print JSON output
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// KPI tiles, Altman/Beneish risk screens and EPS growth CAGR
    Summary(SummaryArgs),
    /// Rank records by one metric
    Rank(RankArgs),
    /// Export the long-format metric table
    Export(FilterArgs),
    /// List filter choices, narrowed by any selected sectors and subsectors
    Options(OptionsArgs),
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Reporting year (defaults to the latest year in the data)
    #[arg(long)]
    pub year: Option<i32>,

    /// First year of the risk-screen window (overrides --risk-years)
    #[arg(long)]
    pub since: Option<i32>,

    /// Years, ending at the reporting year, averaged by the risk screens
    #[arg(long, default_value_t = 5)]
    pub risk_years: u32,

    /// Years of history compounded into the growth CAGR
    #[arg(long, default_value_t = 5)]
    pub cagr_period: u32,

    /// Number of revenue-growth leaders listed
    #[arg(long, default_value_t = 5)]
    pub top: usize,
}

#[derive(Debug, Args)]
pub struct RankArgs {
    /// Metric to sort by, e.g. debt_to_equity
    #[arg(long, short, value_parser = parse_metric)]
    pub metric: Metric,

    #[arg(long, value_enum, default_value_t = Direction::Descending)]
    pub direction: Direction,

    /// Drop records whose metric is undefined instead of listing them last
    #[arg(long, default_value_t = false)]
    pub exclude_undefined: bool,

    #[arg(long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Restrict to these sectors (repeatable)
    #[arg(long = "sector")]
    pub sectors: Vec<String>,

    /// Restrict to these subsectors (repeatable)
    #[arg(long = "subsector")]
    pub subsectors: Vec<String>,

    /// Restrict to these companies (repeatable)
    #[arg(long = "company")]
    pub companies: Vec<String>,

    /// First fiscal year, inclusive
    #[arg(long)]
    pub from: Option<i32>,

    /// Last fiscal year, inclusive
    #[arg(long)]
    pub to: Option<i32>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct OptionsArgs {
    /// Selected sectors (repeatable)
    #[arg(long = "sector")]
    pub sectors: Vec<String>,

    /// Selected subsectors (repeatable)
    #[arg(long = "subsector")]
    pub subsectors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Ascending,
    Descending,
}

impl From<Direction> for SortDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Ascending => SortDirection::Ascending,
            Direction::Descending => SortDirection::Descending,
        }
    }
}

impl RankArgs {
    pub fn undefined_policy(&self) -> UndefinedPolicy {
        if self.exclude_undefined {
            UndefinedPolicy::Exclude
        } else {
            UndefinedPolicy::Last
        }
    }
}

impl FilterArgs {
    /// An open bound on either side of the year range is left unbounded.
    pub fn to_filter(&self) -> RecordFilter {
        let filter = RecordFilter::new()
            .sectors(self.sectors.iter().cloned())
            .subsectors(self.subsectors.iter().cloned())
            .companies(self.companies.iter().cloned());
        match (self.from, self.to) {
            (None, None) => filter,
            (from, to) => filter.year_range(from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX)),
        }
    }
}

fn parse_metric(raw: &str) -> Result<Metric, String> {
    raw.parse::<Metric>().map_err(|e| e.to_string())
}
