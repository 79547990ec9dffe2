use crate::MetricsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of computation produces a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Single-year ratio of line items
    Ratio,
    /// Weighted or rule-based combination, possibly with a prior-year lookback
    Composite,
    /// Period-over-period delta
    Growth,
}

/// Derived metric names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AssetTurnover,
    CashRatio,
    CurrentRatio,
    QuickRatio,
    DebtToEquity,
    DebtToAssets,
    InterestCoverage,
    DaysInventory,
    DaysSalesOutstanding,
    EvToEbitda,
    GrossMargin,
    OperatingMargin,
    NetMargin,
    ReturnOnAssets,
    ReturnOnEquity,
    GrossProfitToAssets,
    EarningsPerShare,
    PriceToEarnings,
    PriceToBook,
    AltmanZScore,
    BeneishMScore,
    PiotroskiFScore,
    YoyRevenueGrowth,
    YoyEpsGrowth,
}

impl Metric {
    pub const ALL: [Metric; 24] = [
        Metric::AssetTurnover,
        Metric::CashRatio,
        Metric::CurrentRatio,
        Metric::QuickRatio,
        Metric::DebtToEquity,
        Metric::DebtToAssets,
        Metric::InterestCoverage,
        Metric::DaysInventory,
        Metric::DaysSalesOutstanding,
        Metric::EvToEbitda,
        Metric::GrossMargin,
        Metric::OperatingMargin,
        Metric::NetMargin,
        Metric::ReturnOnAssets,
        Metric::ReturnOnEquity,
        Metric::GrossProfitToAssets,
        Metric::EarningsPerShare,
        Metric::PriceToEarnings,
        Metric::PriceToBook,
        Metric::AltmanZScore,
        Metric::BeneishMScore,
        Metric::PiotroskiFScore,
        Metric::YoyRevenueGrowth,
        Metric::YoyEpsGrowth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::AssetTurnover => "asset_turnover",
            Metric::CashRatio => "cash_ratio",
            Metric::CurrentRatio => "current_ratio",
            Metric::QuickRatio => "quick_ratio",
            Metric::DebtToEquity => "debt_to_equity",
            Metric::DebtToAssets => "debt_to_assets",
            Metric::InterestCoverage => "interest_coverage",
            Metric::DaysInventory => "days_inventory",
            Metric::DaysSalesOutstanding => "days_sales_outstanding",
            Metric::EvToEbitda => "ev_to_ebitda",
            Metric::GrossMargin => "gross_margin",
            Metric::OperatingMargin => "operating_margin",
            Metric::NetMargin => "net_margin",
            Metric::ReturnOnAssets => "return_on_assets",
            Metric::ReturnOnEquity => "return_on_equity",
            Metric::GrossProfitToAssets => "gross_profit_to_assets",
            Metric::EarningsPerShare => "earnings_per_share",
            Metric::PriceToEarnings => "price_to_earnings",
            Metric::PriceToBook => "price_to_book",
            Metric::AltmanZScore => "altman_z_score",
            Metric::BeneishMScore => "beneish_m_score",
            Metric::PiotroskiFScore => "piotroski_f_score",
            Metric::YoyRevenueGrowth => "yoy_revenue_growth",
            Metric::YoyEpsGrowth => "yoy_eps_growth",
        }
    }

    /// Human-readable label for KPI tiles and tables
    pub fn to_label(&self) -> &'static str {
        match self {
            Metric::AssetTurnover => "Asset Turnover",
            Metric::CashRatio => "Cash Ratio",
            Metric::CurrentRatio => "Current Ratio",
            Metric::QuickRatio => "Quick Ratio",
            Metric::DebtToEquity => "Debt to Equity",
            Metric::DebtToAssets => "Debt to Assets",
            Metric::InterestCoverage => "Interest Coverage",
            Metric::DaysInventory => "Days Inventory",
            Metric::DaysSalesOutstanding => "Days Sales Outstanding",
            Metric::EvToEbitda => "EV / EBITDA",
            Metric::GrossMargin => "Gross Margin",
            Metric::OperatingMargin => "Operating Margin",
            Metric::NetMargin => "Net Margin",
            Metric::ReturnOnAssets => "Return on Assets",
            Metric::ReturnOnEquity => "Return on Equity",
            Metric::GrossProfitToAssets => "Gross Profit to Assets",
            Metric::EarningsPerShare => "Earnings per Share",
            Metric::PriceToEarnings => "P/E Ratio",
            Metric::PriceToBook => "P/B Ratio",
            Metric::AltmanZScore => "Altman Z-Score",
            Metric::BeneishMScore => "Beneish M-Score",
            Metric::PiotroskiFScore => "Piotroski F-Score",
            Metric::YoyRevenueGrowth => "YoY Revenue Growth",
            Metric::YoyEpsGrowth => "YoY EPS Growth",
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::AltmanZScore | Metric::BeneishMScore | Metric::PiotroskiFScore => {
                MetricKind::Composite
            }
            Metric::YoyRevenueGrowth | Metric::YoyEpsGrowth => MetricKind::Growth,
            _ => MetricKind::Ratio,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))
    }
}
