use crate::{Metric, MetricValue, MetricsError, Undefined};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Raw financial statement line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItem {
    Revenue,
    CostOfRevenue,
    SellingGeneralAdmin,
    DepreciationAmortization,
    Ebit,
    Ebitda,
    InterestExpense,
    NetIncome,
    OperatingCashFlow,
    TotalAssets,
    CurrentAssets,
    CurrentLiabilities,
    TotalLiabilities,
    TotalDebt,
    LongTermDebt,
    ShareholdersEquity,
    RetainedEarnings,
    Cash,
    CashEquivalents,
    Receivables,
    Inventory,
    PropertyPlantEquipment,
    MarketCapitalization,
    SharesOutstanding,
}

impl LineItem {
    pub const ALL: [LineItem; 24] = [
        LineItem::Revenue,
        LineItem::CostOfRevenue,
        LineItem::SellingGeneralAdmin,
        LineItem::DepreciationAmortization,
        LineItem::Ebit,
        LineItem::Ebitda,
        LineItem::InterestExpense,
        LineItem::NetIncome,
        LineItem::OperatingCashFlow,
        LineItem::TotalAssets,
        LineItem::CurrentAssets,
        LineItem::CurrentLiabilities,
        LineItem::TotalLiabilities,
        LineItem::TotalDebt,
        LineItem::LongTermDebt,
        LineItem::ShareholdersEquity,
        LineItem::RetainedEarnings,
        LineItem::Cash,
        LineItem::CashEquivalents,
        LineItem::Receivables,
        LineItem::Inventory,
        LineItem::PropertyPlantEquipment,
        LineItem::MarketCapitalization,
        LineItem::SharesOutstanding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineItem::Revenue => "revenue",
            LineItem::CostOfRevenue => "cost_of_revenue",
            LineItem::SellingGeneralAdmin => "selling_general_admin",
            LineItem::DepreciationAmortization => "depreciation_amortization",
            LineItem::Ebit => "ebit",
            LineItem::Ebitda => "ebitda",
            LineItem::InterestExpense => "interest_expense",
            LineItem::NetIncome => "net_income",
            LineItem::OperatingCashFlow => "operating_cash_flow",
            LineItem::TotalAssets => "total_assets",
            LineItem::CurrentAssets => "current_assets",
            LineItem::CurrentLiabilities => "current_liabilities",
            LineItem::TotalLiabilities => "total_liabilities",
            LineItem::TotalDebt => "total_debt",
            LineItem::LongTermDebt => "long_term_debt",
            LineItem::ShareholdersEquity => "shareholders_equity",
            LineItem::RetainedEarnings => "retained_earnings",
            LineItem::Cash => "cash",
            LineItem::CashEquivalents => "cash_equivalents",
            LineItem::Receivables => "receivables",
            LineItem::Inventory => "inventory",
            LineItem::PropertyPlantEquipment => "property_plant_equipment",
            LineItem::MarketCapitalization => "market_capitalization",
            LineItem::SharesOutstanding => "shares_outstanding",
        }
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineItem {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        LineItem::ALL
            .into_iter()
            .find(|item| item.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| MetricsError::UnknownLineItem(name.to_string()))
    }
}

/// One company, one fiscal year of raw statement data.
///
/// Built once through the consuming `with*` methods and read-only afterwards.
/// Absent line items are "missing"; non-finite inputs are stored as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    company: String,
    sector: String,
    subsector: String,
    year: i32,
    items: BTreeMap<LineItem, f64>,
}

impl FinancialRecord {
    pub fn new(
        company: impl Into<String>,
        sector: impl Into<String>,
        subsector: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            company: company.into(),
            sector: sector.into(),
            subsector: subsector.into(),
            year,
            items: BTreeMap::new(),
        }
    }

    pub fn with(mut self, item: LineItem, value: f64) -> Self {
        if value.is_finite() {
            self.items.insert(item, value);
        } else {
            tracing::warn!(company = %self.company, year = self.year, %item, "Dropping non-finite line item");
            self.items.remove(&item);
        }
        self
    }

    pub fn with_optional(self, item: LineItem, value: Option<f64>) -> Self {
        match value {
            Some(v) => self.with(item, v),
            None => self,
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn subsector(&self) -> &str {
        &self.subsector
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn get(&self, item: LineItem) -> Option<f64> {
        self.items.get(&item).copied()
    }

    /// Like [`get`](Self::get) but reports the missing item as [`Undefined::MissingInput`].
    pub fn field(&self, item: LineItem) -> Result<f64, Undefined> {
        self.get(item).ok_or(Undefined::MissingInput(item))
    }

    pub fn line_items(&self) -> impl Iterator<Item = (LineItem, f64)> + '_ {
        self.items.iter().map(|(item, value)| (*item, *value))
    }
}

/// Altman Z-Score classification band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltmanZone {
    Distress,
    Grey,
    Safe,
}

impl AltmanZone {
    pub fn to_label(&self) -> &'static str {
        match self {
            AltmanZone::Distress => "Distress Zone",
            AltmanZone::Grey => "Grey Zone",
            AltmanZone::Safe => "Safe Zone",
        }
    }
}

/// Categorical labels derived from composite scores, kept apart from the scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLabels {
    /// `None` when the Z-Score is undefined.
    pub altman_zone: Option<AltmanZone>,
    /// `None` when the M-Score is undefined.
    pub manipulation_flag: Option<bool>,
}

/// Every derived metric for one (company, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    company: String,
    sector: String,
    subsector: String,
    year: i32,
    values: BTreeMap<Metric, MetricValue>,
    labels: RiskLabels,
}

impl MetricRecord {
    /// Evaluates `compute` once for every [`Metric`], so the record is always complete.
    pub fn from_fn<F>(source: &FinancialRecord, labels: RiskLabels, mut compute: F) -> Self
    where
        F: FnMut(Metric) -> MetricValue,
    {
        let values = Metric::ALL.into_iter().map(|m| (m, compute(m))).collect();
        Self {
            company: source.company.clone(),
            sector: source.sector.clone(),
            subsector: source.subsector.clone(),
            year: source.year,
            values,
            labels,
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn subsector(&self) -> &str {
        &self.subsector
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn get(&self, metric: Metric) -> MetricValue {
        // populated for every metric by `from_fn`
        self.values
            .get(&metric)
            .copied()
            .unwrap_or(MetricValue::Undefined(Undefined::UndefinedRatio))
    }

    pub fn values(&self) -> impl Iterator<Item = (Metric, MetricValue)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    pub fn labels(&self) -> RiskLabels {
        self.labels
    }
}
