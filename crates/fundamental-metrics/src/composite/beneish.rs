use crate::ratios::{positive_ratio, ratio};
use ratio_core::{FinancialRecord, LineItem, MetricValue, ScoreThresholds, Undefined};
use serde::{Deserialize, Serialize};

const INTERCEPT: f64 = -4.84;

/// The eight Beneish indices comparing year t with year t-1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeneishIndices {
    /// Days sales in receivables index
    pub dsri: f64,
    /// Gross margin index
    pub gmi: f64,
    /// Asset quality index
    pub aqi: f64,
    /// Sales growth index
    pub sgi: f64,
    /// Depreciation index
    pub depi: f64,
    /// SG&A expense index
    pub sgai: f64,
    /// Leverage index
    pub lvgi: f64,
    /// Total accruals to total assets
    pub tata: f64,
}

/// Per-year building blocks shared by several indices.
struct YearInputs {
    sales: f64,
    receivables_to_sales: f64,
    gross_margin: f64,
    asset_quality: f64,
    depreciation_rate: f64,
    sga_to_sales: f64,
    leverage: f64,
}

impl YearInputs {
    fn from_record(r: &FinancialRecord) -> Result<Self, Undefined> {
        let sales = r.field(LineItem::Revenue)?;
        let total_assets = r.field(LineItem::TotalAssets)?;
        let ppe = r.field(LineItem::PropertyPlantEquipment)?;
        let depreciation = r.field(LineItem::DepreciationAmortization)?;

        Ok(Self {
            sales,
            receivables_to_sales: positive_ratio(r.field(LineItem::Receivables)?, sales)?,
            gross_margin: positive_ratio(sales - r.field(LineItem::CostOfRevenue)?, sales)?,
            asset_quality: 1.0
                - positive_ratio(r.field(LineItem::CurrentAssets)? + ppe, total_assets)?,
            depreciation_rate: ratio(depreciation, depreciation + ppe)?,
            sga_to_sales: positive_ratio(r.field(LineItem::SellingGeneralAdmin)?, sales)?,
            leverage: positive_ratio(
                r.field(LineItem::CurrentLiabilities)? + r.field(LineItem::LongTermDebt)?,
                total_assets,
            )?,
        })
    }
}

impl BeneishIndices {
    /// Fails with `InsufficientHistory` unless `prior` is the immediately preceding fiscal year.
    pub fn from_records(
        current: &FinancialRecord,
        prior: Option<&FinancialRecord>,
    ) -> Result<Self, Undefined> {
        let prior = prior
            .filter(|p| p.company() == current.company() && p.year() == current.year() - 1)
            .ok_or(Undefined::InsufficientHistory)?;

        let now = YearInputs::from_record(current)?;
        let before = YearInputs::from_record(prior)?;

        let total_assets = current.field(LineItem::TotalAssets)?;
        let accruals =
            current.field(LineItem::NetIncome)? - current.field(LineItem::OperatingCashFlow)?;

        Ok(Self {
            dsri: ratio(now.receivables_to_sales, before.receivables_to_sales)?,
            gmi: ratio(before.gross_margin, now.gross_margin)?,
            aqi: ratio(now.asset_quality, before.asset_quality)?,
            sgi: positive_ratio(now.sales, before.sales)?,
            depi: ratio(before.depreciation_rate, now.depreciation_rate)?,
            sgai: ratio(now.sga_to_sales, before.sga_to_sales)?,
            lvgi: ratio(now.leverage, before.leverage)?,
            tata: positive_ratio(accruals, total_assets)?,
        })
    }

    pub fn m_score(&self) -> f64 {
        INTERCEPT
            + 0.920 * self.dsri
            + 0.528 * self.gmi
            + 0.404 * self.aqi
            + 0.892 * self.sgi
            + 0.115 * self.depi
            - 0.172 * self.sgai
            + 4.679 * self.tata
            - 0.327 * self.lvgi
    }
}

pub fn beneish_m_score(current: &FinancialRecord, prior: Option<&FinancialRecord>) -> MetricValue {
    BeneishIndices::from_records(current, prior)
        .map(|indices| indices.m_score())
        .into()
}

/// True when the score sits above the manipulation cutoff.
pub fn manipulation_flag(m: f64, thresholds: &ScoreThresholds) -> bool {
    m > thresholds.beneish_cutoff
}
