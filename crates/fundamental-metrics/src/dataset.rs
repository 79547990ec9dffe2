use ratio_core::{FinancialRecord, MetricsError, Result};
use std::collections::BTreeMap;

/// Immutable table of raw records keyed by company, then fiscal year.
///
/// Years are looked up by value (`year - 1`), never by position, so irregular
/// coverage is safe.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    companies: BTreeMap<String, BTreeMap<i32, FinancialRecord>>,
    len: usize,
}

impl Dataset {
    pub fn new<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = FinancialRecord>,
    {
        let mut companies: BTreeMap<String, BTreeMap<i32, FinancialRecord>> = BTreeMap::new();
        let mut len = 0;

        for record in records {
            let years = companies.entry(record.company().to_string()).or_default();
            if years.contains_key(&record.year()) {
                return Err(MetricsError::DuplicateRecord {
                    company: record.company().to_string(),
                    year: record.year(),
                });
            }
            years.insert(record.year(), record);
            len += 1;
        }

        tracing::debug!(records = len, companies = companies.len(), "Dataset loaded");
        Ok(Self { companies, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, company: &str, year: i32) -> Option<&FinancialRecord> {
        self.companies.get(company)?.get(&year)
    }

    /// The same company's record for the immediately preceding fiscal year.
    pub fn prior(&self, record: &FinancialRecord) -> Option<&FinancialRecord> {
        self.get(record.company(), record.year() - 1)
    }

    pub fn companies(&self) -> impl Iterator<Item = &str> + '_ {
        self.companies.keys().map(String::as_str)
    }

    /// Fiscal years available for `company`, ascending.
    pub fn years(&self, company: &str) -> impl Iterator<Item = i32> + '_ {
        self.companies
            .get(company)
            .into_iter()
            .flat_map(|years| years.keys().copied())
    }

    /// All records ordered by company, then year.
    pub fn records(&self) -> impl Iterator<Item = &FinancialRecord> + '_ {
        self.companies.values().flat_map(|years| years.values())
    }

    /// One company's records ordered by year.
    pub fn company_records(&self, company: &str) -> impl Iterator<Item = &FinancialRecord> + '_ {
        self.companies
            .get(company)
            .into_iter()
            .flat_map(|years| years.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(company: &str, year: i32) -> FinancialRecord {
        FinancialRecord::new(company, "Technology", "Software", year)
    }

    #[test]
    fn test_rejects_duplicates() {
        let result = Dataset::new([rec("INTU", 2020), rec("INTU", 2020)]);
        assert_eq!(
            result.unwrap_err(),
            MetricsError::DuplicateRecord {
                company: "INTU".to_string(),
                year: 2020
            }
        );
    }

    #[test]
    fn test_prior_uses_year_not_position() {
        let dataset = Dataset::new([rec("INTU", 2019), rec("INTU", 2021), rec("ADSK", 2020)]).unwrap();
        let latest = dataset.get("INTU", 2021).unwrap();
        assert!(dataset.prior(latest).is_none());
        assert_eq!(dataset.years("INTU").collect::<Vec<_>>(), vec![2019, 2021]);
        assert_eq!(dataset.years("ZZZZ").count(), 0);
    }

    #[test]
    fn test_records_sorted_by_company_then_year() {
        let dataset = Dataset::new([rec("MSFT", 2021), rec("AAPL", 2022), rec("MSFT", 2020)]).unwrap();
        let keys: Vec<_> = dataset.records().map(|r| (r.company(), r.year())).collect();
        assert_eq!(keys, vec![("AAPL", 2022), ("MSFT", 2020), ("MSFT", 2021)]);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.companies().collect::<Vec<_>>(), vec!["AAPL", "MSFT"]);
    }
}
