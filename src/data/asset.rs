/// One row of the input asset list
///
/// `values` keeps the full original row (aligned with the list's columns) so
/// a failed asset can still be reproduced verbatim in the report tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub symbol: String,
    pub exchange: String,
    values: Vec<String>,
}

impl AssetRecord {
    pub fn new(symbol: impl Into<String>, exchange: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            values,
        }
    }

    /// Original row values in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Asset list as read from the input CSV, input order preserved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetList {
    columns: Vec<String>,
    records: Vec<AssetRecord>,
}

impl AssetList {
    pub fn new(columns: Vec<String>, records: Vec<AssetRecord>) -> Self {
        Self { columns, records }
    }

    /// Header of the input CSV, including Asset and Exchange
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssetRecord> {
        self.records.iter()
    }
}
