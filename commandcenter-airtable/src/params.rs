//! List request parameters and response shape.

use commandcenter_core::AirtableRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Parameters for listing records. Unset parameters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub fields: Vec<String>,
    pub filter_by_formula: Option<String>,
    pub sort: Vec<SortSpec>,
    pub max_records: Option<u32>,
    pub page_size: Option<u32>,
    pub offset: Option<String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the filter formula. An empty formula clears it.
    pub fn filter(mut self, formula: impl Into<String>) -> Self {
        let formula = formula.into();
        self.filter_by_formula = if formula.is_empty() { None } else { Some(formula) };
        self
    }

    pub fn sort_by(mut self, spec: SortSpec) -> Self {
        self.sort.push(spec);
        self
    }

    pub fn max_records(mut self, max: u32) -> Self {
        self.max_records = Some(max);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn offset(mut self, offset: Option<String>) -> Self {
        self.offset = offset;
        self
    }

    /// Query pairs in Airtable's bracket encoding:
    /// `fields[]`, `filterByFormula`, `sort[i][field]`, `sort[i][direction]`,
    /// `maxRecords`, `pageSize`, `offset`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for field in &self.fields {
            pairs.push(("fields[]".to_string(), field.clone()));
        }

        if let Some(formula) = self.filter_by_formula.as_deref().filter(|f| !f.is_empty()) {
            pairs.push(("filterByFormula".to_string(), formula.to_string()));
        }

        for (i, spec) in self.sort.iter().enumerate() {
            pairs.push((format!("sort[{}][field]", i), spec.field.clone()));
            pairs.push((format!("sort[{}][direction]", i), spec.direction.to_string()));
        }

        if let Some(max) = self.max_records {
            pairs.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pageSize".to_string(), size.to_string()));
        }
        if let Some(offset) = &self.offset {
            pairs.push(("offset".to_string(), offset.clone()));
        }

        pairs
    }
}

/// One page of records. `offset` is present when more pages remain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListRecordsResponse {
    #[serde(default)]
    pub records: Vec<AirtableRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}
