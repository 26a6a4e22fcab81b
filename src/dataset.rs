use indexmap::IndexMap;

use crate::error::{AnalysisError, Result};

pub const SEX: &'static str = "SEXO";
pub const AGE_BRACKET: &'static str = "FAIXA ETÁRIA";
pub const EDUCATION: &'static str = "INSTRUCAO";
pub const MARITAL_STATUS: &'static str = "ESTADO CIVIL";
pub const REGION: &'static str = "UF";
pub const SUGGESTION_TEXT: &'static str = "SUGESTAO.TEXTO";

pub const NOT_INFORMED: &'static str = "NÃO INFORMADO";
pub const MALE: &'static str = "MASCULINO";
pub const FEMALE: &'static str = "FEMININO";

/// Canonical chart order for age brackets; every bucket is always plotted.
pub const AGE_BRACKETS: [&'static str; 8] = [
    "15 A 19 ANOS",
    "20 A 24 ANOS",
    "25 A 29 ANOS",
    "30 A 39 ANOS",
    "40 A 49 ANOS",
    "50 A 59 ANOS",
    "ACIMA DE 59 ANOS",
    NOT_INFORMED,
];

/// The survey table. Cells are `None` where the source held a missing-value token.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Dataset { headers, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = Option<&str>> + '_> {
        let idx = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(move |row| row.get(idx).and_then(|cell| cell.as_deref())))
    }

    /// Missing-cell count per column, in header order, zero counts included.
    pub fn missing_counts(&self) -> Vec<(&str, usize)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let missing = self
                    .rows
                    .iter()
                    .filter(|row| row.get(idx).map_or(true, |cell| cell.is_none()))
                    .count();
                (header.as_str(), missing)
            })
            .collect()
    }

    /// Replaces missing cells of `name` with `value` in place. Returns how many were filled.
    pub fn fill_missing(&mut self, name: &str, value: &str) -> Result<usize> {
        let idx = self.column_index(name)?;
        let mut filled = 0;
        for row in self.rows.iter_mut() {
            if row.len() <= idx {
                row.resize(idx + 1, None);
            }
            if row[idx].is_none() {
                row[idx] = Some(value.to_string());
                filled += 1;
            }
        }
        Ok(filled)
    }

    /// Counts of the non-missing values of `name`.
    pub fn value_counts(&self, name: &str) -> Result<ValueCounts> {
        Ok(ValueCounts::from_values(self.column(name)?.flatten()))
    }
}

/// Frequency table sorted by count, descending. Equal counts keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueCounts {
    entries: Vec<(String, u64)>,
}

impl ValueCounts {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut counts: IndexMap<String, u64> = IndexMap::new();
        for value in values {
            *counts.entry(value.as_ref().to_string()).or_insert(0) += 1;
        }
        let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
        // stable: ties stay in insertion order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        ValueCounts { entries }
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn get(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, count)| *count)
    }

    pub fn first(&self) -> Option<&(String, u64)> {
        self.entries.first()
    }

    pub fn top(&self, n: usize) -> &[(String, u64)] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Counts laid out in `order`, zero for labels never seen.
    pub fn reindex(&self, order: &[&str]) -> Vec<(String, u64)> {
        order
            .iter()
            .map(|label| (label.to_string(), self.get(label)))
            .collect()
    }
}

pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}
