use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::Encoding;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::console::thousands;
use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};

pub struct LoadOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub na_values: Vec<String>,
}

impl LoadOptions {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let encoding = Encoding::for_label(config.encoding.as_bytes())
            .ok_or_else(|| AnalysisError::UnknownEncoding(config.encoding.clone()))?;
        Ok(LoadOptions {
            delimiter: config.delimiter_byte(),
            encoding,
            na_values: config.na_values.clone(),
        })
    }

    fn is_missing(&self, cell: &str) -> bool {
        self.na_values.iter().any(|token| token == cell)
    }
}

pub fn read_dataset(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, had_errors) = options.encoding.decode_without_bom_handling(&bytes);
    if had_errors {
        warn!(encoding = options.encoding.name(), "input contained undecodable bytes");
    }
    debug!(bytes = bytes.len(), encoding = options.encoding.name(), "decoded input");

    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(AnalysisError::MalformedRow {
                line: idx + 2,
                found: record.len(),
                expected: headers.len(),
            });
        }
        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|cell| {
                if options.is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        // short rows are padded with missing cells
        row.resize(headers.len(), None);
        rows.push(row);
    }
    Ok(Dataset::new(headers, rows))
}

/// Loads the configured input, printing progress. `None` means the run cannot continue.
pub fn load(config: &AnalysisConfig) -> Option<Dataset> {
    let path = config.input_path.as_path();
    if !path.exists() {
        println!("❌ Arquivo '{}' não encontrado!", path.display());
        println!("📁 Certifique-se de que o arquivo está na mesma pasta do programa");
        return None;
    }

    let loaded = LoadOptions::from_config(config).and_then(|options| read_dataset(path, &options));
    match loaded {
        Ok(dataset) => {
            println!("✅ Dataset carregado com sucesso!");
            println!("📊 Total de registros: {}", thousands(dataset.row_count() as u64));
            println!("📈 Total de colunas: {}", dataset.column_count());
            Some(dataset)
        }
        Err(e) => {
            warn!(error = %e, "load failed");
            println!("❌ Erro ao carregar dados: {}", e);
            None
        }
    }
}
