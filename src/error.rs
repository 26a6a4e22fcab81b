use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("arquivo '{}' não encontrado", .0.display())]
    FileNotFound(PathBuf),

    #[error("falha de E/S em '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV inválido: {0}")]
    Csv(#[from] csv::Error),

    #[error("codificação desconhecida: {0}")]
    UnknownEncoding(String),

    #[error("linha {line} tem {found} campos, cabeçalho tem {expected}")]
    MalformedRow {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("coluna '{0}' ausente no dataset")]
    MissingColumn(String),

    #[error("expressão regular inválida: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Nenhum texto disponível para análise")]
    NoText,

    #[error("Nenhuma palavra válida encontrada após filtragem")]
    NoTokens,

    #[error("falha ao desenhar '{}': {message}", path.display())]
    Render { path: PathBuf, message: String },

    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
