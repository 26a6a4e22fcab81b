use std::path::Path;

use tracing::{info, warn};

use crate::chart::Renderer;
use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::summary::Summary;
use crate::{content, demographics, geography, inspector, temporal};

#[derive(Debug)]
pub struct StepFailure {
    pub step: &'static str,
    pub error: AnalysisError,
}

#[derive(Debug)]
pub struct RunReport {
    pub failures: Vec<StepFailure>,
    pub summary: Summary,
}

/// Reports a failed step and lets the run go on.
fn settle<T>(step: &'static str, outcome: Result<T>, failures: &mut Vec<StepFailure>) -> Option<T> {
    match outcome {
        Ok(value) => {
            info!(step, "step finished");
            Some(value)
        }
        Err(error) => {
            warn!(step, error = %error, "step failed");
            println!("❌ {}", error);
            failures.push(StepFailure { step, error });
            None
        }
    }
}

/// Runs every analysis step over an already loaded dataset, then prints the digest.
pub fn run<R: Renderer>(dataset: &mut Dataset, renderer: &R, out_dir: &Path) -> RunReport {
    let mut failures = Vec::new();

    inspector::inspect(dataset);
    let profile = settle(
        "demographics",
        demographics::analyze(dataset, renderer, out_dir),
        &mut failures,
    );
    let regions = settle(
        "geography",
        geography::analyze(dataset, renderer, out_dir),
        &mut failures,
    );
    settle("temporal", temporal::analyze(renderer, out_dir), &mut failures);
    settle(
        "content",
        content::analyze(dataset, renderer, out_dir),
        &mut failures,
    );

    let summary = Summary::from_aggregates(
        dataset.row_count() as u64,
        profile.as_ref(),
        regions.as_ref(),
        failures.len(),
    );
    summary.print();
    RunReport { failures, summary }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::chart::testing::RecordingRenderer;
    use crate::config::AnalysisConfig;
    use crate::csv_reader;

    const HEADER: &str = "SEXO;FAIXA ETÁRIA;INSTRUCAO;ESTADO CIVIL;UF;SUGESTAO.TEXTO";

    fn write_input(dir: &Path, body: &str) -> AnalysisConfig {
        let text = format!("{}\n{}", HEADER, body);
        let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(&text);
        let path = dir.join("dados_constituinte.csv");
        fs::write(&path, bytes).unwrap();
        AnalysisConfig {
            input_path: path,
            output_dir: dir.to_path_buf(),
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn full_run_writes_all_four_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_input(
            dir.path(),
            "MASCULINO;30 A 39 ANOS;SUPERIOR;CASADO;SP;Reforma agrária e educação pública\n\
             FEMININO;20 A 24 ANOS;SEGUNDO GRAU;SOLTEIRO;RJ;Mais escolas e educação\n\
             NA;;;NA;SP;NA\n",
        );
        let mut dataset = csv_reader::load(&config).unwrap();
        let renderer = RecordingRenderer::default();
        let report = run(&mut dataset, &renderer, &config.output_dir);

        assert!(report.failures.is_empty());
        assert_eq!(renderer.file_names(), Summary::expected_charts().map(String::from).to_vec());
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.top_region, Some(("SP".to_string(), 2)));
        for name in Summary::expected_charts() {
            assert!(dir.path().join(name).exists());
        }
    }

    #[test]
    fn empty_text_column_skips_only_the_word_chart() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_input(
            dir.path(),
            "MASCULINO;30 A 39 ANOS;SUPERIOR;CASADO;SP;\n\
             FEMININO;20 A 24 ANOS;SUPERIOR;SOLTEIRO;MG;NA\n",
        );
        let mut dataset = csv_reader::load(&config).unwrap();
        let renderer = RecordingRenderer::default();
        let report = run(&mut dataset, &renderer, &config.output_dir);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].step, "content");
        assert!(matches!(report.failures[0].error, AnalysisError::NoText));
        assert!(dir.path().join(demographics::FILE_NAME).exists());
        assert!(dir.path().join(geography::FILE_NAME).exists());
        assert!(dir.path().join(temporal::FILE_NAME).exists());
        assert!(!dir.path().join(content::FILE_NAME).exists());
        assert_eq!(report.summary.failed_steps, 1);
    }

    #[test]
    fn missing_demographic_columns_do_not_stop_later_steps() {
        let dir = tempfile::tempdir().unwrap();
        let mut dataset = Dataset::new(
            vec!["UF".to_string(), "SUGESTAO.TEXTO".to_string()],
            vec![vec![Some("BA".to_string()), Some("saneamento básico".to_string())]],
        );
        let renderer = RecordingRenderer::default();
        let report = run(&mut dataset, &renderer, dir.path());

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].step, "demographics");
        assert_eq!(
            renderer.file_names(),
            vec![
                geography::FILE_NAME.to_string(),
                temporal::FILE_NAME.to_string(),
                content::FILE_NAME.to_string(),
            ]
        );
        assert_eq!(report.summary.men, None);
    }
}
