use std::path::Path;

use tracing::debug;

use crate::chart::{BarChart, Chart, Figure, Orientation, PieChart, Renderer, Rgb, LIGHT_GREEN, SKY_BLUE};
use crate::config::FigureSize;
use crate::console::{print_section, thousands, SECTION_WIDTH};
use crate::dataset::{
    percentage, Dataset, ValueCounts, AGE_BRACKET, AGE_BRACKETS, EDUCATION, FEMALE, MALE,
    MARITAL_STATUS, NOT_INFORMED, SEX,
};
use crate::error::Result;

pub const FILE_NAME: &'static str = "perfil_demografico.png";
pub const EDUCATION_TOP: usize = 8;
pub const MARITAL_TOP: usize = 6;

const FIGURE_SIZE: FigureSize = FigureSize::new(15.0, 12.0);
const SEX_LABELS: [(&'static str, &'static str); 3] =
    [(MALE, "Homens"), (FEMALE, "Mulheres"), (NOT_INFORMED, "Sexo não informado")];
const SEX_COLORS: [Rgb; 3] = [Rgb(0xFF, 0x6B, 0x6B), Rgb(0x4E, 0xCD, 0xC4), Rgb(0x95, 0xA5, 0xA6)];
const MARITAL_COLORS: [Rgb; 6] = [
    Rgb(0xFF, 0x9F, 0xF3),
    Rgb(0xF3, 0x68, 0xE0),
    Rgb(0xFF, 0x9F, 0x43),
    Rgb(0x10, 0xAC, 0x84),
    Rgb(0x54, 0xA0, 0xFF),
    Rgb(0x5F, 0x27, 0xCD),
];

/// Normalized frequency tables for the four demographic columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographicProfile {
    pub total: u64,
    pub sex: ValueCounts,
    pub age: ValueCounts,
    pub education: ValueCounts,
    pub marital: ValueCounts,
}

impl DemographicProfile {
    /// Fills missing cells of each column with [`NOT_INFORMED`] before counting it.
    pub fn compute(dataset: &mut Dataset) -> Result<Self> {
        let mut normalized = |column: &str| -> Result<ValueCounts> {
            let filled = dataset.fill_missing(column, NOT_INFORMED)?;
            let counts = dataset.value_counts(column)?;
            debug!(column, filled, categories = counts.len(), "normalized missing values");
            Ok(counts)
        };
        let sex = normalized(SEX)?;
        let age = normalized(AGE_BRACKET)?;
        let education = normalized(EDUCATION)?;
        let marital = normalized(MARITAL_STATUS)?;
        Ok(DemographicProfile {
            total: dataset.row_count() as u64,
            sex,
            age,
            education,
            marital,
        })
    }

    /// Age counts in canonical bracket order, always eight entries.
    pub fn age_by_bracket(&self) -> Vec<(String, u64)> {
        self.age.reindex(&AGE_BRACKETS)
    }

    pub fn sex_share(&self, label: &str) -> (u64, f64) {
        let count = self.sex.get(label);
        (count, percentage(count, self.total))
    }

    pub fn figure(&self) -> Figure {
        let sex = Chart::Pie(PieChart {
            title: "Distribuição por Sexo".to_string(),
            slices: self.sex.entries().to_vec(),
            colors: SEX_COLORS.to_vec(),
            start_angle: 90.0,
        });

        let mut age = BarChart::new("Distribuição por Faixa Etária", self.age_by_bracket(), Orientation::Vertical);
        age.colors = vec![SKY_BLUE];
        age.alpha = 0.8;
        age.rotate_labels = true;

        let mut education = BarChart::new(
            "Distribuição por Escolaridade",
            self.education.top(EDUCATION_TOP).to_vec(),
            Orientation::Horizontal,
        );
        education.colors = vec![LIGHT_GREEN];
        education.alpha = 0.8;

        let marital = Chart::Pie(PieChart {
            title: "Distribuição por Estado Civil".to_string(),
            slices: self.marital.top(MARITAL_TOP).to_vec(),
            colors: MARITAL_COLORS.to_vec(),
            start_angle: 90.0,
        });

        Figure {
            file_name: FILE_NAME.to_string(),
            title: Some("PERFIL DEMOGRÁFICO DOS PARTICIPANTES".to_string()),
            size: FIGURE_SIZE,
            grid: (2, 2),
            panels: vec![sex, Chart::Bar(age), Chart::Bar(education), marital],
        }
    }

    /// One line per sex category with its share of all rows. Unexpected
    /// categories follow the three known ones under their raw label.
    pub fn details(&self) -> Vec<String> {
        let line = |name: &str, label: &str| {
            let (count, pct) = self.sex_share(label);
            format!("• {}: {} ({:.1}%)", name, thousands(count), pct)
        };
        let mut lines: Vec<String> = SEX_LABELS.iter().map(|(label, name)| line(*name, *label)).collect();
        lines.extend(
            self.sex
                .entries()
                .iter()
                .filter(|(label, _)| SEX_LABELS.iter().all(|(known, _)| known != label))
                .map(|(label, _)| line(label.as_str(), label.as_str())),
        );
        lines
    }

    fn print_details(&self) {
        println!("\n📊 ESTATÍSTICAS DETALHADAS:");
        for line in self.details() {
            println!("{}", line);
        }
    }
}

pub fn analyze<R: Renderer>(dataset: &mut Dataset, renderer: &R, out_dir: &Path) -> Result<DemographicProfile> {
    print_section("👥 ANÁLISE DEMOGRÁFICA", SECTION_WIDTH);
    let profile = DemographicProfile::compute(dataset)?;
    renderer.render(&profile.figure(), out_dir)?;
    profile.print_details();
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::testing::RecordingRenderer;

    fn cell(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn survey() -> Dataset {
        let headers = [SEX, AGE_BRACKET, EDUCATION, MARITAL_STATUS]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut rows = vec![
            vec![cell(MALE), cell("20 A 24 ANOS"), cell("SUPERIOR"), cell("SOLTEIRO")],
            vec![cell(FEMALE), cell("20 A 24 ANOS"), cell("PRIMEIRO GRAU"), cell("CASADO")],
            vec![None, None, None, None],
        ];
        for i in 0..10 {
            rows.push(vec![
                cell(MALE),
                cell("30 A 39 ANOS"),
                cell(&format!("NIVEL {}", i)),
                cell(&format!("ESTADO {}", i)),
            ]);
        }
        Dataset::new(headers, rows)
    }

    #[test]
    fn every_column_accounts_for_all_rows() {
        let mut ds = survey();
        let profile = DemographicProfile::compute(&mut ds).unwrap();
        for counts in [&profile.sex, &profile.age, &profile.education, &profile.marital] {
            assert_eq!(counts.total(), 13);
        }
        assert_eq!(profile.sex.get(NOT_INFORMED), 1);
    }

    #[test]
    fn sex_shares_match_reference_example() {
        let mut ds = Dataset::new(
            vec![SEX.to_string(), AGE_BRACKET.to_string(), EDUCATION.to_string(), MARITAL_STATUS.to_string()],
            vec![
                vec![cell(MALE), None, None, None],
                vec![cell(FEMALE), None, None, None],
                vec![None, None, None, None],
            ],
        );
        let profile = DemographicProfile::compute(&mut ds).unwrap();
        let (count, pct) = profile.sex_share(MALE);
        assert_eq!(count, 1);
        assert_eq!(format!("{:.1}", pct), "33.3");
        assert_eq!(format!("{:.1}", profile.sex_share(NOT_INFORMED).1), "33.3");
    }

    #[test]
    fn details_report_every_sex_category_with_its_share() {
        let mut ds = Dataset::new(
            vec![SEX.to_string(), AGE_BRACKET.to_string(), EDUCATION.to_string(), MARITAL_STATUS.to_string()],
            vec![
                vec![cell(MALE), None, None, None],
                vec![cell(FEMALE), None, None, None],
                vec![None, None, None, None],
                vec![cell("OUTRO"), None, None, None],
            ],
        );
        let profile = DemographicProfile::compute(&mut ds).unwrap();
        assert_eq!(
            profile.details(),
            vec![
                "• Homens: 1 (25.0%)".to_string(),
                "• Mulheres: 1 (25.0%)".to_string(),
                "• Sexo não informado: 1 (25.0%)".to_string(),
                "• OUTRO: 1 (25.0%)".to_string(),
            ]
        );
    }

    #[test]
    fn age_panel_always_has_eight_ordered_bars() {
        let mut ds = survey();
        let profile = DemographicProfile::compute(&mut ds).unwrap();
        let figure = profile.figure();
        let Chart::Bar(age) = &figure.panels[1] else {
            panic!("age panel should be a bar chart");
        };
        let labels: Vec<&str> = age.bars.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, AGE_BRACKETS.to_vec());
        assert_eq!(age.bars[0].1, 0);
        assert_eq!(age.bars[3], ("30 A 39 ANOS".to_string(), 10));
        assert_eq!(age.bars[7], (NOT_INFORMED.to_string(), 1));
    }

    #[test]
    fn long_tails_are_dropped_from_the_chart_only() {
        let mut ds = survey();
        let profile = DemographicProfile::compute(&mut ds).unwrap();
        let figure = profile.figure();
        let (Chart::Bar(education), Chart::Pie(marital)) = (&figure.panels[2], &figure.panels[3]) else {
            panic!("unexpected panel layout");
        };
        assert_eq!(education.bars.len(), EDUCATION_TOP);
        assert_eq!(marital.slices.len(), MARITAL_TOP);
        assert_eq!(profile.education.len(), 13);
    }

    #[test]
    fn analyze_renders_one_panel_figure() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let mut ds = survey();
        analyze(&mut ds, &renderer, dir.path()).unwrap();
        assert_eq!(renderer.file_names(), vec![FILE_NAME.to_string()]);
        let figure = renderer.figure(FILE_NAME).unwrap();
        assert_eq!(figure.grid, (2, 2));
        assert_eq!(figure.panels.len(), 4);
        assert!(dir.path().join(FILE_NAME).exists());
    }

    #[test]
    fn missing_column_aborts_the_step() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = RecordingRenderer::default();
        let mut ds = Dataset::new(vec![SEX.to_string()], vec![vec![cell(MALE)]]);
        assert!(analyze(&mut ds, &renderer, dir.path()).is_err());
        assert!(renderer.file_names().is_empty());
    }
}
