use std::path::Path;

use crate::chart::{Chart, Figure, LineChart, Renderer, Rgb};
use crate::config::FigureSize;
use crate::console::{print_section, SECTION_WIDTH};
use crate::error::Result;

pub const FILE_NAME: &'static str = "evolucao_temporal.png";

const FIGURE_SIZE: FigureSize = FigureSize::new(10.0, 6.0);
const LINE_COLOR: Rgb = Rgb(0x6A, 0x05, 0x72);

/// Fixed sample series. The dataset carries no submission date, so nothing here is derived from it.
pub const ILLUSTRATIVE_SERIES: [(&'static str, u64); 6] = [
    ("Jan", 45),
    ("Fev", 78),
    ("Mar", 92),
    ("Abr", 65),
    ("Mai", 88),
    ("Jun", 72),
];

pub fn figure() -> Figure {
    let chart = LineChart {
        title: "EVOLUÇÃO DAS SUGESTÕES (EXEMPLO ILUSTRATIVO)".to_string(),
        x_label: Some("Meses".to_string()),
        y_label: Some("Número de Sugestões".to_string()),
        points: ILLUSTRATIVE_SERIES
            .iter()
            .map(|(month, value)| (month.to_string(), *value))
            .collect(),
        color: LINE_COLOR,
        markers: true,
        grid: true,
    };
    Figure::single(FILE_NAME, FIGURE_SIZE, Chart::Line(chart))
}

pub fn analyze<R: Renderer>(renderer: &R, out_dir: &Path) -> Result<()> {
    print_section("📅 ANÁLISE TEMPORAL", SECTION_WIDTH);
    println!("⏰ Criando gráfico temporal ilustrativo (dados de exemplo, não derivados do dataset)...");
    renderer.render(&figure(), out_dir)?;
    println!("✅ Gráfico temporal gerado com sucesso!");
    Ok(())
}
