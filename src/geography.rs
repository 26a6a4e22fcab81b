use std::path::Path;

use crate::chart::{set3_spread, BarChart, Chart, Figure, Orientation, Renderer};
use crate::config::FigureSize;
use crate::console::{print_section, thousands, SECTION_WIDTH};
use crate::dataset::{percentage, Dataset, ValueCounts, NOT_INFORMED, REGION};
use crate::error::Result;

pub const FILE_NAME: &'static str = "distribuicao_geografica.png";
pub const CHART_TOP: usize = 10;
pub const PRINT_TOP: usize = 5;

const FIGURE_SIZE: FigureSize = FigureSize::new(12.0, 6.0);

/// Region counts after normalization; ties keep first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionRanking {
    pub total: u64,
    pub counts: ValueCounts,
}

impl RegionRanking {
    pub fn compute(dataset: &mut Dataset) -> Result<Self> {
        dataset.fill_missing(REGION, NOT_INFORMED)?;
        Ok(RegionRanking {
            total: dataset.row_count() as u64,
            counts: dataset.value_counts(REGION)?,
        })
    }

    pub fn top(&self) -> &[(String, u64)] {
        self.counts.top(CHART_TOP)
    }

    pub fn leader(&self) -> Option<&(String, u64)> {
        self.counts.first()
    }

    /// `(rank, label, count, percent)` for the printed leaderboard.
    pub fn leaderboard(&self) -> Vec<(usize, &str, u64, f64)> {
        self.counts
            .top(PRINT_TOP)
            .iter()
            .enumerate()
            .map(|(i, (label, count))| (i + 1, label.as_str(), *count, percentage(*count, self.total)))
            .collect()
    }

    pub fn figure(&self) -> Figure {
        let bars = self.top().to_vec();
        let mut chart = BarChart::new("TOP 10 ESTADOS COM MAIS SUGESTÕES", bars, Orientation::Vertical);
        chart.colors = set3_spread(chart.bars.len());
        chart.x_label = Some("Estado".to_string());
        chart.y_label = Some("Número de Sugestões".to_string());
        chart.grid = true;
        Figure::single(FILE_NAME, FIGURE_SIZE, Chart::Bar(chart))
    }
}

pub fn analyze<R: Renderer>(dataset: &mut Dataset, renderer: &R, out_dir: &Path) -> Result<RegionRanking> {
    print_section("🗺️ ANÁLISE GEOGRÁFICA", SECTION_WIDTH);
    let ranking = RegionRanking::compute(dataset)?;
    renderer.render(&ranking.figure(), out_dir)?;

    println!("\n🏆 TOP {} ESTADOS MAIS ENGAJADOS:", PRINT_TOP);
    for (rank, state, count, pct) in ranking.leaderboard() {
        println!("  {}. {}: {} sugestões ({:.1}%)", rank, state, thousands(count), pct);
    }
    Ok(ranking)
}
