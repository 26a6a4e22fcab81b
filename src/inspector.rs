use crate::console::{print_section, SECTION_WIDTH};
use crate::dataset::{percentage, Dataset};

const PREVIEW_ROWS: usize = 5;

/// Columns with at least one missing cell: `(name, missing, percent)`.
pub fn missing_report(dataset: &Dataset) -> Vec<(&str, usize, f64)> {
    let total = dataset.row_count() as u64;
    dataset
        .missing_counts()
        .into_iter()
        .filter(|(_, missing)| *missing > 0)
        .map(|(name, missing)| (name, missing, percentage(missing as u64, total)))
        .collect()
}

fn preview_lines(dataset: &Dataset, rows: usize) -> Vec<String> {
    let mut lines = vec![dataset.columns().join(" | ")];
    lines.extend(dataset.rows().iter().take(rows).enumerate().map(|(idx, row)| {
        let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("NaN")).collect();
        format!("{} | {}", idx, cells.join(" | "))
    }));
    lines
}

pub fn inspect(dataset: &Dataset) {
    print_section("📋 ANÁLISE PRELIMINAR", SECTION_WIDTH);

    println!("\n🔍 Primeiras {} linhas:", PREVIEW_ROWS);
    for line in preview_lines(dataset, PREVIEW_ROWS) {
        println!("{}", line);
    }

    println!("\n📝 Colunas disponíveis:");
    for (i, column) in dataset.columns().iter().enumerate() {
        println!("  {:2}. {}", i + 1, column);
    }

    println!("\n📉 Valores faltantes:");
    for (column, missing, pct) in missing_report(dataset) {
        println!("  • {}: {} ({:.1}%)", column, missing, pct);
    }
}
