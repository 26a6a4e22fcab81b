use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AnalysisConfig;
use crate::console::{rule, SECTION_WIDTH};
use crate::render::BitmapRenderer;

mod chart;
mod config;
mod console;
mod content;
mod csv_reader;
mod dataset;
mod demographics;
mod error;
mod geography;
mod inspector;
mod pipeline;
mod render;
mod summary;
mod temporal;

fn main() -> Result<(), Box<dyn Error>> {
    // diagnostics go to stderr; stdout carries the report
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = AnalysisConfig::load_from_dir(Path::new("."))?;
    info!(input = %config.input_path.display(), output = %config.output_dir.display(), "starting run");

    println!("🚀 INICIANDO ANÁLISE DOS DADOS DA CONSTITUINTE...\n");
    println!("🔍 ANALISANDO DADOS DA CONSTITUINTE DE 1986");
    println!("🕒 Início: {}", Local::now().format("%d/%m/%Y %H:%M:%S"));
    println!("{}", rule(SECTION_WIDTH));

    let Some(mut dataset) = csv_reader::load(&config) else {
        println!("❌ Não foi possível carregar os dados. Verifique o arquivo CSV.");
        return Ok(());
    };

    fs::create_dir_all(&config.output_dir)?;
    let renderer = BitmapRenderer::new(config.plot.clone());
    let report = pipeline::run(&mut dataset, &renderer, &config.output_dir);

    println!("\n🎉 ANÁLISE CONCLUÍDA COM SUCESSO!");
    println!(
        "📁 Os gráficos foram salvos como arquivos PNG em '{}'",
        config.output_dir.display()
    );
    if !report.failures.is_empty() {
        let steps: Vec<&str> = report.failures.iter().map(|f| f.step).collect();
        println!("⚠️ Etapas com falha: {}", steps.join(", "));
    }
    Ok(())
}
