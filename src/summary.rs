use crate::console::{print_section, thousands, SUMMARY_WIDTH};
use crate::dataset::{percentage, FEMALE, MALE};
use crate::demographics::{self, DemographicProfile};
use crate::geography::{self, RegionRanking};
use crate::{content, temporal};

const NOT_AVAILABLE: &'static str = "N/A";

/// Final digest, assembled from aggregates the earlier steps already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: u64,
    pub men: Option<u64>,
    pub women: Option<u64>,
    pub top_region: Option<(String, u64)>,
    pub top_age: Option<String>,
    pub failed_steps: usize,
}

impl Summary {
    pub fn from_aggregates(
        total: u64,
        profile: Option<&DemographicProfile>,
        regions: Option<&RegionRanking>,
        failed_steps: usize,
    ) -> Self {
        Summary {
            total,
            men: profile.map(|p| p.sex.get(MALE)),
            women: profile.map(|p| p.sex.get(FEMALE)),
            top_region: regions.and_then(|r| r.leader().cloned()),
            top_age: profile.and_then(|p| p.age.first().map(|(label, _)| label.clone())),
            failed_steps,
        }
    }

    fn share(&self, count: Option<u64>) -> String {
        match count {
            Some(n) => format!("{} ({:.1}%)", thousands(n), percentage(n, self.total)),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn statistics(&self) -> Vec<String> {
        let region = match &self.top_region {
            Some((label, count)) => format!("{} ({} sugestões)", label, thousands(*count)),
            None => NOT_AVAILABLE.to_string(),
        };
        vec![
            format!("Total de sugestões analisadas: {}", thousands(self.total)),
            format!("Participação masculina: {}", self.share(self.men)),
            format!("Participação feminina: {}", self.share(self.women)),
            format!("Estado mais engajado: {}", region),
            format!(
                "Faixa etária predominante: {}",
                self.top_age.as_deref().unwrap_or(NOT_AVAILABLE)
            ),
        ]
    }

    pub fn expected_charts() -> [&'static str; 4] {
        [
            demographics::FILE_NAME,
            geography::FILE_NAME,
            temporal::FILE_NAME,
            content::FILE_NAME,
        ]
    }

    pub fn print(&self) {
        print_section("📊 RESUMO FINAL DA ANÁLISE", SUMMARY_WIDTH);

        println!("\n🎯 PRINCIPAIS ESTATÍSTICAS:");
        for line in self.statistics() {
            println!("  • {}", line);
        }

        println!("\n📈 GRÁFICOS GERADOS:");
        for chart in Summary::expected_charts() {
            println!("  ✅ {}", chart);
        }

        println!("\n💡 INSIGHTS INICIAIS:");
        println!("  • Análise concluída com sucesso!");
        println!("  • Gráficos demográficos gerados");
        if self.failed_steps == 0 {
            println!("  • Dados processados sem interrupções");
        } else {
            println!("  • {} etapa(s) interrompida(s), ver mensagens acima", self.failed_steps);
        }
    }
}
