use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::chart::{BarChart, Chart, Figure, Orientation, Renderer, Rgb};
use crate::config::FigureSize;
use crate::console::{print_section, SECTION_WIDTH};
use crate::dataset::{Dataset, ValueCounts, SUGGESTION_TEXT};
use crate::error::{AnalysisError, Result};

pub const FILE_NAME: &'static str = "palavras_frequentes.png";
pub const TOP_WORDS: usize = 5;

const FIGURE_SIZE: FigureSize = FigureSize::new(10.0, 6.0);
const BAR_COLOR: Rgb = Rgb(0x2E, 0x86, 0xAB);

/// Four or more Portuguese letters between word boundaries.
const WORD_PATTERN: &'static str = r"\b[a-záéíóúâêîôûãõç]{4,}\b";

const STOPWORDS: &'static [&'static str] = &[
    "que", "com", "para", "uma", "mais", "como", "sobre", "seus", "este", "esta", "ser",
    "seja", "são", "mas", "muito", "nosso", "nossa", "pelos", "pelas", "essa", "esse",
    "isso", "aquele", "aquela", "entre", "através", "quando", "porque", "todos", "anos",
    "povo", "brasil", "país", "pois", "nova", "tambem", "pelo", "ano", "deve", "está",
    "maior", "a", "também", "minha", "melhor", "todas", "sejam", "gostaria", "mesmo", "assim",
    "pela", "ter", "estão", "tem", "será", "serão", "tenha", "tenham", "nos", "nas", "num",
    "numa", "uns", "umas", "outros", "outras", "qual", "quais", "quem", "cada", "onde",
    "por", "porém", "entretanto", "contudo", "todavia", "logo", "portanto", "então", "desse",
    "dessa", "disso", "nesse", "nessa", "nisso", "aquilo", "quanto", "quantos", "quantas",
    "algum", "alguma", "alguns", "algumas", "todo", "toda", "outro", "outra", "vário",
    "vária", "vários", "várias", "certo", "certa", "certos", "certas", "qualquer", "quaisquer",
    "tal", "tais", "seu", "sua", "suas", "meu", "meus", "minhas", "teu", "tua", "teus",
    "tuas", "nossos", "nossas", "vosso", "vossa", "vossos", "vossas", "deles", "delas",
    "estes", "estas", "esses", "essas", "aqueles", "aquelas",
];

pub struct WordTokenizer {
    pattern: Regex,
    stopwords: HashSet<&'static str>,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        Ok(WordTokenizer {
            pattern: Regex::new(WORD_PATTERN)?,
            stopwords: STOPWORDS.iter().copied().collect(),
        })
    }

    /// Lowercases `text` and returns every word match, stopwords included.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token.to_lowercase().as_str())
    }

    pub fn content_words(&self, text: &str) -> Vec<String> {
        self.tokens(text)
            .into_iter()
            .filter(|token| !self.is_stopword(token))
            .collect()
    }
}

/// Most frequent content words; ties keep first occurrence in the text.
pub fn top_words(dataset: &Dataset, tokenizer: &WordTokenizer) -> Result<Vec<(String, u64)>> {
    let texts: Vec<&str> = dataset.column(SUGGESTION_TEXT)?.flatten().collect();
    if texts.is_empty() {
        return Err(AnalysisError::NoText);
    }
    let words = tokenizer.content_words(&texts.join(" "));
    debug!(texts = texts.len(), words = words.len(), "tokenized suggestions");
    if words.is_empty() {
        return Err(AnalysisError::NoTokens);
    }
    Ok(ValueCounts::from_values(words).top(TOP_WORDS).to_vec())
}

pub fn figure(top: &[(String, u64)]) -> Figure {
    let mut chart = BarChart::new(
        "TOP 5 PALAVRAS MAIS FREQUENTES NAS SUGESTÕES",
        top.to_vec(),
        Orientation::Horizontal,
    );
    chart.colors = vec![BAR_COLOR];
    chart.alpha = 0.8;
    chart.inverted = true;
    chart.x_label = Some("Frequência".to_string());
    Figure::single(FILE_NAME, FIGURE_SIZE, Chart::Bar(chart))
}

pub fn analyze<R: Renderer>(dataset: &Dataset, renderer: &R, out_dir: &Path) -> Result<Vec<(String, u64)>> {
    print_section("📝 ANÁLISE DE CONTEÚDO - TOP 5 PALAVRAS", SECTION_WIDTH);
    let tokenizer = WordTokenizer::new()?;
    let top = top_words(dataset, &tokenizer)?;

    println!("\n🔤 TOP {} PALAVRAS MAIS FREQUENTES:", TOP_WORDS);
    for (i, (word, freq)) in top.iter().enumerate() {
        println!("  {}. {}: {} ocorrências", i + 1, word.to_uppercase(), freq);
    }

    renderer.render(&figure(&top), out_dir)?;
    Ok(top)
}
