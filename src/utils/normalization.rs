//! Normalização de texto para comparações de nomes
//!
//! - `fold_accents`: remove acentos (NFKD) e converte para lowercase
//! - `normalize_kpi_name`: chave de agrupamento de KPIs duplicados
//! - `similarity`: Jaro-Winkler sobre as formas normalizadas (busca de contatos)

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Remove acentos e converte para lowercase, preservando pontuação e espaços
///
/// # Exemplos
/// ```
/// use frtech_os::utils::normalization::fold_accents;
///
/// assert_eq!(fold_accents("Cafés Agendados"), "cafes agendados");
/// assert_eq!(fold_accents("Ação"), "acao");
/// ```
pub fn fold_accents(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Trim, lowercase e espaços internos colapsados
///
/// Acentos são mantidos: "Café" e "Cafe" são KPIs diferentes.
pub fn normalize_kpi_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Forma usada na busca: sem acentos, só alfanuméricos e espaços simples
pub fn normalize_string(input: &str) -> String {
    fold_accents(input)
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similaridade (0.0 a 1.0) entre a consulta e um nome
///
/// Substring exata após normalização vale 1.0.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let q = normalize_string(query);
    let c = normalize_string(candidate);

    if q.is_empty() || c.is_empty() {
        return 0.0;
    }
    if c.contains(&q) {
        return 1.0;
    }

    // Melhor entre o nome inteiro e cada palavra (ex: "ana" vs "Mariana Souza")
    c.split_whitespace()
        .map(|word| strsim::jaro_winkler(&q, word))
        .fold(strsim::jaro_winkler(&q, &c), f64::max)
}
