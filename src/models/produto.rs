use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};

/// Produto do portfólio (database Produtos)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Produto {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub status: String,
    pub problema_que_resolve: String,
    pub preco_minimo: f64,
    pub preco_ideal: f64,
    pub tipo: String,
    pub tempo_medio_entrega: f64,
    pub dependencia_fundador: String,
    pub replicabilidade: String,
    pub prioridade_estrategica: f64,
}

impl Produto {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            status: extract_select(page.property("Status")),
            problema_que_resolve: extract_text(page.property("ProblemaQueResolve")),
            preco_minimo: extract_number(page.property("PrecoMinimo")),
            preco_ideal: extract_number(page.property("PrecoIdeal")),
            tipo: extract_select(page.property("Tipo")),
            tempo_medio_entrega: extract_number(page.property("TempoMedioEntrega")),
            dependencia_fundador: extract_select(page.property("DependenciaFundador")),
            replicabilidade: extract_select(page.property("Replicabilidade")),
            prioridade_estrategica: extract_number(page.property("PrioridadeEstrategica")),
        }
    }
}
