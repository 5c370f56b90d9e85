// ============================================================================
// CRM Metrics - KPIs do pipeline e sincronização de metas
// ============================================================================
//
// O pipeline comercial (CRMPipeline) alimenta o `Actual` das metas mensais:
// cada status conta para as metas cujo nome casa com um dos padrões abaixo,
// dentro do período da meta.

use std::collections::HashMap;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::NotionDatabase;
use crate::models::crm::pipeline_status::*;
use crate::models::{CrmContact, DateRange, Goal, Kpi, PipelineKpis};
use crate::services::data_layer::NotionDataLayer;
use crate::utils::dates::{date_part, format_iso, month_range, parse_instant};
use crate::utils::normalization::fold_accents;
use crate::utils::{AppError, AppResult};

const COFFEE_OR_LATER: &[&str] = &[
    CAFE_AGENDADO,
    CAFE_EXECUTADO,
    PROPOSTA_ENVIADA,
    FOLLOW_UP_ATIVO,
    VENDA_FECHADA,
    VENDA_FINALIZADA,
];
const PROPOSAL_OR_LATER: &[&str] = &[PROPOSTA_ENVIADA, FOLLOW_UP_ATIVO, VENDA_FECHADA, VENDA_FINALIZADA];
const SALES: &[&str] = &[VENDA_FECHADA, VENDA_FINALIZADA];

/// Status -> padrões procurados em `Goal.Name` -> status contados
const GOAL_SYNC_MAP: &[(&str, &[&str], &[&str])] = &[
    (CONTATO_ATIVADO, &["Contatos Ativados"], &[CONTATO_ATIVADO]),
    (CAFE_AGENDADO, &["Cafés Agendados"], &[CAFE_AGENDADO]),
    (CAFE_EXECUTADO, &["Café Executado"], &[CAFE_EXECUTADO]),
    (PROPOSTA_ENVIADA, &["Propostas de Crescimento", "Propostas"], &[PROPOSTA_ENVIADA]),
    (VENDA_FINALIZADA, &["Vendas Feitas", "Vendas"], &[VENDA_FINALIZADA, VENDA_FECHADA]),
    (VENDA_FECHADA, &["Vendas Feitas", "Vendas"], &[VENDA_FECHADA, VENDA_FINALIZADA]),
];

/// `Math.round` do JavaScript (meio arredonda para cima, inclusive negativos)
fn js_round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn percentage(numerator: usize, denominator: usize) -> i64 {
    if denominator == 0 {
        return 0;
    }
    js_round(numerator as f64 / denominator as f64 * 100.0)
}

/// Dias entre o café e a última atualização de cada venda fechada (média arredondada)
fn average_sales_cycle(contacts: &[CrmContact]) -> i64 {
    let cycles: Vec<i64> = contacts
        .iter()
        .filter(|c| c.status == VENDA_FECHADA && !c.coffee_date.is_empty())
        .filter_map(|c| {
            let coffee = parse_instant(&c.coffee_date)?;
            let sale = parse_instant(&c.last_update)?;
            let days = (sale - coffee).num_milliseconds() as f64 / 86_400_000.0;
            Some(js_round(days))
        })
        .collect();

    if cycles.is_empty() {
        return 0;
    }
    js_round(cycles.iter().sum::<i64>() as f64 / cycles.len() as f64)
}

pub fn pipeline_kpis(contacts: &[CrmContact]) -> PipelineKpis {
    let count = |statuses: &[&str]| contacts.iter().filter(|c| c.has_status(statuses)).count();

    let total = contacts.len();
    let coffee_or_later = count(COFFEE_OR_LATER);
    let proposals = count(PROPOSAL_OR_LATER);
    let sales = count(SALES);

    PipelineKpis {
        total_leads: total,
        // Todo registro passou por "Contato Ativado"
        conversion_activated_to_coffee: percentage(coffee_or_later, total),
        conversion_coffee_to_proposal: percentage(proposals, coffee_or_later),
        conversion_proposal_to_sale: percentage(sales, proposals),
        average_sales_cycle: average_sales_cycle(contacts),
    }
}

/// Status do pipeline que alimentam um KPI, pelo nome (sem acento/caixa)
pub fn statuses_for_kpi_name(name: &str) -> Option<&'static [&'static str]> {
    let key = fold_accents(name);

    if key.contains("contatos ativados") {
        Some(&[CONTATO_ATIVADO])
    } else if key.contains("cafes agendados") || key.contains("cafe agendado") {
        Some(&[CAFE_AGENDADO])
    } else if key.contains("cafes executados") || key.contains("cafe executado") {
        Some(&[CAFE_EXECUTADO])
    } else if key.contains("propostas") {
        Some(&[PROPOSTA_ENVIADA])
    } else if key.contains("vendas") {
        Some(&[VENDA_FINALIZADA, VENDA_FECHADA])
    } else {
        None
    }
}

/// Período da meta: PeriodStart/PeriodEnd, senão o mês de Year/Month
pub fn goal_range(goal: &Goal) -> Option<DateRange> {
    if let (Some(start), Some(end)) = (date_part(&goal.period_start), date_part(&goal.period_end)) {
        return Some(DateRange::new(format_iso(start), format_iso(end)));
    }

    if goal.year > 0.0 && goal.month > 0.0 {
        let (start, end) = month_range(goal.year as i32, goal.month as u32)?;
        return Some(DateRange::new(format_iso(start), format_iso(end)));
    }

    None
}

/// Meta mensal cujo nome contém algum dos padrões (sem diferenciar maiúsculas)
fn goal_matches(goal: &Goal, patterns: &[&str]) -> bool {
    if !goal.is_monthly() {
        return false;
    }
    let name = goal.name.to_lowercase();
    patterns.iter().any(|p| name.contains(&p.to_lowercase()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Atualiza `Actual` das metas mensais ligadas ao pipeline
///
/// Falha de uma meta é registrada e não interrompe as demais.
pub async fn sync_all_crm_goals(layer: &NotionDataLayer) -> AppResult<SyncSummary> {
    let goals = layer.get_goals(None).await?;
    let date_property = layer.ensure_pipeline_date_property().await?;

    let mut summary = SyncSummary::default();

    // Meta que casa com mais de um status fica com o último da lista
    let mut owner: HashMap<&str, usize> = HashMap::new();
    for (idx, (_, patterns, _)) in GOAL_SYNC_MAP.iter().enumerate() {
        for goal in goals.iter().filter(|g| goal_matches(g, patterns)) {
            owner.insert(goal.id.as_str(), idx);
        }
    }

    for (idx, (status, patterns, statuses)) in GOAL_SYNC_MAP.iter().enumerate() {
        let relevant: Vec<&Goal> = goals.iter().filter(|g| goal_matches(g, patterns)).collect();

        if relevant.is_empty() {
            info!("ℹ️ Nenhuma meta encontrada para o status \"{}\"", status);
            continue;
        }

        for goal in relevant {
            if owner.get(goal.id.as_str()) != Some(&idx) {
                summary.skipped += 1;
                continue;
            }

            let Some(range) = goal_range(goal) else {
                info!("ℹ️ Meta \"{}\" ignorada (sem período)", goal.name);
                summary.skipped += 1;
                continue;
            };

            let result = async {
                let count = layer.count_pipeline_by_status_and_date(statuses, &range).await?;
                layer.update_goal_actual(&goal.id, count as f64).await?;
                Ok::<_, AppError>(count)
            }
            .await;

            match result {
                Ok(count) => {
                    summary.updated += 1;
                    info!(
                        "✅ Meta \"{}\" ({}) atualizada: {} {} (data: {})",
                        goal.name, goal.id, count, status, date_property
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("⚠️ Erro ao sincronizar meta {}: {}", goal.id, e);
                }
            }
        }
    }

    info!(
        "🔄 Sincronização CRM -> metas: {} atualizadas, {} ignoradas, {} com erro",
        summary.updated, summary.skipped, summary.failed
    );
    Ok(summary)
}

/// Preenche `Actual` das metas ligadas a KPIs do CRM com a contagem do pipeline
///
/// Sem database de pipeline configurado as metas voltam como estão.
pub async fn enrich_goals_with_pipeline(layer: &NotionDataLayer, goals: Vec<Goal>, kpis: &[Kpi]) -> AppResult<Vec<Goal>> {
    if layer.db_id(NotionDatabase::CrmPipeline).is_err() {
        return Ok(goals);
    }
    layer.ensure_pipeline_date_property().await?;

    let enriched = goals.into_iter().map(|mut goal| async move {
        let statuses = kpis
            .iter()
            .find(|k| !goal.kpi.is_empty() && k.id == goal.kpi)
            .and_then(|k| statuses_for_kpi_name(&k.name));
        let (Some(statuses), Some(range)) = (statuses, goal_range(&goal)) else {
            return goal;
        };

        match layer.count_pipeline_by_status_and_date(statuses, &range).await {
            Ok(count) => goal.actual = count as f64,
            Err(e) => warn!("⚠️ Erro ao contar pipeline para a meta {}: {}", goal.id, e),
        }
        goal
    });

    Ok(join_all(enriched).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_layer::test_support::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use notion::Page;
    use serde_json::json;

    fn contact(status: &str, coffee: &str, last_update: &str) -> CrmContact {
        CrmContact {
            id: "c".into(),
            name: "n".into(),
            company: String::new(),
            status: status.into(),
            coffee_date: coffee.into(),
            proposal_date: String::new(),
            last_update: last_update.into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_pipeline_kpis() {
        let contacts = vec![
            contact(CONTATO_ATIVADO, "", ""),
            contact(CONTATO_ATIVADO, "", ""),
            contact(CAFE_AGENDADO, "", ""),
            contact(PROPOSTA_ENVIADA, "", ""),
            contact(VENDA_FECHADA, "2026-01-01", "2026-01-11"),
            contact(VENDA_FINALIZADA, "2026-01-01", "2026-03-01"),
        ];

        let kpis = pipeline_kpis(&contacts);
        assert_eq!(kpis.total_leads, 6);
        // 4 de 6 chegaram ao café
        assert_eq!(kpis.conversion_activated_to_coffee, 67);
        // 3 de 4
        assert_eq!(kpis.conversion_coffee_to_proposal, 75);
        // 2 de 3
        assert_eq!(kpis.conversion_proposal_to_sale, 67);
        // só Venda Fechada entra no ciclo
        assert_eq!(kpis.average_sales_cycle, 10);
    }

    #[test]
    fn test_pipeline_kpis_empty() {
        let kpis = pipeline_kpis(&[]);
        assert_eq!(kpis.total_leads, 0);
        assert_eq!(kpis.conversion_activated_to_coffee, 0);
        assert_eq!(kpis.average_sales_cycle, 0);
    }

    #[test]
    fn test_sales_cycle_skips_unparseable_dates() {
        let contacts = vec![
            contact(VENDA_FECHADA, "2026-01-01", ""),
            contact(VENDA_FECHADA, "2026-01-01", "2026-01-04"),
            contact(VENDA_FECHADA, "", "2026-01-04"),
        ];
        assert_eq!(pipeline_kpis(&contacts).average_sales_cycle, 3);
    }

    #[test]
    fn test_statuses_for_kpi_name() {
        assert_eq!(statuses_for_kpi_name("Contatos Ativados"), Some(&[CONTATO_ATIVADO][..]));
        assert_eq!(statuses_for_kpi_name("CAFÉS AGENDADOS (mês)"), Some(&[CAFE_AGENDADO][..]));
        assert_eq!(statuses_for_kpi_name("Cafe executado"), Some(&[CAFE_EXECUTADO][..]));
        assert_eq!(statuses_for_kpi_name("Propostas de Crescimento"), Some(&[PROPOSTA_ENVIADA][..]));
        assert_eq!(
            statuses_for_kpi_name("Vendas Feitas"),
            Some(&[VENDA_FINALIZADA, VENDA_FECHADA][..])
        );
        assert_eq!(statuses_for_kpi_name("Receita"), None);
    }

    fn goal(value: serde_json::Value) -> Goal {
        let page: Page = serde_json::from_value(value).unwrap();
        Goal::from_page(&page)
    }

    #[test]
    fn test_goal_range() {
        let explicit = goal(json!({
            "id": "g1",
            "properties": {
                "PeriodStart": { "type": "date", "date": { "start": "2026-02-01" } },
                "PeriodEnd": { "type": "date", "date": { "start": "2026-02-28T23:59:00.000Z" } }
            }
        }));
        assert_eq!(goal_range(&explicit), Some(DateRange::new("2026-02-01", "2026-02-28")));

        let monthly = goal(json!({
            "id": "g2",
            "properties": {
                "Year": { "type": "number", "number": 2024 },
                "Month": { "type": "number", "number": 2 }
            }
        }));
        assert_eq!(goal_range(&monthly), Some(DateRange::new("2024-02-01", "2024-02-29")));

        let none = goal(json!({ "id": "g3", "properties": {} }));
        assert_eq!(goal_range(&none), None);
    }

    #[tokio::test]
    async fn test_sync_updates_each_goal_once() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/databases/{}/query", GOALS_DB));
                then.status(200).json_body(json!({
                    "results": [
                        {
                            "id": "g-vendas",
                            "properties": {
                                "Name": { "type": "title", "title": [{ "plain_text": "Vendas Feitas - Março" }] },
                                "Year": { "type": "number", "number": 2026 },
                                "Month": { "type": "number", "number": 3 }
                            }
                        },
                        {
                            "id": "g-anual",
                            "properties": {
                                "Name": { "type": "title", "title": [{ "plain_text": "Vendas 2026" }] },
                                "Year": { "type": "number", "number": 2026 }
                            }
                        }
                    ],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/databases/{}", CRM_DB));
                then.status(200).json_body(json!({
                    "id": CRM_DB,
                    "properties": { "LastUpdate": { "type": "date" } }
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/databases/{}/query", CRM_DB));
                then.status(200).json_body(json!({
                    "results": [{ "id": "x", "properties": {} }],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/pages/g-vendas")
                    .json_body(json!({ "properties": { "Actual": { "number": 1.0 } } }));
                then.status(200).json_body(json!({ "id": "g-vendas", "properties": {} }));
            })
            .await;

        let summary = sync_all_crm_goals(&layer(&server)).await.unwrap();

        update.assert_hits_async(1).await;
        assert_eq!(summary.updated, 1);
        // a mesma meta aparece de novo para "Venda Fechada"
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_sync_overlapping_goal_uses_last_matching_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(format!("/databases/{}/query", GOALS_DB));
                then.status(200).json_body(json!({
                    "results": [{
                        "id": "g-mista",
                        "properties": {
                            "Name": { "type": "title", "title": [{ "plain_text": "Propostas e Vendas - Março" }] },
                            "Year": { "type": "number", "number": 2026 },
                            "Month": { "type": "number", "number": 3 }
                        }
                    }],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/databases/{}", CRM_DB));
                then.status(200).json_body(json!({
                    "id": CRM_DB,
                    "properties": { "LastUpdate": { "type": "date" } }
                }));
            })
            .await;
        let sales_query = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(format!("/databases/{}/query", CRM_DB))
                    .json_body_partial(
                        r#"{ "filter": { "and": [
                            { "or": [
                                { "property": "Status", "select": { "equals": "Venda Fechada" } },
                                { "property": "Status", "select": { "equals": "Venda Finalizada" } }
                            ] },
                            { "property": "LastUpdate", "date": { "on_or_after": "2026-03-01" } },
                            { "property": "LastUpdate", "date": { "on_or_before": "2026-03-31" } }
                        ] } }"#,
                    );
                then.status(200).json_body(json!({
                    "results": [{ "id": "a", "properties": {} }, { "id": "b", "properties": {} }],
                    "has_more": false,
                    "next_cursor": null
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/pages/g-mista")
                    .json_body(json!({ "properties": { "Actual": { "number": 2.0 } } }));
                then.status(200).json_body(json!({ "id": "g-mista", "properties": {} }));
            })
            .await;

        let summary = sync_all_crm_goals(&layer(&server)).await.unwrap();

        sales_query.assert_hits_async(1).await;
        update.assert_hits_async(1).await;
        assert_eq!(summary, SyncSummary { updated: 1, skipped: 2, failed: 0 });
    }
}
