//! Operações de manutenção dos databases do Notion
//!
//! Usadas pela rota admin `POST /api/admin/maintenance/dedupe-kpis` e pelo
//! binário `notion-maintenance` (dedupe, rename e carga em lote).

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::models::Kpi;
use crate::services::data_layer::{DatabaseInfo, NotionDataLayer};
use crate::utils::normalization::normalize_kpi_name;
use crate::utils::{AppError, AppResult};

/// Pausa padrão entre arquivamentos (fica abaixo do rate limit de ~3 req/s)
pub const DEFAULT_DEDUP_PAUSE: Duration = Duration::from_millis(300);

/// Pausa padrão entre criações na carga em lote
pub const DEFAULT_BULK_PAUSE: Duration = Duration::from_millis(350);

/// KPIs com o mesmo nome normalizado
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DedupGroup {
    pub key: String,
    pub keep: Kpi,
    pub remove: Vec<Kpi>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupOutcome {
    pub archived: usize,
    pub failed: usize,
}

/// `a` deve ser mantido no lugar de `b`? (maior SortOrder, depois ativo)
fn preferred(a: &Kpi, b: &Kpi) -> bool {
    if a.sort_order != b.sort_order {
        return a.sort_order > b.sort_order;
    }
    a.active && !b.active
}

/// Agrupa duplicados na ordem em que aparecem; empate fica com o primeiro visto
///
/// KPIs sem nome formam um grupo próprio (chave vazia).
pub fn plan_kpi_dedup(kpis: &[Kpi]) -> Vec<DedupGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Kpi>> = HashMap::new();

    for kpi in kpis {
        let key = normalize_kpi_name(&kpi.name);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(kpi);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let members = groups.remove(&key)?;
            if members.len() < 2 {
                return None;
            }

            let keep_idx = (1..members.len()).fold(0, |best, i| {
                if preferred(members[i], members[best]) {
                    i
                } else {
                    best
                }
            });

            let remove = members
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != keep_idx)
                .map(|(_, k)| (*k).clone())
                .collect();

            Some(DedupGroup {
                key,
                keep: members[keep_idx].clone(),
                remove,
            })
        })
        .collect()
}

/// Arquiva os KPIs marcados para remoção, com pausa entre cada chamada
pub async fn apply_kpi_dedup(layer: &NotionDataLayer, plan: &[DedupGroup], pause: Duration) -> DedupOutcome {
    let mut outcome = DedupOutcome::default();
    let mut first = true;

    for group in plan {
        for kpi in &group.remove {
            if !first && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            first = false;

            match layer.client().archive_page(&kpi.id).await {
                Ok(_) => {
                    outcome.archived += 1;
                    info!("🗑️ KPI duplicado arquivado: \"{}\" ({})", kpi.name, kpi.id);
                }
                Err(e) => {
                    outcome.failed += 1;
                    error!("❌ Erro ao arquivar KPI {}: {}", kpi.id, e);
                }
            }
        }
    }

    info!(
        "✅ Deduplicação concluída: {} arquivados, {} com erro",
        outcome.archived, outcome.failed
    );
    outcome
}

/// Renomeia uma propriedade do database (`{ old: { name: new } }`)
pub async fn rename_property(layer: &NotionDataLayer, database_id: &str, old_name: &str, new_name: &str) -> AppResult<DatabaseInfo> {
    if old_name.trim().is_empty() || new_name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Property names must not be empty".to_string(),
        ));
    }

    let mut properties = serde_json::Map::new();
    properties.insert(old_name.to_string(), json!({ "name": new_name }));

    let info = layer
        .update_database_properties(database_id, &serde_json::Value::Object(properties))
        .await?;
    info!("✏️ Propriedade renomeada em {}: {} -> {}", database_id, old_name, new_name);
    Ok(info)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkCreateOutcome {
    /// IDs das páginas criadas, na ordem do arquivo
    pub created: Vec<String>,
    pub failed: usize,
}

/// Lê um array JSON de mapas de propriedades do Notion
///
/// ```json
/// [{ "Name": { "title": [{ "text": { "content": "Cafés Agendados" } }] } }]
/// ```
pub fn parse_bulk_records(raw: &str) -> AppResult<Vec<Map<String, Value>>> {
    let Value::Array(items) = serde_json::from_str::<Value>(raw)? else {
        return Err(AppError::ValidationError(
            "Expected a JSON array of property maps".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(props) => Ok(props),
            _ => Err(AppError::ValidationError(format!(
                "Record {} is not an object",
                i + 1
            ))),
        })
        .collect()
}

/// Cria uma página por registro, com pausa entre cada chamada
///
/// Falha de um registro é contada e não interrompe os demais.
pub async fn bulk_create_pages(
    layer: &NotionDataLayer,
    database_id: &str,
    records: &[Map<String, Value>],
    pause: Duration,
) -> BulkCreateOutcome {
    let mut outcome = BulkCreateOutcome::default();

    for (i, props) in records.iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        match layer.client().create_page(database_id, props.clone()).await {
            Ok(page) => {
                info!("✅ Registro {}/{} criado: {}", i + 1, records.len(), page.id);
                outcome.created.push(page.id);
            }
            Err(e) => {
                outcome.failed += 1;
                error!("❌ Erro ao criar registro {}: {}", i + 1, e);
            }
        }
    }

    info!(
        "📦 Carga em {} concluída: {} criados, {} com erro",
        database_id,
        outcome.created.len(),
        outcome.failed
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_layer::test_support::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use notion::Page;

    fn kpi(id: &str, name: &str, sort_order: f64, active: bool) -> Kpi {
        let page: Page = serde_json::from_value(json!({
            "id": id,
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": name }] },
                "SortOrder": { "type": "number", "number": sort_order },
                "Active": { "type": "checkbox", "checkbox": active }
            }
        }))
        .unwrap();
        Kpi::from_page(&page)
    }

    #[test]
    fn test_plan_keeps_highest_sort_order() {
        let kpis = vec![
            kpi("a", "Cafés Agendados", 1.0, true),
            kpi("b", "  cafés   agendados ", 5.0, false),
            kpi("c", "Vendas", 2.0, true),
        ];

        let plan = plan_kpi_dedup(&kpis);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].key, "cafés agendados");
        assert_eq!(plan[0].keep.id, "b");
        assert_eq!(plan[0].remove.iter().map(|k| k.id.as_str()).collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_plan_tie_breaks_active_then_first_seen() {
        let kpis = vec![
            kpi("a", "Propostas", 3.0, false),
            kpi("b", "Propostas", 3.0, true),
            kpi("c", "Propostas", 3.0, true),
        ];

        let plan = plan_kpi_dedup(&kpis);
        assert_eq!(plan[0].keep.id, "b");
        assert_eq!(plan[0].remove.len(), 2);
    }

    #[test]
    fn test_plan_without_duplicates_is_empty() {
        let kpis = vec![kpi("a", "Cafés", 1.0, true), kpi("b", "Cafes", 1.0, true)];
        assert!(plan_kpi_dedup(&kpis).is_empty());
    }

    #[test]
    fn test_plan_groups_unnamed_kpis() {
        let kpis = vec![kpi("a", "", 1.0, true), kpi("b", "   ", 2.0, true), kpi("c", "Vendas", 1.0, true)];

        let plan = plan_kpi_dedup(&kpis);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].key, "");
        assert_eq!(plan[0].keep.id, "b");
    }

    #[tokio::test]
    async fn test_apply_archives_removed_only() {
        let server = MockServer::start_async().await;
        let archive_a = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/pages/a")
                    .json_body(json!({ "archived": true }));
                then.status(200).json_body(json!({ "id": "a", "archived": true, "properties": {} }));
            })
            .await;
        let archive_b = server
            .mock_async(|when, then| {
                when.method(PATCH).path("/pages/b");
                then.status(200).json_body(json!({ "id": "b", "archived": true, "properties": {} }));
            })
            .await;

        let plan = plan_kpi_dedup(&[kpi("a", "X", 1.0, true), kpi("b", "X", 2.0, true)]);
        let outcome = apply_kpi_dedup(&layer(&server), &plan, Duration::ZERO).await;

        archive_a.assert_hits_async(1).await;
        archive_b.assert_hits_async(0).await;
        assert_eq!(outcome, DedupOutcome { archived: 1, failed: 0 });
    }

    #[tokio::test]
    async fn test_rename_property() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/databases/db-1")
                    .json_body(json!({ "properties": { "Nome": { "name": "Name" } } }));
                then.status(200).json_body(json!({ "id": "db-1", "properties": {} }));
            })
            .await;

        rename_property(&layer(&server), "db-1", "Nome", "Name").await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_parse_bulk_records() {
        let records = parse_bulk_records(
            r#"[{ "Name": { "title": [{ "text": { "content": "A" } }] } }, {}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].contains_key("Name"));

        let err = parse_bulk_records(r#"{ "Name": "A" }"#).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = parse_bulk_records(r#"[{}, 3]"#).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg == "Record 2 is not an object"));
    }

    #[tokio::test]
    async fn test_bulk_create_counts_partial_failures() {
        let server = MockServer::start_async().await;
        let mut created = Vec::new();
        for name in ["A", "C"] {
            let mock = server
                .mock_async(|when, then| {
                    when.method(POST).path("/pages").json_body(json!({
                        "parent": { "database_id": "goals-db" },
                        "properties": { "Name": { "title": [{ "text": { "content": name } }] } }
                    }));
                    then.status(200)
                        .json_body(json!({ "id": format!("page-{}", name), "properties": {} }));
                })
                .await;
            created.push(mock);
        }
        let rejected = server
            .mock_async(|when, then| {
                when.method(POST).path("/pages").json_body(json!({
                    "parent": { "database_id": "goals-db" },
                    "properties": { "Name": { "title": [{ "text": { "content": "B" } }] } }
                }));
                then.status(400).json_body(json!({
                    "object": "error",
                    "status": 400,
                    "code": "validation_error",
                    "message": "Target is expected to be number."
                }));
            })
            .await;

        let records = parse_bulk_records(
            r#"[
                { "Name": { "title": [{ "text": { "content": "A" } }] } },
                { "Name": { "title": [{ "text": { "content": "B" } }] } },
                { "Name": { "title": [{ "text": { "content": "C" } }] } }
            ]"#,
        )
        .unwrap();
        let outcome = bulk_create_pages(&layer(&server), "goals-db", &records, Duration::ZERO).await;

        for mock in &created {
            mock.assert_hits_async(1).await;
        }
        rejected.assert_hits_async(1).await;
        assert_eq!(outcome.created, vec!["page-A".to_string(), "page-C".to_string()]);
        assert_eq!(outcome.failed, 1);
    }
}
