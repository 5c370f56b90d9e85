//! Datas no formato do Notion
//!
//! O Notion grava datas como `YYYY-MM-DD` ou RFC 3339. Tudo que chega pela
//! URL é validado como `YYYY-MM-DD`; "hoje" e "ontem" são calculados em UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::{AppError, AppResult};

static ISO_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("regex de data inválida")
});

/// Valida e parseia `YYYY-MM-DD`
pub fn parse_iso_date(value: &str) -> AppResult<NaiveDate> {
    if !ISO_DATE.is_match(value) {
        return Err(AppError::ValidationError(format!(
            "Invalid date '{}': expected YYYY-MM-DD",
            value
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError(format!("Invalid date '{}': expected YYYY-MM-DD", value))
    })
}

/// Parte de data de um valor do Notion (`2026-01-05` ou `2026-01-05T10:00:00.000Z`)
pub fn date_part(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Instante de um valor do Notion; datas sem hora valem meia-noite UTC
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn yesterday_utc() -> NaiveDate {
    today_utc() - Duration::days(1)
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Primeiro e último dia de um mês; `None` para mês fora de 1..=12
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

/// Semana ISO no formato `YYYY-Www` (ano da quinta-feira da semana)
pub fn week_key(date: NaiveDate) -> String {
    date.format("%G-W%V").to_string()
}

/// Mês corrente (1-12), usado em registros de ação
pub fn current_month() -> u32 {
    today_utc().month()
}
