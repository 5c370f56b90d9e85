// Handlers HTTP das rotas /api/*
pub mod actions;
pub mod admin;
pub mod contacts;
pub mod crm;
pub mod expansion;
pub mod goals;
pub mod health;
pub mod journal;
pub mod kpis;
pub mod leads;
pub mod produtos;
pub mod spa;

use crate::models::DateRange;

/// `?start&end` só vira filtro quando pelo menos um dos dois foi informado
pub(crate) fn range_filter(range: &DateRange) -> Option<&DateRange> {
    (range.start().is_some() || range.end().is_some()).then_some(range)
}
