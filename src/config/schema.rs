//! Schema dos databases do Notion
//!
//! Nomes de propriedades precisam bater EXATAMENTE com o Notion. Usado pelo
//! health check (propriedades obrigatórias e tipos) e pela manutenção.

use serde::{Deserialize, Serialize};

use crate::config::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Select,
    MultiSelect,
    Date,
    Checkbox,
    Relation,
    Rollup,
    Formula,
    PhoneNumber,
    Email,
    Url,
}

impl PropertyKind {
    /// Nome do tipo como a API do Notion devolve em `property.type`
    pub fn as_notion_type(&self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Number => "number",
            PropertyKind::Select => "select",
            PropertyKind::MultiSelect => "multi_select",
            PropertyKind::Date => "date",
            PropertyKind::Checkbox => "checkbox",
            PropertyKind::Relation => "relation",
            PropertyKind::Rollup => "rollup",
            PropertyKind::Formula => "formula",
            PropertyKind::PhoneNumber => "phone_number",
            PropertyKind::Email => "email",
            PropertyKind::Url => "url",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub required: bool,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatabaseSchema {
    pub name: &'static str,
    pub env_var: &'static str,
    pub required: bool,
    pub properties: &'static [PropertySchema],
}

impl DatabaseSchema {
    pub fn property(&self, name: &str) -> Option<&'static PropertySchema> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn required_properties(&self) -> impl Iterator<Item = &'static PropertySchema> {
        self.properties.iter().filter(|p| p.required)
    }
}

/// Databases conhecidos pelo sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotionDatabase {
    Kpis,
    Goals,
    Actions,
    Journal,
    Contacts,
    Clients,
    CrmPipeline,
    Produtos,
    CoffeeDiagnostics,
    CustomerWins,
    ExpansionOpportunities,
    LeadGate,
    AxisLeads,
}

impl NotionDatabase {
    pub const ALL: [NotionDatabase; 13] = [
        NotionDatabase::Kpis,
        NotionDatabase::Goals,
        NotionDatabase::Actions,
        NotionDatabase::Journal,
        NotionDatabase::Contacts,
        NotionDatabase::Clients,
        NotionDatabase::CrmPipeline,
        NotionDatabase::Produtos,
        NotionDatabase::CoffeeDiagnostics,
        NotionDatabase::CustomerWins,
        NotionDatabase::ExpansionOpportunities,
        NotionDatabase::LeadGate,
        NotionDatabase::AxisLeads,
    ];

    pub fn schema(&self) -> &'static DatabaseSchema {
        match self {
            NotionDatabase::Kpis => &KPIS,
            NotionDatabase::Goals => &GOALS,
            NotionDatabase::Actions => &ACTIONS,
            NotionDatabase::Journal => &JOURNAL,
            NotionDatabase::Contacts => &CONTACTS,
            NotionDatabase::Clients => &CLIENTS,
            NotionDatabase::CrmPipeline => &CRM_PIPELINE,
            NotionDatabase::Produtos => &PRODUTOS,
            NotionDatabase::CoffeeDiagnostics => &COFFEE_DIAGNOSTICS,
            NotionDatabase::CustomerWins => &CUSTOMER_WINS,
            NotionDatabase::ExpansionOpportunities => &EXPANSION_OPPORTUNITIES,
            NotionDatabase::LeadGate => &LEAD_GATE,
            NotionDatabase::AxisLeads => &AXIS_LEADS,
        }
    }

    pub fn name(&self) -> &'static str {
        self.schema().name
    }

    pub fn env_var(&self) -> &'static str {
        self.schema().env_var
    }

    /// Chave em `notion.databases.*` no arquivo de configuração
    pub fn settings_key(&self) -> &'static str {
        match self {
            NotionDatabase::Kpis => "kpis",
            NotionDatabase::Goals => "goals",
            NotionDatabase::Actions => "actions",
            NotionDatabase::Journal => "journal",
            NotionDatabase::Contacts => "contacts",
            NotionDatabase::Clients => "clients",
            NotionDatabase::CrmPipeline => "crm_pipeline",
            NotionDatabase::Produtos => "produtos",
            NotionDatabase::CoffeeDiagnostics => "coffee_diagnostics",
            NotionDatabase::CustomerWins => "customer_wins",
            NotionDatabase::ExpansionOpportunities => "expansion_opportunities",
            NotionDatabase::LeadGate => "lead_gate",
            NotionDatabase::AxisLeads => "axis_leads",
        }
    }

    /// Busca por nome do schema (`KPIs`, `CRMPipeline`, ...), sem diferenciar maiúsculas
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|db| db.name().eq_ignore_ascii_case(name.trim()))
    }
}

pub fn schema_for(name: &str) -> Option<&'static DatabaseSchema> {
    NotionDatabase::from_name(name).map(|db| db.schema())
}

/// ID configurado para o database de nome `name`
pub fn database_id<'a>(settings: &'a Settings, name: &str) -> Option<&'a str> {
    NotionDatabase::from_name(name).and_then(|db| settings.notion.databases.get(db))
}

/// A propriedade existe no schema (e, se informado, tem o tipo esperado)?
pub fn validate_property(database: &str, property: &str, kind: Option<PropertyKind>) -> bool {
    schema_for(database)
        .and_then(|schema| schema.property(property))
        .map(|prop| kind.map_or(true, |k| prop.kind == k))
        .unwrap_or(false)
}

const fn prop(name: &'static str, kind: PropertyKind, required: bool, description: &'static str) -> PropertySchema {
    PropertySchema {
        name,
        kind,
        required,
        description,
    }
}

use PropertyKind::*;

static KPIS: DatabaseSchema = DatabaseSchema {
    name: "KPIs",
    env_var: "NOTION_DB_KPIS",
    required: true,
    properties: &[
        prop("Name", Title, true, "Nome do KPI"),
        prop("Category", Select, true, "Categoria do KPI"),
        prop("Periodicity", Select, true, "Periodicidade: Anual, Mensal, Trimestral, Semestral, Semanal, Diário"),
        prop("ChartType", Select, true, "Tipo de gráfico: line, bar, area, number"),
        prop("Unit", RichText, false, "Unidade de medida"),
        prop("TargetValue", Number, false, "Valor alvo (meta) do KPI"),
        prop("VisiblePublic", Checkbox, true, "Visível no dashboard público"),
        prop("VisibleAdmin", Checkbox, true, "Visível no admin"),
        prop("IsFinancial", Checkbox, true, "Indica se é KPI financeiro (R$)"),
        prop("SortOrder", Number, true, "Ordem de exibição"),
        prop("Active", Checkbox, true, "KPI ativo"),
        prop("Description", RichText, false, "Descrição do KPI"),
    ],
};

static GOALS: DatabaseSchema = DatabaseSchema {
    name: "Goals",
    env_var: "NOTION_DB_GOALS",
    required: true,
    properties: &[
        prop("Name", Title, true, "Nome da meta"),
        prop("KPI", Relation, true, "Relacionamento com KPI"),
        prop("Year", Number, true, "Ano da meta"),
        prop("Month", Number, false, "Mês da meta (1-12)"),
        prop("WeekKey", RichText, false, "Chave da semana (YYYY-WW)"),
        prop("PeriodStart", Date, true, "Início do período"),
        prop("PeriodEnd", Date, true, "Fim do período"),
        prop("Target", Number, true, "Valor alvo"),
        prop("Actions", Relation, false, "Ações relacionadas"),
        prop("Actual", Number, false, "Valor atual"),
        prop("ProgressPct", Formula, false, "Percentual de progresso"),
        prop("VisiblePublic", Checkbox, true, "Visível no dashboard público"),
        prop("VisibleAdmin", Checkbox, true, "Visível no admin"),
        prop("Notes", RichText, false, "Notas adicionais"),
    ],
};

static ACTIONS: DatabaseSchema = DatabaseSchema {
    name: "Actions",
    env_var: "NOTION_DB_ACTIONS",
    required: true,
    properties: &[
        prop("Name", Title, true, "Nome da ação"),
        prop("Type", Select, true, "Tipo: Café, Ativação de Rede, Proposta, Processo, Rotina, Automação, Agente, Diário"),
        prop("Date", Date, true, "Data da ação"),
        prop("Done", Checkbox, true, "Ação concluída"),
        prop("Contribution", Number, false, "Contribuição para a meta"),
        prop("Earned", Number, false, "Valor ganho (financeiro)"),
        prop("Goal", Relation, false, "Meta relacionada (OBRIGATÓRIO para concluir)"),
        prop("Contact", Relation, false, "Contato relacionado"),
        prop("Client", Relation, false, "Cliente relacionado"),
        prop("Proposal", Relation, false, "Proposta relacionada"),
        prop("Diagnostic", Relation, false, "Diagnóstico relacionado"),
        prop("WeekKey", RichText, false, "Chave da semana"),
        prop("Month", Number, false, "Mês (1-12)"),
        prop("Priority", Select, false, "Prioridade: Alta, Média, Baixa"),
        prop("PublicVisible", Checkbox, true, "Visível no dashboard público"),
        prop("Notes", RichText, false, "Notas adicionais"),
    ],
};

static JOURNAL: DatabaseSchema = DatabaseSchema {
    name: "Journal",
    env_var: "NOTION_DB_JOURNAL",
    required: true,
    properties: &[
        prop("Name", Title, true, "Nome do diário"),
        prop("Date", Date, true, "Data do diário"),
        prop("Filled", Checkbox, true, "Diário preenchido (LOCK se false para ontem)"),
        prop("Summary", RichText, false, "Resumo do dia"),
        prop("WhatWorked", RichText, false, "O que funcionou"),
        prop("WhatFailed", RichText, false, "O que falhou"),
        prop("Insights", RichText, false, "Insights"),
        prop("Objections", RichText, false, "Objeções"),
        prop("ProcessIdeas", RichText, false, "Ideias de processo"),
        prop("Tags", MultiSelect, false, "Tags"),
        prop("RelatedContact", Relation, false, "Contato relacionado"),
        prop("RelatedClient", Relation, false, "Cliente relacionado"),
        prop("Attachments", Relation, false, "Anexos"),
    ],
};

static CONTACTS: DatabaseSchema = DatabaseSchema {
    name: "Contacts",
    env_var: "NOTION_DB_CONTACTS",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome do contato"),
        prop("Company", RichText, false, "Empresa"),
        prop("Status", Select, false, "Status do pipeline"),
        prop("Segment", Select, false, "Segmento"),
        prop("City", Select, false, "Cidade"),
        prop("WhatsApp", PhoneNumber, false, "WhatsApp"),
        prop("Source", Select, false, "Origem"),
        prop("Priority", Select, false, "Prioridade"),
        prop("Notes", RichText, false, "Notas"),
    ],
};

static CLIENTS: DatabaseSchema = DatabaseSchema {
    name: "Clients",
    env_var: "NOTION_DB_CLIENTS",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome do cliente"),
        prop("Health", Select, false, "Saúde do cliente: Green, Yellow, Red"),
    ],
};

static CRM_PIPELINE: DatabaseSchema = DatabaseSchema {
    name: "CRMPipeline",
    env_var: "NOTION_DB_CRMPIPELINE",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome do contato"),
        prop("Company", RichText, false, "Empresa"),
        prop("Status", Select, false, "Status do pipeline"),
        prop("CoffeeDate", Date, false, "Data do café"),
        prop("ProposalDate", Date, false, "Data da proposta"),
        prop("LastUpdate", Date, false, "Última atualização"),
        prop("Notes", RichText, false, "Notas"),
    ],
};

static PRODUTOS: DatabaseSchema = DatabaseSchema {
    name: "Produtos",
    env_var: "NOTION_DB_PRODUTOS",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome do produto"),
        prop("Status", Select, false, "Status"),
        prop("ProblemaQueResolve", RichText, false, "Problema que resolve"),
        prop("PrecoMinimo", Number, false, "Preço mínimo"),
        prop("PrecoIdeal", Number, false, "Preço ideal"),
        prop("Tipo", Select, false, "Tipo"),
        prop("TempoMedioEntrega", Number, false, "Tempo médio de entrega (dias)"),
        prop("DependenciaFundador", Select, false, "Dependência do fundador"),
        prop("Replicabilidade", Select, false, "Replicabilidade"),
        prop("PrioridadeEstrategica", Number, false, "Prioridade estratégica (1-10)"),
    ],
};

static COFFEE_DIAGNOSTICS: DatabaseSchema = DatabaseSchema {
    name: "CoffeeDiagnostics",
    env_var: "NOTION_DB_COFFEEDIAGNOSTICS",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome do diagnóstico"),
        prop("Date", Date, true, "Data"),
        prop("Contact", Relation, false, "Contato"),
        prop("Segment", Select, false, "Segmento"),
        prop("TeamSize", Number, false, "Tamanho do time"),
        prop("Channels", MultiSelect, false, "Canais de atendimento"),
        prop("WhatsAppPrimary", Checkbox, false, "WhatsApp é o canal principal"),
        prop("ResponseSpeed", Select, false, "Velocidade de resposta"),
        prop("MainPain", RichText, false, "Dor principal"),
        prop("Symptoms", RichText, false, "Sintomas"),
        prop("FunnelLeak", RichText, false, "Vazamento do funil"),
        prop("Goal30", RichText, false, "Objetivo em 30 dias"),
        prop("Goal60", RichText, false, "Objetivo em 60 dias"),
        prop("Goal90", RichText, false, "Objetivo em 90 dias"),
        prop("ScopeLockAccepted", Checkbox, false, "Trava de escopo aceita"),
        prop("AdditivesPolicyAccepted", Checkbox, false, "Política de aditivos aceita"),
        prop("NextStepAgreed", RichText, false, "Próximo passo combinado"),
        prop("Notes", RichText, false, "Notas"),
        prop("NextSteps", RichText, false, "Próximos passos"),
    ],
};

static EXPANSION_OPPORTUNITIES: DatabaseSchema = DatabaseSchema {
    name: "ExpansionOpportunities",
    env_var: "NOTION_DB_EXPANSIONOPPORTUNITIES",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome da oportunidade"),
        prop("Client", Relation, false, "Cliente"),
        prop("Type", Select, false, "Tipo: Upsell, Cross-sell"),
        prop("Status", Select, false, "Status: Identificado, Em Negociação, Fechado, Perdido"),
        prop("Stage", Select, false, "Etapa"),
        prop("Trigger", Select, false, "Origem da oportunidade (GOLMoment, ...)"),
        prop("PlannedDate", Date, false, "Data planejada da reunião"),
        prop("Health", Select, false, "Saúde do cliente na criação"),
        prop("Notes", RichText, false, "Notas"),
    ],
};

static CUSTOMER_WINS: DatabaseSchema = DatabaseSchema {
    name: "CustomerWins",
    env_var: "NOTION_DB_CUSTOMERWINS",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome da vitória"),
        prop("Client", Relation, false, "Cliente"),
        prop("Date", Date, true, "Data"),
        prop("Description", RichText, false, "Descrição"),
        prop("WinType", Select, false, "Tipo da vitória"),
        prop("Evidence", RichText, false, "Evidência"),
        prop("Score", Number, false, "Nota do momento (0-10)"),
        prop("UpsellRecommended", Checkbox, false, "Upsell recomendado"),
        prop("IsGOL", Checkbox, false, "Momento GOL (Score >= 8)"),
    ],
};

static LEAD_GATE: DatabaseSchema = DatabaseSchema {
    name: "LeadGate",
    env_var: "NOTION_DATABASE_ID",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome do lead"),
        prop("WhatsApp", PhoneNumber, true, "WhatsApp"),
        prop("Estimated Loss", Number, false, "Perda estimada informada no formulário"),
        prop("Date", Date, true, "Data da captura"),
    ],
};

static AXIS_LEADS: DatabaseSchema = DatabaseSchema {
    name: "AxisLeads",
    env_var: "NOTION_DB_AXIS_LEADS",
    required: false,
    properties: &[
        prop("Name", Title, true, "Nome do lead"),
        prop("Phone", PhoneNumber, true, "Telefone"),
        prop("Perda Estimada", Number, false, "Perda estimada"),
        prop("Status", Select, true, "Status inicial: Novo Lead"),
        prop("Date", Date, true, "Data da captura"),
    ],
};
