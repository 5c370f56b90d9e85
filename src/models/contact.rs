use notion::properties::*;
use notion::Page;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contact {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub company: String,
    pub status: String,
    pub segment: String,
    pub city: String,
    #[serde(rename = "WhatsApp")]
    pub whatsapp: String,
    pub source: String,
    pub priority: String,
    pub notes: String,
}

impl Contact {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: extract_text(page.property("Name")),
            company: extract_text(page.property("Company")),
            status: extract_select(page.property("Status")),
            segment: extract_select(page.property("Segment")),
            city: extract_select(page.property("City")),
            whatsapp: extract_phone(page.property("WhatsApp")),
            source: extract_select(page.property("Source")),
            priority: extract_select(page.property("Priority")),
            notes: extract_text(page.property("Notes")),
        }
    }
}

/// Entrada de criação/atualização; só os campos presentes são gravados
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, rename = "WhatsApp")]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ContactInput {
    /// Nome sem espaços nas pontas, se não estiver vazio
    pub fn trimmed_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Propriedades do Notion para os campos informados
    pub fn to_properties(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut props = serde_json::Map::new();

        if let Some(name) = self.trimmed_name() {
            props.insert("Name".into(), title(name));
        }
        if let Some(company) = &self.company {
            props.insert("Company".into(), rich_text(company));
        }
        if let Some(notes) = &self.notes {
            props.insert("Notes".into(), rich_text(notes));
        }
        if let Some(whatsapp) = &self.whatsapp {
            props.insert("WhatsApp".into(), phone_number(whatsapp));
        }
        for (key, value) in [
            ("Status", &self.status),
            ("Segment", &self.segment),
            ("City", &self.city),
            ("Source", &self.source),
            ("Priority", &self.priority),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                props.insert(key.into(), select(value));
            }
        }

        props
    }
}
