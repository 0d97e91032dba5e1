use serde::{Deserialize, Serialize};

use crate::types::Module;

/// Reference-data collections that share one CRUD shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    RequestTypes,
    Services,
    MskCategories,
}

impl Catalog {
    /// Entities a module's allow-list refers to
    pub fn for_module(module: Module) -> Self {
        match module {
            Module::Requests => Catalog::RequestTypes,
            Module::Services => Catalog::Services,
            Module::Msk => Catalog::MskCategories,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Catalog::RequestTypes => "/api/request-types",
            Catalog::Services => "/api/services",
            Catalog::MskCategories => "/api/msk/categories",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Catalog::RequestTypes => "Murojaat turlari",
            Catalog::Services => "Servislar",
            Catalog::MskCategories => "MSK kategoriyalar",
        }
    }
}

/// A request type, service or MSK category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub fn item_ids(items: &[CatalogItem]) -> Vec<String> {
    items.iter().map(|i| i.id.clone()).collect()
}
