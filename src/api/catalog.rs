use urlencoding::encode;

use super::{ApiClient, Listing};
use crate::error::ClientResult;
use crate::models::{Catalog, CatalogInput, CatalogItem};
use crate::workflow::require_non_empty;

impl CatalogInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: None,
            description: None,
        }
    }

    fn validated(&self) -> ClientResult<CatalogInput> {
        let blank_to_none = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Ok(CatalogInput {
            name: require_non_empty("name", &self.name)?,
            icon: blank_to_none(&self.icon),
            description: blank_to_none(&self.description),
        })
    }
}

impl ApiClient {
    pub async fn list_catalog(&self, catalog: Catalog) -> ClientResult<Vec<CatalogItem>> {
        let listing: Listing<CatalogItem> = self.get(catalog.path(), Vec::new()).await?;
        Ok(listing.into_items())
    }

    pub async fn create_catalog_item(&self, catalog: Catalog, input: &CatalogInput) -> ClientResult<()> {
        let input = input.validated()?;
        let _: serde_json::Value = self.post(catalog.path(), &input).await?;
        Ok(())
    }

    pub async fn update_catalog_item(&self, catalog: Catalog, id: &str, input: &CatalogInput) -> ClientResult<()> {
        let input = input.validated()?;
        self.put_unit(&format!("{}/{}", catalog.path(), encode(id)), &input)
            .await
    }

    pub async fn delete_catalog_item(&self, catalog: Catalog, id: &str) -> ClientResult<()> {
        self.delete(&format!("{}/{}", catalog.path(), encode(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_fields_are_dropped() {
        let input = CatalogInput {
            name: " Suv ".into(),
            icon: Some("  ".into()),
            description: Some("Ichimlik suvi".into()),
        };
        let valid = input.validated().unwrap();
        assert_eq!(valid.name, "Suv");
        assert_eq!(valid.icon, None);
        assert_eq!(valid.description.as_deref(), Some("Ichimlik suvi"));
        assert!(CatalogInput::new("").validated().is_err());
    }
}
