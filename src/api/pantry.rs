//! `/pantry` resource.

use serde::de::IgnoredAny;

use super::PANTRY_PATH;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{NewPantryItem, PantryItem};

pub struct PantryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PantryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn list(&self) -> Result<Vec<PantryItem>, ApiError> {
        let items: Option<Vec<PantryItem>> = self.client.get(PANTRY_PATH).await?;
        Ok(items.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before sending if `item` is invalid.
    pub async fn create(&self, item: &NewPantryItem) -> Result<PantryItem, ApiError> {
        item.validate()?;
        self.client.fetch_csrf_token().await?;
        self.client.post(PANTRY_PATH, item).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before sending if `item` is invalid.
    pub async fn update(&self, item: &PantryItem) -> Result<PantryItem, ApiError> {
        item.validate()?;
        self.client.fetch_csrf_token().await?;
        self.client.put(&format!("{PANTRY_PATH}/{}", item.id), item).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.client.fetch_csrf_token().await?;
        let _: IgnoredAny = self.client.delete(&format!("{PANTRY_PATH}/{id}")).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "pantry_test.rs"]
mod tests;
