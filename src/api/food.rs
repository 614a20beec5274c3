//! `/food-items` resource.

use serde::de::IgnoredAny;

use super::FOOD_ITEMS_PATH;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{FoodItem, NewFoodItem};

pub struct FoodApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FoodApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// All food items of the current user. A `null` body counts as empty.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn list(&self) -> Result<Vec<FoodItem>, ApiError> {
        let items: Option<Vec<FoodItem>> = self.client.get(FOOD_ITEMS_PATH).await?;
        Ok(items.unwrap_or_default())
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get(&self, id: u64) -> Result<FoodItem, ApiError> {
        self.client.get(&item_path(id)).await
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before sending if `item` is invalid.
    pub async fn create(&self, item: &NewFoodItem) -> Result<FoodItem, ApiError> {
        item.validate()?;
        self.client.fetch_csrf_token().await?;
        let created: FoodItem = self.client.post(FOOD_ITEMS_PATH, item).await?;
        tracing::info!(id = created.id, title = %created.title, "food item created");
        Ok(created)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] before sending if `item` is invalid.
    pub async fn update(&self, item: &FoodItem) -> Result<FoodItem, ApiError> {
        item.validate()?;
        self.client.fetch_csrf_token().await?;
        self.client.put(&item_path(item.id), item).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.client.fetch_csrf_token().await?;
        let _: IgnoredAny = self.client.delete(&item_path(id)).await?;
        tracing::info!(id, "food item deleted");
        Ok(())
    }
}

fn item_path(id: u64) -> String {
    format!("{FOOD_ITEMS_PATH}/{id}")
}

#[cfg(test)]
#[path = "food_test.rs"]
mod tests;
