//! Recipe suggestions built from the user's stored ingredients.

use super::{RECIPE_GENERATE_PATH, RECIPE_SUGGESTIONS_PATH};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{GenerateRecipeRequest, RecipeSuggestion};

pub struct RecipeApi<'a> {
    client: &'a ApiClient,
}

impl<'a> RecipeApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Suggestion based on everything currently stored.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn suggestions(&self) -> Result<RecipeSuggestion, ApiError> {
        self.client.get(RECIPE_SUGGESTIONS_PATH).await
    }

    /// Suggestion for an explicit ingredient list. Blank entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if no ingredient is left.
    pub async fn generate(&self, ingredients: &[String]) -> Result<RecipeSuggestion, ApiError> {
        let ingredients: Vec<String> = ingredients
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(str::to_owned)
            .collect();
        if ingredients.is_empty() {
            return Err(ApiError::Validation("at least one ingredient is required".into()));
        }

        self.client.ensure_csrf_token().await?;
        self.client.post(RECIPE_GENERATE_PATH, &GenerateRecipeRequest { ingredients }).await
    }
}

#[cfg(test)]
#[path = "recipes_test.rs"]
mod tests;
