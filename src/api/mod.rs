//! Typed feature APIs over [`ApiClient`].
//!
//! Each API borrows the client and speaks one resource. Mutating calls
//! fetch a fresh CSRF token before sending; every call goes through the
//! client's refresh protocol.

pub mod auth;
pub mod food;
pub mod pantry;
pub mod recipes;

pub use auth::AuthApi;
pub use food::FoodApi;
pub use pantry::PantryApi;
pub use recipes::RecipeApi;

use crate::client::ApiClient;

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const LOGOUT_PATH: &str = "/logout";
pub const REFRESH_PATH: &str = "/refresh-token";
pub const VERIFY_PATH: &str = "/verify-token";
pub const CSRF_PATH: &str = "/csrf";
pub const FOOD_ITEMS_PATH: &str = "/food-items";
pub const PANTRY_PATH: &str = "/pantry";
pub const RECIPE_SUGGESTIONS_PATH: &str = "/recipes/suggestions";
pub const RECIPE_GENERATE_PATH: &str = "/recipes/generate";

impl ApiClient {
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    #[must_use]
    pub fn food(&self) -> FoodApi<'_> {
        FoodApi::new(self)
    }

    #[must_use]
    pub fn pantry(&self) -> PantryApi<'_> {
        PantryApi::new(self)
    }

    #[must_use]
    pub fn recipes(&self) -> RecipeApi<'_> {
        RecipeApi::new(self)
    }
}
