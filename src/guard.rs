//! Route protection derived from session flags.

use serde::Serialize;

use crate::session::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// Login / signup screen.
    Entry,
    Pantry,
    FoodItems,
    Recipes,
}

impl Route {
    #[must_use]
    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::Entry)
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Entry => "/",
            Self::Pantry => "/pantry",
            Self::FoodItems => "/food",
            Self::Recipes => "/recipes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Verification still in flight; render nothing yet.
    Wait,
    Redirect(Route),
}

/// Decide whether `route` may be shown for `session`.
#[must_use]
pub fn guard(route: Route, session: &SessionSnapshot) -> GuardDecision {
    if !route.requires_auth() {
        return GuardDecision::Allow;
    }
    if session.is_loading {
        return GuardDecision::Wait;
    }
    if !session.is_authenticated {
        return GuardDecision::Redirect(Route::Entry);
    }
    GuardDecision::Allow
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
