//! Route Guard
//!
//! Sends anonymous visitors away from account pages and signed-in users
//! away from the landing page.

use crate::domain::value_object::route_policy::{RouteClass, RoutePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    RedirectToSignIn,
    RedirectToAccount,
    Continue,
}

impl GuardDecision {
    /// Redirect target, if any
    pub fn location<'a>(&self, routes: &'a RoutePolicy) -> Option<&'a str> {
        match self {
            GuardDecision::RedirectToSignIn => Some(&routes.sign_in_path),
            GuardDecision::RedirectToAccount => Some(&routes.account_path),
            GuardDecision::Continue => None,
        }
    }
}

/// `path` must not include the query string.
pub fn decide(routes: &RoutePolicy, path: &str, user_present: bool) -> GuardDecision {
    match (routes.classify(path), user_present) {
        (RouteClass::Protected, false) => GuardDecision::RedirectToSignIn,
        (RouteClass::Landing, true) => GuardDecision::RedirectToAccount,
        _ => GuardDecision::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_requires_user() {
        let routes = RoutePolicy::default();
        assert_eq!(decide(&routes, "/account", false), GuardDecision::RedirectToSignIn);
        assert_eq!(
            decide(&routes, "/account/stories/new", false),
            GuardDecision::RedirectToSignIn
        );
        assert_eq!(decide(&routes, "/account", true), GuardDecision::Continue);
    }

    #[test]
    fn test_landing_redirects_signed_in_user() {
        let routes = RoutePolicy::default();
        assert_eq!(decide(&routes, "/", true), GuardDecision::RedirectToAccount);
        assert_eq!(decide(&routes, "/", false), GuardDecision::Continue);
    }

    #[test]
    fn test_public_paths_continue() {
        let routes = RoutePolicy::default();
        for user_present in [true, false] {
            assert_eq!(decide(&routes, "/blog", user_present), GuardDecision::Continue);
            assert_eq!(decide(&routes, "/sign-in", user_present), GuardDecision::Continue);
        }
    }

    #[test]
    fn test_location() {
        let routes = RoutePolicy::default();
        assert_eq!(GuardDecision::RedirectToSignIn.location(&routes), Some("/sign-in"));
        assert_eq!(GuardDecision::RedirectToAccount.location(&routes), Some("/account"));
        assert_eq!(GuardDecision::Continue.location(&routes), None);
    }
}
