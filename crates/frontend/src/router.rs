//! Route table and navigation guard

use panel_core::Session;

const MAX_REDIRECT_HOPS: usize = 4;

/// One route entry, as declared by the route table.
#[derive(Debug, Clone)]
pub struct RouteDef {
    path: String,
    requires_auth: bool,
    redirect: Option<String>,
}

impl RouteDef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
            redirect: None,
        }
    }

    /// Mark this route as reachable only with an authenticated session.
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Declare a route-level redirect, resolved before the guard rules run.
    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The application's route table.
///
/// External to the guard itself; each entry declares whether it requires
/// authentication. Unknown paths fall through to the catch-all not-found
/// page, which never requires authentication.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
    login_path: String,
    dashboard_path: String,
}

impl RouteTable {
    pub fn new(
        routes: Vec<RouteDef>,
        login_path: impl Into<String>,
        dashboard_path: impl Into<String>,
    ) -> Self {
        Self {
            routes,
            login_path: login_path.into(),
            dashboard_path: dashboard_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn dashboard_path(&self) -> &str {
        &self.dashboard_path
    }

    pub fn find(&self, path: &str) -> Option<&RouteDef> {
        self.routes.iter().find(|route| route.path == path)
    }
}

impl Default for RouteTable {
    /// The shipped console routes.
    fn default() -> Self {
        Self::new(
            vec![
                RouteDef::new("/").redirect_to("/dashboard"),
                RouteDef::new("/login"),
                RouteDef::new("/dashboard").requires_auth(),
                RouteDef::new("/api-gateway").requires_auth(),
            ],
            "/login",
            "/dashboard",
        )
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the navigation proceed unmodified.
    Allow,
    /// Navigate to this path instead.
    Redirect(String),
}

/// Session-based access control, evaluated before every route transition.
#[derive(Debug, Clone, Default)]
pub struct NavigationGuard {
    table: RouteTable,
}

impl NavigationGuard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// Decide the target's fate. Pure over (route table, session); nothing is
    /// retained between evaluations.
    pub fn evaluate(&self, target: &str, session: &Session) -> GuardDecision {
        let resolved = self.resolve(target);

        let requires_auth = self
            .table
            .find(&resolved)
            .is_some_and(|route| route.requires_auth);
        if requires_auth && !session.is_authenticated() {
            tracing::debug!(to = %resolved, "redirecting unauthenticated navigation to login");
            return GuardDecision::Redirect(self.table.login_path().to_string());
        }

        if resolved == self.table.login_path() && session.is_authenticated() {
            return GuardDecision::Redirect(self.table.dashboard_path().to_string());
        }

        if resolved == target {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(resolved)
        }
    }

    /// Follow route-level redirects, bounded so a cyclic table cannot hang
    /// the guard.
    fn resolve(&self, target: &str) -> String {
        let mut current = target.to_string();
        for _ in 0..MAX_REDIRECT_HOPS {
            match self.table.find(&current).and_then(|route| route.redirect.clone()) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticated() -> Session {
        Session {
            user: None,
            access_token: Some("abc".into()),
            refresh_token: Some("def".into()),
        }
    }

    fn guard() -> NavigationGuard {
        NavigationGuard::default()
    }

    #[test]
    fn protected_route_redirects_anonymous_to_login() {
        let decision = guard().evaluate("/dashboard", &Session::default());
        assert_eq!(decision, GuardDecision::Redirect("/login".into()));
    }

    #[test]
    fn login_redirects_authenticated_to_dashboard() {
        let decision = guard().evaluate("/login", &authenticated());
        assert_eq!(decision, GuardDecision::Redirect("/dashboard".into()));
    }

    #[test]
    fn login_allows_anonymous() {
        let decision = guard().evaluate("/login", &Session::default());
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn protected_route_allows_authenticated() {
        let decision = guard().evaluate("/api-gateway", &authenticated());
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn root_resolves_through_its_route_redirect() {
        assert_eq!(
            guard().evaluate("/", &authenticated()),
            GuardDecision::Redirect("/dashboard".into())
        );
        // Anonymous traffic lands on login, not the protected dashboard.
        assert_eq!(
            guard().evaluate("/", &Session::default()),
            GuardDecision::Redirect("/login".into())
        );
    }

    #[test]
    fn unknown_route_is_allowed() {
        let decision = guard().evaluate("/no-such-page", &Session::default());
        assert_eq!(decision, GuardDecision::Allow);
    }

    #[test]
    fn cyclic_redirects_do_not_hang() {
        let table = RouteTable::new(
            vec![
                RouteDef::new("/a").redirect_to("/b"),
                RouteDef::new("/b").redirect_to("/a"),
            ],
            "/login",
            "/dashboard",
        );
        let guard = NavigationGuard::new(table);
        // Resolution stops after the hop cap; either endpoint is acceptable.
        assert!(matches!(
            guard.evaluate("/a", &Session::default()),
            GuardDecision::Redirect(_)
        ));
    }
}
