use std::fmt;

use regex::Regex;

use crate::models::UserRole;

/// Landing page for requests without an identity.
pub const LOGIN_PATH: &str = "/login";

/// RouteGroup
///
/// A named class of request paths that share one authorization policy.
/// Declaration order is also the classification order of the default table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteGroup {
    Employee,
    Admin,
    Auth,
}

impl fmt::Display for RouteGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteGroup::Employee => "employee",
            RouteGroup::Admin => "admin",
            RouteGroup::Auth => "auth",
        };
        f.write_str(name)
    }
}

/// RouteGroupConfig
///
/// Path patterns and authorization requirements for a single `RouteGroup`.
/// Patterns are tested with `Regex::is_match`, so they only anchor where the
/// pattern itself says so.
#[derive(Debug, Clone)]
pub struct RouteGroupConfig {
    pub patterns: Vec<Regex>,
    pub required_roles: Vec<UserRole>,
    pub is_public: bool,
}

impl RouteGroupConfig {
    /// Compiles `patterns` into a non-public group config.
    pub fn new(patterns: &[&str], required_roles: &[UserRole]) -> Result<Self, regex::Error> {
        Ok(Self {
            patterns: compile(patterns)?,
            required_roles: required_roles.to_vec(),
            is_public: false,
        })
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(path))
    }
}

/// AccessDecision
///
/// Terminal outcome of evaluating one request against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
    RedirectToDefault(&'static str),
}

impl AccessDecision {
    /// The `Location` a redirect decision points to, `None` for `Allow`.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match *self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectToLogin => Some(LOGIN_PATH),
            AccessDecision::RedirectToDefault(target) => Some(target),
        }
    }
}

/// AccessPolicy
///
/// The route-permission table plus the two standalone path lists the request
/// gate consults. Built once at startup and shared read-only (behind an `Arc`
/// in `AppState`); every method is a pure function of its arguments.
///
/// The literal public list and the protected pattern list are deliberately
/// kept apart from the group table: the public list is checked before any
/// classification, and the protected list alone decides whether a missing
/// identity bounces to the login page.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    groups: Vec<(RouteGroup, RouteGroupConfig)>,
    public_paths: Vec<String>,
    protected_patterns: Vec<Regex>,
}

impl AccessPolicy {
    /// Builds a policy from an explicit table. `groups` is evaluated in the
    /// given order and the first matching group wins.
    pub fn new(
        groups: Vec<(RouteGroup, RouteGroupConfig)>,
        public_paths: &[&str],
        protected_patterns: &[&str],
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            groups,
            public_paths: public_paths.iter().map(|p| p.to_string()).collect(),
            protected_patterns: compile(protected_patterns)?,
        })
    }

    /// The MorvaHR route table.
    pub fn morva() -> Result<Self, regex::Error> {
        let groups = vec![
            (
                RouteGroup::Employee,
                RouteGroupConfig::new(
                    &["^/$", "^/notifications", "^/request-leave"],
                    &[UserRole::Employee, UserRole::HrAdmin],
                )?,
            ),
            (
                RouteGroup::Admin,
                RouteGroupConfig::new(&["^/admin"], &[UserRole::HrAdmin])?,
            ),
            (
                RouteGroup::Auth,
                RouteGroupConfig::new(&["^/(login|signup)"], &[])?.public(),
            ),
        ];

        Self::new(
            groups,
            &[LOGIN_PATH, "/signup"],
            &["^/$", "^/notifications", "^/request-leave", "^/admin"],
        )
    }

    pub fn group_config(&self, group: RouteGroup) -> Option<&RouteGroupConfig> {
        self.groups
            .iter()
            .find(|(candidate, _)| *candidate == group)
            .map(|(_, config)| config)
    }

    /// classify_route
    ///
    /// Returns the first group (in table order) with a pattern matching `path`.
    pub fn classify_route(&self, path: &str) -> Option<RouteGroup> {
        self.groups
            .iter()
            .find(|(_, config)| config.matches(path))
            .map(|(group, _)| *group)
    }

    /// is_public_path
    ///
    /// Exact membership in the literal public list. `/login/` or `/login/x`
    /// are not public under this check.
    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.iter().any(|public| public == path)
    }

    /// requires_authentication
    ///
    /// True when `path` matches the protected pattern list, i.e. when a
    /// request without identity must be sent to the login page.
    pub fn requires_authentication(&self, path: &str) -> bool {
        self.protected_patterns
            .iter()
            .any(|pattern| pattern.is_match(path))
    }

    /// Whether `decide` can depend on the caller's role for `path`. Literal
    /// public paths and paths outside every group and the protected list are
    /// allowed for everyone, so the guard skips the identity lookup there.
    pub fn needs_identity(&self, path: &str) -> bool {
        !self.is_public_path(path)
            && (self.requires_authentication(path) || self.classify_route(path).is_some())
    }

    /// has_route_permission
    ///
    /// Reports role membership only. An absent role is always `false`, even
    /// for public groups; public bypass for anonymous requests happens via
    /// `is_public_path` in `decide`.
    pub fn has_route_permission(&self, role: Option<UserRole>, group: RouteGroup) -> bool {
        let Some(role) = role else {
            return false;
        };

        match self.group_config(group) {
            Some(config) => config.is_public || config.required_roles.contains(&role),
            None => false,
        }
    }

    /// decide
    ///
    /// Runs the per-request gate:
    /// public literal → allow; protected without identity → login;
    /// identity whose role the matched group rejects → role's landing page;
    /// anything else → allow.
    pub fn decide(&self, path: &str, role: Option<UserRole>) -> AccessDecision {
        if self.is_public_path(path) {
            return AccessDecision::Allow;
        }

        if role.is_none() {
            if self.requires_authentication(path) {
                return AccessDecision::RedirectToLogin;
            }
            return AccessDecision::Allow;
        }

        match self.classify_route(path) {
            Some(group) if !self.has_route_permission(role, group) => {
                AccessDecision::RedirectToDefault(default_redirect_path(role))
            }
            _ => AccessDecision::Allow,
        }
    }
}

/// default_redirect_path
///
/// Canonical landing page for a role; also where a request is bounced when
/// the role does not satisfy the route.
pub fn default_redirect_path(role: Option<UserRole>) -> &'static str {
    match role {
        None => LOGIN_PATH,
        Some(UserRole::HrAdmin) => "/admin",
        Some(UserRole::Employee) => "/",
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|pattern| Regex::new(pattern)).collect()
}
