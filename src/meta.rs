//! Page metadata.
//!
//! Every page descriptor carries a [`PageMeta`] record: who may see the page,
//! how it shows up in the side menu, and whether visiting it should send the
//! user somewhere else.

use crate::session::{Location, Session};
use gpui::SharedString;
use std::fmt;
use std::sync::Arc;

/// Role required for pages behind a session.
pub const SESSION_ROLE: &str = "user";

/// Role that marks a page as public.
pub const PUBLIC_ROLE: &str = "all";

// ============================================================================
// Roles
// ============================================================================

/// Access roles of a page.
///
/// Defaults to `["user"]`: a page without explicit roles requires a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Roles(Vec<String>);

impl Roles {
    /// Roles from any list of names.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    /// `["all"]`.
    pub fn public() -> Self {
        Self::new([PUBLIC_ROLE])
    }

    /// `["user"]`.
    pub fn session() -> Self {
        Self::new([SESSION_ROLE])
    }

    /// Check whether `role` is listed.
    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }

    /// Iterate over role names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for Roles {
    fn default() -> Self {
        Self::session()
    }
}

impl<S: Into<String>> FromIterator<S> for Roles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

// ============================================================================
// Redirects
// ============================================================================

type RuleFn = dyn Fn(&Session, &Location) -> Option<String> + Send + Sync;

/// A conditional redirect evaluated by the navigation guard.
///
/// The rule is a pure function of the session and the location being
/// visited. `None` or an empty string means "stay".
#[derive(Clone)]
pub struct RedirectRule(Arc<RuleFn>);

impl RedirectRule {
    /// Wrap a closure as a redirect rule.
    pub fn new<F>(rule: F) -> Self
    where
        F: Fn(&Session, &Location) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(rule))
    }

    /// Send signed-in users back where they came from.
    ///
    /// The login page's rule: with a session present, go to the location's
    /// transfer state `from`, or `default` when there is none.
    pub fn return_to_origin(default: impl Into<String>) -> Self {
        let default = default.into();
        Self::new(move |session, location| {
            if !session.is_authenticated() {
                return None;
            }
            Some(
                location
                    .origin()
                    .map_or_else(|| default.clone(), str::to_string),
            )
        })
    }

    /// Send users whose password expired to `path`.
    pub fn when_password_expired(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(move |session, location| {
            (session.password_expired && location.pathname != path).then(|| path.clone())
        })
    }

    /// Evaluate the rule. Empty targets are treated as "stay".
    pub fn evaluate(&self, session: &Session, location: &Location) -> Option<String> {
        (self.0)(session, location).filter(|to| !to.is_empty())
    }
}

impl fmt::Debug for RedirectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RedirectRule(<fn>)")
    }
}

/// Where a page sends its visitors instead of rendering.
#[derive(Debug, Clone)]
pub enum Redirect {
    /// Always go to this absolute path.
    To(String),
    /// Ask the rule on every visit.
    Rule(RedirectRule),
}

impl Redirect {
    /// Static redirect target, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Redirect::To(to) => Some(to),
            Redirect::Rule(_) => None,
        }
    }

    /// Redirect rule, if any.
    pub fn rule(&self) -> Option<&RedirectRule> {
        match self {
            Redirect::To(_) => None,
            Redirect::Rule(rule) => Some(rule),
        }
    }
}

// ============================================================================
// PageMeta
// ============================================================================

/// Metadata attached to a page.
///
/// # Example
///
/// ```
/// use console_navigator::{PageMeta, Roles, RedirectRule};
///
/// let login = PageMeta::public().redirect_rule(RedirectRule::return_to_origin("/"));
/// assert!(login.roles.contains("all"));
///
/// let cluster = PageMeta::new().icon("icons/cluster.svg").title("Clusters");
/// assert_eq!(cluster.roles, Roles::session());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    /// Access roles; `["user"]` unless set.
    pub roles: Roles,
    /// Menu icon asset path.
    pub icon: Option<SharedString>,
    /// Loading text shown while a lazy page loads.
    pub fallback: Option<SharedString>,
    /// Redirect instead of rendering.
    pub redirect: Option<Redirect>,
    /// Menu label; the segment name when unset.
    pub title: Option<String>,
}

impl PageMeta {
    /// Metadata with default roles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata of a public page.
    pub fn public() -> Self {
        Self::new().roles(Roles::public())
    }

    /// Metadata of a directory that has no page of its own.
    pub(crate) fn implied() -> Self {
        Self::public()
    }

    /// Set the access roles.
    pub fn roles(mut self, roles: Roles) -> Self {
        self.roles = roles;
        self
    }

    /// Set the menu icon.
    pub fn icon(mut self, icon: impl Into<SharedString>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the loading text.
    pub fn fallback(mut self, fallback: impl Into<SharedString>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Always redirect to `to`.
    pub fn redirect_to(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(Redirect::To(to.into()));
        self
    }

    /// Redirect when `rule` says so.
    pub fn redirect_rule(mut self, rule: RedirectRule) -> Self {
        self.redirect = Some(Redirect::Rule(rule));
        self
    }

    /// Set the menu label.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// `true` if the page needs a session.
    pub fn requires_session(&self) -> bool {
        self.roles.contains(SESSION_ROLE)
    }

    /// `true` if the page is public.
    pub fn is_public(&self) -> bool {
        self.roles.contains(PUBLIC_ROLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TransferState;

    #[test]
    fn test_default_roles_require_session() {
        let meta = PageMeta::new();
        assert!(meta.requires_session());
        assert!(!meta.is_public());
        assert!(PageMeta::public().is_public());
    }

    #[test]
    fn test_roles_from_iter() {
        let roles: Roles = ["user", "admin"].into_iter().collect();
        assert!(roles.contains("admin"));
        assert_eq!(roles.iter().count(), 2);
    }

    #[test]
    fn test_return_to_origin() {
        let rule = RedirectRule::return_to_origin("/");
        let login = Location::new("/login");

        assert_eq!(rule.evaluate(&Session::anonymous(), &login), None);

        let alice = Session::signed_in("t", "alice");
        assert_eq!(rule.evaluate(&alice, &login), Some("/".to_string()));

        let back = login.with_state(TransferState::new("/cluster"));
        assert_eq!(rule.evaluate(&alice, &back), Some("/cluster".to_string()));
    }

    #[test]
    fn test_password_expired_rule() {
        let rule = RedirectRule::when_password_expired("/password");
        let mut session = Session::signed_in("t", "alice");
        assert_eq!(rule.evaluate(&session, &Location::new("/cluster")), None);

        session.password_expired = true;
        assert_eq!(
            rule.evaluate(&session, &Location::new("/cluster")),
            Some("/password".to_string())
        );
        assert_eq!(rule.evaluate(&session, &Location::new("/password")), None);
    }

    #[test]
    fn test_empty_target_means_stay() {
        let rule = RedirectRule::new(|_, _| Some(String::new()));
        assert_eq!(rule.evaluate(&Session::anonymous(), &Location::new("/")), None);
    }

    #[test]
    fn test_redirect_accessors() {
        let to = Redirect::To("/cluster".into());
        assert_eq!(to.target(), Some("/cluster"));
        assert!(to.rule().is_none());

        let rule = Redirect::Rule(RedirectRule::new(|_, _| None));
        assert!(rule.target().is_none());
        assert!(rule.rule().is_some());
    }
}
