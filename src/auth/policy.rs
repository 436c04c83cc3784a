//! Route access policy.
//!
//! An [`AccessPolicy`] is an ordered list of `(path pattern, requirement)` rules.
//! Rules are evaluated top to bottom and the first matching pattern decides;
//! a path no rule matches is denied.
//!
//! Patterns use the usual ant-style wildcards: `*` matches within one path
//! segment, `**` matches across segments, and a trailing `/**` also matches the
//! bare prefix (`/api/auth/**` matches `/api/auth`).

use regex::Regex;

use super::context::SecurityContext;
use crate::error::{AppError, AuthError};
use crate::models::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Open to anonymous requests.
    Permit,
    /// Any authenticated principal.
    Authenticated,
    /// An authenticated principal holding at least one of the roles.
    AnyRole(Vec<Role>),
    Deny,
}

impl Requirement {
    pub fn check(&self, ctx: &SecurityContext) -> Result<(), AuthError> {
        match self {
            Requirement::Permit => Ok(()),
            Requirement::Authenticated => ctx.require_authenticated().map(|_| ()),
            Requirement::AnyRole(roles) => ctx.require_any_role(roles).map(|_| ()),
            Requirement::Deny if ctx.is_authenticated() => Err(AuthError::InsufficientRole),
            Requirement::Deny => Err(AuthError::Unauthenticated),
        }
    }
}

static DENY: Requirement = Requirement::Deny;

#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, AppError> {
        let regex = Regex::new(&ant_to_regex(pattern)).map_err(|e| {
            AppError::Configuration(format!("Invalid path pattern '{}': {}", pattern, e))
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

fn ant_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let mut rest = pattern;
    loop {
        if let Some(tail) = rest.strip_prefix("/**") {
            out.push_str("(?:/.*)?");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("**") {
            out.push_str(".*");
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('*') {
            out.push_str("[^/]*");
            rest = tail;
        } else if let Some(c) = rest.chars().next() {
            out.push_str(&regex::escape(&c.to_string()));
            rest = &rest[c.len_utf8()..];
        } else {
            break;
        }
    }
    out.push('$');
    out
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    pub pattern: PathPattern,
    pub requirement: Requirement,
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn from_rules<'a, I>(rules: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (&'a str, Requirement)>,
    {
        let rules = rules
            .into_iter()
            .map(|(pattern, requirement)| {
                Ok(AccessRule {
                    pattern: PathPattern::new(pattern)?,
                    requirement,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(Self { rules })
    }

    /// The application's route table: auth, docs, console and health paths are
    /// public, the role demo endpoints need their roles, everything else needs a
    /// principal.
    pub fn standard() -> Result<Self, AppError> {
        Self::from_rules([
            ("/api/auth/**", Requirement::Permit),
            ("/api/test/all", Requirement::Permit),
            (
                "/api/test/user",
                Requirement::AnyRole(vec![Role::User, Role::Moderator, Role::Admin]),
            ),
            ("/api/test/mod", Requirement::AnyRole(vec![Role::Moderator])),
            ("/api/test/admin", Requirement::AnyRole(vec![Role::Admin])),
            ("/api-docs/**", Requirement::Permit),
            ("/swagger-ui/**", Requirement::Permit),
            ("/swagger-ui.html", Requirement::Permit),
            ("/h2-console/**", Requirement::Permit),
            ("/health", Requirement::Permit),
            ("/**", Requirement::Authenticated),
        ])
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// The requirement of the first rule matching `path`, or [`Requirement::Deny`].
    pub fn requirement_for(&self, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| &rule.requirement)
            .unwrap_or(&DENY)
    }

    pub fn authorize(&self, path: &str, ctx: &SecurityContext) -> Result<(), AuthError> {
        self.requirement_for(path).check(ctx)
    }
}
