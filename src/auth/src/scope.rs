//! Permission scopes
//!
//! A scope grants a permission level over a class of resources, optionally
//! narrowed to one resource instance. Its wire form is
//! `permission:class[:resource]`, e.g. `read:files` or `write:files:report.txt`.
//! The resource part may itself contain colons; parsing splits on the first
//! two colons only.

use std::fmt;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::{AuthError, Result};

/// Characters that may not appear in a class or resource.
const INVALID_CHARS: [char; 5] = [':', ' ', '\r', '\n', '\t'];

/// Access level for a resource.
///
/// Levels are totally ordered: `Read < Write < Admin`. A higher level covers
/// every lower one within the same resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    /// Viewing a resource and its contents.
    Read,

    /// Read, plus modification of a resource: create, edit, or delete.
    Write,

    /// Write, plus management of permissions.
    Admin,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        };
        f.write_str(s)
    }
}

impl FromStr for Permission {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            _ => Err(AuthError::InvalidPermission),
        }
    }
}

/// Permission granted for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Permission level on the resource.
    pub permission: Permission,

    /// Class of resource for which permission is granted, such as
    /// "messages" or "files".
    pub class: String,

    /// Identifier narrowing the grant to one resource within the class.
    /// A scope without a resource covers the whole class.
    pub resource: Option<String>,
}

impl Scope {
    /// Create a class-wide scope.
    pub fn new(permission: Permission, class: impl Into<String>) -> Self {
        Self {
            permission,
            class: class.into(),
            resource: None,
        }
    }

    /// Narrow the scope to a single resource. An empty identifier leaves the
    /// scope class-wide.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        let resource = resource.into();
        self.resource = (!resource.is_empty()).then_some(resource);
        self
    }

    /// Check the scope invariants.
    ///
    /// The class must be non-empty, and neither class nor resource may
    /// contain a colon, space, or control whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.class.contains(&INVALID_CHARS[..]) {
            return Err(AuthError::InvalidClass(self.class.clone()));
        }
        if self.class.is_empty() {
            return Err(AuthError::MissingClass);
        }

        if let Some(resource) = &self.resource {
            if resource.is_empty() || resource.contains(&INVALID_CHARS[..]) {
                return Err(AuthError::InvalidResource(resource.clone()));
            }
        }

        Ok(())
    }

    /// Whether this grant covers `target`.
    ///
    /// Classes must match exactly. A grant naming a specific resource covers
    /// only that exact resource; a class-wide grant covers any resource in
    /// the class. The grant's permission must be at least the target's on the
    /// `Read < Write < Admin` order.
    pub fn allows(&self, target: &Scope) -> bool {
        if self.class != target.class {
            return false;
        }

        if let Some(resource) = &self.resource {
            if target.resource.as_ref() != Some(resource) {
                return false;
            }
        }

        self.permission >= target.permission
    }

    /// Whether any of `grants` covers this scope.
    ///
    /// This is the policy-evaluation entry point: callers hold a required
    /// scope and test it against the grants decoded from a token.
    pub fn allowed_by_any<'a>(&self, grants: impl IntoIterator<Item = &'a Scope>) -> bool {
        grants.into_iter().any(|grant| grant.allows(self))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.permission, self.class)?;
        if let Some(resource) = &self.resource {
            write!(f, ":{resource}")?;
        }
        Ok(())
    }
}

impl FromStr for Scope {
    type Err = AuthError;

    /// Parse a string-formatted scope. This is the inverse of `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (permission, class) = match (parts.next(), parts.next()) {
            (Some(permission), Some(class)) => (permission, class),
            _ => return Err(AuthError::InvalidScope),
        };

        let scope = Scope::new(permission.parse::<Permission>()?, class)
            .with_resource(parts.next().unwrap_or_default());
        scope.validate()?;
        Ok(scope)
    }
}

// Scopes cross the wire as their canonical string form. Serialization is a
// validation boundary: encoding an invalid scope is an error, not a silent
// escape hatch.
impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.validate().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
