//! Permission codes.

use std::borrow::{Borrow, Cow};

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque code strings (e.g. `"view_user"`);
/// the server owns their meaning. Administrative users bypass permission
/// checks entirely, so there is no wildcard code at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(code: &'static str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Permission {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

// Lets a `HashSet<Permission>` answer membership for a bare `&str` without
// allocating. Sound because `Cow<str>` hashes and compares as `str`.
impl Borrow<str> for Permission {
    fn borrow(&self) -> &str {
        &self.0
    }
}
