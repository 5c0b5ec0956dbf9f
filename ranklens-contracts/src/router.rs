//! Client-side navigation seam.

use crate::error::Result;
use async_trait::async_trait;

/// A path plus raw query string, the only location shape the overlay
/// reasons about. The query string is kept unparsed here; the codec in
/// core owns its structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLocation {
    pub path: String,
    pub query: String,
}

impl RouteLocation {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Same path, different query.
    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            query: query.into(),
        }
    }

    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

impl std::fmt::Display for RouteLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_url())
    }
}

/// The host SPA's router.
///
/// `navigate` performs a client-side route change without a full page
/// load; the host's own data layer re-resolves against the new query.
#[async_trait]
pub trait HostRouter: Send + Sync {
    fn location(&self) -> RouteLocation;

    async fn navigate(&self, location: RouteLocation) -> Result<()>;
}
