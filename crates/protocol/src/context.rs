use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header carrying the origin bit on every outbound model call.
///
/// The value is the string `"true"` for user-facing traffic and `"false"`
/// for internal pipeline traffic; a downstream router splits backends on it.
pub const ORIGIN_HEADER: &str = "x-user-query";

/// Prefix for extra routing-dimension headers derived from context tags.
pub const TAG_HEADER_PREFIX: &str = "x-rag-tag-";

/// Classification of a call as user-facing or internally generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOrigin {
    /// Issued by an end user through the public API boundary.
    UserQuery,
    /// Issued by internal pipeline work (knowledge-base construction,
    /// batch jobs, direct in-process calls). The safety default.
    #[default]
    Internal,
}

impl CallOrigin {
    /// The fixed wire mapping for [`ORIGIN_HEADER`].
    pub fn header_value(self) -> &'static str {
        match self {
            Self::UserQuery => "true",
            Self::Internal => "false",
        }
    }
}

/// Immutable per-call value describing one request's origin.
///
/// Created once at a system boundary and threaded (or scoped, see
/// [`crate::scope`]) through every downstream call made on that request's
/// behalf. There is no mutation API: a stage that genuinely needs a
/// different origin for a sub-call constructs a fresh context and enters a
/// new scope with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub origin: CallOrigin,
    /// Free-form routing dimensions (priority, tenant, provider).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl CallContext {
    /// Context for a request accepted at the public API boundary.
    pub fn user_query() -> Self {
        Self {
            origin: CallOrigin::UserQuery,
            tags: BTreeMap::new(),
        }
    }

    /// Context for internally generated work. Equivalent to `Default`.
    pub fn internal() -> Self {
        Self {
            origin: CallOrigin::Internal,
            tags: BTreeMap::new(),
        }
    }

    /// Returns a copy with one extra routing tag attached.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}
