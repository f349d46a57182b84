use super::ResourceKind;

/// Failure while releasing a single resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReleaseError {
    /// The object was still borrowed (e.g. by an open render pass) when release ran.
    #[error("{kind} '{label}' is still borrowed and cannot be released")]
    Borrowed { kind: ResourceKind, label: String },

    /// The object reported a failure from its own release path.
    #[error("{kind} '{label}' failed to release: {reason}")]
    Failed {
        kind: ResourceKind,
        label: String,
        reason: String,
    },
}

/// Failure while accessing a resource through its handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("{kind} '{label}' was already released")]
    Released { kind: ResourceKind, label: String },

    #[error("{kind} '{label}' is mutably borrowed")]
    Borrowed { kind: ResourceKind, label: String },
}

/// Aggregate of every release failure seen while closing one scope.
///
/// Closing never stops at the first failure; all remaining resources are
/// still released and their failures collected here in release order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scope '{scope}' closed with {} release failure(s); first: {}", .failures.len(), first_failure(.failures))]
pub struct ScopeError {
    pub scope: String,
    pub failures: Vec<ReleaseError>,
}

fn first_failure(failures: &[ReleaseError]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}
