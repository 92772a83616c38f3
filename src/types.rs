use std::fmt;

/// Controller kinds this tool knows how to find siblings for.
///
/// Anything that is not one of the five native kinds under its expected
/// group/version collapses to `CustomResource`. Pods without an owner
/// reference are `Unowned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    StatefulSet,
    Deployment,
    DaemonSet,
    Job,
    CronJob,
    CustomResource,
    Unowned,
}

impl ControllerKind {
    /// Maps an owner reference's `kind`/`apiVersion` to a native kind.
    pub fn native(kind: &str, api_version: &str) -> Option<Self> {
        match (kind, api_version) {
            ("StatefulSet", "apps/v1") => Some(Self::StatefulSet),
            ("Deployment", "apps/v1") => Some(Self::Deployment),
            ("DaemonSet", "apps/v1") => Some(Self::DaemonSet),
            ("Job", "batch/v1") => Some(Self::Job),
            ("CronJob", "batch/v1") => Some(Self::CronJob),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatefulSet => "StatefulSet",
            Self::Deployment => "Deployment",
            Self::DaemonSet => "DaemonSet",
            Self::Job => "Job",
            Self::CronJob => "CronJob",
            Self::CustomResource => "CRD",
            Self::Unowned => "",
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The owning controller of the requested pod, computed once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerClassification {
    pub kind: ControllerKind,
    pub name: String,
    /// Kind string as reported by the owner reference (e.g. "Rollout").
    pub owner_kind: String,
    pub is_native: bool,
}

impl ControllerClassification {
    pub fn unowned() -> Self {
        Self {
            kind: ControllerKind::Unowned,
            name: String::new(),
            owner_kind: String::new(),
            is_native: false,
        }
    }

    /// Human readable form used in the header and pre-UI output.
    pub fn describe(&self) -> String {
        match self.kind {
            ControllerKind::Unowned => "none (standalone pod)".to_string(),
            ControllerKind::CustomResource => {
                format!("{} ({}, {})", self.name, self.owner_kind, self.kind)
            }
            _ => format!("{} ({})", self.name, self.kind),
        }
    }
}

/// Outcome of controller resolution: who owns the pod and which pods to tail.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub controller: ControllerClassification,
    pub pods: Vec<String>,
}
