use std::collections::BTreeSet;
use std::fmt;

/// Capability granted to an identity for the duration of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    ThreadsWrite,
    ThreadsRead,
    ThreadsCreateRun,
    AssistantsCreate,
    AssistantsRead,
    StoreAccess,
}

impl Permission {
    /// Every permission this deployment recognizes.
    pub const ALL: [Permission; 6] = [
        Permission::ThreadsWrite,
        Permission::ThreadsRead,
        Permission::ThreadsCreateRun,
        Permission::AssistantsCreate,
        Permission::AssistantsRead,
        Permission::StoreAccess,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ThreadsWrite => "threads:write",
            Permission::ThreadsRead => "threads:read",
            Permission::ThreadsCreateRun => "threads:create_run",
            Permission::AssistantsCreate => "assistants:create",
            Permission::AssistantsRead => "assistants:read",
            Permission::StoreAccess => "store:access",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "threads:write" => Some(Permission::ThreadsWrite),
            "threads:read" => Some(Permission::ThreadsRead),
            "threads:create_run" => Some(Permission::ThreadsCreateRun),
            "assistants:create" => Some(Permission::AssistantsCreate),
            "assistants:read" => Some(Permission::AssistantsRead),
            "store:access" => Some(Permission::StoreAccess),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of capabilities attached to an authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The full grant: every recognized permission. This is what successful
    /// authentication hands out in the current deployment.
    pub fn full() -> Self {
        Permission::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, permission: Permission) {
        self.0.insert(permission);
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// True when at least one of `candidates` is granted.
    pub fn contains_any(&self, candidates: &[Permission]) -> bool {
        candidates.iter().any(|p| self.0.contains(p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
