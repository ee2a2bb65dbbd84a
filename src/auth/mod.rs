use serde::Serialize;

pub mod token;

pub use token::{generate_token, hash_token};

/// Permission codes an editor can be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Permission {
    #[serde(rename = "SPECIALANNOUNCEMENT_EDIT")]
    Edit,
    #[serde(rename = "SPECIALANNOUNCEMENT_DELETE")]
    Delete,
    #[serde(rename = "SPECIALANNOUNCEMENT_CREATE")]
    Create,
}

impl Permission {
    pub const ALL: [Permission; 3] = [Permission::Edit, Permission::Delete, Permission::Create];

    pub const CATEGORY: &'static str = "Special announcements";

    pub fn code(self) -> &'static str {
        match self {
            Permission::Edit => "SPECIALANNOUNCEMENT_EDIT",
            Permission::Delete => "SPECIALANNOUNCEMENT_DELETE",
            Permission::Create => "SPECIALANNOUNCEMENT_CREATE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Permission::Edit => "Edit a special announcement",
            Permission::Delete => "Delete a special announcement",
            Permission::Create => "Create a special announcement",
        }
    }
}

/// Entry in the permission listing shown to administrators.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

pub fn provide_permissions() -> Vec<PermissionInfo> {
    Permission::ALL
        .into_iter()
        .map(|p| PermissionInfo {
            code: p.code(),
            name: p.name(),
            category: Permission::CATEGORY,
        })
        .collect()
}

/// Resolves permissions for the actor making the current request.
pub trait Authorizer: Send + Sync {
    fn check(&self, permission: Permission) -> bool;
}

/// Announcements are public.
pub fn can_view(_actor: &dyn Authorizer) -> bool {
    true
}

pub fn can_edit(actor: &dyn Authorizer) -> bool {
    actor.check(Permission::Edit)
}

pub fn can_delete(actor: &dyn Authorizer) -> bool {
    actor.check(Permission::Delete)
}

pub fn can_create(actor: &dyn Authorizer) -> bool {
    actor.check(Permission::Create)
}

/// Links, images and pages may be added by anyone who can create or edit announcements.
pub fn can_author(actor: &dyn Authorizer) -> bool {
    can_create(actor) || can_edit(actor)
}
