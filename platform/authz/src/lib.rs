//! Authorization policy table for the agent gateway.
//!
//! Every inbound operation is dispatched by its (resource, action) key to a
//! small rule function. A rule inspects the authenticated identity and the
//! operation's payload, then either rejects, passes the internal studio
//! identity through unscoped, or returns the owner filter the storage layer
//! must apply.

pub mod action;
pub mod payload;

use serde::{Deserialize, Serialize};

use platform_authn::{AuthError, AuthResult, Identity, Permission, PermissionSet};

pub use action::ActionKey;
pub use payload::ActionPayload;

/// Reserved identity for the internal studio/operator tooling. Requests
/// authenticated as this identity bypass ownership scoping and permission
/// checks so the tool can operate across all records.
pub const STUDIO_IDENTITY: &str = "studio-user";

/// Scoping predicate handed to the storage layer: restrict the operation to
/// records whose owner equals this identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerFilter {
    pub owner: String,
}

impl OwnerFilter {
    fn for_user(user: &Identity) -> Self {
        Self {
            owner: user.id.clone(),
        }
    }
}

/// Everything a rule may inspect or mutate while deciding one operation.
pub struct ActionContext<'a> {
    /// The operation's payload; create rules tag it with the owner.
    pub value: &'a mut ActionPayload,
    pub user: &'a Identity,
    pub permissions: &'a PermissionSet,
}

type Rule = fn(ActionContext<'_>) -> AuthResult<Option<OwnerFilter>>;

/// Dispatch one operation to its rule.
///
/// `Ok(None)` means the studio bypass fired: no scoping, no stamping. Every
/// other success carries a filter whose owner is the caller's own id.
pub fn authorize(key: ActionKey, ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    rule_for(key)(ctx)
}

fn rule_for(key: ActionKey) -> Rule {
    match key {
        ActionKey::ThreadsCreate => threads_create,
        ActionKey::ThreadsCreateRun => threads_create_run,
        ActionKey::ThreadsRead => threads_read,
        ActionKey::ThreadsUpdate => threads_update,
        ActionKey::ThreadsDelete => threads_delete,
        ActionKey::ThreadsSearch => threads_search,
        ActionKey::AssistantsCreate => assistants_create,
        ActionKey::AssistantsRead => assistants_read,
        ActionKey::AssistantsUpdate => assistants_update,
        ActionKey::AssistantsDelete => assistants_delete,
        ActionKey::AssistantsSearch => assistants_search,
        ActionKey::Store => store_access,
    }
}

fn is_studio(user: &Identity) -> bool {
    user.id == STUDIO_IDENTITY
}

fn require(permissions: &PermissionSet, permission: Permission) -> AuthResult<()> {
    if permissions.contains(permission) {
        Ok(())
    } else {
        Err(AuthError::forbidden("Unauthorized"))
    }
}

fn require_any(permissions: &PermissionSet, candidates: &[Permission]) -> AuthResult<()> {
    if permissions.contains_any(candidates) {
        Ok(())
    } else {
        Err(AuthError::forbidden("Unauthorized"))
    }
}

fn threads_create(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::ThreadsWrite)?;
    ctx.value.stamp_owner(&ctx.user.id);
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn threads_create_run(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::ThreadsWrite)?;
    ctx.value.stamp_owner(&ctx.user.id);
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn threads_read(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn threads_update(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::ThreadsWrite)?;
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn threads_delete(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::ThreadsWrite)?;
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn threads_search(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require_any(
        ctx.permissions,
        &[Permission::ThreadsRead, Permission::ThreadsWrite],
    )?;
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn assistants_create(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::AssistantsCreate)?;
    ctx.value.stamp_owner(&ctx.user.id);
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn assistants_read(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn assistants_update(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::AssistantsCreate)?;
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn assistants_delete(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::AssistantsCreate)?;
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn assistants_search(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require_any(
        ctx.permissions,
        &[Permission::AssistantsRead, Permission::AssistantsCreate],
    )?;
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}

fn store_access(ctx: ActionContext<'_>) -> AuthResult<Option<OwnerFilter>> {
    if is_studio(ctx.user) {
        return Ok(None);
    }
    require(ctx.permissions, Permission::StoreAccess)?;
    Ok(Some(OwnerFilter::for_user(ctx.user)))
}
