use platform_authn::{AuthError, Identity, Permission, PermissionSet};
use platform_authz::{
    ActionContext, ActionKey, ActionPayload, OwnerFilter, STUDIO_IDENTITY, authorize,
};

fn user(id: &str) -> Identity {
    Identity::new(id)
}

fn decide(
    key: ActionKey,
    identity: &Identity,
    permissions: &PermissionSet,
    payload: &mut ActionPayload,
) -> Result<Option<OwnerFilter>, AuthError> {
    authorize(
        key,
        ActionContext {
            value: payload,
            user: identity,
            permissions,
        },
    )
}

#[test]
fn thread_create_requires_write_permission() {
    let identity = user("u1");
    let mut payload = ActionPayload::default();

    let err = decide(
        ActionKey::ThreadsCreate,
        &identity,
        &PermissionSet::empty(),
        &mut payload,
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));
    assert_eq!(err.to_string(), "Unauthorized");
    assert_eq!(payload.owner(), None);

    let granted: PermissionSet = [Permission::ThreadsWrite].into_iter().collect();
    let filter = decide(ActionKey::ThreadsCreate, &identity, &granted, &mut payload)
        .unwrap()
        .unwrap();
    assert_eq!(filter.owner, "u1");
    assert_eq!(payload.owner(), Some("u1"));
}

#[test]
fn create_run_stamps_like_create() {
    let identity = user("u1");
    let granted: PermissionSet = [Permission::ThreadsWrite].into_iter().collect();
    let mut payload = ActionPayload::default();
    let filter = decide(ActionKey::ThreadsCreateRun, &identity, &granted, &mut payload)
        .unwrap()
        .unwrap();
    assert_eq!(filter.owner, "u1");
    assert_eq!(payload.owner(), Some("u1"));
}

#[test]
fn thread_reads_only_need_authentication() {
    let identity = user("u1");
    let mut payload = ActionPayload::default();
    let filter = decide(
        ActionKey::ThreadsRead,
        &identity,
        &PermissionSet::empty(),
        &mut payload,
    )
    .unwrap()
    .unwrap();
    assert_eq!(filter.owner, "u1");
    // Reads never tag the payload.
    assert_eq!(payload.owner(), None);
}

#[test]
fn thread_update_and_delete_require_write() {
    let identity = user("u1");
    let read_only: PermissionSet = [Permission::ThreadsRead].into_iter().collect();
    let write: PermissionSet = [Permission::ThreadsWrite].into_iter().collect();

    for key in [ActionKey::ThreadsUpdate, ActionKey::ThreadsDelete] {
        let mut payload = ActionPayload::default();
        let err = decide(key, &identity, &read_only, &mut payload).unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)), "{key}");

        let filter = decide(key, &identity, &write, &mut payload)
            .unwrap()
            .unwrap();
        assert_eq!(filter.owner, "u1");
        assert_eq!(payload.owner(), None, "{key} must not stamp");
    }
}

#[test]
fn thread_search_accepts_read_or_write() {
    let identity = user("u1");
    let mut payload = ActionPayload::default();

    for granted in [
        [Permission::ThreadsRead].into_iter().collect::<PermissionSet>(),
        [Permission::ThreadsWrite].into_iter().collect(),
    ] {
        let filter = decide(ActionKey::ThreadsSearch, &identity, &granted, &mut payload)
            .unwrap()
            .unwrap();
        assert_eq!(filter.owner, "u1");
    }

    let unrelated: PermissionSet = [Permission::StoreAccess].into_iter().collect();
    let err = decide(ActionKey::ThreadsSearch, &identity, &unrelated, &mut payload).unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));
}

#[test]
fn assistant_create_requires_its_permission_and_stamps() {
    let identity = user("u2");
    let mut payload = ActionPayload::default();

    let err = decide(
        ActionKey::AssistantsCreate,
        &identity,
        &PermissionSet::empty(),
        &mut payload,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Unauthorized");

    let granted: PermissionSet = [Permission::AssistantsCreate].into_iter().collect();
    let filter = decide(ActionKey::AssistantsCreate, &identity, &granted, &mut payload)
        .unwrap()
        .unwrap();
    assert_eq!(filter.owner, "u2");
    assert_eq!(payload.owner(), Some("u2"));
}

#[test]
fn assistant_mutations_are_gated_by_create_permission() {
    let identity = user("u2");
    let read_only: PermissionSet = [Permission::AssistantsRead].into_iter().collect();
    let create: PermissionSet = [Permission::AssistantsCreate].into_iter().collect();

    for key in [ActionKey::AssistantsUpdate, ActionKey::AssistantsDelete] {
        let mut payload = ActionPayload::default();
        assert!(decide(key, &identity, &read_only, &mut payload).is_err(), "{key}");
        let filter = decide(key, &identity, &create, &mut payload)
            .unwrap()
            .unwrap();
        assert_eq!(filter.owner, "u2");
    }
}

#[test]
fn assistant_search_accepts_read_or_create() {
    let identity = user("u2");
    let mut payload = ActionPayload::default();

    for granted in [
        [Permission::AssistantsRead].into_iter().collect::<PermissionSet>(),
        [Permission::AssistantsCreate].into_iter().collect(),
    ] {
        assert!(
            decide(ActionKey::AssistantsSearch, &identity, &granted, &mut payload)
                .unwrap()
                .is_some()
        );
    }

    let err = decide(
        ActionKey::AssistantsSearch,
        &identity,
        &PermissionSet::empty(),
        &mut payload,
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));
}

#[test]
fn store_operations_require_store_access() {
    let identity = user("u3");
    let mut payload = ActionPayload::default();

    let granted: PermissionSet = [Permission::StoreAccess].into_iter().collect();
    let filter = decide(ActionKey::Store, &identity, &granted, &mut payload)
        .unwrap()
        .unwrap();
    assert_eq!(filter.owner, "u3");

    let err = decide(
        ActionKey::Store,
        &identity,
        &PermissionSet::empty(),
        &mut payload,
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::Forbidden(_)));
}

#[test]
fn studio_identity_bypasses_every_rule() {
    let studio = user(STUDIO_IDENTITY);
    // No permissions at all: the bypass must fire before any grant check.
    let none = PermissionSet::empty();

    for key in ActionKey::ALL {
        let mut payload = ActionPayload::default();
        let filter = decide(key, &studio, &none, &mut payload).unwrap();
        assert!(filter.is_none(), "{key} must not scope the studio identity");
        assert_eq!(payload.owner(), None, "{key} must not stamp for studio");
    }
}

#[test]
fn filters_always_carry_the_caller_id() {
    let identity = user("caller-9");
    let full = PermissionSet::full();

    for key in ActionKey::ALL {
        let mut payload = ActionPayload::default();
        let filter = decide(key, &identity, &full, &mut payload)
            .unwrap()
            .expect("non-studio callers are always scoped");
        assert_eq!(filter.owner, "caller-9", "{key}");
    }
}

#[test]
fn repeated_stamping_is_stable() {
    let identity = user("u1");
    let full = PermissionSet::full();
    let mut payload = ActionPayload::default();

    decide(ActionKey::ThreadsCreate, &identity, &full, &mut payload).unwrap();
    let first = payload.clone();
    decide(ActionKey::ThreadsCreate, &identity, &full, &mut payload).unwrap();
    assert_eq!(payload, first);
}
