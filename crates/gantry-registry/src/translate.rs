//! # Storage Refusal Translation
//!
//! The storage service speaks machine codes; this gateway speaks people.
//! Each relationship operation owns a typed mapping from the codes it can
//! see to the message its callers read, with a required fallback for
//! anything outside the table. The response status comes from the code's
//! family: authorization failures are 403, missing things are 404, settled
//! relationships are 409, and unrecognized codes keep the storage
//! service's own status.
//!
//! Transport and decode failures never reach these tables; they
//! short-circuit to 502 before any code is consulted.

use axum::http::StatusCode;
use gantry_core::{Namespace, PackageRef, UserName};
use gantry_storage_client::{RemoteFailure, StorageError};

use crate::error::ApiError;

// ── Status classification ────────────────────────────────────────────

/// Code suffixes naming a relationship already settled: the request was
/// well formed, the outcome is a conflict.
const CONFLICT_SUFFIXES: &[&str] = &[
    "already_accepted",
    "already_pending",
    "already_declined",
    "invitee_already_member",
    "pending",
    "declined",
];

/// Choose the response status for a storage refusal code.
pub(crate) fn status_for(code: &str, storage_status: u16) -> StatusCode {
    let suffix = code.rsplit('.').next().unwrap_or(code);
    if suffix.ends_with("_unauthorized") {
        StatusCode::FORBIDDEN
    } else if suffix.ends_with("_dne")
        || suffix.ends_with("not_member")
        || suffix.ends_with("not_maintainer")
    {
        StatusCode::NOT_FOUND
    } else if CONFLICT_SUFFIXES.contains(&suffix) {
        StatusCode::CONFLICT
    } else {
        StatusCode::from_u16(storage_status).unwrap_or(StatusCode::BAD_GATEWAY)
    }
}

/// Split a refusal from a transport failure. Transport and decode failures
/// carry no code to translate.
fn refusal(err: StorageError) -> Result<RemoteFailure, ApiError> {
    match err {
        StorageError::Remote(failure) => Ok(failure),
        other => Err(ApiError::Upstream(other.to_string())),
    }
}

// ── member.invite.* ──────────────────────────────────────────────────

/// The `member.invite.*` code family emitted by membership operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberCode {
    InviteeDne,
    NamespaceDne,
    BearerUnauthorized,
    AlreadyMember,
    Pending,
    Declined,
    InviteDne,
    NotMember,
}

impl MemberCode {
    fn parse(code: &str) -> Option<Self> {
        Some(match code {
            "member.invite.invitee_dne" => Self::InviteeDne,
            "member.invite.namespace_dne" => Self::NamespaceDne,
            "member.invite.bearer_unauthorized" => Self::BearerUnauthorized,
            "member.invite.invitee_already_member" => Self::AlreadyMember,
            "member.invite.pending" => Self::Pending,
            "member.invite.declined" => Self::Declined,
            "member.invite.invite_dne" => Self::InviteDne,
            "member.invite.invitee_not_member" => Self::NotMember,
            _ => return None,
        })
    }
}

/// Translate a membership-invite refusal.
pub(crate) fn member_invite_error(
    err: StorageError,
    namespace: &Namespace,
    invitee: &str,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MemberCode::parse(&failure.code) {
        Some(MemberCode::InviteeDne) => format!("Unknown user for invite: \"{invitee}\"."),
        Some(MemberCode::NamespaceDne) => format!("Unknown namespace: \"{namespace}\"."),
        Some(MemberCode::BearerUnauthorized) => {
            format!("You are not authorized to add members to \"{namespace}\"")
        }
        Some(MemberCode::AlreadyMember) => {
            format!("{invitee} is already a member of {namespace}")
        }
        Some(MemberCode::Pending) | Some(MemberCode::Declined) => {
            format!("{invitee} has already been invited to join {namespace}")
        }
        _ => format!("Caught error inviting member to \"{namespace}\""),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

/// Translate a membership-removal refusal.
pub(crate) fn member_remove_error(
    err: StorageError,
    namespace: &Namespace,
    invitee: &str,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MemberCode::parse(&failure.code) {
        Some(MemberCode::InviteeDne) => format!("Unknown user for invite: \"{invitee}\"."),
        Some(MemberCode::NamespaceDne) => format!("Unknown namespace: \"{namespace}\"."),
        Some(MemberCode::BearerUnauthorized) => {
            format!("You are not authorized to remove members from \"{namespace}\"")
        }
        Some(MemberCode::NotMember) => {
            format!("\"{invitee}\" is not a member of \"{namespace}\" and has no pending invitation")
        }
        _ => format!("Caught error removing member from \"{namespace}\""),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

/// Translate a membership-accept refusal. The caller is the invitee.
pub(crate) fn member_accept_error(
    err: StorageError,
    namespace: &Namespace,
    user: &UserName,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MemberCode::parse(&failure.code) {
        Some(MemberCode::InviteeDne) => format!("Unknown user for invite: \"{user}\"."),
        Some(MemberCode::NamespaceDne) => format!("Unknown namespace: \"{namespace}\"."),
        Some(MemberCode::BearerUnauthorized) => {
            format!("You are not authorized to accept an invite for \"{user}\" on \"{namespace}\"")
        }
        Some(MemberCode::InviteDne) => "invitation not found".to_string(),
        _ => format!("Caught error accepting \"{namespace}\" invite for \"{user}\""),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

/// Translate a membership-decline refusal. The caller is the invitee.
pub(crate) fn member_decline_error(
    err: StorageError,
    namespace: &Namespace,
    user: &UserName,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MemberCode::parse(&failure.code) {
        Some(MemberCode::InviteeDne) => format!("Unknown user for invite: \"{user}\"."),
        Some(MemberCode::NamespaceDne) => format!("Unknown namespace: \"{namespace}\"."),
        Some(MemberCode::BearerUnauthorized) => {
            format!("You are not authorized to decline an invite for \"{user}\" on \"{namespace}\"")
        }
        Some(MemberCode::InviteDne) => "invitation not found".to_string(),
        _ => format!("Caught error declining \"{namespace}\" invite for \"{user}\""),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

// ── maintainer.invite.* ──────────────────────────────────────────────

/// The `maintainer.invite.*` code family emitted by maintainership
/// operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaintainerCode {
    InviteeDne,
    PackageDne,
    AlreadyAccepted,
    AlreadyPending,
    AlreadyDeclined,
    NotMaintainer,
    BearerUnauthorized,
}

impl MaintainerCode {
    fn parse(code: &str) -> Option<Self> {
        Some(match code {
            "maintainer.invite.invitee_dne" => Self::InviteeDne,
            "maintainer.invite.package_dne" => Self::PackageDne,
            "maintainer.invite.already_accepted" => Self::AlreadyAccepted,
            "maintainer.invite.already_pending" => Self::AlreadyPending,
            "maintainer.invite.already_declined" => Self::AlreadyDeclined,
            "maintainer.invite.invitee_not_maintainer" => Self::NotMaintainer,
            "maintainer.invite.bearer_unauthorized" => Self::BearerUnauthorized,
            _ => return None,
        })
    }
}

/// Translate a maintainer-invite refusal.
pub(crate) fn maintainer_invite_error(
    err: StorageError,
    package: &PackageRef,
    invitee: &str,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MaintainerCode::parse(&failure.code) {
        Some(MaintainerCode::InviteeDne) => format!("Unknown namespace: \"{invitee}\"."),
        Some(MaintainerCode::PackageDne) => format!("Unknown package: \"{invitee}\"."),
        Some(MaintainerCode::AlreadyAccepted) => {
            format!("Namespace \"{invitee}\" is already a member.")
        }
        Some(MaintainerCode::AlreadyDeclined) => {
            format!("Namespace \"{invitee}\" has declined this invite.")
        }
        _ => format!("Caught error inviting \"{invitee}\" to {package}"),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

/// Translate a maintainer-removal refusal.
pub(crate) fn maintainer_remove_error(
    err: StorageError,
    package: &PackageRef,
    invitee: &str,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MaintainerCode::parse(&failure.code) {
        Some(MaintainerCode::InviteeDne) => format!("Unknown namespace: \"{invitee}\"."),
        Some(MaintainerCode::PackageDne) => format!("Unknown package: \"{invitee}\"."),
        Some(MaintainerCode::AlreadyAccepted) => {
            format!("Namespace \"{invitee}\" is already a member.")
        }
        Some(MaintainerCode::AlreadyDeclined) => {
            format!("Namespace \"{invitee}\" has declined this invite.")
        }
        Some(MaintainerCode::NotMaintainer) => {
            format!("{invitee} was not a maintainer of {package}.")
        }
        _ => format!("Caught error removing \"{invitee}\" from {package}"),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

/// Translate a maintainer-accept refusal. The acting namespace is `member`.
pub(crate) fn maintainer_accept_error(
    err: StorageError,
    package: &PackageRef,
    member: &str,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MaintainerCode::parse(&failure.code) {
        Some(MaintainerCode::InviteeDne) => format!("Unknown namespace: \"{member}\"."),
        Some(MaintainerCode::PackageDne) => format!("Unknown package: \"{member}\"."),
        Some(MaintainerCode::NotMaintainer) => "invitation not found.".to_string(),
        _ => format!("Caught error accepting invitation to {package}"),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

/// Translate a maintainer-decline refusal. The acting namespace is `member`.
pub(crate) fn maintainer_decline_error(
    err: StorageError,
    package: &PackageRef,
    member: &str,
) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = match MaintainerCode::parse(&failure.code) {
        Some(MaintainerCode::InviteeDne) => format!("Unknown namespace: \"{member}\"."),
        Some(MaintainerCode::PackageDne) => format!("Unknown package: \"{member}\"."),
        Some(MaintainerCode::NotMaintainer) => "invitation not found.".to_string(),
        _ => format!("Caught error declining invitation to {package}"),
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

/// Translate a maintainers-listing failure.
pub(crate) fn maintainers_list_error(err: StorageError, package: &PackageRef) -> ApiError {
    let failure = match refusal(err) {
        Ok(failure) => failure,
        Err(api) => return api,
    };
    let message = if failure.status == 404 {
        format!("\"{package}\" does not exist.")
    } else {
        format!("Caught error fetching maintainers for \"{package}\".")
    };
    ApiError::remote(
        status_for(&failure.code, failure.status),
        failure.code,
        message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use gantry_core::PackageName;
    use gantry_storage_client::{RequestId, StorageConfig};

    fn remote(status: u16, code: &str) -> StorageError {
        StorageError::Remote(RemoteFailure {
            status,
            code: code.to_string(),
            message: "storage message".to_string(),
            headers: HeaderMap::new(),
            body: String::new(),
        })
    }

    fn namespace() -> Namespace {
        Namespace::parse("acme@github").unwrap()
    }

    fn package() -> PackageRef {
        PackageRef::new(namespace(), PackageName::new("widget").unwrap())
    }

    fn parts(err: ApiError) -> (StatusCode, String, String) {
        match err {
            ApiError::Remote {
                status,
                code,
                message,
            } => (status, code, message),
            other => panic!("expected a translated remote error, got: {other:?}"),
        }
    }

    // -- status classification --

    #[test]
    fn unauthorized_codes_are_forbidden() {
        assert_eq!(
            status_for("member.invite.bearer_unauthorized", 403),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for("maintainer.invite.bearer_unauthorized", 400),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn missing_things_are_not_found() {
        for code in [
            "member.invite.invitee_dne",
            "member.invite.namespace_dne",
            "member.invite.invite_dne",
            "member.invite.invitee_not_member",
            "maintainer.invite.package_dne",
            "maintainer.invite.invitee_not_maintainer",
        ] {
            assert_eq!(status_for(code, 500), StatusCode::NOT_FOUND, "{code}");
        }
    }

    #[test]
    fn settled_relationships_are_conflicts() {
        for code in [
            "member.invite.pending",
            "member.invite.declined",
            "member.invite.invitee_already_member",
            "maintainer.invite.already_accepted",
            "maintainer.invite.already_pending",
            "maintainer.invite.already_declined",
        ] {
            assert_eq!(status_for(code, 500), StatusCode::CONFLICT, "{code}");
        }
    }

    #[test]
    fn unrecognized_codes_keep_the_storage_status() {
        assert_eq!(status_for("unknown", 418), StatusCode::IM_A_TEAPOT);
        assert_eq!(status_for("route.unknown", 404), StatusCode::NOT_FOUND);
        assert_eq!(status_for("package.syncing", 409), StatusCode::CONFLICT);
    }

    #[test]
    fn unmappable_storage_status_becomes_bad_gateway() {
        assert_eq!(status_for("unknown", 0), StatusCode::BAD_GATEWAY);
    }

    // -- member tables --

    #[test]
    fn member_invite_messages() {
        let table = [
            (
                "member.invite.invitee_dne",
                "Unknown user for invite: \"bob\".",
            ),
            (
                "member.invite.namespace_dne",
                "Unknown namespace: \"acme@github\".",
            ),
            (
                "member.invite.bearer_unauthorized",
                "You are not authorized to add members to \"acme@github\"",
            ),
            (
                "member.invite.invitee_already_member",
                "bob is already a member of acme@github",
            ),
            (
                "member.invite.pending",
                "bob has already been invited to join acme@github",
            ),
            (
                "member.invite.declined",
                "bob has already been invited to join acme@github",
            ),
        ];
        for (code, expected) in table {
            let err = member_invite_error(remote(409, code), &namespace(), "bob");
            let (_, got_code, message) = parts(err);
            assert_eq!(got_code, code);
            assert_eq!(message, expected, "{code}");
        }
    }

    #[test]
    fn member_invite_unknown_code_falls_back() {
        let err = member_invite_error(remote(500, "weird.new.code"), &namespace(), "bob");
        let (status, code, message) = parts(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "weird.new.code");
        assert_eq!(message, "Caught error inviting member to \"acme@github\"");
    }

    #[test]
    fn member_remove_not_member_message() {
        let err = member_remove_error(
            remote(404, "member.invite.invitee_not_member"),
            &namespace(),
            "bob",
        );
        let (status, _, message) = parts(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            message,
            "\"bob\" is not a member of \"acme@github\" and has no pending invitation"
        );
    }

    #[test]
    fn member_accept_missing_invite_message() {
        let user = UserName::new("bob").unwrap();
        let err = member_accept_error(remote(404, "member.invite.invite_dne"), &namespace(), &user);
        let (status, _, message) = parts(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "invitation not found");
    }

    #[test]
    fn member_decline_unauthorized_message() {
        let user = UserName::new("bob").unwrap();
        let err = member_decline_error(
            remote(403, "member.invite.bearer_unauthorized"),
            &namespace(),
            &user,
        );
        let (status, _, message) = parts(err);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            message,
            "You are not authorized to decline an invite for \"bob\" on \"acme@github\""
        );
    }

    // -- maintainer tables --

    #[test]
    fn maintainer_invite_messages() {
        let table = [
            (
                "maintainer.invite.invitee_dne",
                "Unknown namespace: \"bob\".",
            ),
            ("maintainer.invite.package_dne", "Unknown package: \"bob\"."),
            (
                "maintainer.invite.already_accepted",
                "Namespace \"bob\" is already a member.",
            ),
            (
                "maintainer.invite.already_declined",
                "Namespace \"bob\" has declined this invite.",
            ),
        ];
        for (code, expected) in table {
            let err = maintainer_invite_error(remote(409, code), &package(), "bob");
            let (_, got_code, message) = parts(err);
            assert_eq!(got_code, code);
            assert_eq!(message, expected, "{code}");
        }
    }

    #[test]
    fn maintainer_invite_pending_falls_back_but_conflicts() {
        // already_pending has no dedicated message; the status class still
        // applies.
        let err = maintainer_invite_error(
            remote(409, "maintainer.invite.already_pending"),
            &package(),
            "bob",
        );
        let (status, _, message) = parts(err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "Caught error inviting \"bob\" to acme@github/widget");
    }

    #[test]
    fn maintainer_remove_not_maintainer_message() {
        let err = maintainer_remove_error(
            remote(404, "maintainer.invite.invitee_not_maintainer"),
            &package(),
            "bob",
        );
        let (status, _, message) = parts(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "bob was not a maintainer of acme@github/widget.");
    }

    #[test]
    fn maintainer_accept_not_maintainer_is_missing_invitation() {
        let err = maintainer_accept_error(
            remote(404, "maintainer.invite.invitee_not_maintainer"),
            &package(),
            "bob",
        );
        let (status, _, message) = parts(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "invitation not found.");
    }

    #[test]
    fn maintainer_decline_fallback_names_the_package() {
        let err = maintainer_decline_error(remote(500, "unknown"), &package(), "bob");
        let (_, _, message) = parts(err);
        assert_eq!(
            message,
            "Caught error declining invitation to acme@github/widget"
        );
    }

    // -- listing and transport --

    #[test]
    fn maintainers_listing_404_names_the_package() {
        let err = maintainers_list_error(remote(404, "package.dne"), &package());
        let (status, _, message) = parts(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "\"acme@github/widget\" does not exist.");
    }

    #[test]
    fn maintainers_listing_other_failures_fall_back() {
        let err = maintainers_list_error(remote(500, "unknown"), &package());
        let (_, _, message) = parts(err);
        assert_eq!(
            message,
            "Caught error fetching maintainers for \"acme@github/widget\"."
        );
    }

    #[tokio::test]
    async fn transport_failures_bypass_the_tables() {
        // Port 9 (discard) refuses connections, yielding a transport error
        // with no code to translate.
        let client =
            gantry_storage_client::StorageClient::new(StorageConfig::local(9).unwrap()).unwrap();
        let user = UserName::new("alice").unwrap();
        let err = client
            .namespaces()
            .invite_member(&RequestId::generate(), &namespace(), "bob", &user)
            .await
            .unwrap_err();
        match member_invite_error(err, &namespace(), "bob") {
            ApiError::Upstream(_) => {}
            other => panic!("expected an upstream error, got: {other:?}"),
        }
    }
}
