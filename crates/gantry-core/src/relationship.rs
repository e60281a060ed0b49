//! # Relationship Lifecycle
//!
//! One state machine for both relationship kinds the registry tracks:
//! memberships (user ↔ namespace) and maintainerships (namespace ↔ package).
//!
//! A relationship that has never been touched has no stored row at all —
//! absence is modeled as `None`, never as a fifth status value.
//!
//! ## Transitions
//!
//! ```text
//!  (absent) ──invite()──▶ PENDING ──accept()──▶ ACTIVE
//!                            │                     │
//!                        decline()             remove()
//!                            │                     │
//!                            ▼                     ▼
//!                        DECLINED               REMOVED
//!                            │                     │
//!                        invite()              invite()
//!                            │                     │
//!                            └──────▶ PENDING ◀────┘
//! ```
//!
//! `remove()` is also valid from `PENDING` (withdrawing an invitation), and
//! `invite()` restarts the cycle from `DECLINED` or `REMOVED`.
//!
//! The transition table lives in exactly one place: [`RelationshipAction`]
//! declares which source states it is valid from, and
//! [`RelationshipStatus::apply`] consults that table. The two kinds differ
//! only in the denial codes they put on the wire, expressed through the
//! [`RelationshipKind`] trait.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::names::UserName;

// ── Status ───────────────────────────────────────────────────────────

/// The stored lifecycle states of a relationship.
///
/// Absence of a relationship is `Option::<RelationshipStatus>::None`, not a
/// variant here — a row that exists always has one of these four statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStatus {
    /// An invitation has been extended and not yet answered.
    Pending,
    /// The invitation was accepted; the relationship is in force.
    Active,
    /// The invitation was declined. A fresh invite restarts the cycle.
    Declined,
    /// The relationship was ended (or a pending invite withdrawn).
    Removed,
}

impl RelationshipStatus {
    /// The lowercase wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Declined => "declined",
            Self::Removed => "removed",
        }
    }

    /// Parse a wire name back into a status.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "declined" => Some(Self::Declined),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }

    /// Apply an action to the current state.
    ///
    /// `current` is `None` when no relationship has ever been stored for
    /// the pair in question.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the action is not valid from
    /// `current`; [`TransitionError::denial`] names the refusal.
    pub fn apply(
        current: Option<Self>,
        action: RelationshipAction,
    ) -> Result<Self, TransitionError> {
        if action.valid_sources().contains(&current) {
            Ok(action.target())
        } else {
            Err(TransitionError { action, current })
        }
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Actions ──────────────────────────────────────────────────────────

/// The four operations that drive a relationship through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipAction {
    /// Extend (or re-extend) an invitation.
    Invite,
    /// Accept a pending invitation. Only the invitee may do this.
    Accept,
    /// Decline a pending invitation.
    Decline,
    /// End an active relationship or withdraw a pending invitation.
    Remove,
}

impl RelationshipAction {
    /// The lowercase name of this action, for logs and error text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Remove => "remove",
        }
    }

    /// The source states this action is valid from.
    ///
    /// `None` in the slice means the action is valid when no relationship
    /// is stored at all.
    pub fn valid_sources(&self) -> &'static [Option<RelationshipStatus>] {
        match self {
            Self::Invite => &[
                None,
                Some(RelationshipStatus::Declined),
                Some(RelationshipStatus::Removed),
            ],
            Self::Accept | Self::Decline => &[Some(RelationshipStatus::Pending)],
            Self::Remove => &[
                Some(RelationshipStatus::Active),
                Some(RelationshipStatus::Pending),
            ],
        }
    }

    /// The state a successful application of this action lands in.
    pub fn target(&self) -> RelationshipStatus {
        match self {
            Self::Invite => RelationshipStatus::Pending,
            Self::Accept => RelationshipStatus::Active,
            Self::Decline => RelationshipStatus::Declined,
            Self::Remove => RelationshipStatus::Removed,
        }
    }
}

impl fmt::Display for RelationshipAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Refusals ─────────────────────────────────────────────────────────

/// An action applied to a state it is not valid from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {action} a relationship that is {}", current_name(.current))]
pub struct TransitionError {
    /// The action that was attempted.
    pub action: RelationshipAction,
    /// The state the relationship was in (`None` when absent).
    pub current: Option<RelationshipStatus>,
}

fn current_name(current: &Option<RelationshipStatus>) -> &'static str {
    match current {
        Some(status) => status.as_str(),
        None => "absent",
    }
}

impl TransitionError {
    /// Classify the refusal for wire-code purposes.
    pub fn denial(&self) -> Denial {
        use RelationshipAction::*;
        use RelationshipStatus::*;
        match (self.action, self.current) {
            (Invite, Some(Active)) => Denial::AlreadyActive,
            (Invite, _) => Denial::AlreadyPending,
            (Accept, Some(Active)) | (Decline, Some(Active)) => Denial::AlreadyActive,
            (Accept, Some(Declined)) | (Decline, Some(Declined)) => Denial::AlreadyDeclined,
            (Accept, _) | (Decline, _) => Denial::InviteMissing,
            (Remove, _) => Denial::NotRelated,
        }
    }
}

/// The reasons a relationship operation can be refused.
///
/// The first five fall out of the transition table. The last three come
/// from lookups around it: the bearer lacked authority, or one of the
/// parties does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denial {
    /// The relationship is already active.
    AlreadyActive,
    /// An invitation is already pending.
    AlreadyPending,
    /// The invitation was already declined.
    AlreadyDeclined,
    /// No pending invitation exists to accept or decline.
    InviteMissing,
    /// No relationship exists to remove.
    NotRelated,
    /// The bearer does not hold the authorizing relationship.
    BearerUnauthorized,
    /// The invitee does not exist.
    InviteeMissing,
    /// The namespace or package being joined does not exist.
    TargetMissing,
}

// ── Kinds ────────────────────────────────────────────────────────────

/// A kind of relationship: what the parties are, and which denial codes
/// the kind puts on the wire.
///
/// The lifecycle itself is shared — see [`RelationshipStatus::apply`].
pub trait RelationshipKind {
    /// The full wire code for a denial of this kind.
    fn denial_code(denial: Denial) -> &'static str;
}

/// User ↔ namespace relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership;

impl RelationshipKind for Membership {
    fn denial_code(denial: Denial) -> &'static str {
        match denial {
            Denial::AlreadyActive => "member.invite.invitee_already_member",
            Denial::AlreadyPending => "member.invite.pending",
            Denial::AlreadyDeclined => "member.invite.declined",
            Denial::InviteMissing => "member.invite.invite_dne",
            Denial::NotRelated => "member.invite.invitee_not_member",
            Denial::BearerUnauthorized => "member.invite.bearer_unauthorized",
            Denial::InviteeMissing => "member.invite.invitee_dne",
            Denial::TargetMissing => "member.invite.namespace_dne",
        }
    }
}

/// Namespace ↔ package relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maintainership;

impl RelationshipKind for Maintainership {
    fn denial_code(denial: Denial) -> &'static str {
        match denial {
            Denial::AlreadyActive => "maintainer.invite.already_accepted",
            Denial::AlreadyPending => "maintainer.invite.already_pending",
            Denial::AlreadyDeclined => "maintainer.invite.already_declined",
            // Maintainer denials do not distinguish a missing invitation
            // from a missing relationship.
            Denial::InviteMissing | Denial::NotRelated => {
                "maintainer.invite.invitee_not_maintainer"
            }
            Denial::BearerUnauthorized => "maintainer.invite.bearer_unauthorized",
            Denial::InviteeMissing => "maintainer.invite.invitee_dne",
            Denial::TargetMissing => "maintainer.invite.package_dne",
        }
    }
}

// ── Snapshot ─────────────────────────────────────────────────────────

/// A stored relationship as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// The current lifecycle state.
    pub status: RelationshipStatus,
    /// The user who extended the invitation.
    pub invited_by: UserName,
    /// When the relationship row was first created.
    pub created: DateTime<Utc>,
    /// When the row last changed state.
    pub updated: DateTime<Utc>,
}
