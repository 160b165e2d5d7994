/// Authorization: permission table and access predicates
///
/// Every check is a stateless predicate over the acting user and the target
/// resource. Role checks go through one declarative table mapping each
/// [`Action`] and [`Role`] to a [`Capability`]; a user's capability is the
/// strongest one granted by any of their roles.
///
/// # Permission Model
///
/// 1. **AnyGrade**: the action is allowed for every grade
/// 2. **OwnGrade**: allowed only when the target's grade matches the user's
///    assigned grade after normalization
/// 3. **None**: forbidden
///
/// Admin and Tribe Leader hold AnyGrade for almost everything, Counselors
/// are scoped to their grade. Message edits follow authorship instead, and
/// role grants have their own rule (see [`can_assign_role`]).
///
/// # Example
///
/// ```
/// use scoutstribe_shared::auth::authorization::{require_grade, Action};
/// use scoutstribe_shared::models::{Role, User};
///
/// let counselor = User {
///     id: 3,
///     email: "counselor@scoutstribe.com".to_string(),
///     password_hash: String::new(),
///     roles: [Role::Counselor].into_iter().collect(),
///     grade: Some("8".to_string()),
/// };
///
/// assert!(require_grade(&counselor, Action::CreateChannel, "Grade 8").is_ok());
/// assert!(require_grade(&counselor, Action::CreateChannel, "9").is_err());
/// ```

use crate::grade;
use crate::models::{Channel, Message, Role, RoleSet, User};

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// None of the user's roles allows the action
    #[error("Insufficient permissions to {0}")]
    InsufficientRole(Action),

    /// Allowed only for the user's own grade, and the target is another grade
    #[error("Not authorized to {action} for grade {grade}")]
    GradeMismatch { action: Action, grade: String },

    /// User neither owns the resource nor is an Admin
    #[error("Not authorized to modify this resource")]
    NotOwner,

    /// Granting or revoking a role the user has no authority over
    #[error("Not authorized to grant or revoke the {0} role")]
    RoleNotAssignable(Role),
}

/// Actions subject to role checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ViewChannel,
    CreateChannel,
    ViewMembers,
    ManageMembers,
    TransferMembers,
    AdvanceGrades,
    ViewEvents,
    CreateGradeEvent,
    CreateGlobalEvent,
    RecordAttendance,
    ViewEventStats,
    ManageUsers,
    DeleteUsers,
}

impl Action {
    /// Human-readable description, used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Action::ViewChannel => "view this channel",
            Action::CreateChannel => "create channels",
            Action::ViewMembers => "view members",
            Action::ManageMembers => "manage members",
            Action::TransferMembers => "transfer members",
            Action::AdvanceGrades => "advance grades",
            Action::ViewEvents => "view events",
            Action::CreateGradeEvent => "create grade events",
            Action::CreateGlobalEvent => "create global events",
            Action::RecordAttendance => "record attendance",
            Action::ViewEventStats => "view event statistics",
            Action::ManageUsers => "manage users",
            Action::DeleteUsers => "delete users",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// What a role may do for an action, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capability {
    None,
    OwnGrade,
    AnyGrade,
}

impl Role {
    /// Permission table entry for this role
    pub fn capability(&self, action: Action) -> Capability {
        use Capability::*;

        match (self, action) {
            (Role::Admin, _) => AnyGrade,

            (Role::TribeLeader, Action::DeleteUsers) => None,
            (Role::TribeLeader, _) => AnyGrade,

            (
                Role::Counselor,
                Action::ViewChannel
                | Action::CreateChannel
                | Action::ViewMembers
                | Action::ManageMembers
                | Action::ViewEvents
                | Action::CreateGradeEvent
                | Action::RecordAttendance,
            ) => OwnGrade,
            (Role::Counselor, _) => None,
        }
    }
}

/// Strongest capability any of `roles` grants for `action`
pub fn capability(roles: &RoleSet, action: Action) -> Capability {
    roles
        .iter()
        .map(|role| role.capability(action))
        .max()
        .unwrap_or(Capability::None)
}

/// Checks whether `user` may perform `action` on something in `target_grade`
pub fn can_access(user: &User, action: Action, target_grade: &str) -> bool {
    match capability(&user.roles, action) {
        Capability::AnyGrade => true,
        Capability::OwnGrade => grade::matches_assigned(user.grade.as_deref(), target_grade),
        Capability::None => false,
    }
}

/// Requires some capability for `action`, returning it
///
/// Use this for collection-level endpoints, then filter with [`can_access`]
/// when the capability is only `OwnGrade`.
pub fn require(user: &User, action: Action) -> Result<Capability, AuthzError> {
    match capability(&user.roles, action) {
        Capability::None => Err(AuthzError::InsufficientRole(action)),
        granted => Ok(granted),
    }
}

/// Requires `action` to be allowed for `target_grade`
pub fn require_grade(user: &User, action: Action, target_grade: &str) -> Result<(), AuthzError> {
    require(user, action)?;

    if !can_access(user, action, target_grade) {
        return Err(AuthzError::GradeMismatch {
            action,
            grade: target_grade.to_string(),
        });
    }

    Ok(())
}

/// Checks whether `user` may read and post in `channel`
///
/// Admins and Tribe Leaders see every channel; Counselors see channels of
/// their own grade.
pub fn can_access_channel(user: &User, channel: &Channel) -> bool {
    can_access(user, Action::ViewChannel, &channel.grade)
}

/// Requires `user` to be the message author or an Admin
pub fn require_message_author(user: &User, message: &Message) -> Result<(), AuthzError> {
    if message.user_id == user.id || user.has_role(Role::Admin) {
        return Ok(());
    }

    Err(AuthzError::NotOwner)
}

/// Checks whether `actor` may grant (or revoke) `role`
///
/// - Admin: only Admins
/// - Tribe Leader: Admins and Tribe Leaders
/// - Counselor: anyone
pub fn can_assign_role(actor: &User, role: Role) -> bool {
    match role {
        Role::Admin => actor.has_role(Role::Admin),
        Role::TribeLeader => actor.has_role(Role::Admin) || actor.has_role(Role::TribeLeader),
        Role::Counselor => true,
    }
}

/// Requires `actor` to have authority over every role that changes
///
/// Roles present in only one of `current` and `requested` are being granted
/// or revoked; roles kept as-is need no authority.
pub fn require_role_change(
    actor: &User,
    current: &RoleSet,
    requested: &RoleSet,
) -> Result<(), AuthzError> {
    match current
        .symmetric_difference(requested)
        .find(|role| !can_assign_role(actor, **role))
    {
        Some(role) => Err(AuthzError::RoleNotAssignable(*role)),
        None => Ok(()),
    }
}
