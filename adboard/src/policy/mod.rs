//! Ownership and role checks.
//!
//! Every authorization decision is a pure function of an explicit
//! [`Identity`] and the resource being touched; there is no ambient
//! current-user state anywhere in the crate. Managers apply these checks
//! before any query-level filtering, so combining list filters can never
//! widen what a caller is allowed to see.

use crate::auth::models::{Identity, UserId};

/// Outcome of a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Forbidden,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Access::Allow
    }
}

/// Visibility scope for report listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    /// Staff see every report.
    All,
    /// Everyone else sees only reports they filed.
    Own(UserId),
}

/// Update and delete require the caller to be the author or staff.
/// Creation and reads are governed elsewhere; authorship is immutable.
pub fn can_modify_advertisement(identity: &Identity, author_id: UserId) -> Access {
    if identity.is_staff() || identity.user_id == author_id {
        Access::Allow
    } else {
        Access::Forbidden
    }
}

/// Only staff may flip a report's is-read flag.
pub fn can_mark_report_read(identity: &Identity) -> Access {
    if identity.is_staff() {
        Access::Allow
    } else {
        Access::Forbidden
    }
}

/// Which reports a caller may list.
pub fn report_scope(identity: &Identity) -> ReportScope {
    if identity.is_staff() {
        ReportScope::All
    } else {
        ReportScope::Own(identity.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    fn identity(user_id: UserId, role: Role) -> Identity {
        Identity {
            user_id,
            username: format!("user_{user_id}"),
            role,
        }
    }

    #[test]
    fn author_may_modify_own_advertisement() {
        let author = identity(1, Role::User);
        assert_eq!(can_modify_advertisement(&author, 1), Access::Allow);
    }

    #[test]
    fn stranger_may_not_modify() {
        let other = identity(2, Role::User);
        assert_eq!(can_modify_advertisement(&other, 1), Access::Forbidden);
    }

    #[test]
    fn staff_may_modify_anything() {
        let staff = identity(99, Role::Staff);
        assert_eq!(can_modify_advertisement(&staff, 1), Access::Allow);
        assert_eq!(can_modify_advertisement(&staff, 99), Access::Allow);
    }

    #[test]
    fn modify_matrix_is_exactly_author_or_staff() {
        // For all (caller, author) pairs: allow iff caller == author or staff.
        for caller_id in 1..=3 {
            for author_id in 1..=3 {
                for role in [Role::User, Role::Staff] {
                    let caller = identity(caller_id, role);
                    let expected = if role == Role::Staff || caller_id == author_id {
                        Access::Allow
                    } else {
                        Access::Forbidden
                    };
                    assert_eq!(can_modify_advertisement(&caller, author_id), expected);
                }
            }
        }
    }

    #[test]
    fn only_staff_mark_reports_read() {
        assert_eq!(
            can_mark_report_read(&identity(1, Role::User)),
            Access::Forbidden
        );
        assert_eq!(
            can_mark_report_read(&identity(1, Role::Staff)),
            Access::Allow
        );
    }

    #[test]
    fn report_scope_follows_role() {
        assert_eq!(report_scope(&identity(7, Role::User)), ReportScope::Own(7));
        assert_eq!(report_scope(&identity(7, Role::Staff)), ReportScope::All);
    }
}
