// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access policy.
//!
//! | Operation | Requirement |
//! |-----------|-------------|
//! | upload | role == ops |
//! | list files | verified client |
//! | request download link | verified client |
//! | redeem download link | verified client who requested the link |
//! | view download history | verified client |
//!
//! Evaluated after authentication; a violation is a 403, never a 401.

use super::claims::AuthenticatedUser;
use super::roles::Role;
use crate::error::ServiceError;

/// A privileged operation subject to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    Upload,
    ListFiles,
    RequestDownloadLink,
    /// Redeeming a link bound to `granting_user`.
    RedeemDownloadLink { granting_user: &'a str },
    ViewDownloadHistory,
}

impl Operation<'_> {
    fn denial_message(&self) -> &'static str {
        match self {
            Operation::Upload => "Only Ops can upload",
            Operation::ListFiles => "Only verified clients allowed",
            Operation::RequestDownloadLink
            | Operation::RedeemDownloadLink { .. }
            | Operation::ViewDownloadHistory => "Access denied",
        }
    }
}

/// Whether `user` may perform `operation`. Pure.
pub fn allowed(operation: Operation<'_>, user: &AuthenticatedUser) -> bool {
    match operation {
        Operation::Upload => user.role == Role::Ops,
        Operation::ListFiles
        | Operation::RequestDownloadLink
        | Operation::ViewDownloadHistory => user.is_verified_client(),
        Operation::RedeemDownloadLink { granting_user } => {
            user.is_verified_client() && user.email == granting_user
        }
    }
}

/// [`allowed`] as a `Result`, yielding `Forbidden` on violation.
pub fn authorize(operation: Operation<'_>, user: &AuthenticatedUser) -> Result<(), ServiceError> {
    if allowed(operation, user) {
        Ok(())
    } else {
        tracing::debug!(email = %user.email, role = %user.role, ?operation, "Access denied by policy");
        Err(ServiceError::Forbidden(operation.denial_message().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, role: Role, is_verified: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            email: email.to_string(),
            role,
            is_verified,
        }
    }

    #[test]
    fn upload_requires_ops_only() {
        assert!(allowed(Operation::Upload, &user("o@x.io", Role::Ops, false)));
        assert!(allowed(Operation::Upload, &user("o@x.io", Role::Ops, true)));
        assert!(!allowed(Operation::Upload, &user("c@x.io", Role::Client, true)));
        assert!(!allowed(Operation::Upload, &user("x@x.io", Role::Other, true)));
    }

    #[test]
    fn client_operations_require_verification() {
        let verified = user("c@x.io", Role::Client, true);
        let unverified = user("c@x.io", Role::Client, false);
        let ops = user("o@x.io", Role::Ops, true);

        for op in [
            Operation::ListFiles,
            Operation::RequestDownloadLink,
            Operation::ViewDownloadHistory,
        ] {
            assert!(allowed(op, &verified));
            assert!(!allowed(op, &unverified));
            assert!(!allowed(op, &ops));
        }
    }

    #[test]
    fn redeem_requires_grant_owner() {
        let owner = user("c@x.io", Role::Client, true);
        let other = user("d@x.io", Role::Client, true);
        let op = Operation::RedeemDownloadLink {
            granting_user: "c@x.io",
        };

        assert!(allowed(op, &owner));
        assert!(!allowed(op, &other));
        assert!(!allowed(op, &user("c@x.io", Role::Client, false)));
    }

    #[test]
    fn authorize_yields_forbidden() {
        let err = authorize(Operation::Upload, &user("c@x.io", Role::Client, true)).unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(ref m) if m == "Only Ops can upload"));
        assert!(authorize(Operation::Upload, &user("o@x.io", Role::Ops, false)).is_ok());
    }
}
