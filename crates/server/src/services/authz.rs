//! Admin authorization gate.
//!
//! Decides whether the caller may mutate shared content (catalog, inquiries,
//! contact settings, the admin allowlist). The decision runs these strategies
//! in order and stops at the first grant:
//!
//! 1. **Superuser email** - the deployment-configured bootstrap admin
//! 2. **Role flag** - the session principal carries `role == "admin"`
//! 3. **Allowlist lookup** - the normalized email is a key in `admin_emails`
//!
//! Emails are compared trimmed and lowercased on both sides. Any failure to
//! read the session or the allowlist denies access.

use std::future::Future;

use safar_core::normalize_email;

use crate::db::RepositoryError;
use crate::models::Principal;

/// Role value that grants admin rights directly.
pub const ADMIN_ROLE: &str = "admin";

/// Source of allowlist membership.
///
/// Implemented by `AdminEmailRepository`; tests substitute fixed sets.
pub trait AllowlistLookup: Sync {
    /// Whether `email` (already normalized) has an allowlist entry.
    fn is_allowlisted(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Which strategy granted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSource {
    SuperuserEmail,
    RoleFlag,
    Allowlist,
}

impl GrantSource {
    /// Stable label for logs and error-tracking tags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperuserEmail => "superuser_email",
            Self::RoleFlag => "role_flag",
            Self::Allowlist => "allowlist",
        }
    }
}

/// Why access was denied. Logged, never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No principal, or a principal without an email.
    Anonymous,
    /// Authenticated, but no strategy granted access.
    NotAdmin,
    /// The session could not be read.
    SessionUnavailable,
    /// The allowlist could not be queried.
    LookupFailed,
}

/// Outcome of [`AdminGate::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Granted { email: String, via: GrantSource },
    Denied(DenyReason),
}

impl Authorization {
    /// Whether access was granted.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    SuperuserEmail,
    RoleFlag,
    AllowlistLookup,
}

const STRATEGIES: [Strategy; 3] = [
    Strategy::SuperuserEmail,
    Strategy::RoleFlag,
    Strategy::AllowlistLookup,
];

/// The authorization gate, configured with the optional superuser email.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    superuser_email: Option<String>,
}

impl AdminGate {
    /// Create a gate. A blank superuser email disables that strategy.
    #[must_use]
    pub fn new(superuser_email: Option<&str>) -> Self {
        let superuser_email = superuser_email
            .map(normalize_email)
            .filter(|email| !email.is_empty());
        Self { superuser_email }
    }

    /// Decide whether `principal` is an admin.
    pub async fn authorize<L: AllowlistLookup>(
        &self,
        principal: Option<&Principal>,
        allowlist: &L,
    ) -> Authorization {
        let Some(principal) = principal else {
            return Authorization::Denied(DenyReason::Anonymous);
        };
        let email = principal
            .email
            .as_deref()
            .map(normalize_email)
            .unwrap_or_default();
        if email.is_empty() {
            return Authorization::Denied(DenyReason::Anonymous);
        }

        for strategy in STRATEGIES {
            match self.check(strategy, principal, &email, allowlist).await {
                Ok(Some(via)) => return Authorization::Granted { email, via },
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(email = %email, error = %e, "Allowlist lookup failed, denying");
                    return Authorization::Denied(DenyReason::LookupFailed);
                }
            }
        }

        Authorization::Denied(DenyReason::NotAdmin)
    }

    async fn check<L: AllowlistLookup>(
        &self,
        strategy: Strategy,
        principal: &Principal,
        email: &str,
        allowlist: &L,
    ) -> Result<Option<GrantSource>, RepositoryError> {
        let granted = match strategy {
            Strategy::SuperuserEmail => self.superuser_email.as_deref() == Some(email),
            Strategy::RoleFlag => principal.role.as_deref() == Some(ADMIN_ROLE),
            Strategy::AllowlistLookup => allowlist.is_allowlisted(email).await?,
        };

        Ok(granted.then_some(match strategy {
            Strategy::SuperuserEmail => GrantSource::SuperuserEmail,
            Strategy::RoleFlag => GrantSource::RoleFlag,
            Strategy::AllowlistLookup => GrantSource::Allowlist,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct FixedAllowlist {
        emails: HashSet<String>,
        calls: AtomicUsize,
    }

    impl FixedAllowlist {
        fn with(emails: &[&str]) -> Self {
            Self {
                emails: emails.iter().map(|e| normalize_email(e)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl AllowlistLookup for FixedAllowlist {
        async fn is_allowlisted(&self, email: &str) -> Result<bool, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.emails.contains(email))
        }
    }

    struct BrokenAllowlist;

    impl AllowlistLookup for BrokenAllowlist {
        async fn is_allowlisted(&self, _email: &str) -> Result<bool, RepositoryError> {
            Err(RepositoryError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_no_principal_is_anonymous() {
        let gate = AdminGate::new(Some("root@example.com"));
        let result = gate.authorize(None, &FixedAllowlist::default()).await;
        assert_eq!(result, Authorization::Denied(DenyReason::Anonymous));
    }

    #[tokio::test]
    async fn test_missing_email_denied_regardless_of_role() {
        let gate = AdminGate::new(None);
        let allowlist = FixedAllowlist::with(&[""]);
        for principal in [
            Principal::default().role(ADMIN_ROLE),
            Principal::with_email("   ").role(ADMIN_ROLE),
            Principal::default(),
        ] {
            let result = gate.authorize(Some(&principal), &allowlist).await;
            assert_eq!(result, Authorization::Denied(DenyReason::Anonymous));
        }
        assert_eq!(allowlist.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_superuser_matches_after_normalization() {
        let gate = AdminGate::new(Some("  Root@Example.COM "));
        let allowlist = FixedAllowlist::default();
        let principal = Principal::with_email("root@example.com ");

        let result = gate.authorize(Some(&principal), &allowlist).await;
        assert_eq!(
            result,
            Authorization::Granted {
                email: "root@example.com".to_string(),
                via: GrantSource::SuperuserEmail
            }
        );
        assert_eq!(allowlist.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_role_flag_is_exact() {
        let gate = AdminGate::new(None);
        let allowlist = FixedAllowlist::default();

        let admin = Principal::with_email("staff@example.com").role("admin");
        let result = gate.authorize(Some(&admin), &allowlist).await;
        assert!(matches!(
            result,
            Authorization::Granted {
                via: GrantSource::RoleFlag,
                ..
            }
        ));

        let shouty = Principal::with_email("staff@example.com").role("Admin");
        let result = gate.authorize(Some(&shouty), &allowlist).await;
        assert_eq!(result, Authorization::Denied(DenyReason::NotAdmin));
    }

    #[tokio::test]
    async fn test_allowlist_matches_any_casing_and_whitespace() {
        let gate = AdminGate::new(None);
        let allowlist = FixedAllowlist::with(&["Admin@Example.com "]);

        for variant in [
            "admin@example.com",
            "ADMIN@EXAMPLE.COM",
            "  Admin@Example.com",
            "aDmIn@eXaMpLe.CoM\t",
        ] {
            let result = gate
                .authorize(Some(&Principal::with_email(variant)), &allowlist)
                .await;
            assert_eq!(
                result,
                Authorization::Granted {
                    email: "admin@example.com".to_string(),
                    via: GrantSource::Allowlist
                },
                "variant {variant:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_admin() {
        let gate = AdminGate::new(Some("root@example.com"));
        let allowlist = FixedAllowlist::with(&["admin@example.com"]);
        let result = gate
            .authorize(Some(&Principal::with_email("visitor@example.com")), &allowlist)
            .await;
        assert_eq!(result, Authorization::Denied(DenyReason::NotAdmin));
        assert!(!result.is_granted());
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_closed() {
        let gate = AdminGate::new(None);
        let result = gate
            .authorize(Some(&Principal::with_email("admin@example.com")), &BrokenAllowlist)
            .await;
        assert_eq!(result, Authorization::Denied(DenyReason::LookupFailed));
    }

    #[tokio::test]
    async fn test_earlier_tiers_skip_broken_lookup() {
        let gate = AdminGate::new(Some("root@example.com"));
        let result = gate
            .authorize(Some(&Principal::with_email("ROOT@example.com")), &BrokenAllowlist)
            .await;
        assert!(result.is_granted());
    }

    #[tokio::test]
    async fn test_blank_superuser_disabled() {
        let gate = AdminGate::new(Some("   "));
        let result = gate
            .authorize(
                Some(&Principal::with_email("someone@example.com")),
                &FixedAllowlist::default(),
            )
            .await;
        assert_eq!(result, Authorization::Denied(DenyReason::NotAdmin));
    }

    #[test]
    fn test_grant_source_labels() {
        assert_eq!(GrantSource::SuperuserEmail.as_str(), "superuser_email");
        assert_eq!(GrantSource::RoleFlag.as_str(), "role_flag");
        assert_eq!(GrantSource::Allowlist.as_str(), "allowlist");
    }
}
