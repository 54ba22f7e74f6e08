//! Capability tokens.
//!
//! Every mutating request must present a token bound to an
//! operation-specific scope string, so a token minted for one
//! operation/resource pair cannot authorize another.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// An operation + resource pair a token can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<'a> {
    /// Create a favorite of the given target.
    FavoriteCreate {
        /// Target being favorited.
        target_id: &'a str,
    },
    /// Edit an existing favorite.
    FavoriteEdit {
        /// Favorite being edited.
        favorite_id: &'a str,
    },
    /// Remove an existing favorite.
    FavoriteRemove {
        /// Favorite being removed.
        favorite_id: &'a str,
    },
    /// Create a list.
    ListCreate,
    /// Edit an existing list.
    ListEdit {
        /// List being edited.
        list_id: &'a str,
    },
    /// Remove an existing list.
    ListRemove {
        /// List being removed.
        list_id: &'a str,
    },
}

impl Capability<'_> {
    /// The scope string the token is derived from.
    #[must_use]
    pub fn scope(&self) -> String {
        match self {
            Self::FavoriteCreate { target_id } => format!("favorite-create:{target_id}"),
            Self::FavoriteEdit { favorite_id } => format!("favorite-edit:{favorite_id}"),
            Self::FavoriteRemove { favorite_id } => format!("favorite-remove:{favorite_id}"),
            Self::ListCreate => "list-create".to_string(),
            Self::ListEdit { list_id } => format!("list-edit:{list_id}"),
            Self::ListRemove { list_id } => format!("list-remove:{list_id}"),
        }
    }
}

/// Issues and verifies capability tokens.
#[derive(Clone)]
pub struct CapabilityService {
    secret: String,
}

impl CapabilityService {
    /// Create a new capability service.
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self { secret }
    }

    fn mac(&self, scope: &str) -> HmacSha256 {
        #[allow(clippy::expect_used)]
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(scope.as_bytes());
        mac
    }

    /// Issue a token for a capability.
    #[must_use]
    pub fn issue(&self, capability: &Capability<'_>) -> String {
        let mac = self.mac(&capability.scope());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Verify a presented token against a capability scope.
    #[must_use]
    pub fn verify(&self, capability: &Capability<'_>, token: &str) -> bool {
        let Ok(bytes) = hex::decode(token) else {
            return false;
        };

        self.mac(&capability.scope()).verify_slice(&bytes).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CapabilityService {
        CapabilityService::new("test-secret".to_string())
    }

    #[test]
    fn test_issue_and_verify() {
        let svc = service();
        let cap = Capability::FavoriteCreate { target_id: "target1" };

        let token = svc.issue(&cap);
        assert!(svc.verify(&cap, &token));
    }

    #[test]
    fn test_token_is_scope_bound() {
        let svc = service();
        let create = Capability::FavoriteCreate { target_id: "target1" };
        let token = svc.issue(&create);

        // Same resource, different operation
        assert!(!svc.verify(&Capability::FavoriteRemove { favorite_id: "target1" }, &token));
        // Same operation, different resource
        assert!(!svc.verify(&Capability::FavoriteCreate { target_id: "target2" }, &token));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = service();
        let cap = Capability::ListCreate;

        assert!(!svc.verify(&cap, "not-hex"));
        assert!(!svc.verify(&cap, ""));
        assert!(!svc.verify(&cap, "deadbeef"));
    }

    #[test]
    fn test_secret_matters() {
        let cap = Capability::ListEdit { list_id: "list1" };
        let token = service().issue(&cap);

        let other = CapabilityService::new("other-secret".to_string());
        assert!(!other.verify(&cap, &token));
    }
}
