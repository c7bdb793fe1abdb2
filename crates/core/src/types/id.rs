//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. The AgroLink
//! backend issues opaque string identifiers (UUIDs in practice), so the
//! wrappers hold a `String` and serialize transparently.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` / `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use agrolink_core::define_id;
/// define_id!(UserId);
/// define_id!(PayoutId);
///
/// let user_id = UserId::new("u-1");
/// let payout_id = PayoutId::new("p-1");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = payout_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(PayoutId);
define_id!(VerificationId);
define_id!(TransactionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = PayoutId::new("7a4f2c10");
        assert_eq!(id.as_str(), "7a4f2c10");
        assert_eq!(id.to_string(), "7a4f2c10");
        assert_eq!(id.clone().into_inner(), "7a4f2c10");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = VerificationId::new("v-42");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"v-42\"");

        let back: VerificationId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // UserId and TransactionId with the same inner value are unrelated
        let user = UserId::new("1");
        let txn = TransactionId::new("1");
        assert_eq!(user.as_str(), txn.as_str());
    }
}
