//! Newtype IDs for type-safe entity references.
//!
//! The commerce API identifies every document with a string object ID
//! (24 hex characters for Mongo-style IDs). Use the `define_id!` macro to
//! create wrappers that prevent accidentally passing a brand ID where a
//! product ID is expected.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use freshcart_core::define_id;
/// define_id!(ReviewId);
/// define_id!(CouponId);
///
/// let review = ReviewId::new("6428ebc6dc1175abc65ca0b9");
/// assert_eq!(review.as_str(), "6428ebc6dc1175abc65ca0b9");
///
/// // These are different types, so this won't compile:
/// // let _: CouponId = review;
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
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether this looks like a 24-character hex object ID.
            ///
            /// The API accepts other formats in places, so this is only used
            /// to reject obviously malformed path segments early.
            #[must_use]
            pub fn is_object_id(&self) -> bool {
                self.0.len() == 24 && self.0.bytes().all(|b| b.is_ascii_hexdigit())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define the API's entity IDs
define_id!(ProductId);
define_id!(CategoryId);
define_id!(SubcategoryId);
define_id!(BrandId);
define_id!(CartId);
define_id!(CartItemId);
define_id!(AddressId);
define_id!(UserId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_as_str() {
        let id = ProductId::new("6428ebc6dc1175abc65ca0b9");
        assert_eq!(id.as_str(), "6428ebc6dc1175abc65ca0b9");
        assert_eq!(id.to_string(), "6428ebc6dc1175abc65ca0b9");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id: BrandId = serde_json::from_str("\"64089bbe24b25627a253158b\"").unwrap();
        assert_eq!(id.as_str(), "64089bbe24b25627a253158b");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"64089bbe24b25627a253158b\""
        );
    }

    #[test]
    fn test_is_object_id() {
        assert!(CategoryId::new("6439d58a0049ad0b52b9003f").is_object_id());
        assert!(!CategoryId::new("not-an-id").is_object_id());
        assert!(!CategoryId::new("6439d58a0049ad0b52b9003").is_object_id());
        assert!(!CategoryId::new("6439d58a0049ad0b52b9003z").is_object_id());
    }

    #[test]
    fn test_id_conversions() {
        let id = UserId::from("abc");
        let raw: String = id.clone().into();
        assert_eq!(raw, "abc");
        assert_eq!(id.into_inner(), "abc");
    }
}
