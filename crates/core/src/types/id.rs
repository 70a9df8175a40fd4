//! Newtype IDs for type-safe entity references.
//!
//! The product backend issues opaque string identifiers (document IDs), so
//! IDs here wrap a `String` rather than an integer.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use kestrel_core::define_id;
/// define_id!(SkuId);
/// define_id!(ShipmentId);
///
/// let sku = SkuId::new("abc");
/// let shipment = ShipmentId::new("abc");
///
/// // These are different types, so this won't compile:
/// // let _: SkuId = shipment;
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

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
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

// Define standard entity IDs
define_id!(ProductId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_string() {
        let id = ProductId::new("64f1c0ffee");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"64f1c0ffee\"");

        let parsed: ProductId = serde_json::from_str("\"64f1c0ffee\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UserId::from("editor-7").to_string(), "editor-7");
    }
}
