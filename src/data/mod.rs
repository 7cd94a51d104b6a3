//! Catalog and worldstate records, the normalizers that build them from
//! upstream JSON, and the pure search filter over the catalog.

/// String-backed tag with a known set of values. Unknown upstream values are
/// kept verbatim in `Unlisted` and serialize back unchanged.
macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unlisted(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::Unlisted(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($text => Self::$variant,)+
                    _ => Self::Unlisted(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(tag: $name) -> Self {
                match tag {
                    $name::Unlisted(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod drop_table;
pub mod format;
pub mod item;
pub mod lenient;
pub mod market;
pub mod relic;
pub mod search;
pub mod seed;
pub mod timestamp;
pub mod worldstate;

/// Slug used when a record carries no id: lowercase, each whitespace run
/// collapsed to `_`. Falls back to `"unknown"` when there is no usable name.
pub(crate) fn slug_id(name: Option<&str>) -> String {
    let Some(name) = name else {
        return "unknown".to_string();
    };
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            slug.extend(ch.to_lowercase());
        }
    }
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}

/// Drop chance as a finite number, 0 when absent.
pub(crate) fn chance_or_zero(raw: Option<f64>) -> f64 {
    raw.filter(|c| c.is_finite()).unwrap_or(0.0)
}
