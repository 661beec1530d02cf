//! Composite keys.
//!
//! A composite key is `U+0000 type U+0000 attr1 U+0000 attr2 U+0000 ...`.
//! The leading NUL keeps composite keys out of the plain-key namespace, so a
//! plain range scan never sees index entries. A partial key (a prefix of the
//! attributes) covers the half-open range `[prefix, prefix + U+10FFFF)`.

use swapledger_types::{LedgerError, Result};

/// Separator and namespace marker.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0000}';

/// Highest Unicode scalar; used as the exclusive upper bound of prefix scans.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

fn validate_part(part: &str) -> Result<()> {
    if part.contains(COMPOSITE_KEY_NAMESPACE) || part.contains(MAX_UNICODE_RUNE) {
        return Err(LedgerError::InvalidArgument {
            reason: format!("composite key part {part:?} contains a reserved character"),
        });
    }
    Ok(())
}

/// Build a composite key from an object type and attribute values.
pub fn composite_key(object_type: &str, attrs: &[&str]) -> Result<String> {
    if object_type.is_empty() {
        return Err(LedgerError::InvalidArgument {
            reason: "composite key object type must not be empty".into(),
        });
    }
    validate_part(object_type)?;
    let mut key = String::with_capacity(
        2 + object_type.len() + attrs.iter().map(|a| a.len() + 1).sum::<usize>(),
    );
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(object_type);
    key.push(COMPOSITE_KEY_NAMESPACE);
    for attr in attrs {
        validate_part(attr)?;
        key.push_str(attr);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }
    Ok(key)
}

/// Split a composite key into its object type and attributes.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>)> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .and_then(|rest| rest.strip_suffix(COMPOSITE_KEY_NAMESPACE))
        .ok_or_else(|| LedgerError::InvalidArgument {
            reason: format!("not a composite key: {key:?}"),
        })?;
    let mut parts = body.split(COMPOSITE_KEY_NAMESPACE);
    let object_type = parts.next().unwrap_or_default().to_string();
    Ok((object_type, parts.map(str::to_string).collect()))
}

/// `true` if `key` lives in the composite-key namespace.
#[must_use]
pub fn is_composite_key(key: &str) -> bool {
    key.starts_with(COMPOSITE_KEY_NAMESPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let key = composite_key("category~id", &["blue", "marble1"]).unwrap();
        assert_eq!(key, "\u{0}category~id\u{0}blue\u{0}marble1\u{0}");
        assert!(is_composite_key(&key));
        assert!(!is_composite_key("marble1"));
    }

    #[test]
    fn split_recovers_parts() {
        let key = composite_key("category~id", &["blue", "marble1"]).unwrap();
        let (object_type, attrs) = split_composite_key(&key).unwrap();
        assert_eq!(object_type, "category~id");
        assert_eq!(attrs, vec!["blue".to_string(), "marble1".to_string()]);
    }

    #[test]
    fn partial_key_is_prefix_of_full_key() {
        let partial = composite_key("category~id", &["blue"]).unwrap();
        let full = composite_key("category~id", &["blue", "m"]).unwrap();
        let other = composite_key("category~id", &["bluegreen", "m"]).unwrap();
        assert!(full.starts_with(&partial));
        assert!(!other.starts_with(&partial));
    }

    #[test]
    fn reserved_characters_rejected() {
        assert!(composite_key("idx", &["a\u{0}b"]).is_err());
        assert!(composite_key("idx", &["a\u{10FFFF}"]).is_err());
        assert!(composite_key("", &["a"]).is_err());
    }

    #[test]
    fn split_rejects_plain_key() {
        assert!(split_composite_key("marble1").is_err());
    }
}
