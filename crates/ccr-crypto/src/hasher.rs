/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"ccr-entry-v1"`) that is prepended
/// to every computation. This prevents cross-type hash collisions: a ledger
/// entry and any other record hashing identical bytes produce different
/// digests. Output is rendered as 64 lowercase hex characters.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for ledger entries.
    pub const LEDGER_ENTRY: Self = Self {
        domain: "ccr-entry-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Digest a fixed-order field sequence.
    ///
    /// Fields are concatenated in the given order under the domain tag, so
    /// the digest is a pure deterministic function of the field values.
    pub fn hash_fields(&self, fields: &[&str]) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for field in fields {
            hasher.update(field.as_bytes());
        }
        hex::encode(hasher.finalize().as_bytes())
    }

    /// Digest a serializable value as canonical JSON.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<String, HasherError> {
        let data =
            serde_json::to_string(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash_fields(&[&data]))
    }

    /// Verify that a field sequence produces the expected digest.
    pub fn verify_fields(&self, fields: &[&str], expected: &str) -> bool {
        self.hash_fields(fields) == expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = ContentHasher::LEDGER_ENTRY.hash_fields(&["MINT", "abc"]);
        let b = ContentHasher::LEDGER_ENTRY.hash_fields(&["MINT", "abc"]);
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_64_lowercase_hex() {
        let digest = ContentHasher::LEDGER_ENTRY.hash_fields(&["x"]);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_domains_produce_different_digests() {
        let a = ContentHasher::new("domain-a").hash_fields(&["same"]);
        let b = ContentHasher::new("domain-b").hash_fields(&["same"]);
        assert_ne!(a, b);
    }

    #[test]
    fn field_order_matters() {
        let a = ContentHasher::LEDGER_ENTRY.hash_fields(&["MINT", "TRADE"]);
        let b = ContentHasher::LEDGER_ENTRY.hash_fields(&["TRADE", "MINT"]);
        assert_ne!(a, b);
    }

    #[test]
    fn verify_fields_roundtrip() {
        let digest = ContentHasher::LEDGER_ENTRY.hash_fields(&["a", "b"]);
        assert!(ContentHasher::LEDGER_ENTRY.verify_fields(&["a", "b"], &digest));
        assert!(!ContentHasher::LEDGER_ENTRY.verify_fields(&["a", "c"], &digest));
    }

    #[test]
    fn hash_json_works() {
        let value = serde_json::json!({"project_id": 7});
        let digest = ContentHasher::LEDGER_ENTRY.hash_json(&value).unwrap();
        assert_eq!(digest.len(), 64);
    }
}
