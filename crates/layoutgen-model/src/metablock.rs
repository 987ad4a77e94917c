//! Signed envelope around a layout.

use layoutgen_canonical::{encode_canonical, KeyId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::errors::SchemaError;
use crate::layout::{Layout, LAYOUT_TYPE};
use crate::signature::Signature;

/// Container pairing a layout with detached signatures over its canonical bytes.
///
/// Lifecycle: created without signatures, signed (one entry appended per
/// signing key), then written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metablock {
    /// Signatures over `signed`.
    pub signatures: Vec<Signature>,
    /// Signed payload.
    pub signed: Layout,
}

impl Metablock {
    /// Wraps an unsigned layout.
    pub fn new(signed: Layout) -> Self {
        Metablock {
            signatures: Vec::new(),
            signed,
        }
    }

    /// Canonical bytes of `signed`, the input of signing and verification.
    pub fn signable_bytes(&self) -> Result<Vec<u8>, SchemaError> {
        Ok(encode_canonical(&self.signed)?)
    }

    /// Appends a signature.
    pub fn add_signature(&mut self, signature: Signature) {
        tracing::debug!(keyid = %signature.keyid, "signature appended");
        self.signatures.push(signature);
    }

    /// First signature made with `key_id`.
    pub fn signature_for(&self, key_id: &KeyId) -> Option<&Signature> {
        self.signatures.iter().find(|s| &s.keyid == key_id)
    }

    /// Indented JSON encoding (two spaces) as written to disk.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, SchemaError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Parses metadata bytes.
    ///
    /// Both `signed` and `signatures` must be present and non-null, `signed`
    /// must be a layout, and unknown or missing fields are rejected.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        let raw: Value = serde_json::from_slice(bytes)?;

        for member in ["signed", "signatures"] {
            if raw.get(member).map_or(true, Value::is_null) {
                return Err(SchemaError::MissingMember(member));
            }
        }

        let found = raw["signed"]
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if found != LAYOUT_TYPE {
            return Err(SchemaError::InvalidType {
                item: "signed",
                expected: LAYOUT_TYPE,
                found: found.to_string(),
            });
        }

        Ok(serde_json::from_value(raw)?)
    }

    /// Reads metadata from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_json_slice(&bytes)
    }

    /// Writes metadata to `path`, replacing any existing file.
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<(), SchemaError> {
        fs::write(path.as_ref(), self.to_json_bytes()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layoutgen_canonical::Timestamp;
    use serde_json::json;

    fn unsigned() -> Metablock {
        Metablock::new(Layout::new(
            Timestamp::parse("2021-03-17T00:13:15Z").unwrap(),
        ))
    }

    #[test]
    fn json_has_signatures_and_signed() {
        let value: Value = serde_json::from_slice(&unsigned().to_json_bytes().unwrap()).unwrap();
        assert_eq!(value["signatures"], json!([]));
        assert_eq!(value["signed"]["_type"], json!("layout"));
        assert_eq!(value["signed"]["readme"], json!(""));
    }

    #[test]
    fn output_is_indented_with_two_spaces() {
        let text = String::from_utf8(unsigned().to_json_bytes().unwrap()).unwrap();
        assert!(text.starts_with("{\n  \"signatures\": []"));
    }

    #[test]
    fn signable_bytes_cover_only_signed() {
        let mut block = unsigned();
        let before = block.signable_bytes().unwrap();
        block.add_signature(Signature {
            keyid: KeyId::from("ab"),
            sig: "00".into(),
        });
        assert_eq!(block.signable_bytes().unwrap(), before);
        assert!(block.signature_for(&KeyId::from("ab")).is_some());
        assert!(block.signature_for(&KeyId::from("cd")).is_none());
    }

    #[test]
    fn parse_requires_both_members() {
        let err = Metablock::from_json_slice(br#"{"signed": {"_type": "layout"}}"#).unwrap_err();
        assert!(matches!(err, SchemaError::MissingMember("signatures")));

        let err = Metablock::from_json_slice(br#"{"signed": null, "signatures": []}"#).unwrap_err();
        assert!(matches!(err, SchemaError::MissingMember("signed")));
    }

    #[test]
    fn parse_rejects_links() {
        let err =
            Metablock::from_json_slice(br#"{"signed": {"_type": "link"}, "signatures": []}"#)
                .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType { .. }));
    }

    #[test]
    fn parse_rejects_missing_and_unknown_fields() {
        let mut value: Value = serde_json::from_slice(&unsigned().to_json_bytes().unwrap()).unwrap();
        value["signed"].as_object_mut().unwrap().remove("readme");
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(Metablock::from_json_slice(&bytes), Err(SchemaError::Json(_))));

        let mut value: Value = serde_json::from_slice(&unsigned().to_json_bytes().unwrap()).unwrap();
        value["signed"]["extra"] = json!(1);
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(Metablock::from_json_slice(&bytes), Err(SchemaError::Json(_))));
    }

    #[test]
    fn parse_round_trips() {
        let block = unsigned();
        let parsed = Metablock::from_json_slice(&block.to_json_bytes().unwrap()).unwrap();
        assert_eq!(parsed, block);
    }
}
