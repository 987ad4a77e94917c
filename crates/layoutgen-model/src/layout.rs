//! Layout: the signed definition of a software supply chain.

use layoutgen_canonical::{KeyId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::errors::SchemaError;
use crate::key::Key;
use crate::step::{Inspection, Step};

/// Discriminator value of layouts.
pub const LAYOUT_TYPE: &str = "layout";

/// Supply chain definition: steps, inspections and authorized functionary keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Item type: "layout".
    #[serde(rename = "_type")]
    pub layout_type: String,
    /// Expiry instant.
    pub expires: Timestamp,
    /// Inspections run at verification time.
    pub inspect: Vec<Inspection>,
    /// Functionary keys by id.
    pub keys: BTreeMap<KeyId, Key>,
    /// Free-form description.
    pub readme: String,
    /// Ordered steps.
    pub steps: Vec<Step>,
}

impl Layout {
    /// Creates an empty layout expiring at `expires`.
    pub fn new(expires: Timestamp) -> Self {
        Layout {
            layout_type: LAYOUT_TYPE.to_string(),
            expires,
            inspect: Vec::new(),
            keys: BTreeMap::new(),
            readme: String::new(),
            steps: Vec::new(),
        }
    }

    /// Adds a key under its own id, dropping any private half.
    pub fn add_key(&mut self, key: &Key) {
        self.keys.insert(key.keyid.clone(), key.to_public());
    }

    /// Names of steps and inspections, steps first.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.inspect.iter().map(|i| i.name.as_str()))
    }

    /// Checks the structural invariants of the layout.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if:
    /// - a `_type` discriminator is wrong
    /// - `expires` is not a `YYYY-MM-DDTHH:MM:SSZ` instant
    /// - a key entry is malformed, stored under another id, or carries private material
    /// - step or inspection names repeat
    /// - a step authorizes an unknown key or has an unreachable threshold
    /// - a MATCH rule names a step or inspection the layout does not define
    ///
    /// The MATCH target check is stricter than in-toto's own layout
    /// validation, which accepts rules naming undefined steps.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.layout_type != LAYOUT_TYPE {
            return Err(SchemaError::InvalidType {
                item: "layout",
                expected: LAYOUT_TYPE,
                found: self.layout_type.clone(),
            });
        }

        Timestamp::parse(self.expires.as_str())?;

        for (map_id, key) in &self.keys {
            KeyId::check(map_id.as_str())?;
            if &key.keyid != map_id {
                return Err(SchemaError::KeyIdMismatch {
                    map_id: map_id.clone(),
                    key_id: key.keyid.clone(),
                });
            }
            if !key.is_public_only() {
                return Err(SchemaError::PrivateKeyMaterial(map_id.clone()));
            }
            key.validate()?;
        }

        let mut names_seen = HashSet::new();
        for name in self.item_names() {
            if !names_seen.insert(name) {
                return Err(SchemaError::DuplicateName(name.to_string()));
            }
        }

        for step in &self.steps {
            step.validate()?;
            for key_id in &step.pubkeys {
                if !self.keys.contains_key(key_id) {
                    return Err(SchemaError::UnknownPubkey {
                        step: step.name.clone(),
                        key_id: key_id.clone(),
                    });
                }
            }
            self.check_match_targets(&step.name, step.rules())?;
        }

        for inspection in &self.inspect {
            inspection.validate()?;
            self.check_match_targets(&inspection.name, inspection.rules())?;
        }

        tracing::debug!(
            steps = self.steps.len(),
            inspections = self.inspect.len(),
            keys = self.keys.len(),
            "layout validated"
        );
        Ok(())
    }

    fn check_match_targets<'a>(
        &self,
        item: &str,
        rules: impl Iterator<Item = &'a crate::ArtifactRule>,
    ) -> Result<(), SchemaError> {
        for rule in rules {
            if let Some(target) = rule.match_target() {
                if !self.item_names().any(|name| name == target) {
                    return Err(SchemaError::UnknownMatchTarget {
                        item: item.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
