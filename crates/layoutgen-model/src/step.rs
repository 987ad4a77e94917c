//! Supply chain items: steps performed by functionaries and inspections run
//! at verification time.

use layoutgen_canonical::KeyId;
use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;
use crate::rule::ArtifactRule;

/// Discriminator value of steps.
pub const STEP_TYPE: &str = "step";
/// Discriminator value of inspections.
pub const INSPECTION_TYPE: &str = "inspection";

/// A step of the supply chain performed by a functionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Item type: "step".
    #[serde(rename = "_type")]
    pub step_type: String,
    /// Command the functionary is expected to run.
    pub expected_command: Vec<String>,
    /// Rules for artifacts consumed by the step.
    pub expected_materials: Vec<ArtifactRule>,
    /// Rules for artifacts produced by the step.
    pub expected_products: Vec<ArtifactRule>,
    /// Unique name within the layout.
    pub name: String,
    /// Ids of keys authorized to sign link metadata for the step.
    pub pubkeys: Vec<KeyId>,
    /// Number of distinct authorized signatures required.
    pub threshold: u32,
}

impl Step {
    /// Creates a step with no rules, no keys and threshold 1.
    pub fn new(name: impl Into<String>) -> Self {
        Step {
            step_type: STEP_TYPE.to_string(),
            expected_command: Vec::new(),
            expected_materials: Vec::new(),
            expected_products: Vec::new(),
            name: name.into(),
            pubkeys: Vec::new(),
            threshold: 1,
        }
    }

    /// Sets the expected command.
    pub fn command<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_command = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a material rule.
    pub fn material(mut self, rule: ArtifactRule) -> Self {
        self.expected_materials.push(rule);
        self
    }

    /// Appends a product rule.
    pub fn product(mut self, rule: ArtifactRule) -> Self {
        self.expected_products.push(rule);
        self
    }

    /// Authorizes a key.
    pub fn pubkey(mut self, key_id: KeyId) -> Self {
        self.pubkeys.push(key_id);
        self
    }

    /// Sets the signature threshold.
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Checks the discriminator, key id format and threshold.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.step_type != STEP_TYPE {
            return Err(SchemaError::InvalidType {
                item: "step",
                expected: STEP_TYPE,
                found: self.step_type.clone(),
            });
        }
        for key_id in &self.pubkeys {
            KeyId::check(key_id.as_str())?;
        }
        if self.threshold == 0 || self.threshold as usize > self.pubkeys.len() {
            return Err(SchemaError::InvalidThreshold {
                step: self.name.clone(),
                threshold: self.threshold,
                pubkeys: self.pubkeys.len(),
            });
        }
        Ok(())
    }

    /// All rules of the step, materials first.
    pub fn rules(&self) -> impl Iterator<Item = &ArtifactRule> {
        self.expected_materials
            .iter()
            .chain(self.expected_products.iter())
    }
}

/// An inspection executed during final product verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Inspection {
    /// Item type: "inspection".
    #[serde(rename = "_type")]
    pub inspection_type: String,
    /// Rules for artifacts consumed by the inspection.
    pub expected_materials: Vec<ArtifactRule>,
    /// Rules for artifacts produced by the inspection.
    pub expected_products: Vec<ArtifactRule>,
    /// Unique name within the layout.
    pub name: String,
    /// Command run by the verifier.
    pub run: Vec<String>,
}

impl Inspection {
    /// Checks the discriminator.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.inspection_type != INSPECTION_TYPE {
            return Err(SchemaError::InvalidType {
                item: "inspection",
                expected: INSPECTION_TYPE,
                found: self.inspection_type.clone(),
            });
        }
        Ok(())
    }

    /// All rules of the inspection, materials first.
    pub fn rules(&self) -> impl Iterator<Item = &ArtifactRule> {
        self.expected_materials
            .iter()
            .chain(self.expected_products.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let step = Step::new("build").command(["make"]);
        assert_eq!(step.step_type, "step");
        assert_eq!(step.expected_command, vec!["make".to_string()]);
        assert_eq!(step.threshold, 1);
    }

    #[test]
    fn threshold_must_be_reachable() {
        let step = Step::new("build");
        assert!(matches!(
            step.validate(),
            Err(SchemaError::InvalidThreshold { threshold: 1, pubkeys: 0, .. })
        ));

        let step = Step::new("build").pubkey(KeyId::from("ab")).threshold(0);
        assert!(matches!(step.validate(), Err(SchemaError::InvalidThreshold { .. })));

        let step = Step::new("build").pubkey(KeyId::from("ab"));
        step.validate().unwrap();
    }

    #[test]
    fn pubkeys_must_be_hex() {
        let step = Step::new("build").pubkey(KeyId::from("xyz"));
        assert!(matches!(step.validate(), Err(SchemaError::InvalidField(_))));
    }

    #[test]
    fn wrong_discriminator_is_rejected() {
        let mut step = Step::new("build").pubkey(KeyId::from("ab"));
        step.step_type = "link".into();
        assert!(matches!(step.validate(), Err(SchemaError::InvalidType { .. })));
    }
}
