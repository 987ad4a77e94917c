//! The root layout fixture and a builder for variations of it.

use layoutgen_canonical::{KeyId, Timestamp};
use layoutgen_model::{
    ArtifactKind, ArtifactRule, Key, KeyType, KeyVal, Layout, SignatureScheme, Step,
    DEFAULT_KEYID_HASH_ALGORITHMS,
};

use crate::errors::FixtureError;

/// Expiry of the fixture layout.
pub const FIXTURE_EXPIRES: &str = "2021-03-17T00:13:15Z";

/// Id of the functionary key embedded in the fixture layout.
pub const FIXTURE_KEY_ID: &str = "70ca5750c2eda80b18f41f4ec5f92146789b5d68dd09577be422a0159bd13680";

/// Public half of the functionary key; must match the private key at [`DEFAULT_KEY_PATH`].
pub const FIXTURE_PUBLIC_KEY: &str = "-----BEGIN PUBLIC KEY-----\nMIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAr2u+1EN9NMIAtqYZ2pqF\n3ov4omRpdgEorv1L4sBMaFN+2EPyqeMTF838/W4V/1fHLr5jaqIVY0VjcpAmCRJ6\noRhxw/6o7dgiIPsrTCWQHFAkXcElgb+2JUXWZO3azX90fxFliucPPj0IrLgK3u5O\nD+XgaT773Za2JJSe7A0Iacjb23Elm2T05ydtrWHy5zVMmg+Yj64iaXRxoLUhFpdp\nNOw/rVIUSiFItip+SAZjIsjqQDILzy4RcNUJqBFHG2N/cEwnO+ozb1G9sCtGSya6\nBkCQGhmX64xgehpSUomDod2q3ZmNlS2+9aUMpNq4TksLL08mhQkZi7atNoG4rq4p\nnwIDAQAB\n-----END PUBLIC KEY-----";

/// Where the signing key is read from.
pub const DEFAULT_KEY_PATH: &str = "./test/alice";

/// Where the signed layout is written.
pub const DEFAULT_OUTPUT_PATH: &str = "root.layout";

/// Artifact both steps operate on.
const FIXTURE_ARTIFACT: &str = "./test/data/foo.py";

/// The functionary key record exactly as the fixture declares it.
pub fn fixture_key() -> Key {
    Key {
        keyid: KeyId::new(FIXTURE_KEY_ID.to_string()),
        keyid_hash_algorithms: DEFAULT_KEYID_HASH_ALGORITHMS.to_vec(),
        keytype: KeyType::Rsa,
        keyval: KeyVal {
            private: String::new(),
            public: FIXTURE_PUBLIC_KEY.to_string(),
        },
        scheme: SignatureScheme::RsassaPssSha256,
    }
}

/// `write-code` then `package`, both authorized for `key_id` with threshold 1.
fn fixture_steps(key_id: &KeyId) -> Vec<Step> {
    vec![
        Step::new("write-code")
            .command(["-c", "echo hello > ./test/data/foo.py"])
            .material(ArtifactRule::disallow("*"))
            .product(ArtifactRule::disallow("*"))
            .pubkey(key_id.clone())
            .threshold(1),
        Step::new("package")
            .command(["tar", "zcvf", FIXTURE_ARTIFACT])
            .material(ArtifactRule::match_from(
                "*",
                ArtifactKind::Products,
                "write-code",
            ))
            .product(ArtifactRule::allow(FIXTURE_ARTIFACT))
            .product(ArtifactRule::disallow("*"))
            .pubkey(key_id.clone())
            .threshold(1),
    ]
}

/// Builds the fixture layout from its fixed literals.
///
/// Never fails: nothing is checked against the key map here. Structural
/// validation happens in [`FixtureBuilder::build_validated`] and before signing.
pub fn build_layout() -> Layout {
    FixtureBuilder::default().build()
}

/// Builder over the fixture literals.
///
/// `FixtureBuilder::default().build()` is the fixture layout; the setters swap
/// individual parts, e.g. the functionary key when signing with a test key.
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    expires: Timestamp,
    key: Key,
    steps: Option<Vec<Step>>,
    readme: String,
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        FixtureBuilder {
            expires: Timestamp::new(FIXTURE_EXPIRES.to_string()),
            key: fixture_key(),
            steps: None,
            readme: String::new(),
        }
    }
}

impl FixtureBuilder {
    /// Starts from the fixture literals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the expiry.
    pub fn expires(mut self, expires: Timestamp) -> Self {
        self.expires = expires;
        self
    }

    /// Replaces the functionary key. Unless custom steps are set, both
    /// fixture steps authorize the new key.
    pub fn functionary_key(mut self, key: Key) -> Self {
        self.key = key.to_public();
        self
    }

    /// Replaces the fixture steps.
    pub fn steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Sets the readme.
    pub fn readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = readme.into();
        self
    }

    /// Assembles the layout without validating it.
    pub fn build(&self) -> Layout {
        let mut layout = Layout::new(self.expires.clone());
        layout.readme = self.readme.clone();
        layout.add_key(&self.key);
        layout.steps = match &self.steps {
            Some(steps) => steps.clone(),
            None => fixture_steps(&self.key.keyid),
        };
        layout
    }

    /// Assembles the layout and checks its structural invariants.
    pub fn build_validated(&self) -> Result<Layout, FixtureError> {
        let layout = self.build();
        layout.validate()?;
        Ok(layout)
    }
}
