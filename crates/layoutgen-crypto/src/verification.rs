//! Signature verification against key records.

use layoutgen_canonical::KeyId;
use layoutgen_model::{Key, KeyType, Metablock, Signature, SignatureScheme};
use rsa::pss::VerifyingKey;
use rsa::signature::Verifier;
use sha2::Sha256;

use crate::errors::CryptoError;
use crate::keys::parse_public;

/// Outcome for one signature of a metablock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureVerdict {
    /// Signature verifies against the embedded key.
    Ok,
    /// Signature was made by a key the layout does not list.
    UnknownKey,
    /// Signature does not verify.
    Invalid(String),
}

/// Verifies `sig` over `data` with the public half of `key`.
///
/// # Errors
///
/// Returns [`CryptoError`] if the key type or scheme is unsupported, the
/// signature is not hex, the public key does not parse, or the signature is
/// invalid.
pub fn verify_signature(key: &Key, sig: &Signature, data: &[u8]) -> Result<(), CryptoError> {
    if key.keytype != KeyType::Rsa {
        return Err(CryptoError::UnsupportedKeyType(key.keytype));
    }
    if key.scheme != SignatureScheme::RsassaPssSha256 {
        return Err(CryptoError::UnsupportedScheme(key.scheme));
    }

    let sig_bytes = hex::decode(&sig.sig)?;
    let public = parse_public(key)?;
    let verifying_key = VerifyingKey::<Sha256>::new(public);
    let signature = rsa::pss::Signature::try_from(sig_bytes.as_slice())
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

    verifying_key
        .verify(data, &signature)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
}

/// Verifies the first signature in `block` made with `key`.
pub fn verify_metablock(block: &Metablock, key: &Key) -> Result<(), CryptoError> {
    let sig = block
        .signature_for(&key.keyid)
        .ok_or_else(|| CryptoError::SignatureMissing(key.keyid.clone()))?;
    let data = block.signable_bytes()?;
    verify_signature(key, sig, &data)
}

/// Checks every signature of a layout metablock against the layout's own keys.
///
/// Returns one verdict per signature, in signature order.
pub fn verify_layout_signatures(
    block: &Metablock,
) -> Result<Vec<(KeyId, SignatureVerdict)>, CryptoError> {
    let data = block.signable_bytes()?;
    let verdicts = block
        .signatures
        .iter()
        .map(|sig| {
            let verdict = match block.signed.keys.get(&sig.keyid) {
                None => SignatureVerdict::UnknownKey,
                Some(key) => match verify_signature(key, sig, &data) {
                    Ok(()) => SignatureVerdict::Ok,
                    Err(e) => SignatureVerdict::Invalid(e.to_string()),
                },
            };
            tracing::debug!(keyid = %sig.keyid, ?verdict, "signature checked");
            (sig.keyid.clone(), verdict)
        })
        .collect();
    Ok(verdicts)
}

/// `true` when there is at least one signature and every one verifies.
pub fn all_verified(verdicts: &[(KeyId, SignatureVerdict)]) -> bool {
    !verdicts.is_empty() && verdicts.iter().all(|(_, v)| *v == SignatureVerdict::Ok)
}
