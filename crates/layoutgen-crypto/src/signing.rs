//! RSASSA-PSS signature generation.

use layoutgen_model::{Metablock, Signature, SignatureScheme};
use rsa::pss::BlindedSigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use sha2::Sha256;

use crate::errors::CryptoError;
use crate::keys::SigningKey;

/// Signs `signable` with `key`.
///
/// RSASSA-PSS uses a random salt (32 bytes, MGF1-SHA-256), so signing the
/// same bytes twice yields different signatures that both verify.
pub fn generate_signature(signable: &[u8], key: &SigningKey) -> Result<Signature, CryptoError> {
    match key.scheme() {
        SignatureScheme::RsassaPssSha256 => {}
        other => return Err(CryptoError::UnsupportedScheme(other)),
    }

    let signing_key = BlindedSigningKey::<Sha256>::new(key.rsa().clone());
    let signature = signing_key
        .try_sign_with_rng(&mut rand::thread_rng(), signable)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    Ok(Signature {
        keyid: key.key_id().clone(),
        sig: hex::encode(signature.to_bytes()),
    })
}

/// Signs the canonical bytes of `block.signed` and appends the signature.
pub fn sign_metablock(block: &mut Metablock, key: &SigningKey) -> Result<(), CryptoError> {
    let signable = block.signable_bytes()?;
    let signature = generate_signature(&signable, key)?;
    tracing::info!(keyid = %signature.keyid, bytes = signable.len(), "layout signed");
    block.add_signature(signature);
    Ok(())
}
