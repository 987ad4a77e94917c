//! Signing the fixture and writing it to disk.

use layoutgen_crypto::{load_signing_key, sign_metablock, SigningKey};
use layoutgen_model::{Layout, Metablock};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::Builder;

use crate::builder::build_layout;
use crate::errors::FixtureError;

/// Validates `layout`, signs it with `key` and writes the metablock to `out_path`.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failure at any point leaves an existing `out_path` untouched.
pub fn sign_and_persist<P: AsRef<Path>>(
    layout: Layout,
    key: &SigningKey,
    out_path: P,
) -> Result<Metablock, FixtureError> {
    let out_path = out_path.as_ref();
    layout.validate()?;

    let mut block = Metablock::new(layout);
    sign_metablock(&mut block, key).map_err(FixtureError::Signing)?;
    let bytes = block.to_json_bytes()?;

    write_atomic(out_path, &bytes)?;
    tracing::info!(
        path = %out_path.display(),
        keyid = %key.key_id(),
        bytes = bytes.len(),
        "signed layout written"
    );
    Ok(block)
}

/// Loads the key at `key_path`, then builds, signs and writes the fixture layout.
///
/// Nothing is written when the key cannot be loaded.
pub fn generate<K: AsRef<Path>, O: AsRef<Path>>(
    key_path: K,
    out_path: O,
) -> Result<Metablock, FixtureError> {
    let key = load_signing_key(key_path).map_err(FixtureError::KeyLoad)?;
    let layout = build_layout();
    if !layout.keys.contains_key(key.key_id()) {
        tracing::warn!(
            keyid = %key.key_id(),
            "signing key is not declared in the layout; its signature will not verify"
        );
    }
    sign_and_persist(layout, &key, out_path)
}

/// Writes `bytes` to a temporary sibling of `path` and renames it into place.
///
/// An existing file keeps its permissions; a new one gets the mode a plain
/// create would give it (0666 minus the umask on unix).
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), FixtureError> {
    let io_err = |source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temp_file = builder.tempfile_in(parent).map_err(io_err)?;

    match fs::metadata(path) {
        Ok(existing) => temp_file
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(io_err)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }

    temp_file.write_all(bytes).map_err(io_err)?;
    temp_file.as_file().sync_all().map_err(io_err)?;
    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
