use layoutgen_canonical::{compute_key_id, Canonicalizer};
use serde_json::json;

fn main() {
    let canonicalizer = Canonicalizer::new();
    let key = json!({
        "keytype": "rsa",
        "scheme": "rsassa-pss-sha256",
        "keyid_hash_algorithms": ["sha256", "sha512"],
        "keyval": {
            "public": "-----BEGIN PUBLIC KEY-----\nexample\n-----END PUBLIC KEY-----",
            "private": ""
        }
    });

    match canonicalizer.canonicalize(&key) {
        Ok(bytes) => {
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }

    match compute_key_id(&key) {
        Ok(key_id) => println!("keyid: {}", key_id),
        Err(err) => {
            eprintln!("key id computation failed: {}", err);
            std::process::exit(1);
        }
    }
}
