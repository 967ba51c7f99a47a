use sha2::{Digest, Sha256};
use uuid::Uuid;

// Salted SHA-256 stored as "salt$hexdigest". The credential itself is
// write-only: callers hash on the way in and compare on the way out,
// the stored form is never returned through the API.

pub fn hash_password(plain: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, plain))
}

pub fn verify_password(plain: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, plain) == expected,
        None => false,
    }
}

fn digest(salt: &str, plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    format!("{:x}", hasher.finalize())
}
