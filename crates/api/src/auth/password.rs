//! Argon2id password hashing for stored user records.
//!
//! Hashes use the Argon2id variant with a random salt from [`OsRng`] and are
//! stored as PHC strings, so parameters and salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use pmo_core::types::Record;
use serde_json::Value;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Replace a plaintext `password` in a user record with its hash.
///
/// An empty or null password is dropped so an update leaves the stored
/// hash untouched.
pub fn hash_record_password(record: &mut Record) -> Result<(), argon2::password_hash::Error> {
    let plaintext = match record.get("password") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        Some(Value::String(_)) | Some(Value::Null) => {
            record.remove("password");
            return Ok(());
        }
        _ => return Ok(()),
    };
    record.insert("password".into(), Value::String(hash_password(&plaintext)?));
    Ok(())
}
