//! Coercion of loosely-typed JSON inputs into credential arguments.
//!
//! Request bodies arrive as JSON, where a password may be missing, `null`, a
//! number, or an object. These helpers map `Value::Null` to `None`, the
//! expected type to `Some`, and anything else to `InvalidArgument`, so the
//! typed routines in [`credential`](super::credential) and
//! [`salt`](super::salt) see only well-formed input.

use serde_json::Value;

use crate::crypto::credential::{hash, verify, CredentialRecord};
use crate::crypto::salt::SaltPolicy;
use crate::error::{BlogError, Result};

/// Read a plaintext secret or salt argument.
pub fn string_arg<'a>(name: &str, value: &'a Value) -> Result<Option<&'a str>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.as_str())),
        _ => Err(BlogError::InvalidArgument(format!(
            "{} must be a string",
            name
        ))),
    }
}

/// Read a salt-length argument.
pub fn rounds_arg(value: &Value) -> Result<Option<u32>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                BlogError::InvalidArgument("rounds must be a non-negative integer".to_string())
            }),
        _ => Err(BlogError::InvalidArgument(
            "rounds must be an integer".to_string(),
        )),
    }
}

/// Read a stored credential record argument.
///
/// The record must be a JSON object with string `salt` and `digest` fields.
pub fn record_arg(value: &Value) -> Result<Option<CredentialRecord>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| {
                BlogError::InvalidArgument(format!("credential record is malformed: {}", e))
            }),
        _ => Err(BlogError::InvalidArgument(
            "credential record must be an object".to_string(),
        )),
    }
}

/// `generate_salt` over a JSON `rounds` argument.
pub fn generate_salt_value(policy: &SaltPolicy, rounds: &Value) -> Result<String> {
    policy.generate(rounds_arg(rounds)?)
}

/// `hash` over JSON arguments.
pub fn hash_value(plaintext: &Value, salt: &Value) -> Result<CredentialRecord> {
    let plaintext = string_arg("password", plaintext)?;
    let salt = string_arg("salt", salt)?;
    hash(plaintext, salt)
}

/// `verify` over JSON arguments.
pub fn verify_value(plaintext: &Value, record: &Value) -> Result<bool> {
    let plaintext = string_arg("password", plaintext)?;
    let record = record_arg(record)?;
    verify(plaintext, record.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn is_invalid_argument<T: std::fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(BlogError::InvalidArgument(_)))
    }

    #[test]
    fn test_rounds_arg_accepts_integers_and_null() {
        assert_eq!(rounds_arg(&json!(10)).unwrap(), Some(10));
        assert_eq!(rounds_arg(&json!(0)).unwrap(), Some(0));
        assert_eq!(rounds_arg(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_rounds_arg_rejects_non_integers() {
        assert!(is_invalid_argument(rounds_arg(&json!("10"))));
        assert!(is_invalid_argument(rounds_arg(&json!(10.5))));
        assert!(is_invalid_argument(rounds_arg(&json!(-1))));
        assert!(is_invalid_argument(rounds_arg(&json!(true))));
        assert!(is_invalid_argument(rounds_arg(&json!([10]))));
    }

    #[test]
    fn test_generate_salt_value() {
        let policy = SaltPolicy::default();
        assert_eq!(generate_salt_value(&policy, &json!(8)).unwrap().len(), 8);
        assert_eq!(generate_salt_value(&policy, &Value::Null).unwrap().len(), 12);
        assert!(is_invalid_argument(generate_salt_value(&policy, &json!(15))));
        assert!(is_invalid_argument(generate_salt_value(&policy, &json!("eight"))));
    }

    #[test]
    fn test_hash_value_rejects_null_and_non_strings() {
        assert!(is_invalid_argument(hash_value(&Value::Null, &json!("salt"))));
        assert!(is_invalid_argument(hash_value(&json!("pw"), &Value::Null)));
        assert!(is_invalid_argument(hash_value(&json!(42), &json!("salt"))));
        assert!(is_invalid_argument(hash_value(&json!("pw"), &json!({"s": 1}))));
    }

    #[test]
    fn test_verify_value_round_trip() {
        let record = hash_value(&json!("correct-horse"), &json!("abcdef0123")).unwrap();
        let stored = serde_json::to_value(&record).unwrap();
        assert!(verify_value(&json!("correct-horse"), &stored).unwrap());
        assert!(!verify_value(&json!("wrong-horse"), &stored).unwrap());
    }

    #[test]
    fn test_verify_value_rejects_string_record() {
        let result = verify_value(&json!("pw"), &json!("not-an-object"));
        assert!(is_invalid_argument(result));
    }

    #[test]
    fn test_verify_value_rejects_null_inputs() {
        let stored = serde_json::to_value(hash_value(&json!("pw"), &json!("s")).unwrap()).unwrap();
        assert!(is_invalid_argument(verify_value(&Value::Null, &stored)));
        assert!(is_invalid_argument(verify_value(&json!("pw"), &Value::Null)));
    }

    #[test]
    fn test_record_arg_rejects_incomplete_object() {
        assert!(is_invalid_argument(record_arg(&json!({"salt": "abc"}))));
    }
}
