//! Free-text to [`ArgValue`] coercion.
//!
//! | Type      | Accepted input                                      |
//! |-----------|-----------------------------------------------------|
//! | `number`  | decimal integer, optional sign (`42`, `-1`)         |
//! | `bytes`   | `0x<hex>`, `base64:<data>`, or raw UTF-8 text       |
//! | `boolean` | `true` / `false` (any case); anything else as text  |
//! | `text`    | taken literally                                     |

use crate::descriptor::{Parameter, SemanticType};
use crate::session::ArgValue;
use crate::BallotError;
use base64::{engine::general_purpose, Engine};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoercionError {
    #[error("`{param}` expects a number, got `{input}`")]
    NotANumber { param: String, input: String },

    #[error("`{param}` has invalid bytes: {reason}")]
    InvalidBytes { param: String, reason: String },

    #[error("`{param}` has type void and can not take a value")]
    VoidParameter { param: String },

    #[error("expected {expected} argument(s), got {actual}")]
    ArgumentCount { expected: usize, actual: usize },
}

impl From<CoercionError> for BallotError {
    fn from(err: CoercionError) -> Self {
        BallotError::Validation(err.to_string())
    }
}

/// Coerce one raw input string to the parameter's semantic type.
pub fn coerce(param: &Parameter, input: &str) -> Result<ArgValue, CoercionError> {
    match &param.ty {
        SemanticType::Number => input
            .trim()
            .parse::<i128>()
            .map(ArgValue::Number)
            .map_err(|_| CoercionError::NotANumber {
                param: param.name.clone(),
                input: input.to_string(),
            }),
        SemanticType::Boolean => match input.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(ArgValue::Boolean(true)),
            "false" => Ok(ArgValue::Boolean(false)),
            _ => {
                debug!(param = param.name.as_str(), "Passing non-boolean input through as text");
                Ok(ArgValue::Text(input.to_string()))
            }
        },
        SemanticType::Bytes => decode_bytes(input.trim())
            .map(ArgValue::Bytes)
            .map_err(|reason| CoercionError::InvalidBytes {
                param: param.name.clone(),
                reason,
            }),
        SemanticType::Text => Ok(ArgValue::Text(input.to_string())),
        SemanticType::Unknown(name) => {
            debug!(param = param.name.as_str(), ty = name.as_str(), "Passing unknown type through as text");
            Ok(ArgValue::Text(input.to_string()))
        }
        SemanticType::Void => Err(CoercionError::VoidParameter {
            param: param.name.clone(),
        }),
    }
}

/// Coerce a full positional argument list, checking its length first.
pub fn coerce_all(params: &[Parameter], inputs: &[String]) -> Result<Vec<ArgValue>, CoercionError> {
    if params.len() != inputs.len() {
        return Err(CoercionError::ArgumentCount {
            expected: params.len(),
            actual: inputs.len(),
        });
    }
    params
        .iter()
        .zip(inputs)
        .map(|(param, input)| coerce(param, input))
        .collect()
}

fn decode_bytes(s: &str) -> Result<Vec<u8>, String> {
    if let Some(hex_part) = s.strip_prefix("0x") {
        hex::decode(hex_part).map_err(|e| format!("invalid hex string: {}", e))
    } else if let Some(b64_part) = s.strip_prefix("base64:") {
        general_purpose::STANDARD
            .decode(b64_part)
            .map_err(|e| format!("invalid base64 string: {}", e))
    } else {
        Ok(s.as_bytes().to_vec())
    }
}
