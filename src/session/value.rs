use serde::{Deserialize, Serialize};
use std::fmt;

/// A coerced argument or return value passed across the runtime boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ArgValue {
    Number(i128),
    Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
    Boolean(bool),
    Text(String),
}

impl ArgValue {
    pub fn as_number(&self) -> Option<i128> {
        match self {
            ArgValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Number(n) => write!(f, "{}", n),
            ArgValue::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            ArgValue::Boolean(b) => write!(f, "{}", b),
            ArgValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ArgValue::Number(2).to_string(), "2");
        assert_eq!(ArgValue::Bytes(vec![0xab, 0x01]).to_string(), "0xab01");
        assert_eq!(ArgValue::Text("YES".into()).to_string(), "\"YES\"");
    }

    #[test]
    fn test_bytes_serialize_as_hex() {
        let json = serde_json::to_string(&ArgValue::Bytes(vec![1, 2])).unwrap();
        assert_eq!(json, r#"{"type":"bytes","value":"0102"}"#);
        let back: ArgValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ArgValue::Bytes(vec![1, 2]));
    }
}
