//! Signed, context-bound cursor strings
//!
//! Wire format: `b64url(json) "." b64url(hmac_sha256(secret, b64url(json)))`.
//! The MAC covers the encoded payload segment exactly as transmitted.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;

use super::error::CursorError;

type HmacSha256 = Hmac<Sha256>;

/// URL-safe alphabet, unpadded on encode, padding tolerated on decode
const B64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Payload key carrying the context digest
pub const CONTEXT_HASH_KEY: &str = "context_hash";

/// Stateless encoder/verifier for pagination cursors
#[derive(Clone)]
pub struct CursorCodec {
    secret: Vec<u8>,
}

impl std::fmt::Debug for CursorCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorCodec")
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl CursorCodec {
    /// Create a codec signing with the given server-held secret
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    /// Serialize, sign and join a payload into an opaque cursor
    pub fn encode(&self, payload: &Map<String, Value>) -> String {
        let json = Value::Object(payload.clone()).to_string();
        let data = B64URL.encode(json.as_bytes());

        let mut mac = self.mac();
        mac.update(data.as_bytes());
        let signature = B64URL.encode(mac.finalize().into_bytes());

        format!("{}.{}", data, signature)
    }

    /// Verify a cursor and return its payload.
    ///
    /// Signature problems, encoding problems and non-object payloads are all
    /// `Invalid`; a valid cursor minted for a different query is
    /// `ContextMismatch`.
    pub fn decode(
        &self,
        cursor: &str,
        expected_context_hash: &str,
    ) -> Result<Map<String, Value>, CursorError> {
        let (data, signature) = cursor.split_once('.').ok_or(CursorError::Invalid)?;

        let signature = B64URL.decode(signature).map_err(|_| CursorError::Invalid)?;

        let mut mac = self.mac();
        mac.update(data.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| CursorError::Invalid)?;

        let raw = B64URL.decode(data).map_err(|_| CursorError::Invalid)?;
        let payload = match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            _ => return Err(CursorError::Invalid),
        };

        match payload.get(CONTEXT_HASH_KEY).and_then(Value::as_str) {
            Some(hash) if hash == expected_context_hash => Ok(payload),
            _ => Err(CursorError::ContextMismatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-cursor-secret";
    const CONTEXT: &str = "ctx-digest-1";

    fn payload(context: &str) -> Map<String, Value> {
        match json!({
            "v": 1,
            "context_hash": context,
            "last_id": 42,
            "last_created_at": "2024-01-02T03:04:05.123456Z",
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn sign(secret: &str, data: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(data.as_bytes());
        B64URL.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_round_trip() {
        let codec = CursorCodec::new(SECRET);
        let original = payload(CONTEXT);

        let cursor = codec.encode(&original);
        let decoded = codec.decode(&cursor, CONTEXT).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_wire_format_is_url_safe_and_unpadded() {
        let codec = CursorCodec::new(SECRET);
        let cursor = codec.encode(&payload(CONTEXT));

        let (data, signature) = cursor.split_once('.').unwrap();
        assert!(!cursor.contains('='));
        assert!(!cursor.contains('+'));
        assert!(!cursor.contains('/'));
        assert_eq!(signature, sign(SECRET, data));

        let json: Value = serde_json::from_slice(&B64URL.decode(data).unwrap()).unwrap();
        assert_eq!(json["last_id"], 42);
    }

    #[test]
    fn test_padded_segments_are_accepted() {
        let codec = CursorCodec::new(SECRET);
        let data = base64::engine::general_purpose::URL_SAFE.encode(b"{\"context_hash\":\"ctx-digest-1\"}");
        let cursor = format!("{}.{}", data, sign(SECRET, &data));

        assert!(codec.decode(&cursor, CONTEXT).is_ok());
    }

    #[test]
    fn test_any_single_byte_flip_is_rejected() {
        let codec = CursorCodec::new(SECRET);
        let cursor = codec.encode(&payload(CONTEXT));
        let separator = cursor.find('.').unwrap();

        for index in 0..cursor.len() {
            if index == separator {
                continue;
            }

            let mut bytes = cursor.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            assert_eq!(
                codec.decode(&tampered, CONTEXT),
                Err(CursorError::Invalid),
                "flip at byte {} was accepted",
                index
            );
        }
    }

    #[test]
    fn test_context_mismatch() {
        let codec = CursorCodec::new(SECRET);
        let cursor = codec.encode(&payload("digest-one"));

        assert_eq!(
            codec.decode(&cursor, "digest-two"),
            Err(CursorError::ContextMismatch)
        );
    }

    #[test]
    fn test_missing_context_hash_is_mismatch() {
        let codec = CursorCodec::new(SECRET);
        let mut map = payload(CONTEXT);
        map.remove(CONTEXT_HASH_KEY);
        let cursor = codec.encode(&map);

        assert_eq!(codec.decode(&cursor, CONTEXT), Err(CursorError::ContextMismatch));
    }

    #[test]
    fn test_non_string_context_hash_is_mismatch() {
        let codec = CursorCodec::new(SECRET);
        let mut map = payload(CONTEXT);
        map.insert(CONTEXT_HASH_KEY.to_string(), json!(17));
        let cursor = codec.encode(&map);

        assert_eq!(codec.decode(&cursor, CONTEXT), Err(CursorError::ContextMismatch));
    }

    #[test]
    fn test_cross_secret_cursor_is_invalid() {
        let minted = CursorCodec::new("secret-a").encode(&payload(CONTEXT));

        assert_eq!(
            CursorCodec::new("secret-b").decode(&minted, CONTEXT),
            Err(CursorError::Invalid)
        );
    }

    #[test]
    fn test_garbage_inputs_are_invalid() {
        let codec = CursorCodec::new(SECRET);

        assert_eq!(codec.decode("not-a-cursor", CONTEXT), Err(CursorError::Invalid));
        assert_eq!(codec.decode("", CONTEXT), Err(CursorError::Invalid));
        assert_eq!(codec.decode(".", CONTEXT), Err(CursorError::Invalid));
        assert_eq!(codec.decode("abc.!!!", CONTEXT), Err(CursorError::Invalid));
    }

    #[test]
    fn test_signed_non_object_payload_is_invalid() {
        let codec = CursorCodec::new(SECRET);

        for body in ["[1,2,3]", "\"text\"", "42", "{not json"] {
            let data = B64URL.encode(body.as_bytes());
            let cursor = format!("{}.{}", data, sign(SECRET, &data));
            assert_eq!(codec.decode(&cursor, CONTEXT), Err(CursorError::Invalid));
        }
    }

    #[test]
    fn test_signed_non_base64_payload_is_invalid() {
        let codec = CursorCodec::new(SECRET);
        let data = "***";
        let cursor = format!("{}.{}", data, sign(SECRET, data));

        assert_eq!(codec.decode(&cursor, CONTEXT), Err(CursorError::Invalid));
    }

    #[test]
    fn test_debug_hides_secret() {
        let codec = CursorCodec::new(SECRET);
        assert!(!format!("{:?}", codec).contains(SECRET));
    }
}
