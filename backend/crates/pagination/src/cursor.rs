//! Opaque cursors for keyset pagination.
//!
//! A cursor wraps a serialisable key (for example the `(created_at, id)` of
//! the last row returned) and is handed to clients as URL-safe base64 JSON.
//! Clients must treat the value as opaque.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors raised while decoding a client-supplied cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The token is not valid base64.
    #[error("cursor is not valid base64")]
    Encoding,
    /// The decoded payload does not match the expected key shape.
    #[error("cursor payload is malformed")]
    Payload,
}

/// Position in an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a key.
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the key.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return the key.
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode the cursor as an opaque token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Payload`] when the key cannot be serialised.
    pub fn encode(&self) -> Result<String, CursorError> {
        let json = serde_json::to_vec(&self.key).map_err(|_| CursorError::Payload)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode a token produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Encoding`] for non-base64 input and
    /// [`CursorError::Payload`] when the JSON does not match `K`.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| CursorError::Encoding)?;
        let key = serde_json::from_slice(&bytes).map_err(|_| CursorError::Payload)?;
        Ok(Self { key })
    }
}

/// A slice of a feed plus the token for the next slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    /// Items in feed order.
    pub items: Vec<T>,
    /// Token to pass back for the next slice, absent at the end of the feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    /// Build a page from `limit + 1` fetched rows: the extra row only signals
    /// that more data exists and is dropped.
    ///
    /// # Errors
    ///
    /// Propagates [`CursorError`] when the key of the last item cannot be
    /// encoded.
    pub fn from_overfetch<K, F>(
        mut rows: Vec<T>,
        limit: usize,
        key_of: F,
    ) -> Result<Self, CursorError>
    where
        K: Serialize,
        F: Fn(&T) -> K,
    {
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        let next_cursor = match (has_more, rows.last()) {
            (true, Some(last)) => Some(Cursor::new(key_of(last)).encode()?),
            _ => None,
        };
        Ok(Self {
            items: rows,
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Key {
        created_at: String,
        id: u32,
    }

    #[rstest]
    fn decodes_what_it_encodes() {
        let cursor = Cursor::new(Key {
            created_at: "2026-03-01T10:00:00Z".to_owned(),
            id: 7,
        });
        let token = cursor.encode().expect("encode");
        assert!(!token.contains('='));
        let decoded: Cursor<Key> = Cursor::decode(&token).expect("decode");
        assert_eq!(decoded, cursor);
    }

    #[rstest]
    #[case("***", CursorError::Encoding)]
    #[case("bm90LWpzb24", CursorError::Payload)]
    fn rejects_tampered_tokens(#[case] token: &str, #[case] expected: CursorError) {
        let err = Cursor::<Key>::decode(token).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn overfetch_sets_next_cursor_only_when_more_rows_exist() {
        let more = CursorPage::from_overfetch(vec![1_u32, 2, 3], 2, |n| *n).expect("page");
        assert_eq!(more.items, vec![1, 2]);
        let token = more.next_cursor.expect("next cursor");
        assert_eq!(Cursor::<u32>::decode(&token).expect("decode").into_key(), 2);

        let last = CursorPage::from_overfetch(vec![1_u32, 2], 2, |n| *n).expect("page");
        assert!(last.next_cursor.is_none());
    }
}
