//! Versioned postcard encoding of a single feature state.
//!
//! Layout:
//!
//! ```text
//! ┌──────────┬─────────┬──────────────────────────┐
//! │ "FKST"   │ version │ postcard(FeatureState)   │
//! │ 4 bytes  │ 1 byte  │ rest                     │
//! └──────────┴─────────┴──────────────────────────┘
//! ```

use crate::FeatureState;
use crate::error::RepositoryError;

/// Record magic.
pub const STATE_MAGIC: [u8; 4] = *b"FKST";

/// Current record format version.
pub const STATE_FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = STATE_MAGIC.len() + 1;

/// Encode a state into a self-describing record.
pub fn encode_state(state: &FeatureState) -> Result<Vec<u8>, RepositoryError> {
    let mut record = Vec::with_capacity(HEADER_LEN + 32);
    record.extend_from_slice(&STATE_MAGIC);
    record.push(STATE_FORMAT_VERSION);
    postcard::to_io(state, &mut record)?;
    Ok(record)
}

/// Decode a record produced by [`encode_state`].
///
/// Rejects foreign magic, unknown versions and trailing bytes.
pub fn decode_state(record: &[u8]) -> Result<FeatureState, RepositoryError> {
    if record.len() < HEADER_LEN {
        return Err(RepositoryError::Format(format!(
            "record too short: {} bytes",
            record.len()
        )));
    }

    let (magic, rest) = record.split_at(STATE_MAGIC.len());
    if magic != STATE_MAGIC {
        return Err(RepositoryError::Format("bad magic".to_string()));
    }

    let (version, body) = rest.split_at(1);
    if version[0] != STATE_FORMAT_VERSION {
        return Err(RepositoryError::Format(format!(
            "unsupported version {}",
            version[0]
        )));
    }

    let (state, remainder) = postcard::take_from_bytes::<FeatureState>(body)?;
    if !remainder.is_empty() {
        return Err(RepositoryError::Format(format!(
            "{} trailing bytes",
            remainder.len()
        )));
    }
    Ok(state)
}

// =============================================================================
// TESTS
// =============================================================================
