//! Log entry definitions
//!
//! Defines the unit of storage and its frame encoding.

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{self, LengthWidth};
use crate::error::{Field, Result};

/// Width of the key length prefix
pub const KEY_WIDTH: LengthWidth = LengthWidth::U16;

/// Width of the value length prefix
pub const VALUE_WIDTH: LengthWidth = LengthWidth::U32;

/// Bytes of framing around every entry: key length (2) + value length (4)
pub const FRAME_OVERHEAD: usize = KEY_WIDTH.prefix_len() + VALUE_WIDTH.prefix_len();

/// A single (key, value) record in the log
///
/// Keys are not unique; the log is a journal, not a map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    /// Opaque key, at most 65535 bytes
    pub key: Vec<u8>,

    /// Opaque value, at most 4294967295 bytes
    pub value: Vec<u8>,
}

impl Entry {
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Size of this entry on the wire
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.key.len() + self.value.len()
    }

    /// Check both lengths fit their prefixes
    pub fn validate(&self) -> Result<()> {
        KEY_WIDTH.check(self.key.len(), Field::Key)?;
        VALUE_WIDTH.check(self.value.len(), Field::Value)?;
        Ok(())
    }

    /// Encode the full frame: `[key_len u16][key][value_len u32][value]`
    pub fn encode(&self) -> Result<Bytes> {
        self.validate()?;

        let mut writer = BytesMut::with_capacity(self.encoded_len()).writer();
        codec::write_field(&mut writer, &self.key, KEY_WIDTH, Field::Key)?;
        codec::write_field(&mut writer, &self.value, VALUE_WIDTH, Field::Value)?;

        Ok(writer.into_inner().freeze())
    }
}

impl<K, V> From<(K, V)> for Entry
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from((key, value): (K, V)) -> Self {
        Entry::new(key, value)
    }
}
