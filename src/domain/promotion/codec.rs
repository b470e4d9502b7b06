//! Comma-joined storage of list-valued promotion fields.

/// Separator used in the persisted text columns.
pub const SEPARATOR: &str = ",";

/// Number of picture slots a promotion exposes when none are stored.
pub const PICTURE_SLOTS: usize = 3;

/// Symmetric codec between a list of strings and one text column.
///
/// Encoding always joins with [`SEPARATOR`]. Decoding splits on it, except for
/// the empty string, which decodes to `empty_slots` empty entries. Entries are
/// not escaped, so an entry containing the separator reads back as several.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCodec {
    empty_slots: usize,
}

impl ListCodec {
    /// Weekday names: nothing stored means no days.
    pub const DAYS: ListCodec = ListCodec { empty_slots: 0 };

    /// Picture references: nothing stored means [`PICTURE_SLOTS`] blank slots.
    pub const PICTURES: ListCodec = ListCodec {
        empty_slots: PICTURE_SLOTS,
    };

    pub fn encode<S: AsRef<str>>(&self, items: &[S]) -> String {
        let parts: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
        parts.join(SEPARATOR)
    }

    pub fn decode(&self, stored: &str) -> Vec<String> {
        if stored.is_empty() {
            return vec![String::new(); self.empty_slots];
        }
        stored.split(SEPARATOR).map(str::to_string).collect()
    }
}
