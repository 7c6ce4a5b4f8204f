//! Reader snapshots consumed by the connect scan

use pcsc::{ReaderState, State};

/// One attached reader at enumeration time.
///
/// The connect scan needs exactly two facts per reader: its name (to match
/// the virtual development reader) and whether a card was present when the
/// snapshot was taken. Anything card-specific is learned after opening a
/// transport.
#[derive(Debug, Clone)]
pub struct PcscReader {
    name: String,
    has_card: bool,
}

impl PcscReader {
    /// Reader name as reported by the PC/SC service
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a card was present at snapshot time
    pub const fn has_card(&self) -> bool {
        self.has_card
    }

    /// Snapshot a reader from its PC/SC state
    pub(crate) fn from_reader_state(reader_state: &ReaderState) -> Self {
        let events = reader_state.event_state();
        Self {
            name: reader_state.name().to_string_lossy().into_owned(),
            has_card: events.contains(State::PRESENT) && !events.contains(State::EMPTY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_fresh_state_has_no_card() {
        // A state that has seen no events yet must not claim a card
        let name = CString::new("Virtual Reader 0").unwrap();
        let state = ReaderState::new(name, State::UNAWARE);
        let reader = PcscReader::from_reader_state(&state);
        assert_eq!(reader.name(), "Virtual Reader 0");
        assert!(!reader.has_card());
    }
}
