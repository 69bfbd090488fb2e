use serde::{Deserialize, Serialize};

/// Static per-table configuration set at table creation (spec §6, "Create
/// table"). Not mutated by hand play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub small_blind: u64,
    pub big_blind: u64,
    pub max_seats: usize,
    pub ante: u64,
}

impl TableConfig {
    pub fn new(small_blind: u64, big_blind: u64, max_seats: usize) -> Self {
        TableConfig {
            small_blind,
            big_blind,
            max_seats,
            ante: 0,
        }
    }

    pub fn with_ante(mut self, ante: u64) -> Self {
        self.ante = ante;
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig::new(5, 10, 9)
    }
}
