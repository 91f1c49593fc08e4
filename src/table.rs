//! The fixed table of sensitive strings to be encrypted into the vault.
//!
//! Entries are an ordered slice, so the output file lists records in the
//! order written here and two runs differ only in key and ciphertext, never
//! in record order.

/// One identifier → plaintext pair of the builtin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    /// Record identifier written verbatim before the `:` in the output line.
    pub id: &'static str,
    /// Sensitive plaintext that must not appear in the distributed artifact.
    pub value: &'static str,
}

const BUILTIN_ENTRIES: &[TableEntry] = &[
    // Permissions
    TableEntry { id: "PERM_RELOAD", value: "mace.reload" },
    TableEntry { id: "PERM_UNCLAIM", value: "mace.unclaim" },
    TableEntry { id: "PERM_SEARCH", value: "mace.search" },
    // Messages
    TableEntry {
        id: "MSG_RELOAD_SUCCESS",
        value: "&aConfiguration reloaded successfully!",
    },
    TableEntry {
        id: "MSG_LICENSE_FAIL",
        value: "&cLicense validation failed! Plugin functionality is disabled.",
    },
    // NBT keys
    TableEntry { id: "NBT_MACE_UUID", value: "legendary_mace_uuid" },
    TableEntry {
        id: "NBT_MAX_DURABILITY",
        value: "legendary_mace_max_durability",
    },
    TableEntry {
        id: "NBT_LORE_DURABILITY",
        value: "legendary_mace_current_durability",
    },
    // Critical config paths
    TableEntry {
        id: "CFG_BASE_DAMAGE",
        value: "gameplay.combat.scoring.base-damage",
    },
    TableEntry {
        id: "CFG_DAMAGE_MULT",
        value: "gameplay.combat.scoring.damage-multiplier",
    },
    TableEntry { id: "CFG_MAX_MACES", value: "gameplay.max-maces" },
    // Database tables
    TableEntry { id: "DB_TABLE_WIELDERS", value: "mace_wielders" },
    TableEntry { id: "DB_TABLE_LOOSE", value: "loose_maces" },
    TableEntry { id: "DB_TABLE_PENDING", value: "pending_mace_removal" },
];

/// Immutable, ordered view over the string table for one run.
///
/// Constructed once at startup and passed by reference into the vault writer
/// rather than read through a global.
#[derive(Debug, Clone, Copy)]
pub struct StringTable {
    entries: &'static [TableEntry],
}

impl StringTable {
    /// The builtin table shipped with this tool.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES,
        }
    }

    /// Entries in output order.
    pub fn entries(&self) -> impl Iterator<Item = &TableEntry> {
        self.entries.iter()
    }

    /// Number of entries (and therefore of non-`KEY` output records).
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
