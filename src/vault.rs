//! Vault file generation: encrypt the string table and write `keys.txt`.
//!
//! # Output format
//!
//! ```text
//! KEY:<32 lowercase hex characters of the 16-byte key>
//! <identifier>:<base64(nonce || ciphertext || tag)>
//! ...
//! ```
//!
//! One line per table entry, in table order, newline-terminated. The whole
//! record block is assembled in memory before the file is opened, so an
//! encryption failure never leaves a partial file behind; a write failure
//! aborts the run and the operator re-runs.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::crypto::cipher::encrypt_value;
use crate::crypto::{CipherError, VaultKey};
use crate::table::StringTable;

/// Label of the key record, always the first line of the file.
pub const KEY_LABEL: &str = "KEY";

/// Generate a key, encrypt the builtin table, and write the vault file.
///
/// # Errors
///
/// Returns an error if encryption fails (unrecoverable cipher problem) or if
/// the output file cannot be created, written, or flushed.
pub fn run(cfg: &Config) -> Result<()> {
    let key = VaultKey::generate();
    let table = StringTable::builtin();

    let rendered = render(&table, &key).context("failed to encrypt string table")?;

    write_vault_file(Path::new(&cfg.output_path), &rendered)
        .with_context(|| format!("failed to write vault file {}", cfg.output_path))?;

    info!(
        entries = table.len(),
        path = %cfg.output_path,
        "string vault written"
    );
    Ok(())
}

/// Render the complete record block: the `KEY` line followed by one encrypted
/// record per table entry, in table order.
///
/// Formatting is separated from I/O so the line format is testable without
/// touching the filesystem.
fn render(table: &StringTable, key: &VaultKey) -> Result<String, CipherError> {
    let mut out = String::new();
    let _ = writeln!(out, "{KEY_LABEL}:{}", key.to_hex());
    for entry in table.entries() {
        let payload = encrypt_value(entry.value, key)?;
        let _ = writeln!(out, "{}:{}", entry.id, payload);
    }
    Ok(out)
}

/// Create (or truncate) `path` and write the rendered block, flushing before
/// the handle is dropped.
fn write_vault_file(path: &Path, rendered: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(rendered.as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::cipher::decrypt_value;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn parse_key(rendered: &str) -> VaultKey {
        let key_line = rendered.lines().next().unwrap();
        let hex = key_line.strip_prefix("KEY:").unwrap();
        VaultKey::from_hex(hex).unwrap()
    }

    #[test]
    fn key_line_comes_first_and_decodes() {
        let key = VaultKey::generate();
        let rendered = render(&StringTable::builtin(), &key).unwrap();
        let first = rendered.lines().next().unwrap();
        assert!(first.starts_with("KEY:"));
        assert_eq!(first.len(), "KEY:".len() + 32);
        parse_key(&rendered);
    }

    #[test]
    fn one_record_per_entry_in_table_order() {
        let table = StringTable::builtin();
        let rendered = render(&table, &VaultKey::generate()).unwrap();

        let record_ids: Vec<&str> = rendered
            .lines()
            .skip(1)
            .map(|line| line.split_once(':').unwrap().0)
            .collect();
        let table_ids: Vec<&str> = table.entries().map(|e| e.id).collect();
        assert_eq!(record_ids, table_ids);

        let unique: HashSet<&str> = record_ids.iter().copied().collect();
        assert_eq!(unique.len(), table.len());
    }

    #[test]
    fn every_record_decrypts_to_its_table_value() {
        let table = StringTable::builtin();
        let rendered = render(&table, &VaultKey::generate()).unwrap();
        let key = parse_key(&rendered);

        for (line, entry) in rendered.lines().skip(1).zip(table.entries()) {
            let (id, payload) = line.split_once(':').unwrap();
            assert_eq!(id, entry.id);
            assert_eq!(decrypt_value(payload, &key).unwrap(), entry.value);
        }
    }

    #[test]
    fn perm_reload_round_trips_end_to_end() {
        let rendered = render(&StringTable::builtin(), &VaultKey::generate()).unwrap();
        let key = parse_key(&rendered);
        let payload = rendered
            .lines()
            .find_map(|l| l.strip_prefix("PERM_RELOAD:"))
            .unwrap();
        assert_eq!(decrypt_value(payload, &key).unwrap(), "mace.reload");
    }

    #[test]
    fn two_runs_share_nothing_but_the_table() {
        let table = StringTable::builtin();
        let first = render(&table, &VaultKey::generate()).unwrap();
        let second = render(&table, &VaultKey::generate()).unwrap();

        // Different keys...
        assert_ne!(first.lines().next(), second.lines().next());
        // ...and every payload differs, even for identical plaintexts.
        for (a, b) in first.lines().skip(1).zip(second.lines().skip(1)) {
            assert_ne!(a.split_once(':').unwrap().1, b.split_once(':').unwrap().1);
        }
    }

    fn temp_output(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("string-vault-{}-{}.txt", name, std::process::id()))
    }

    #[test]
    fn run_writes_a_complete_parseable_file() {
        let path = temp_output("run");
        let cfg = Config {
            output_path: path.to_str().unwrap().to_string(),
            log_level: "info".into(),
        };

        run(&cfg).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
        assert_eq!(contents.lines().count(), StringTable::builtin().len() + 1);

        let key = parse_key(&contents);
        let payload = contents
            .lines()
            .find_map(|l| l.strip_prefix("DB_TABLE_WIELDERS:"))
            .unwrap();
        assert_eq!(decrypt_value(payload, &key).unwrap(), "mace_wielders");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn run_truncates_an_existing_file() {
        let path = temp_output("truncate");
        std::fs::write(&path, "stale contents that must disappear\n".repeat(50)).unwrap();
        let cfg = Config {
            output_path: path.to_str().unwrap().to_string(),
            log_level: "info".into(),
        };

        run(&cfg).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("stale"));
        assert_eq!(contents.lines().count(), StringTable::builtin().len() + 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn run_fails_on_unwritable_path() {
        let cfg = Config {
            output_path: "/nonexistent-dir/keys.txt".into(),
            log_level: "info".into(),
        };
        assert!(run(&cfg).is_err());
    }
}
