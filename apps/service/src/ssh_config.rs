//! SSH-client-config ingestion.
//!
//! Only the subset of the format the engine cares about is recognized:
//! `Host`, `HostName`, `User` and `Port` directives. Everything else
//! (wildcards, `Match` blocks, includes) passes through as ignored lines,
//! which is deliberate: an unrecognized directive is never an error.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::ConfigAccessError;
use crate::monitoring::registry::upsert_last_wins;
use crate::monitoring::types::{DEFAULT_SSH_PORT, HostEntry};

/// Parse every configured file, collecting per-file read failures instead of
/// aborting. Returns whatever entries the readable files produced, in file
/// order, plus the failures for the caller to surface as diagnostics.
pub fn parse_files(paths: &[PathBuf]) -> (Vec<HostEntry>, Vec<ConfigAccessError>) {
    let mut entries = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        match fs::read_to_string(path) {
            Ok(text) => entries.extend(parse_text(&text)),
            Err(source) => failures.push(ConfigAccessError { path: path.clone(), source }),
        }
    }

    (entries, failures)
}

/// Parse one file's worth of config text.
///
/// Blocks accumulate key/value lines and are committed when the next `Host`
/// directive begins, and once more at end of input. A block without a `Host`
/// key commits nothing. Duplicate labels within one file: the later block's
/// fields win, leaving a single entry for that label.
pub fn parse_text(text: &str) -> Vec<HostEntry> {
    let mut entries: Vec<HostEntry> = Vec::new();
    let mut block: HashMap<String, String> = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // At most two tokens: key and the rest of the line as the value.
        // Lines that are a bare key carry nothing and are skipped.
        let mut tokens = line.splitn(2, char::is_whitespace);
        let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let key = key.to_ascii_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        if key == "host" {
            commit_block(&mut entries, &mut block);
        }
        block.insert(key, value.to_string());
    }
    commit_block(&mut entries, &mut block);

    entries
}

/// Turn the accumulated block into an entry if it named a host, then reset
/// the accumulator. Missing `hostname` falls back to the label; a missing,
/// non-numeric or out-of-range `port` falls back to 22.
fn commit_block(entries: &mut Vec<HostEntry>, block: &mut HashMap<String, String>) {
    if let Some(host) = block.remove("host") {
        let host_name = block.remove("hostname").unwrap_or_else(|| host.clone());
        let port =
            block.remove("port").and_then(|raw| raw.parse().ok()).unwrap_or(DEFAULT_SSH_PORT);
        let user = block.remove("user");
        upsert_last_wins(entries, HostEntry::new(host, host_name, user, port));
    }
    block.clear();
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn parses_a_full_block() {
        let entries = parse_text("Host web1\nHostName web1.example.com\nPort 2222\n");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].host, "web1");
        assert_eq!(entries[0].host_name, "web1.example.com");
        assert_eq!(entries[0].port, 2222);
        assert_eq!(entries[0].user, None);
    }

    #[test]
    fn host_name_defaults_to_label() {
        let entries = parse_text("Host bastion\nUser deploy\n");

        assert_eq!(entries[0].host_name, "bastion");
        assert_eq!(entries[0].user.as_deref(), Some("deploy"));
        assert_eq!(entries[0].port, DEFAULT_SSH_PORT);
    }

    #[test]
    fn invalid_port_defaults_to_22() {
        let entries = parse_text("Host a\nPort abc\n");
        assert_eq!(entries[0].port, 22);

        // Out of u16 range counts as invalid too
        let entries = parse_text("Host b\nPort 70000\n");
        assert_eq!(entries[0].port, 22);
    }

    #[test]
    fn skips_comments_blank_lines_and_unknown_keys() {
        let text = "# global settings\n\nHost web\n  HostName web.example.com\n  \
                    IdentityFile ~/.ssh/id_ed25519\n  ForwardAgent yes\n";
        let entries = parse_text(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].host_name, "web.example.com");
    }

    #[test]
    fn keys_are_case_insensitive() {
        let entries = parse_text("HOST web\nhostname web.example.com\nPORT 2200\n");

        assert_eq!(entries[0].host, "web");
        assert_eq!(entries[0].host_name, "web.example.com");
        assert_eq!(entries[0].port, 2200);
    }

    #[test]
    fn bare_host_line_commits_nothing() {
        // "Host" with no value is not a directive; the block never opens
        assert!(parse_text("Host\nHostName ignored.example.com\n").is_empty());
    }

    #[test]
    fn no_blocks_yields_no_entries() {
        assert!(parse_text("").is_empty());
        assert!(parse_text("# only comments\nCompression yes\n").is_empty());
    }

    #[test]
    fn duplicate_labels_last_wins_single_entry() {
        let text = "Host web\nHostName old.example.com\nPort 22\n\
                    Host web\nHostName new.example.com\nPort 2222\n";
        let entries = parse_text(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].host_name, "new.example.com");
        assert_eq!(entries[0].port, 2222);
    }

    #[test]
    fn multiple_blocks_keep_file_order() {
        let text = "Host a\nHostName a.example.com\nHost b\nHostName b.example.com\n";
        let entries = parse_text(text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].host, "a");
        assert_eq!(entries[1].host, "b");
    }

    #[test]
    fn unreadable_file_is_collected_not_fatal() {
        let mut good = NamedTempFile::new().unwrap();
        writeln!(good, "Host web\nHostName web.example.com").unwrap();

        let missing = PathBuf::from("/nonexistent/sshpulse/config");
        let (entries, failures) = parse_files(&[missing.clone(), good.path().to_path_buf()]);

        assert_eq!(entries.len(), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, missing);
    }

    #[test]
    fn entries_concatenate_across_files() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "Host a\nHostName a.example.com").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "Host b\nHostName b.example.com").unwrap();

        let (entries, failures) =
            parse_files(&[first.path().to_path_buf(), second.path().to_path_buf()]);

        assert!(failures.is_empty());
        assert_eq!(entries.len(), 2);
    }
}
