//! Line-level edits of `KEY=value` documents.

use regex::{NoExpand, Regex};
use std::collections::BTreeMap;

/// Sets `key` to `value` in `content`.
///
/// The first line starting with `KEY=` is replaced in place; if there is
/// none, `KEY=value` is appended as a new line. Every other byte of the
/// document is preserved.
pub fn upsert(content: &str, key: &str, value: &str) -> String {
    let line = format!("{}={}", key, value);
    let pattern = format!(r"(?m)^{}=[^\r\n]*", regex::escape(key));
    // escaped keys always form a valid pattern
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return append_line(content, &line),
    };

    if re.is_match(content) {
        re.replacen(content, 1, NoExpand(&line)).into_owned()
    } else {
        append_line(content, &line)
    }
}

/// Appends `line` on its own line, adding a separator newline only when the
/// document does not already end with one.
pub fn append_line(content: &str, line: &str) -> String {
    let mut out = String::with_capacity(content.len() + line.len() + 2);
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
    out.push('\n');
    out
}

/// Parses a document into a key/value map.
///
/// Blank lines and `#` comments are skipped, the value is everything after
/// the first `=`. Later duplicates win.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            out.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    out
}
