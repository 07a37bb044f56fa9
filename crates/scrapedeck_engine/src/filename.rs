use std::fmt::Write;

use sha2::{Digest, Sha256};

const MAX_STEM_CHARS: usize = 80;

/// Local file name for a job's artifact: `{job_id}.{ext}` when the id is a
/// safe file stem, otherwise `{cleaned}--{short_hash(job_id)}.{ext}` so two
/// ids that clean to the same stem never collide.
pub fn artifact_filename(job_id: &str, ext: &str) -> String {
    let cleaned = clean_stem(job_id);
    if cleaned == job_id {
        format!("{cleaned}.{ext}")
    } else {
        format!("{cleaned}--{}.{ext}", short_hash(job_id))
    }
}

fn clean_stem(input: &str) -> String {
    let mut stem = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        stem.push(c);
    }

    let mut stem: String = stem
        .trim_matches(&['_', ' ', '.'][..])
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    if stem.is_empty() {
        stem.push_str("job");
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}' | '\u{7F}')
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_are_used_verbatim() {
        assert_eq!(artifact_filename("5f2c9a", "csv"), "5f2c9a.csv");
        assert_eq!(
            artifact_filename("3fa85f64-5717-4562-b3fc-2c963f66afa6", "csv"),
            "3fa85f64-5717-4562-b3fc-2c963f66afa6.csv"
        );
    }

    #[test]
    fn path_characters_are_replaced_and_hashed() {
        let name = artifact_filename("../../etc/passwd", "csv");
        assert!(!name.contains('/'));
        assert!(name.starts_with("etc_passwd--"), "{name}");
        assert!(name.ends_with(".csv"));
        assert_ne!(name, artifact_filename("..\\..\\etc\\passwd", "html"));
    }

    #[test]
    fn empty_and_reserved_stems_get_placeholders() {
        assert!(artifact_filename("", "csv").starts_with("job--"));
        assert!(artifact_filename("...", "csv").starts_with("job--"));
        assert!(artifact_filename("con", "csv").starts_with("con_--"));
    }

    #[test]
    fn distinct_ids_with_same_stem_do_not_collide() {
        assert_ne!(artifact_filename("a/b", "csv"), artifact_filename("a:b", "csv"));
    }
}
