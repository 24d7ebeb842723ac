//! Linear search over the markdown documents of every project.
//!
//! `tag:<name>` looks for the literal tag `#<name>` as a whole word; any
//! other query is a case-insensitive substring match on raw content.

use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use otrack_core::error::{Result, TrackerError};
use otrack_core::model::{MatchKind, SearchHit};

use crate::layout;

/// Query prefix selecting tag search.
pub const TAG_PREFIX: &str = "tag:";

enum Matcher {
    Tag { tag: String, pattern: Regex },
    Content(String),
}

impl Matcher {
    fn new(query: &str) -> Result<Self> {
        if let Some(rest) = query.strip_prefix(TAG_PREFIX) {
            let tag = rest.trim();
            if tag.is_empty() {
                return Err(TrackerError::MissingArgument("query"));
            }
            // A tag ends at whitespace, a closing bracket or the end of the document.
            let pattern = RegexBuilder::new(&format!(r"#{}(?:\s|\]|$)", regex::escape(tag)))
                .case_insensitive(true)
                .build()
                .map_err(|_| TrackerError::InvalidName {
                    kind: "tag",
                    value: tag.to_string(),
                    reason: "not a searchable tag",
                })?;
            return Ok(Matcher::Tag {
                tag: tag.to_string(),
                pattern,
            });
        }
        if query.trim().is_empty() {
            return Err(TrackerError::MissingArgument("query"));
        }
        Ok(Matcher::Content(query.to_lowercase()))
    }

    fn check(&self, content: &str) -> Option<MatchKind> {
        match self {
            Matcher::Tag { tag, pattern } => pattern
                .is_match(content)
                .then(|| MatchKind::Tag(tag.clone())),
            Matcher::Content(needle) => content
                .to_lowercase()
                .contains(needle.as_str())
                .then_some(MatchKind::Content),
        }
    }
}

/// Scan every project document and return the ones matching `query`.
///
/// Hits come back in project then file name order. Unreadable files and
/// project directories are skipped.
///
/// # Errors
///
/// Returns [`TrackerError::MissingArgument`] for a blank query or tag and
/// [`TrackerError::Io`] if the vault root cannot be listed.
pub fn search(vault_root: &Path, query: &str) -> Result<Vec<SearchHit>> {
    let matcher = Matcher::new(query)?;
    let mut hits = Vec::new();

    for project in layout::read_dir_sorted(vault_root)? {
        if !project.is_dir {
            continue;
        }
        let files = match layout::read_dir_sorted(&project.path) {
            Ok(files) => files,
            Err(e) => {
                debug!(project = %project.name, error = %e, "skipping unreadable project");
                continue;
            }
        };
        for file in files {
            if file.is_dir || !layout::is_markdown(&file.name) {
                continue;
            }
            let content = match fs::read_to_string(&file.path) {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = %file.path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            if let Some(kind) = matcher.check(&content) {
                hits.push(SearchHit {
                    project: project.name.clone(),
                    file: file.name,
                    kind,
                });
            }
        }
    }

    debug!(query, hits = hits.len(), "search finished");
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> tempfile::TempDir {
        let vault = tempfile::tempdir().unwrap();
        let alpha = vault.path().join("Alpha");
        let beta = vault.path().join("Beta");
        fs::create_dir(&alpha).unwrap();
        fs::create_dir(&beta).unwrap();
        fs::write(
            alpha.join("!Project Dashboard.md"),
            "---\ntags: [project, alpha]\n---\n# Alpha\n\nShipping the #release today.\n",
        )
        .unwrap();
        fs::write(alpha.join("BUG - Crash.md"), "# Crash\nNullPointer in loader\n---\n#bug #high").unwrap();
        fs::write(beta.join("notes.md"), "links: [#release-candidate]\n").unwrap();
        fs::write(beta.join("todo.txt"), "#release\n").unwrap();
        vault
    }

    fn files(hits: &[SearchHit]) -> Vec<(&str, &str)> {
        hits.iter()
            .map(|h| (h.project.as_str(), h.file.as_str()))
            .collect()
    }

    #[test]
    fn tag_search_matches_whole_tags_only() {
        let vault = vault();
        let hits = search(vault.path(), "tag:release").unwrap();
        assert_eq!(files(&hits), [("Alpha", "!Project Dashboard.md")]);
        assert_eq!(hits[0].kind, MatchKind::Tag("release".to_string()));

        assert!(search(vault.path(), "tag:releas").unwrap().is_empty());
    }

    #[test]
    fn tag_search_is_case_insensitive_and_accepts_end_and_bracket() {
        let vault = vault();
        let hits = search(vault.path(), "tag:HIGH").unwrap();
        assert_eq!(files(&hits), [("Alpha", "BUG - Crash.md")]);

        let hits = search(vault.path(), "tag: release-candidate ").unwrap();
        assert_eq!(files(&hits), [("Beta", "notes.md")]);
    }

    #[test]
    fn tag_search_escapes_pattern_characters() {
        let vault = vault();
        fs::write(vault.path().join("Beta").join("lang.md"), "#c++ notes").unwrap();
        let hits = search(vault.path(), "tag:c++").unwrap();
        assert_eq!(files(&hits), [("Beta", "lang.md")]);
        assert!(search(vault.path(), "tag:c.+").unwrap().is_empty());
    }

    #[test]
    fn content_search_is_case_insensitive_substring() {
        let vault = vault();
        let hits = search(vault.path(), "nullpointer").unwrap();
        assert_eq!(files(&hits), [("Alpha", "BUG - Crash.md")]);
        assert_eq!(hits[0].kind, MatchKind::Content);

        let hits = search(vault.path(), "RELEASE").unwrap();
        assert_eq!(
            files(&hits),
            [("Alpha", "!Project Dashboard.md"), ("Beta", "notes.md")]
        );
    }

    #[test]
    fn search_skips_unreadable_and_nested_documents() {
        let vault = vault();
        let alpha = vault.path().join("Alpha");
        fs::write(alpha.join("binary.md"), [0xff, 0xfe, 0x00]).unwrap();
        let sessions = alpha.join("Sessions");
        fs::create_dir(&sessions).unwrap();
        fs::write(sessions.join("Session - 2025-02-10.md"), "nullpointer again").unwrap();
        fs::write(vault.path().join("root.md"), "nullpointer at root").unwrap();
        let hidden = vault.path().join(".trash");
        fs::create_dir(&hidden).unwrap();
        fs::write(hidden.join("old.md"), "nullpointer deleted").unwrap();

        let hits = search(vault.path(), "nullpointer").unwrap();
        assert_eq!(files(&hits), [("Alpha", "BUG - Crash.md")]);
    }

    #[test]
    fn blank_queries_are_rejected() {
        let vault = vault();
        for query in ["", "   ", "tag:", "tag:  "] {
            assert!(matches!(
                search(vault.path(), query),
                Err(TrackerError::MissingArgument("query"))
            ));
        }
    }
}
