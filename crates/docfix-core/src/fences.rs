//! Code fence spacing.
//!
//! Every fence opener of the form ```` ```lang ```` (a backtick run, an
//! optional language tag, nothing else) is followed by exactly one blank
//! line before the fenced content. Runs of blank lines collapse to their
//! first line; a missing blank line is inserted.
//!
//! The scanner keeps track of whether it is inside a fence, so closing
//! markers and fence-internal lines that look like openers are left alone.
//! Fences using tildes or carrying a richer info string (```` ```js{1,3} ````)
//! are tracked for balancing but never adjusted.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::{FENCE_CHAR, MIN_FENCE_LEN};

/// Counters from one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FenceStats {
    /// Openers eligible for normalization.
    pub openers: usize,
    /// Openers whose following lines were changed.
    pub adjusted: usize,
}

/// An opening fence line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Opener {
    marker: char,
    len: usize,
    /// Marker followed by nothing but an optional language tag.
    normalizable: bool,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"^[ \t]*(`{3,}|~{3,})(.*)$").expect("valid fence regex"))
}

fn language_tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"^[A-Za-z0-9_+#.\-]*[ \t]*$").expect("valid tag regex"))
}

/// Line text without its terminator.
fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn eol_of(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn parse_opener(line: &str) -> Option<Opener> {
    let caps = fence_regex().captures(strip_eol(line))?;
    let run = caps.get(1)?.as_str();
    let info = caps.get(2).map_or("", |m| m.as_str());
    let marker = run.chars().next()?;

    // A backtick info string may not contain backticks (that is inline code).
    if marker == FENCE_CHAR && info.contains(FENCE_CHAR) {
        return None;
    }

    Some(Opener {
        marker,
        len: run.chars().count(),
        normalizable: marker == FENCE_CHAR && language_tag_regex().is_match(info),
    })
}

fn closes(line: &str, opener: &Opener) -> bool {
    let text = strip_eol(line).trim_start_matches([' ', '\t']);
    let run = text.chars().take_while(|&c| c == opener.marker).count();
    run >= opener.len.max(MIN_FENCE_LEN) && text[run * opener.marker.len_utf8()..].trim().is_empty()
}

/// Normalize the blank line after every fence opener.
pub fn normalize_fences(content: &str) -> String {
    normalize_fences_with_stats(content).0
}

/// [`normalize_fences`], also reporting how many openers changed.
pub fn normalize_fences_with_stats(content: &str) -> (String, FenceStats) {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut out = String::with_capacity(content.len() + 16);
    let mut stats = FenceStats::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        out.push_str(line);
        i += 1;

        let Some(opener) = parse_opener(line) else {
            continue;
        };

        if opener.normalizable {
            stats.openers += 1;

            let run_start = i;
            while i < lines.len() && is_blank(lines[i]) {
                i += 1;
            }
            let run = i - run_start;

            if i == lines.len() {
                // Nothing but blank lines (or nothing) after the opener.
                lines[run_start..i].iter().for_each(|l| out.push_str(l));
            } else {
                match run {
                    0 => {
                        out.push_str(eol_of(line));
                        stats.adjusted += 1;
                    }
                    1 => out.push_str(lines[run_start]),
                    _ => {
                        out.push_str(lines[run_start]);
                        stats.adjusted += 1;
                    }
                }
            }
        }

        // Copy the fenced content verbatim, up to and including the closer.
        while i < lines.len() {
            let inner = lines[i];
            out.push_str(inner);
            i += 1;
            if closes(inner, &opener) {
                break;
            }
        }
    }

    (out, stats)
}
