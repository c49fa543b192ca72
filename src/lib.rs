//! A tiny backtracking regular-expression engine for line-oriented search.
//!
//! The grammar is deliberately minimal — literals, `.`, the `^`/`$`
//! anchors, and the `*`/`+`/`?` quantifiers — and is interpreted
//! directly against the text by recursive descent, without compiling
//! to an intermediate automaton.  Quantifiers are resolved greedily
//! with explicit backtracking.
//!
//! # Architecture
//!
//! The pipeline is:
//!
//! ```text
//! search  ──per start offset──>  match_here  ──on `c*`/`c+`──>  match_star
//!    ^                               ^                              │
//!    │                               └──── remainder attempts ──────┘
//!    └── leftmost offset wins
//! ```
//!
//! [`search`] tries the pattern at each start offset in turn (or only
//! at offset 0 when the pattern is anchored with `^`), so the reported
//! match is always the *leftmost* one.  `match_here` decides whether
//! the pattern matches starting exactly at one position, one grammar
//! rule at a time.  `match_star` resolves a quantified atom: it scans
//! as far as the atom can reach, then backs off one repetition at a
//! time until the rest of the pattern fits (longest match), or — under
//! [`StarPolicy::Shortest`] — grows the repetition from zero upward.
//!
//! # Grammar
//!
//! Interpreted left to right with one symbol of lookahead:
//!
//! | Form  | Meaning                                            |
//! |-------|----------------------------------------------------|
//! | `^`   | anchor at the start of the text (position 0 only)  |
//! | `$`   | anchor at the end of the text (last pattern byte)  |
//! | `.`   | any single byte                                    |
//! | `c`   | the literal byte `c`                               |
//! | `c*`  | zero or more `c` (greedy, with backtracking)       |
//! | `c+`  | one or more `c`                                    |
//! | `c?`  | zero or one `c` (committed, no backtracking)       |
//!
//! Everything is byte-oriented: offsets and lengths count bytes, and a
//! multi-byte UTF-8 scalar is just a run of literal bytes.  There are
//! no character classes, no alternation, no escaping, and no capture
//! groups.
//!
//! Malformed patterns are not rejected: a quantifier with no atom to
//! repeat, or an anchor away from its edge, simply flows through the
//! matching rules and behaves as a literal byte.  [`validate`] is an
//! opt-in strict check for callers that prefer an error instead.
//!
//! # Cost model
//!
//! Matching is a pure recursive computation over immutable borrows: no
//! I/O, no shared state, safe to run from any number of threads on
//! independent inputs.  Recursion depth is bounded by
//! `O(pattern.len() + text.len())`; star backtracking re-attempts the
//! pattern remainder per candidate length, so a non-matching suffix
//! behind `.*` costs up to `O(text.len()²)` per start offset.  Callers
//! feeding untrusted input should bound the text length (the `rebat`
//! line scanner enforces a maximum line length for exactly this
//! reason).

use std::fmt;
use std::ops::Range;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// An error reported by [`validate`] for patterns that fall outside
/// the defined grammar.
///
/// Matching itself never produces an error — "no match" is an ordinary
/// [`None`] — and [`search`] accepts any byte sequence as a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A `*`, `+` or `?` with no atom to repeat: at offset 0, stacked
    /// directly on another quantifier, or attached to the `^` anchor
    /// (which is consumed, not matched against a byte).
    DanglingQuantifier { offset: usize, quantifier: u8 },
    /// A `$` that is not the last pattern byte, or a `^` that is not
    /// the first.
    MisplacedAnchor { offset: usize, anchor: u8 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingQuantifier { offset, quantifier } => {
                write!(
                    f,
                    "quantifier '{}' at offset {} has no atom to repeat",
                    *quantifier as char, offset
                )
            }
            Self::MisplacedAnchor { offset, anchor } => {
                let edge = if *anchor == b'^' { "first" } else { "last" };
                write!(
                    f,
                    "anchor '{}' at offset {} is not the {} pattern byte",
                    *anchor as char, offset, edge
                )
            }
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Match result
// ---------------------------------------------------------------------------

/// A successful match: a span of the text, in bytes.
///
/// The span is the *leftmost* position at which the pattern matches,
/// expanded as far as the active [`StarPolicy`] admits at that
/// position.  `start + len <= text.len()` always holds.  The value is
/// owned — it does not borrow from the pattern or the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Length of the matched span in bytes.  May be 0: anchors and
    /// `c*`/`c?` can succeed without consuming anything.
    pub len: usize,
}

impl Match {
    /// Byte offset one past the last matched byte.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The matched span as a `start..end` byte range, suitable for
    /// slicing the text.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Whether the match is zero-width.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// ---------------------------------------------------------------------------
// Star policy
// ---------------------------------------------------------------------------

/// How `c*` (and the tail of `c+`) picks among the possible repetition
/// counts when several of them let the rest of the pattern match.
///
/// Both policies agree on *whether* a text matches; they only differ
/// in which span is reported.  [`StarPolicy::Longest`] is the default
/// and the documented contract of [`search`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StarPolicy {
    /// Greedy: take as many repetitions as possible, then back off one
    /// at a time until the pattern remainder matches.
    #[default]
    Longest,
    /// Lazy: try the pattern remainder after zero repetitions, then
    /// after one, and so on.
    Shortest,
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Search for `pattern` anywhere in `text`, reporting the leftmost
/// match under the greedy [`StarPolicy::Longest`] policy.
///
/// Returns [`None`] when no start offset admits a match.  The search
/// is deterministic and side-effect free: the same inputs always
/// produce the same result.
///
/// ```
/// use regex_backtrack::{search, Match};
///
/// assert_eq!(search(b"a*b", b"caaab"), Some(Match { start: 1, len: 4 }));
/// assert_eq!(search(b"^x", b"axe"), None);
/// ```
pub fn search(pattern: &[u8], text: &[u8]) -> Option<Match> {
    search_with(pattern, text, StarPolicy::Longest)
}

/// Like [`search`], with an explicit quantifier-resolution policy.
pub fn search_with(pattern: &[u8], text: &[u8], policy: StarPolicy) -> Option<Match> {
    if let [b'^', rest @ ..] = pattern {
        // Anchored: a single attempt at offset 0, no retries.
        let matcher = Matcher { pattern: rest, text, policy };
        let end = matcher.match_here(0, 0)?;
        return Some(Match { start: 0, len: end });
    }

    let matcher = Matcher { pattern, text, policy };
    let mut start = 0;
    loop {
        if let Some(end) = matcher.match_here(0, start) {
            return Some(Match { start, len: end - start });
        }
        if start == text.len() {
            // The empty tail has had its attempt; zero-width patterns
            // may match there, nothing else can.
            return None;
        }
        start += 1;
    }
}

/// Check a pattern against the strict grammar, rejecting the byte
/// sequences the permissive matcher would quietly treat as literals.
///
/// [`search`] never requires this: stray quantifiers and misplaced
/// anchors match themselves byte-for-byte.  `validate` exists for
/// callers (such as `rebat --strict`) that would rather surface a
/// likely pattern typo than search for a literal `*`.
///
/// The first offending byte, scanning left to right, wins.
pub fn validate(pattern: &[u8]) -> Result<(), Error> {
    for (i, &byte) in pattern.iter().enumerate() {
        match byte {
            b'*' | b'+' | b'?' => {
                let atom = i.checked_sub(1).map(|j| pattern[j]);
                let has_atom = match atom {
                    None => false,
                    Some(b'*') | Some(b'+') | Some(b'?') => false,
                    Some(b'^') => i != 1,
                    Some(_) => true,
                };
                if !has_atom {
                    return Err(Error::DanglingQuantifier { offset: i, quantifier: byte });
                }
            }
            b'$' if i + 1 != pattern.len() => {
                return Err(Error::MisplacedAnchor { offset: i, anchor: byte });
            }
            b'^' if i != 0 => {
                return Err(Error::MisplacedAnchor { offset: i, anchor: byte });
            }
            _ => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// One search attempt over a fixed pattern/text pair.
///
/// Positions are byte offsets into `pattern` and `text`; the matching
/// functions recurse on offsets rather than re-slicing so that the
/// span arithmetic at the top level stays trivial.
#[derive(Clone, Copy)]
struct Matcher<'a> {
    pattern: &'a [u8],
    text: &'a [u8],
    policy: StarPolicy,
}

impl Matcher<'_> {
    /// Does the atom `c` (a literal byte or the `.` wildcard) match
    /// the text byte `b`?
    #[inline]
    fn atom_matches(c: u8, b: u8) -> bool {
        c == b'.' || c == b
    }

    /// Match the pattern remainder starting at pattern offset `p`
    /// against the text starting exactly at offset `t`.
    ///
    /// Returns the text offset one past the matched span, or `None`.
    /// The rules are tried in order; the first applicable one decides:
    ///
    /// 1. empty remainder — success (zero-width match allowed);
    /// 2. leading `?` — the quantifier of an atom the caller already
    ///    resolved; skip it;
    /// 3. the remainder is exactly `$` — succeed only at end-of-text;
    /// 4. `c*` / `c+` — hand off to the quantifier resolver;
    /// 5. the atom matches the current byte — consume both;
    /// 6. the atom is optional (`c?`) but does not match — skip the
    ///    atom and its `?` without consuming input;
    /// 7. otherwise fail.
    ///
    /// Rule 6 consumes nothing and applies at end-of-text too, so `a?`
    /// matches the empty text and `a?b` matches `b` at offset 0.  Rule
    /// 5 wins over rule 6 when both apply: once the optional atom
    /// matches, the engine commits to it and never retries with the
    /// atom left empty (`a?ab` does not match `ab`).
    fn match_here(&self, p: usize, t: usize) -> Option<usize> {
        match &self.pattern[p..] {
            [] => Some(t),
            [b'?', ..] => self.match_here(p + 1, t),
            [b'$'] => {
                if t == self.text.len() {
                    Some(t)
                } else {
                    None
                }
            }
            [c, b'*', ..] => self.match_star(*c, p + 2, t),
            [c, b'+', ..] => self.match_plus(*c, p + 2, t),
            [c, rest @ ..] => {
                if t < self.text.len() && Self::atom_matches(*c, self.text[t]) {
                    return self.match_here(p + 1, t + 1);
                }
                if let [b'?', ..] = rest {
                    return self.match_here(p + 2, t);
                }
                None
            }
        }
    }

    /// Resolve `c*`: zero or more repetitions of `c`, followed by the
    /// pattern remainder at offset `p`.
    fn match_star(&self, c: u8, p: usize, t: usize) -> Option<usize> {
        match self.policy {
            StarPolicy::Longest => self.match_star_longest(c, p, t),
            StarPolicy::Shortest => self.match_star_shortest(c, p, t),
        }
    }

    /// Greedy resolution: scan to the farthest repetition of `c`, then
    /// backtrack one repetition at a time — down to zero repetitions
    /// inclusive — until the remainder matches.
    ///
    /// Failed remainder attempts are recomputed at every backtracking
    /// step, not memoized; with the text length bounded by the caller
    /// the quadratic worst case is acceptable.
    fn match_star_longest(&self, c: u8, p: usize, t: usize) -> Option<usize> {
        let mut limit = t;
        while limit < self.text.len() && Self::atom_matches(c, self.text[limit]) {
            limit += 1;
        }
        loop {
            if let Some(end) = self.match_here(p, limit) {
                return Some(end);
            }
            if limit == t {
                return None;
            }
            limit -= 1;
        }
    }

    /// Lazy resolution: attempt the remainder after zero repetitions,
    /// then grow the repetition one byte at a time while `c` keeps
    /// matching.
    fn match_star_shortest(&self, c: u8, p: usize, t: usize) -> Option<usize> {
        let mut t = t;
        loop {
            if let Some(end) = self.match_here(p, t) {
                return Some(end);
            }
            if t < self.text.len() && Self::atom_matches(c, self.text[t]) {
                t += 1;
            } else {
                return None;
            }
        }
    }

    /// Resolve `c+`: `c` must match at least once at the current
    /// position; the repetitions beyond the first are `c*`.
    fn match_plus(&self, c: u8, p: usize, t: usize) -> Option<usize> {
        if t < self.text.len() && Self::atom_matches(c, self.text[t]) {
            self.match_star(c, p, t + 1)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
