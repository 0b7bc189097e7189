//! Start-case key rendering
//!
//! Keys are split into words and each word gets an upper-cased first
//! character. Word boundaries are:
//!
//! - any character that is not a letter or digit (`_`, `-`, `.`, spaces, ...)
//! - a lower-case letter followed by an upper-case one (`recommendedSize`)
//! - the end of an upper-case run that precedes a capitalized word
//!   (`XMLHttp` splits as `XML`, `Http`)
//! - a transition between digits and letters (`path2` splits as `path`, `2`)
//!
//! English ordinals (`1st`, `22nd`, `3RD`, `4th`) stay one word, and
//! apostrophes are dropped before splitting. Letters outside ASCII are
//! classified with Unicode case tests; no accent folding is performed.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static PRESERVED_KEY_REGEX: OnceLock<Regex> = OnceLock::new();

/// Environment-variable style keys (`FOO_BAR`) are never renamed
pub fn is_preserved_key(key: &str) -> bool {
    PRESERVED_KEY_REGEX
        .get_or_init(|| Regex::new(r"^[A-Z_]+$").expect("static pattern is valid"))
        .is_match(key)
}

/// Render a mapping key: preserved keys verbatim, everything else start-cased
pub fn render_key(key: &str) -> Cow<'_, str> {
    if is_preserved_key(key) {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(start_case(key))
    }
}

/// Capitalize the first character of each word and join words with a space
pub fn start_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, word) in words(input).iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Upper,
    Lower,
    Digit,
    /// Letters with no case (CJK, etc.)
    Misc,
    Break,
}

fn classify(c: char) -> Class {
    if c.is_ascii_digit() {
        Class::Digit
    } else if c.is_uppercase() {
        Class::Upper
    } else if c.is_lowercase() {
        Class::Lower
    } else if c.is_alphanumeric() {
        Class::Misc
    } else {
        Class::Break
    }
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Split a string into the words used by [`start_case`]
pub fn words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().filter(|&c| !is_apostrophe(c)).collect();
    let mut words = Vec::new();

    let mut start = 0;
    while start < chars.len() {
        if classify(chars[start]) == Class::Break {
            start += 1;
            continue;
        }
        let end = chars[start..]
            .iter()
            .position(|&c| classify(c) == Class::Break)
            .map_or(chars.len(), |offset| start + offset);
        split_segment(&chars[start..end], &mut words);
        start = end;
    }

    words
}

/// Split a delimiter-free run of characters
fn split_segment(segment: &[char], words: &mut Vec<String>) {
    let classes: Vec<Class> = segment.iter().map(|&c| classify(c)).collect();
    let mut i = 0;
    while i < segment.len() {
        let len = match classes[i] {
            Class::Digit => ordinal_len(segment, &classes, i)
                .unwrap_or_else(|| run_len(&classes, i, |c| c == Class::Digit)),
            _ => letter_word_len(&classes, i),
        };
        words.push(segment[i..i + len].iter().collect());
        i += len;
    }
}

fn run_len(classes: &[Class], from: usize, accept: impl Fn(Class) -> bool) -> usize {
    classes[from..].iter().take_while(|&&c| accept(c)).count()
}

fn is_misc_upper(c: Class) -> bool {
    matches!(c, Class::Upper | Class::Misc)
}

fn is_misc_lower(c: Class) -> bool {
    matches!(c, Class::Lower | Class::Misc)
}

/// Length of the letter word starting at `i`. Tried in order:
///
/// 1. `Upper? Lower+` when followed by the end or an upper-case letter
/// 2. the longest `(Upper|Misc)+` followed by the end or by `Upper (Lower|Misc)`
/// 3. `Upper? (Lower|Misc)+`
/// 4. `Upper+`
fn letter_word_len(classes: &[Class], i: usize) -> usize {
    let at = |p: usize| classes.get(p).copied();

    let lead = usize::from(at(i) == Some(Class::Upper));
    let lowers = run_len(classes, i + lead, |c| c == Class::Lower);
    if lowers > 0 {
        let next = i + lead + lowers;
        if matches!(at(next), None | Some(Class::Upper)) {
            return lead + lowers;
        }
    }

    let uppers = run_len(classes, i, is_misc_upper);
    for len in (1..=uppers).rev() {
        let next = i + len;
        match at(next) {
            None => return len,
            Some(Class::Upper) if at(next + 1).is_some_and(is_misc_lower) => return len,
            _ => {}
        }
    }

    let tail = run_len(classes, i + lead, is_misc_lower);
    if tail > 0 {
        return lead + tail;
    }

    run_len(classes, i, |c| c == Class::Upper).max(1)
}

/// Ordinals keep their suffix: the last digit selects `st`/`nd`/`rd`/`th`
/// and the suffix must be all lower or all upper case.
fn ordinal_len(segment: &[char], classes: &[Class], i: usize) -> Option<usize> {
    let digits = run_len(classes, i, |c| c == Class::Digit);
    let last = segment[i + digits - 1];
    let expected = match last {
        '1' => "st",
        '2' => "nd",
        '3' => "rd",
        _ => "th",
    };
    let suffix: String = segment.get(i + digits..i + digits + 2)?.iter().collect();
    let next = classes.get(i + digits + 2).copied();
    let lower_ok = suffix == expected && matches!(next, None | Some(Class::Upper));
    let upper_ok =
        suffix == expected.to_ascii_uppercase() && matches!(next, None | Some(Class::Lower));
    (lower_ok || upper_ok).then_some(digits + 2)
}
