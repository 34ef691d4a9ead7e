use std::sync::LazyLock;

use regex::Regex;

use super::rules::Rules;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
// "long name (shorthand) additional info", shorthand without digits
static SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*?\((\D+?)\)(.*)$").unwrap());
// "5. Semester", "3. - 4. Semester", "5 Sem", "1. Sem."
static SEMESTER_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d\. ?-)?-? ?\d\.?\W+Sem(?:ester|\.)?").unwrap());
static LONE_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[_-]\d").unwrap());

/// Turn a link description into a short display label.
pub fn clean(desc: &str, use_shorthand: bool, rules: &Rules) -> String {
    let desc = rules.strip_label_noise(desc);
    let mut desc = WHITESPACE_RE.replace_all(&desc, " ").into_owned();

    if use_shorthand {
        if let Some(caps) = SHORTHAND_RE.captures(&desc) {
            let shorthand = caps[1].trim();
            let rest = caps[2].trim();
            desc = format!("{} {}", shorthand, rest);
        }
    }

    let desc = SEMESTER_FRAGMENT_RE.replace_all(&desc, "");
    let desc = strip_lone_digits(&desc);
    desc.replace("  ", " ")
        .trim_matches(|c: char| c == '-' || c == '_' || c == ' ')
        .to_string()
}

/// Drop `-N` / `_N` where the digit ends the string or is followed by `_`.
fn strip_lone_digits(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for m in LONE_DIGIT_RE.find_iter(s) {
        let next = s[m.end()..].chars().next();
        if matches!(next, None | Some('_')) {
            out.push_str(&s[last..m.start()]);
            last = m.end();
        }
    }
    out.push_str(&s[last..]);
    out
}

// ── Tests ──
