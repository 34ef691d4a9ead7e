use std::sync::LazyLock;

use regex::Regex;

use super::rules::Rules;
use super::NormalizeError;
use crate::links;

// Filename before the final extension, at least one directory below the faculty.
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\w/.+/(.+?)\.+(html|csv)").unwrap());
static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static UNDERSCORES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());
// SoSe, WiSe, SS, WS including the year
static TERM_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"((s|w)s|(so|w)se)(_?\d+)(_\d+)?_?").unwrap());

/// One letter faculty code, the first segment of a sked path.
pub fn faculty_code(path: &str) -> Result<&str, NormalizeError> {
    let code = path.split('/').next().unwrap_or_default();
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => Ok(code),
        _ => Err(NormalizeError::FacultyCode(path.to_string())),
    }
}

/// Build a short, readable and stable id from a sked path.
pub fn derive(
    path: &str,
    faculty: &str,
    term: &str,
    semester: Option<u8>,
    rules: &Rules,
) -> Result<String, NormalizeError> {
    let path = links::decode_path(path);
    let caps = FILENAME_RE
        .captures(&path)
        .ok_or_else(|| NormalizeError::MissingFilename(path.clone()))?;

    let id = caps[1].trim().to_lowercase();
    let id = NON_WORD_RE.replace_all(&id, "_");
    let id = collapse_underscores(&id);

    // Term markers go before the boilerplate table, which may expose new ones otherwise.
    let id = TERM_MARKER_RE.replace_all(&id, "");
    let id = rules.apply_id(&id);
    let mut id = id.trim_matches(|c: char| c == '_' || c == ' ').to_string();

    if let Some(n) = semester {
        id = remove_standalone_digit(&id, n);
        id = format!("{}_{}", id, n);
    }

    let prefix = format!("{}_", faculty);
    if !id.starts_with(&prefix) {
        id = format!("{}{}", prefix, id);
    }

    Ok(collapse_underscores(&format!("{}_{}", id, term)))
}

/// Squash runs of underscores and drop trailing ones.
fn collapse_underscores(s: &str) -> String {
    UNDERSCORES_RE
        .replace_all(s, "_")
        .trim_end_matches('_')
        .to_string()
}

/// Remove `digit` wherever it is not preceded by another digit and is
/// followed by `_` or the end of the string.
fn remove_standalone_digit(s: &str, digit: u8) -> String {
    let target = char::from(b'0' + digit % 10);
    let chars: Vec<char> = s.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let standalone = c == target
                && (i == 0 || !chars[i - 1].is_ascii_digit())
                && chars.get(i + 1).map_or(true, |&next| next == '_');
            !standalone
        })
        .map(|(_, &c)| c)
        .collect()
}

// ── Tests ──
