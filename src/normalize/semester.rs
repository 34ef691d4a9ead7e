use std::sync::LazyLock;

use regex::Regex;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::record::Semester;

/// A digit, any non-word separator, then something starting with "Sem".
/// The digit must not follow another digit; that is checked by hand.
static SEMESTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([1-9])\W+Sem").unwrap());

const ELECTIVE_KEYWORDS: &[&str] = &["wahlpflicht", "wpf"];

pub fn is_elective(text: &str) -> bool {
    let lower = text.to_lowercase();
    ELECTIVE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Rightmost semester number mentioned in `text`.
pub fn find_semester_number(text: &str) -> Option<u8> {
    SEMESTER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|digit| {
            let before = text[..digit.start()].chars().next_back();
            !before.is_some_and(|c| c.is_ascii_digit())
        })
        .last()
        .and_then(|digit| digit.as_str().parse().ok())
}

/// Classify a timetable by semester. Electives win over any number; the
/// description wins over the path.
pub fn resolve(desc: &str, path: &str, diags: &mut Diagnostics) -> Semester {
    if is_elective(desc) || is_elective(path) {
        return Semester::Elective;
    }
    match find_semester_number(desc).or_else(|| find_semester_number(path)) {
        Some(n) => Semester::Numbered(n),
        None => {
            diags.push(Diagnostic::UnresolvedSemester {
                description: desc.to_string(),
                path: path.to_string(),
            });
            Semester::Unknown
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn sem(desc: &str, path: &str) -> Semester {
        resolve(desc, path, &mut Diagnostics::new())
    }

    #[test]
    fn normal_description() {
        assert_eq!(sem("Angewandte Informatik - 1. Semester", ""), Semester::Numbered(1));
    }

    #[test]
    fn other_numbers_ignored() {
        assert_eq!(
            sem("Wasser- und Bodenmanagement - PO 2018 - 3. Semester", ""),
            Semester::Numbered(3)
        );
        assert_eq!(sem("Wasser- und Bodenmanagement - 20. Sem", ""), Semester::Unknown);
    }

    #[test]
    fn abbreviations_and_missing_delimiters() {
        assert_eq!(sem("1. Sem. EIT", ""), Semester::Numbered(1));
        assert_eq!(sem("IVG_1_1.Sem", ""), Semester::Numbered(1));
        assert_eq!(sem("1 Sem Informatik", ""), Semester::Numbered(1));
    }

    #[test]
    fn rightmost_mention_wins() {
        assert_eq!(
            sem("Bio- und Umwelttechnik (BEE ) - 3. - 4.  Semester", ""),
            Semester::Numbered(4)
        );
        assert_eq!(sem("Bio- und Umwelttechnik (BEE) - 3. - 4. Semester", ""), Semester::Numbered(4));
        assert_eq!(sem("2. Sem und 6. Semester", ""), Semester::Numbered(6));
        assert_eq!(sem("1.Sem2.Sem", ""), Semester::Numbered(2));
        assert_eq!(sem("12. Sem und 3. Sem", ""), Semester::Numbered(3));
        assert_eq!(sem("3. Sem und 12. Sem", ""), Semester::Numbered(3));
        assert_eq!(
            sem("Soziale Arbeit - 5. Semester - PO 2018 - 5. Semester - Soziale Arbeit", ""),
            Semester::Numbered(5)
        );
    }

    #[test]
    fn electives_take_priority() {
        assert_eq!(sem("Management im Gesundheitswesen Wahlpflichtangebot", ""), Semester::Elective);
        assert_eq!(sem("Wahlpflichtangebot (WPF MIG) 5. und höhere Sem.", ""), Semester::Elective);
        assert_eq!(sem("Informatik 3. Semester", "i/wpf/liste.html"), Semester::Elective);
    }

    #[test]
    fn path_is_fallback() {
        assert_eq!(
            sem("Nothing in here", "i/Semester/Semester-Liste/I-B.Sc. WI 1. Sem..html"),
            Semester::Numbered(1)
        );
        assert_eq!(sem("Informatik 2. Semester", "i/x/WI 5. Sem.html"), Semester::Numbered(2));
    }

    #[test]
    fn unresolved_is_reported() {
        let mut diags = Diagnostics::new();
        assert_eq!(resolve("IMES Teilzeit 2018", "e/imes.html", &mut diags), Semester::Unknown);
        assert_eq!(
            diags.events(),
            &[Diagnostic::UnresolvedSemester {
                description: "IMES Teilzeit 2018".into(),
                path: "e/imes.html".into(),
            }]
        );
    }
}
