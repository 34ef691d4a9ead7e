use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use thiserror::Error;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::links;
use crate::record::TimetableRecord;

/// Structural exclusions that apply to every faculty.
const BUILTIN_EXCLUSIONS: &[(&str, &str)] = &[("index page", r"(?i)(^|/)index\.html?$")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub id: String,
    pub paths: Vec<String>,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.paths.join(", "))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("duplicate timetable ids: {}", format_collisions(.0))]
    DuplicateIds(Vec<Collision>),
}

fn format_collisions(collisions: &[Collision]) -> String {
    collisions
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug)]
struct ExclusionRule {
    name: String,
    pattern: Regex,
}

/// Path shapes that never make it into the output.
#[derive(Debug)]
pub struct FilterRules {
    rules: Vec<ExclusionRule>,
}

impl FilterRules {
    pub fn new(extra_patterns: &[String]) -> Result<Self, regex::Error> {
        let builtin = BUILTIN_EXCLUSIONS
            .iter()
            .map(|(name, pattern)| (name.to_string(), pattern.to_string()));
        let extra = extra_patterns.iter().map(|p| (p.clone(), p.clone()));

        let rules = builtin
            .chain(extra)
            .map(|(name, pattern)| {
                Ok(ExclusionRule {
                    name,
                    pattern: Regex::new(&pattern)?,
                })
            })
            .collect::<Result<_, regex::Error>>()?;
        Ok(FilterRules { rules })
    }

    /// Name of the first rule excluding `path`.
    pub fn excludes(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.pattern.is_match(path))
            .map(|r| r.name.as_str())
    }
}

impl Default for FilterRules {
    fn default() -> Self {
        FilterRules::new(&[]).unwrap_or(FilterRules { rules: Vec::new() })
    }
}

fn blacklisted<'b>(record: &TimetableRecord, blacklist: &'b [String]) -> Option<&'b str> {
    let path = links::decode_path(&record.path).to_lowercase();
    let label = record.label.to_lowercase();
    blacklist
        .iter()
        .filter(|entry| !entry.is_empty())
        .find(|entry| {
            let entry = entry.to_lowercase();
            path.contains(&entry) || label.contains(&entry)
        })
        .map(|entry| entry.as_str())
}

pub fn sort(records: &mut [TimetableRecord]) {
    records.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Every id used by more than one record, with the paths sharing it.
pub fn find_collisions(records: &[TimetableRecord]) -> Vec<Collision> {
    let mut by_id: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in records {
        by_id.entry(&record.id).or_default().push(&record.path);
    }
    by_id
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(id, paths)| Collision {
            id: id.to_string(),
            paths: paths.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// Filter, sort and check the records of all plans.
pub fn aggregate(
    records: Vec<TimetableRecord>,
    blacklist: &[String],
    rules: &FilterRules,
) -> Result<(Vec<TimetableRecord>, Diagnostics), AggregateError> {
    let mut diags = Diagnostics::new();
    let mut kept: Vec<TimetableRecord> = records
        .into_iter()
        .filter(|record| {
            let reason = blacklisted(record, blacklist)
                .map(|entry| format!("blacklist entry '{}'", entry))
                .or_else(|| rules.excludes(&record.path).map(str::to_string));
            match reason {
                Some(reason) => {
                    diags.push(Diagnostic::Excluded {
                        path: record.path.clone(),
                        reason,
                    });
                    false
                }
                None => true,
            }
        })
        .collect();

    sort(&mut kept);

    let collisions = find_collisions(&kept);
    if !collisions.is_empty() {
        return Err(AggregateError::DuplicateIds(collisions));
    }
    Ok((kept, diags))
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Degree, Semester};

    fn record(faculty: &str, degree: Degree, semester: Semester, label: &str, id: &str) -> TimetableRecord {
        TimetableRecord {
            path: format!("x/plan/{}.html", id),
            label: label.into(),
            faculty: faculty.into(),
            kind: None,
            graphical: true,
            id: id.into(),
            semester,
            degree,
        }
    }

    fn sample() -> Vec<TimetableRecord> {
        vec![
            record("Informatik", Degree::Master, Semester::Numbered(1), "Informatik", "i_inf_m_1"),
            record("Elektrotechnik", Degree::Bachelor, Semester::Elective, "WPF EIT", "e_wpf"),
            record("Elektrotechnik", Degree::Bachelor, Semester::Numbered(3), "EIT", "e_eit_3"),
            record("Elektrotechnik", Degree::Bachelor, Semester::Unknown, "Sonderplan", "e_sonder"),
            record("Elektrotechnik", Degree::Bachelor, Semester::Numbered(1), "EIT", "e_eit_1"),
            record("Elektrotechnik", Degree::Master, Semester::Numbered(1), "PSA", "e_psa_m_1"),
            record("Informatik", Degree::Bachelor, Semester::Numbered(1), "Informatik", "i_inf_1"),
        ]
    }

    fn ids(records: &[TimetableRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn sorts_by_composite_key() {
        let (records, diags) = aggregate(sample(), &[], &FilterRules::default()).unwrap();
        assert!(diags.events().is_empty());
        assert_eq!(
            ids(&records),
            ["e_eit_1", "e_eit_3", "e_sonder", "e_wpf", "e_psa_m_1", "i_inf_1", "i_inf_m_1"]
        );
    }

    #[test]
    fn sort_is_idempotent_and_total() {
        let mut once = sample();
        sort(&mut once);
        let mut twice = once.clone();
        sort(&mut twice);
        assert_eq!(once, twice);

        for a in &once {
            for b in &once {
                let ord = a.sort_key().cmp(&b.sort_key());
                assert_eq!(ord.is_eq(), a.id == b.id);
                assert_eq!(ord, b.sort_key().cmp(&a.sort_key()).reverse());
            }
        }
    }

    #[test]
    fn blacklist_matches_path_or_label() {
        let mut records = sample();
        records[0].path = "i/plan/Test-Plan.html".into();
        let blacklist = vec!["test-plan".to_string(), "SONDERPLAN".to_string()];
        let (records, diags) = aggregate(records, &blacklist, &FilterRules::default()).unwrap();
        assert_eq!(records.len(), 5);
        assert!(!ids(&records).contains(&"i_inf_m_1"));
        assert!(!ids(&records).contains(&"e_sonder"));
        assert_eq!(diags.events().len(), 2);
    }

    #[test]
    fn blacklist_sees_decoded_path() {
        let mut records = sample();
        records[0].path = "i/plan/Alte%20Pr%C3%BCfung.html".into();
        let blacklist = vec!["alte prüfung".to_string()];
        let (records, _) = aggregate(records, &blacklist, &FilterRules::default()).unwrap();
        assert!(!ids(&records).contains(&"i_inf_m_1"));
    }

    #[test]
    fn structural_rules() {
        let rules = FilterRules::new(&[r"^s/.*/alt/".to_string()]).unwrap();
        assert_eq!(rules.excludes("e/semester/Index.html"), Some("index page"));
        assert_eq!(rules.excludes("s/plan/alt/bwl.html"), Some(r"^s/.*/alt/"));
        assert_eq!(rules.excludes("e/semester/eit.html"), None);
        assert!(FilterRules::new(&["(".to_string()]).is_err());
    }

    #[test]
    fn collisions_are_fatal_and_named() {
        let mut records = sample();
        let mut twin = records[2].clone();
        twin.path = "e/other/EIT 3.html".into();
        twin.label = "EIT (alt)".into();
        records.push(twin);

        let err = aggregate(records, &[], &FilterRules::default()).unwrap_err();
        let AggregateError::DuplicateIds(collisions) = &err;
        assert_eq!(
            collisions,
            &[Collision {
                id: "e_eit_3".into(),
                paths: vec!["x/plan/e_eit_3.html".into(), "e/other/EIT 3.html".into()],
            }]
        );
        assert!(err.to_string().contains("e_eit_3"));
    }

    #[test]
    fn excluded_records_do_not_collide() {
        let mut records = sample();
        let mut twin = records[2].clone();
        twin.path = "e/Semester/index.html".into();
        records.push(twin);
        assert!(aggregate(records, &[], &FilterRules::default()).is_ok());
    }
}
