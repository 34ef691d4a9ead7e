//! Ordered replacement tables for ids and labels.
//!
//! Order matters: entries are applied top to bottom, each on the output of
//! the previous one.

use serde::Deserialize;

/// Faculty specific boilerplate removed from ids, applied after term markers
/// are gone.
pub const ID_REPLACEMENTS: &[(&str, &str)] = &[
    ("semester_", ""),
    ("_semester", ""),
    ("_sem", ""),
    ("soziale_arbeit", ""),
    ("wirtschaftsingenieur_", ""),
    ("energie_und_gebaeudetechnik_", ""),
    ("bio_und_umwelttechnik_", ""),
    ("bachelor", ""),
    ("b_sc", ""),
    ("m_sc", "m"),
    ("energie_", ""),
    ("umwelt_", ""),
    // faculty S group marker
    ("stdgrp_", ""),
    // faculty K
    ("stjg_", ""),
];

/// Noisy prefixes and markers removed from link descriptions.
pub const LABEL_NOISE: &[&str] = &["S-", "I-", "B.Sc.", "Soziale Arbeit -", ".csv"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replacement {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

/// The replacement tables in effect for one run: the built-in entries
/// followed by any configured additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub id_replacements: Vec<Replacement>,
    pub label_noise: Vec<String>,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            id_replacements: ID_REPLACEMENTS
                .iter()
                .map(|(pattern, replacement)| Replacement {
                    pattern: pattern.to_string(),
                    replacement: replacement.to_string(),
                })
                .collect(),
            label_noise: LABEL_NOISE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Rules {
    pub fn with_extra(extra_ids: &[Replacement], extra_noise: &[String]) -> Self {
        let mut rules = Rules::default();
        rules.id_replacements.extend_from_slice(extra_ids);
        rules.label_noise.extend_from_slice(extra_noise);
        rules
    }

    pub fn apply_id(&self, id: &str) -> String {
        self.id_replacements
            .iter()
            .filter(|r| !r.pattern.is_empty())
            .fold(id.to_string(), |acc, r| acc.replace(&r.pattern, &r.replacement))
    }

    pub fn strip_label_noise(&self, desc: &str) -> String {
        self.label_noise
            .iter()
            .filter(|n| !n.is_empty())
            .fold(desc.to_string(), |acc, n| acc.replace(n.as_str(), ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_table_applies_in_order() {
        let rules = Rules::default();
        assert_eq!(rules.apply_id("psa_semester_schwerpunkt"), "psa_schwerpunkt");
        assert_eq!(rules.apply_id("energie_und_gebaeudetechnik_tga"), "tga");
        assert_eq!(rules.apply_id("wi_m_sc"), "wi_m");
    }

    #[test]
    fn later_entries_see_earlier_output() {
        let rules = Rules::default();
        // Dropping "semester_" joins "m_" and "schwerpunkt" into "m_sc".
        assert_eq!(rules.apply_id("psa_m_semester_schwerpunkt"), "psa_mhwerpunkt");
        // With the semester digit in between, the master marker survives.
        assert_eq!(rules.apply_id("psa_m_1_semester_schwerpunkt"), "psa_m_1_schwerpunkt");
    }

    #[test]
    fn configured_entries_come_last() {
        let extra = vec![Replacement {
            pattern: "_vollzeit".into(),
            replacement: String::new(),
        }];
        let rules = Rules::with_extra(&extra, &["Teilzeit".to_string()]);
        assert_eq!(rules.apply_id("bachelor_bwl_vollzeit"), "_bwl");
        assert_eq!(rules.strip_label_noise("S-BWL Teilzeit"), "BWL ");
    }
}
