use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::record::Degree;

const MASTER_DESC_KEYWORDS: &[&str] = &["master", "m.sc", "imes"];
const MASTER_PATH_MARKERS: &[&str] = &["-m-", "_m_"];
// Bachelor profile "M" shares the path marker with master programs.
const BACHELOR_PROFILE_M: &str = "studienprofil m";

/// Estimate whether a timetable belongs to a master or bachelor program.
pub fn estimate(desc: &str, path: &str, diags: &mut Diagnostics) -> Degree {
    let desc_lower = desc.to_lowercase();
    let path_lower = path.to_lowercase();

    if MASTER_DESC_KEYWORDS.iter().any(|kw| desc_lower.contains(kw)) {
        return Degree::Master;
    }
    if MASTER_PATH_MARKERS.iter().any(|m| path_lower.contains(m)) {
        if desc_lower.contains(BACHELOR_PROFILE_M) {
            return Degree::Bachelor;
        }
        diags.push(Diagnostic::UnverifiedMaster {
            description: desc.to_string(),
            path: path.to_string(),
        });
        return Degree::Master;
    }
    Degree::Bachelor
}
