pub mod degree;
pub mod id;
pub mod label;
pub mod rules;
pub mod semester;

use rayon::prelude::*;
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::links::{self, LinkPair};
use crate::record::TimetableRecord;
use crate::settings::Plan;
use rules::Rules;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("path {0} did not match the id pattern, so no id can be extracted")]
    MissingFilename(String),
    #[error("could not get a one letter faculty code from sked path {0}")]
    FacultyCode(String),
}

/// Everything a record needs besides its link pair.
pub struct Context<'a> {
    pub plan: &'a Plan,
    pub term: &'a str,
    pub rules: &'a Rules,
}

/// Derive one record from a `(description, path)` pair.
pub fn build_record(
    pair: &LinkPair,
    ctx: &Context<'_>,
) -> Result<(TimetableRecord, Diagnostics), NormalizeError> {
    let mut diags = Diagnostics::new();
    let desc = pair.description.as_str();
    let path = pair.path.as_str();

    let faculty_code = id::faculty_code(path)?;
    let readable = links::decode_path(path);
    let semester = semester::resolve(desc, &readable, &mut diags);
    let degree = degree::estimate(desc, &readable, &mut diags);
    let id = id::derive(path, faculty_code, ctx.term, semester.number(), ctx.rules)?;
    let label = label::clean(desc, ctx.plan.shorthand_syntax, ctx.rules);

    let record = TimetableRecord {
        path: path.to_string(),
        label,
        faculty: ctx.plan.faculty.clone(),
        kind: ctx.plan.kind.clone(),
        graphical: ctx.plan.graphical,
        id,
        semester,
        degree,
    };
    Ok((record, diags))
}

/// Normalize all pairs of one plan. Output order follows the input order.
pub fn build_records<'p, I>(
    pairs: I,
    ctx: &Context<'_>,
) -> Result<(Vec<TimetableRecord>, Diagnostics), NormalizeError>
where
    I: IntoIterator<Item = &'p LinkPair>,
{
    let pairs: Vec<&LinkPair> = pairs.into_iter().collect();
    let built: Vec<(TimetableRecord, Diagnostics)> = pairs
        .par_iter()
        .map(|pair| build_record(pair, ctx))
        .collect::<Result<_, _>>()?;

    let mut records = Vec::with_capacity(built.len());
    let mut diags = Diagnostics::new();
    for (record, d) in built {
        records.push(record);
        diags.extend(d);
    }
    Ok((records, diags))
}

// ── Tests ──
