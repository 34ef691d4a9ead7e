use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::aggregate::{self, AggregateError, FilterRules};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::fetch::PageSource;
use crate::links::{self, LinkPair};
use crate::normalize::{self, Context as NormalizeContext};
use crate::record::TimetableRecord;
use crate::settings::{Plan, Settings};

/// Fetch, normalize and aggregate every configured plan.
pub async fn run<S: PageSource>(source: &S, settings: &Settings) -> Result<Vec<TimetableRecord>> {
    let term = settings.term_tag();
    let rules = settings.rules();
    let filters = FilterRules::new(&settings.exclude_patterns)
        .context("Invalid pattern in exclude_patterns")?;
    info!(term = %term, plans = settings.plans.len(), "Starting sked parser");

    let pb = ProgressBar::new(settings.plans.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut records = Vec::new();
    for (i, plan) in settings.plans.iter().enumerate() {
        if i > 0 && settings.fetch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(settings.fetch_delay_ms)).await;
        }
        pb.set_message(plan.faculty.clone());

        let markup = source
            .fetch(&plan.url)
            .await
            .with_context(|| format!("Failed to fetch plan {}", plan.url))?;
        let pairs = links::extract(&markup, &plan.url, &plan.faculty, &settings.base_url)
            .with_context(|| format!("Failed to parse plan {}", plan.url))?;

        let ctx = NormalizeContext {
            plan,
            term: &term,
            rules: &rules,
        };
        let (plan_records, diags) = plan_records(plan, &pairs, &ctx, &filters)?;
        diags.emit_all();
        info!(
            faculty = %plan.faculty,
            links = pairs.len(),
            records = plan_records.len(),
            notes = diags.events().len(),
            "Plan parsed"
        );
        records.extend(plan_records);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let (records, diags) = match aggregate::aggregate(records, &settings.blacklist, &filters) {
        Ok(result) => result,
        Err(AggregateError::DuplicateIds(collisions)) => {
            for c in &collisions {
                error!(id = %c.id, paths = ?c.paths, "Duplicate timetable id");
            }
            return Err(AggregateError::DuplicateIds(collisions).into());
        }
    };
    diags.emit_all();
    Ok(records)
}

/// Records of one plan. Structurally excluded paths are dropped before any
/// id is derived from them.
fn plan_records(
    plan: &Plan,
    pairs: &BTreeSet<LinkPair>,
    ctx: &NormalizeContext<'_>,
    filters: &FilterRules,
) -> Result<(Vec<TimetableRecord>, Diagnostics)> {
    let mut diags = Diagnostics::new();
    if pairs.is_empty() {
        diags.push(Diagnostic::EmptyPlan {
            url: plan.url.clone(),
        });
        return Ok((Vec::new(), diags));
    }

    let kept = pairs.iter().filter(|pair| match filters.excludes(&pair.path) {
        Some(reason) => {
            diags.push(Diagnostic::Excluded {
                path: pair.path.clone(),
                reason: reason.to_string(),
            });
            false
        }
        None => true,
    });
    let kept: Vec<&LinkPair> = kept.collect();

    let (records, normalize_diags) = normalize::build_records(kept, ctx)
        .with_context(|| format!("Failed to normalize plan {}", plan.url))?;
    diags.extend(normalize_diags);
    Ok((records, diags))
}

// ── Tests ──
