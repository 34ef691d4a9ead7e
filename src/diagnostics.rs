use tracing::{debug, info, warn};

/// Non-fatal findings collected by the pure stages and emitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnresolvedSemester { description: String, path: String },
    UnverifiedMaster { description: String, path: String },
    EmptyPlan { url: String },
    Excluded { path: String, reason: String },
}

impl Diagnostic {
    pub fn emit(&self) {
        match self {
            Diagnostic::UnresolvedSemester { description, path } => {
                warn!(%description, %path, "Kein Semester bestimmbar");
            }
            Diagnostic::UnverifiedMaster { description, path } => {
                info!(
                    %description,
                    %path,
                    "Master vermutet, bitte manuell prüfen, dass es kein Bachelor ist"
                );
            }
            Diagnostic::EmptyPlan { url } => {
                warn!(%url, "No timetable links found on overview page");
            }
            Diagnostic::Excluded { path, reason } => {
                debug!(%path, %reason, "Timetable excluded");
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Diagnostic) {
        self.events.push(event);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.events.extend(other.events);
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn emit_all(&self) {
        for event in &self.events {
            event.emit();
        }
    }
}
