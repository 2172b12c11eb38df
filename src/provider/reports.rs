//! Report generation collaborator.
//!
//! Submitting a request returns a ticket immediately; finished artifacts are
//! collected later with [`ReportGenerator::drain_completed`]. Nothing is
//! written to disk: an artifact is only a descriptor.

use crate::errors::{EntityKind, ProviderError, ProviderResult};
use crate::model::{ReportArtifact, ReportFormat, ReportPeriod, ReportRequest, ReportTemplate};
use chrono::{Datelike, Local, NaiveDateTime};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

/// Session-unique handle for a submitted report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportTicket {
    pub artifact_id: String,
}

pub trait ReportGenerator: Send {
    fn submit(&self, request: ReportRequest) -> ProviderResult<ReportTicket>;
    fn drain_completed(&self) -> Vec<ReportArtifact>;
}

/// Session artifact ids continue after the provider's history.
const FIRST_SESSION_SEQUENCE: u32 = 101;

/// Shared bookkeeping: template lookup and id allocation.
struct Catalogue {
    templates: HashMap<String, ReportTemplate>,
    sequence: AtomicU32,
}

impl Catalogue {
    fn new(templates: Vec<ReportTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
            sequence: AtomicU32::new(FIRST_SESSION_SEQUENCE),
        }
    }

    fn ticket(&self, request: &ReportRequest, now: NaiveDateTime) -> ProviderResult<ReportTicket> {
        if !self.templates.contains_key(&request.template_id) {
            return Err(ProviderError::not_found(
                EntityKind::ReportTemplate,
                request.template_id.clone(),
            ));
        }
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(ReportTicket {
            artifact_id: format!("RPT-{}-{:03}", now.year(), seq),
        })
    }

    fn build(
        &self,
        ticket: &ReportTicket,
        request: &ReportRequest,
        now: NaiveDateTime,
    ) -> Option<ReportArtifact> {
        let template = self.templates.get(&request.template_id)?;
        Some(build_artifact(ticket, template, request, now))
    }
}

/// Descriptor for a finished report. Size is a stable function of the
/// template and period so repeated generations look alike.
pub fn build_artifact(
    ticket: &ReportTicket,
    template: &ReportTemplate,
    request: &ReportRequest,
    now: NaiveDateTime,
) -> ReportArtifact {
    let period_weight = match request.period {
        ReportPeriod::Week => 1,
        ReportPeriod::Month => 3,
        ReportPeriod::Quarter => 7,
        ReportPeriod::Year => 18,
    };
    let base = 380 + template.title.len() as u32 * 23;
    let format = if template.id == "violation-analysis" {
        ReportFormat::Excel
    } else {
        ReportFormat::Pdf
    };

    ReportArtifact {
        id: ticket.artifact_id.clone(),
        title: format!("{} - {}", template.title, request.period.label()),
        kind: template.kind.clone(),
        generated_by: request.requested_by.clone(),
        generated_at: now,
        size_kb: base * period_weight,
        format,
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Generates synchronously; artifacts are ready on the next drain.
pub struct InlineReportGenerator {
    catalogue: Catalogue,
    completed: std::sync::Mutex<Vec<ReportArtifact>>,
}

impl InlineReportGenerator {
    pub fn new(templates: Vec<ReportTemplate>) -> Self {
        Self {
            catalogue: Catalogue::new(templates),
            completed: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl ReportGenerator for InlineReportGenerator {
    fn submit(&self, request: ReportRequest) -> ProviderResult<ReportTicket> {
        let now = local_now();
        let ticket = self.catalogue.ticket(&request, now)?;
        if let Some(artifact) = self.catalogue.build(&ticket, &request, now) {
            if let Ok(mut completed) = self.completed.lock() {
                completed.push(artifact);
            }
        }
        Ok(ticket)
    }

    fn drain_completed(&self) -> Vec<ReportArtifact> {
        self.completed
            .lock()
            .map(|mut completed| std::mem::take(&mut *completed))
            .unwrap_or_default()
    }
}

/// Generates on a worker thread after a simulated delay.
pub struct BackgroundReportGenerator {
    catalogue: Catalogue,
    requests: Option<Sender<(ReportTicket, ReportArtifact)>>,
    completed: Receiver<ReportArtifact>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackgroundReportGenerator {
    pub fn spawn(templates: Vec<ReportTemplate>, delay: Duration) -> Self {
        let (request_tx, request_rx) = unbounded::<(ReportTicket, ReportArtifact)>();
        let (done_tx, done_rx) = unbounded();

        let handle = thread::Builder::new()
            .name("scrutineye-reports".into())
            .spawn(move || {
                for (ticket, artifact) in request_rx {
                    thread::sleep(delay);
                    tracing::info!(report = %ticket.artifact_id, title = %artifact.title, "Report generated");
                    if done_tx.send(artifact).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| tracing::warn!(error = %e, "Failed to spawn report worker"))
            .ok();

        Self {
            catalogue: Catalogue::new(templates),
            requests: Some(request_tx),
            completed: done_rx,
            handle,
        }
    }
}

impl ReportGenerator for BackgroundReportGenerator {
    fn submit(&self, request: ReportRequest) -> ProviderResult<ReportTicket> {
        let now = local_now();
        let ticket = self.catalogue.ticket(&request, now)?;
        let artifact = self.catalogue.build(&ticket, &request, now).ok_or_else(|| {
            ProviderError::not_found(EntityKind::ReportTemplate, request.template_id.clone())
        })?;

        let sender = self
            .requests
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable("report worker stopped".into()))?;
        sender
            .send((ticket.clone(), artifact))
            .map_err(|_| ProviderError::Unavailable("report worker stopped".into()))?;

        tracing::debug!(report = %ticket.artifact_id, template = %request.template_id, "Report queued");
        Ok(ticket)
    }

    fn drain_completed(&self) -> Vec<ReportArtifact> {
        self.completed.try_iter().collect()
    }
}

impl Drop for BackgroundReportGenerator {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
