use crate::{
    config::Config,
    driver::Browser,
    enrich, gate,
    interpreter::Interpreter,
    keywords::KeywordSource,
    postprocess,
    report::SiteReport,
    steps::{Site, StepProgram},
    store::RecordStore,
    util::{now_rfc3339, today},
};
use anyhow::{bail, Result};
use std::path::Path;
use tracing::{error, info, warn};

/// Runs sites one after another: interpret, strip canned text, enrich,
/// dedup into the store, persist the batch.
pub struct Pipeline<K: KeywordSource> {
    cfg: Config,
    keywords: K,
}

impl<K: KeywordSource> Pipeline<K> {
    pub fn new(cfg: &Config, keywords: K) -> Self {
        Self {
            cfg: cfg.clone(),
            keywords,
        }
    }

    /// A failing site is reported and the loop moves on to the next one.
    pub fn run(
        &self,
        browser: &mut dyn Browser,
        store: &mut dyn RecordStore,
        program: &StepProgram,
        out_dir: &Path,
    ) -> Result<Vec<SiteReport>> {
        let sites = select_sites(program, &self.cfg.global.sites)?;
        let mut reports = Vec::with_capacity(sites.len());

        for site in sites {
            let started = now_rfc3339();
            let report = match self.run_site(browser, store, site, out_dir) {
                Ok(r) => r,
                Err(err) => {
                    error!("site {} failed: {err:#}", site.name);
                    SiteReport {
                        site: site.name.clone(),
                        started,
                        finished: now_rfc3339(),
                        aborted: Some(format!("{err:#}")),
                        ..Default::default()
                    }
                }
            };
            reports.push(report);
        }

        Ok(reports)
    }

    pub fn run_site(
        &self,
        browser: &mut dyn Browser,
        store: &mut dyn RecordStore,
        site: &Site,
        out_dir: &Path,
    ) -> Result<SiteReport> {
        let mut report = SiteReport {
            site: site.name.clone(),
            started: now_rfc3339(),
            ..Default::default()
        };

        let run = Interpreter::new(&self.cfg, browser).run_site(site);
        report.records_dropped = run.records_dropped;

        if let Some(failure) = run.failure {
            warn!(
                "site {} aborted; keeping {} records extracted before the failure",
                site.name,
                run.batch.len()
            );
            report.aborted = Some(failure);
        }

        let mut batch = run.batch;
        report.records = batch.len();

        if self.cfg.postprocess.remove_canned_text {
            report.canned_sentences_removed =
                postprocess::remove_canned_text(&self.cfg, &mut batch);
        }

        enrich::enrich_batch(&self.cfg, &mut batch, &self.keywords);

        let outcome = gate::forward_new(&batch, store, &today())?;
        report.apply_gate(&outcome);

        let path = gate::batch_path(out_dir, &site.name, &self.cfg.output.file_suffix);
        gate::write_batch(&path, &batch)?;
        report.output = Some(path.display().to_string());

        info!(
            "site {} done: {} records, {} new, {} already stored",
            site.name, report.records, report.accepted, report.skipped
        );
        report.finished = now_rfc3339();
        Ok(report)
    }
}

/// The sites to run, in program order. An empty `names` selects every site.
pub fn select_sites<'p>(program: &'p StepProgram, names: &[String]) -> Result<Vec<&'p Site>> {
    if names.is_empty() {
        return Ok(program.sites.iter().collect());
    }
    for name in names {
        if program.site(name).is_none() {
            bail!("site {name:?} is not in the step program");
        }
    }
    Ok(program
        .sites
        .iter()
        .filter(|s| names.contains(&s.name))
        .collect())
}
