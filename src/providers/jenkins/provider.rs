use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio::sync::OnceCell;
use url::Url;

use crate::config::ResolvedConfig;
use crate::error::{JenLensError, Result};
use crate::report::{DurationSample, JobReport, RetentionBatch};

use super::client::JenkinsClient;
use super::types::{BuildDetail, JobRef, ProjectResponse};

/// Provider for collecting build duration reports from a Jenkins server.
///
/// Drives job discovery, successful-build selection, duration aggregation
/// and optional retention marking. A failure in one job's pipeline never
/// aborts another job's pipeline or the overall run; only configuration
/// errors at startup are fatal.
pub struct JenkinsProvider {
    /// Jenkins API client
    client: JenkinsClient,
    /// Root URL of the configured suite/project
    project_url: Url,
    /// Successful builds to collect per job
    success_count: usize,
    /// Project root response, fetched at most once per run
    project_root: OnceCell<ProjectResponse>,
}

impl JenkinsProvider {
    pub fn new(settings: &ResolvedConfig) -> Result<Self> {
        let client = JenkinsClient::new()?;
        let project_url =
            project_api_root(&settings.base_url, &settings.suite, &settings.project)?;

        Ok(Self {
            client,
            project_url,
            success_count: settings.success_count,
            project_root: OnceCell::new(),
        })
    }

    /// List the project's child jobs.
    ///
    /// The project root is fetched once per provider instance; later calls
    /// reuse the parsed response. `MissingJobsField` when the response has
    /// no jobs list.
    pub async fn jobs(&self) -> Result<Vec<JobRef>> {
        debug!("Fetching from {}", self.project_url);
        let root = self
            .project_root
            .get_or_try_init(|| self.client.fetch_project(self.project_url.as_str()))
            .await?;

        let jobs = root.jobs.as_ref().ok_or(JenLensError::MissingJobsField)?;
        info!("got {} jobs", jobs.len());
        Ok(jobs.clone())
    }

    /// Select the most recent successful builds of a job, newest first.
    ///
    /// The candidate order is fixed (build number descending, stable on
    /// ties) before any detail fetch is dispatched, so completion order
    /// cannot reorder the result. A build whose detail fetch fails is
    /// excluded from the selection; fewer than `n` matches (possibly zero)
    /// is a valid outcome.
    pub async fn recent_successful_builds(
        &self,
        job: &JobRef,
        n: usize,
    ) -> Result<Vec<BuildDetail>> {
        let history = self.client.fetch_job(&job.url).await?;

        let mut candidates = history.builds;
        candidates.sort_by(|a, b| b.number.cmp(&a.number));

        let details = join_all(
            candidates
                .iter()
                .map(|build| self.client.fetch_build(&build.url)),
        )
        .await;

        let successes = details
            .into_iter()
            .zip(&candidates)
            .filter_map(|(fetched, build)| match fetched {
                Ok(detail) if detail.is_success() => Some(detail),
                Ok(_) => None,
                Err(err) => {
                    warn!("{}: skipping build #{}: {err}", job.name, build.number);
                    None
                }
            })
            .take(n)
            .collect();

        Ok(successes)
    }

    /// Build one job's duration report. Never fails: every error inside the
    /// job's pipeline degrades to an empty or shorter sample list.
    pub async fn job_report(&self, job: &JobRef) -> JobReport {
        let builds = match self.recent_successful_builds(job, self.success_count).await {
            Ok(builds) => builds,
            Err(err) => {
                warn!("{}: failed to fetch build history: {err}", job.name);
                Vec::new()
            }
        };

        info!("{} fetched {} successful builds", job.name, builds.len());
        if builds.is_empty() {
            warn!("{} has no successful builds", job.name);
        } else if builds.len() < self.success_count {
            info!(
                "{} has less than {} ({}) successful builds",
                job.name,
                self.success_count,
                builds.len()
            );
        }

        let samples = join_all(
            builds
                .iter()
                .map(|build| self.duration_sample(&job.name, build)),
        )
        .await;

        JobReport {
            name: job.name.clone(),
            data: samples.into_iter().flatten().collect(),
            build_urls: builds.into_iter().map(|build| build.url).collect(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    async fn duration_sample(&self, job_name: &str, build: &BuildDetail) -> Option<DurationSample> {
        match self.client.fetch_build_duration(&build.url).await {
            Ok(Some(millis)) => Some(DurationSample {
                number: build.number,
                duration: millis as f64 / 1000.0,
            }),
            Ok(None) => {
                warn!("{job_name}: build #{} reports no duration", build.number);
                None
            }
            Err(err) => {
                warn!(
                    "{job_name}: failed to fetch duration for build #{}: {err}",
                    build.number
                );
                None
            }
        }
    }

    /// List jobs for reporting, degrading to an empty list when the project
    /// root is unreachable or malformed.
    pub async fn list_jobs(&self) -> Vec<JobRef> {
        match self.jobs().await {
            Ok(jobs) => jobs,
            Err(err) => {
                error!("Failed to list jobs: {err}");
                Vec::new()
            }
        }
    }

    /// Aggregate duration reports for the given jobs, concurrently.
    ///
    /// Results are joined back by job index, so the report preserves
    /// job-list order regardless of completion order.
    pub async fn collect_reports(&self, jobs: &[JobRef]) -> Vec<JobReport> {
        join_all(jobs.iter().map(|job| self.job_report(job))).await
    }

    /// Full pipeline: discover jobs and aggregate every job's report.
    pub async fn collect_report(&self) -> Vec<JobReport> {
        let jobs = self.list_jobs().await;
        self.collect_reports(&jobs).await
    }

    /// Dispatch a keep-forever toggle for every build in the batch.
    ///
    /// Fire-and-forget: the return value counts dispatched requests, not
    /// confirmed toggles.
    pub async fn mark_builds_forever(&self, batch: &RetentionBatch) -> usize {
        let urls: Vec<&String> = batch.values().flatten().collect();

        let outcomes = join_all(urls.iter().map(|url| self.client.toggle_log_keep(url))).await;
        for (url, outcome) in urls.iter().zip(&outcomes) {
            if let Err(err) = outcome {
                warn!("toggleLogKeep dispatch failed for {url}: {err}");
            }
        }

        info!("Saved {} builds", urls.len());
        urls.len()
    }
}

/// Compose the canonical project API root `{base}/{suite}/job/{project}/`.
///
/// Segments are percent-encoded, so suite names containing spaces are valid.
fn project_api_root(base: &Url, suite: &str, project: &str) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| JenLensError::Config(format!("base URL cannot carry a path: {base}")))?
        .pop_if_empty()
        .extend([suite, "job", project, ""]);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_api_root_composition() {
        let base = Url::parse("https://ci.example.com/").unwrap();
        let url = project_api_root(&base, "Perf", "Widgets").unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/Perf/job/Widgets/");
    }

    #[test]
    fn test_project_api_root_encodes_spaces() {
        let base = Url::parse("https://ci.example.com").unwrap();
        let url = project_api_root(&base, "Performance Tests", "Genresmanagement").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/Performance%20Tests/job/Genresmanagement/"
        );
    }

    #[test]
    fn test_project_api_root_keeps_base_path() {
        let base = Url::parse("https://ci.example.com/jenkins/").unwrap();
        let url = project_api_root(&base, "Perf", "Widgets").unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/jenkins/Perf/job/Widgets/"
        );
    }
}
