use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{JenLensError, Result};

use super::types::{BuildDetail, BuildDuration, JobResponse, ProjectResponse};

/// Jenkins JSON API client.
///
/// Every method issues exactly one request per call: no retries, no backoff.
/// Callers treat a returned error as "no data" and degrade instead of
/// crashing.
pub struct JenkinsClient {
    /// HTTP client
    client: Client,
}

impl JenkinsClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("JenLens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JenLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch the project root: the list of child jobs.
    pub async fn fetch_project(&self, project_url: &str) -> Result<ProjectResponse> {
        self.get_json(&api_json_pretty(project_url)).await
    }

    /// Fetch a job's build history.
    pub async fn fetch_job(&self, job_url: &str) -> Result<JobResponse> {
        self.get_json(&api_json_pretty(job_url)).await
    }

    /// Fetch the detail record of a single build.
    pub async fn fetch_build(&self, build_url: &str) -> Result<BuildDetail> {
        self.get_json(&api_json(build_url)).await
    }

    /// Fetch a build's wall-clock duration in milliseconds.
    ///
    /// `None` when the server has no duration for the build yet.
    pub async fn fetch_build_duration(&self, build_url: &str) -> Result<Option<u64>> {
        let build: BuildDuration = self.get_json(&api_json(build_url)).await?;
        Ok(build.duration)
    }

    /// Toggle the keep-forever flag on a build.
    ///
    /// The endpoint returns no structured confirmation; success means the
    /// request was dispatched and answered with a 2xx status.
    pub async fn toggle_log_keep(&self, build_url: &str) -> Result<()> {
        let url = join_endpoint(build_url, "toggleLogKeep");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(JenLensError::Api {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(JenLensError::Api {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

/// Join an endpoint onto a resource URL, tolerating a missing trailing slash.
fn join_endpoint(resource_url: &str, endpoint: &str) -> String {
    if resource_url.ends_with('/') {
        format!("{resource_url}{endpoint}")
    } else {
        format!("{resource_url}/{endpoint}")
    }
}

fn api_json(resource_url: &str) -> String {
    join_endpoint(resource_url, "api/json")
}

fn api_json_pretty(resource_url: &str) -> String {
    format!("{}?pretty=true", api_json(resource_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_json_respects_trailing_slash() {
        assert_eq!(
            api_json("http://ci/job/a/12/"),
            "http://ci/job/a/12/api/json"
        );
        assert_eq!(api_json("http://ci/job/a/12"), "http://ci/job/a/12/api/json");
    }

    #[test]
    fn test_api_json_pretty_appends_query() {
        assert_eq!(
            api_json_pretty("http://ci/job/a/"),
            "http://ci/job/a/api/json?pretty=true"
        );
    }

    #[test]
    fn test_join_endpoint_toggle() {
        assert_eq!(
            join_endpoint("http://ci/job/a/12/", "toggleLogKeep"),
            "http://ci/job/a/12/toggleLogKeep"
        );
    }
}
