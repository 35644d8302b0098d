use serde::{Deserialize, Serialize};

/// One child job of the configured project, as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRef {
    /// Job name
    pub name: String,
    /// Absolute URL of the job on the server
    pub url: String,
}

/// Response from the project root endpoint.
#[derive(Debug, Deserialize)]
pub struct ProjectResponse {
    /// Child jobs; `None` when the server response has no jobs list
    pub jobs: Option<Vec<JobRef>>,
}

/// One entry of a job's build history.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildRef {
    pub number: u64,
    pub url: String,
}

/// Response from a job endpoint.
#[derive(Debug, Deserialize)]
pub struct JobResponse {
    #[serde(default)]
    pub builds: Vec<BuildRef>,
}

/// Snapshot of a single build, fetched per call and never cached across runs.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildDetail {
    pub number: u64,
    pub url: String,
    /// `None` while the build is still running
    #[serde(default)]
    pub result: Option<BuildResult>,
    /// Wall-clock duration in milliseconds
    #[serde(default)]
    pub duration: Option<u64>,
}

impl BuildDetail {
    pub fn is_success(&self) -> bool {
        self.result == Some(BuildResult::Success)
    }
}

/// Terminal state of a completed build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    /// Catch-all so new server-side values never break deserialization
    #[serde(other)]
    Unknown,
}

/// Slim projection of a build endpoint response, used for duration sampling.
#[derive(Debug, Deserialize)]
pub struct BuildDuration {
    #[serde(default)]
    pub duration: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_result_deserializes_jenkins_values() {
        let detail: BuildDetail = serde_json::from_str(
            r#"{"number": 12, "url": "http://ci/job/a/12/", "result": "SUCCESS", "duration": 1000}"#,
        )
        .unwrap();
        assert_eq!(detail.result, Some(BuildResult::Success));
        assert!(detail.is_success());

        let detail: BuildDetail = serde_json::from_str(
            r#"{"number": 13, "url": "http://ci/job/a/13/", "result": "NOT_BUILT"}"#,
        )
        .unwrap();
        assert_eq!(detail.result, Some(BuildResult::NotBuilt));
        assert!(!detail.is_success());
    }

    #[test]
    fn test_in_progress_build_has_no_result() {
        let detail: BuildDetail = serde_json::from_str(
            r#"{"number": 14, "url": "http://ci/job/a/14/", "result": null, "duration": 0}"#,
        )
        .unwrap();
        assert_eq!(detail.result, None);
        assert!(!detail.is_success());
    }

    #[test]
    fn test_unknown_result_maps_to_catch_all() {
        let detail: BuildDetail = serde_json::from_str(
            r#"{"number": 15, "url": "http://ci/job/a/15/", "result": "REGRESSION"}"#,
        )
        .unwrap();
        assert_eq!(detail.result, Some(BuildResult::Unknown));
        assert!(!detail.is_success());
    }

    #[test]
    fn test_job_response_defaults_missing_builds() {
        let job: JobResponse = serde_json::from_str(r#"{"name": "JobB"}"#).unwrap();
        assert!(job.builds.is_empty());
    }

    #[test]
    fn test_project_response_without_jobs() {
        let project: ProjectResponse = serde_json::from_str(r#"{"name": "Widgets"}"#).unwrap();
        assert!(project.jobs.is_none());
    }
}
