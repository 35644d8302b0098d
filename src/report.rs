use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Duration of one successful build, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationSample {
    pub number: u64,
    pub duration: f64,
}

/// Per-job report: duration samples for the most recent successful builds,
/// newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub name: String,
    pub data: Vec<DurationSample>,
    /// URLs of the selected builds, carried for retention marking and left
    /// out of serialized output.
    #[serde(skip)]
    pub build_urls: Vec<String>,
}

/// Build URLs grouped by job name, in report order.
pub type RetentionBatch = IndexMap<String, Vec<String>>;

/// Assemble the retention batch from an existing report, so marking reuses
/// the same selection instead of re-fetching it.
pub fn retention_batch(reports: &[JobReport]) -> RetentionBatch {
    reports
        .iter()
        .filter(|report| !report.build_urls.is_empty())
        .map(|report| (report.name.clone(), report.build_urls.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, urls: &[&str]) -> JobReport {
        JobReport {
            name: name.to_string(),
            data: vec![],
            build_urls: urls.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_retention_batch_groups_by_job_in_report_order() {
        let reports = vec![
            report("JobA", &["http://ci/job/a/3/", "http://ci/job/a/1/"]),
            report("JobB", &[]),
            report("JobC", &["http://ci/job/c/7/"]),
        ];

        let batch = retention_batch(&reports);

        assert_eq!(batch.len(), 2);
        let keys: Vec<&String> = batch.keys().collect();
        assert_eq!(keys, ["JobA", "JobC"]);
        assert_eq!(batch["JobA"].len(), 2);
        assert_eq!(batch["JobC"], vec!["http://ci/job/c/7/".to_string()]);
    }

    #[test]
    fn test_job_report_serializes_without_build_urls() {
        let report = JobReport {
            name: "JobA".to_string(),
            data: vec![DurationSample {
                number: 105,
                duration: 90.0,
            }],
            build_urls: vec!["http://ci/job/a/105/".to_string()],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "JobA",
                "data": [{"number": 105, "duration": 90.0}]
            })
        );
    }
}
