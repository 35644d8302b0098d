use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::path::PathBuf;

use crate::config::{Config, OutputFormat};
use crate::output::{self, PhaseProgress};
use crate::providers::jenkins::provider::JenkinsProvider;
use crate::report::{retention_batch, JobReport};

#[derive(Parser)]
#[command(name = "jenlens")]
#[command(author, version, about = "Jenkins Build Duration Insights", long_about = None)]
pub struct Cli {
    /// Jenkins base URL, e.g. 'https://ci.example.com/'
    #[arg(short, long, env = "JENKINS_URL")]
    url: Option<String>,

    /// Suite job whose child jobs are reported on
    #[arg(short, long)]
    suite: Option<String>,

    /// Project job nested under the suite
    #[arg(short = 'P', long)]
    project: Option<String>,

    /// Successful builds to collect per job
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Keep every collected build forever (dispatches toggleLogKeep)
    #[arg(long, default_value_t = false)]
    mark_forever: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);

        let settings = config.jenkins.resolve()?;
        info!(
            "Collecting build durations for {}/{}",
            settings.suite, settings.project
        );

        let provider = JenkinsProvider::new(&settings)?;

        let progress = PhaseProgress::start_phase_1();
        let jobs = provider.list_jobs().await;
        let progress = progress.finish_phase_1_start_phase_2();
        let reports = provider.collect_reports(&jobs).await;
        let progress = progress.finish_phase_2_start_phase_3();
        let batch = settings.mark_forever.then(|| retention_batch(&reports));
        progress.finish_phase_3();

        self.render(
            &settings.project,
            settings.success_count,
            &reports,
            config.output.format,
            config.output.pretty,
        )?;

        if let Some(batch) = batch {
            provider.mark_builds_forever(&batch).await;
        }

        Ok(())
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.jenkins.base_url = Some(url.clone());
        }
        if let Some(suite) = &self.suite {
            config.jenkins.suite = suite.clone();
        }
        if let Some(project) = &self.project {
            config.jenkins.project = project.clone();
        }
        if let Some(count) = self.count {
            config.jenkins.success_count = count;
        }
        if self.mark_forever {
            config.jenkins.mark_forever = true;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.pretty {
            config.output.pretty = true;
        }
    }

    fn render(
        &self,
        project: &str,
        requested: usize,
        reports: &[JobReport],
        format: OutputFormat,
        pretty: bool,
    ) -> Result<()> {
        if format == OutputFormat::Summary {
            output::print_summary(project, requested, reports);
            return Ok(());
        }

        if let Some(path) = &self.output {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            output::export_report(reports, format, pretty, &mut file)?;
            info!("Report written to: {}", path.display());
        } else {
            let stdout = std::io::stdout();
            output::export_report(reports, format, pretty, &mut stdout.lock())?;
        }

        Ok(())
    }
}
