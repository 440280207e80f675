use super::types::{ExtractedMedia, ExtractionOptions};
use crate::error::ExtractionFailure;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Blocking media extraction: resolve a link and download it to disk.
///
/// Implementations may block for a long time and must only be called from
/// a worker thread (see [`DownloadDispatcher`](super::DownloadDispatcher)).
pub trait Extractor: Send + Sync {
    fn name(&self) -> &str;

    fn extract(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractedMedia, ExtractionFailure>;

    /// Report the extractor version, or why it cannot run.
    fn probe(&self) -> Result<String, ExtractionFailure>;
}

/// Extraction through the `yt-dlp` command line program.
pub struct YtDlpExtractor {
    binary: PathBuf,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub(crate) fn build_args(url: &str, options: &ExtractionOptions) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            options.format.clone(),
            "-o".to_string(),
            options.output_template(),
        ];
        if options.restrict_filenames {
            args.push("--restrict-filenames".into());
        }
        if options.no_playlist {
            args.push("--no-playlist".into());
        }
        args.extend([
            "--no-progress".to_string(),
            "--print".to_string(),
            "after_move:%(.{filepath,title})j".to_string(),
            "--".to_string(),
            url.to_string(),
        ]);
        args
    }

    /// Pick the JSON summary line out of yt-dlp's stdout.
    pub(crate) fn parse_summary(stdout: &str) -> Option<ExtractedMedia> {
        stdout
            .lines()
            .rev()
            .map(str::trim)
            .filter(|line| line.starts_with('{'))
            .find_map(|line| serde_json::from_str::<ExtractedMedia>(line).ok())
    }
}

impl Extractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    fn extract(
        &self,
        url: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractedMedia, ExtractionFailure> {
        let args = Self::build_args(url, options);
        tracing::debug!(binary = %self.binary.display(), ?args, "running extractor");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractionFailure::ToolUnavailable(format!("{}: {e}", self.binary.display()))
                } else {
                    ExtractionFailure::Other(format!("failed to start extractor: {e}"))
                }
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(ExtractionFailure::from_diagnostics(&stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_summary(&stdout).ok_or_else(|| {
            ExtractionFailure::MissingOutput("extractor printed no file path".into())
        })
    }

    fn probe(&self) -> Result<String, ExtractionFailure> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ExtractionFailure::ToolUnavailable(format!("{}: {e}", self.binary.display()))
            })?;
        if !output.status.success() {
            return Err(ExtractionFailure::ToolUnavailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
