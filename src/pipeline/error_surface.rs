use crate::error::{ExtractionFailure, PipelineError};
use crate::links::Provider;

/// Maps every pipeline failure to exactly one user-facing message.
#[derive(Debug, Clone)]
pub struct ErrorSurface {
    providers: String,
    required_channel: String,
}

impl ErrorSurface {
    pub fn new(providers: &[Provider], required_channel: impl Into<String>) -> Self {
        Self {
            providers: provider_list(providers),
            required_channel: required_channel.into(),
        }
    }

    #[must_use]
    pub fn render(&self, error: &PipelineError) -> String {
        match error {
            PipelineError::UnsupportedLink => {
                t!("errors.unsupported_link", providers = &self.providers).into_owned()
            }
            PipelineError::Unauthorized { .. } | PipelineError::MembershipLookup(_) => {
                t!("errors.unauthorized", channel = &self.required_channel).into_owned()
            }
            PipelineError::Extraction(failure) => Self::render_extraction(failure),
            PipelineError::Upload { path, message } => t!(
                "errors.upload",
                detail = message,
                path = path.display()
            )
            .into_owned(),
        }
    }

    fn render_extraction(failure: &ExtractionFailure) -> String {
        match failure {
            ExtractionFailure::InvalidLink => t!("errors.invalid_link").into_owned(),
            ExtractionFailure::PrivateContent => t!("errors.private_content").into_owned(),
            ExtractionFailure::FormatUnavailable => t!("errors.format_unavailable").into_owned(),
            ExtractionFailure::Network(detail) => t!("errors.network", detail = detail).into_owned(),
            ExtractionFailure::ToolUnavailable(_) => t!("errors.tool_unavailable").into_owned(),
            ExtractionFailure::MissingOutput(_)
            | ExtractionFailure::WorkerCrashed(_)
            | ExtractionFailure::Other(_) => {
                t!("errors.download_other", detail = failure).into_owned()
            }
        }
    }
}

pub(crate) fn provider_list(providers: &[Provider]) -> String {
    providers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
