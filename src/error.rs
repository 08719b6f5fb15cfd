use axum::extract::rejection::PathRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use octocrab::models::RunId;
use snafu::Snafu;
use tracing::warn;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    // Upstream
    #[snafu(display("Failed to look up repository {owner}/{repo}: {source}"))]
    RepositoryLookup {
        owner: String,
        repo: String,
        source: octocrab::Error,
    },
    #[snafu(display("Repository {owner}/{repo} has no default branch"))]
    MissingDefaultBranch { owner: String, repo: String },
    #[snafu(display("Failed to list workflow runs on {branch}: {source}"))]
    ListWorkflowRuns {
        branch: String,
        source: octocrab::Error,
    },
    #[snafu(display("Failed to list jobs for workflow run {run_id}: {source}"))]
    ListWorkflowJobs {
        run_id: RunId,
        source: octocrab::Error,
    },

    // Request
    #[snafu(display("Invalid path: {source}"))]
    InvalidPath { source: PathRejection },
    #[snafu(display("Repository path segment {segment:?} is invalid"))]
    InvalidRepository { segment: String },

    // Rendering
    #[snafu(display("Failed to render page"))]
    RenderFailed { source: std::fmt::Error },
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidPath { .. } | Error::InvalidRepository { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("{self}");

        let status = self.status();
        // Upstream and render details stay in the log.
        let body = if status.is_server_error() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            self.to_string()
        };

        (status, body).into_response()
    }
}
