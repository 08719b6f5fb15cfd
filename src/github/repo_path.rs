use crate::error::*;
use crate::github::aggregate::RepoRef;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use snafu::{ResultExt, ensure};

/// The `{owner}/{repo}` segments of a dashboard URL, validated as GitHub
/// account and repository names before anything is sent upstream.
pub struct RepoPath(pub RepoRef);

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl<S> FromRequestParts<S> for RepoPath
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((owner, repo)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .context(InvalidPathSnafu)?;

        for segment in [&owner, &repo] {
            ensure!(valid_segment(segment), InvalidRepositorySnafu { segment });
        }

        Ok(RepoPath(RepoRef::new(owner, repo)))
    }
}
