use crate::config::app_config::Config;
use crate::error::*;
use crate::github::aggregate::{ActionsSource, RepoRef};
use crate::github::models::{RunId, WorkflowJob, WorkflowRun};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use snafu::{OptionExt, ResultExt};

/// GitHub REST access shared by every request.
pub struct GithubClient {
    octocrab: Octocrab,
}

impl GithubClient {
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Builds the client once at startup. Without a token requests go out
    /// unauthenticated and are subject to the anonymous rate limit.
    ///
    /// Upstream failures surface on the first attempt, so octocrab's retry
    /// layer is switched off.
    pub fn from_config(config: &Config) -> octocrab::Result<Self> {
        let mut builder = Octocrab::builder().add_retry_config(RetryConfig::None);

        if let Some(url) = &config.github_api_url {
            builder = builder.base_uri(url.as_str())?;
        }

        if let Some(token) = &config.github_token {
            builder = builder.personal_token(token.clone());
        }

        Ok(Self::new(builder.build()?))
    }
}

#[async_trait]
impl ActionsSource for GithubClient {
    async fn default_branch(&self, repo: &RepoRef) -> Result<String, Error> {
        let repository = self
            .octocrab
            .repos(&repo.owner, &repo.name)
            .get()
            .await
            .context(RepositoryLookupSnafu {
                owner: &repo.owner,
                repo: &repo.name,
            })?;

        repository.default_branch.context(MissingDefaultBranchSnafu {
            owner: &repo.owner,
            repo: &repo.name,
        })
    }

    async fn list_workflow_runs(
        &self,
        repo: &RepoRef,
        branch: &str,
        per_page: u8,
    ) -> Result<Vec<WorkflowRun>, Error> {
        let page = self
            .octocrab
            .workflows(&repo.owner, &repo.name)
            .list_all_runs()
            .branch(branch)
            .per_page(per_page)
            .send()
            .await
            .context(ListWorkflowRunsSnafu { branch })?;

        Ok(page.items)
    }

    async fn list_workflow_jobs(
        &self,
        repo: &RepoRef,
        run_id: RunId,
    ) -> Result<Vec<WorkflowJob>, Error> {
        let page = self
            .octocrab
            .workflows(&repo.owner, &repo.name)
            .list_jobs(run_id)
            .send()
            .await
            .context(ListWorkflowJobsSnafu { run_id })?;

        Ok(page.items)
    }
}
