use crate::error::Error;
use crate::github::models::{HeadCommit, RunExt, RunId, WorkflowJob, WorkflowRun};
use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::debug;

/// Number of most recent runs summarised per page view.
pub const RUNS_PER_PAGE: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

/// The three upstream reads the dashboard needs.
#[async_trait]
pub trait ActionsSource: Send + Sync {
    async fn default_branch(&self, repo: &RepoRef) -> Result<String, Error>;

    async fn list_workflow_runs(
        &self,
        repo: &RepoRef,
        branch: &str,
        per_page: u8,
    ) -> Result<Vec<WorkflowRun>, Error>;

    async fn list_workflow_jobs(
        &self,
        repo: &RepoRef,
        run_id: RunId,
    ) -> Result<Vec<WorkflowJob>, Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub sha: String,
    pub title: String,
    pub head_commit: HeadCommit,
}

impl Commit {
    fn from_run(run: &WorkflowRun) -> Self {
        Self {
            sha: run.head_sha.clone(),
            title: commit_title(&run.head_commit.message).to_string(),
            head_commit: run.head_commit.clone(),
        }
    }
}

/// Everything the repository page renders. Built once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoView {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Distinct head commits, newest author timestamp first.
    pub commits: Vec<Commit>,
    /// Runs per head SHA, in the order the API returned them.
    pub commit_to_runs: IndexMap<String, Vec<WorkflowRun>>,
    /// Jobs of every run concluded as `failure`, keyed by run id.
    pub failed_run_to_jobs: IndexMap<RunId, Vec<WorkflowJob>>,
}

impl RepoView {
    pub async fn collect<S>(source: &S, repo: RepoRef) -> Result<Self, Error>
    where
        S: ActionsSource + ?Sized,
    {
        let branch = source.default_branch(&repo).await?;
        let runs = source
            .list_workflow_runs(&repo, &branch, RUNS_PER_PAGE)
            .await?;

        debug!(
            "Collected {} runs for {}/{} on {branch}",
            runs.len(),
            repo.owner,
            repo.name
        );

        let mut commits = Vec::new();
        let mut commit_to_runs: IndexMap<String, Vec<WorkflowRun>> = IndexMap::new();
        let mut failed_run_to_jobs: IndexMap<RunId, Vec<WorkflowJob>> = IndexMap::new();

        for run in runs {
            if run.is_failure() {
                let jobs = source.list_workflow_jobs(&repo, run.id).await?;
                failed_run_to_jobs.entry(run.id).or_default().extend(jobs);
            }

            if !commit_to_runs.contains_key(&run.head_sha) {
                commits.push(Commit::from_run(&run));
            }
            commit_to_runs
                .entry(run.head_sha.clone())
                .or_default()
                .push(run);
        }

        // Stable, so commits sharing a timestamp keep their first-seen order.
        commits.sort_by(|a, b| b.head_commit.timestamp.cmp(&a.head_commit.timestamp));

        Ok(Self {
            owner: repo.owner,
            repo: repo.name,
            branch,
            commits,
            commit_to_runs,
            failed_run_to_jobs,
        })
    }

    pub fn runs_for(&self, sha: &str) -> &[WorkflowRun] {
        self.commit_to_runs
            .get(sha)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn jobs_for(&self, run_id: RunId) -> Option<&[WorkflowJob]> {
        self.failed_run_to_jobs.get(&run_id).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Text before the first line break of a commit message.
pub fn commit_title(message: &str) -> &str {
    message.split('\n').next().unwrap_or_default()
}
