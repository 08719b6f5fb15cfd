use crate::error::*;
use crate::github::aggregate::{Commit, RepoView};
use crate::github::models::{WorkflowJob, WorkflowRun, conclusion_label, status_label};
use crate::util::html::Escape;
use crate::util::time::elapsed;
use snafu::ResultExt;
use std::fmt::Write;

const STYLE: &str = r"
body { font-family: -apple-system, BlinkMacSystemFont, sans-serif; margin: 2rem auto; max-width: 60rem; color: #1f2328; }
h1 small { color: #59636e; font-weight: normal; }
section { border: 1px solid #d1d9e0; border-radius: 6px; margin-bottom: 1rem; padding: 0.5rem 1rem; }
.meta { color: #59636e; font-size: 0.9em; }
ul { list-style: none; padding-left: 0; }
li { margin: 0.25rem 0; }
.success { color: #1a7f37; }
.failure { color: #d1242f; }
.pending { color: #9a6700; }
.other { color: #59636e; }
";

/// Renders the repository page for one aggregated view.
pub fn repo_page(view: &RepoView) -> Result<String, Error> {
    let mut out = String::new();
    write_page(&mut out, view).context(RenderFailedSnafu)?;
    Ok(out)
}

fn write_page(out: &mut String, view: &RepoView) -> std::fmt::Result {
    let owner = Escape(&view.owner);
    let repo = Escape(&view.repo);

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{owner}/{repo} - workflow runs</title>")?;
    writeln!(out, "<style>{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(
        out,
        "<h1><a href=\"https://github.com/{owner}/{repo}\">{owner}/{repo}</a> <small>{}</small></h1>",
        Escape(&view.branch)
    )?;

    if view.is_empty() {
        writeln!(out, "<p>No workflow runs on this branch.</p>")?;
    }

    for commit in &view.commits {
        write_commit(out, view, commit)?;
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_commit(out: &mut String, view: &RepoView, commit: &Commit) -> std::fmt::Result {
    let short_sha = commit.sha.get(..7).unwrap_or(&commit.sha);
    let author = &commit.head_commit.author.name;

    writeln!(out, "<section>")?;
    writeln!(
        out,
        "<h2>{} <code><a href=\"https://github.com/{}/{}/commit/{}\">{}</a></code></h2>",
        Escape(&commit.title),
        Escape(&view.owner),
        Escape(&view.repo),
        Escape(&commit.sha),
        Escape(short_sha)
    )?;
    writeln!(
        out,
        "<p class=\"meta\">{} committed {}</p>",
        Escape(author),
        commit.head_commit.timestamp.format("%Y-%m-%d %H:%M UTC")
    )?;

    writeln!(out, "<ul>")?;
    for run in view.runs_for(&commit.sha) {
        write_run(out, run, view.jobs_for(run.id))?;
    }
    writeln!(out, "</ul>")?;
    writeln!(out, "</section>")
}

fn write_run(out: &mut String, run: &WorkflowRun, jobs: Option<&[WorkflowJob]>) -> std::fmt::Result {
    let (class, label) = state(run.conclusion.as_deref(), &run.status);

    write!(
        out,
        "<li><span class=\"{class}\">{}</span> <a href=\"{}\">{} #{}</a> <span class=\"meta\">{} in {}</span>",
        Escape(label),
        Escape(run.html_url.as_str()),
        Escape(&run.name),
        run.run_number,
        Escape(&run.event),
        elapsed(run.created_at, run.updated_at)
    )?;

    if let Some(jobs) = jobs {
        writeln!(out)?;
        writeln!(out, "<details open><summary>{} jobs</summary>", jobs.len())?;
        writeln!(out, "<ul>")?;
        for job in jobs {
            write_job(out, job)?;
        }
        writeln!(out, "</ul>")?;
        write!(out, "</details>")?;
    }

    writeln!(out, "</li>")
}

fn write_job(out: &mut String, job: &WorkflowJob) -> std::fmt::Result {
    let conclusion = job.conclusion.as_ref().map(conclusion_label);
    let (class, label) = state(conclusion, status_label(&job.status));

    write!(
        out,
        "<li><span class=\"{class}\">{}</span> <a href=\"{}\">{}</a>",
        Escape(label),
        Escape(job.html_url.as_str()),
        Escape(&job.name)
    )?;
    if let Some(end) = job.completed_at {
        write!(out, " <span class=\"meta\">{}</span>", elapsed(job.started_at, end))?;
    }
    writeln!(out, "</li>")
}

/// CSS class and label for a conclusion, falling back to the live status.
fn state<'a>(conclusion: Option<&'a str>, status: &'a str) -> (&'static str, &'a str) {
    match conclusion {
        Some("success") => ("success", "success"),
        Some("failure") => ("failure", "failure"),
        Some(other) => ("other", other),
        None => ("pending", status),
    }
}
