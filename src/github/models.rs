//! The dashboard works directly on octocrab's workflow models; this module
//! only adds the few readings of them the aggregation and page need.

pub use octocrab::models::RunId;
pub use octocrab::models::workflows::{
    Conclusion, HeadCommit, Job as WorkflowJob, Run as WorkflowRun, Status,
};

pub const CONCLUSION_FAILURE: &str = "failure";

pub trait RunExt {
    fn is_failure(&self) -> bool;
}

impl RunExt for WorkflowRun {
    fn is_failure(&self) -> bool {
        self.conclusion.as_deref() == Some(CONCLUSION_FAILURE)
    }
}

pub fn conclusion_label(conclusion: &Conclusion) -> &'static str {
    match conclusion {
        Conclusion::Success => "success",
        Conclusion::Failure => "failure",
        Conclusion::Cancelled => "cancelled",
        Conclusion::Skipped => "skipped",
        Conclusion::TimedOut => "timed_out",
        Conclusion::Neutral => "neutral",
        Conclusion::ActionRequired => "action_required",
        _ => "unknown",
    }
}

pub fn status_label(status: &Status) -> &'static str {
    match status {
        Status::Pending => "pending",
        Status::Queued => "queued",
        Status::InProgress => "in_progress",
        Status::Completed => "completed",
        Status::Failed => "failed",
        _ => "unknown",
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn failure_is_exact_conclusion() {
        assert!(run(1, "c1", Some("failure"), "m", 1).is_failure());
        assert!(!run(2, "c1", Some("Failure"), "m", 1).is_failure());
        assert!(!run(3, "c1", Some("cancelled"), "m", 1).is_failure());
        assert!(!run(4, "c1", None, "m", 1).is_failure());
    }

    #[test]
    fn job_labels_follow_api_spelling() {
        let job = job(7, 2, "test", "timed_out");
        assert_eq!(job.conclusion.as_ref().map(conclusion_label), Some("timed_out"));
        assert_eq!(status_label(&job.status), "completed");
        assert_eq!(job.id, octocrab::models::JobId(7));
        assert_eq!(job.run_id, RunId(2));
    }
}
