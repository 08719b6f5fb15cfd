use crate::github::aggregate::ActionsSource;
use crate::github::client::GithubClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct App {
    pub actions: Arc<dyn ActionsSource>,
}

impl App {
    pub fn new(github: GithubClient) -> Self {
        Self::with_source(Arc::new(github))
    }

    pub fn with_source(actions: Arc<dyn ActionsSource>) -> Self {
        Self { actions }
    }
}
