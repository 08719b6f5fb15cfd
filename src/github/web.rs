use crate::app::App;
use crate::error::Error;
use crate::github::aggregate::RepoView;
use crate::github::repo_path::RepoPath;
use crate::view::render;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info};

pub fn router(app: App) -> Router {
    Router::new()
        .route("/{owner}/{repo}", get(handle_repo_page))
        .layer(middleware::from_fn(recover_panic))
        .layer(middleware::from_fn(log_request))
        .with_state(app)
}

pub async fn handle_repo_page(
    State(app): State<App>,
    RepoPath(repo): RepoPath,
) -> Result<Html<String>, Error> {
    let view = RepoView::collect(app.actions.as_ref(), repo).await?;

    Ok(Html(render::repo_page(&view)?))
}

/// Turns a panicking handler into a plain 500 instead of a dropped connection.
async fn recover_panic(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(_) => {
            error!("Handler panicked while serving {path}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency = ?started.elapsed(),
        "request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::aggregate::tests::FakeSource;
    use crate::github::client::tests::client_for;
    use crate::github::models::RunId;
    use crate::github::models::fixtures::{job, job_json, repository_json, run, run_json};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    async fn serve_router(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{address}")
    }

    async fn serve(app: App) -> String {
        serve_router(router(app)).await
    }

    #[tokio::test]
    async fn renders_repository_page() {
        let source = FakeSource {
            branch: Some("main".into()),
            runs: vec![
                run(1, "c1", Some("success"), "Add feature", 10),
                run(2, "c2", Some("failure"), "Fix bug\nDetails...", 20),
            ],
            jobs: HashMap::from([(RunId(2), vec![job(5, 2, "clippy", "failure")])]),
            ..Default::default()
        };
        let base = serve(App::with_source(Arc::new(source))).await;

        let response = reqwest::get(format!("{base}/octo/repo")).await.unwrap();

        assert_eq!(response.status(), 200);
        assert!(
            response.headers()["content-type"]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let body = response.text().await.unwrap();
        assert!(body.contains("Fix bug"));
        assert!(body.contains("clippy"));
    }

    #[tokio::test]
    async fn upstream_failure_is_a_server_error() {
        let base = serve(App::with_source(Arc::new(FakeSource::default()))).await;

        let response = reqwest::get(format!("{base}/octo/repo")).await.unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(response.text().await.unwrap(), "Internal Server Error");
    }

    #[tokio::test]
    async fn invalid_segment_is_rejected_before_upstream() {
        let base = serve(App::with_source(Arc::new(FakeSource::default()))).await;

        let response = reqwest::get(format!("{base}/octo/bad%20name")).await.unwrap();

        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let base = serve(App::with_source(Arc::new(FakeSource::default()))).await;

        let response = reqwest::get(format!("{base}/octo")).await.unwrap();

        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn talks_to_github_api() {
        let mut github = Server::new_async().await;
        github
            .mock("GET", "/repos/octo/repo")
            .with_header("content-type", "application/json")
            .with_body(repository_json(Some("main")).to_string())
            .create_async()
            .await;
        github
            .mock("GET", "/repos/octo/repo/actions/runs")
            .match_query(Matcher::UrlEncoded("branch".into(), "main".into()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total_count": 2,
                    "workflow_runs": [
                        run_json(21, "c1", Some("failure"), "Break the build", 10),
                        run_json(22, "c1", Some("success"), "Break the build", 10),
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let jobs = github
            .mock("GET", "/repos/octo/repo/actions/runs/21/jobs")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "total_count": 1,
                    "jobs": [job_json(301, 21, "unit tests", "failure")]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let base = serve(App::new(client_for(&github, None))).await;
        let body = reqwest::get(format!("{base}/octo/repo"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();

        assert_eq!(body.matches("<section>").count(), 1);
        assert!(body.contains(">unit tests</a> <span class=\"meta\">2m</span>"));
        jobs.assert_async().await;
    }

    #[tokio::test]
    async fn panicking_handler_becomes_server_error() {
        let router = Router::new()
            .route("/boom", get(|| async { panic!("handler bug") as () }))
            .layer(middleware::from_fn(recover_panic));
        let base = serve_router(router).await;

        let response = reqwest::get(format!("{base}/boom")).await.unwrap();

        assert_eq!(response.status(), 500);
    }
}
