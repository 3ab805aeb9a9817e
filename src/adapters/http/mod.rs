//! JSON-over-HTTP routes for submitting and inspecting jobs.

use crate::application::jobs::JobService;
use crate::domain::jobs::{Job, JobId};
use crate::ports::queue::JobQueuePort;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub ok: bool,
    pub error: String,
    pub id: JobId,
}

pub fn router<Q>(service: Arc<JobService<Q>>) -> Router
where
    Q: JobQueuePort + 'static,
{
    Router::new()
        .route("/jobs", get(list_jobs::<Q>).post(submit_job::<Q>))
        .route("/jobs/:id", get(get_job::<Q>).delete(delete_job::<Q>))
        .with_state(service)
}

async fn list_jobs<Q: JobQueuePort + 'static>(
    State(service): State<Arc<JobService<Q>>>,
) -> Json<BTreeMap<JobId, Job>> {
    Json(service.list())
}

// unknown or unparsable ids answer with an empty record
async fn get_job<Q: JobQueuePort + 'static>(
    State(service): State<Arc<JobService<Q>>>,
    Path(id): Path<String>,
) -> Json<Job> {
    let job = id
        .parse::<JobId>()
        .ok()
        .and_then(|id| service.get(id))
        .unwrap_or_default();
    Json(job)
}

async fn submit_job<Q: JobQueuePort + 'static>(
    State(service): State<Arc<JobService<Q>>>,
    Form(form): Form<SubmitForm>,
) -> Json<SubmitResult> {
    let result = match service.submit(&form.link, &form.name).await {
        Ok(id) => SubmitResult {
            ok: true,
            id,
            ..Default::default()
        },
        Err(e) => SubmitResult {
            error: e.to_string(),
            ..Default::default()
        },
    };
    Json(result)
}

async fn delete_job<Q: JobQueuePort + 'static>(
    State(service): State<Arc<JobService<Q>>>,
    Path(id): Path<String>,
) -> StatusCode {
    if let Ok(id) = id.parse::<JobId>() {
        service.delete(id);
    }
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local::ChannelQueue;
    use crate::application::store::JobStore;
    use crate::domain::jobs::JobStatus;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    fn app() -> (Router, Arc<JobService<ChannelQueue>>) {
        let service = Arc::new(JobService::new(
            Arc::new(JobStore::new()),
            ChannelQueue::new(8),
        ));
        (router(service.clone()), service)
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, bytes::Bytes) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    async fn call_json<T: DeserializeOwned>(app: &Router, request: Request<Body>) -> T {
        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).unwrap()
    }

    fn submit(form: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/jobs")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap()
    }

    fn fetch(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_then_get() {
        let (app, _service) = app();

        let result: SubmitResult =
            call_json(&app, submit("link=https%3A%2F%2Fhost%2Fa.mp4&name=My+clip")).await;
        assert_eq!(
            result,
            SubmitResult {
                ok: true,
                error: String::new(),
                id: 1
            }
        );

        let job: Job = call_json(&app, fetch(Method::GET, "/jobs/1")).await;
        assert_eq!(job.id, 1);
        assert_eq!(job.link, "https://host/a.mp4");
        assert_eq!(job.name, "My clip");
        assert_eq!(job.status, JobStatus::Queued);
    }

    #[tokio::test]
    async fn test_submit_empty_link() {
        let (app, service) = app();

        let result: SubmitResult = call_json(&app, submit("link=&name=nothing")).await;

        assert!(!result.ok);
        assert_eq!(result.error, "link must not be empty");
        assert!(service.list().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_keyed_by_id() {
        let (app, service) = app();
        service.submit("https://host/a.mp4", "a").await.unwrap();
        service.submit("https://host/b.mp4", "b").await.unwrap();

        let (status, body) = call(&app, fetch(Method::GET, "/jobs")).await;
        assert_eq!(status, StatusCode::OK);

        let listed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed["1"]["name"], "a");
        assert_eq!(listed["2"]["status"], "queued");
        assert_eq!(listed["2"]["filesize"], "");
    }

    #[tokio::test]
    async fn test_unknown_job_is_an_empty_record() {
        let (app, _service) = app();

        let missing: Job = call_json(&app, fetch(Method::GET, "/jobs/42")).await;
        assert_eq!(missing, Job::default());

        let garbage: Job = call_json(&app, fetch(Method::GET, "/jobs/abc")).await;
        assert_eq!(garbage, Job::default());
    }

    #[tokio::test]
    async fn test_delete() {
        let (app, service) = app();
        let id = service.submit("https://host/a.mp4", "a").await.unwrap();

        let (status, _) = call(&app, fetch(Method::DELETE, &format!("/jobs/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(service.get(id).is_none());

        let (status, _) = call(&app, fetch(Method::DELETE, "/jobs/nope")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
