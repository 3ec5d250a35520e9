use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::USER_AGENT;
use crate::config::Repository;
use crate::error::ActionError;
use crate::report::check_run::CheckRunPayload;

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: Option<String>,
}

/// The slice of the GitHub REST API this action talks to.
///
/// Calls are blocking and issued one at a time.
pub trait GitHubApi {
    fn pulls_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>, ActionError>;
    fn list_comments(&self, pr: u64) -> Result<Vec<IssueComment>, ActionError>;
    fn create_comment(&self, pr: u64, body: &str) -> Result<IssueComment, ActionError>;
    fn update_comment(&self, comment_id: u64, body: &str) -> Result<IssueComment, ActionError>;
    fn create_check_run(
        &self,
        name: &str,
        head_sha: &str,
        payload: &CheckRunPayload,
    ) -> Result<u64, ActionError>;
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct CreateCheckRun<'a> {
    name: &'a str,
    head_sha: &'a str,
    status: &'static str,
    #[serde(flatten)]
    payload: &'a CheckRunPayload,
}

#[derive(Deserialize)]
struct CheckRunCreated {
    id: u64,
}

/// Blocking REST client scoped to one repository.
pub struct RestClient {
    http: Client,
    api_url: String,
    repo: Repository,
}

impl RestClient {
    pub fn new(api_url: &str, repo: Repository, token: &str) -> Result<Self, ActionError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ActionError::Config("token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ActionError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            repo,
        })
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repo.owner, self.repo.name, tail
        )
    }

    fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, ActionError> {
        let response = request
            .send()
            .map_err(|e| ActionError::api(operation, e))?;
        let response = check_status(operation, response)?;
        response
            .json::<T>()
            .map_err(|e| ActionError::api(operation, format!("unexpected response body: {e}")))
    }
}

fn check_status(operation: &str, response: Response) -> Result<Response, ActionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(ActionError::api(
        operation,
        format!("HTTP {status}: {}", body.trim()),
    ))
}

impl GitHubApi for RestClient {
    fn pulls_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>, ActionError> {
        let url = self.repo_url(&format!("commits/{sha}/pulls"));
        debug!(%url, "listing pull requests for commit");
        self.send("list pull requests", self.http.get(url))
    }

    fn list_comments(&self, pr: u64) -> Result<Vec<IssueComment>, ActionError> {
        let url = self.repo_url(&format!("issues/{pr}/comments"));
        let mut comments = Vec::new();
        for page in 1.. {
            debug!(%url, page, "listing comments");
            let batch: Vec<IssueComment> = self.send(
                "list comments",
                self.http
                    .get(&url)
                    .query(&[("per_page", PER_PAGE), ("page", page)]),
            )?;
            let last = batch.len() < PER_PAGE;
            comments.extend(batch);
            if last {
                break;
            }
        }
        Ok(comments)
    }

    fn create_comment(&self, pr: u64, body: &str) -> Result<IssueComment, ActionError> {
        let url = self.repo_url(&format!("issues/{pr}/comments"));
        self.send(
            "create comment",
            self.http.post(url).json(&CommentBody { body }),
        )
    }

    fn update_comment(&self, comment_id: u64, body: &str) -> Result<IssueComment, ActionError> {
        let url = self.repo_url(&format!("issues/comments/{comment_id}"));
        self.send(
            "update comment",
            self.http.patch(url).json(&CommentBody { body }),
        )
    }

    fn create_check_run(
        &self,
        name: &str,
        head_sha: &str,
        payload: &CheckRunPayload,
    ) -> Result<u64, ActionError> {
        let request = CreateCheckRun {
            name,
            head_sha,
            status: "completed",
            payload,
        };
        let created: CheckRunCreated = self.send(
            "create check run",
            self.http.post(self.repo_url("check-runs")).json(&request),
        )?;
        Ok(created.id)
    }
}
