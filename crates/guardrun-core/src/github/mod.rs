pub mod client;
pub mod comments;

pub use client::{GitHubApi, IssueComment, PullRequest, RestClient};
