//! GitHub contents API committer.
//!
//! An update must carry the blob sha of the version it replaces, so every
//! commit is a `GET` of the file immediately followed by a `PUT` with that
//! sha. A sha that went stale in between is rejected by GitHub with 409.

use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use filepush_core::Backend;

use crate::committer::{FileChange, RemoteCommitter};
use crate::error::RemoteError;
use crate::transport::{ApiRequest, Transport, UreqTransport};

/// Public GitHub API root.
pub const GITHUB_API: &str = "https://api.github.com";

/// Path prefix of the REST API on GitHub Enterprise Server hosts.
const ENTERPRISE_API_PATH: &str = "/api/v3";

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    sha: String,
}

/// Commits through `GET` / `PUT /repos/{owner}/{repo}/contents/{path}`.
pub struct GithubCommitter<T = UreqTransport> {
    base_url: String,
    auth_key: String,
    transport: T,
}

impl GithubCommitter<UreqTransport> {
    /// `endpoint` is an Enterprise host such as `https://git.example.com`;
    /// `None` targets github.com.
    pub fn new(endpoint: Option<&str>, auth_key: &str) -> Self {
        Self::with_transport(endpoint, auth_key, UreqTransport::new())
    }
}

impl<T: Transport> GithubCommitter<T> {
    pub fn with_transport(endpoint: Option<&str>, auth_key: &str, transport: T) -> Self {
        Self {
            base_url: base_url(endpoint),
            auth_key: auth_key.to_owned(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the sha of the current remote version of `remote_path`.
    ///
    /// A missing file is [`RemoteError::NotFound`]; files are never created.
    pub fn resolve_addressing(
        &self,
        owner: &str,
        repository: &str,
        remote_path: &str,
    ) -> Result<String, RemoteError> {
        let url = self.contents_url(owner, repository, remote_path);
        let response = self.transport.execute(self.authorized(ApiRequest::get(url)))?;
        let resource = resource_name(owner, repository, remote_path);
        if !response.is_success() {
            return Err(RemoteError::from_status(
                response.status,
                &response.body,
                resource,
            ));
        }
        let entry: ContentsEntry = response.json(&resource)?;
        tracing::debug!("{resource} is at {}", entry.sha);
        Ok(entry.sha)
    }

    /// Replace `remote_path` with `content`, committing with `message`.
    ///
    /// `sha` must be the version being replaced.
    pub fn update(
        &self,
        owner: &str,
        repository: &str,
        remote_path: &str,
        content: &str,
        message: &str,
        sha: &str,
    ) -> Result<bool, RemoteError> {
        let url = self.contents_url(owner, repository, remote_path);
        let body = json!({
            "message": message,
            "content": base64::engine::general_purpose::STANDARD.encode(content),
            "sha": sha,
        });
        let response = self
            .transport
            .execute(self.authorized(ApiRequest::put(url, body)))?;
        if !response.is_success() {
            return Err(RemoteError::from_status(
                response.status,
                &response.body,
                resource_name(owner, repository, remote_path),
            ));
        }
        Ok(true)
    }

    fn contents_url(&self, owner: &str, repository: &str, remote_path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(repository),
            encode_path(remote_path),
        )
    }

    fn authorized(&self, request: ApiRequest) -> ApiRequest {
        request
            .header("Authorization", format!("token {}", self.auth_key))
            .header("Accept", "application/vnd.github+json")
    }
}

impl<T: Transport> RemoteCommitter for GithubCommitter<T> {
    fn backend(&self) -> Backend {
        Backend::Github
    }

    fn commit(&self, change: &FileChange<'_>) -> Result<bool, RemoteError> {
        let sha = self.resolve_addressing(change.owner, change.repository, change.remote_path)?;
        let done = self.update(
            change.owner,
            change.repository,
            change.remote_path,
            change.content,
            change.message,
            &sha,
        )?;
        tracing::info!(
            "committed {}/{}:{} to github",
            change.owner,
            change.repository,
            change.remote_path
        );
        Ok(done)
    }
}

fn base_url(endpoint: Option<&str>) -> String {
    match endpoint.map(|e| e.trim().trim_end_matches('/')) {
        None | Some("") => GITHUB_API.to_owned(),
        Some(host) if host.ends_with(ENTERPRISE_API_PATH) => host.to_owned(),
        Some(host) => format!("{host}{ENTERPRISE_API_PATH}"),
    }
}

/// Percent-encode each segment, keeping `/` separators.
fn encode_path(remote_path: &str) -> String {
    remote_path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn resource_name(owner: &str, repository: &str, remote_path: &str) -> String {
    format!("{owner}/{repository}:{remote_path}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeTransport;
    use crate::transport::Method;
    use rstest::rstest;

    fn committer(transport: FakeTransport) -> GithubCommitter<FakeTransport> {
        GithubCommitter::with_transport(None, "fde2f173db", transport)
    }

    fn change<'a>(content: &'a str, message: &'a str) -> FileChange<'a> {
        FileChange {
            owner: "acme",
            repository: "widgets",
            remote_path: "README.md",
            content,
            message,
        }
    }

    #[rstest]
    #[case(None, "https://api.github.com")]
    #[case(Some(""), "https://api.github.com")]
    #[case(Some("https://git.example.com"), "https://git.example.com/api/v3")]
    #[case(Some("https://git.example.com/"), "https://git.example.com/api/v3")]
    #[case(Some("https://git.example.com/api/v3/"), "https://git.example.com/api/v3")]
    fn base_url_cases(#[case] endpoint: Option<&str>, #[case] expected: &str) {
        assert_eq!(base_url(endpoint), expected);
    }

    #[test]
    fn path_segments_are_encoded_but_slashes_kept() {
        assert_eq!(encode_path("/docs/my notes/ä.md"), "docs/my%20notes/%C3%A4.md");
    }

    #[test]
    fn commit_uses_sha_from_preceding_get() {
        let transport = FakeTransport::new()
            .respond(200, json!({"type": "file", "sha": "3d21ec53", "content": "b2xk"}))
            .respond(200, json!({"commit": {"sha": "7638417d"}}));
        let github = committer(transport);

        let done = github.commit(&change("new", "fix typo")).expect("commit");
        assert!(done);

        let requests = github.transport.requests();
        assert_eq!(requests.len(), 2);

        let get = &requests[0];
        assert_eq!(get.method, Method::Get);
        assert_eq!(
            get.url,
            "https://api.github.com/repos/acme/widgets/contents/README.md"
        );
        assert_eq!(get.header_value("authorization"), Some("token fde2f173db"));

        let put = &requests[1];
        assert_eq!(put.method, Method::Put);
        assert_eq!(put.url, get.url);
        assert_eq!(
            put.body,
            Some(json!({"message": "fix typo", "content": "bmV3", "sha": "3d21ec53"}))
        );
    }

    #[test]
    fn stale_sha_is_conflict() {
        let transport = FakeTransport::new()
            .respond(200, json!({"sha": "3d21ec53"}))
            .respond(409, json!({"message": "README.md does not match 3d21ec53"}));
        let github = committer(transport);

        let err = github.commit(&change("new", "fix typo")).unwrap_err();
        assert!(matches!(err, RemoteError::Conflict { .. }), "got: {err}");
        assert!(err.to_string().contains("acme/widgets:README.md"));
    }

    #[test]
    fn update_with_stale_sha_is_conflict() {
        let transport = FakeTransport::new()
            .respond(409, json!({"message": "README.md does not match 0000000"}));
        let github = committer(transport);

        let err = github
            .update("acme", "widgets", "README.md", "new", "msg", "0000000")
            .unwrap_err();
        assert!(matches!(err, RemoteError::Conflict { .. }), "got: {err}");
    }

    #[test]
    fn missing_remote_file_is_not_found_and_skips_update() {
        let transport = FakeTransport::new().respond(404, json!({"message": "Not Found"}));
        let github = committer(transport);

        let err = github.commit(&change("new", "msg")).unwrap_err();
        assert!(matches!(err, RemoteError::NotFound { .. }), "got: {err}");
        assert_eq!(github.transport.requests().len(), 1, "no PUT after a failed GET");
    }

    #[test]
    fn directory_listing_is_decode_error() {
        let transport = FakeTransport::new().respond(200, json!([{"sha": "a"}, {"sha": "b"}]));
        let github = committer(transport);

        let err = github
            .resolve_addressing("acme", "widgets", "docs")
            .unwrap_err();
        assert!(matches!(err, RemoteError::Decode { .. }), "got: {err}");
    }

    #[test]
    fn auth_failure_is_reported_verbatim() {
        let transport = FakeTransport::new().respond(401, json!({"message": "Bad credentials"}));
        let github = committer(transport);

        match github.resolve_addressing("acme", "widgets", "README.md") {
            Err(RemoteError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Bad credentials");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn enterprise_host_is_used_for_requests() {
        let transport = FakeTransport::new()
            .respond(200, json!({"sha": "abc"}))
            .respond(201, json!({}));
        let github =
            GithubCommitter::with_transport(Some("https://git.example.com"), "k", transport);

        github.commit(&change("x", "y")).expect("commit");
        assert!(github
            .transport
            .requests()
            .iter()
            .all(|r| r.url.starts_with("https://git.example.com/api/v3/repos/acme/widgets/")));
    }
}
