//! GitLab repository files API committer.
//!
//! GitLab addresses files by numeric project id, so a commit first walks the
//! projects visible to the token looking for `owner/repository`, then updates
//! the file on [`DEFAULT_BRANCH`].

use serde::Deserialize;
use serde_json::json;

use filepush_core::Backend;

use crate::committer::{FileChange, RemoteCommitter};
use crate::error::RemoteError;
use crate::transport::{ApiRequest, Transport, UreqTransport};

/// Public GitLab API root.
pub const GITLAB_API: &str = "https://gitlab.com/api/v4";

/// Branch every update is committed to.
pub const DEFAULT_BRANCH: &str = "master";

const PROJECTS_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
struct ProjectEntry {
    id: u64,
    path_with_namespace: String,
}

/// Commits through `GET /projects` and `PUT /projects/{id}/repository/files/{path}`.
pub struct GitlabCommitter<T = UreqTransport> {
    base_url: String,
    auth_key: String,
    transport: T,
}

impl GitlabCommitter<UreqTransport> {
    /// `endpoint` is the full API root of a self-hosted instance, e.g.
    /// `http://mygitlab.com/api/v4/`; `None` targets gitlab.com.
    pub fn new(endpoint: Option<&str>, auth_key: &str) -> Self {
        Self::with_transport(endpoint, auth_key, UreqTransport::new())
    }
}

impl<T: Transport> GitlabCommitter<T> {
    pub fn with_transport(endpoint: Option<&str>, auth_key: &str, transport: T) -> Self {
        let base_url = match endpoint.map(|e| e.trim().trim_end_matches('/')) {
            None | Some("") => GITLAB_API.to_owned(),
            Some(root) => root.to_owned(),
        };
        Self {
            base_url,
            auth_key: auth_key.to_owned(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Find the id of the project whose `path_with_namespace` is
    /// `owner/repository`.
    ///
    /// Pages through the projects the token is a member of, in list order,
    /// and takes the first match. Paging stops when `X-Next-Page` is empty or
    /// does not advance. No match is [`RemoteError::NotFound`] naming the
    /// repository.
    pub fn resolve_addressing(&self, owner: &str, repository: &str) -> Result<u64, RemoteError> {
        let wanted = format!("{owner}/{repository}");
        let mut page: u32 = 1;
        loop {
            let url = format!(
                "{}/projects?membership=true&per_page={PROJECTS_PER_PAGE}&page={page}",
                self.base_url
            );
            let response = self.transport.execute(self.authorized(ApiRequest::get(url)))?;
            if !response.is_success() {
                return Err(RemoteError::from_status(
                    response.status,
                    &response.body,
                    format!("projects page {page}"),
                ));
            }

            let projects: Vec<ProjectEntry> = response.json("GET /projects")?;
            if let Some(project) = projects.iter().find(|p| p.path_with_namespace == wanted) {
                tracing::debug!("{wanted} is project {}", project.id);
                return Ok(project.id);
            }

            let next = response
                .header("x-next-page")
                .and_then(|v| v.trim().parse::<u32>().ok());
            match next {
                Some(next) if next > page && !projects.is_empty() => page = next,
                _ => break,
            }
        }

        Err(RemoteError::NotFound {
            resource: format!("repository {repository}"),
        })
    }

    /// Replace `remote_path` in project `project_id` on `branch`.
    pub fn update_file(
        &self,
        project_id: u64,
        remote_path: &str,
        content: &str,
        branch: &str,
        message: &str,
    ) -> Result<bool, RemoteError> {
        let path = remote_path.trim_start_matches('/');
        let url = format!(
            "{}/projects/{project_id}/repository/files/{}",
            self.base_url,
            urlencoding::encode(path),
        );
        let body = json!({
            "branch": branch,
            "content": content,
            "commit_message": message,
        });
        let response = self
            .transport
            .execute(self.authorized(ApiRequest::put(url, body)))?;
        if !response.is_success() {
            return Err(RemoteError::from_status(
                response.status,
                &response.body,
                format!("project {project_id}:{path}"),
            ));
        }
        Ok(true)
    }

    fn authorized(&self, request: ApiRequest) -> ApiRequest {
        request.header("PRIVATE-TOKEN", self.auth_key.as_str())
    }
}

impl<T: Transport> RemoteCommitter for GitlabCommitter<T> {
    fn backend(&self) -> Backend {
        Backend::Gitlab
    }

    fn commit(&self, change: &FileChange<'_>) -> Result<bool, RemoteError> {
        let project_id = self.resolve_addressing(change.owner, change.repository)?;
        let done = self.update_file(
            project_id,
            change.remote_path,
            change.content,
            DEFAULT_BRANCH,
            change.message,
        )?;
        tracing::info!(
            "committed {}/{}:{} to gitlab",
            change.owner,
            change.repository,
            change.remote_path
        );
        Ok(done)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
