//! In-memory [`Transport`] for unit tests: replays canned responses in order
//! and records every request it receives.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::RemoteError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: RefCell<VecDeque<ApiResponse>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.responses.borrow_mut().push_back(ApiResponse {
            status,
            body: body.to_string(),
            ..Default::default()
        });
        self
    }

    pub(crate) fn respond_with_header(
        self,
        status: u16,
        body: serde_json::Value,
        name: &str,
        value: &str,
    ) -> Self {
        let mut response = ApiResponse {
            status,
            body: body.to_string(),
            ..Default::default()
        };
        response
            .headers
            .insert(name.to_ascii_lowercase(), value.to_owned());
        self.responses.borrow_mut().push_back(response);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, RemoteError> {
        let url = request.url.clone();
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or(RemoteError::Transport {
                url,
                message: "no canned response left".into(),
            })
    }
}
