use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;
use study_assistant_client::transport::http::{HttpResponse, Transport, TransportError};

/// A canned reply for the scripted transport.
pub enum Reply {
    Respond(u16, String),
    NetworkDown(String),
}

/// Transport that answers from a queue and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Reply::Respond(status, body.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Reply::NetworkDown(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.borrow().clone()
    }

    pub fn last_payload(&self) -> Value {
        self.requests
            .borrow()
            .last()
            .map(|(_, body)| body.clone())
            .expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    fn post_json(&self, endpoint: &str, body: &Value) -> Result<HttpResponse, TransportError> {
        self.requests
            .borrow_mut()
            .push((endpoint.to_string(), body.clone()));

        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Respond(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::NetworkDown(message)) => Err(TransportError::Network(message)),
            None => Err(TransportError::Network("no scripted reply".into())),
        }
    }
}

pub fn ok_json(body: &str) -> HttpResponse {
    HttpResponse::new(200, body)
}
