//! In-memory fakes for exercising the admin services without a network.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use vitrina_api_types::UploadRequest;

use crate::application::error::GatewayError;
use crate::application::transport::{AdminKey, AdminTransport, ResourceRequest};
use crate::application::ui::{AdminUi, Toast, ToastKind};

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, GatewayError>>>,
    calls: Mutex<Vec<ResourceRequest>>,
    uploads: Mutex<Vec<UploadRequest>>,
    keys: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, value: Value) -> &Self {
        self.push(Ok(value))
    }

    pub fn fail(&self, err: GatewayError) -> &Self {
        self.push(Err(err))
    }

    fn push(&self, response: Result<Value, GatewayError>) -> &Self {
        self.responses
            .lock()
            .expect("responses lock")
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<ResourceRequest> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.uploads.lock().expect("uploads lock").clone()
    }

    pub fn keys_seen(&self) -> Vec<String> {
        self.keys.lock().expect("keys lock").clone()
    }

    fn next(&self) -> Result<Value, GatewayError> {
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Transport("no scripted response".into())))
    }
}

#[async_trait]
impl AdminTransport for ScriptedTransport {
    async fn call(&self, key: &AdminKey, request: ResourceRequest) -> Result<Value, GatewayError> {
        self.keys
            .lock()
            .expect("keys lock")
            .push(key.expose().to_string());
        self.calls.lock().expect("calls lock").push(request);
        self.next()
    }

    async fn upload(&self, key: &AdminKey, request: UploadRequest) -> Result<Value, GatewayError> {
        self.keys
            .lock()
            .expect("keys lock")
            .push(key.expose().to_string());
        self.uploads.lock().expect("uploads lock").push(request);
        self.next()
    }
}

/// Collects toasts and answers confirmations with a fixed choice.
pub struct RecordingUi {
    toasts: Mutex<Vec<Toast>>,
    prompts: Mutex<Vec<String>>,
    confirm_answer: bool,
    focused: AtomicBool,
}

impl RecordingUi {
    pub fn confirming(answer: bool) -> Self {
        Self {
            toasts: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            confirm_answer: answer,
            focused: AtomicBool::new(false),
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().expect("toasts lock").clone()
    }

    pub fn last_toast(&self) -> Option<Toast> {
        self.toasts.lock().expect("toasts lock").last().cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.kind == ToastKind::Error)
            .map(|toast| toast.text)
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    pub fn was_focused(&self) -> bool {
        self.focused.load(Ordering::SeqCst)
    }
}

impl Default for RecordingUi {
    fn default() -> Self {
        Self::confirming(true)
    }
}

impl AdminUi for RecordingUi {
    fn toast(&self, toast: Toast) {
        self.toasts.lock().expect("toasts lock").push(toast);
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        self.confirm_answer
    }

    fn focus_editor(&self) {
        self.focused.store(true, Ordering::SeqCst);
    }
}
