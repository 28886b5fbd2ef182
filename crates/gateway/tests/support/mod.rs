//! Scripted in-process assistants backend and state builders shared by
//! the gateway integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use la_assistants::{
    Assistant, AssistantFile, AssistantsApi, CreateAssistantRequest, CreateMessageRequest,
    CreateRunRequest, FileObject, FileUpload, ListMessagesQuery, MessageContent, MessageList,
    MessageRole, Run, RunStatus, Thread, ThreadMessage,
};
use la_domain::config::{Config, StoreTransport};
use la_domain::error::{Error, Result};
use la_gateway::state::AppState;
use la_store::{MemoryBindingStore, TrustedTokenIdentity};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ScriptedAssistants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Assistants backend whose run statuses follow a script.
///
/// `create_run` returns the first scripted status and each
/// `retrieve_run` the next one (the last status repeats). When a run
/// first reports `completed`, the scripted replies are appended to its
/// thread as assistant messages.
#[derive(Default)]
pub struct ScriptedAssistants {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u32,
    assistant_requests: Vec<CreateAssistantRequest>,
    threads_created: usize,
    threads: HashMap<String, Vec<ThreadMessage>>,
    run_script: VecDeque<RunStatus>,
    last_status: Option<RunStatus>,
    retrieve_calls: u32,
    replies: Vec<Vec<MessageContent>>,
    replied: bool,
    uploads: Vec<FileUpload>,
    attachments: Vec<(String, String)>,
    fail_attach: bool,
}

impl Inner {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}_{}", self.next_id)
    }

    fn push_message(&mut self, thread_id: &str, role: MessageRole, content: Vec<MessageContent>) -> ThreadMessage {
        let id = self.id("msg");
        let message = ThreadMessage {
            id,
            thread_id: thread_id.to_owned(),
            role,
            created_at: i64::from(self.next_id),
            content,
            run_id: None,
        };
        self.threads
            .entry(thread_id.to_owned())
            .or_default()
            .push(message.clone());
        message
    }

    fn next_status(&mut self) -> RunStatus {
        let status = self
            .run_script
            .pop_front()
            .or(self.last_status)
            .unwrap_or(RunStatus::Completed);
        self.last_status = Some(status);
        status
    }

    fn run(&mut self, run_id: String, thread_id: &str, assistant_id: String, status: RunStatus) -> Run {
        if status == RunStatus::Completed && !self.replied {
            self.replied = true;
            for reply in self.replies.clone() {
                self.push_message(thread_id, MessageRole::Assistant, reply);
            }
        }
        Run {
            id: run_id,
            thread_id: thread_id.to_owned(),
            assistant_id,
            status,
            last_error: None,
            created_at: 0,
        }
    }
}

impl ScriptedAssistants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_script(self, statuses: impl IntoIterator<Item = RunStatus>) -> Self {
        self.inner.lock().run_script = statuses.into_iter().collect();
        self
    }

    /// Add an assistant reply (one message) produced when the run completes.
    pub fn with_reply(self, content: Vec<MessageContent>) -> Self {
        self.inner.lock().replies.push(content);
        self
    }

    pub fn with_text_reply(self, text: &str) -> Self {
        self.with_reply(vec![MessageContent::text(text)])
    }

    pub fn failing_attach(self) -> Self {
        self.inner.lock().fail_attach = true;
        self
    }

    /// Put a message on a thread directly, bypassing the run script.
    pub fn seed_message(&self, thread_id: &str, role: MessageRole, content: Vec<MessageContent>) -> String {
        self.inner.lock().push_message(thread_id, role, content).id
    }

    pub fn assistants_created(&self) -> usize {
        self.inner.lock().assistant_requests.len()
    }

    pub fn assistant_requests(&self) -> Vec<CreateAssistantRequest> {
        self.inner.lock().assistant_requests.clone()
    }

    pub fn threads_created(&self) -> usize {
        self.inner.lock().threads_created
    }

    pub fn retrieve_calls(&self) -> u32 {
        self.inner.lock().retrieve_calls
    }

    pub fn uploads(&self) -> usize {
        self.inner.lock().uploads.len()
    }

    pub fn attachments(&self) -> Vec<(String, String)> {
        self.inner.lock().attachments.clone()
    }
}

#[async_trait]
impl AssistantsApi for ScriptedAssistants {
    async fn create_assistant(&self, req: CreateAssistantRequest) -> Result<Assistant> {
        let mut inner = self.inner.lock();
        let id = inner.id("asst");
        let assistant = Assistant {
            id,
            name: req.name.clone(),
            model: req.model.clone(),
            instructions: req.instructions.clone(),
            tools: req.tools.clone(),
            file_ids: req.file_ids.clone(),
        };
        inner.assistant_requests.push(req);
        Ok(assistant)
    }

    async fn create_thread(&self) -> Result<Thread> {
        let mut inner = self.inner.lock();
        inner.threads_created += 1;
        let id = inner.id("thread");
        inner.threads.insert(id.clone(), Vec::new());
        Ok(Thread { id, created_at: 0 })
    }

    async fn create_message(&self, thread_id: &str, req: CreateMessageRequest) -> Result<ThreadMessage> {
        let mut inner = self.inner.lock();
        Ok(inner.push_message(thread_id, req.role, vec![MessageContent::text(req.content)]))
    }

    async fn list_messages(&self, thread_id: &str, query: &ListMessagesQuery) -> Result<MessageList> {
        let inner = self.inner.lock();
        let all = inner.threads.get(thread_id).cloned().unwrap_or_default();
        let start = match &query.after {
            Some(after) => all
                .iter()
                .position(|m| &m.id == after)
                .map(|i| i + 1)
                .unwrap_or(all.len()),
            None => 0,
        };
        let limit = query.limit.unwrap_or(20) as usize;
        let rest = &all[start..];
        let data: Vec<ThreadMessage> = rest.iter().take(limit).cloned().collect();
        Ok(MessageList {
            first_id: data.first().map(|m| m.id.clone()),
            last_id: data.last().map(|m| m.id.clone()),
            has_more: rest.len() > limit,
            data,
        })
    }

    async fn create_run(&self, thread_id: &str, req: CreateRunRequest) -> Result<Run> {
        let mut inner = self.inner.lock();
        let status = inner.next_status();
        let run_id = inner.id("run");
        Ok(inner.run(run_id, thread_id, req.assistant_id, status))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let mut inner = self.inner.lock();
        inner.retrieve_calls += 1;
        let status = inner.next_status();
        Ok(inner.run(run_id.to_owned(), thread_id, String::new(), status))
    }

    async fn upload_file(&self, upload: FileUpload) -> Result<FileObject> {
        let mut inner = self.inner.lock();
        let id = inner.id("file");
        let file = FileObject {
            id,
            filename: Some(upload.filename.clone()),
            bytes: Some(upload.bytes.len() as u64),
            purpose: Some(upload.purpose.clone()),
        };
        inner.uploads.push(upload);
        Ok(file)
    }

    async fn attach_file(&self, assistant_id: &str, file_id: &str) -> Result<AssistantFile> {
        let mut inner = self.inner.lock();
        if inner.fail_attach {
            return Err(Error::Provider {
                status: Some(500),
                message: "attach failed".into(),
            });
        }
        inner
            .attachments
            .push((assistant_id.to_owned(), file_id.to_owned()));
        Ok(AssistantFile {
            id: file_id.to_owned(),
            assistant_id: Some(assistant_id.to_owned()),
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// State builders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.store.transport = StoreTransport::Memory;
    config
}

/// App state over `api`, an in-memory store and trusted-token identity.
pub fn state_with(api: Arc<ScriptedAssistants>) -> (AppState, Arc<MemoryBindingStore>) {
    state_with_config(api, test_config())
}

pub fn state_with_config(
    api: Arc<ScriptedAssistants>,
    config: Config,
) -> (AppState, Arc<MemoryBindingStore>) {
    let store = Arc::new(MemoryBindingStore::new());
    let state = AppState::new(
        Arc::new(config),
        api,
        store.clone(),
        Arc::new(TrustedTokenIdentity),
    );
    (state, store)
}
