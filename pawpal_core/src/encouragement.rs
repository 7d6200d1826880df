//! Encouraging-message generation.
//!
//! Requests emitted by the engine are turned into short motivational
//! messages by a [`MessageGenerator`]. The [`MessageDispatcher`] runs the
//! generator on a worker thread and posts results to a shared
//! [`MessageBoard`], which the presentation layer reads.

use crate::config::{GeneratorConfig, GeneratorProvider};
use crate::{Error, MessageRequest, MessageSink, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

const CHAT_PATH: &str = "/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are a motivational coach who provides encouraging messages to users based on their habit tracking data. Generate a personalized and uplifting message (1-2 sentences) to encourage the user to maintain their streaks and improve their well-being.";

/// Generated message, matching the collaborator's response schema
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncouragingMessage {
    pub message: String,
}

/// Contract every message backend must satisfy
pub trait MessageGenerator: Send {
    fn name(&self) -> &'static str;

    fn generate(&self, request: &MessageRequest) -> Result<EncouragingMessage>;
}

// ============================================================================
// Offline generator
// ============================================================================

/// Template-based generator that needs no network access
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineGenerator;

impl MessageGenerator for OfflineGenerator {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn generate(&self, request: &MessageRequest) -> Result<EncouragingMessage> {
        let habit = request.habit_type.trim();
        if habit.is_empty() {
            return Err(Error::Generator("habit type cannot be empty".into()));
        }

        let opener = match request.streak_length {
            0 | 1 => "Great start!",
            2..=4 => "You're on a roll!",
            _ => "Unstoppable!",
        };
        let message = format!(
            "{} {} goal of {} reached ({} logged). That's {} {} so far, keep it going!",
            opener,
            habit,
            request.habit_goal,
            request.habit_progress,
            request.streak_length,
            if request.streak_length == 1 { "completion" } else { "completions" },
        );
        Ok(EncouragingMessage { message })
    }
}

// ============================================================================
// OpenAI-compatible generator
// ============================================================================

/// Chat-completions backed generator
pub struct OpenAiGenerator {
    http: Client,
    api_key: String,
    url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u16,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("generator API key is empty".into()));
        }

        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            http,
            api_key,
            url: format!("{}{}", config.base_url.trim_end_matches('/'), CHAT_PATH),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u16,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn build_user_message(request: &MessageRequest) -> String {
    format!(
        "Habit Type: {}\nHabit Goal: {}\nHabit Progress: {}\nStreak Length: {}\n\nEncouraging Message:",
        request.habit_type, request.habit_goal, request.habit_progress, request.streak_length
    )
}

impl MessageGenerator for OpenAiGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn generate(&self, request: &MessageRequest) -> Result<EncouragingMessage> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_message(request),
                },
            ],
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Generator(format!("HTTP {} from chat endpoint", status)));
        }

        into_message(response.json()?)
    }
}

/// First non-blank choice of a completion, trimmed
fn into_message(completion: ChatCompletionResponse) -> Result<EncouragingMessage> {
    completion
        .choices
        .into_iter()
        .filter_map(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .map(|message| EncouragingMessage { message })
        .ok_or_else(|| Error::Generator("empty completion".into()))
}

/// Build the generator selected by configuration.
///
/// The HTTP provider needs an API key; without one the offline generator
/// is used instead.
pub fn build_generator(
    config: &GeneratorConfig,
    api_key: Option<String>,
) -> Result<Box<dyn MessageGenerator>> {
    match (config.provider, api_key) {
        (GeneratorProvider::Offline, _) => Ok(Box::new(OfflineGenerator)),
        (GeneratorProvider::OpenAi, Some(key)) => Ok(Box::new(OpenAiGenerator::new(config, key)?)),
        (GeneratorProvider::OpenAi, None) => {
            tracing::warn!("No generator API key set; using offline encouragement messages");
            Ok(Box::new(OfflineGenerator))
        }
    }
}

// ============================================================================
// Message board
// ============================================================================

/// Latest encouraging message plus in-flight bookkeeping.
///
/// A resolved message replaces the displayed one only when its request was
/// issued later. Responses that arrive out of order are discarded.
#[derive(Clone, Debug, Default)]
pub struct MessageBoard {
    latest_issued: u64,
    latest_settled: u64,
    displayed: Option<(u64, String)>,
}

impl MessageBoard {
    pub fn record_issued(&mut self, seq: u64) {
        self.latest_issued = self.latest_issued.max(seq);
    }

    /// Offer a resolved message. Returns true if it is now displayed.
    pub fn resolve(&mut self, seq: u64, message: String) -> bool {
        self.latest_settled = self.latest_settled.max(seq);
        let newer = self.displayed.as_ref().map_or(true, |(shown, _)| seq > *shown);
        if newer {
            self.displayed = Some((seq, message));
        } else {
            tracing::debug!("Discarding stale message for request {}", seq);
        }
        newer
    }

    /// Record a failed request. The displayed message is left unchanged.
    pub fn fail(&mut self, seq: u64) {
        self.latest_settled = self.latest_settled.max(seq);
    }

    /// True while the most recent request has not settled
    pub fn is_pending(&self) -> bool {
        self.latest_issued > self.latest_settled
    }

    pub fn message(&self) -> Option<&str> {
        self.displayed.as_ref().map(|(_, message)| message.as_str())
    }

    /// Sequence of the request whose message is displayed
    pub fn displayed_seq(&self) -> Option<u64> {
        self.displayed.as_ref().map(|(seq, _)| *seq)
    }
}

/// Shared handle to a message board
pub type SharedBoard = Arc<Mutex<MessageBoard>>;

fn lock(board: &SharedBoard) -> MutexGuard<'_, MessageBoard> {
    // A panicking generator must not take the board down with it
    board.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Runs a generator on a background thread and fills a message board
pub struct MessageDispatcher {
    sender: Option<Sender<MessageRequest>>,
    board: SharedBoard,
    worker: Option<JoinHandle<()>>,
}

impl MessageDispatcher {
    pub fn spawn(generator: Box<dyn MessageGenerator>) -> Result<Self> {
        let (sender, receiver) = channel::<MessageRequest>();
        let board: SharedBoard = Arc::default();
        let worker_board = Arc::clone(&board);

        let worker = std::thread::Builder::new()
            .name("pawpal-messages".into())
            .spawn(move || {
                tracing::debug!("Message worker started with {} generator", generator.name());
                for request in receiver {
                    match generator.generate(&request) {
                        Ok(generated) => {
                            lock(&worker_board).resolve(request.seq, generated.message);
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Message generation failed for request {} ({}): {}",
                                request.seq,
                                request.id,
                                e
                            );
                            lock(&worker_board).fail(request.seq);
                        }
                    }
                }
                tracing::debug!("Message worker stopped");
            })?;

        Ok(Self {
            sender: Some(sender),
            board,
            worker: Some(worker),
        })
    }

    pub fn board(&self) -> SharedBoard {
        Arc::clone(&self.board)
    }

    /// Copy of the board's current contents
    pub fn snapshot(&self) -> MessageBoard {
        lock(&self.board).clone()
    }

    /// Stop accepting requests and wait for in-flight ones to settle
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("Message worker panicked");
            }
        }
    }
}

impl MessageSink for MessageDispatcher {
    fn submit(&mut self, request: MessageRequest) {
        let Some(sender) = self.sender.as_ref() else {
            tracing::warn!("Dispatcher shut down, dropping request {}", request.seq);
            return;
        };
        lock(&self.board).record_issued(request.seq);
        let seq = request.seq;
        if sender.send(request).is_err() {
            tracing::warn!("Message worker gone, dropping request {}", seq);
            lock(&self.board).fail(seq);
        }
    }
}

impl Drop for MessageDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
