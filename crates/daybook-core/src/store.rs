//! The chat store: in-memory chat collection and turn orchestration.

use crate::archive::ChatArchive;
use crate::catalog::{BASELINE_MODEL_NAME, ModelCatalog};
use crate::error::ChatError;
use crate::types::{Chat, Message, day_key};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use daybook_config::DaybookConfig;
use daybook_protocol::{ChatEvent, ChatRequest, CompletionProvider, EventSink, WireMessage};
use daybook_tools::{
    FunctionDispatcher, HistoryEntry, ReplyBody, ReplyMessage, ReplyRole, ToolContext,
    ToolRegistry, ToolReply, TurnServices, register_builtin_tools,
};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Clock used to resolve "now" in the configured offset; injectable so
/// tests can pin the calendar day.
type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

/// The session engine: owns the chats, the active day, and the
/// orchestration of each user turn.
pub struct ChatStore {
    offset: FixedOffset,
    default_model: String,
    provider: Arc<dyn CompletionProvider>,
    catalog: Arc<ModelCatalog>,
    dispatcher: FunctionDispatcher,
    services: Arc<TurnServices>,
    archive: Arc<dyn ChatArchive>,
    event_sink: Option<Arc<dyn EventSink>>,
    clock: Clock,
    chats: RwLock<BTreeMap<String, Chat>>,
    active: RwLock<Option<String>>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Builder assembling a [`ChatStore`] from its collaborators.
pub struct ChatStoreBuilder {
    config: DaybookConfig,
    provider: Arc<dyn CompletionProvider>,
    catalog: Arc<ModelCatalog>,
    archive: Arc<dyn ChatArchive>,
    registry: Option<ToolRegistry>,
    services: Arc<TurnServices>,
    event_sink: Option<Arc<dyn EventSink>>,
    clock: Option<Clock>,
}

impl ChatStoreBuilder {
    /// Start a builder from the required collaborators.
    pub fn new(
        config: DaybookConfig,
        provider: Arc<dyn CompletionProvider>,
        catalog: Arc<ModelCatalog>,
        archive: Arc<dyn ChatArchive>,
    ) -> Self {
        Self {
            config,
            provider,
            catalog,
            archive,
            registry: None,
            services: Arc::new(TurnServices::default()),
            event_sink: None,
            clock: None,
        }
    }

    /// Use a custom tool registry instead of the builtin set.
    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Attach the shared turn services handed to tools.
    pub fn with_services(mut self, services: Arc<TurnServices>) -> Self {
        self.services = services;
        self
    }

    /// Attach an event sink notified on every chat mutation.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Pin the clock; tests use this to fix the calendar day.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Assemble the store.
    pub fn build(self) -> ChatStore {
        let offset = FixedOffset::east_opt(self.config.timezone.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix());
        let registry = self.registry.unwrap_or_else(|| {
            let registry = ToolRegistry::new();
            register_builtin_tools(&registry);
            registry
        });
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(move || Utc::now().with_timezone(&offset)));
        ChatStore {
            offset,
            default_model: self.config.models.default_model.clone(),
            provider: self.provider,
            catalog: self.catalog,
            dispatcher: FunctionDispatcher::new(registry),
            services: self.services,
            archive: self.archive,
            event_sink: self.event_sink,
            clock,
            chats: RwLock::new(BTreeMap::new()),
            active: RwLock::new(None),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl ChatStore {
    /// Populate the in-memory collection from the archive. The most
    /// recent day becomes active.
    pub fn load_all(&self) -> Result<(), ChatError> {
        let loaded = self.archive.load_all()?;
        let mut chats = self.chats.write();
        let mut most_recent = None;
        for mut chat in loaded {
            chat.model = self.default_model.clone();
            if most_recent.is_none() {
                most_recent = Some(chat.day.clone());
            }
            chats.insert(chat.day.clone(), chat);
        }
        drop(chats);
        *self.active.write() = most_recent;
        Ok(())
    }

    /// All chats, most recent day first.
    pub fn chats(&self) -> Vec<Chat> {
        self.chats.read().values().rev().cloned().collect()
    }

    /// One chat by day key.
    pub fn chat(&self, day: &str) -> Option<Chat> {
        self.chats.read().get(day).cloned()
    }

    /// The active day key, if any chat is active.
    pub fn active_day(&self) -> Option<String> {
        self.active.read().clone()
    }

    /// Resolve the day key for a date, creating an empty chat for it if
    /// none exists, and make it active. A second call for the same day
    /// returns the existing chat rather than creating a duplicate.
    pub fn chat_for_day(&self, date: DateTime<FixedOffset>) -> String {
        let date = date.with_timezone(&self.offset);
        let day = day_key(date);
        let created = {
            let mut chats = self.chats.write();
            if chats.contains_key(&day) {
                false
            } else {
                chats.insert(day.clone(), Chat::for_date(date, self.default_model.clone()));
                true
            }
        };
        if created {
            info!("created chat (day={day})");
            self.emit(ChatEvent::ChatUpdated { day: day.clone() });
        }
        *self.active.write() = Some(day.clone());
        day
    }

    /// Remove a chat and its durable blob. Clears the active pointer if
    /// it pointed here; no fallback chat is created.
    pub fn delete_chat(&self, day: &str) -> Result<(), ChatError> {
        let removed = self.chats.write().remove(day).is_some();
        if !removed {
            return Err(ChatError::UnknownChat(day.to_string()));
        }
        self.archive.delete(day)?;
        let mut active = self.active.write();
        if active.as_deref() == Some(day) {
            *active = None;
        }
        drop(active);
        info!("deleted chat (day={day})");
        self.emit(ChatEvent::ChatDeleted {
            day: day.to_string(),
        });
        Ok(())
    }

    /// Run one full user turn against the active chat (today's chat is
    /// created if none is active).
    ///
    /// The user message is appended and persisted before any provider
    /// call, and any failure afterwards is rendered as a single trailing
    /// assistant message, so the chat never ends a turn with an
    /// unanswered user message.
    pub async fn send_message(&self, text: &str) -> Result<(), ChatError> {
        let now = (self.clock)();
        let day = match self.active_day() {
            Some(day) => day,
            None => self.chat_for_day(now),
        };
        let _guard = TurnGuard::acquire(self.in_flight.clone(), day.clone())?;

        self.append_and_persist(&day, vec![Message::user(text)])?;
        if let Err(err) = self.run_turn(&day, text, now).await {
            warn!("turn failed (day={day}): {err}");
            self.append_and_persist(&day, vec![Message::assistant(err.user_message())])?;
        }
        Ok(())
    }

    /// Classification, dispatch, and completion for one turn.
    async fn run_turn(
        &self,
        day: &str,
        text: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<(), ChatError> {
        let model_id = self.resolve_active_model(day)?;

        // Classification: a short-lived header plus the raw user text,
        // deliberately not the full history.
        let request = ChatRequest::classification(
            model_id.clone(),
            vec![
                WireMessage::new("system", classification_header(now)),
                WireMessage::new("user", text),
            ],
            self.dispatcher.registry().schemas(),
        );
        let response = self.provider.chat(request).await?;

        let Some(call) = response.function_call().cloned() else {
            debug!("no function selected (day={day})");
            let reply = self.run_completion(day, &model_id, None).await?;
            return self.append_and_persist(day, vec![Message::assistant(reply)]);
        };

        debug!("function selected (day={day}, name={})", call.name);
        let ctx = self.tool_context(day, now);
        match self.dispatcher.dispatch(&ctx, &call.name, &call.arguments).await? {
            ToolReply::Messages(messages) => {
                self.append_and_persist(day, messages.into_iter().map(convert_reply).collect())
            }
            ToolReply::Context { preamble, context } => {
                if !preamble.is_empty() {
                    self.append_and_persist(
                        day,
                        preamble.into_iter().map(convert_reply).collect(),
                    )?;
                }
                let reply = self.run_completion(day, &model_id, context.as_deref()).await?;
                self.append_and_persist(day, vec![Message::assistant(reply)])
            }
        }
    }

    /// Apply the model fallback policy and resolve the provider id.
    ///
    /// A chat whose model is absent from the catalog is forced to the
    /// baseline with one system notice; consecutive switches replace the
    /// notice rather than stacking.
    fn resolve_active_model(&self, day: &str) -> Result<String, ChatError> {
        let model_name = self
            .chats
            .read()
            .get(day)
            .map(|chat| chat.model.clone())
            .ok_or_else(|| ChatError::UnknownChat(day.to_string()))?;
        if self.catalog.contains(&model_name) {
            return Ok(self.catalog.resolve(&model_name));
        }
        warn!("active model unavailable, falling back (model={model_name})");
        self.mutate_and_persist(day, |chat| chat.note_model_switch(BASELINE_MODEL_NAME))?;
        Ok(self.catalog.resolve(BASELINE_MODEL_NAME))
    }

    /// One completion call over the full chat history, with an optional
    /// context block injected as a trailing prompt-only system entry.
    async fn run_completion(
        &self,
        day: &str,
        model_id: &str,
        context: Option<&str>,
    ) -> Result<String, ChatError> {
        let mut messages: Vec<WireMessage> = self
            .chats
            .read()
            .get(day)
            .ok_or_else(|| ChatError::UnknownChat(day.to_string()))?
            .messages
            .iter()
            .map(|message| WireMessage::new(message.role.as_str(), message.rendered()))
            .collect();
        if let Some(context) = context {
            messages.push(WireMessage::new("system", context));
        }
        let response = self
            .provider
            .chat(ChatRequest::completion(model_id, messages))
            .await?;
        response
            .text()
            .map(str::to_string)
            .ok_or_else(|| {
                ChatError::InternalState("completion response carried no content".to_string())
            })
    }

    /// Build the context handed to tools for this turn.
    fn tool_context(&self, day: &str, now: DateTime<FixedOffset>) -> ToolContext {
        let history = self
            .chats
            .read()
            .get(day)
            .map(|chat| {
                chat.messages
                    .iter()
                    .map(|message| HistoryEntry {
                        role: message.role.as_str().to_string(),
                        content: message.rendered(),
                        revised_prompt: message.image_revised_prompt(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        ToolContext::new(now, self.services.clone()).with_history(history)
    }

    /// Append messages to a chat, then emit one event and write the blob
    /// once.
    fn append_and_persist(&self, day: &str, messages: Vec<Message>) -> Result<(), ChatError> {
        self.mutate_and_persist(day, |chat| {
            for message in messages {
                chat.push(message);
            }
        })
    }

    /// Apply one mutation, emit one event, and persist once.
    fn mutate_and_persist(
        &self,
        day: &str,
        mutate: impl FnOnce(&mut Chat),
    ) -> Result<(), ChatError> {
        let snapshot = {
            let mut chats = self.chats.write();
            let chat = chats
                .get_mut(day)
                .ok_or_else(|| ChatError::UnknownChat(day.to_string()))?;
            mutate(chat);
            chat.clone()
        };
        self.emit(ChatEvent::ChatUpdated {
            day: day.to_string(),
        });
        self.archive.save(&snapshot)?;
        Ok(())
    }

    /// Notify the sink, if one is attached.
    fn emit(&self, event: ChatEvent) {
        if let Some(sink) = &self.event_sink {
            sink.emit(event);
        }
    }
}

/// Convert a tool reply message into a chat message.
fn convert_reply(message: ReplyMessage) -> Message {
    let role = match message.role {
        ReplyRole::System => crate::types::Role::System,
        ReplyRole::Assistant => crate::types::Role::Assistant,
    };
    match message.body {
        ReplyBody::Text(text) => Message::text(role, text),
        ReplyBody::Location {
            latitude,
            longitude,
        } => Message::location(latitude, longitude),
    }
}

/// Context header for the classification call.
fn classification_header(now: DateTime<FixedOffset>) -> String {
    format!(
        "Today is {}. The current time is {} (UTC{}).",
        now.format("%A, %B %-d, %Y"),
        now.format("%H:%M"),
        now.format("%:z")
    )
}

/// Removes the day from the in-flight set when the turn ends.
struct TurnGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
    day: String,
}

impl TurnGuard {
    /// Claim the day, rejecting a second in-flight turn.
    fn acquire(
        in_flight: Arc<Mutex<HashSet<String>>>,
        day: String,
    ) -> Result<Self, ChatError> {
        if !in_flight.lock().insert(day.clone()) {
            return Err(ChatError::TurnInFlight(day));
        }
        Ok(Self { in_flight, day })
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.day);
    }
}
