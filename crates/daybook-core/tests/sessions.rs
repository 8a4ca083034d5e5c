//! Session lifecycle tests: chat creation, persistence, reload, deletion.

use daybook_config::{CredentialsConfig, DaybookConfig, TimezoneConfig};
use daybook_core::{
    Chat, ChatArchive, ChatError, ChatStore, ChatStoreBuilder, FileChatArchive, Message,
    MessageBody, ModelCatalog,
};
use daybook_protocol::ChatEvent;
use daybook_test_utils::{
    RecordingSink, ScriptedProvider, StubLocation, fixed_clock, function_call_response,
    text_response,
};
use daybook_tools::TurnServices;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const NOON: &str = "2024-05-01T12:00:00+02:00";

fn store_at(
    root: &Path,
    provider: Arc<ScriptedProvider>,
    sink: Arc<RecordingSink>,
    services: TurnServices,
) -> ChatStore {
    let config = DaybookConfig::builder()
        .timezone(TimezoneConfig {
            utc_offset_minutes: 120,
        })
        .build();
    let catalog = Arc::new(ModelCatalog::new(
        provider.clone(),
        CredentialsConfig::default(),
        Vec::new(),
    ));
    let archive = Arc::new(FileChatArchive::new(root).expect("archive"));
    ChatStoreBuilder::new(config, provider, catalog, archive)
        .with_services(Arc::new(services))
        .with_event_sink(sink)
        .with_clock(fixed_clock(NOON))
        .build()
}

#[tokio::test]
async fn send_message_creates_todays_chat_and_persists_it() {
    let temp = tempdir().expect("tempdir");
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_response(text_response("(classified)"));
    provider.push_response(text_response("Good morning to you too."));
    let sink = Arc::new(RecordingSink::new());
    let store = store_at(
        temp.path(),
        provider.clone(),
        sink.clone(),
        TurnServices::default(),
    );

    store.send_message("Good morning").await.expect("turn");

    assert_eq!(store.active_day(), Some("2024-05-01".to_string()));
    let chat = store.chat("2024-05-01").expect("chat");
    assert_eq!(chat.title, "May 1, 2024");
    assert_eq!(
        chat.messages,
        vec![
            Message::user("Good morning"),
            Message::assistant("Good morning to you too."),
        ]
    );

    // Classification offers the schemas; the follow-up completion does not.
    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].functions.is_some());
    assert_eq!(requests[0].function_call.as_deref(), Some("auto"));
    assert!(requests[1].functions.is_none());

    // Create plus two appends, one event each.
    let updates = sink
        .events()
        .iter()
        .filter(|event| {
            matches!(event, ChatEvent::ChatUpdated { day } if day == "2024-05-01")
        })
        .count();
    assert_eq!(updates, 3);

    // The blob on disk carries the whole conversation.
    let reread = FileChatArchive::new(temp.path()).expect("archive");
    let loaded = reread.load_all().expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].messages, chat.messages);
}

#[tokio::test]
async fn one_chat_per_day() {
    let temp = tempdir().expect("tempdir");
    let provider = Arc::new(ScriptedProvider::new());
    let sink = Arc::new(RecordingSink::new());
    let store = store_at(
        temp.path(),
        provider,
        sink,
        TurnServices::default(),
    );

    let noon = chrono::DateTime::parse_from_rfc3339(NOON).expect("timestamp");
    let first = store.chat_for_day(noon);
    let second = store.chat_for_day(noon);

    assert_eq!(first, second);
    assert_eq!(store.chats().len(), 1);
    assert_eq!(store.active_day(), Some(first));
}

#[tokio::test]
async fn reload_fills_the_model_and_activates_the_most_recent_day() {
    let temp = tempdir().expect("tempdir");
    let archive = FileChatArchive::new(temp.path()).expect("archive");
    for (day, title) in [("2024-04-30", "April 30, 2024"), ("2024-05-01", "May 1, 2024")] {
        let chat = Chat {
            day: day.to_string(),
            title: title.to_string(),
            model: String::new(),
            messages: vec![Message::user("hi")],
        };
        archive.save(&chat).expect("save");
    }

    let provider = Arc::new(ScriptedProvider::new());
    let sink = Arc::new(RecordingSink::new());
    let store = store_at(
        temp.path(),
        provider,
        sink,
        TurnServices::default(),
    );
    store.load_all().expect("load");

    assert_eq!(store.chats().len(), 2);
    assert_eq!(store.active_day(), Some("2024-05-01".to_string()));
    assert_eq!(
        store.chat("2024-04-30").expect("chat").model,
        "Daybook".to_string()
    );
}

#[tokio::test]
async fn delete_chat_removes_the_blob_and_clears_the_active_day() {
    let temp = tempdir().expect("tempdir");
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_response(text_response("(classified)"));
    provider.push_response(text_response("Noted."));
    let sink = Arc::new(RecordingSink::new());
    let store = store_at(
        temp.path(),
        provider,
        sink.clone(),
        TurnServices::default(),
    );

    store.send_message("remember this day").await.expect("turn");
    store.delete_chat("2024-05-01").expect("delete");

    assert_eq!(store.chats().len(), 0);
    assert_eq!(store.active_day(), None);
    assert!(sink.events().contains(&ChatEvent::ChatDeleted {
        day: "2024-05-01".to_string()
    }));
    let reread = FileChatArchive::new(temp.path()).expect("archive");
    assert_eq!(reread.load_all().expect("load").len(), 0);

    let err = store.delete_chat("2024-05-01").expect_err("gone");
    assert!(matches!(err, ChatError::UnknownChat(_)));
}

#[tokio::test]
async fn location_replies_survive_the_blob_round_trip() {
    let temp = tempdir().expect("tempdir");
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_response(function_call_response("getCurrentLocation", "{}"));
    let sink = Arc::new(RecordingSink::new());
    let services = TurnServices {
        location: Some(Arc::new(StubLocation::new(47.6062, -122.3321))),
        ..TurnServices::default()
    };
    let store = store_at(temp.path(), provider, sink, services);

    store.send_message("where am I?").await.expect("turn");

    let chat = store.chat("2024-05-01").expect("chat");
    assert_eq!(
        chat.messages[1].body,
        MessageBody::Location {
            latitude: 47.6062,
            longitude: -122.3321,
        }
    );

    let reread = FileChatArchive::new(temp.path()).expect("archive");
    let loaded = reread.load_all().expect("load");
    assert_eq!(loaded[0].messages, chat.messages);
}
