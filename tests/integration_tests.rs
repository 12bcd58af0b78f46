//! Integration tests for the TravelChat library: table, selection and chat together

use std::sync::{Arc, Mutex};

use travelchat::llm::{ChatResponse, LlmChat, LlmError, Message};
use travelchat::{
    ChatService, LocationTable, MAX_SELECTED, Persona, Role, SelectionStore, SessionStore,
    ToggleOutcome,
};

const LOCATIONS: &str = "address;latitude;longitude
Rynek Główny 1, Kraków;50.0617;19.9373
Wawel 5, Kraków;50.0540;19.9354
Plac Zamkowy 4, Warszawa;52.2478;21.0137
Długi Targ, Gdańsk;54.3486;18.6533
Rynek, Wrocław;51.1100;17.0320
Stary Rynek, Poznań;52.4084;16.9342
not a row
Piotrkowska 104, Łódź;51.7592;19.4560
";

/// Records every request and fails when the user text contains "boom"
#[derive(Default)]
struct RecordingLlm {
    requests: Mutex<Vec<Vec<Message>>>,
}

#[async_trait::async_trait]
impl LlmChat for RecordingLlm {
    async fn chat(&self, _max_tokens: u32, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if messages[1].content.contains("boom") {
            return Err(LlmError::ApiRequest("timed out".into()));
        }
        Ok(ChatResponse {
            text: "Here is your route.".into(),
            model: "test".into(),
            stop_reason: "end_turn".into(),
            input_tokens: 1,
            output_tokens: 1,
        })
    }
}

#[test]
fn test_table_skips_malformed_rows() {
    let table = LocationTable::parse(LOCATIONS, ';').unwrap();
    assert_eq!(table.len(), 7);
    assert_eq!(table.get(6).unwrap().address, "Piotrkowska 104, Łódź");
}

#[test]
fn test_table_and_map_click_select_the_same_location() {
    let table = LocationTable::parse(LOCATIONS, ';').unwrap();
    let mut selection = SelectionStore::new();

    let row = table.get(2).unwrap();
    assert_eq!(selection.toggle(row), ToggleOutcome::Added);

    let clicked = table.nearest(52.2479, 21.0136, 1.0).unwrap();
    assert_eq!(selection.toggle(clicked), ToggleOutcome::Removed);
    assert!(selection.is_empty());
}

#[test]
fn test_selection_cap_over_whole_table() {
    let table = LocationTable::parse(LOCATIONS, ';').unwrap();
    let mut selection = SelectionStore::new();

    let outcomes: Vec<ToggleOutcome> = table.all().iter().map(|l| selection.toggle(l)).collect();
    assert_eq!(
        outcomes.iter().filter(|o| **o == ToggleOutcome::Added).count(),
        MAX_SELECTED
    );
    assert_eq!(
        outcomes.iter().filter(|o| **o == ToggleOutcome::Rejected).count(),
        table.len() - MAX_SELECTED
    );
    assert_eq!(selection.len(), MAX_SELECTED);
}

#[tokio::test]
async fn test_chat_turns_through_session_store() {
    let table = LocationTable::parse(LOCATIONS, ';').unwrap();
    let llm = Arc::new(RecordingLlm::default());
    let chat = ChatService::new(llm.clone(), Persona::Travel, 512);
    let sessions = SessionStore::new();
    let id = sessions.create(chat.new_conversation()).await;

    let first = table.get(0).unwrap().clone();
    let third = table.get(3).unwrap().clone();
    sessions
        .with_session_mut(id, |s| {
            s.selection.toggle(&first);
            s.selection.toggle(&third);
        })
        .await
        .unwrap();

    let handle = sessions.handle(id).await.unwrap();
    {
        let mut session = handle.lock().await;
        let session = &mut *session;
        chat.send(&mut session.conversation, &session.selection, "Plan a route").await;
        chat.send(&mut session.conversation, &session.selection, "boom").await;
        chat.send(&mut session.conversation, &session.selection, "And back?").await;
    }

    let session = sessions.get(id).await.unwrap();
    let messages = session.conversation.messages();
    assert_eq!(messages.len(), 7);
    assert_eq!(messages[0].role, Role::Assistant);
    assert_eq!(messages[4].content, "Error: API request failed: timed out");
    assert_eq!(messages[6].content, "Here is your route.");

    let requests = llm.requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests[0][1].content,
        "Selected locations:\n\
         1. Rynek Główny 1, Kraków (50.06170, 19.93730)\n\
         2. Długi Targ, Gdańsk (54.34860, 18.65330)\n\nPlan a route"
    );
}
