//! Session setup and initialization

use crate::actions::AdminActions;
use crate::api::error::ApiError;
use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::config::LocalStorage;
use crate::consts::cli_consts::FEEDBACK_EVENT_QUEUE_SIZE;
use crate::credentials::CredentialStore;
use crate::events::{EventSender, FeedbackEvent};
use crate::feedback::FeedbackQueue;
use crate::lists::ControllerRegistry;
use crate::profile::ApiProfile;
use crate::session::render::render_feedback;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything a one-shot command or the interactive console needs.
pub struct SessionData {
    pub storage: LocalStorage,
    /// Feedback events for the renderer
    pub event_receiver: mpsc::Receiver<FeedbackEvent>,
    pub feedback: FeedbackQueue,
    pub lists: ControllerRegistry,
    pub actions: AdminActions,
}

/// Builds both API clients over one HTTP transport and wires them to a
/// shared notification queue.
pub fn setup_session(storage: LocalStorage) -> Result<SessionData, ApiError> {
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
    let client = |profile: ApiProfile| {
        ApiClient::new(
            profile,
            CredentialStore::new(storage.clone(), profile),
            transport.clone(),
        )
    };
    let legacy = client(ApiProfile::Legacy);
    let console = client(ApiProfile::Console);

    let (event_sender, event_receiver) = mpsc::channel(FEEDBACK_EVENT_QUEUE_SIZE);
    let feedback = FeedbackQueue::new(EventSender::new(event_sender));
    let lists = ControllerRegistry::new(legacy.clone(), feedback.clone());
    let actions = AdminActions::new(legacy, console, feedback.clone(), lists.clone());

    Ok(SessionData {
        storage,
        event_receiver,
        feedback,
        lists,
        actions,
    })
}

impl SessionData {
    /// Prints every feedback event produced so far.
    pub fn flush_feedback(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            if event.should_display() {
                println!("{}", render_feedback(&event));
            }
        }
    }
}
