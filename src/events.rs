use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Domain events emitted after ledger and workflow transactions commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    StockReceived {
        cartridge_id: i32,
        box_id: i32,
        quantity: i32,
    },
    StockWithdrawn {
        cartridge_id: i32,
        box_id: i32,
    },
    NoteIssued {
        note_id: i32,
        note_number: String,
        cartridge_id: i32,
        recipient_id: i32,
        quantity: i32,
    },
    NoteReturned {
        note_id: i32,
        note_number: String,
    },
    CatalogEntryDeleted {
        entity: String,
        id: i32,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event; failure means the processor has shut down.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Background consumer that logs events as they arrive. Runs until every
/// sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::StockReceived {
                cartridge_id,
                box_id,
                quantity,
            } => info!(
                cartridge_id,
                box_id, quantity, "stock received into box"
            ),
            Event::StockWithdrawn {
                cartridge_id,
                box_id,
            } => info!(cartridge_id, box_id, "one unit withdrawn to undistributed pool"),
            Event::NoteIssued {
                note_number,
                quantity,
                ..
            } => info!(%note_number, quantity, "service note issued"),
            Event::NoteReturned { note_number, .. } => {
                info!(%note_number, "service note returned")
            }
            Event::CatalogEntryDeleted { entity, id } => {
                info!(%entity, id, "catalog entry deleted")
            }
        }
    }
    info!("event processor stopped");
}

/// Builds a channel plus sender and spawns the logging processor.
pub fn spawn_event_processor(buffer: usize) -> EventSender {
    let (tx, rx) = mpsc::channel(buffer);
    tokio::spawn(process_events(rx));
    EventSender::new(tx)
}
