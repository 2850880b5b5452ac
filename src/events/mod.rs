use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::OrderStatus;

/// Domain events emitted by the services after a successful mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    UserCreated(Uuid),
    UserUpdated(Uuid),
    UserDeleted(Uuid),
    ProviderCreated(Uuid),
    ProviderUpdated(Uuid),
    ProviderDeleted(Uuid),
    ClientCreated(Uuid),
    ClientUpdated(Uuid),
    OrderCreated(Uuid),
    OrderStatusChanged {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderConverted {
        order_id: Uuid,
        ot_code: String,
    },
    QuoteRejected(Uuid),
    OrderAssigned {
        order_id: Uuid,
        assignee: Uuid,
    },
    OrderUnassigned(Uuid),
    InvoiceIssued {
        ot_code: String,
        number: String,
    },
    StockItemCreated(Uuid),
    StockItemUpdated(Uuid),
    PurchaseOrderCreated(Uuid),
    PurchaseOrderReceived(Uuid),
}

/// Cloneable handle used by services to publish events.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("failed to send event: {}", e))
    }

    /// Publish an event, logging instead of failing when the consumer is
    /// gone. Mutations must not be rolled back because of a full channel.
    pub async fn publish(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("event dropped: {}", e);
        }
    }
}

/// Consumes events off the channel until all senders are dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderStatusChanged { order_id, from, to } => {
                info!(%order_id, %from, %to, "order status changed");
            }
            Event::OrderConverted { order_id, ot_code } => {
                info!(%order_id, %ot_code, "quote converted to work order");
            }
            Event::InvoiceIssued { ot_code, number } => {
                info!(%ot_code, %number, "fiscal document issued");
            }
            other => {
                info!(event = ?other, "domain event");
            }
        }
    }
    info!("event channel closed, consumer exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_does_not_error_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic; the drop is logged.
        sender.publish(Event::UserCreated(Uuid::new_v4())).await;
    }

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        sender
            .send(Event::QuoteRejected(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(matches!(rx.recv().await, Some(Event::QuoteRejected(_))));
    }
}
