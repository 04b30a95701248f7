use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Domain events emitted by the service layer after a state change has
/// been committed. Consumed by the background processing loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Work order events
    WorkOrderCreated(i32),
    WorkOrderStatusChanged {
        wo_id: i32,
        old_status: String,
        new_status: String,
    },
    WorkOrderCancelled(i32),

    // Inventory events
    StockReserved {
        wo_id: i32,
        internal_sku: String,
        warehouse_code: String,
        quantity: i32,
    },
    StockReleased {
        wo_id: i32,
        internal_sku: String,
        warehouse_code: String,
        quantity: i32,
    },
    StockConsumed {
        wo_id: i32,
        internal_sku: String,
        warehouse_code: String,
        quantity: i32,
    },
    StockReturned {
        wo_id: i32,
        internal_sku: String,
        warehouse_code: String,
        quantity: i32,
    },
    StockReceived {
        internal_sku: String,
        warehouse_code: String,
        quantity: i32,
    },
    StockAdjusted {
        internal_sku: String,
        warehouse_code: String,
        old_qty: i32,
        new_qty: i32,
        reason: String,
    },
    LowStockDetected {
        internal_sku: String,
        warehouse_code: String,
        qty_available: i32,
        reorder_point: i32,
    },

    // Invoicing events
    InvoiceCreated {
        invoice_id: i32,
        wo_id: Option<i32>,
    },
    PaymentRecorded {
        invoice_id: i32,
        payment_id: i32,
    },

    // Procurement events
    PurchaseOrderCreated(i32),
    PurchaseOrderReceived {
        po_id: i32,
        complete: bool,
    },

    /// Generic event with free-form payload
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn with_data(data: String) -> Self {
        Event::Generic {
            message: data,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously. Failure here never aborts the
    /// operation that raised the event.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Processes incoming events from the service layer. Runs as a
/// background task for the lifetime of the server.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::WorkOrderStatusChanged {
                wo_id,
                old_status,
                new_status,
            } => {
                info!(
                    wo_id = wo_id,
                    from = %old_status,
                    to = %new_status,
                    "work order status changed"
                );
            }
            Event::LowStockDetected {
                internal_sku,
                warehouse_code,
                qty_available,
                reorder_point,
            } => {
                warn!(
                    sku = %internal_sku,
                    warehouse = %warehouse_code,
                    available = qty_available,
                    reorder_point = reorder_point,
                    "stock below reorder point"
                );
            }
            other => {
                info!(event = ?other, "event processed");
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_event() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::WorkOrderCreated(7))
            .await
            .expect("send should succeed");

        match rx.recv().await {
            Some(Event::WorkOrderCreated(id)) => assert_eq!(id, 7),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        assert!(sender.send(Event::WorkOrderCreated(1)).await.is_err());
    }
}
