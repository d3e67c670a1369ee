//! Shared state for the control plane simulator.

use crate::event::{GatewayEvent, ReceivedReport};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// State shared between the HTTP handlers and test code.
///
/// Holds the queue of events waiting to be polled, the reports received so
/// far, and the synchronization primitives that let both sides wait without
/// polling in a loop.
///
/// This type is internal to the simulator. Users interact through
/// [`ControlPlane`](crate::ControlPlane).
#[derive(Debug, Default)]
pub(crate) struct ControlState {
    /// Events waiting to be handed out by the long-poll endpoint.
    pending_events: Mutex<VecDeque<GatewayEvent>>,

    /// Completion reports received, in arrival order.
    reports: Mutex<Vec<ReceivedReport>>,

    /// Notifier for when a new event is enqueued.
    event_available: Notify,

    /// Notifier for when a report is recorded.
    report_recorded: Notify,

    /// Number of readiness handshakes received.
    ready_signals: Mutex<u32>,
}

impl ControlState {
    /// Creates empty control state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty control state wrapped in an `Arc`.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Enqueues an event for the next poll.
    pub async fn enqueue_event(&self, event: GatewayEvent) {
        self.pending_events.lock().await.push_back(event);
        self.event_available.notify_one();
    }

    /// Waits for and dequeues the next event.
    ///
    /// This blocks until an event is available.
    pub async fn next_event(&self) -> GatewayEvent {
        loop {
            {
                let mut queue = self.pending_events.lock().await;
                if let Some(event) = queue.pop_front() {
                    return event;
                }
            }

            self.event_available.notified().await;
        }
    }

    /// Records a received completion report.
    pub async fn record_report(&self, report: ReceivedReport) {
        self.reports.lock().await.push(report);
        self.report_recorded.notify_waiters();
    }

    /// Records a readiness handshake.
    pub async fn record_ready(&self) {
        *self.ready_signals.lock().await += 1;
    }

    /// Number of readiness handshakes received so far.
    pub async fn ready_count(&self) -> u32 {
        *self.ready_signals.lock().await
    }

    /// Number of reports received so far.
    pub async fn report_count(&self) -> usize {
        self.reports.lock().await.len()
    }

    /// Snapshot of all received reports, in arrival order.
    pub async fn get_reports(&self) -> Vec<ReceivedReport> {
        self.reports.lock().await.clone()
    }

    /// Waits until another report is recorded.
    pub(crate) async fn wait_for_report_change(&self) {
        self.report_recorded.notified().await;
    }
}
