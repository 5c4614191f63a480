//! Live query subscriptions built on store change events.
//!
//! # Invariants
//! - The event receiver is created before the first query, so no commit
//!   between subscribe and first read is lost.
//! - Queued events are coalesced into a single re-query.
//! - A lagged receiver re-queries instead of failing; snapshots are complete.
//! - Dropping a subscription unsubscribes it.

use super::events::StoreEvent;
use super::{EmployeeStore, StoreResult};
use crate::model::employee::{Employee, EmployeeId};
use log::debug;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::Receiver;

/// Subscription to the full employee list.
pub struct EmployeeListSubscription {
    store: EmployeeStore,
    events: Receiver<StoreEvent>,
    dirty: bool,
}

impl EmployeeListSubscription {
    pub(crate) fn new(store: EmployeeStore) -> Self {
        let events = store.subscribe_events();
        Self {
            store,
            events,
            dirty: true,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// Resolves immediately on the first call. Never completes on its own
    /// afterwards unless the table changes; cancel by dropping the future.
    pub async fn next(&mut self) -> StoreResult<Vec<Employee>> {
        if !self.dirty {
            wait_for_change(&mut self.events, |_| true).await;
            self.dirty = true;
        }
        let employees = self.store.load_all().await?;
        self.dirty = false;
        Ok(employees)
    }
}

/// Subscription to a single employee row.
pub struct EmployeeSubscription {
    store: EmployeeStore,
    id: EmployeeId,
    events: Receiver<StoreEvent>,
    dirty: bool,
    last: Option<Employee>,
}

impl EmployeeSubscription {
    pub(crate) fn new(store: EmployeeStore, id: EmployeeId) -> Self {
        let events = store.subscribe_events();
        Self {
            store,
            id,
            events,
            dirty: true,
            last: None,
        }
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    /// Waits until the row exists with contents different from the last
    /// emission, then yields it.
    ///
    /// Pends indefinitely while the id is absent.
    pub async fn next(&mut self) -> StoreResult<Employee> {
        loop {
            if !self.dirty {
                let id = self.id;
                wait_for_change(&mut self.events, |event| event.employee_id() == id).await;
                self.dirty = true;
            }

            let current = self.store.load_by_id(self.id).await?;
            self.dirty = false;
            match current {
                Some(employee) if self.last.as_ref() != Some(&employee) => {
                    self.last = Some(employee.clone());
                    return Ok(employee);
                }
                Some(_) => {}
                None => self.last = None,
            }
        }
    }
}

async fn wait_for_change(events: &mut Receiver<StoreEvent>, relevant: impl Fn(&StoreEvent) -> bool) {
    loop {
        match events.recv().await {
            Ok(event) if relevant(&event) => break,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                debug!("event=subscription_lagged module=store status=ok skipped={skipped}");
                break;
            }
            // The store handle held by the subscription keeps the sender alive.
            Err(RecvError::Closed) => std::future::pending::<()>().await,
        }
    }

    loop {
        match events.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
