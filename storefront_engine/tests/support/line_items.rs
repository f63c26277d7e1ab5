use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
        Mutex,
    },
};

use storefront_common::Cents;
use storefront_engine::{
    reconciliation_objects::PaidLineItem,
    traits::{LineItemSource, LineItemSourceError},
};

/// A line item source that serves canned responses. Clones share their state, so a test can keep a handle after
/// giving one to the API.
#[derive(Debug, Clone, Default)]
pub struct StaticLineItems {
    sessions: Arc<Mutex<HashMap<String, Vec<PaidLineItem>>>>,
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl StaticLineItems {
    pub fn add_session(&self, session_id: &str, items: Vec<PaidLineItem>) {
        self.sessions.lock().unwrap().insert(session_id.to_string(), items);
    }

    pub fn push_line(&self, session_id: &str, item: PaidLineItem) {
        self.sessions.lock().unwrap().entry(session_id.to_string()).or_default().push(item);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LineItemSource for StaticLineItems {
    async fn fetch_line_items(&self, session_id: &str) -> Result<Vec<PaidLineItem>, LineItemSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(LineItemSourceError::new(session_id, "provider unavailable"));
        }
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .ok_or_else(|| LineItemSourceError::new(session_id, "no such session"))
    }
}

pub fn product_line(name: &str, product_ref: &str, quantity: i64, amount: i64) -> PaidLineItem {
    PaidLineItem::new(name, quantity, Cents::from(amount)).with_product_ref(product_ref)
}

pub fn shipping_line(amount: i64) -> PaidLineItem {
    PaidLineItem::new("Shipping", 1, Cents::from(amount))
}
