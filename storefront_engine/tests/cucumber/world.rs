use std::collections::HashMap;

use cucumber::World;
use log::*;
use storefront_engine::{
    reconciliation_objects::{FulfillmentPolicy, PaidLineItem, PaidSession, ReconciliationOutcome},
    FulfillmentDatabase,
    ReconciliationApi,
    ReconciliationError,
    SqliteDatabase,
};

use crate::support::{line_items::StaticLineItems, prepare_env::prepare_test_env};

#[derive(Default, Debug, World)]
pub struct StorefrontWorld {
    pub system: Option<FulfillmentSystem>,
    pub sessions: HashMap<String, PaidSession>,
    pub last_result: Option<Result<ReconciliationOutcome, ReconciliationError>>,
}

#[derive(Debug)]
pub struct FulfillmentSystem {
    pub db_path: String,
    pub api: ReconciliationApi<SqliteDatabase, StaticLineItems>,
    pub line_items: StaticLineItems,
}

impl FulfillmentSystem {
    pub async fn new() -> Self {
        let db = prepare_test_env().await;
        let db_path = db.url().to_string();
        debug!("🥒️ Created database: {db_path}");
        let line_items = StaticLineItems::default();
        let api = ReconciliationApi::new(db, line_items.clone(), FulfillmentPolicy::default());
        Self { db_path, api, line_items }
    }
}

impl StorefrontWorld {
    pub fn system(&self) -> &FulfillmentSystem {
        self.system.as_ref().expect("Fulfillment system not initialised")
    }

    pub fn session_mut(&mut self, session_id: &str) -> &mut PaidSession {
        self.sessions.get_mut(session_id).unwrap_or_else(|| panic!("Session {session_id} has not been set up"))
    }

    pub fn add_line(&mut self, session_id: &str, line: PaidLineItem) {
        self.system().line_items.push_line(session_id, line);
    }
}
