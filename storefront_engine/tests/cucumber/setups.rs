use cucumber::given;
use storefront_common::Cents;
use storefront_engine::reconciliation_objects::PaidSession;

use crate::{
    cucumber::{world::FulfillmentSystem, StorefrontWorld},
    support::prepare_env::seed_product,
};

#[given("a fresh install")]
async fn fresh_database(world: &mut StorefrontWorld) {
    let system = FulfillmentSystem::new().await;
    world.system = Some(system);
}

#[given(expr = "product {word} named {string} priced at {int} cents with {int} in stock")]
async fn catalog_product(world: &mut StorefrontWorld, id: String, name: String, price: i64, stock: i64) {
    seed_product(world.system().api.db(), &id, &name, price, stock).await;
}

#[given(expr = "checkout session {word} from {string} for {string} was charged {int} cents")]
async fn paid_session(world: &mut StorefrontWorld, session_id: String, name: String, email: String, total: i64) {
    let mut session = PaidSession::new(session_id.clone());
    session.payment_id = Some(format!("pi_{session_id}"));
    session.metadata.name = Some(name);
    session.metadata.email = Some(email);
    session.amount_total = Some(Cents::from(total));
    world.system().line_items.add_session(&session_id, vec![]);
    world.sessions.insert(session_id, session);
}

#[given(expr = "session {word} ships to {string}, {string}, {string} {string}")]
async fn ships_to(world: &mut StorefrontWorld, session_id: String, street: String, city: String, state: String, zip: String) {
    let session = world.session_mut(&session_id);
    session.metadata.street = Some(street);
    session.metadata.city = Some(city);
    session.metadata.state = Some(state);
    session.metadata.zip_code = Some(zip);
}

#[given(expr = "session {word} has no customer email")]
async fn no_email(world: &mut StorefrontWorld, session_id: String) {
    world.session_mut(&session_id).metadata.email = None;
}
