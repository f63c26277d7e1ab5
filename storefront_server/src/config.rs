use std::{env, str::FromStr};

use log::*;
use storefront_common::{helpers::parse_boolean_flag, Cents};
use storefront_engine::reconciliation_objects::FulfillmentPolicy;
use stripe_tools::StripeConfig;

const DEFAULT_SFS_HOST: &str = "127.0.0.1";
const DEFAULT_SFS_PORT: u16 = 8360;
const DEFAULT_SFS_DATABASE_URL: &str = "sqlite://data/storefront.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Apply the embedded database migrations before accepting requests
    pub run_migrations: bool,
    pub stripe: StripeConfig,
    pub policy: FulfillmentPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SFS_HOST.to_string(),
            port: DEFAULT_SFS_PORT,
            database_url: DEFAULT_SFS_DATABASE_URL.to_string(),
            run_migrations: true,
            stripe: StripeConfig::default(),
            policy: FulfillmentPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("SFS_HOST").ok().unwrap_or_else(|| DEFAULT_SFS_HOST.into());
        let port = env_or_default("SFS_PORT", DEFAULT_SFS_PORT);
        let database_url = env::var("SFS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ SFS_DATABASE_URL is not set. Using {DEFAULT_SFS_DATABASE_URL}");
            DEFAULT_SFS_DATABASE_URL.to_string()
        });
        let run_migrations = parse_boolean_flag(env::var("SFS_RUN_MIGRATIONS").ok(), true);
        let stripe = StripeConfig::new_from_env_or_default();
        let policy = policy_from_env();
        Self { host, port, database_url, run_migrations, stripe, policy }
    }
}

fn policy_from_env() -> FulfillmentPolicy {
    let defaults = FulfillmentPolicy::default();
    let tax_rate_bps = env_or_default("SFS_TAX_RATE_BPS", defaults.tax_rate_bps);
    let standard_shipping =
        Cents::from(env_or_default("SFS_STANDARD_SHIPPING_CENTS", defaults.standard_shipping.value()));
    let free_shipping_threshold =
        Cents::from(env_or_default("SFS_FREE_SHIPPING_THRESHOLD_CENTS", defaults.free_shipping_threshold.value()));
    let default_country = env::var("SFS_DEFAULT_COUNTRY")
        .ok()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or(defaults.default_country);
    let policy = FulfillmentPolicy {
        tax_rate_bps,
        standard_shipping,
        free_shipping_threshold,
        shipping_line_name: defaults.shipping_line_name,
        default_country,
    };
    info!(
        "🪛️ Fulfillment policy: tax {}bps, standard shipping {}, free shipping from {}, default country {}",
        policy.tax_rate_bps, policy.standard_shipping, policy.free_shipping_threshold, policy.default_country
    );
    policy
}

fn env_or_default<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}
