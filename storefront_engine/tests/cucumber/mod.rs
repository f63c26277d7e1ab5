mod setups;
mod world;

pub use world::StorefrontWorld;
