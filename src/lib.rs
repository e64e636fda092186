pub mod channel;
pub mod config;
pub mod errors;
pub mod feed;
pub mod filter;
pub mod models;
pub mod resolver;
pub mod slug;
pub mod store;

pub use errors::{FeedError, ResolveError, SlugError};
pub use filter::{FilterCriteria, SportFilter};
pub use models::Event;
pub use store::EventStore;
