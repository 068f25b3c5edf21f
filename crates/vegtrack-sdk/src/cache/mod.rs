//! Durable local persistence for the entry list

mod store;

pub use store::EntryCache;
