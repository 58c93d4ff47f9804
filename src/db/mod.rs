//! Document store layer
//!
//! MongoDB-backed collections plus the school query helpers.

pub mod collection;
pub mod memory;
pub mod mongo;
pub mod schools;

pub use collection::{DocumentCollection, UpdateSummary};
pub use memory::MemoryCollection;
pub use mongo::{MongoClient, MongoCollection};
pub use schools::{insert_school, list_all, schools_by_topic, update_topics};
