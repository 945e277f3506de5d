//! Record domain model.
//!
//! # Responsibility
//! - Define the closed set of record kinds and their declared field schemas.
//! - Define the record shape shared by the store and the console.
//!
//! # Invariants
//! - Every record carries a kind from the closed registry.
//! - `id`, `created_at`, `updated_at` and the class discriminator are never
//!   stored in the open attribute bag.

pub mod record;
pub mod render;
pub mod schema;
