//! # nutz storage
//!
//! Binding between nutz and its embedded engine ([redb](https://docs.rs/redb)).
//!
//! This crate is the only place that touches the engine. It exposes the
//! small set of primitives the façade is built from:
//!
//! - [`Engine::open`] opens the backing file with a file mode and [`EngineOptions`]
//! - [`Engine::begin`] starts a [`Transaction`] in a [`TxMode`]
//! - [`Transaction::bucket`] and [`Transaction::create_bucket_if_not_exists`]
//!   walk nested buckets one level at a time
//! - [`Transaction::put`], [`Transaction::get`], [`Transaction::delete`] and
//!   [`Transaction::for_each`] act on the entries of one bucket
//!
//! ## Bucket layout
//!
//! Every bucket chain gets its own engine table, named after the chain.
//! A bucket's table holds only its direct entries, so nested buckets are
//! never visited by [`Transaction::for_each`] on their parent. Names and
//! values pass through unmodified.
//!
//! One extra table lists the name of every bucket table. Write transactions
//! use it to look buckets up with a single key search; read transactions
//! open the bucket's table directly.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bucket;
mod engine;
mod error;
mod options;
mod transaction;

pub use bucket::Bucket;
pub use engine::{remove_file, Engine};
pub use error::{StorageError, StorageResult};
pub use options::EngineOptions;
pub use transaction::{Transaction, TxMode};
