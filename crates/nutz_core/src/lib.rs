//! # nutz core
//!
//! Record access into a single embedded, transactional file through a
//! hierarchical path of buckets instead of one flat keyspace.
//!
//! This crate provides:
//! - [`Session`], the immutable result value every operation returns
//! - Five record operations: create, get, update, enumerate, delete
//! - [`Session::execute`] for custom bodies running in one transaction
//! - The namespace [`resolver`], walking bucket chains strictly or creating them
//! - [`lifecycle::with_transaction`], opening and closing the file around one transaction
//!
//! ## Example
//!
//! ```rust
//! use nutz_core::{ErrorKind, Session, StoreConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let session = Session::new(StoreConfig::new(dir.path().join("app.db")));
//!
//! // tenant > resource type > id
//! let s = session.create("acme", "42", b"widget", &["products"]);
//! assert_eq!(s.payload(), Some(&b"widget"[..]));
//!
//! // Bucket order is part of the address.
//! let s = s.get("products", "42", &["acme"]);
//! assert_eq!(s.last_error().map(|e| e.kind()), Some(ErrorKind::NamespaceNotFound));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod lifecycle;
pub mod ops;
mod path;
pub mod resolver;
mod session;

pub use config::{StoreConfig, DEFAULT_FILE_MODE};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use ops::{Entries, Outcome};
pub use path::{validate_key, NamespacePath};
pub use resolver::{open_root, resolve, resolve_chain, Walk};
pub use session::{Request, Session};

pub use nutz_storage::{Bucket, EngineOptions, StorageError, Transaction, TxMode};
