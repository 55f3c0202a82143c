//! In-memory SQLite database layer for agronomic climate records.
//!
//! Loads the aggregated daily dataset (CSV shards, optionally gzipped) into
//! an in-memory SQLite database and exposes typed queries for the dashboard:
//! years, cascading filter options, and filtered daily records.
//!
//! # Usage
//!
//! ```rust
//! use agro_core::filter::FilterState;
//! use agro_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_daily_records("year,date,Cluster,Block,Culture,mean\n2024,2024-06-01,North,B1,Wheat,18.5\n").unwrap();
//!
//! let options = db.query_filter_options(&FilterState::default()).unwrap();
//! assert_eq!(options.clusters, vec!["North".to_string()]);
//! let records = db.query_records(&FilterState::default()).unwrap();
//! assert_eq!(records.len(), 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding the loaded daily records.
///
/// Cheaply cloneable via `Rc`; every clone shares one connection. The
/// dashboard is single-threaded, so no locking is involved.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
