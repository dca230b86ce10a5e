//! # Storage Module
//!
//! Disk-backed feature state using redb.
//!
//! Uses the redb embedded database for:
//! - ACID transactions (one write transaction per state change)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)

mod redb_repository;

pub use redb_repository::RedbStateRepository;
