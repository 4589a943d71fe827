#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Micro LRU is a lightweight cache library for Rust. It provides an
//! in-memory, non-thread-safe cache implementation for single thread
//! applications.
//!
//! The cache is bounded by a *weighted size* budget rather than an entry
//! count: every key and value reports a logical size through the
//! [`Weigh`][weigh-trait] trait, and whenever the total charged size exceeds
//! the configured budget, entries are evicted in Least Recently Used (LRU)
//! order until the cache fits again.
//!
//! # Features
//!
//! - A cache can be bounded by the total weighted size of its entries, or
//!   left unbounded.
//! - Reads and writes promote the touched entry to the most-recently-used
//!   position; eviction always removes the least-recently-used entry first.
//! - An optional eviction listener observes every evicted key/value pair,
//!   in eviction order.
//! - All operations are O(1) amortized; the recency order is kept in an
//!   arena-backed deque with stable handles, so no `unsafe` pointer chasing
//!   is involved.
//!
//! # Examples
//!
//! See the following document:
//!
//! - A not thread-safe, blocking cache for single threaded applications:
//!     - [`unsync::Cache`][unsync-cache-struct]
//!
//! [weigh-trait]: ./trait.Weigh.html
//! [unsync-cache-struct]: ./unsync/struct.Cache.html
//!
//! # Minimum Supported Rust Versions
//!
//! This crate's minimum supported Rust version (MSRV) is Rust 1.76.0.
//! Increasing MSRV is _not_ considered a semver-breaking change.

pub(crate) mod common;
pub(crate) mod policy;
pub(crate) mod weigh;
pub mod unsync;

pub use policy::Policy;
pub use weigh::Weigh;

#[cfg(doctest)]
mod doctests {
    // https://doc.rust-lang.org/rustdoc/write-documentation/documentation-tests.html#include-items-only-when-collecting-doctests
    #[doc = include_str!("../README.md")]
    struct ReadMeDoctests;
}
