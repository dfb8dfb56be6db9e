//! # Event Registry Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks (subscribe, publish fan-out)
//! └── src/
//!     └── integration/  # Behavior through the public API only
//!         ├── properties.rs   # Observable guarantees of publish/subscribe
//!         └── concurrency.rs  # Racing subscribe/unsubscribe/publish
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p registry-tests
//!
//! # By category
//! cargo test -p registry-tests integration::properties::
//! cargo test -p registry-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p registry-tests
//! ```
