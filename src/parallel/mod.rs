//! Generic parallel execution
//!
//! This module owns system resources and execution: how many workers to run,
//! how they share a queue, and how they are told to stop. It knows nothing
//! about headers or compilers.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Client        │    │   Parallel       │    │   System        │
//! │   (Checker)     │───▶│   Module         │───▶│   Resources     │
//! │                 │    │                  │    │                 │
//! │ • Header list   │    │ • CPU cores      │    │ • Hardware      │
//! │ • Check logic   │    │ • Thread mgmt    │    │ • OS threads    │
//! │ • Reporting     │    │ • Stop signal    │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use header_checker::parallel::{StopSignal, WorkerPool};
//!
//! let pool = WorkerPool::new(WorkerPool::calculate_workers(0));
//! let processed = pool
//!     .run(vec![1, 2, 3], &StopSignal::new(), |item, _worker_id| {
//!         assert!(item > 0);
//!     })
//!     .unwrap();
//! assert_eq!(processed, 3);
//! ```

pub mod processor;

pub use processor::{StopSignal, WorkerPool};
