//! Data layer: core types, loading, and sample extraction.
//!
//! Architecture:
//! ```text
//!  .csv / .txt / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse source → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  named, typed columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  sample   │  select x/y, drop missing rows → SampleVectors
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod sample;
