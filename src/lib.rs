//! # FitGenie
//!
//! Backend for the FitGenieAI fitness assistant: an exercise catalog, a
//! rule-based workout generator, and a coach that answers free-text
//! questions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ CSV / JSON  │──▶│   Catalog    │──▶│ Embedding index  │
//! │  dataset    │   │  (in memory) │   │ (optional)       │
//! └─────────────┘   └──────┬───────┘   └────────┬─────────┘
//!                          │                    │
//!              ┌───────────┴──────┐     ┌───────┴──────┐
//!              ▼                  ▼     ▼              │
//!        ┌───────────┐      ┌───────────────┐          │
//!        │  Workout  │      │     Coach     │◀─────────┘
//!        │ generator │      │ rules / RAG   │
//!        └─────┬─────┘      └───────┬───────┘
//!              └────────┬───────────┘
//!                       ▼
//!              ┌────────────────┐
//!              │  CLI  /  HTTP  │
//!              └────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Domain errors |
//! | [`loader`] | CSV and JSON catalog loading |
//! | [`catalog`] | Exercise listing and lookup |
//! | [`workout`] | Workout generation |
//! | [`calories`] | MET-based calorie estimate |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | Catalog embedding index and ranking |
//! | [`coach`] | Coach answers |
//! | [`context`] | Shared application state |
//! | [`server`] | HTTP API |

pub mod calories;
pub mod catalog;
pub mod coach;
pub mod config;
pub mod context;
pub mod embedding;
pub mod error;
pub mod index;
pub mod loader;
pub mod models;
pub mod server;
pub mod workout;
