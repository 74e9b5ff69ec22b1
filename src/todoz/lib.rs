//! # Todoz Architecture
//!
//! Todoz is a scripted walkthrough of a document store API: it builds todo
//! records, pushes them through every store operation, and renders each
//! response into a display surface. The store itself is an external
//! collaborator reached through the [`store::DocStore`] trait; the only
//! implementation shipped here is an in-memory double for the demo and tests.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args/print, wired by main.rs)                   │
//! │  - Parses flags, prints the message log and todo listing    │
//! │  - The ONLY place that touches stdout directly              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Driver (demo.rs)                                           │
//! │  - Runs the put/del/get/all_docs/query sequence             │
//! │  - Catches every store failure and logs it; never escalates │
//! └─────────────────────────────────────────────────────────────┘
//!                │                            │
//!                ▼                            ▼
//! ┌──────────────────────────┐  ┌─────────────────────────────┐
//! │  Store contract (store/) │  │  Renderer (render.rs)       │
//! │  - DocStore trait        │  │  - DisplaySurface, injected │
//! │  - InMemoryStore double  │  │  - Cycle-safe serialization │
//! └──────────────────────────┘  └─────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `demo.rs` inward, code returns structured results ([`demo::DemoReport`],
//! [`messages::OpMessage`]) instead of printing. The renderer writes only
//! through whatever [`render::DisplaySurface`] the caller hands in, so every
//! path is testable against an in-memory buffer.
//!
//! ## Module Overview
//!
//! - [`demo`]: the scripted driver sequence
//! - [`store`]: the store contract and the in-memory double
//! - [`render`]: display surfaces and response rendering
//! - [`value`]: the shared-node value tree the renderer serializes
//! - [`model`]: the `TodoItem` record and its factory
//! - [`messages`]: structured driver diagnostics
//! - [`error`]: error types

pub mod demo;
pub mod error;
pub mod messages;
pub mod model;
pub mod render;
pub mod store;
pub mod value;
