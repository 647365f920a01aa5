//! Leadhunter: AI-assisted prospect discovery and outreach drafting.
//!
//! Finds local service businesses whose map reviews show customer-service
//! failures, scores them, estimates what the failures cost, and drafts
//! persona-bound outreach. All reasoning happens in the external generation
//! service; this crate owns the record model, the request/response contract,
//! and the in-memory session pipeline around it.
//!
//! See `DESIGN.md` for the architecture notes.

pub mod config;
pub mod credentials;
pub mod logging;
pub mod model;
pub mod providers;

pub mod gateway;
pub mod orchestrator;

pub mod access;
pub mod campaign;
pub mod catalog;
pub mod export;
