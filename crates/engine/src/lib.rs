//! NPC Forge engine library.
//!
//! Server-side code for D&D NPC generation and record management.
//!
//! ## Structure
//!
//! - `use_cases/` - Generation pipeline and NPC/campaign lifecycles
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
