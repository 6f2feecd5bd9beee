//! # Rules Module
//!
//! Converts the plain text manifest into qBittorrent RSS download rules.
//!
//! A manifest line reads `search term|title|save path`. Only the search term
//! is required; the title defaults to the search term and the save path to a
//! directory named after the title inside the platform's download directory.
//!
//! ```text
//! hunter x hunter|Hunter x Hunter|/home/me/Videos/Hunter x Hunter
//! frieren
//! ```
//!
//! The rendered file is a JSON object keyed by rule title, in manifest order,
//! which qBittorrent imports from its RSS downloader dialog.

mod manifest;
mod render;

pub use manifest::{format_manifest, parse_manifest};
pub use render::{OutputPlan, Platform, ResolvedEntry, Rule, RuleSet, plan_outputs, render, resolve};
