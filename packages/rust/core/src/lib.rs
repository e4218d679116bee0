//! Core pipeline orchestration and domain logic for CaseScout.
//!
//! This crate ties research, use-case derivation, dataset lookup, and
//! proposal assembly into the end-to-end generation run.

pub mod pipeline;
pub mod proposal;
pub mod resource;
pub mod usecase;

pub use pipeline::{PROPOSAL_FILE, RESOURCES_FILE, RunConfig, RunOutcome, Stages, run};
pub use proposal::{create_proposal, save_proposal};
pub use resource::{DatasetFinder, render_resources, save_resources};
pub use usecase::{generate_use_cases, refine_use_cases};
