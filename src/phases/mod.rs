//! The stages of a catalog generation run.
//!
//! ## Overview
//!
//! A run goes through four stages:
//! 1. Locate - find the field-mapping configuration and the owner table
//! 2. Compose - build one component entity per eligible, owned project
//! 3. Group synthesis - build one group entity per Backstage group
//!    (see [`crate::owners::synthesize_groups`])
//! 4. Emit - serialize both entity lists and write them out
//!
//! [`orchestrator::run`] drives the stages in order.

pub mod compose;
pub mod emit;
pub mod locate;
pub mod orchestrator;
