//! pianoviz: instrument lineage trees laid out for drawing, linked to a sales chart.
//!
//! Layers:
//! - `domain`: lineage arena, builder, layout, selection, sales series
//! - `application`: dataset loading and the click-to-chart session
//! - `infrastructure`: I/O traits and the service container
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
