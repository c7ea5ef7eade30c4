//! Experiment workflow for Prompt Lab
//!
//! Builds prompt variants from a dataset, runs prompting methods against an
//! [`LlmClient`](prompt_lab_client::LlmClient), persists scored predictions as
//! CSV, and derives analysis summaries and an HTML report. Work is organised
//! into [`Stage`]s executed in order by a [`Pipeline`].

pub mod dataset;
pub mod error;
pub mod methods;
pub mod pipeline;
pub mod report;
pub mod results;
pub mod stages;

pub use dataset::*;
pub use error::*;
pub use methods::*;
pub use pipeline::*;
pub use report::*;
pub use results::*;
pub use stages::*;
