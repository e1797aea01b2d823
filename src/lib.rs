// docscreen: screening pipeline for academic document submissions.
//
// This is the library root. Each module corresponds to a stage of the
// pipeline or one of its collaborators:
//   extract -> analysis (preview) / similarity (submission) -> pipeline
// with db as the persistence collaborator and corpus as its read-only view.

pub mod analysis;
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod similarity;
