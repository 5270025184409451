// NP Taxonomy Core Library
//
// Normalizes nurse-practitioner specialty labels and infers missing ones
// from free-text credentials. Main interface is `TaxonomyProcessor`, which
// runs the two-pass fill and the canonicalization passes over a `Dataset`.

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fields;
pub mod mapper;
pub mod normalizer;
pub mod observed;
pub mod orchestrator;
pub mod processor;
pub mod report;
pub mod rules;
pub mod selector;
pub mod types;

// Re-export main types and functions for easy use
pub use classifier::BucketClassifier;
pub use config::TaxonomyConfig;
pub use dataset::Dataset;
pub use error::{TaxonomyError, TaxonomyResult};
pub use mapper::{CanonicalMapper, Mapping, MappingSource};
pub use normalizer::normalize;
pub use observed::ObservedLabelSet;
pub use orchestrator::{FillEngine, FillOrchestrator};
pub use processor::{StandardizeColumns, StepProfiler, TaxonomyProcessor, STANDARDIZED_COLUMN};
pub use report::{ColumnReport, FillReport, StandardizeReport};
pub use selector::NearestLabelSelector;
pub use types::*;
