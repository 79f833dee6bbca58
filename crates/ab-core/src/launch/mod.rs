//! Launch configuration model, synthesis, and persistence

pub mod document;
pub mod model;
pub mod synth;

pub use document::{
    EntryCounts, LaunchDocument, MergeSummary, WriteOutcome, WriteReport, write_launch_file,
};
pub use model::{
    CompoundConfiguration, Connection, DebugAdapter, Endpoint, LaunchConfiguration, LaunchSet,
    PathMapping, RequestKind, TargetKind,
};
pub use synth::{
    COMPOUND_NAME, NATIVE_ATTACH_NAME, PYTHON_ATTACH_NAME, PYTHON_STANDALONE_NAME, Synthesizer,
    ValidationError, synthesize, validate, validate_port,
};
