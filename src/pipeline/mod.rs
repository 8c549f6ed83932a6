//! The transcription pipeline: decode → resample → chunk → encode →
//! stream → assemble.

pub mod assembler;
pub mod chunker;
pub mod encoder;
pub mod orchestrator;
pub mod progress;
pub mod types;

pub use assembler::SegmentAssembler;
pub use chunker::Chunker;
pub use encoder::encode_chunk;
pub use orchestrator::{Pipeline, transcribe};
pub use progress::ProgressReporter;
pub use types::{TranscriptEvent, TranscriptionSegment, WireChunk};
