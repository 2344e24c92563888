//! dsviz-api-core: snapshot model, step records and the Computation Engine
//! wire contract (core, engine-agnostic).

pub mod engine;
pub mod json;
pub mod kind;
pub mod metric;
pub mod request;
pub mod snapshot;
pub mod step;

pub use engine::{call_engine, BufferId, CallError, ComputationEngine, EngineError, ResponseBuffer};
pub use json::{
    encode_error, encode_response, parse_response, EngineReply, EngineResponse, Outcome, WireError,
};
pub use kind::StructureKind;
pub use metric::Metric;
pub use request::{
    EngineRequest, GraphAlgorithm, GraphRequest, HashRequest, HeapRequest, TreeRequest,
};
pub use snapshot::{
    Bucket, GraphEdge, GraphSnapshot, HashSnapshot, HeapSnapshot, Key, Snapshot, TreeNode,
    TreeSnapshot,
};
pub use step::{
    EdgeSemantics, EntityStatus, FinalResult, PqEntry, RotationCase, StatusMark, StepRecord,
    SwapDirection,
};
