//! Form input → typed engine request, validated before any engine call.
//!
//! Each operation reads named fields. When a field is absent the shared
//! `value` field is used instead and the fallback is reported.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use dsviz_api_core::{
    EngineRequest, GraphAlgorithm, GraphRequest, HashRequest, HeapRequest, Key, StructureKind,
    TreeRequest,
};

use crate::error::OperationError;

/// Field every view exposes; used when an operation's own field is missing.
pub const SHARED_FIELD: &str = "value";

/// Largest accepted vertex, bucket or capacity count.
pub const MAX_SIZE: usize = 1024;

/// Raw field values as typed by the user, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputForm {
    fields: IndexMap<String, String>,
}

impl InputForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl ToString) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A validated request plus the fallback notices produced while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub request: EngineRequest,
    pub fallbacks: Vec<String>,
}

struct Reader<'a> {
    form: &'a InputForm,
    purpose: String,
    fallbacks: Vec<String>,
}

impl<'a> Reader<'a> {
    fn new(form: &'a InputForm, purpose: impl Into<String>) -> Self {
        Self {
            form,
            purpose: purpose.into(),
            fallbacks: Vec::new(),
        }
    }

    fn invalid(&self) -> OperationError {
        OperationError::InvalidInput(format!(
            "Please enter a valid number for {}.",
            self.purpose
        ))
    }

    fn raw(&mut self, field: &str) -> Option<&'a str> {
        if let Some(v) = self.form.get(field) {
            return Some(v);
        }
        let shared = self.form.get(SHARED_FIELD)?;
        self.fallbacks.push(format!(
            "Input field '{field}' not found for {}. Assuming shared input field.",
            self.purpose
        ));
        Some(shared)
    }

    fn int(&mut self, field: &str) -> Result<Key, OperationError> {
        let raw = self.raw(field).ok_or_else(|| self.invalid())?;
        raw.trim().parse::<Key>().map_err(|_| self.invalid())
    }

    /// A size in `1..=MAX_SIZE`.
    fn size(&mut self, field: &str) -> Result<usize, OperationError> {
        let n = self.int(field)?;
        let n = usize::try_from(n).ok().filter(|n| *n >= 1).ok_or_else(|| {
            OperationError::InvalidInput(format!(
                "{} size must be a positive number.",
                self.purpose
            ))
        })?;
        if n > MAX_SIZE {
            return Err(OperationError::InvalidInput(format!(
                "{} size must be at most {MAX_SIZE}.",
                self.purpose
            )));
        }
        Ok(n)
    }

    fn vertex(&mut self, field: &str) -> Result<u32, OperationError> {
        let n = self.int(field)?;
        u32::try_from(n).map_err(|_| {
            OperationError::InvalidInput(format!("Invalid vertex {n} for {}.", self.purpose))
        })
    }

    fn done(self, request: EngineRequest) -> Prepared {
        Prepared {
            request,
            fallbacks: self.fallbacks,
        }
    }
}

fn unknown(kind: StructureKind, op: &str) -> OperationError {
    OperationError::InvalidInput(format!(
        "Unknown operation '{op}' for {}.",
        kind.label()
    ))
}

/// Validate `form` for operation `op` on `kind`. `vertex_count` is the
/// current graph size, used to reject algorithm start vertices locally.
pub fn prepare(
    kind: StructureKind,
    op: &str,
    form: &InputForm,
    vertex_count: usize,
) -> Result<Prepared, OperationError> {
    let op = op.trim().to_ascii_lowercase();
    match kind {
        StructureKind::Tree => prepare_tree(&op, form),
        StructureKind::Graph => prepare_graph(&op, form, vertex_count),
        StructureKind::Hash => prepare_hash(&op, form),
        StructureKind::Heap => prepare_heap(&op, form),
    }
}

fn prepare_tree(op: &str, form: &InputForm) -> Result<Prepared, OperationError> {
    let tree = |r| EngineRequest::Tree(r);
    Ok(match op {
        "init" => Reader::new(form, "Initialization").done(tree(TreeRequest::Init)),
        "insert" => {
            let mut r = Reader::new(form, "Insertion");
            let value = r.int("value")?;
            r.done(tree(TreeRequest::Insert { value }))
        }
        "delete" => {
            let mut r = Reader::new(form, "Deletion");
            let value = r.int("key")?;
            r.done(tree(TreeRequest::Delete { value }))
        }
        "state" => Reader::new(form, "State").done(tree(TreeRequest::State)),
        other => return Err(unknown(StructureKind::Tree, other)),
    })
}

fn prepare_graph(op: &str, form: &InputForm, vertex_count: usize) -> Result<Prepared, OperationError> {
    let graph = |r| EngineRequest::Graph(r);
    if let Some(algorithm) = GraphAlgorithm::parse(op) {
        let mut r = Reader::new(form, algorithm.label());
        let start = r.vertex("start")?;
        if start as usize >= vertex_count {
            return Err(OperationError::InvalidInput("Invalid start node.".into()));
        }
        return Ok(r.done(graph(GraphRequest::Run { algorithm, start })));
    }
    Ok(match op {
        "init" => {
            let mut r = Reader::new(form, "Graph");
            let vertices = r.size("vertices")?;
            r.done(graph(GraphRequest::Init { vertices }))
        }
        "add_edge" => {
            let mut r = Reader::new(form, "Add Edge");
            let (from, to) = (r.vertex("from")?, r.vertex("to")?);
            let weight = r.int("weight")?;
            r.done(graph(GraphRequest::AddEdge { from, to, weight }))
        }
        "remove_edge" => {
            let mut r = Reader::new(form, "Remove Edge");
            let (from, to) = (r.vertex("from")?, r.vertex("to")?);
            r.done(graph(GraphRequest::RemoveEdge { from, to }))
        }
        "remove_vertex" => {
            let mut r = Reader::new(form, "Remove Vertex");
            let vertex = r.vertex("vertex")?;
            r.done(graph(GraphRequest::RemoveVertex { vertex }))
        }
        "state" => Reader::new(form, "State").done(graph(GraphRequest::State)),
        other => return Err(unknown(StructureKind::Graph, other)),
    })
}

fn prepare_hash(op: &str, form: &InputForm) -> Result<Prepared, OperationError> {
    fn keyed(
        form: &InputForm,
        purpose: &str,
        build: fn(Key) -> HashRequest,
    ) -> Result<Prepared, OperationError> {
        let mut r = Reader::new(form, purpose);
        let value = r.int("key")?;
        Ok(r.done(EngineRequest::Hash(build(value))))
    }

    match op {
        "init" => {
            let mut r = Reader::new(form, "Hash Table");
            let buckets = r.size("size")?;
            Ok(r.done(EngineRequest::Hash(HashRequest::Init { buckets })))
        }
        "insert" => keyed(form, "Insertion", |value| HashRequest::Insert { value }),
        "search" => keyed(form, "Search", |value| HashRequest::Search { value }),
        "delete" => keyed(form, "Deletion", |value| HashRequest::Delete { value }),
        "state" => Ok(Reader::new(form, "State").done(EngineRequest::Hash(HashRequest::State))),
        other => Err(unknown(StructureKind::Hash, other)),
    }
}

fn prepare_heap(op: &str, form: &InputForm) -> Result<Prepared, OperationError> {
    let heap = |r| EngineRequest::Heap(r);
    Ok(match op {
        "init" => {
            let mut r = Reader::new(form, "Heap");
            let capacity = r.size("capacity")?;
            r.done(heap(HeapRequest::Init { capacity }))
        }
        "insert" => {
            let mut r = Reader::new(form, "Insertion");
            let value = r.int("value")?;
            r.done(heap(HeapRequest::Insert { value }))
        }
        "extract" | "extract_min" => Reader::new(form, "Extraction").done(heap(HeapRequest::Extract)),
        "state" => Reader::new(form, "State").done(heap(HeapRequest::State)),
        other => return Err(unknown(StructureKind::Heap, other)),
    })
}
