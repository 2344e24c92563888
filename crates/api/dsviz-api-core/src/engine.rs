//! Computation Engine contract.
//!
//! An engine executes one request synchronously and hands back an
//! engine-owned response buffer. The caller reads the buffer and must release
//! it exactly once, whatever happens while decoding it. [`ResponseBuffer`]
//! ties that release to scope exit.

use std::fmt;

use log::warn;
use thiserror::Error;

use crate::json::{parse_response, EngineReply, WireError};
use crate::request::EngineRequest;

/// Handle to an engine-allocated response buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buf#{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine failed to encode its response: {0}")]
    Encode(String),
    #[error("response buffer {0} is not readable")]
    Unreadable(BufferId),
}

pub trait ComputationEngine {
    /// Execute `request` and return the buffer holding the JSON response.
    fn invoke(&mut self, request: &EngineRequest) -> Result<BufferId, EngineError>;

    /// Borrow the text of a live buffer.
    fn read(&self, buffer: BufferId) -> Option<&str>;

    /// Free a buffer. Releasing an unknown buffer is a no-op.
    fn release(&mut self, buffer: BufferId);
}

/// Scoped ownership of one response buffer; releases it on drop.
pub struct ResponseBuffer<'e, E: ComputationEngine + ?Sized> {
    engine: &'e mut E,
    id: BufferId,
}

impl<'e, E: ComputationEngine + ?Sized> ResponseBuffer<'e, E> {
    pub fn acquire(engine: &'e mut E, request: &EngineRequest) -> Result<Self, EngineError> {
        let id = engine.invoke(request)?;
        Ok(Self { engine, id })
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn text(&self) -> Result<&str, EngineError> {
        self.engine.read(self.id).ok_or(EngineError::Unreadable(self.id))
    }
}

impl<E: ComputationEngine + ?Sized> Drop for ResponseBuffer<'_, E> {
    fn drop(&mut self) {
        self.engine.release(self.id);
    }
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Wire(#[from] WireError),
}

/// Invoke the engine, decode the reply and release the buffer on every path.
pub fn call_engine<E>(engine: &mut E, request: &EngineRequest) -> Result<EngineReply, CallError>
where
    E: ComputationEngine + ?Sized,
{
    let buffer = ResponseBuffer::acquire(engine, request)?;
    let reply = parse_response(buffer.text()?)?;
    drop(buffer);

    if let EngineReply::Ok(response) = &reply {
        if response.kind != request.kind() {
            warn!(
                "{} returned a {} response",
                request.symbol(),
                response.kind.wire_tag()
            );
            return Err(WireError::KindMismatch {
                expected: request.kind(),
                actual: response.kind,
            }
            .into());
        }
    }
    Ok(reply)
}
