//! dsviz-orchestrator
//!
//! Ties the pieces together for a host: one [`Session`] owns the engine, a
//! workbench per structure, the shared timer queue and the status log. Hosts
//! submit form operations, pump [`Session::update`] from their frame loop and
//! draw the returned [`Frame`].

pub mod error;
pub mod input;
pub mod render;
pub mod status;
pub mod workbench;

use anyhow::Result;
use hashbrown::HashMap;
use log::{debug, info, warn};
use std::time::Duration;

use dsviz_animation_core::{AnyTracker, Config, Pacing, TimerQueue};
use dsviz_api_core::{call_engine, ComputationEngine, EngineReply, Snapshot, StructureKind};
use dsviz_engine::ReferenceEngine;
use dsviz_layout_core::LayoutCache;

pub use crate::error::OperationError;
pub use crate::input::{InputForm, Prepared};
pub use crate::render::{Appearance, EdgeStyle, Frame, Renderer, TextRenderer};
pub use crate::status::{Severity, StatusLine, StatusLog};
pub use crate::workbench::Workbench;

pub struct Session {
    engine: Box<dyn ComputationEngine>,
    timers: TimerQueue<StructureKind>,
    workbenches: HashMap<StructureKind, Workbench>,
    active: StructureKind,
    status: StatusLog,
    config: Config,
}

impl Session {
    pub fn new(engine: Box<dyn ComputationEngine>, config: Config) -> Self {
        let workbenches = StructureKind::ALL
            .into_iter()
            .map(|kind| {
                let bench = Workbench::new(kind, *config.structure(kind), config.layout.clone());
                (kind, bench)
            })
            .collect();
        Self {
            engine,
            timers: TimerQueue::new(),
            workbenches,
            active: StructureKind::Tree,
            status: StatusLog::new(config.status_capacity),
            config,
        }
    }

    /// Session backed by the in-process reference engine.
    pub fn with_reference_engine(config: Config) -> Self {
        Self::new(Box::new(ReferenceEngine::new()), config)
    }

    /// Reference-engine session from a JSON config; missing keys take defaults.
    pub fn from_config_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(Self::with_reference_engine(config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn active(&self) -> StructureKind {
        self.active
    }

    pub fn workbench(&self, kind: StructureKind) -> Option<&Workbench> {
        self.workbenches.get(&kind)
    }

    pub fn snapshot(&self, kind: StructureKind) -> Option<&Snapshot> {
        self.workbench(kind).map(Workbench::snapshot)
    }

    pub fn status(&self) -> &StatusLog {
        &self.status
    }

    /// True while any structure is animating.
    pub fn is_busy(&self) -> bool {
        self.workbenches.values().any(Workbench::is_running)
    }

    /// Show another structure. Running animations keep going in the background.
    pub fn switch_view(&mut self, kind: StructureKind) {
        if self.active != kind {
            debug!("view {} -> {}", self.active, kind);
        }
        self.active = kind;
        self.status.clear();
    }

    /// Validate and run operation `op` on `kind`. Rejected operations are
    /// reported on the status log and leave every structure unchanged.
    pub fn submit(
        &mut self,
        kind: StructureKind,
        op: &str,
        form: &InputForm,
    ) -> Result<(), OperationError> {
        let result = self.try_submit(kind, op, form);
        if let Err(err) = &result {
            warn!("{kind} {op}: {err}");
            self.status.push(err.severity(), err.to_string());
        }
        result
    }

    fn try_submit(
        &mut self,
        kind: StructureKind,
        op: &str,
        form: &InputForm,
    ) -> Result<(), OperationError> {
        if self.is_busy() {
            return Err(OperationError::Busy);
        }
        let (vertex_count, initialized) = self
            .workbench(kind)
            .map_or((0, false), |b| (b.vertex_count(), b.is_initialized()));

        let prepared = input::prepare(kind, op, form, vertex_count)?;
        for note in &prepared.fallbacks {
            self.status.push(Severity::Warn, note.clone());
        }
        let request = prepared.request;
        let is_init = op.trim().eq_ignore_ascii_case("init");
        if !initialized && !is_init {
            return Err(OperationError::NotInitialized(kind));
        }

        let response = match call_engine(self.engine.as_mut(), &request)? {
            EngineReply::Ok(response) => response,
            EngineReply::Error { reason, .. } => return Err(OperationError::Engine(reason)),
        };

        let bench = self.workbenches.entry(kind).or_insert_with(|| {
            Workbench::new(kind, *self.config.structure(kind), self.config.layout.clone())
        });

        if request.is_state_query() {
            bench.show_state(response);
            self.status
                .push(Severity::Info, format!("{} state loaded.", kind.label()));
            return Ok(());
        }

        let action = match response.value {
            Some(value) => format!("Action: {} -> Value: {value}", response.action.to_uppercase()),
            None => format!("Action: {}", response.action.to_uppercase()),
        };
        bench
            .begin(&request, response, &mut self.timers)
            .map_err(|_| OperationError::Busy)?;
        self.status.push(Severity::Success, action);
        info!("{kind}: {}", request.symbol());
        Ok(())
    }

    /// Advance the clock by `dt`, apply every due tick and return the frame
    /// of the active view.
    pub fn update(&mut self, dt: Duration) -> Frame {
        self.timers.advance(dt);
        while let Some((_, kind)) = self.timers.pop_due() {
            if let Some(bench) = self.workbenches.get_mut(&kind) {
                bench.on_timer(&mut self.timers, &mut self.status);
            }
        }
        self.frame()
    }

    /// Apply one step of the active view's run under manual pacing. Returns
    /// whether a step (or the completion) was applied.
    pub fn step_now(&mut self) -> bool {
        let Some(bench) = self.workbenches.get_mut(&self.active) else {
            return false;
        };
        if bench.config().pacing != Pacing::Manual {
            return false;
        }
        bench.step_now(&mut self.status)
    }

    pub fn frame(&mut self) -> Frame {
        self.frame_for(self.active)
    }

    pub fn frame_for(&mut self, kind: StructureKind) -> Frame {
        match self.workbenches.get_mut(&kind) {
            Some(bench) => bench.frame(),
            None => render::render_frame(
                &Snapshot::empty(kind),
                &AnyTracker::for_kind(kind),
                &mut LayoutCache::new(self.config.layout.clone()),
                self.config.structure(kind).canvas,
            ),
        }
    }

    /// Auxiliary container line of the active view, e.g. `BFS Queue: [1, 2]`.
    pub fn aux_line(&self) -> Option<String> {
        self.workbench(self.active)
            .and_then(|b| b.tracker().aux())
            .map(ToString::to_string)
    }
}
