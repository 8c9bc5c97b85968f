#![forbid(unsafe_code)]

//! Deterministic session recording and replay.
//!
//! [`SessionRecorder`] wraps a [`StepRunner`] and logs every host event, clock
//! change, theme switch and step, with a checksum for each step that composed
//! a frame. [`replay`] feeds the records through a fresh runner and reports
//! the first step whose outcome differs.
//!
//! # Determinism contract
//!
//! Given the same records, the same [`EngineConfig`] and the same build,
//! replay produces identical frame checksums. This holds because time only
//! moves through recorded clock records, events only arrive from the trace,
//! per-mount jitter is seeded from the header, and replay steps exactly where
//! the recording stepped. Steps that compose nothing still poll the pointer
//! sampler and the viewport debounce, so they are recorded as
//! [`TraceRecord::Step`].

use core::time::Duration;

use driftfield_core::event::HostEvent;
use driftfield_runtime::{EngineConfig, Frame, Theme};

use crate::step::{StepResult, StepRunner};

// FNV-1a 64-bit.
const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a64_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fnv1a64_u64(hash: u64, v: u64) -> u64 {
    fnv1a64_bytes(hash, &v.to_le_bytes())
}

fn fnv1a64_f64(hash: u64, v: f64) -> u64 {
    fnv1a64_u64(hash, v.to_bits())
}

fn fnv1a64_pair(prev: u64, next: u64) -> u64 {
    fnv1a64_u64(fnv1a64_u64(FNV_OFFSET_BASIS, prev), next)
}

/// Checksum of everything a frame draws.
#[must_use]
pub fn frame_checksum(frame: &Frame) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    h = fnv1a64_f64(h, frame.viewport.width);
    h = fnv1a64_f64(h, frame.viewport.height);
    h = fnv1a64_f64(h, frame.layer_opacity);
    h = fnv1a64_f64(h, frame.backdrop.blend);
    h = fnv1a64_bytes(h, frame.backdrop.from.to_string().as_bytes());
    h = fnv1a64_bytes(h, frame.backdrop.to.to_string().as_bytes());
    if let Some(glow) = &frame.glow {
        h = fnv1a64_f64(h, glow.position.x);
        h = fnv1a64_f64(h, glow.position.y);
        h = fnv1a64_f64(h, glow.scale);
        h = fnv1a64_f64(h, glow.opacity);
    }
    for node in &frame.nodes {
        h = fnv1a64_bytes(h, node.id.as_str().as_bytes());
        h = fnv1a64_bytes(h, node.color.to_string().as_bytes());
        h = fnv1a64_f64(h, node.left);
        h = fnv1a64_f64(h, node.top);
        h = fnv1a64_f64(h, node.translate.x);
        h = fnv1a64_f64(h, node.translate.y);
        h = fnv1a64_f64(h, node.rotation_deg);
        h = fnv1a64_f64(h, node.scale);
        h = fnv1a64_f64(h, node.opacity);
        h = fnv1a64_u64(h, node.z_index as u64);
    }
    h
}

/// A single record in a session trace.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    /// Session header (must be first).
    Header {
        seed: u64,
        width: f64,
        height: f64,
        theme: Theme,
    },
    /// Host event queued at a timestamp.
    Input { ts_ns: u64, event: HostEvent },
    /// Theme switch at a timestamp.
    Theme { ts_ns: u64, theme: Theme },
    /// Clock moved to `ts_ns`.
    Tick { ts_ns: u64 },
    /// Step at `ts_ns` that composed no frame.
    Step { ts_ns: u64 },
    /// Step that composed a frame, with its checkpoint.
    Frame {
        frame_idx: u64,
        ts_ns: u64,
        checksum: u64,
        checksum_chain: u64,
    },
    /// Trace summary (must be last).
    Summary {
        total_frames: u64,
        final_checksum_chain: u64,
    },
}

/// A complete recorded session.
#[derive(Debug, Clone)]
pub struct SessionTrace {
    pub records: Vec<TraceRecord>,
}

impl SessionTrace {
    /// Number of frame checkpoints.
    pub fn frame_count(&self) -> u64 {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Frame { .. }))
            .count() as u64
    }

    /// Final checksum chain from the summary record.
    pub fn final_checksum_chain(&self) -> Option<u64> {
        self.records.iter().rev().find_map(|r| match r {
            TraceRecord::Summary {
                final_checksum_chain,
                ..
            } => Some(*final_checksum_chain),
            _ => None,
        })
    }
}

fn ts_ns(at: Duration) -> u64 {
    u64::try_from(at.as_nanos()).unwrap_or(u64::MAX)
}

/// Records a session for deterministic replay.
pub struct SessionRecorder {
    runner: StepRunner,
    records: Vec<TraceRecord>,
    checksum_chain: u64,
}

impl SessionRecorder {
    /// Start a recording over a window of the given size. The engine's seed
    /// and theme go into the header.
    #[must_use]
    pub fn new(config: EngineConfig, width: f64, height: f64, theme: Theme) -> Self {
        let records = vec![TraceRecord::Header {
            seed: config.seed,
            width,
            height,
            theme,
        }];
        Self {
            runner: StepRunner::new(config, width, height).with_theme(theme),
            records,
            checksum_chain: 0,
        }
    }

    /// Mount the engine at time zero.
    pub fn init(&mut self) {
        self.runner.mount();
    }

    /// Record and queue `event` at `ts_ns`.
    pub fn push_event(&mut self, ts_ns: u64, event: HostEvent) {
        self.records.push(TraceRecord::Input { ts_ns, event });
        self.runner.set_time(Duration::from_nanos(ts_ns));
        self.runner.push_event(event);
    }

    /// Record a theme switch at `ts_ns`.
    pub fn set_theme(&mut self, ts_ns: u64, theme: Theme) {
        self.records.push(TraceRecord::Theme { ts_ns, theme });
        self.runner.set_time(Duration::from_nanos(ts_ns));
        self.runner.set_theme(theme);
    }

    /// Record the clock moving to `ts_ns`.
    pub fn advance_to(&mut self, ts_ns: u64) {
        self.records.push(TraceRecord::Tick { ts_ns });
        self.runner.set_time(Duration::from_nanos(ts_ns));
    }

    /// Step once and record it, with a checkpoint if a frame was composed.
    pub fn step(&mut self) -> StepResult {
        let result = self.runner.step();
        if result.rendered {
            self.record_frame(result.frame_idx);
        } else {
            self.records.push(TraceRecord::Step {
                ts_ns: ts_ns(self.runner.now()),
            });
        }
        result
    }

    /// Finish recording and return the trace.
    pub fn finish(mut self) -> SessionTrace {
        let total_frames = self
            .records
            .iter()
            .filter(|r| matches!(r, TraceRecord::Frame { .. }))
            .count() as u64;
        self.records.push(TraceRecord::Summary {
            total_frames,
            final_checksum_chain: self.checksum_chain,
        });
        SessionTrace {
            records: std::mem::take(&mut self.records),
        }
    }

    /// The underlying runner.
    pub fn runner(&self) -> &StepRunner {
        &self.runner
    }

    fn record_frame(&mut self, frame_idx: u64) {
        if let Some(frame) = self.runner.last_frame() {
            let checksum = frame_checksum(frame);
            let chain = fnv1a64_pair(self.checksum_chain, checksum);
            self.records.push(TraceRecord::Frame {
                frame_idx,
                ts_ns: ts_ns(self.runner.now()),
                checksum,
                checksum_chain: chain,
            });
            self.checksum_chain = chain;
        }
    }
}

/// Result of replaying a session trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Frames composed during replay.
    pub total_frames: u64,
    /// Final checksum chain from replay.
    pub final_checksum_chain: u64,
    /// First checkpoint whose checksum differed, if any.
    pub first_mismatch: Option<ReplayMismatch>,
}

impl ReplayResult {
    /// Whether every checkpoint matched.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// A recorded step that did not reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    pub frame_idx: u64,
    /// `None` when the recording composed no frame at that step.
    pub expected: Option<u64>,
    /// `None` when replay composed no frame at that step.
    pub actual: Option<u64>,
}

/// Errors that can occur during replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The trace does not start with a header record.
    MissingHeader,
}

impl core::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "trace missing header record"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// Replay `trace` through a fresh runner built from `config`.
///
/// The header's seed replaces `config.seed`. Replay steps at every `Step`
/// and `Frame` record, at the recorded time.
pub fn replay(mut config: EngineConfig, trace: &SessionTrace) -> Result<ReplayResult, ReplayError> {
    let (seed, width, height, theme) = trace
        .records
        .first()
        .and_then(|r| match r {
            TraceRecord::Header {
                seed,
                width,
                height,
                theme,
            } => Some((*seed, *width, *height, *theme)),
            _ => None,
        })
        .ok_or(ReplayError::MissingHeader)?;

    config.seed = seed;
    let mut runner = StepRunner::new(config, width, height).with_theme(theme);
    runner.mount();

    let mut total_frames: u64 = 0;
    let mut checksum_chain: u64 = 0;
    let mut first_mismatch: Option<ReplayMismatch> = None;

    for record in &trace.records {
        match record {
            TraceRecord::Input { ts_ns, event } => {
                runner.set_time(Duration::from_nanos(*ts_ns));
                runner.push_event(*event);
            }
            TraceRecord::Theme { ts_ns, theme } => {
                runner.set_time(Duration::from_nanos(*ts_ns));
                runner.set_theme(*theme);
            }
            TraceRecord::Tick { ts_ns } => {
                runner.set_time(Duration::from_nanos(*ts_ns));
            }
            TraceRecord::Step { ts_ns } => {
                runner.set_time(Duration::from_nanos(*ts_ns));
                let result = runner.step();
                if result.rendered {
                    total_frames += 1;
                    let actual = runner.last_frame().map(frame_checksum);
                    if let Some(actual) = actual {
                        checksum_chain = fnv1a64_pair(checksum_chain, actual);
                    }
                    if first_mismatch.is_none() {
                        first_mismatch = Some(ReplayMismatch {
                            frame_idx: result.frame_idx,
                            expected: None,
                            actual,
                        });
                    }
                }
            }
            TraceRecord::Frame {
                frame_idx,
                ts_ns,
                checksum: expected,
                ..
            } => {
                runner.set_time(Duration::from_nanos(*ts_ns));
                let result = runner.step();
                let actual = if result.rendered {
                    total_frames += 1;
                    runner.last_frame().map(frame_checksum)
                } else {
                    None
                };
                if let Some(actual) = actual {
                    checksum_chain = fnv1a64_pair(checksum_chain, actual);
                }
                if first_mismatch.is_none() && actual != Some(*expected) {
                    first_mismatch = Some(ReplayMismatch {
                        frame_idx: *frame_idx,
                        expected: Some(*expected),
                        actual,
                    });
                }
            }
            TraceRecord::Header { .. } | TraceRecord::Summary { .. } => {}
        }
    }

    Ok(ReplayResult {
        total_frames,
        final_checksum_chain: checksum_chain,
        first_mismatch,
    })
}
