//! CPUID probing and report decoding.
//!
//! This module provides:
//! - Instruction sources ([`CpuidSource`], [`HardwareSource`], [`SnapshotSource`])
//! - Pure per-leaf decoders ([`leaves`])
//! - Positional feature-flag sets and mnemonic tables ([`features`])
//! - The capability report aggregate ([`CpuReport`])
//!
//! # Probe Process
//!
//! 1. A source answers `(leaf, subleaf)` queries with four 32-bit registers
//! 2. [`CpuReport::read_from`] runs the fixed query plan, gating conditional
//!    leaves on previously-discovered feature bits
//! 3. Each register tuple is handed to a pure decoder; the decoded fields
//!    are folded into one immutable report
//!
//! # Example
//!
//! ```no_run
//! let report = cpuid_probe::probe()?;
//! println!("{} family {} model {}", report.basic.vendor, report.family(), report.model());
//! # Ok::<(), cpuid_probe::ProbeError>(())
//! ```

pub mod features;
pub mod leaves;
pub mod report;
pub mod source;

pub use features::{FeatureSet, FlagInfo};
pub use leaves::{
    BasicInfo, CetSaveArea, ExtendedState, ExtendedStateMain, MonitorMwait, PowerManagement,
    QosEnforcement, QosMonitoring, SaveArea, SaveOptimizations, StructuredExtended, Topology,
    TopologyLevel, VersionInfo,
};
pub use report::CpuReport;
pub use source::{CpuidSource, HardwareSource, ProbeError, Registers, SnapshotSource};

/// Probe the calling logical processor and decode a full capability report.
///
/// Fails only when the build target cannot issue the identification
/// instruction at all; a processor that implements fewer leaves than the
/// query plan is not an error (its report groups stay `None`).
pub fn probe() -> Result<CpuReport, ProbeError> {
    let source = HardwareSource::select()?;
    Ok(CpuReport::read_from(&source))
}
