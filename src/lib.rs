//! cpuid-probe library
//!
//! Decoding engine for the x86 CPUID capability report. One probe pass
//! queries the identification instruction on the calling logical processor
//! and folds every defined (leaf, subleaf) into an immutable [`CpuReport`].
//! Presentation layers (TUIs, dump tools) consume the report; they are not
//! part of this crate.

pub mod bits;
pub mod probe;

pub use probe::{
    probe, CpuReport, CpuidSource, HardwareSource, ProbeError, Registers, SnapshotSource,
};
