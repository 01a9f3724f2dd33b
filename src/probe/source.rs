//! CPUID instruction sources.
//!
//! The decode engine never talks to hardware directly; it reads register
//! tuples through the [`CpuidSource`] seam. Two implementations exist:
//!
//! - [`HardwareSource`]: issues the real instruction on the calling logical
//!   processor (x86/x86_64 builds only)
//! - [`SnapshotSource`]: answers from recorded tuples, used by the test
//!   suite and by anything replaying a captured machine
//!
//! Querying a leaf the processor does not implement is not a failure: the
//! hardware returns vendor-defined filler (commonly zeros or the nearest
//! implemented leaf), and a snapshot returns zeros for unrecorded pairs.
//! Callers gate on the standard-function count instead of expecting errors.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// The four 32-bit registers returned by one CPUID invocation.
///
/// Always a fresh, independent value; no buffer is reused between queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl Registers {
    /// All-zero tuple, the filler a snapshot answers for unrecorded pairs.
    pub const ZERO: Self = Self { eax: 0, ebx: 0, ecx: 0, edx: 0 };

    /// Build a tuple from explicit register values.
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eax={:08X} ebx={:08X} ecx={:08X} edx={:08X}",
            self.eax, self.ebx, self.ecx, self.edx
        )
    }
}

/// Error selecting an instruction-invocation strategy.
///
/// This is the only failure mode of the probe: it is resolved once at the
/// source boundary, never mid-decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The build target has no CPUID instruction.
    #[error("CPUID is not available on {arch}")]
    UnsupportedPlatform {
        /// Target architecture of this build.
        arch: &'static str,
    },
}

/// A source of CPUID register tuples.
///
/// Implementations must be deterministic for a fixed (leaf, subleaf,
/// logical processor) triple at a fixed instant and must never raise for
/// unimplemented leaves. Reads have no side effects.
pub trait CpuidSource {
    /// Read the register tuple for one (leaf, subleaf) pair.
    fn read(&self, leaf: u32, subleaf: u32) -> Registers;
}

/// Source that issues the real identification instruction.
///
/// Constructed through [`HardwareSource::select`], which is where platform
/// support is decided; on a non-x86 build `select` is the only place the
/// probe can fail.
#[derive(Debug, Clone, Copy)]
pub struct HardwareSource(());

impl HardwareSource {
    /// Select the hardware strategy for this build target.
    pub fn select() -> Result<Self, ProbeError> {
        if cfg!(any(target_arch = "x86", target_arch = "x86_64")) {
            Ok(Self(()))
        } else {
            Err(ProbeError::UnsupportedPlatform {
                arch: std::env::consts::ARCH,
            })
        }
    }
}

impl CpuidSource for HardwareSource {
    fn read(&self, leaf: u32, subleaf: u32) -> Registers {
        #[cfg(target_arch = "x86_64")]
        {
            let r = unsafe { core::arch::x86_64::__cpuid_count(leaf, subleaf) };
            Registers::new(r.eax, r.ebx, r.ecx, r.edx)
        }
        #[cfg(target_arch = "x86")]
        {
            let r = unsafe { core::arch::x86::__cpuid_count(leaf, subleaf) };
            Registers::new(r.eax, r.ebx, r.ecx, r.edx)
        }
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            let _ = (leaf, subleaf);
            unreachable!("HardwareSource::select refuses non-x86 targets");
        }
    }
}

/// Source backed by recorded register tuples.
///
/// Unrecorded (leaf, subleaf) pairs answer [`Registers::ZERO`], matching the
/// vendor-defined-filler contract of real hardware for unimplemented leaves.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    entries: HashMap<(u32, u32), Registers>,
}

impl SnapshotSource {
    /// Create an empty snapshot. Every query answers zeros.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the tuple for one (leaf, subleaf) pair, replacing any
    /// previous recording.
    pub fn record(&mut self, leaf: u32, subleaf: u32, regs: Registers) -> &mut Self {
        self.entries.insert((leaf, subleaf), regs);
        self
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pairs are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CpuidSource for SnapshotSource {
    fn read(&self, leaf: u32, subleaf: u32) -> Registers {
        self.entries
            .get(&(leaf, subleaf))
            .copied()
            .unwrap_or(Registers::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_returns_recorded_tuple() {
        let mut snap = SnapshotSource::new();
        snap.record(1, 0, Registers::new(0x000306C3, 0, 0, 0));

        let regs = snap.read(1, 0);
        assert_eq!(regs.eax, 0x000306C3);
        assert_eq!(regs.ebx, 0);
    }

    #[test]
    fn test_snapshot_fills_unrecorded_with_zeros() {
        let snap = SnapshotSource::new();
        assert_eq!(snap.read(0xF, 1), Registers::ZERO);
        assert_eq!(snap.read(0x8000_0002, 0), Registers::ZERO);
    }

    #[test]
    fn test_snapshot_rerecord_replaces() {
        let mut snap = SnapshotSource::new();
        snap.record(0, 0, Registers::new(1, 2, 3, 4));
        snap.record(0, 0, Registers::new(5, 6, 7, 8));
        assert_eq!(snap.read(0, 0), Registers::new(5, 6, 7, 8));
        assert_eq!(snap.len(), 1);
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_hardware_source_reads_leaf_zero() {
        let source = HardwareSource::select().unwrap();
        // Leaf 0 EAX is the standard-function count; every x86_64 part
        // implements at least leaf 1.
        let regs = source.read(0, 0);
        assert!(regs.eax >= 1);
    }

    #[test]
    fn test_probe_error_display() {
        let e = ProbeError::UnsupportedPlatform { arch: "riscv64" };
        assert!(e.to_string().contains("riscv64"));
    }
}
