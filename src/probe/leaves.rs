//! CPUID leaf layout and per-leaf decoders.
//!
//! Field layouts follow the vendor manuals (Intel SDM Vol. 2A, AMD APM
//! Vol. 3 Appendix E). Each decoder is a fixed, pure transform from one
//! register tuple (or a pair of subleaf tuples) to named fields; decoders
//! never query hardware themselves. Which pairs get queried, and in what
//! order, is the scheduler's business (`report.rs`).
//!
//! # String assembly
//!
//! ```text
//! vendor (leaf 0):  EBX, EDX, ECX      -> 12 ASCII bytes
//! brand  (0x80000002..=0x80000004):
//!     per leaf:     EAX, EBX, ECX, EDX -> 16 ASCII bytes
//! ```

use crate::bits::{bit, extract_bits};
use crate::probe::features::FeatureSet;
use crate::probe::source::Registers;

// ============================================================================
// Leaf numbers
// ============================================================================

/// Standard-function count and vendor string.
pub const LEAF_BASIC_INFO: u32 = 0x0;

/// Family/model/stepping and the two leaf-1 feature-flag sets.
pub const LEAF_VERSION_INFO: u32 = 0x1;

/// Monitor/MWait parameters.
pub const LEAF_MONITOR_MWAIT: u32 = 0x5;

/// Power management (APIC timer invariance, effective frequency).
pub const LEAF_POWER_MANAGEMENT: u32 = 0x6;

/// Structured extended feature flags (subleaf 0).
pub const LEAF_STRUCTURED_EXT: u32 = 0x7;

/// Extended topology enumeration (subleaf 0 = thread, subleaf 1 = core).
pub const LEAF_EXTENDED_TOPOLOGY: u32 = 0xB;

/// Processor extended state enumeration.
pub const LEAF_EXTENDED_STATE: u32 = 0xD;

/// Platform QoS monitoring (PQM); gated on leaf-7 EBX bit 12.
pub const LEAF_QOS_MONITORING: u32 = 0xF;

/// Platform QoS enforcement (PQE); gated on leaf-7 EBX bit 15.
pub const LEAF_QOS_ENFORCEMENT: u32 = 0x10;

/// First extended leaf; EAX reports the maximum extended leaf.
pub const LEAF_EXTENDED_BASE: u32 = 0x8000_0000;

/// First of the three brand-string leaves.
pub const LEAF_BRAND_FIRST: u32 = 0x8000_0002;

/// Last of the three brand-string leaves.
pub const LEAF_BRAND_LAST: u32 = 0x8000_0004;

/// Leaf 0xD subleaf carrying YMM (AVX) save-state size/offset.
pub const SUBLEAF_YMM_STATE: u32 = 2;

/// Leaf 0xD subleaf carrying CET user save-state size/offset.
pub const SUBLEAF_CET_USER_STATE: u32 = 11;

/// Leaf 0xD subleaf carrying CET supervisor save-state size/offset.
pub const SUBLEAF_CET_SUPERVISOR_STATE: u32 = 12;

/// Leaf 0xD subleaf carrying the legacy lightweight-profiling state area.
pub const SUBLEAF_LWP_STATE: u32 = 0x3E;

/// Leaf-7 EBX position gating leaf 0xF.
pub const PQM_GATE_BIT: u32 = 12;

/// Leaf-7 EBX position gating leaf 0x10.
pub const PQE_GATE_BIT: u32 = 15;

// ============================================================================
// Leaf 0 - basic info
// ============================================================================

/// Leaf 0: standard-function count and vendor string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicInfo {
    /// Maximum standard leaf the processor implements (EAX).
    pub max_standard_leaf: u32,
    /// 12-character vendor string, bytes taken from EBX, EDX, ECX in that
    /// architecturally-defined order.
    pub vendor: String,
}

impl BasicInfo {
    /// Decode the leaf 0 register tuple.
    pub fn decode(regs: Registers) -> Self {
        let mut bytes = Vec::with_capacity(12);
        for word in [regs.ebx, regs.edx, regs.ecx] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }

        Self {
            max_standard_leaf: regs.eax,
            vendor: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

// ============================================================================
// Leaf 1 - version and misc info
// ============================================================================

/// Leaf 1: family/model/stepping, misc identifiers, feature-flag sets.
///
/// EAX layout:
/// ```text
/// [3:0]   stepping
/// [7:4]   base model
/// [11:8]  base family
/// [19:16] extended model
/// [27:20] extended family
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    pub stepping: u32,
    pub base_model: u32,
    pub base_family: u32,
    pub ext_model: u32,
    pub ext_family: u32,
    /// Combined family: `base_family + ext_family`.
    pub family: u32,
    /// Combined model: `base_model | (ext_model << 4)`.
    pub model: u32,
    /// Brand index (EBX [7:0]).
    pub brand_id: u32,
    /// CLFLUSH line size in 8-byte quadwords (EBX [15:8]).
    pub clflush_size: u32,
    /// Maximum addressable logical processors in this package (EBX [23:16]).
    pub logical_processor_count: u32,
    /// Initial local APIC id of the calling thread (EBX [31:24]).
    pub local_apic_id: u32,
    /// Leaf 1 ECX feature identifiers.
    pub features_ecx: FeatureSet,
    /// Leaf 1 EDX feature identifiers.
    pub features_edx: FeatureSet,
}

impl VersionInfo {
    /// Decode the leaf 1 register tuple.
    pub fn decode(regs: Registers) -> Self {
        let stepping = extract_bits(regs.eax, 0, 3);
        let base_model = extract_bits(regs.eax, 4, 7);
        let base_family = extract_bits(regs.eax, 8, 11);
        let ext_model = extract_bits(regs.eax, 16, 19);
        let ext_family = extract_bits(regs.eax, 20, 27);

        Self {
            stepping,
            base_model,
            base_family,
            ext_model,
            ext_family,
            family: base_family + ext_family,
            model: base_model | (ext_model << 4),
            brand_id: extract_bits(regs.ebx, 0, 7),
            clflush_size: extract_bits(regs.ebx, 8, 15),
            logical_processor_count: extract_bits(regs.ebx, 16, 23),
            local_apic_id: extract_bits(regs.ebx, 24, 31),
            features_ecx: FeatureSet::new(regs.ecx),
            features_edx: FeatureSet::new(regs.edx),
        }
    }

    /// Total set flags across both leaf-1 feature sets.
    pub fn feature_count(&self) -> u32 {
        self.features_ecx.count() + self.features_edx.count()
    }
}

// ============================================================================
// Leaf 5 - monitor/mwait
// ============================================================================

/// Leaf 5: MONITOR/MWAIT parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorMwait {
    /// Smallest monitor-line size in bytes (EAX [15:0]).
    pub line_size_min: u32,
    /// Largest monitor-line size in bytes (EBX [15:0]).
    pub line_size_max: u32,
    /// Enumeration of MONITOR/MWAIT extensions supported (ECX [0]).
    pub emx: bool,
    /// Interrupts usable as break events for MWAIT (ECX [1]).
    pub ibe: bool,
}

impl MonitorMwait {
    /// Decode the leaf 5 register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            line_size_min: extract_bits(regs.eax, 0, 15),
            line_size_max: extract_bits(regs.ebx, 0, 15),
            emx: bit(regs.ecx, 0),
            ibe: bit(regs.ecx, 1),
        }
    }
}

// ============================================================================
// Leaf 6 - power management
// ============================================================================

/// Leaf 6: APIC timer invariance and effective-frequency interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerManagement {
    /// APIC timer always running, unaffected by deep C-states (EAX [2]).
    pub arat: bool,
    /// Effective-frequency interface (APERF/MPERF) present (ECX [0]).
    pub effective_freq: bool,
}

impl PowerManagement {
    /// Decode the leaf 6 register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            arat: bit(regs.eax, 2),
            effective_freq: bit(regs.ecx, 0),
        }
    }
}

// ============================================================================
// Leaf 7 - structured extended features
// ============================================================================

/// Leaf 7 subleaf 0: structured extended feature identifiers.
///
/// Bits 12 (PQM) and 15 (PQE) of the EBX set gate the conditional leaves
/// 0xF and 0x10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredExtended {
    /// Maximum supported leaf-7 subleaf (EAX).
    pub max_subleaf: u32,
    /// Leaf 7 EBX feature identifiers.
    pub flags_ebx: FeatureSet,
    /// Leaf 7 ECX feature identifiers.
    pub flags_ecx: FeatureSet,
}

impl StructuredExtended {
    /// Decode the leaf 7 subleaf 0 register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            max_subleaf: regs.eax,
            flags_ebx: FeatureSet::new(regs.ebx),
            flags_ecx: FeatureSet::new(regs.ecx),
        }
    }

    /// Whether platform QoS monitoring (leaf 0xF) is available.
    pub fn pqm_supported(&self) -> bool {
        self.flags_ebx.bit(PQM_GATE_BIT)
    }

    /// Whether platform QoS enforcement (leaf 0x10) is available.
    pub fn pqe_supported(&self) -> bool {
        self.flags_ebx.bit(PQE_GATE_BIT)
    }
}

// ============================================================================
// Leaf 0xB - extended topology
// ============================================================================

/// One level of the extended topology enumeration (leaf 0xB).
///
/// Subleaf 0 describes the thread level, subleaf 1 the core level. The two
/// are distinct queries with distinct answers; x2APIC id and hierarchy
/// fields are meaningful only for the thread that executed the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyLevel {
    /// Bits to shift the x2APIC id right to reach the next level (EAX [4:0]).
    pub mask_width: u32,
    /// Logical processors at this level (EBX [15:0]).
    pub logical_count: u32,
    /// Echo of the input subleaf number (ECX [7:0]).
    pub input_ecx: u32,
    /// Hierarchy level type (ECX [15:8]; 1 = thread, 2 = core).
    pub hierarchy_level: u32,
    /// x2APIC id of the calling logical processor (EDX).
    pub x2apic_id: u32,
}

impl TopologyLevel {
    /// Decode one leaf 0xB subleaf register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            mask_width: extract_bits(regs.eax, 0, 4),
            logical_count: extract_bits(regs.ebx, 0, 15),
            input_ecx: extract_bits(regs.ecx, 0, 7),
            hierarchy_level: extract_bits(regs.ecx, 8, 15),
            x2apic_id: regs.edx,
        }
    }
}

/// Both enumerated topology levels from one probe pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    /// Subleaf 0: thread level.
    pub thread: TopologyLevel,
    /// Subleaf 1: core level.
    pub core: TopologyLevel,
}

// ============================================================================
// Leaf 0xD - extended state enumeration
// ============================================================================

/// Leaf 0xD subleaf 0: supported-state masks and save-area sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedStateMain {
    /// XCR0 feature bits the processor supports (EAX low 32, EDX high 32).
    pub supported_mask: u64,
    /// Save-area size for currently-enabled features in bytes (EBX).
    pub enabled_size_max: u32,
    /// Save-area size if every supported feature were enabled (ECX).
    pub supported_size_max: u32,
}

impl ExtendedStateMain {
    /// Decode the leaf 0xD subleaf 0 register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            supported_mask: (regs.eax as u64) | ((regs.edx as u64) << 32),
            enabled_size_max: regs.ebx,
            supported_size_max: regs.ecx,
        }
    }
}

/// Leaf 0xD subleaf 1: save-optimization capabilities and CET flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptimizations {
    /// XSAVEOPT available (EAX [0]).
    pub xsaveopt: bool,
    /// XSAVEC compact format available (EAX [1]).
    pub xsavec: bool,
    /// XGETBV with ECX=1 available (EAX [2]).
    pub xgetbv_ecx1: bool,
    /// XSAVES/XRSTORS and IA32_XSS available (EAX [3]).
    pub xsaves: bool,
    /// CET user state enumerable in IA32_XSS (ECX [11]).
    pub cet_user: bool,
    /// CET supervisor state enumerable in IA32_XSS (ECX [12]).
    pub cet_supervisor: bool,
}

impl SaveOptimizations {
    /// Decode the leaf 0xD subleaf 1 register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            xsaveopt: bit(regs.eax, 0),
            xsavec: bit(regs.eax, 1),
            xgetbv_ecx1: bit(regs.eax, 2),
            xsaves: bit(regs.eax, 3),
            cet_user: bit(regs.ecx, 11),
            cet_supervisor: bit(regs.ecx, 12),
        }
    }
}

/// Size/offset pair for one extended-state component (leaf 0xD subleaf >= 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveArea {
    /// Component save-state size in bytes (EAX).
    pub size: u32,
    /// Offset from the save-area base in bytes (EBX).
    pub offset: u32,
}

impl SaveArea {
    /// Decode one per-component subleaf register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            size: regs.eax,
            offset: regs.ebx,
        }
    }
}

/// Size/offset pair for a CET state component, which additionally flags
/// whether the component is supervisor state (ECX [0]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CetSaveArea {
    /// Component save-state size in bytes (EAX).
    pub size: u32,
    /// Offset from the save-area base in bytes (EBX).
    pub offset: u32,
    /// Component lives in IA32_XSS supervisor state (ECX [0]).
    pub supervisor_state: bool,
}

impl CetSaveArea {
    /// Decode one CET subleaf register tuple.
    pub fn decode(regs: Registers) -> Self {
        Self {
            size: regs.eax,
            offset: regs.ebx,
            supervisor_state: bit(regs.ecx, 0),
        }
    }
}

/// Complete leaf 0xD enumeration: the fixed subleaf scan list
/// {0, 1, 2, 11, 12, 0x3E}, not a loop over an open-ended range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedState {
    /// Subleaf 0.
    pub main: ExtendedStateMain,
    /// Subleaf 1.
    pub save_opts: SaveOptimizations,
    /// Subleaf 2: YMM (AVX) state.
    pub ymm: SaveArea,
    /// Subleaf 11: CET user state.
    pub cet_user: CetSaveArea,
    /// Subleaf 12: CET supervisor state.
    pub cet_supervisor: CetSaveArea,
    /// Subleaf 0x3E: legacy lightweight-profiling state.
    pub lwp: SaveArea,
}

// ============================================================================
// Leaf 0xF - QoS monitoring (conditional)
// ============================================================================

/// Leaf 0xF subleaves 0 and 1: platform QoS monitoring parameters.
///
/// Valid only when leaf-7 EBX bit 12 is set; the scheduler never queries
/// this leaf otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosMonitoring {
    /// Maximum resource-monitoring id across all types (subleaf 0 EBX).
    pub max_rmid: u32,
    /// L3 cache monitoring supported (subleaf 0 EDX [1]).
    pub l3_monitoring: bool,
    /// Monitoring counter width minus 24 (subleaf 1 EAX [7:0]).
    pub counter_size: u32,
    /// Counter-overflow bit present (subleaf 1 EAX [8]).
    pub counter_overflow: bool,
    /// Scale factor converting counter values to bytes (subleaf 1 EBX).
    pub scale_factor: u32,
    /// Maximum RMID for L3 monitoring (subleaf 1 ECX).
    pub l3_max_rmid: u32,
    /// L3 occupancy monitoring event supported (subleaf 1 EDX [0]).
    pub occupancy_event: bool,
    /// L3 total-bandwidth monitoring event supported (subleaf 1 EDX [1]).
    pub total_bandwidth_event: bool,
    /// L3 local-bandwidth monitoring event supported (subleaf 1 EDX [2]).
    pub local_bandwidth_event: bool,
}

impl QosMonitoring {
    /// Decode the two leaf 0xF subleaf tuples.
    pub fn decode(sub0: Registers, sub1: Registers) -> Self {
        Self {
            max_rmid: sub0.ebx,
            l3_monitoring: bit(sub0.edx, 1),
            counter_size: extract_bits(sub1.eax, 0, 7),
            counter_overflow: bit(sub1.eax, 8),
            scale_factor: sub1.ebx,
            l3_max_rmid: sub1.ecx,
            occupancy_event: bit(sub1.edx, 0),
            total_bandwidth_event: bit(sub1.edx, 1),
            local_bandwidth_event: bit(sub1.edx, 2),
        }
    }
}

// ============================================================================
// Leaf 0x10 - QoS enforcement (conditional)
// ============================================================================

/// Leaf 0x10 subleaves 0 and 1: platform QoS enforcement parameters.
///
/// Valid only when leaf-7 EBX bit 15 is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosEnforcement {
    /// L3 cache allocation enforcement supported (subleaf 0 EDX [1]).
    pub l3_allocation: bool,
    /// Capacity bit mask length minus 1 (subleaf 1 EAX [4:0]).
    pub cbm_length: u32,
    /// Bitmask of L3 portions shared with other agents (subleaf 1 EBX).
    pub shareable_mask: u32,
    /// Code/data prioritization supported (subleaf 1 ECX [2]).
    pub cdp: bool,
    /// Maximum class-of-service id (subleaf 1 EDX [15:0]).
    pub max_cos: u32,
}

impl QosEnforcement {
    /// Decode the two leaf 0x10 subleaf tuples.
    pub fn decode(sub0: Registers, sub1: Registers) -> Self {
        Self {
            l3_allocation: bit(sub0.edx, 1),
            cbm_length: extract_bits(sub1.eax, 0, 4),
            shareable_mask: sub1.ebx,
            cdp: bit(sub1.ecx, 2),
            max_cos: extract_bits(sub1.edx, 0, 15),
        }
    }
}

// ============================================================================
// Brand string
// ============================================================================

/// Assemble the processor brand string from the three extended-leaf tuples
/// (0x80000002..=0x80000004), 16 bytes each in EAX, EBX, ECX, EDX order.
///
/// The 48-byte buffer is cut at the first NUL (the architectural
/// terminator); trailing spaces are stripped from the final string only.
pub fn assemble_brand(chunks: [Registers; 3]) -> String {
    let mut bytes = Vec::with_capacity(48);
    for regs in chunks {
        for word in [regs.eax, regs.ebx, regs.ecx, regs.edx] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
    }
    brand_from_bytes(&bytes)
}

fn brand_from_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
        .trim_end_matches(' ')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regs_from_ascii(s: &[u8; 4]) -> u32 {
        u32::from_le_bytes(*s)
    }

    #[test]
    fn test_vendor_string_assembly() {
        // EBX/EDX/ECX spell "Genu", "ineI", "ntel".
        let regs = Registers::new(
            0xD,
            regs_from_ascii(b"Genu"),
            regs_from_ascii(b"ntel"),
            regs_from_ascii(b"ineI"),
        );
        let info = BasicInfo::decode(regs);
        assert_eq!(info.vendor, "GenuineIntel");
        assert_eq!(info.max_standard_leaf, 0xD);
    }

    #[test]
    fn test_version_info_haswell() {
        let regs = Registers::new(0x000306C3, 0x05100800, 0, 0);
        let v = VersionInfo::decode(regs);
        assert_eq!(v.stepping, 3);
        assert_eq!(v.base_model, 0xC);
        assert_eq!(v.base_family, 6);
        assert_eq!(v.ext_model, 3);
        assert_eq!(v.ext_family, 0);
        assert_eq!(v.family, 6);
        assert_eq!(v.model, 0x3C);
    }

    #[test]
    fn test_version_info_misc_fields() {
        // EBX: apic id 4, logical count 16, clflush 8, brand id 0
        let ebx = (4 << 24) | (16 << 16) | (8 << 8);
        let v = VersionInfo::decode(Registers::new(0, ebx, 0, 0));
        assert_eq!(v.brand_id, 0);
        assert_eq!(v.clflush_size, 8);
        assert_eq!(v.logical_processor_count, 16);
        assert_eq!(v.local_apic_id, 4);
    }

    #[test]
    fn test_version_feature_count_is_popcount_sum() {
        let v = VersionInfo::decode(Registers::new(0, 0, 0b1011, 0b1100_0001));
        assert_eq!(v.feature_count(), 3 + 3);
        assert_eq!(
            v.feature_count(),
            v.features_ecx.count() + v.features_edx.count()
        );
    }

    #[test]
    fn test_monitor_mwait_decode() {
        let m = MonitorMwait::decode(Registers::new(0x40, 0x40, 0b11, 0));
        assert_eq!(m.line_size_min, 64);
        assert_eq!(m.line_size_max, 64);
        assert!(m.emx);
        assert!(m.ibe);

        let m = MonitorMwait::decode(Registers::new(0, 0, 0, 0));
        assert!(!m.emx);
        assert!(!m.ibe);
    }

    #[test]
    fn test_power_management_decode() {
        let p = PowerManagement::decode(Registers::new(0b100, 0, 0b1, 0));
        assert!(p.arat);
        assert!(p.effective_freq);

        let p = PowerManagement::decode(Registers::new(0b011, 0, 0b0, 0));
        assert!(!p.arat);
    }

    #[test]
    fn test_structured_extended_gates() {
        let f = StructuredExtended::decode(Registers::new(1, 1 << 12, 0, 0));
        assert!(f.pqm_supported());
        assert!(!f.pqe_supported());

        let f = StructuredExtended::decode(Registers::new(1, 1 << 15, 0, 0));
        assert!(!f.pqm_supported());
        assert!(f.pqe_supported());
    }

    #[test]
    fn test_topology_level_decode() {
        // mask width 1, 2 threads, subleaf echo 0, level type 1 (thread)
        let t = TopologyLevel::decode(Registers::new(1, 2, 1 << 8, 7));
        assert_eq!(t.mask_width, 1);
        assert_eq!(t.logical_count, 2);
        assert_eq!(t.input_ecx, 0);
        assert_eq!(t.hierarchy_level, 1);
        assert_eq!(t.x2apic_id, 7);
    }

    #[test]
    fn test_extended_state_main_combines_mask() {
        let m = ExtendedStateMain::decode(Registers::new(0x7, 0x340, 0x440, 0x1));
        assert_eq!(m.supported_mask, 0x1_0000_0007);
        assert_eq!(m.enabled_size_max, 0x340);
        assert_eq!(m.supported_size_max, 0x440);
    }

    #[test]
    fn test_save_optimizations_decode() {
        let s = SaveOptimizations::decode(Registers::new(0b1111, 0, (1 << 11) | (1 << 12), 0));
        assert!(s.xsaveopt && s.xsavec && s.xgetbv_ecx1 && s.xsaves);
        assert!(s.cet_user);
        assert!(s.cet_supervisor);

        let s = SaveOptimizations::decode(Registers::new(0b0001, 0, 0, 0));
        assert!(s.xsaveopt);
        assert!(!s.xsavec);
        assert!(!s.cet_user);
    }

    #[test]
    fn test_cet_save_area_supervisor_flag() {
        let a = CetSaveArea::decode(Registers::new(0x10, 0x3C0, 1, 0));
        assert_eq!(a.size, 0x10);
        assert_eq!(a.offset, 0x3C0);
        assert!(a.supervisor_state);
    }

    #[test]
    fn test_qos_monitoring_decode() {
        let sub0 = Registers::new(0, 0xFF, 0, 0b10);
        let sub1 = Registers::new((1 << 8) | 24, 0x8000, 0xFF, 0b111);
        let q = QosMonitoring::decode(sub0, sub1);
        assert_eq!(q.max_rmid, 0xFF);
        assert!(q.l3_monitoring);
        assert_eq!(q.counter_size, 24);
        assert!(q.counter_overflow);
        assert_eq!(q.scale_factor, 0x8000);
        assert_eq!(q.l3_max_rmid, 0xFF);
        assert!(q.occupancy_event && q.total_bandwidth_event && q.local_bandwidth_event);
    }

    #[test]
    fn test_qos_enforcement_decode() {
        let sub0 = Registers::new(0, 0, 0, 0b10);
        let sub1 = Registers::new(0xB, 0xC0000, 0b100, 0xF);
        let q = QosEnforcement::decode(sub0, sub1);
        assert!(q.l3_allocation);
        assert_eq!(q.cbm_length, 0xB);
        assert_eq!(q.shareable_mask, 0xC0000);
        assert!(q.cdp);
        assert_eq!(q.max_cos, 0xF);
    }

    #[test]
    fn test_brand_assembly_and_trim() {
        // "Intel(R) Core(TM)" padded with spaces then NULs.
        let mut bytes = *b"Intel(R) Core(TM) i7      ";
        let mut padded = [0u8; 48];
        padded[..bytes.len()].copy_from_slice(&bytes);

        let mut chunks = [Registers::ZERO; 3];
        for (i, chunk) in padded.chunks(16).enumerate() {
            let w = |j: usize| u32::from_le_bytes(chunk[j * 4..j * 4 + 4].try_into().unwrap());
            chunks[i] = Registers::new(w(0), w(1), w(2), w(3));
        }

        let brand = assemble_brand(chunks);
        assert_eq!(brand, "Intel(R) Core(TM) i7");

        // Trimming is idempotent.
        assert_eq!(brand_from_bytes(brand.as_bytes()), brand);

        // A tail of only spaces trims to the prefix.
        bytes = *b"spaces only after this    ";
        assert_eq!(brand_from_bytes(&bytes), "spaces only after this");
    }

    #[test]
    fn test_brand_all_zero_is_empty() {
        let brand = assemble_brand([Registers::ZERO; 3]);
        assert!(brand.is_empty());
    }
}
