//! Capability report and query scheduler.
//!
//! [`CpuReport::read_from`] runs the fixed query plan against a
//! [`CpuidSource`] and folds every decoder's output into one immutable
//! report:
//!
//! 1. Leaf 0 (count + vendor), then leaf 1 (identity + feature sets)
//! 2. Leaves 5, 6, 7, 0xB (subleaves 0 and 1) and 0xD (fixed subleaf list),
//!    each skipped when the standard-function count does not reach it
//! 3. Leaf 0xF only when leaf-7 EBX bit 12 is set, leaf 0x10 only when
//!    bit 15 is set
//! 4. Brand string from the three extended leaves, only when the extended
//!    count reaches 0x80000004
//!
//! A skipped leaf's report group is `None`, never zero-filled-and-valid.
//! The pass is synchronous and stateless; every call produces an
//! independent snapshot scoped to the calling logical processor.

use crate::probe::leaves::{
    assemble_brand, BasicInfo, CetSaveArea, ExtendedState, ExtendedStateMain, MonitorMwait,
    PowerManagement, QosEnforcement, QosMonitoring, SaveArea, SaveOptimizations,
    StructuredExtended, Topology, TopologyLevel, VersionInfo, LEAF_BASIC_INFO, LEAF_BRAND_FIRST,
    LEAF_BRAND_LAST, LEAF_EXTENDED_BASE, LEAF_EXTENDED_STATE, LEAF_EXTENDED_TOPOLOGY,
    LEAF_MONITOR_MWAIT, LEAF_POWER_MANAGEMENT, LEAF_QOS_ENFORCEMENT, LEAF_QOS_MONITORING,
    LEAF_STRUCTURED_EXT, LEAF_VERSION_INFO, SUBLEAF_CET_SUPERVISOR_STATE, SUBLEAF_CET_USER_STATE,
    SUBLEAF_LWP_STATE, SUBLEAF_YMM_STATE,
};
use crate::probe::source::{CpuidSource, Registers};

/// Decoded capability report for one logical processor.
///
/// Produced once per probe pass; there is no update path. Optional groups
/// are `None` when their leaf was out of the processor's standard-function
/// range or, for [`qos_monitoring`](Self::qos_monitoring) and
/// [`qos_enforcement`](Self::qos_enforcement), when their gating feature
/// bit was clear. Consumers must not invent meaning for absent groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuReport {
    /// Leaf 0: standard-function count and vendor string.
    pub basic: BasicInfo,
    /// Leaf 1: family/model/stepping, misc ids, feature-flag sets.
    pub version: VersionInfo,
    /// Leaf 5.
    pub monitor_mwait: Option<MonitorMwait>,
    /// Leaf 6.
    pub power: Option<PowerManagement>,
    /// Leaf 7 subleaf 0.
    pub extended_features: Option<StructuredExtended>,
    /// Leaf 0xB subleaves 0 and 1.
    pub topology: Option<Topology>,
    /// Leaf 0xD fixed subleaf list.
    pub extended_state: Option<ExtendedState>,
    /// Leaf 0xF; present only when gated in by leaf-7 EBX bit 12.
    pub qos_monitoring: Option<QosMonitoring>,
    /// Leaf 0x10; present only when gated in by leaf-7 EBX bit 15.
    pub qos_enforcement: Option<QosEnforcement>,
    /// Maximum extended leaf (leaf 0x80000000 EAX).
    pub max_extended_leaf: u32,
    /// Brand string from leaves 0x80000002..=0x80000004, trimmed.
    pub brand: Option<String>,
}

impl CpuReport {
    /// Run the full query plan against a source and decode the report.
    pub fn read_from<S: CpuidSource>(source: &S) -> Self {
        let basic = BasicInfo::decode(query(source, LEAF_BASIC_INFO, 0));
        let max_leaf = basic.max_standard_leaf;
        log::debug!("probing '{}', max standard leaf {:#x}", basic.vendor, max_leaf);

        let version = VersionInfo::decode(query(source, LEAF_VERSION_INFO, 0));

        let monitor_mwait = (max_leaf >= LEAF_MONITOR_MWAIT)
            .then(|| MonitorMwait::decode(query(source, LEAF_MONITOR_MWAIT, 0)));

        let power = (max_leaf >= LEAF_POWER_MANAGEMENT)
            .then(|| PowerManagement::decode(query(source, LEAF_POWER_MANAGEMENT, 0)));

        let extended_features = (max_leaf >= LEAF_STRUCTURED_EXT)
            .then(|| StructuredExtended::decode(query(source, LEAF_STRUCTURED_EXT, 0)));

        // Thread level then core level: two explicit queries, never a loop.
        let topology = (max_leaf >= LEAF_EXTENDED_TOPOLOGY).then(|| Topology {
            thread: TopologyLevel::decode(query(source, LEAF_EXTENDED_TOPOLOGY, 0)),
            core: TopologyLevel::decode(query(source, LEAF_EXTENDED_TOPOLOGY, 1)),
        });

        let extended_state = (max_leaf >= LEAF_EXTENDED_STATE).then(|| ExtendedState {
            main: ExtendedStateMain::decode(query(source, LEAF_EXTENDED_STATE, 0)),
            save_opts: SaveOptimizations::decode(query(source, LEAF_EXTENDED_STATE, 1)),
            ymm: SaveArea::decode(query(source, LEAF_EXTENDED_STATE, SUBLEAF_YMM_STATE)),
            cet_user: CetSaveArea::decode(query(source, LEAF_EXTENDED_STATE, SUBLEAF_CET_USER_STATE)),
            cet_supervisor: CetSaveArea::decode(query(
                source,
                LEAF_EXTENDED_STATE,
                SUBLEAF_CET_SUPERVISOR_STATE,
            )),
            lwp: SaveArea::decode(query(source, LEAF_EXTENDED_STATE, SUBLEAF_LWP_STATE)),
        });

        let pqm_gated_in = extended_features.is_some_and(|f| f.pqm_supported());
        let qos_monitoring = (pqm_gated_in && max_leaf >= LEAF_QOS_MONITORING).then(|| {
            QosMonitoring::decode(
                query(source, LEAF_QOS_MONITORING, 0),
                query(source, LEAF_QOS_MONITORING, 1),
            )
        });

        let pqe_gated_in = extended_features.is_some_and(|f| f.pqe_supported());
        let qos_enforcement = (pqe_gated_in && max_leaf >= LEAF_QOS_ENFORCEMENT).then(|| {
            QosEnforcement::decode(
                query(source, LEAF_QOS_ENFORCEMENT, 0),
                query(source, LEAF_QOS_ENFORCEMENT, 1),
            )
        });

        let max_extended_leaf = query(source, LEAF_EXTENDED_BASE, 0).eax;
        let brand = (max_extended_leaf >= LEAF_BRAND_LAST).then(|| {
            assemble_brand([
                query(source, LEAF_BRAND_FIRST, 0),
                query(source, LEAF_BRAND_FIRST + 1, 0),
                query(source, LEAF_BRAND_LAST, 0),
            ])
        });

        log::debug!(
            "decoded report: family {} model {} stepping {}, {} feature flags",
            version.family,
            version.model,
            version.stepping,
            version.feature_count()
        );

        Self {
            basic,
            version,
            monitor_mwait,
            power,
            extended_features,
            topology,
            extended_state,
            qos_monitoring,
            qos_enforcement,
            max_extended_leaf,
            brand,
        }
    }

    /// Combined family id (leaf 1 base + extended family).
    pub fn family(&self) -> u32 {
        self.version.family
    }

    /// Combined model id (leaf 1 base model with extended model above it).
    pub fn model(&self) -> u32 {
        self.version.model
    }

    /// Total set flags across the two leaf-1 feature sets.
    pub fn feature_count(&self) -> u32 {
        self.version.feature_count()
    }
}

fn query<S: CpuidSource>(source: &S, leaf: u32, subleaf: u32) -> Registers {
    let regs = source.read(leaf, subleaf);
    log::trace!("cpuid({leaf:#010X}, {subleaf}) -> {regs}");
    regs
}
