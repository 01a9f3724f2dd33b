//! Positional feature-flag sets and mnemonic tables.
//!
//! CPUID feature registers are 32-entry boolean sets where the *bit
//! position* is the architecturally-defined key; set membership, not
//! insertion order, carries meaning. [`FeatureSet`] wraps one such register.
//!
//! The static tables map defined positions to their architectural mnemonics
//! (leaf 1 ECX/EDX and leaf 7 subleaf 0 EBX/ECX). Only defined positions are
//! listed; reserved positions look up as `None` and are never an error.

use std::fmt;

use crate::bits::bit;

/// A 32-entry positional feature-flag set decoded from one register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSet(u32);

impl FeatureSet {
    /// Wrap a raw register value.
    pub const fn new(word: u32) -> Self {
        Self(word)
    }

    /// Test the flag at an architectural bit position (0-31).
    pub fn bit(&self, position: u32) -> bool {
        bit(self.0, position)
    }

    /// Number of set flags.
    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// The raw register value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Iterate over set bit positions, ascending.
    pub fn set_positions(&self) -> impl Iterator<Item = u32> + '_ {
        let word = self.0;
        (0..32).filter(move |p| bit(word, *p))
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032b}", self.0)
    }
}

/// A named feature-flag position within one register.
#[derive(Debug, Clone, Copy)]
pub struct FlagInfo {
    /// Bit position within the register (0-31).
    pub bit: u32,
    /// Architectural mnemonic.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
}

/// Look up the flag defined at a bit position, if any.
pub fn lookup_flag(table: &'static [FlagInfo], position: u32) -> Option<&'static FlagInfo> {
    table.iter().find(|f| f.bit == position)
}

// ============================================================================
// Flag tables
//
// Positions follow the vendor manuals (Intel SDM Vol. 2A CPUID, AMD APM
// Vol. 3 Appendix E). Reserved positions are deliberately absent.
// ============================================================================

/// Leaf 1 ECX feature identifiers.
pub static LEAF1_ECX_FLAGS: &[FlagInfo] = &[
    FlagInfo { bit: 0, name: "SSE3", description: "SSE3 extensions" },
    FlagInfo { bit: 1, name: "PCLMULQDQ", description: "Carryless multiply" },
    FlagInfo { bit: 3, name: "MONITOR", description: "MONITOR/MWAIT" },
    FlagInfo { bit: 5, name: "VMX", description: "Virtual machine extensions" },
    FlagInfo { bit: 6, name: "SMX", description: "Safer mode extensions" },
    FlagInfo { bit: 9, name: "SSSE3", description: "Supplemental SSE3" },
    FlagInfo { bit: 12, name: "FMA", description: "Fused multiply-add" },
    FlagInfo { bit: 13, name: "CMPXCHG16B", description: "16-byte compare-exchange" },
    FlagInfo { bit: 17, name: "PCID", description: "Process context identifiers" },
    FlagInfo { bit: 19, name: "SSE4.1", description: "SSE4.1 extensions" },
    FlagInfo { bit: 20, name: "SSE4.2", description: "SSE4.2 extensions" },
    FlagInfo { bit: 21, name: "x2APIC", description: "Extended local APIC" },
    FlagInfo { bit: 22, name: "MOVBE", description: "MOVBE instruction" },
    FlagInfo { bit: 23, name: "POPCNT", description: "POPCNT instruction" },
    FlagInfo { bit: 24, name: "TSC-DEADLINE", description: "APIC timer TSC deadline mode" },
    FlagInfo { bit: 25, name: "AESNI", description: "AES instruction set" },
    FlagInfo { bit: 26, name: "XSAVE", description: "XSAVE/XRSTOR/XGETBV/XSETBV" },
    FlagInfo { bit: 27, name: "OSXSAVE", description: "OS has enabled XSAVE" },
    FlagInfo { bit: 28, name: "AVX", description: "Advanced vector extensions" },
    FlagInfo { bit: 29, name: "F16C", description: "Half-precision convert" },
    FlagInfo { bit: 30, name: "RDRAND", description: "RDRAND instruction" },
    FlagInfo { bit: 31, name: "HYPERVISOR", description: "Running under a hypervisor" },
];

/// Leaf 1 EDX feature identifiers.
pub static LEAF1_EDX_FLAGS: &[FlagInfo] = &[
    FlagInfo { bit: 0, name: "FPU", description: "x87 floating-point unit" },
    FlagInfo { bit: 1, name: "VME", description: "Virtual 8086 extensions" },
    FlagInfo { bit: 2, name: "DE", description: "Debugging extensions" },
    FlagInfo { bit: 3, name: "PSE", description: "Page size extension" },
    FlagInfo { bit: 4, name: "TSC", description: "Time stamp counter" },
    FlagInfo { bit: 5, name: "MSR", description: "Model-specific registers" },
    FlagInfo { bit: 6, name: "PAE", description: "Physical address extension" },
    FlagInfo { bit: 8, name: "CX8", description: "CMPXCHG8B instruction" },
    FlagInfo { bit: 9, name: "APIC", description: "On-chip APIC" },
    FlagInfo { bit: 11, name: "SEP", description: "SYSENTER/SYSEXIT" },
    FlagInfo { bit: 13, name: "PGE", description: "Page global enable" },
    FlagInfo { bit: 15, name: "CMOV", description: "Conditional move" },
    FlagInfo { bit: 16, name: "PAT", description: "Page attribute table" },
    FlagInfo { bit: 19, name: "CLFSH", description: "CLFLUSH instruction" },
    FlagInfo { bit: 23, name: "MMX", description: "MMX extensions" },
    FlagInfo { bit: 24, name: "FXSR", description: "FXSAVE/FXRSTOR" },
    FlagInfo { bit: 25, name: "SSE", description: "SSE extensions" },
    FlagInfo { bit: 26, name: "SSE2", description: "SSE2 extensions" },
    FlagInfo { bit: 28, name: "HTT", description: "Max APIC ids reserved field valid" },
];

/// Leaf 7 subleaf 0 EBX structured extended feature identifiers.
pub static LEAF7_EBX_FLAGS: &[FlagInfo] = &[
    FlagInfo { bit: 0, name: "FSGSBASE", description: "RD/WR FSGSBASE" },
    FlagInfo { bit: 3, name: "BMI1", description: "Bit manipulation set 1" },
    FlagInfo { bit: 5, name: "AVX2", description: "AVX2 extensions" },
    FlagInfo { bit: 7, name: "SMEP", description: "Supervisor-mode execution prevention" },
    FlagInfo { bit: 8, name: "BMI2", description: "Bit manipulation set 2" },
    FlagInfo { bit: 9, name: "ERMS", description: "Enhanced REP MOVSB/STOSB" },
    FlagInfo { bit: 10, name: "INVPCID", description: "INVPCID instruction" },
    FlagInfo { bit: 12, name: "PQM", description: "Platform QoS monitoring" },
    FlagInfo { bit: 15, name: "PQE", description: "Platform QoS enforcement" },
    FlagInfo { bit: 16, name: "AVX512F", description: "AVX-512 foundation" },
    FlagInfo { bit: 18, name: "RDSEED", description: "RDSEED instruction" },
    FlagInfo { bit: 19, name: "ADX", description: "ADCX/ADOX" },
    FlagInfo { bit: 20, name: "SMAP", description: "Supervisor-mode access prevention" },
    FlagInfo { bit: 23, name: "CLFLUSHOPT", description: "CLFLUSHOPT instruction" },
    FlagInfo { bit: 24, name: "CLWB", description: "Cache line write back" },
    FlagInfo { bit: 29, name: "SHA", description: "SHA extensions" },
];

/// Leaf 7 subleaf 0 ECX structured extended feature identifiers.
pub static LEAF7_ECX_FLAGS: &[FlagInfo] = &[
    FlagInfo { bit: 2, name: "UMIP", description: "User-mode instruction prevention" },
    FlagInfo { bit: 3, name: "PKU", description: "Protection keys for user pages" },
    FlagInfo { bit: 7, name: "CET_SS", description: "CET shadow stack" },
    FlagInfo { bit: 8, name: "GFNI", description: "Galois field instructions" },
    FlagInfo { bit: 9, name: "VAES", description: "Vector AES" },
    FlagInfo { bit: 16, name: "LA57", description: "57-bit linear addresses" },
    FlagInfo { bit: 22, name: "RDPID", description: "RDPID instruction" },
    FlagInfo { bit: 25, name: "CLDEMOTE", description: "Cache line demote" },
    FlagInfo { bit: 27, name: "MOVDIRI", description: "MOVDIRI instruction" },
    FlagInfo { bit: 28, name: "MOVDIR64B", description: "MOVDIR64B instruction" },
];
