//! Architecture table.

use std::fmt;

use serde::Serialize;

/// A target CPU architecture, named the way the compiler toolchain expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[serde(rename = "386")]
    I386,
    Amd64,
    Arm,
    Arm64,
    Loong64,
    Mips,
    Mips64,
    Mips64le,
    Mipsle,
    Ppc64,
    Ppc64le,
    Riscv64,
    S390x,
    Wasm,
}

/// Every known architecture, in table order.
///
/// The position of an entry is its table index; see [`Arch::from_index`].
pub const ARCHITECTURES: [Arch; 14] = [
    Arch::I386,
    Arch::Amd64,
    Arch::Arm,
    Arch::Arm64,
    Arch::Loong64,
    Arch::Mips,
    Arch::Mips64,
    Arch::Mips64le,
    Arch::Mipsle,
    Arch::Ppc64,
    Arch::Ppc64le,
    Arch::Riscv64,
    Arch::S390x,
    Arch::Wasm,
];

impl Arch {
    /// Look up an architecture by table index. Returns `None` past the end.
    pub fn from_index(index: usize) -> Option<Self> {
        ARCHITECTURES.get(index).copied()
    }

    /// Position of this architecture in [`ARCHITECTURES`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Toolchain name (the value exported as the architecture variable).
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::I386 => "386",
            Arch::Amd64 => "amd64",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
            Arch::Loong64 => "loong64",
            Arch::Mips => "mips",
            Arch::Mips64 => "mips64",
            Arch::Mips64le => "mips64le",
            Arch::Mipsle => "mipsle",
            Arch::Ppc64 => "ppc64",
            Arch::Ppc64le => "ppc64le",
            Arch::Riscv64 => "riscv64",
            Arch::S390x => "s390x",
            Arch::Wasm => "wasm",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_fourteen_entries() {
        assert_eq!(ARCHITECTURES.len(), 14);
    }

    #[test]
    fn index_round_trips_through_table() {
        for (i, arch) in ARCHITECTURES.iter().enumerate() {
            assert_eq!(arch.index(), i);
            assert_eq!(Arch::from_index(i), Some(*arch));
        }
    }

    #[test]
    fn from_index_out_of_bounds() {
        assert_eq!(Arch::from_index(14), None);
        assert_eq!(Arch::from_index(usize::MAX), None);
    }

    #[test]
    fn toolchain_names() {
        assert_eq!(Arch::I386.as_str(), "386");
        assert_eq!(Arch::S390x.to_string(), "s390x");
        assert_eq!(Arch::from_index(13).map(Arch::as_str), Some("wasm"));
    }

    #[test]
    fn serializes_as_toolchain_name() {
        assert_eq!(serde_json::to_string(&Arch::I386).unwrap(), "\"386\"");
        assert_eq!(serde_json::to_string(&Arch::Mips64le).unwrap(), "\"mips64le\"");
    }
}
