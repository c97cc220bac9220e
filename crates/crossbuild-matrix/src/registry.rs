//! The static build registry.
//!
//! One row per supported operating system, listing the architectures it is
//! built for (in build order) and the style class it belongs to. The table is
//! data, not logic: resolution only ever filters and expands it.

use crate::arch::Arch::{self, *};
use crate::os::TargetOs;
use crate::style::Style;

/// Build metadata for one operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformEntry {
    pub os: TargetOs,
    /// Architectures to build, in order.
    pub arches: &'static [Arch],
    /// Style class. Never [`Style::All`].
    pub class: Style,
}

const fn row(os: TargetOs, arches: &'static [Arch], class: Style) -> PlatformEntry {
    PlatformEntry { os, arches, class }
}

/// Every supported operating system, in build order.
pub static BUILD_REGISTRY: [PlatformEntry; 15] = [
    row(TargetOs::Aix, &[Ppc64], Style::Unix),
    row(TargetOs::Android, &[I386, Amd64, Arm, Arm64], Style::Mobile),
    row(TargetOs::Darwin, &[Amd64, Arm64], Style::Pc),
    row(TargetOs::Dragonfly, &[Amd64], Style::P2p),
    row(TargetOs::Freebsd, &[I386, Amd64, Arm], Style::Unix),
    row(TargetOs::Illumos, &[Amd64], Style::Unix),
    row(TargetOs::Ios, &[Arm64], Style::Mobile),
    row(TargetOs::Js, &[Wasm], Style::Web),
    row(
        TargetOs::Linux,
        &[
            I386, Amd64, Arm, Arm64, Loong64, Mips, Mips64, Mips64le, Mipsle, Ppc64, Ppc64le,
            Riscv64, S390x,
        ],
        Style::Pc,
    ),
    row(TargetOs::Netbsd, &[I386, Amd64, Arm], Style::Unix),
    row(TargetOs::Openbsd, &[I386, Amd64, Arm, Arm64], Style::Unix),
    row(TargetOs::Plan9, &[I386, Amd64, Arm], Style::Unix),
    row(TargetOs::Solaris, &[Amd64], Style::Unix),
    row(TargetOs::Wasip1, &[Wasm], Style::Web),
    row(TargetOs::Windows, &[I386, Amd64, Arm, Arm64], Style::Pc),
];

/// Look up the registry row for an operating system.
pub fn entry(os: TargetOs) -> Option<&'static PlatformEntry> {
    BUILD_REGISTRY.iter().find(|e| e.os == os)
}

/// Rows belonging to a style class, in registry order.
pub fn members(class: Style) -> impl Iterator<Item = &'static PlatformEntry> {
    BUILD_REGISTRY.iter().filter(move |e| e.class == class)
}
