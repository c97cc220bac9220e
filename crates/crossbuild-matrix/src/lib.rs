//! Build matrix resolution for crossbuild.
//!
//! Holds the static registry of supported operating systems, each with its
//! compatible architectures and a style class, and expands a style or
//! explicit-OS selector into the ordered list of `(os, arch)` build pairs.
//!
//! Resolution is pure: the same selector always yields the same pairs in the
//! same order (registry row order outer, architecture order inner).

pub mod arch;
pub mod os;
pub mod registry;
pub mod resolve;
pub mod style;

pub use arch::{Arch, ARCHITECTURES};
pub use os::TargetOs;
pub use registry::{PlatformEntry, BUILD_REGISTRY};
pub use resolve::{resolve, BuildPair, Selector};
pub use style::Style;
