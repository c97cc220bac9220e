//! Selector normalization and build pair expansion.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::arch::Arch;
use crate::os::TargetOs;
use crate::registry::{PlatformEntry, BUILD_REGISTRY};
use crate::style::Style;

/// One concrete `(os, arch)` combination to compile for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BuildPair {
    pub os: TargetOs,
    pub arch: Arch,
}

impl BuildPair {
    pub fn new(os: TargetOs, arch: Arch) -> Self {
        Self { os, arch }
    }
}

impl fmt::Display for BuildPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Which registry rows to build.
///
/// An explicit OS, when present, takes over and the style is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selector {
    pub style: Style,
    pub os: Option<TargetOs>,
}

impl Selector {
    /// Build a selector from raw user input.
    ///
    /// Unknown or empty styles become [`Style::Pc`]; unknown or empty OS names
    /// mean "no override". Neither is an error.
    pub fn normalize(style: &str, os: &str) -> Self {
        let parsed_os = TargetOs::parse(os);
        if parsed_os.is_none() && !os.is_empty() {
            debug!(os, "unrecognized os, ignoring override");
        }
        Self {
            style: Style::normalize(style),
            os: parsed_os,
        }
    }

    pub fn style(style: Style) -> Self {
        Self { style, os: None }
    }

    pub fn os(os: TargetOs) -> Self {
        Self {
            style: Style::default(),
            os: Some(os),
        }
    }

    /// Whether a registry row is selected.
    pub fn matches(&self, entry: &PlatformEntry) -> bool {
        match self.os {
            Some(os) => entry.os == os,
            None => self.style == Style::All || entry.class == self.style,
        }
    }
}

/// Expand a selector into build pairs: registry order, then each row's
/// architecture order.
pub fn resolve(selector: &Selector) -> Vec<BuildPair> {
    BUILD_REGISTRY
        .iter()
        .filter(|entry| selector.matches(entry))
        .flat_map(|entry| entry.arches.iter().map(move |&arch| BuildPair::new(entry.os, arch)))
        .collect()
}
