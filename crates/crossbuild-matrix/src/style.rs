//! Build styles: coarse groupings of operating systems.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// A named class of operating systems used to filter the build registry.
///
/// `All` is a selector only; no registry row carries it as its class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    All,
    #[default]
    Pc,
    Unix,
    Mobile,
    Web,
    P2p,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::All,
        Style::Pc,
        Style::Unix,
        Style::Mobile,
        Style::Web,
        Style::P2p,
    ];

    /// Parse a style name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Parse a style name, falling back to [`Style::Pc`] for empty or
    /// unrecognized input.
    pub fn normalize(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            debug!(style = name, "unrecognized style, using pc");
            Style::Pc
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Style::All => "all",
            Style::Pc => "pc",
            Style::Unix => "unix",
            Style::Mobile => "mobile",
            Style::Web => "web",
            Style::P2p => "p2p",
        }
    }

    /// One-line description for help output.
    pub fn description(self) -> &'static str {
        match self {
            Style::All => "every operating system",
            Style::Pc => "windows, linux, darwin",
            Style::Unix => "aix, freebsd, illumos, netbsd, openbsd, plan9, solaris",
            Style::Mobile => "android, ios",
            Style::Web => "js, wasip1",
            Style::P2p => "dragonfly",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
