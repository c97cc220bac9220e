//! Target operating systems.

use std::fmt;

use serde::Serialize;

/// A target operating system identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    Aix,
    Android,
    Darwin,
    Dragonfly,
    Freebsd,
    Illumos,
    Ios,
    Js,
    Linux,
    Netbsd,
    Openbsd,
    Plan9,
    Solaris,
    Wasip1,
    Windows,
}

impl TargetOs {
    /// All known operating systems, alphabetical.
    pub const ALL: [TargetOs; 15] = [
        TargetOs::Aix,
        TargetOs::Android,
        TargetOs::Darwin,
        TargetOs::Dragonfly,
        TargetOs::Freebsd,
        TargetOs::Illumos,
        TargetOs::Ios,
        TargetOs::Js,
        TargetOs::Linux,
        TargetOs::Netbsd,
        TargetOs::Openbsd,
        TargetOs::Plan9,
        TargetOs::Solaris,
        TargetOs::Wasip1,
        TargetOs::Windows,
    ];

    /// Parse an OS name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|os| os.as_str() == name)
    }

    /// Toolchain name (the value exported as the OS variable).
    pub fn as_str(self) -> &'static str {
        match self {
            TargetOs::Aix => "aix",
            TargetOs::Android => "android",
            TargetOs::Darwin => "darwin",
            TargetOs::Dragonfly => "dragonfly",
            TargetOs::Freebsd => "freebsd",
            TargetOs::Illumos => "illumos",
            TargetOs::Ios => "ios",
            TargetOs::Js => "js",
            TargetOs::Linux => "linux",
            TargetOs::Netbsd => "netbsd",
            TargetOs::Openbsd => "openbsd",
            TargetOs::Plan9 => "plan9",
            TargetOs::Solaris => "solaris",
            TargetOs::Wasip1 => "wasip1",
            TargetOs::Windows => "windows",
        }
    }

    pub fn is_windows(self) -> bool {
        self == TargetOs::Windows
    }

    /// Suffix appended to executables built for this OS.
    pub fn executable_suffix(self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TargetOs::parse("Darwin"), Some(TargetOs::Darwin));
        assert_eq!(TargetOs::parse("WINDOWS"), Some(TargetOs::Windows));
    }

    #[test]
    fn parse_does_not_trim() {
        assert_eq!(TargetOs::parse(" linux "), None);
        assert_eq!(TargetOs::parse("linux\n"), None);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(TargetOs::parse(""), None);
        assert_eq!(TargetOs::parse("beos"), None);
        assert_eq!(TargetOs::parse("macos"), None);
    }

    #[test]
    fn every_name_parses_back() {
        for os in TargetOs::ALL {
            assert_eq!(TargetOs::parse(os.as_str()), Some(os));
        }
    }

    #[test]
    fn only_windows_gets_exe_suffix() {
        for os in TargetOs::ALL {
            let expected = if os == TargetOs::Windows { ".exe" } else { "" };
            assert_eq!(os.executable_suffix(), expected, "{os}");
        }
    }
}
