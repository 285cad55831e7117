//! Compilation profile

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The compilation profile the service uses when compiling a pipeline's program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilationProfile {
    /// Let the compiler server pick its own default.
    ///
    /// Has no wire value; it is sent as `null`.
    #[serde(skip)]
    ServerDefault,

    /// The development profile.
    Dev,

    /// The unoptimized profile.
    Unoptimized,

    /// The optimized profile, the default for this client.
    #[default]
    Optimized,
}

impl CompilationProfile {
    /// Wire value of this profile, `None` for [`CompilationProfile::ServerDefault`]
    pub fn as_wire_str(&self) -> Option<&'static str> {
        match self {
            CompilationProfile::ServerDefault => None,
            CompilationProfile::Dev => Some("dev"),
            CompilationProfile::Unoptimized => Some("unoptimized"),
            CompilationProfile::Optimized => Some("optimized"),
        }
    }
}

impl std::fmt::Display for CompilationProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str().unwrap_or("server-default"))
    }
}

impl FromStr for CompilationProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dev" => Ok(CompilationProfile::Dev),
            "unoptimized" => Ok(CompilationProfile::Unoptimized),
            "optimized" => Ok(CompilationProfile::Optimized),
            "server-default" | "server_default" => Ok(CompilationProfile::ServerDefault),
            other => Err(format!("unknown compilation profile '{}'", other)),
        }
    }
}
