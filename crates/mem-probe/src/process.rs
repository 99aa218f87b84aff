//! Whole-process resident memory readers.

use crate::error::ProbeError;
use std::fmt;
use std::process::Command;
use tracing::debug;

/// Source of the process's resident set size.
pub trait ProcessMemoryReader: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Resident bytes of the current process.
    fn resident_bytes(&self) -> Result<u64, ProbeError>;
}

/// Reads `VmRSS` from `/proc/self/status`.
#[derive(Debug, Default)]
pub struct ProcStatusReader;

impl ProcessMemoryReader for ProcStatusReader {
    fn name(&self) -> &'static str {
        "proc"
    }

    fn resident_bytes(&self) -> Result<u64, ProbeError> {
        let status = std::fs::read_to_string("/proc/self/status")?;
        parse_vm_rss(&status)
    }
}

/// Extract `VmRSS` (reported in kB) as bytes.
pub fn parse_vm_rss(status: &str) -> Result<u64, ProbeError> {
    let line = status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .ok_or_else(|| ProbeError::Parse("no VmRSS line".to_string()))?;

    line.split_whitespace()
        .nth(1)
        .and_then(|kb| kb.parse::<u64>().ok())
        .and_then(|kb| kb.checked_mul(1024))
        .ok_or_else(|| ProbeError::Parse(line.to_string()))
}

/// Runs `ps -q <pid> -o rss=`.
#[derive(Debug, Default)]
pub struct PsReader;

impl ProcessMemoryReader for PsReader {
    fn name(&self) -> &'static str {
        "ps"
    }

    fn resident_bytes(&self) -> Result<u64, ProbeError> {
        let pid = std::process::id().to_string();
        let output = Command::new("ps")
            .args(["-q", pid.as_str(), "-o", "rss="])
            .output()?;
        if !output.status.success() {
            return Err(ProbeError::CommandFailed(output.status));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        debug!("ps rss output: {}", text.trim());
        parse_ps_rss(&text)
    }
}

const UNIT_FACTORS: [(&str, u64); 9] = [
    ("KB", 1 << 10),
    ("MB", 1 << 20),
    ("GB", 1 << 30),
    ("TB", 1 << 40),
    ("K", 1 << 10),
    ("M", 1 << 20),
    ("G", 1 << 30),
    ("T", 1 << 40),
    ("B", 1),
];

/// Parse the `rss=` column of `ps`. A bare number is KiB; otherwise a unit
/// suffix (`B`, `K`, `KB`, `M`, `MB`, `G`, `GB`, `T`, `TB`, any case) is
/// required.
pub fn parse_ps_rss(output: &str) -> Result<u64, ProbeError> {
    let trimmed = output.trim();
    let overflow = || ProbeError::Parse(format!("{trimmed} overflows a byte count"));
    if let Ok(kib) = trimmed.parse::<u64>() {
        return kib.checked_mul(1024).ok_or_else(overflow);
    }

    let upper = trimmed.to_ascii_uppercase();
    for (unit, factor) in UNIT_FACTORS {
        if let Some(number) = upper.strip_suffix(unit) {
            if let Ok(value) = number.trim().parse::<u64>() {
                return value.checked_mul(factor).ok_or_else(overflow);
            }
        }
    }

    Err(ProbeError::Parse(trimmed.to_string()))
}

/// Uses the `sysinfo` crate, for platforms without `/proc`.
#[derive(Debug, Default)]
pub struct SysinfoReader;

impl ProcessMemoryReader for SysinfoReader {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn resident_bytes(&self) -> Result<u64, ProbeError> {
        let pid = sysinfo::get_current_pid().map_err(|e| ProbeError::Unavailable(e.to_string()))?;
        let sys = sysinfo::System::new_all();
        sys.process(pid)
            .map(|process| process.memory())
            .ok_or_else(|| ProbeError::Unavailable(format!("process {pid} not listed")))
    }
}

/// Reports nothing. Selected explicitly to skip process measurement.
#[derive(Debug, Default)]
pub struct NullReader;

impl ProcessMemoryReader for NullReader {
    fn name(&self) -> &'static str {
        "none"
    }

    fn resident_bytes(&self) -> Result<u64, ProbeError> {
        Ok(0)
    }
}

/// Which reader to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RssSource {
    /// `/proc` on Linux, `ps` on other Unix systems, `sysinfo` elsewhere
    #[default]
    Auto,
    Proc,
    Ps,
    Sysinfo,
    None,
}

impl RssSource {
    /// Build the reader for this source.
    pub fn reader(self) -> Box<dyn ProcessMemoryReader> {
        match self {
            RssSource::Auto => Self::platform_default().reader(),
            RssSource::Proc => Box::new(ProcStatusReader),
            RssSource::Ps => Box::new(PsReader),
            RssSource::Sysinfo => Box::new(SysinfoReader),
            RssSource::None => Box::new(NullReader),
        }
    }

    fn platform_default() -> Self {
        if cfg!(target_os = "linux") {
            RssSource::Proc
        } else if cfg!(unix) {
            RssSource::Ps
        } else {
            RssSource::Sysinfo
        }
    }
}

impl fmt::Display for RssSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RssSource::Auto => "auto",
            RssSource::Proc => "proc",
            RssSource::Ps => "ps",
            RssSource::Sysinfo => "sysinfo",
            RssSource::None => "none",
        };
        f.write_str(name)
    }
}
