use serde::{Deserialize, Serialize};

/// Threat score at or above which a completed sandbox run is malicious
pub const MALICIOUS_THREAT_SCORE: u32 = 75;

/// Verdict label the sandbox assigns to outright malicious samples
const MALICIOUS_VERDICT_LABEL: &str = "malicious";

/// Execution state of a sandbox analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SandboxState {
    /// Analysis completed and produced a result
    Success,
    /// Sample is waiting to be detonated
    InQueue,
    /// Sample is currently executing
    InProgress,
    /// Analysis failed on the sandbox side
    Error,
    /// Any state this client does not recognize
    #[serde(other)]
    Unknown,
}

impl SandboxState {
    /// Returns true if the analysis completed with a usable result
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl std::fmt::Display for SandboxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::InQueue => write!(f, "IN_QUEUE"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Error => write!(f, "ERROR"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Response envelope from the sandbox analysis endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxReport {
    /// The single analysis carried by the envelope
    #[serde(rename = "hybridAnalysis")]
    pub hybrid_analysis: SandboxAnalysis,
}

/// Raw sandbox analysis as returned on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxAnalysis {
    /// Execution state of the run
    pub state: SandboxState,

    /// Verdict label ("malicious", "suspicious", ...)
    #[serde(default)]
    pub verdict: Option<String>,

    /// Threat score on a 0-100 scale
    #[serde(default)]
    pub threat_score: Option<u32>,

    /// Processes observed during detonation
    #[serde(default)]
    pub processes: Vec<ProcessObservation>,

    /// Network connections opened by the sample
    #[serde(default)]
    pub network_connections: Vec<NetworkConnection>,

    /// Filesystem operations performed by the sample
    #[serde(default)]
    pub file_operations: Vec<FileOperation>,

    /// Registry operations performed by the sample
    #[serde(default)]
    pub registry_operations: Vec<RegistryOperation>,
}

/// A process the sandbox observed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessObservation {
    /// Executable name
    pub name: String,

    /// Full command line
    #[serde(default)]
    pub cmd_line: String,

    /// Whether the sandbox flagged the process
    #[serde(default)]
    pub suspicious: bool,
}

/// A network connection the sandbox observed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConnection {
    /// Protocol name ("tcp", "udp", "http", ...)
    pub protocol: String,

    /// Destination host or address
    pub destination: String,

    /// Destination port
    pub port: u16,
}

/// A filesystem operation the sandbox observed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOperation {
    /// Operation kind ("create", "delete", "write", ...)
    pub operation: String,

    /// Target path
    pub path: String,
}

/// A registry operation the sandbox observed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryOperation {
    /// Operation kind ("set", "delete", ...)
    pub operation: String,

    /// Target registry key
    pub key: String,
}

/// Human-readable analysis details persisted with a behavioral record.
///
/// Field names stay camelCase on the wire for compatibility with rows
/// written by earlier versions of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisDetails {
    /// Verdict label, "unknown" when the sandbox omitted one, "error" for
    /// runs that never completed
    pub verdict: String,

    /// Threat score, 0 when absent
    pub threat_score: u32,

    /// Flagged processes rendered as `name (cmd_line)`
    pub suspicious_processes: Vec<String>,

    /// Connections rendered as `protocol://destination:port`
    pub network_connections: Vec<String>,

    /// Filesystem operations rendered as `operation: path`
    pub file_operations: Vec<String>,

    /// Registry operations rendered as `operation: key`
    pub registry_operations: Vec<String>,

    /// Why the analysis produced no verdict, for runs that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Default for AnalysisDetails {
    fn default() -> Self {
        Self {
            verdict: "unknown".to_string(),
            threat_score: 0,
            suspicious_processes: Vec::new(),
            network_connections: Vec::new(),
            file_operations: Vec::new(),
            registry_operations: Vec::new(),
            error: None,
        }
    }
}

/// Interpreted outcome of a sandbox submission
#[derive(Debug, Clone)]
pub struct SandboxVerdict {
    /// Whether the analysis ran to completion
    pub success: bool,

    /// Whether the sample is considered malicious
    pub malicious: bool,

    /// Details suitable for persisting alongside the verdict
    pub details: AnalysisDetails,
}

impl SandboxVerdict {
    /// Interpret a raw sandbox report.
    ///
    /// Only a run in the `SUCCESS` state can produce a malicious verdict. A
    /// completed run is malicious when its threat score reaches
    /// [`MALICIOUS_THREAT_SCORE`], when any observed process was flagged
    /// suspicious, or when the sandbox labeled it "malicious" outright.
    /// Every other state yields a benign verdict with an error marker so a
    /// failed analysis is never mistaken for a clean one.
    #[must_use]
    pub fn from_report(report: &SandboxReport) -> Self {
        let analysis = &report.hybrid_analysis;

        if !analysis.state.is_success() {
            return Self::failure(&format!(
                "analysis did not complete: state {}",
                analysis.state
            ));
        }

        let suspicious_processes: Vec<String> = analysis
            .processes
            .iter()
            .filter(|p| p.suspicious)
            .map(|p| format!("{} ({})", p.name, p.cmd_line))
            .collect();

        let threat_score = analysis.threat_score.unwrap_or(0);
        let malicious = threat_score >= MALICIOUS_THREAT_SCORE
            || !suspicious_processes.is_empty()
            || analysis.verdict.as_deref() == Some(MALICIOUS_VERDICT_LABEL);

        Self {
            success: true,
            malicious,
            details: AnalysisDetails {
                verdict: analysis
                    .verdict
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                threat_score,
                suspicious_processes,
                network_connections: analysis
                    .network_connections
                    .iter()
                    .map(|c| format!("{}://{}:{}", c.protocol, c.destination, c.port))
                    .collect(),
                file_operations: analysis
                    .file_operations
                    .iter()
                    .map(|o| format!("{}: {}", o.operation, o.path))
                    .collect(),
                registry_operations: analysis
                    .registry_operations
                    .iter()
                    .map(|o| format!("{}: {}", o.operation, o.key))
                    .collect(),
                error: None,
            },
        }
    }

    /// Benign-leaning verdict for an analysis that never completed
    #[must_use]
    pub fn failure(reason: &str) -> Self {
        Self {
            success: false,
            malicious: false,
            details: AnalysisDetails {
                verdict: "error".to_string(),
                error: Some(reason.to_string()),
                ..AnalysisDetails::default()
            },
        }
    }
}
