use std::path::PathBuf;
use std::time::Duration;

use tutto_printer::PlanSettings;

use crate::printing::StoreHeader;

/// Print agent configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | HTTP_HOST | 0.0.0.0 | Listen address |
/// | HTTP_PORT | 3001 | HTTP port |
/// | PRINTER_NAME | POS-58(copy of 2) | Spooler printer name |
/// | PRINTER_PORT | (USB001 on Windows) | Raw port/device used as fallback |
/// | LP_DESTINATION | printer | `lp` destination |
/// | PRINTER_ADDR | - | Raw TCP printer `host:port`, overrides the OS path |
/// | PAPER_WIDTH | 32 | Receipt columns |
/// | PRINT_TIMEOUT_MS | 15000 | Bound on each print attempt |
/// | STAGING_DIR | OS temp dir | Where staged tickets are written |
/// | LOG_DIR | %LOCALAPPDATA%\TuttoBenePrintAgent or . | Log file directory |
/// | LOG_LEVEL | info | Default tracing filter |
/// | STORE_NAME / STORE_SUBTITLE | TUTTO BENE / PASTAS ARTESANALES | Receipt header |
/// | STORE_CONTACT | original contact lines | `|`-separated header lines |
///
/// # Example
///
/// ```ignore
/// PRINTER_NAME=POS-80 HTTP_PORT=8080 print-agent
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_host: String,
    pub http_port: u16,
    pub printer_name: String,
    pub printer_port: Option<String>,
    pub lp_destination: String,
    pub printer_addr: Option<String>,
    pub paper_width: usize,
    pub print_timeout_ms: u64,
    pub staging_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub store: StoreHeader,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Empty values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = StoreHeader::default();

        Self {
            http_host: var("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            http_port: var("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            printer_name: var("PRINTER_NAME").unwrap_or_else(|| "POS-58(copy of 2)".into()),
            printer_port: var("PRINTER_PORT"),
            lp_destination: var("LP_DESTINATION").unwrap_or_else(|| "printer".into()),
            printer_addr: var("PRINTER_ADDR"),
            paper_width: var("PAPER_WIDTH")
                .and_then(|w| w.parse::<usize>().ok())
                .filter(|w| *w > 0)
                .unwrap_or(32),
            print_timeout_ms: var("PRINT_TIMEOUT_MS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(15000),
            staging_dir: var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            log_dir: var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_log_dir(var("LOCALAPPDATA"))),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            store: StoreHeader {
                name: var("STORE_NAME").unwrap_or(defaults.name),
                subtitle: var("STORE_SUBTITLE").unwrap_or(defaults.subtitle),
                contact_lines: var("STORE_CONTACT")
                    .map(|c| c.split('|').map(|l| l.trim().to_string()).collect())
                    .unwrap_or(defaults.contact_lines),
            },
        }
    }

    /// `host:port` to bind the HTTP server to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn print_timeout(&self) -> Duration {
        Duration::from_millis(self.print_timeout_ms)
    }

    /// Settings for choosing the delivery plan
    pub fn plan_settings(&self) -> PlanSettings {
        PlanSettings {
            printer_name: self.printer_name.clone(),
            printer_port: self.printer_port.clone(),
            lp_destination: self.lp_destination.clone(),
            network_addr: self.printer_addr.clone(),
            timeout: self.print_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn default_log_dir(local_app_data: Option<String>) -> PathBuf {
    match local_app_data {
        Some(base) if cfg!(windows) => PathBuf::from(base).join("TuttoBenePrintAgent"),
        _ => PathBuf::from("."),
    }
}
