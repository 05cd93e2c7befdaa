pub mod audit;
pub mod report;

use colored::Colorize;

pub use audit::{
    AuditOptions, AuditOutcome, AuditProgressCallback, AuditReport, StatusSummary,
    execute_audit,
};
pub use report::{ReportError, ReportFormat};

const BANNER: &str = r#"
     _ _            _               _
 ___(_) |_ ___  ___| |__   ___  ___| | __
/ __| | __/ _ \/ __| '_ \ / _ \/ __| |/ /
\__ \ | ||  __/ (__| | | |  __/ (__|   <
|___/_|\__\___|\___|_| |_|\___|\___|_|\_\
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "sitemap discovery and URL status audit".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
