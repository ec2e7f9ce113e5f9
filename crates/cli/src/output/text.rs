use std::path::Path;

use colored::Colorize;
use vyper_guard::classifier::Assessment;
use vyper_guard::config::Config;
use vyper_guard::input::ContractRecord;
use vyper_guard::report::{ContractOutcome, ScanReport};
use vyper_guard::Network;

/// Human-readable scan progress. Lines go to stderr when stdout carries JSON.
pub struct Console {
    pub quiet: bool,
    pub to_stderr: bool,
}

impl Console {
    pub fn new(quiet: bool, no_color: bool, to_stderr: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { quiet, to_stderr }
    }

    fn emit(&self, line: String) {
        if self.quiet {
            return;
        }
        if self.to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub fn banner(&self, networks: &[Network], config: &Config) {
        let names: Vec<&str> = networks.iter().map(|n| n.as_str()).collect();
        self.emit(String::new());
        self.emit(format!("{}", "  vyper-guard - nonreentrant lock triage".bold()));
        self.emit(format!("  Networks: {}", names.join(", ")));
        self.emit(format!(
            "  Vulnerable compilers: {}",
            config
                .vulnerable_versions()
                .into_iter()
                .collect::<Vec<_>>()
                .join(", ")
        ));
        self.emit(String::new());
    }

    /// One line per fetched contract; skipped rows stay silent.
    pub fn outcome(&self, record: &ContractRecord, outcome: &ContractOutcome) {
        let prefix = format!("  {} {}", record.network, record.address);
        let line = match outcome {
            ContractOutcome::Skipped { .. } => return,
            ContractOutcome::Suppressed => format!("{prefix} {}", "suppressed".dimmed()),
            ContractOutcome::Flagged {
                compiler_version,
                assessment,
            } => format!(
                "{prefix} ({compiler_version}) {} {}",
                "could be vulnerable, saved".red().bold(),
                assessment.summary().dimmed()
            ),
            ContractOutcome::Cleared { compiler_version } => format!(
                "{prefix} ({compiler_version}) {}",
                "narrowed down to non-vulnerable, removed".yellow()
            ),
            ContractOutcome::Safe { compiler_version } => format!(
                "{prefix} ({compiler_version}) {}",
                "contract looks safe".green()
            ),
        };
        self.emit(line);
    }

    pub fn summary(&self, report: &ScanReport) {
        self.emit(String::new());
        self.emit(format!("{}", "  Summary".bold().underline()));
        for s in &report.networks {
            let name = s.network.map_or("-", |n| n.as_str());
            self.emit(format!(
                "    {name:<10} rows {:>6}  classified {:>5}  flagged {:>4}  cleared {:>4}",
                s.records,
                s.classified(),
                s.flagged,
                s.cleared
            ));
        }
        let t = &report.totals;
        self.emit(format!("    Skipped (compiler): {}", t.skipped));
        self.emit(format!("    Suppressed:         {}", t.suppressed));
        self.emit(format!("    Flagged:            {}", t.flagged));
        self.emit(format!("    Cleared:            {}", t.cleared));
        self.emit(String::new());
    }
}

pub fn print_assessment(path: &Path, assessment: &Assessment, no_color: bool) {
    if no_color {
        colored::control::set_override(false);
    }

    let verdict = if assessment.vulnerable {
        "POSSIBLY VULNERABLE".red().bold()
    } else {
        "LOOKS SAFE".green().bold()
    };
    println!("  [{}] {}", verdict, path.display());
    println!("    {}", assessment.summary());

    println!(
        "    {} payable entry point: {}",
        "-->".dimmed(),
        if assessment.payable { "yes" } else { "no" }
    );
    for (lock, count) in &assessment.reused_locks {
        println!("    {} reused lock {lock} x{count}", "-->".dimmed());
    }
    for site in &assessment.unsafe_calls {
        println!(
            "    {} raw_call at byte {}",
            "-->".dimmed(),
            site.match_offset
        );
        for line in site.argument_text.lines() {
            println!("    {} {}", "|".dimmed(), line);
        }
    }
    println!();
}
