//! Plain-text audit report.

use std::fmt::Write;

use crate::rules::{Finding, Status};

const RULE_WIDTH: usize = 50;

pub fn has_warnings(findings: &[Finding]) -> bool {
    findings.iter().any(|f| f.status == Status::Warn)
}

/// Warnings, then informational findings, then the OK count and a summary.
pub fn render(findings: &[Finding]) -> String {
    let count = |status: Status| findings.iter().filter(|f| f.status == status).count();
    let (warns, infos, oks) = (count(Status::Warn), count(Status::Info), count(Status::Ok));
    let mut out = String::new();

    if warns > 0 {
        out.push_str("WARNINGS (need attention):\n\n");
        section(&mut out, findings, Status::Warn, "Fix: ");
    }
    if infos > 0 {
        out.push_str("INFO (review recommended):\n\n");
        section(&mut out, findings, Status::Info, "Note:");
    }
    if oks > 0 {
        let _ = writeln!(out, "OK: {oks} pattern(s) already handled correctly\n");
    }

    let rule = "-".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "  WARN: {warns}  |  INFO: {infos}  |  OK: {oks}");
    let _ = writeln!(out, "{rule}");

    if warns > 0 {
        out.push_str("\nAction needed: fix the warnings above before shipping desktop.\n");
    } else {
        out.push_str("\nAll clear: desktop is in sync with the front-end.\n");
    }
    out
}

fn section(out: &mut String, findings: &[Finding], status: Status, label: &str) {
    for f in findings.iter().filter(|f| f.status == status) {
        let _ = writeln!(out, "  {}:{}", f.file, f.line);
        let _ = writeln!(out, "    Pattern: {}", f.pattern);
        let _ = writeln!(out, "    Code:    {}", f.code);
        let _ = writeln!(out, "    {label}    {}\n", f.suggestion);
    }
}
