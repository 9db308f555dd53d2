//! Audit rules applied line by line to each source file.

use std::fmt;

use regex::Regex;

/// Files already known to handle a pattern correctly, relative to the
/// front-end root with `/` separators.
const SAFE_REDIRECT_FILES: &[&str] = &["main.tsx"];
const SAFE_POPUP_FILES: &[&str] = &["shared/utils/electron.utils.ts"];
const SAFE_DOWNLOAD_FILES: &[&str] = &["shared/utils/electron.utils.ts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warn,
    Info,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Warn => "WARN",
            Status::Info => "INFO",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub file: String,
    /// 1-based.
    pub line: usize,
    pub pattern: &'static str,
    pub code: String,
    pub status: Status,
    pub suggestion: &'static str,
}

/// Compiled rule set.
pub struct Scanner {
    redirect: Regex,
    reload: Regex,
    popup: Regex,
    tel_popup: Regex,
    anchor: Regex,
    object_url: Regex,
    auth_redirect: Regex,
    media: Regex,
}

impl Scanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            redirect: Regex::new(r"window\.location\.href\s*=")?,
            reload: Regex::new(r"window\.location\.reload\(\)")?,
            popup: Regex::new(r"window\.open\(")?,
            tel_popup: Regex::new(r#"window\.open\(\s*[`'"]tel:"#)?,
            anchor: Regex::new(r#"document\.createElement\(['"]a['"]\)"#)?,
            object_url: Regex::new(r"URL\.createObjectURL")?,
            auth_redirect: Regex::new(r"window\.location\.href\s*=.*[Aa]uth")?,
            media: Regex::new(r"navigator\.mediaDevices")?,
        })
    }

    /// Findings for one file. `file` is the path relative to the front-end
    /// root and is used both for reporting and for the safe-file lists.
    pub fn scan(&self, file: &str, content: &str) -> Vec<Finding> {
        let normalized = file.replace('\\', "/");
        let guarded = content.contains("isElectron");
        let uses_download_helper = content.contains("downloadFile");
        let is_auth_file = normalized.contains("auth.ts") || normalized.contains("oauth");

        let mut findings = Vec::new();
        let mut push = |line: usize,
                        pattern: &'static str,
                        code: &str,
                        status: Status,
                        suggestion: &'static str| {
            findings.push(Finding {
                file: file.to_string(),
                line,
                pattern,
                code: code.to_string(),
                status,
                suggestion,
            });
        };

        for (i, raw) in content.lines().enumerate() {
            let line = i + 1;
            let code = raw.trim();
            let commented = code.starts_with("//");

            if !commented && self.redirect.is_match(raw) {
                let safe = guarded || is_listed(SAFE_REDIRECT_FILES, &normalized);
                let (status, suggestion) = if safe {
                    (Status::Ok, "Guarded by isElectron() or known safe")
                } else {
                    (Status::Warn, "Use navigateTo() from electron.utils.ts")
                };
                push(line, "window.location.href =", code, status, suggestion);
            }

            if !commented && self.reload.is_match(raw) {
                push(
                    line,
                    "window.location.reload()",
                    code,
                    Status::Info,
                    "Hard reload, usually OK; verify if needed",
                );
            }

            if !commented && self.popup.is_match(raw) {
                let (status, suggestion) = if is_listed(SAFE_POPUP_FILES, &normalized) {
                    (Status::Ok, "Already in electron.utils")
                } else if self.tel_popup.is_match(raw) {
                    (Status::Ok, "tel: link, dialed by the shell")
                } else {
                    (Status::Info, "Verify the shell opens this in the browser")
                };
                push(line, "window.open()", code, status, suggestion);
            }

            let download_exempt =
                uses_download_helper || is_listed(SAFE_DOWNLOAD_FILES, &normalized);

            // Matched on commented lines too.
            if !download_exempt && self.anchor.is_match(raw) {
                push(
                    line,
                    "Manual download (createElement a)",
                    code,
                    Status::Warn,
                    "Use downloadFile() from electron.utils.ts for the native save dialog",
                );
            }

            if !commented && !download_exempt && self.object_url.is_match(raw) {
                push(
                    line,
                    "URL.createObjectURL (possible download)",
                    code,
                    Status::Info,
                    "If this is a download, use downloadFile()",
                );
            }

            if is_auth_file && !commented && self.auth_redirect.is_match(raw) {
                let (status, suggestion) = if guarded {
                    (Status::Ok, "isElectron check present")
                } else {
                    (Status::Warn, "Add an isElectron() check and use popup mode instead of a redirect")
                };
                push(line, "OAuth redirect", code, status, suggestion);
            }

            if !commented && self.media.is_match(raw) {
                push(
                    line,
                    "navigator.mediaDevices",
                    code,
                    Status::Info,
                    "WebRTC; make sure the shell grants media permissions",
                );
            }
        }

        findings
    }
}

fn is_listed(list: &[&str], normalized: &str) -> bool {
    list.iter().any(|safe| normalized.contains(safe))
}
