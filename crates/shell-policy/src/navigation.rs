//! Where the content is allowed to go.

use infinity_protocol::TrayAction;
use tracing::debug;
use url::Url;

/// What to do with a navigation or `window.open` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the webview load it.
    Allow,
    /// Cancel, then open in the default browser.
    OpenExternal(String),
    /// Cancel, then forward the number to the content as a dial action.
    Dial(String),
    /// Cancel and drop.
    Deny,
}

impl NavigationDecision {
    /// The tray action to send for a [`Dial`](Self::Dial) decision.
    pub fn dial_action(&self) -> Option<TrayAction> {
        match self {
            NavigationDecision::Dial(number) => Some(TrayAction::Dial(number.clone())),
            _ => None,
        }
    }
}

/// `(scheme, host, port)` of an internal origin. `url::Origin` is opaque for
/// custom schemes, so the triple is compared directly.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OriginKey {
    scheme: String,
    host: Option<String>,
    port: Option<u16>,
}

impl OriginKey {
    fn of(url: &Url) -> Self {
        Self {
            scheme: url.scheme().to_string(),
            host: url.host_str().map(str::to_ascii_lowercase),
            port: url.port_or_known_default(),
        }
    }
}

/// Navigation rules for the main window.
#[derive(Debug, Clone, Default)]
pub struct NavigationPolicy {
    internal: Vec<OriginKey>,
}

impl NavigationPolicy {
    /// Builds a policy whose internal origins are those of `urls`
    /// (the app content URL and, in development, the dev server).
    pub fn new<'a>(urls: impl IntoIterator<Item = &'a Url>) -> Self {
        Self {
            internal: urls.into_iter().map(OriginKey::of).collect(),
        }
    }

    pub fn is_internal(&self, url: &Url) -> bool {
        matches!(url.scheme(), "about" | "tauri") || self.internal.contains(&OriginKey::of(url))
    }

    /// Decision for a `window.open`-style request. Never [`Allow`](NavigationDecision::Allow).
    pub fn decide_new_window(&self, target: &Url) -> NavigationDecision {
        let decision = external_decision(target).unwrap_or(NavigationDecision::Deny);
        debug!(url = %target, ?decision, "new window request");
        decision
    }

    /// Decision for an in-window navigation.
    pub fn decide_navigation(&self, target: &Url) -> NavigationDecision {
        if self.is_internal(target) {
            return NavigationDecision::Allow;
        }
        let decision = external_decision(target).unwrap_or(NavigationDecision::Deny);
        debug!(url = %target, ?decision, "navigation blocked");
        decision
    }
}

fn external_decision(target: &Url) -> Option<NavigationDecision> {
    match target.scheme() {
        "http" | "https" => Some(NavigationDecision::OpenExternal(target.to_string())),
        "tel" => Some(NavigationDecision::Dial(tel_number(target))),
        _ => None,
    }
}

/// Everything after `tel:`, verbatim.
fn tel_number(target: &Url) -> String {
    let raw = target.as_str();
    raw.get("tel:".len()..).unwrap_or_default().to_string()
}
