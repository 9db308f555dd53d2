//! Web permission allow-list.

use std::fmt;

use tracing::debug;

/// A permission requested by the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    /// Microphone and camera.
    Media,
    MediaKeySystem,
    Notifications,
    ClipboardRead,
    Other(String),
}

impl Permission {
    /// Parses a permission by its web name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "media" => Permission::Media,
            "mediaKeySystem" => Permission::MediaKeySystem,
            "notifications" => Permission::Notifications,
            "clipboard-read" => Permission::ClipboardRead,
            other => Permission::Other(other.to_string()),
        }
    }

    /// Classifies a WebKitGTK permission request by its GObject type name.
    ///
    /// Device enumeration is part of `getUserMedia`, so it counts as media.
    pub fn from_webkit_type(type_name: &str) -> Self {
        match type_name {
            "WebKitUserMediaPermissionRequest" | "WebKitDeviceInfoPermissionRequest" => {
                Permission::Media
            }
            "WebKitMediaKeySystemPermissionRequest" => Permission::MediaKeySystem,
            "WebKitNotificationPermissionRequest" => Permission::Notifications,
            "WebKitClipboardPermissionRequest" => Permission::ClipboardRead,
            "WebKitGeolocationPermissionRequest" => Permission::Other("geolocation".into()),
            "WebKitPointerLockPermissionRequest" => Permission::Other("pointerLock".into()),
            "WebKitWebsiteDataAccessPermissionRequest" => {
                Permission::Other("storage-access".into())
            }
            other => Permission::Other(other.to_string()),
        }
    }

    /// Classifies a WebView2 permission request by its
    /// `COREWEBVIEW2_PERMISSION_KIND` value.
    pub fn from_webview2_kind(kind: i32) -> Self {
        match kind {
            1 | 2 => Permission::Media,
            4 => Permission::Notifications,
            6 => Permission::ClipboardRead,
            3 => Permission::Other("geolocation".into()),
            5 => Permission::Other("sensors".into()),
            7 => Permission::Other("automatic-downloads".into()),
            8 => Permission::Other("file-system".into()),
            9 => Permission::Other("autoplay".into()),
            10 => Permission::Other("local-fonts".into()),
            11 => Permission::Other("midi-sysex".into()),
            12 => Permission::Other("window-management".into()),
            other => Permission::Other(format!("webview2-kind-{other}")),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Permission::Media => "media",
            Permission::MediaKeySystem => "mediaKeySystem",
            Permission::Notifications => "notifications",
            Permission::ClipboardRead => "clipboard-read",
            Permission::Other(name) => name,
        }
    }

    /// Whether the shell grants this permission.
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Permission::Other(_))
    }

    /// [`is_allowed`](Self::is_allowed), logging denials.
    pub fn decide(&self) -> bool {
        let allowed = self.is_allowed();
        if !allowed {
            debug!(permission = %self, "permission denied");
        }
        allowed
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list() {
        for name in ["media", "mediaKeySystem", "notifications", "clipboard-read"] {
            let permission = Permission::from_name(name);
            assert!(permission.is_allowed(), "{name}");
            assert_eq!(permission.name(), name);
        }
    }

    #[test]
    fn everything_else_is_denied() {
        for name in ["geolocation", "midi", "clipboard-sanitized-write", "openExternal", ""] {
            let permission = Permission::from_name(name);
            assert!(!permission.decide(), "{name}");
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!(!Permission::from_name("Media").is_allowed());
        assert!(!Permission::from_name("mediakeysystem").is_allowed());
    }

    #[test]
    fn webkit_requests() {
        assert_eq!(
            Permission::from_webkit_type("WebKitUserMediaPermissionRequest"),
            Permission::Media
        );
        assert_eq!(
            Permission::from_webkit_type("WebKitNotificationPermissionRequest"),
            Permission::Notifications
        );
        assert_eq!(
            Permission::from_webkit_type("WebKitClipboardPermissionRequest"),
            Permission::ClipboardRead
        );
        assert!(Permission::from_webkit_type("WebKitDeviceInfoPermissionRequest").is_allowed());
        assert!(!Permission::from_webkit_type("WebKitGeolocationPermissionRequest").is_allowed());
        assert!(!Permission::from_webkit_type("WebKitSomethingNew").is_allowed());
    }

    #[test]
    fn webview2_requests() {
        // MICROPHONE, CAMERA
        assert_eq!(Permission::from_webview2_kind(1), Permission::Media);
        assert_eq!(Permission::from_webview2_kind(2), Permission::Media);
        assert_eq!(Permission::from_webview2_kind(4), Permission::Notifications);
        assert_eq!(Permission::from_webview2_kind(6), Permission::ClipboardRead);

        let geolocation = Permission::from_webview2_kind(3);
        assert_eq!(geolocation.name(), "geolocation");
        assert!(!geolocation.decide());

        for kind in [0, 5, 7, 8, 9, 10, 11, 12, 99] {
            assert!(!Permission::from_webview2_kind(kind).is_allowed(), "{kind}");
        }
        assert_eq!(Permission::from_webview2_kind(0).name(), "webview2-kind-0");
    }
}
