//! Web permission requests.
//!
//! The allow-list is installed on the WebKitGTK `permission-request` signal
//! on Linux and on the WebView2 `PermissionRequested` event on Windows.
//! macOS keeps the WKWebView defaults.

use tauri::WebviewWindow;

#[cfg(target_os = "linux")]
pub fn install(window: &WebviewWindow) {
    use infinity_shell_policy::Permission;
    use webkit2gtk::glib::prelude::ObjectExt;
    use webkit2gtk::{PermissionRequestExt, WebViewExt};

    let result = window.with_webview(|platform_webview| {
        platform_webview
            .inner()
            .connect_permission_request(|_, request| {
                let permission = Permission::from_webkit_type(request.type_().name());
                if permission.decide() {
                    request.allow();
                } else {
                    request.deny();
                }
                true
            });
    });
    if let Err(e) = result {
        tracing::warn!("failed to install permission handler: {e}");
    }
}

#[cfg(windows)]
pub fn install(window: &WebviewWindow) {
    use infinity_shell_policy::Permission;
    use webview2_com::Microsoft::Web::WebView2::Win32::{
        COREWEBVIEW2_PERMISSION_KIND, COREWEBVIEW2_PERMISSION_STATE_ALLOW,
        COREWEBVIEW2_PERMISSION_STATE_DENY, ICoreWebView2,
    };
    use webview2_com::PermissionRequestedEventHandler;

    let result = window.with_webview(|platform_webview| {
        let handler = PermissionRequestedEventHandler::create(Box::new(|_, args| {
            let Some(args) = args else {
                return Ok(());
            };
            let mut kind = COREWEBVIEW2_PERMISSION_KIND::default();
            unsafe {
                args.PermissionKind(&mut kind)?;
                let state = if Permission::from_webview2_kind(kind.0).decide() {
                    COREWEBVIEW2_PERMISSION_STATE_ALLOW
                } else {
                    COREWEBVIEW2_PERMISSION_STATE_DENY
                };
                args.SetState(state)
            }
        }));

        let registered = unsafe {
            platform_webview
                .controller()
                .CoreWebView2()
                .and_then(|core: ICoreWebView2| {
                    let mut token: i64 = 0;
                    core.add_PermissionRequested(&handler, &mut token)
                })
        };
        if let Err(e) = registered {
            tracing::warn!("failed to register permission handler: {e}");
        }
    });
    if let Err(e) = result {
        tracing::warn!("failed to install permission handler: {e}");
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn install(_window: &WebviewWindow) {}
