//! `save-file`.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use infinity_channel::ChannelError;
use infinity_file_ops::write_file;
use infinity_protocol::{Args, ArgsError, ChannelName, FileFilter, SaveFileResult};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use tauri::{AppHandle, Manager, WebviewWindow};
use tauri_plugin_dialog::DialogExt;
use tokio::sync::oneshot;
use tracing::debug;

use crate::state::ShellState;

/// Decoded `save-file` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub bytes: Vec<u8>,
    pub default_name: String,
    pub filters: Vec<FileFilter>,
}

impl SaveRequest {
    /// Bytes arrive as a JSON array of numbers. Filters default to
    /// "All Files" when absent or empty.
    pub fn from_args(args: &Args) -> Result<Self, ArgsError> {
        Ok(Self::new(
            args.required(0, "buffer")?,
            args.optional(1, "defaultName")?.unwrap_or_default(),
            args.optional(2, "filters")?.unwrap_or_default(),
        ))
    }

    /// Builds a request from a raw body. `default_name` and `filters` are
    /// percent-encoded; `filters` is a JSON array once decoded.
    pub fn from_raw(
        bytes: Vec<u8>,
        default_name: Option<&str>,
        filters: Option<&str>,
    ) -> Result<Self, ChannelError> {
        let decode = |raw: &str| percent_decode_str(raw).decode_utf8_lossy().into_owned();
        let filters: Vec<FileFilter> = match filters {
            Some(raw) => serde_json::from_str(&decode(raw))
                .map_err(|e| ChannelError::InvalidArgs(format!("invalid filters: {e}")))?,
            None => Vec::new(),
        };
        Ok(Self::new(
            bytes,
            default_name.map(decode).unwrap_or_default(),
            filters,
        ))
    }

    fn new(bytes: Vec<u8>, default_name: String, filters: Vec<FileFilter>) -> Self {
        Self {
            bytes,
            default_name,
            filters: if filters.is_empty() {
                vec![FileFilter::all_files()]
            } else {
                filters
            },
        }
    }
}

/// Boxed future returned by [`SaveDialog`].
pub type DialogFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Host side of `save-file`: the focused window and the native save dialog.
pub trait SaveDialog: Send + Sync {
    type Window: Send + Sync;

    fn focused_window(&self) -> Option<Self::Window>;

    /// Opens a save dialog over `parent`. `None` when the user cancels.
    fn choose_path<'a>(
        &'a self,
        parent: &'a Self::Window,
        default_name: &'a str,
        filters: &'a [FileFilter],
    ) -> DialogFuture<'a, Result<Option<PathBuf>, ChannelError>>;
}

/// [`SaveDialog`] backed by `tauri-plugin-dialog`.
pub struct TauriSaveDialog {
    app: AppHandle,
}

impl TauriSaveDialog {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl SaveDialog for TauriSaveDialog {
    type Window = WebviewWindow;

    fn focused_window(&self) -> Option<WebviewWindow> {
        self.app
            .webview_windows()
            .into_values()
            .find(|w| w.is_focused().unwrap_or(false))
    }

    fn choose_path<'a>(
        &'a self,
        parent: &'a WebviewWindow,
        default_name: &'a str,
        filters: &'a [FileFilter],
    ) -> DialogFuture<'a, Result<Option<PathBuf>, ChannelError>> {
        let mut dialog = self
            .app
            .dialog()
            .file()
            .set_parent(parent)
            .set_file_name(default_name);
        for filter in filters {
            let extensions: Vec<&str> = filter.extensions.iter().map(String::as_str).collect();
            dialog = dialog.add_filter(&filter.name, &extensions);
        }

        let (tx, rx) = oneshot::channel();
        dialog.save_file(move |path| {
            let _ = tx.send(path);
        });

        Box::pin(async move {
            let Some(path) = rx.await.ok().flatten() else {
                return Ok(None);
            };
            path.into_path()
                .map(Some)
                .map_err(|e| ChannelError::Handler(format!("invalid save path: {e}")))
        })
    }
}

/// Runs one `save-file` request against `dialog`.
pub async fn save<D: SaveDialog>(
    dialog: &D,
    request: SaveRequest,
) -> Result<SaveFileResult, ChannelError> {
    let Some(window) = dialog.focused_window() else {
        debug!("no focused window, save canceled");
        return Ok(SaveFileResult::canceled());
    };

    let Some(path) = dialog
        .choose_path(&window, &request.default_name, &request.filters)
        .await?
    else {
        return Ok(SaveFileResult::canceled());
    };

    write_file(&path, &request.bytes)
        .await
        .map_err(|e| ChannelError::Handler(e.to_string()))?;

    Ok(SaveFileResult::saved(path.to_string_lossy()))
}

pub fn register(app: &AppHandle) {
    let dialog = Arc::new(TauriSaveDialog::new(app.clone()));
    app.state::<ShellState>().channel.router().handle_fn(
        ChannelName::SaveFile.as_str(),
        move |args: Args| {
            let dialog = dialog.clone();
            async move {
                let request = SaveRequest::from_args(&args)?;
                let result = save(dialog.as_ref(), request).await?;
                Ok::<Value, ChannelError>(serde_json::to_value(result)?)
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn default_filter_is_all_files() {
        let args = Args::new(vec![json!([1, 2, 3]), json!("report.csv")]);
        let request = SaveRequest::from_args(&args).unwrap();
        assert_eq!(request.bytes, vec![1, 2, 3]);
        assert_eq!(request.default_name, "report.csv");
        assert_eq!(request.filters, vec![FileFilter::all_files()]);
        assert_eq!(request.filters[0].name, "All Files");
        assert_eq!(request.filters[0].extensions, vec!["*"]);
    }

    #[test]
    fn explicit_filters_are_kept() {
        let args = Args::new(vec![
            json!([]),
            json!("recording.wav"),
            json!([{"name": "Audio", "extensions": ["wav", "mp3"]}]),
        ]);
        let request = SaveRequest::from_args(&args).unwrap();
        assert!(request.bytes.is_empty());
        assert_eq!(request.filters.len(), 1);
        assert_eq!(request.filters[0].extensions, vec!["wav", "mp3"]);
    }

    #[test]
    fn empty_filter_list_falls_back() {
        let args = Args::new(vec![json!([0]), json!("a.bin"), json!([])]);
        assert_eq!(
            SaveRequest::from_args(&args).unwrap().filters,
            vec![FileFilter::all_files()]
        );
    }

    #[test]
    fn bytes_are_required() {
        let err = SaveRequest::from_args(&Args::new(vec![Value::Null, json!("x")])).unwrap_err();
        assert!(matches!(err, ArgsError::Missing { index: 0, .. }));

        let err = SaveRequest::from_args(&Args::new(vec![json!([300])])).unwrap_err();
        assert!(matches!(err, ArgsError::Invalid { index: 0, .. }));
    }

    #[test]
    fn raw_request_decodes_headers() {
        let request = SaveRequest::from_raw(
            vec![1, 2],
            Some("Llamadas%20de%20hoy.csv"),
            Some("%5B%7B%22name%22%3A%22CSV%22%2C%22extensions%22%3A%5B%22csv%22%5D%7D%5D"),
        )
        .unwrap();
        assert_eq!(request.bytes, vec![1, 2]);
        assert_eq!(request.default_name, "Llamadas de hoy.csv");
        assert_eq!(request.filters[0].name, "CSV");
        assert_eq!(request.filters[0].extensions, vec!["csv"]);
    }

    #[test]
    fn raw_request_defaults() {
        let request = SaveRequest::from_raw(Vec::new(), None, None).unwrap();
        assert_eq!(request.default_name, "");
        assert_eq!(request.filters, vec![FileFilter::all_files()]);

        let request = SaveRequest::from_raw(Vec::new(), None, Some("%5B%5D")).unwrap();
        assert_eq!(request.filters, vec![FileFilter::all_files()]);
    }

    #[test]
    fn raw_request_rejects_bad_filters() {
        let err = SaveRequest::from_raw(Vec::new(), None, Some("not-json")).unwrap_err();
        assert!(matches!(err, ChannelError::InvalidArgs(_)));
    }

    /// Records how the dialog was opened and answers with `answer`.
    struct FakeDialog {
        window: bool,
        answer: Option<PathBuf>,
        opened: Mutex<Vec<(String, Vec<FileFilter>)>>,
    }

    impl FakeDialog {
        fn new(window: bool, answer: Option<PathBuf>) -> Self {
            Self {
                window,
                answer,
                opened: Mutex::new(Vec::new()),
            }
        }

        fn opened(&self) -> Vec<(String, Vec<FileFilter>)> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl SaveDialog for FakeDialog {
        type Window = ();

        fn focused_window(&self) -> Option<()> {
            self.window.then_some(())
        }

        fn choose_path<'a>(
            &'a self,
            _parent: &'a (),
            default_name: &'a str,
            filters: &'a [FileFilter],
        ) -> DialogFuture<'a, Result<Option<PathBuf>, ChannelError>> {
            self.opened
                .lock()
                .unwrap()
                .push((default_name.to_string(), filters.to_vec()));
            let answer = self.answer.clone();
            Box::pin(async move { Ok(answer) })
        }
    }

    fn pdf_request() -> SaveRequest {
        let args = Args::new(vec![
            json!([37, 80, 68, 70]),
            json!("report.pdf"),
            json!([{"name": "PDF", "extensions": ["pdf"]}]),
        ]);
        SaveRequest::from_args(&args).unwrap()
    }

    #[tokio::test]
    async fn cancelled_dialog_is_canceled() {
        let dialog = FakeDialog::new(true, None);
        let result = save(&dialog, pdf_request()).await.unwrap();

        assert_eq!(result, SaveFileResult::canceled());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"canceled": true})
        );
        let opened = dialog.opened();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].0, "report.pdf");
        assert_eq!(opened[0].1[0].name, "PDF");
    }

    #[tokio::test]
    async fn no_focused_window_skips_the_dialog() {
        let dialog = FakeDialog::new(false, Some(PathBuf::from("/unused")));
        let result = save(&dialog, pdf_request()).await.unwrap();

        assert_eq!(result, SaveFileResult::canceled());
        assert!(dialog.opened().is_empty());
    }

    #[tokio::test]
    async fn chosen_path_is_written() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("report.pdf");
        let dialog = FakeDialog::new(true, Some(path.clone()));

        let result = save(&dialog, pdf_request()).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"canceled": false, "filePath": path.to_string_lossy()})
        );
    }

    #[tokio::test]
    async fn write_failure_is_a_handler_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten as a file.
        let dialog = FakeDialog::new(true, Some(tmp.path().to_path_buf()));

        let err = save(&dialog, pdf_request()).await.unwrap_err();
        assert!(matches!(err, ChannelError::Handler(_)));
    }

    #[test]
    fn result_wire_shape() {
        assert_eq!(
            serde_json::to_value(SaveFileResult::canceled()).unwrap(),
            json!({"canceled": true})
        );
        assert_eq!(
            serde_json::to_value(SaveFileResult::saved("/home/u/a.pdf")).unwrap(),
            json!({"canceled": false, "filePath": "/home/u/a.pdf"})
        );
    }
}
