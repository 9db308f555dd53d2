fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use infinity_protocol::{
        Args, CallState, ChannelName, FileFilter, NotificationOptions, SaveFileResult, TrayAction,
        UpdateInfo,
    };

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture, re-serializes it, and requires the same JSON
    /// back. The content depends on these exact shapes.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  fixture: {fixture}\n  Rust:    {reserialized}"
        );
        parsed
    }

    #[test]
    fn fixture_channel_names() {
        let names: Vec<ChannelName> = roundtrip_test("channel_names.json");
        assert_eq!(names, ChannelName::ALL.to_vec());
        for name in names {
            assert_eq!(serde_json::to_value(name).unwrap(), name.as_str());
        }
    }

    #[test]
    fn fixture_call_states() {
        let states: Vec<CallState> = roundtrip_test("call_states.json");
        assert_eq!(
            states,
            vec![CallState::Idle, CallState::Ringing, CallState::InCall]
        );
    }

    #[test]
    fn fixture_tray_actions() {
        let actions: Vec<TrayAction> = roundtrip_test("tray_actions.json");
        assert_eq!(actions[4], TrayAction::Dial("+15551234".into()));
        assert_eq!(actions[5], TrayAction::Dial(String::new()));
    }

    #[test]
    fn unknown_tray_action_is_rejected() {
        assert!(serde_json::from_str::<TrayAction>("\"transfer\"").is_err());
    }

    #[test]
    fn fixture_save_file_results() {
        let canceled: SaveFileResult = roundtrip_test("save_file_result_canceled.json");
        assert_eq!(canceled, SaveFileResult::canceled());

        let saved: SaveFileResult = roundtrip_test("save_file_result_saved.json");
        assert_eq!(
            saved.file_path.as_deref(),
            Some("/home/agent/Downloads/call-log.csv")
        );
    }

    #[test]
    fn fixture_update_info() {
        let info: UpdateInfo = roundtrip_test("update_info.json");
        assert_eq!(info.version, "1.2.0");
    }

    #[test]
    fn fixture_notification_options() {
        let options: NotificationOptions = roundtrip_test("notification_options.json");
        assert!(options.is_silent());
        assert!(!serde_json::from_str::<NotificationOptions>("{}").unwrap().is_silent());
    }

    #[test]
    fn fixture_file_filters() {
        let filters: Vec<FileFilter> = roundtrip_test("file_filters.json");
        assert_eq!(filters[2], FileFilter::all_files());
    }

    #[test]
    fn fixture_notification_args() {
        let args: Args = roundtrip_test("notification_args.json");
        assert_eq!(args.len(), 3);
        let title: String = args.required(0, "title").unwrap();
        assert_eq!(title, "Incoming call");
        let options: NotificationOptions = args.required(2, "options").unwrap();
        assert!(!options.is_silent());
    }
}
