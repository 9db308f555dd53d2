fn main() {
    // Read project version from workspace VERSION file
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let version_path = std::path::Path::new(&manifest_dir)
        .ancestors()
        .find_map(|p| {
            let candidate = p.join("VERSION");
            candidate.exists().then_some(candidate)
        })
        .expect("Could not find VERSION file in parent directories");

    let version = std::fs::read_to_string(&version_path)
        .expect("Failed to read VERSION file")
        .trim()
        .to_string();

    println!("cargo:rustc-env=INFINITY_VERSION={version}");
    println!("cargo:rerun-if-changed={}", version_path.display());

    // Content on the custom scheme counts as a remote origin for the ACL.
    tauri_build::try_build(tauri_build::Attributes::new().app_manifest(
        tauri_build::AppManifest::new().commands(&["ipc_invoke", "ipc_send", "ipc_save_file"]),
    ))
    .expect("failed to run tauri-build");
}
