use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const KNOWN_APP_IDS: [&str; 7] = [
    "terminal",
    "fileManager",
    "textEditor",
    "xcalc",
    "minesweeper",
    "imageViewer",
    "xeyes",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WindowDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    y: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    resizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimizable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    closable: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppManifest {
    #[serde(skip_serializing)]
    schema_version: u32,
    #[serde(rename(serialize = "id", deserialize = "app_id"))]
    app_id: String,
    title: String,
    icon: String,
    description: String,
    panel_label: String,
    menu_label: String,
    show_on_desktop: bool,
    show_in_menu: bool,
    #[serde(default)]
    window: WindowDefaults,
}

fn app_manifest_paths(root: &Path) -> Vec<PathBuf> {
    [
        "terminal",
        "explorer",
        "notepad",
        "calculator",
        "minesweeper",
        "image_viewer",
        "xeyes",
    ]
    .iter()
    .map(|name| {
        root.join("..")
            .join("apps")
            .join(name)
            .join("app.manifest.toml")
    })
    .collect()
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let mut manifests = Vec::<AppManifest>::new();

    for path in app_manifest_paths(&crate_root) {
        println!("cargo:rerun-if-changed={}", path.display());
        let raw = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let manifest: AppManifest = toml::from_str(&raw)
            .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
        if manifest.schema_version != 1 {
            panic!(
                "manifest schema mismatch in {}: expected 1 found {}",
                path.display(),
                manifest.schema_version
            );
        }
        if !KNOWN_APP_IDS.contains(&manifest.app_id.as_str()) {
            panic!(
                "unknown app id `{}` in {}",
                manifest.app_id,
                path.display()
            );
        }
        if manifests.iter().any(|m| m.app_id == manifest.app_id) {
            panic!(
                "duplicate app id `{}` in {}",
                manifest.app_id,
                path.display()
            );
        }
        manifests.push(manifest);
    }

    let json = serde_json::to_string_pretty(&manifests).expect("serialize app manifest catalog");
    let generated = format!(
        "/// Build-time generated app manifest catalog JSON.\n\
pub const APP_MANIFEST_CATALOG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("app_catalog_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
