use std::env;
use std::path::PathBuf;

fn main() {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    println!("cargo:rerun-if-changed=build.rs");

    if target_os == "macos" {
        create_macos_plist();
    }
}

fn create_macos_plist() {
    let plist_content = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleName</key>
    <string>Booker</string>
    <key>CFBundleDisplayName</key>
    <string>Booker</string>
    <key>CFBundleIdentifier</key>
    <string>com.booker.app</string>
    <key>CFBundleVersion</key>
    <string>0.1.0</string>
    <key>CFBundleShortVersionString</key>
    <string>0.1.0</string>
    <key>NSScreenCaptureUsageDescription</key>
    <string>Booker captures the screen to collect pages into a PDF.</string>
    <key>NSAppleEventsUsageDescription</key>
    <string>Booker sends key presses to advance pages between captures.</string>
</dict>
</plist>"#;

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let plist_path = PathBuf::from(&out_dir).join("Info.plist");

    std::fs::write(&plist_path, plist_content).expect("Failed to write Info.plist");

    println!("cargo:warning=Created Info.plist for macOS");
}
