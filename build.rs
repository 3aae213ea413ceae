fn main() {
    // AVAudioSession only exists on the Apple mobile targets. Expose a single cfg
    // so the crate does not repeat the target_os list everywhere.
    println!("cargo:rustc-check-cfg=cfg(avaudiosession)");

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if matches!(target_os.as_str(), "ios" | "tvos" | "visionos") {
        println!("cargo:rustc-cfg=avaudiosession");

        // AVFAudio is pulled in by objc2-avf-audio; AVFoundation keeps the
        // umbrella framework loaded for hosts that link the staticlib directly.
        println!("cargo:rustc-link-lib=framework=AVFoundation");
    }

    println!("cargo:rerun-if-changed=build.rs");
}
