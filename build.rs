//! Build-time hints for locating FFmpeg.
//!
//! `ffmpeg-sys-next` finds FFmpeg through pkg-config on Unix. On Windows it
//! needs `FFMPEG_DIR`; when that is missing, point at a vcpkg install if one
//! can be found.

use std::{env, path::PathBuf};

const WATCHED_VARIABLES: [&str; 4] = ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_DYNAMIC", "VCPKGRS_TRIPLET"];

fn main() {
    for variable in WATCHED_VARIABLES {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }
    if env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=framegrab: FFMPEG_DIR is not set. Install FFmpeg (e.g. with vcpkg) and set FFMPEG_DIR to its prefix."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let prefix = PathBuf::from(vcpkg_root).join("installed").join(triplet);

    if !prefix.exists() {
        println!(
            "cargo:warning=framegrab: VCPKG_ROOT is set but {} does not exist.",
            prefix.display(),
        );
        return;
    }

    println!(
        "cargo:warning=framegrab: found FFmpeg under {}; set FFMPEG_DIR to that path to silence this warning.",
        prefix.display(),
    );
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        println!("cargo:warning=framegrab: set VCPKGRS_DYNAMIC=1 for dynamically linked vcpkg FFmpeg.");
    }
}
