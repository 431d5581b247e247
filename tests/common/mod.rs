//! Media fixtures generated on the fly.
//!
//! Y4M and WAV are simple enough to write by hand and FFmpeg demuxes and
//! decodes both without external codecs, so no binary fixtures are checked
//! in.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const FIXTURE_WIDTH: u32 = 16;
pub const FIXTURE_HEIGHT: u32 = 8;

/// Luma of frame `index` (0-based). Brightness rises with every frame.
pub fn fixture_luma(index: usize) -> u8 {
    40 + (index as u8) * 20
}

/// Write a 4:2:0 Y4M file of `frame_count` flat grey frames into `directory`.
pub fn write_y4m(directory: &Path, name: &str, frame_count: usize) -> PathBuf {
    let width = FIXTURE_WIDTH as usize;
    let height = FIXTURE_HEIGHT as usize;
    let chroma_len = (width / 2) * (height / 2);

    let mut bytes = format!("YUV4MPEG2 W{width} H{height} F25:1 Ip A1:1 C420jpeg\n").into_bytes();
    for index in 0..frame_count {
        bytes.extend_from_slice(b"FRAME\n");
        bytes.extend(std::iter::repeat_n(fixture_luma(index), width * height));
        bytes.extend(std::iter::repeat_n(128u8, chroma_len * 2));
    }

    let path = directory.join(name);
    std::fs::write(&path, bytes).expect("Failed to write Y4M fixture");
    path
}

/// Write a short mono 16-bit PCM WAV file into `directory`.
pub fn write_wav(directory: &Path, name: &str) -> PathBuf {
    let sample_rate: u32 = 8_000;
    let samples: u32 = 800;
    let data_len = samples * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    let path = directory.join(name);
    std::fs::write(&path, bytes).expect("Failed to write WAV fixture");
    path
}

/// Write an FFmpeg metadata file. FFmpeg opens it as a container with an
/// empty stream table.
pub fn write_ffmetadata(directory: &Path, name: &str) -> PathBuf {
    let path = directory.join(name);
    std::fs::write(&path, ";FFMETADATA1\ntitle=no streams\n")
        .expect("Failed to write metadata fixture");
    path
}

/// Sorted file names in `directory`.
pub fn file_names(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(directory)
        .expect("Failed to list directory")
        .map(|entry| {
            entry
                .expect("Failed to read directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
