//! Integration tests for the render command.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use image::Rgb;

const EYE: Rgb<u8> = Rgb([0, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

fn render(label: &str, dir: &std::path::Path) -> image::RgbImage {
    let output = dir.join(format!("{label}.png"));
    Command::cargo_bin("face-react")
        .unwrap()
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .args(["render", label, "--output"])
        .arg(&output)
        .assert()
        .success();
    image::open(&output).unwrap().to_rgb8()
}

#[test]
fn test_render_writes_landscape_bitmap() {
    let dir = tempfile::tempdir().unwrap();
    let neutral = render("neutral", dir.path());

    assert_eq!(neutral.dimensions(), (320, 240));
    // Left eye centre (70, 135) on the portrait canvas after the 90° turn
    assert_eq!(*neutral.get_pixel(135, 239 - 70), EYE);
    assert_eq!(*neutral.get_pixel(0, 0), BLACK);
}

#[test]
fn test_render_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let first = render("happy", dir.path());
    let other = tempfile::tempdir().unwrap();
    let second = render("happy", other.path());
    assert_eq!(first, second);
}

#[test]
fn test_unmapped_labels_render_neutral() {
    let dir = tempfile::tempdir().unwrap();
    let neutral = render("neutral", dir.path());
    for label in ["fear", "disgust", "surprise"] {
        assert_eq!(render(label, dir.path()), neutral, "{label}");
    }
}

#[test]
fn test_mapped_labels_differ() {
    let dir = tempfile::tempdir().unwrap();
    let images: Vec<_> = ["happy", "sad", "angry", "neutral"]
        .into_iter()
        .map(|l| render(l, dir.path()))
        .collect();
    for (i, a) in images.iter().enumerate() {
        for b in &images[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_render_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("face-react")
        .unwrap()
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .args(["render", "sad", "--output"])
        .arg(dir.path().join("missing/sad.png"))
        .assert()
        .code(1)
        .stderr(predicates::str::contains("Failed to write"));
}
