use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use image::{GrayAlphaImage, LumaA, Rgb, RgbImage};
use serde_json::Value;
use tempfile::TempDir;

/// Runs the binary with its config discovery confined to `config_dir`.
fn texkit(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_texkit"))
        .env("TEXKIT_CONFIG_DIR", config_dir)
        .env_remove("TEXKIT_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run texkit")
}

fn json_output(config_dir: &Path, args: &[&str]) -> Value {
    let output = texkit(config_dir, args);
    assert!(
        output.status.success(),
        "texkit {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

#[test]
fn inspect_reports_rgb_upload() {
    let root = TempDir::new().unwrap();
    let image_path = root.path().join("stripe.png");
    let mut image = RgbImage::new(3, 2);
    image.put_pixel(0, 0, Rgb([255, 0, 0]));
    image.put_pixel(0, 1, Rgb([0, 0, 255]));
    image.save(&image_path).unwrap();

    let path = image_path.to_str().unwrap();
    let report = json_output(root.path(), &["--json", "inspect", path]);
    assert_eq!(report["width"], 3);
    assert_eq!(report["height"], 2);
    assert_eq!(report["channels"], 3);
    assert_eq!(report["layout"], "Rgb");
    assert_eq!(report["format"], "Rgb8");
    assert_eq!(report["bytes"], 18);
    // Flipped by default, so the bottom-left pixel comes first.
    assert_eq!(report["first_texel"], 0xff_ff_00_00u32);

    let report = json_output(root.path(), &["--json", "inspect", "--no-flip", path]);
    assert_eq!(report["first_texel"], 0xff_00_00_ffu32);
}

#[test]
fn inspect_float_gray_alpha() {
    let root = TempDir::new().unwrap();
    let image_path = root.path().join("mask.png");
    GrayAlphaImage::from_pixel(2, 2, LumaA([255, 128]))
        .save(&image_path)
        .unwrap();

    let report = json_output(
        root.path(),
        &["--json", "inspect", "--float", image_path.to_str().unwrap()],
    );
    assert_eq!(report["channels"], 2);
    assert_eq!(report["format"], "Rg32F");
    assert_eq!(report["bytes"], 2 * 2 * 2 * 4);
}

#[test]
fn inspect_rejects_missing_image() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("absent.png");
    let output = texkit(root.path(), &["inspect", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}

#[test]
fn color_resolves_names_and_hex() {
    let root = TempDir::new().unwrap();
    let report = json_output(root.path(), &["--json", "color", "red", "#00ff0080"]);
    let entries = report.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["hex"], "#FF0000FF");
    assert_eq!(entries[0]["packed"], 0xff_00_00_ffu32);
    assert_eq!(entries[1]["hex"], "#00FF0080");

    let output = texkit(root.path(), &["color", "not-a-color"]);
    assert!(!output.status.success());
}

#[test]
fn color_uses_palette_from_config() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("config.toml"),
        "version = 1\n\n[palette]\naccent = \"#ff8800\"\n",
    )
    .unwrap();

    let report = json_output(root.path(), &["--json", "color", "accent"]);
    assert_eq!(report[0]["hex"], "#FF8800FF");

    let explicit = root.path().join("other.toml");
    fs::write(&explicit, "version = 1\n\n[palette]\naccent = \"blue\"\n").unwrap();
    let report = json_output(
        root.path(),
        &["--json", "--config", explicit.to_str().unwrap(), "color", "accent"],
    );
    assert_eq!(report[0]["hex"], "#0000FFFF");
}

#[test]
fn invalid_config_is_reported() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("config.toml"), "version = 7\n").unwrap();
    let output = texkit(root.path(), &["color", "red"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("version"));
}

#[test]
fn pack_and_unpack_agree() {
    let root = TempDir::new().unwrap();
    let packed = json_output(root.path(), &["--json", "pack", "1", "0.5", "0", "1"]);
    assert_eq!(packed["packed"], 0xff_00_80_ffu32);

    let unpacked = json_output(root.path(), &["--json", "unpack", "0xff0080ff"]);
    assert_eq!(unpacked["packed"], 0xff_00_80_ffu32);
    let rgba = unpacked["rgba"].as_array().unwrap();
    assert_eq!(rgba[0], 1.0);
    assert!((rgba[1].as_f64().unwrap() - 128.0 / 255.0).abs() < 1e-6);

    let output = texkit(root.path(), &["unpack", "0xfff"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("4095"));
}

#[test]
fn transform_applies_steps_in_order() {
    let root = TempDir::new().unwrap();
    let report = json_output(
        root.path(),
        &[
            "--json",
            "transform",
            "--scale",
            "2",
            "--translate",
            "-1,3",
            "1,1",
        ],
    );
    let point = report["point"].as_array().unwrap();
    assert_eq!(point[0], 1.0);
    assert_eq!(point[1], 5.0);
    let direction = report["direction"].as_array().unwrap();
    assert_eq!(direction[0], 2.0);
    assert_eq!(direction[1], 2.0);
}

#[test]
fn transform_honours_option_order() {
    let root = TempDir::new().unwrap();
    let report = json_output(
        root.path(),
        &["--json", "transform", "--translate", "1,0", "--rotate", "90", "1,0"],
    );
    assert_eq!(report["steps"][0], "translate 1,0");
    assert_eq!(report["steps"][1], "rotate 90");

    // (1,0) + (1,0) = (2,0), then a quarter turn gives (0,2).
    let point = report["point"].as_array().unwrap();
    assert!(point[0].as_f64().unwrap().abs() < 1e-5);
    assert!((point[1].as_f64().unwrap() - 2.0).abs() < 1e-5);

    let direction = report["direction"].as_array().unwrap();
    assert!(direction[0].as_f64().unwrap().abs() < 1e-5);
    assert!((direction[1].as_f64().unwrap() - 1.0).abs() < 1e-5);
}

#[test]
fn overlap_box_and_circle() {
    let root = TempDir::new().unwrap();
    let report = json_output(
        root.path(),
        &["--json", "overlap", "box", "0,0,2,2", "1.5,0,2,2"],
    );
    assert_eq!(report["intersects"], true);
    assert_eq!(report["resolved"]["min"][0], -0.5);

    let report = json_output(
        root.path(),
        &["--json", "overlap", "box", "0,0,1,1", "1,0,1,1"],
    );
    assert_eq!(report["intersects"], false);
    assert!(report.get("resolved").is_none());

    let report = json_output(
        root.path(),
        &["--json", "overlap", "circle", "0,0,1", "2,0,1"],
    );
    assert_eq!(report["overlaps"], true);
}

#[test]
fn config_where_uses_directory_override() {
    let root = TempDir::new().unwrap();
    let report = json_output(root.path(), &["--json", "config", "where"]);
    let expected = root.path().join("config.toml");
    assert_eq!(report["config_file"], expected.to_str().unwrap());
    assert_eq!(report["exists"], false);
}
