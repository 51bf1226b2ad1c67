use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use assert_cmd::prelude::*;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

macro_rules! cargo_run {
    ($cmd:expr, $($args:expr),*) => {
        {
            let mut cmd = Command::cargo_bin($cmd)?;
            $(cmd.arg($args);)*
            cmd.assert()
        }
    };
}

fn solid_png(dir: &Path, name: &str, value: u8) -> Result<PathBuf> {
    let path = dir.join(name);
    RgbImage::from_pixel(64, 64, Rgb([value, value, value])).save(&path)?;
    Ok(path)
}

#[test]
fn verify_same_image() -> Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let reference = solid_png(dir.path(), "ref.png", 128)?;

    cargo_run!("facegate", "verify", &reference, &reference)
        .success()
        .stdout(predicate::str::contains("100.00\tpass"));

    Ok(())
}

#[test]
fn verify_black_vs_white() -> Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let black = solid_png(dir.path(), "black.png", 0)?;
    let white = solid_png(dir.path(), "white.png", 255)?;

    cargo_run!("facegate", "verify", &black, &white)
        .success()
        .stdout(predicate::str::contains("0.00\tfail"));

    Ok(())
}

#[test]
fn verify_json_output() -> Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let reference = solid_png(dir.path(), "ref.png", 30)?;

    cargo_run!("facegate", "verify", "--output-format", "json", &reference, &reference)
        .success()
        .stdout(predicate::str::contains("\"similarity\": 100.0"))
        .stdout(predicate::str::contains("\"pass\": true"));

    Ok(())
}

#[test]
fn verify_missing_file() -> Result<()> {
    let dir = assert_fs::TempDir::new()?;
    let reference = solid_png(dir.path(), "ref.png", 30)?;

    // 离线命令不走 fail-closed，直接报错退出
    cargo_run!("facegate", "verify", &reference, dir.path().join("nope.png")).failure();

    Ok(())
}
