// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use bijux_labeler_api::{openapi_drift, render_openapi};
use std::path::PathBuf;
use std::process::ExitCode;

enum Mode {
    Write(PathBuf),
    Check(PathBuf),
}

fn parse_args() -> Result<Mode, String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [flag, path] if flag == "--out" => Ok(Mode::Write(PathBuf::from(path))),
        [flag, path] if flag == "--check" => Ok(Mode::Check(PathBuf::from(path))),
        _ => Err("usage: bijux-labeler-openapi (--out <path> | --check <path>)".to_string()),
    }
}

fn run(mode: Mode) -> Result<bool, String> {
    match mode {
        Mode::Write(path) => {
            let text = render_openapi().map_err(|e| e.to_string())?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
            std::fs::write(&path, text).map_err(|e| format!("{}: {e}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(true)
        }
        Mode::Check(path) => {
            let committed = std::fs::read_to_string(&path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            let drift = openapi_drift(&committed)?;
            for line in &drift {
                eprintln!("{line}");
            }
            if drift.is_empty() {
                println!("{} is up to date", path.display());
            }
            Ok(drift.is_empty())
        }
    }
}

fn main() -> ExitCode {
    match parse_args().and_then(run) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
