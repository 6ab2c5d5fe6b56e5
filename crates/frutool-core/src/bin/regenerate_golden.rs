use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use frutool_core::{encode_with, parse_config};

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("input.toml");
        if !input.exists() {
            continue;
        }
        let output = path.join("expected.bin");
        regenerate_one(&input, &output)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, output: &Path) -> Result<(), String> {
    let text = fs::read_to_string(input)
        .map_err(|err| format!("failed to read {}: {}", input.display(), err))?;
    let config =
        parse_config(&text).map_err(|err| format!("invalid config {}: {}", input.display(), err))?;
    let image = encode_with(&config.record, &config.encode_options())
        .map_err(|err| format!("encoding failed for {}: {}", input.display(), err))?;
    fs::write(output, image)
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
