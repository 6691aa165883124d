//! Contains wrappers for loading input formulae from files.

use std::fs::read_to_string;

/// Read the formulae from the specified file, one formula per line. Blank
/// lines and lines starting with `#` (comments) are ignored.
/// The syntax of these formulae is checked later during parsing.
pub fn load_formulae(formulae_path: &str) -> Result<Vec<String>, String> {
    let formulae_string = read_to_string(formulae_path).map_err(|e| e.to_string())?;

    Ok(formulae_string
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
