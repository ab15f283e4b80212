//! Plain-text CIDR files, one block per line.

use crate::models::CidrBlock;
use std::error::Error;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Render blocks one per line, each followed by a newline.
pub fn render_cidrs(blocks: &[CidrBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        // writing into a String cannot fail
        let _ = writeln!(out, "{block}");
    }
    out
}

/// Write `blocks` to `dir/name`, creating parent directories.
pub fn write_cidr_file(dir: &str, name: &str, blocks: &[CidrBlock]) -> Result<PathBuf, Box<dyn Error>> {
    let path = Path::new(dir).join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating directory {}: {e}", parent.display()))?;
    }
    std::fs::write(&path, render_cidrs(blocks))
        .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    log::info!("Saved {} CIDR(s) to {}", blocks.len(), path.display());
    Ok(path)
}

/// Read a CIDR file back, ignoring blank lines.
pub fn read_cidr_file(path: &Path) -> Result<Vec<CidrBlock>, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let blocks = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(CidrBlock::parse)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidrs(list: &[&str]) -> Vec<CidrBlock> {
        list.iter().map(|s| CidrBlock::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_render_cidrs() {
        let blocks = cidrs(&["10.0.0.0/24", "2001:db8::/120"]);
        assert_eq!(render_cidrs(&blocks), "10.0.0.0/24\n2001:db8::/120\n");
        assert_eq!(render_cidrs(&[]), "");
    }

    #[test]
    fn test_write_and_read_cidr_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().to_str().unwrap();
        let blocks = cidrs(&["1.0.0.0/24", "1.0.2.0/23"]);

        let path = write_cidr_file(out_dir, "AS13335/OC_AU_IPV4.cidr", &blocks).unwrap();
        assert!(path.ends_with("AS13335/OC_AU_IPV4.cidr"));
        assert_eq!(read_cidr_file(&path).unwrap(), blocks);
    }

    #[test]
    fn test_read_tolerates_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.cidr");
        std::fs::write(&path, "1.0.0.0/24\n\n  \n1.0.2.0/23\n\n").unwrap();
        assert_eq!(read_cidr_file(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_read_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cidr");
        std::fs::write(&path, "1.0.0.0/24\nnope\n").unwrap();
        assert!(read_cidr_file(&path).is_err());
    }
}
