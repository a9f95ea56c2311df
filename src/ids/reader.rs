use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ids::parse_id;
use crate::models::ContentId;

/// Read a flat dependency list (one entry per line, any supported notation).
///
/// Blank lines are skipped and duplicates dropped; the first occurrence keeps
/// its position. `-` reads standard input.
pub fn read_content_ids(path: &Path) -> Result<Vec<ContentId>> {
    if path.as_os_str() == "-" {
        let stdin = std::io::stdin();
        return parse_lines(stdin.lock());
    }
    let file = std::fs::File::open(path)
        .with_context(|| format!("cannot open dependency list {}", path.display()))?;
    parse_lines(BufReader::new(file))
}

pub fn parse_lines<R: BufRead>(input: R) -> Result<Vec<ContentId>> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let id = parse_id(line);
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_dependency_list() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "org.apache.commons:commons-lang3:3.12.0").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "left-pad@1.3.0").unwrap();
        writeln!(f, "   ").unwrap();
        writeln!(f, "maven/mavencentral/org.apache.commons/commons-lang3/3.12.0").unwrap();
        writeln!(f, "???").unwrap();

        let ids = read_content_ids(f.path()).unwrap();
        let names: Vec<&str> = ids.iter().map(ContentId::as_str).collect();
        assert_eq!(
            names,
            vec![
                "maven/mavencentral/org.apache.commons/commons-lang3/3.12.0",
                "npm/npmjs/-/left-pad/1.3.0",
                "???",
            ]
        );
        assert!(!ids[2].is_valid());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_content_ids(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("cannot open dependency list"));
    }
}
