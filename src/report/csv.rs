use std::io::Write;

use anyhow::Result;

use crate::models::LicenseMap;

/// Write the summary: one line per component, ordered by id.
///
/// ```text
/// maven/mavencentral/com.google.guava/guava/15.0, Apache-2.0, approved, CQ7766
/// npm/npmjs/-/left-pad/1.3.0, unknown, unresolved, none
/// ```
pub fn write_summary<W: Write>(results: &LicenseMap, out: &mut W) -> Result<()> {
    for data in results.values() {
        writeln!(
            out,
            "{}, {}, {}, {}",
            data.id(),
            data.license().filter(|l| !l.is_empty()).unwrap_or("unknown"),
            data.status(),
            data.authority().filter(|a| !a.is_empty()).unwrap_or("none"),
        )?;
    }
    out.flush()?;
    Ok(())
}
