use log::{debug, info};
use snafu::prelude::*;
use std::fs;
use std::path::Path;

use crate::viz::*;

/// The last component of a path, for log messages.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn read_file(path: &str) -> VizResult<String> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_file: {}: {} bytes", path, contents.len());
    Ok(contents)
}

/// Writes to the given file, or to the standard output when the location is
/// missing, empty or `stdout`.
pub fn write_output(out: Option<&str>, contents: &str) -> VizResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", contents);
        }
        Some(path) => {
            info!("Writing output to {:?}", path);
            fs::write(path, contents).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}
