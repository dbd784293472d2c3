use std::fs;
use std::io::{self, Read};

use element::Element;
use kumiki::decoder::Decoder;

use crate::error::Result;

/// Read input from a file or stdin
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Read and parse one element document.
pub(crate) fn read_element(file: Option<&str>) -> Result<Element> {
    let contents = String::from_utf8(read_input(file)?)?;
    let element: Element = contents.as_str().decode()?;
    log::debug!(
        "parsed <{}> with {} children",
        element.tag(),
        element.children().len()
    );
    Ok(element)
}
