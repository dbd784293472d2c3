use clap::Args;
use element::Element;
use kumiki::encoder::Encoder;

use crate::error::Result;
use crate::utils::read_element;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the document. If not specified, reads from stdin
    file: Option<String>,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let element: Element = read_element(config.file.as_deref())?;
    let printed: String = element.encode()?;
    print!("{printed}");
    Ok(())
}
