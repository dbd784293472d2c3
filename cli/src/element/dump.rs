use clap::Args;
use element::Element;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::utils::read_element;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the document. If not specified, reads from stdin
    file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let element = read_element(config.file.as_deref())?;

    match config.output {
        OutputFormat::Text => print!("{}", format_tree(&element)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&element)?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&element)?),
    }

    Ok(())
}

/// Format the tree one element per line, children indented by two spaces
/// and attributes listed beneath their element.
fn format_tree(element: &Element) -> String {
    let mut output = String::new();
    format_element(element, 0, &mut output);
    output
}

fn format_element(element: &Element, depth: usize, output: &mut String) {
    let prefix = "  ".repeat(depth);
    let children = element.children().len();
    if children == 0 {
        output.push_str(&format!("{}{}\n", prefix, element.tag()));
    } else {
        output.push_str(&format!("{}{} ({} children)\n", prefix, element.tag(), children));
    }

    for attribute in element.attributes() {
        output.push_str(&format!(
            "{}  @{} = {:?}\n",
            prefix,
            attribute.name(),
            attribute.value()
        ));
    }
    for child in element.children() {
        format_element(child, depth + 1, output);
    }
}
