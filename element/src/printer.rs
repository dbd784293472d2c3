use std::fmt::{self, Display, Formatter, Write};

use crate::Element;

const INDENT: &str = "    ";

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_element(f, self, 0)
    }
}

fn write_element(f: &mut Formatter<'_>, element: &Element, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    write!(f, "<{}", element.tag())?;
    for attribute in element.attributes() {
        write!(f, " {}=\"", attribute.name())?;
        write_escaped(f, attribute.value())?;
        f.write_char('"')?;
    }

    if element.children().is_empty() {
        return f.write_str("/>\n");
    }

    f.write_str(">\n")?;
    for child in element.children() {
        write_element(f, child, depth + 1)?;
    }
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    writeln!(f, "</{}>", element.tag())
}

fn write_escaped(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    for c in value.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}
