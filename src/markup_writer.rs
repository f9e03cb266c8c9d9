use crate::markup_ast::*;

const INDENT: &str = "  ";

pub fn write_markup(markup: &Markup) -> String {
    let mut lines = Vec::new();
    if let Some(declaration) = &markup.declaration {
        lines.push(declaration.clone());
    }
    write_element(&mut lines, &markup.root, 0);
    lines.join("\n")
}

pub fn write_element(lines: &mut Vec<String>, element: &Element, depth: usize) {
    let indent = INDENT.repeat(depth);
    let mut open = format!("{indent}<{}", element.name);
    for attr in &element.attrs {
        open.push_str(&format!(" {}=\"{}\"", attr.name, escape_attr(&attr.value)));
    }

    let text = element.text.as_deref().map(escape_text);
    match (text, element.children.is_empty()) {
        (None, true) => lines.push(format!("{open}/>")),
        (Some(text), true) => lines.push(format!("{open}>{text}</{}>", element.name)),
        (text, false) => {
            lines.push(format!("{open}>{}", text.unwrap_or_default()));
            for child in &element.children {
                write_element(lines, child, depth + 1);
            }
            lines.push(format!("{indent}</{}>", element.name));
        }
    }
}

/// Escapes an attribute value so it reads back unchanged: whitespace other
/// than a plain space is written as a character reference, since parsers
/// normalize it to spaces. Characters XML cannot carry are dropped.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\t' => out.push_str("&#9;"),
            '\r' => out.push_str("&#13;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}
