use winnow::prelude::*;
use winnow::ascii::{multispace0, multispace1};
use winnow::combinator::{alt, delimited, opt, repeat};
use winnow::error::ParserError;
use winnow::token::{take_until, take_while};

use crate::error::MarkupError;
use crate::markup_ast::*;

pub fn parse_markup(input: &str) -> Result<Markup, MarkupError> {
    let mut input = input;
    markup(&mut input).map_err(|_| {
        let context = input.lines().next().unwrap_or("").trim();
        let context_display = if context.chars().count() > 40 {
            format!("{}...", context.chars().take(40).collect::<String>())
        } else {
            context.to_string()
        };
        MarkupError::Syntax {
            context: context_display,
        }
    })
}

fn markup(input: &mut &str) -> winnow::Result<Markup> {
    opt('\u{feff}').parse_next(input)?;
    multispace0.parse_next(input)?;
    let declaration = opt(declaration).parse_next(input)?;
    misc.parse_next(input)?;
    let root = xml_element.parse_next(input)?;
    misc.parse_next(input)?;
    if !input.is_empty() {
        return Err(ParserError::from_input(input));
    }
    Ok(Markup { declaration, root })
}

fn declaration(input: &mut &str) -> winnow::Result<String> {
    "<?".parse_next(input)?;
    let body = take_until(0.., "?>").parse_next(input)?;
    "?>".parse_next(input)?;
    Ok(format!("<?{body}?>"))
}

fn misc(input: &mut &str) -> winnow::Result<()> {
    repeat(0.., alt((multispace1.void(), comment, doctype))).parse_next(input)
}

fn comment(input: &mut &str) -> winnow::Result<()> {
    "<!--".parse_next(input)?;
    take_until(0.., "-->").parse_next(input)?;
    "-->".void().parse_next(input)
}

fn doctype(input: &mut &str) -> winnow::Result<()> {
    "<!".parse_next(input)?;
    take_until(0.., ">").parse_next(input)?;
    ">".void().parse_next(input)
}

fn cdata<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    "<![CDATA[".parse_next(input)?;
    let body = take_until(0.., "]]>").parse_next(input)?;
    "]]>".parse_next(input)?;
    Ok(body)
}

fn xml_name<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
    })
    .parse_next(input)
}

fn attr_value<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    alt((
        delimited('"', take_while(0.., |c: char| c != '"'), '"'),
        delimited('\'', take_while(0.., |c: char| c != '\''), '\''),
    ))
    .parse_next(input)
}

fn attribute(input: &mut &str) -> winnow::Result<Attr> {
    multispace1.parse_next(input)?;
    let name = xml_name.parse_next(input)?;
    multispace0.parse_next(input)?;
    '='.parse_next(input)?;
    multispace0.parse_next(input)?;
    let raw = attr_value.parse_next(input)?;
    Ok(Attr::new(name, decode_entities(raw)))
}

fn xml_element(input: &mut &str) -> winnow::Result<Element> {
    '<'.parse_next(input)?;
    let name = xml_name.parse_next(input)?;
    let attrs: Vec<Attr> = repeat(0.., attribute).parse_next(input)?;
    multispace0.parse_next(input)?;

    let mut element = Element {
        name: name.to_string(),
        attrs,
        text: None,
        children: Vec::new(),
    };
    if opt("/>").parse_next(input)?.is_some() {
        return Ok(element);
    }
    '>'.parse_next(input)?;

    loop {
        let text = take_while(0.., |c: char| c != '<').parse_next(input)?;
        push_text(&mut element, &decode_entities(text));
        if input.starts_with("</") {
            break;
        }
        if input.is_empty() {
            return Err(ParserError::from_input(input));
        }
        if input.starts_with("<!--") {
            comment.parse_next(input)?;
        } else if input.starts_with("<![CDATA[") {
            let body = cdata.parse_next(input)?;
            push_text(&mut element, body);
        } else {
            let child = xml_element.parse_next(input)?;
            element.children.push(child);
        }
    }

    "</".parse_next(input)?;
    let close = xml_name.parse_next(input)?;
    if close != element.name {
        return Err(ParserError::from_input(input));
    }
    multispace0.parse_next(input)?;
    '>'.parse_next(input)?;
    Ok(element)
}

fn push_text(element: &mut Element, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match &mut element.text {
        Some(existing) => existing.push_str(text),
        None => element.text = Some(text.to_string()),
    }
}

/// Decodes the predefined XML entities and numeric character references.
/// Unknown or unterminated references, and references to characters XML
/// cannot carry (`&#0;`), are kept literally.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = tail
            .find(';')
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code).filter(|&c| is_xml_char(c))
        }
    }
}
