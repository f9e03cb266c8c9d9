#[derive(Debug, Clone, PartialEq)]
pub struct Markup {
    pub declaration: Option<String>,
    pub root: Element,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attr::new(name, value));
        self
    }

    /// Path of child indices to the first descendant (depth-first) named `name`,
    /// including `self`.
    pub fn find_path(&self, name: &str) -> Option<Vec<usize>> {
        if self.name == name {
            return Some(Vec::new());
        }
        for (i, child) in self.children.iter().enumerate() {
            if let Some(mut path) = child.find_path(name) {
                path.insert(0, i);
                return Some(path);
            }
        }
        None
    }

    pub fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.children.get_mut(i)?.at_path_mut(rest),
        }
    }

    /// Pushes the value of attribute `name` from this element and every
    /// descendant, in document order.
    pub fn collect_attr(&self, name: &str, out: &mut Vec<String>) {
        if let Some(value) = self.attr(name) {
            out.push(value.to_string());
        }
        for child in &self.children {
            child.collect_attr(name, out);
        }
    }

    /// Applies `f` to every attribute value of this element and its descendants.
    pub fn for_each_value_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        for attr in &mut self.attrs {
            f(&mut attr.value);
        }
        for child in &mut self.children {
            child.for_each_value_mut(f);
        }
    }
}

/// Characters allowed in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
