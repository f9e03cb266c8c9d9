//! mxGraph style strings: `;`-separated `key=value` pairs and bare flags
//! such as `ellipse` or `text`.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    entries: Vec<StyleEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleEntry {
    Flag(String),
    Pair(String, String),
}

impl Style {
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => StyleEntry::Pair(key.trim().to_string(), value.trim().to_string()),
                None => StyleEntry::Flag(part.to_string()),
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            StyleEntry::Pair(k, v) if k == key => Some(v.as_str()),
            _ => None,
        })
    }

    /// Overwrites `key` in place, or appends it when absent.
    pub fn set(&mut self, key: &str, value: &str) {
        for entry in &mut self.entries {
            if let StyleEntry::Pair(k, v) = entry {
                if k == key {
                    *v = value.to_string();
                    return;
                }
            }
        }
        self.entries
            .push(StyleEntry::Pair(key.to_string(), value.to_string()));
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            match entry {
                StyleEntry::Flag(flag) => write!(f, "{flag};")?,
                StyleEntry::Pair(key, value) => write!(f, "{key}={value};")?,
            }
        }
        Ok(())
    }
}
