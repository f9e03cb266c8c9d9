//! Instruction classification.
//!
//! Each intent owns a table of phrasings tried in order; intents themselves are
//! tried in [`PRIORITY`] order. Matching is case-insensitive and captures are
//! returned as written (trimmed of whitespace and quotes).

use std::sync::OnceLock;

use regex::{Captures, Regex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    Remove,
    Replace,
    DisconnectEdges,
    Add,
    ModifyProperty,
    ContextualBulkResize,
    Unrecognized,
}

/// Order in which intents are matched and applied. `Unrecognized` is the
/// implicit fallback and never listed.
pub const PRIORITY: [IntentKind; 6] = [
    IntentKind::Remove,
    IntentKind::Replace,
    IntentKind::DisconnectEdges,
    IntentKind::Add,
    IntentKind::ModifyProperty,
    IntentKind::ContextualBulkResize,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Remove { component: String },
    Replace { from: String, to: String },
    DisconnectEdges { first: Option<String>, second: Option<String> },
    Add { component: String },
    ModifyProperty { component: String, value: String },
    ContextualBulkResize,
    Unrecognized,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Remove { .. } => IntentKind::Remove,
            Intent::Replace { .. } => IntentKind::Replace,
            Intent::DisconnectEdges { .. } => IntentKind::DisconnectEdges,
            Intent::Add { .. } => IntentKind::Add,
            Intent::ModifyProperty { .. } => IntentKind::ModifyProperty,
            Intent::ContextualBulkResize => IntentKind::ContextualBulkResize,
            Intent::Unrecognized => IntentKind::Unrecognized,
        }
    }
}

/// The highest-priority intent whose phrasing matches.
pub fn classify(instruction: &str) -> Intent {
    candidates(instruction)
        .into_iter()
        .next()
        .unwrap_or(Intent::Unrecognized)
}

/// Every matching intent, highest priority first.
pub fn candidates(instruction: &str) -> Vec<Intent> {
    PRIORITY
        .iter()
        .filter_map(|&kind| match_kind(kind, instruction))
        .collect()
}

pub fn match_kind(kind: IntentKind, instruction: &str) -> Option<Intent> {
    match kind {
        IntentKind::Remove => match_remove(instruction),
        IntentKind::Replace => match_replace(instruction),
        IntentKind::DisconnectEdges => match_disconnect(instruction),
        IntentKind::Add => match_add(instruction),
        IntentKind::ModifyProperty => match_modify(instruction),
        IntentKind::ContextualBulkResize => match_bulk_resize(instruction),
        IntentKind::Unrecognized => None,
    }
}

fn match_remove(instruction: &str) -> Option<Intent> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let caps = first_captures(
        compile(
            &PATTERNS,
            &[
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:remove|delete|erase|drop)\s+(?:(?:the|a|an)\s+)?(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*get\s+rid\s+of\s+(?:(?:the|a|an)\s+)?(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s*[.!?]*\s*$",
            ],
        ),
        instruction,
    )?;
    Some(Intent::Remove {
        component: capture(&caps, 1)?,
    })
}

fn match_replace(instruction: &str) -> Option<Intent> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let caps = first_captures(
        compile(
            &PATTERNS,
            &[
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:change|rename|replace|switch|swap|convert|turn)\s+(?:(?:the|a|an)\s+)?(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s+(?:to|with|into|by)\s+(?:(?:the|a|an)\s+)?(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*rename\s+(?:(?:the|a|an)\s+)?(.+?)\s+as\s+(.+?)\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:the|a|an)\s+)?(.+?)\s+should\s+be\s+(?:called|named|renamed\s+to)\s+(.+?)\s*[.!?]*\s*$",
            ],
        ),
        instruction,
    )?;
    Some(Intent::Replace {
        from: capture(&caps, 1)?,
        to: capture(&caps, 2)?,
    })
}

fn match_disconnect(instruction: &str) -> Option<Intent> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let caps = first_captures(
        compile(
            &PATTERNS,
            &[
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:remove|delete|cut|break|drop|erase|clear)\s+(?:(?:the|a|an)\s+)?(?:connections?|links?|arrows?|edges?|lines?|wires?|connectors?)\s+between\s+(?:the\s+)?(.+?)\s+and\s+(?:the\s+)?(.+?)(?:\s+(?:blocks?|components?|nodes?))?\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:disconnect|unlink|detach)\s+(?:the\s+)?(.+?)\s+(?:from|and)\s+(?:the\s+)?(.+?)(?:\s+(?:blocks?|components?|nodes?))?\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:remove|delete|clear|erase|drop|disconnect)\s+(?:all\s+)?(?:of\s+)?(?:the\s+)?(?:connections|links|arrows|edges|lines|wires|connectors)\b",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:disconnect|unlink)\s+(?:everything|all)\b",
            ],
        ),
        instruction,
    )?;
    Some(Intent::DisconnectEdges {
        first: capture(&caps, 1),
        second: capture(&caps, 2),
    })
}

fn match_add(instruction: &str) -> Option<Intent> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let caps = first_captures(
        compile(
            &PATTERNS,
            &[
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:add|create|insert|place|put)\s+(?:(?:a|an|another|one|new|the)\s+)*(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?(?:\s+(?:to|in|on|into)\s+(?:the\s+)?(?:diagram|canvas|page|chart|drawing))?\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:i\s+)?(?:need|want)\s+)(?:(?:a|an|another|one|new)\s+)+(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s*[.!?]*\s*$",
            ],
        ),
        instruction,
    )?;
    Some(Intent::Add {
        component: capture(&caps, 1)?,
    })
}

fn match_modify(instruction: &str) -> Option<Intent> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let caps = first_captures(
        compile(
            &PATTERNS,
            &[
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:set|change|make|resize|adjust|update)\s+(?:(?:the|a|an)\s+)?(.+?)(?:'s)?(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s+(?:size|width|height|dimensions?)\s+(?:to\s+|=\s*|of\s+)?(\d+(?:\.\d+)?)(?:\s*px)?\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:resize|scale)\s+(?:(?:the|a|an)\s+)?(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s+to\s+(\d+(?:\.\d+)?)(?:\s*px)?\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:set|change|make|update|turn)\s+(?:(?:the|a|an)\s+)?(.+?)(?:'s)?(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s+(?:fill\s+)?(?:color|colour)\s+(?:to\s+|=\s*)?(#?[\w-]+)\s*[.!?]*\s*$",
                r"(?i)^\s*(?:(?:please|can you|could you|kindly)\s+)*(?:color|colour)\s+(?:(?:the|a|an)\s+)?(.+?)(?:\s+(?:block|component|node|box|element|shape|module|unit))?\s+(?:in\s+|with\s+)?(#?[\w-]+)\s*[.!?]*\s*$",
            ],
        ),
        instruction,
    )?;
    Some(Intent::ModifyProperty {
        component: capture(&caps, 1)?,
        value: capture(&caps, 2)?,
    })
}

fn match_bulk_resize(instruction: &str) -> Option<Intent> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN
        .get_or_init(|| Regex::new(r"(?i)\b(?:bigger|larger|smaller)\b").expect("valid regex"));
    re.is_match(instruction)
        .then_some(Intent::ContextualBulkResize)
}

fn compile(cell: &'static OnceLock<Vec<Regex>>, sources: &[&str]) -> &'static [Regex] {
    cell.get_or_init(|| {
        sources
            .iter()
            .map(|source| Regex::new(source).expect("valid regex"))
            .collect()
    })
}

fn first_captures<'t>(patterns: &[Regex], text: &'t str) -> Option<Captures<'t>> {
    patterns.iter().find_map(|re| re.captures(text))
}

fn capture(caps: &Captures<'_>, group: usize) -> Option<String> {
    let text = caps
        .get(group)?
        .as_str()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn remove(component: &str) -> Intent {
        Intent::Remove {
            component: component.to_string(),
        }
    }

    #[test]
    fn classify_remove_with_trailing_noun() {
        assert_eq!(classify("remove GPU block"), remove("GPU"));
        assert_eq!(classify("Please delete the Cache component."), remove("Cache"));
        assert_eq!(classify("get rid of the DMA engine"), remove("DMA engine"));
    }

    #[test]
    fn classify_remove_multi_word() {
        assert_eq!(classify("erase Memory Controller"), remove("Memory Controller"));
    }

    #[test]
    fn classify_replace() {
        assert_eq!(
            classify("change GPU to CPU"),
            Intent::Replace {
                from: "GPU".to_string(),
                to: "CPU".to_string()
            }
        );
        assert_eq!(
            classify("replace the GPU block with a TPU block"),
            Intent::Replace {
                from: "GPU".to_string(),
                to: "TPU".to_string()
            }
        );
        assert_eq!(
            classify("rename 'L2' as 'L3 cache'"),
            Intent::Replace {
                from: "L2".to_string(),
                to: "L3 cache".to_string()
            }
        );
        assert_eq!(
            classify("DMA should be called DMAC"),
            Intent::Replace {
                from: "DMA".to_string(),
                to: "DMAC".to_string()
            }
        );
    }

    #[test]
    fn classify_disconnect_between() {
        assert_eq!(
            classify("remove the connection between CPU and RAM"),
            Intent::Remove {
                component: "connection between CPU and RAM".to_string()
            },
            "remove outranks disconnect"
        );
        let all = candidates("remove the connection between CPU and RAM");
        assert_eq!(
            all[1],
            Intent::DisconnectEdges {
                first: Some("CPU".to_string()),
                second: Some("RAM".to_string())
            }
        );
    }

    #[test]
    fn classify_disconnect_verb() {
        assert_eq!(
            classify("disconnect CPU from RAM"),
            Intent::DisconnectEdges {
                first: Some("CPU".to_string()),
                second: Some("RAM".to_string())
            }
        );
    }

    #[test]
    fn classify_disconnect_everything() {
        let none = Intent::DisconnectEdges {
            first: None,
            second: None,
        };
        assert_eq!(classify("disconnect everything"), none);
        assert!(candidates("delete all arrows").contains(&none));
        assert!(candidates("clear the connections please").contains(&none));
    }

    #[test]
    fn classify_add() {
        let ram = Intent::Add {
            component: "RAM".to_string(),
        };
        assert_eq!(classify("add a RAM component"), ram);
        assert_eq!(classify("create new RAM block in the diagram"), ram);
        assert_eq!(classify("I need another RAM"), ram);
    }

    #[test]
    fn classify_modify_size() {
        assert_eq!(
            classify("set CPU size to 200"),
            Intent::ModifyProperty {
                component: "CPU".to_string(),
                value: "200".to_string()
            }
        );
        assert_eq!(
            classify("resize the GPU block to 90px"),
            Intent::ModifyProperty {
                component: "GPU".to_string(),
                value: "90".to_string()
            }
        );
    }

    #[test]
    fn classify_modify_color_after_replace_candidate() {
        let all = candidates("change the CPU color to red");
        assert_eq!(all[0].kind(), IntentKind::Replace);
        assert_eq!(
            all[1],
            Intent::ModifyProperty {
                component: "CPU".to_string(),
                value: "red".to_string()
            }
        );
    }

    #[test]
    fn classify_modify_color_verb() {
        assert_eq!(
            classify("colour the Cache #ff00ff"),
            Intent::ModifyProperty {
                component: "Cache".to_string(),
                value: "#ff00ff".to_string()
            }
        );
    }

    #[test]
    fn classify_bulk_resize() {
        assert_eq!(classify("make CPU bigger"), Intent::ContextualBulkResize);
        assert_eq!(classify("CPU and GPU a bit SMALLER"), Intent::ContextualBulkResize);
    }

    #[test]
    fn classify_unrecognized() {
        assert_eq!(classify("what is this diagram about?"), Intent::Unrecognized);
        assert_eq!(classify("biggest"), Intent::Unrecognized);
    }

    #[test]
    fn candidates_follow_priority() {
        let kinds: Vec<IntentKind> = candidates("remove the arrows").iter().map(Intent::kind).collect();
        assert_eq!(kinds, vec![IntentKind::Remove, IntentKind::DisconnectEdges]);
    }

    #[test]
    fn match_kind_unrecognized_is_none() {
        assert_eq!(match_kind(IntentKind::Unrecognized, "remove GPU"), None);
    }
}
