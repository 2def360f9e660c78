use std::collections::HashMap;

const DERIVES: &str = "::=";

/// One right-hand side of a production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub expression: String,
    /// Only offered once some variable holds a value.
    pub requires_initialized: bool,
    /// Parsed from a second `#` annotation. Nothing consults it during expansion.
    pub marks_initializing: bool,
}

impl Alternative {
    /// Parse `expr [#tag[#tag2]]`.
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split('#');
        let expression = parts.next().unwrap_or("").trim().to_string();
        let requires_initialized = parts.next().is_some_and(|tag| tag.contains("init"));
        let marks_initializing = parts.next().is_some();

        Self {
            expression,
            requires_initialized,
            marks_initializing,
        }
    }
}

/// Case-insensitive mapping from non-terminal to its alternatives.
#[derive(Debug, Clone, Default)]
pub struct ProductionTable {
    productions: HashMap<String, Vec<Alternative>>,
}

impl ProductionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        table.add(text);
        table
    }

    /// Add every blank-line separated `KEY ::= alt | alt` block in `text`.
    ///
    /// Returns the number of alternatives added. Blocks without `::=` are
    /// logged and skipped.
    pub fn add(&mut self, text: &str) -> usize {
        split_blocks(text)
            .iter()
            .map(|block| self.add_block(block))
            .sum()
    }

    fn add_block(&mut self, block: &str) -> usize {
        let Some((key, body)) = block.split_once(DERIVES) else {
            log::warn!("Malformed production:\n{}", block);
            return 0;
        };

        let key = key.trim().to_uppercase();
        if key.is_empty() {
            log::warn!("Production without a key:\n{}", block);
            return 0;
        }

        let alternatives: Vec<Alternative> = body.split('|').map(Alternative::parse).collect();
        let count = alternatives.len();

        if self.productions.insert(key.clone(), alternatives).is_some() {
            log::warn!("Production {} redefined; keeping the later definition", key);
        }

        count
    }

    pub fn get(&self, key: &str) -> Option<&[Alternative]> {
        self.productions
            .get(&key.to_uppercase())
            .map(Vec::as_slice)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.productions.contains_key(&key.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.productions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }
}

fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotations() {
        let plain = Alternative::parse(" output @Number ");
        assert_eq!(plain.expression, "output @Number");
        assert!(!plain.requires_initialized);
        assert!(!plain.marks_initializing);

        let needs = Alternative::parse("output @Initialized #init");
        assert!(needs.requires_initialized);
        assert!(!needs.marks_initializing);

        let both = Alternative::parse("let @Variable <- @Number #noinit#x");
        assert!(!both.requires_initialized);
        assert!(both.marks_initializing);
    }

    #[test]
    fn test_blocks_and_case_insensitive_keys() {
        let table = ProductionTable::parse(
            "Program ::= Line ;\n\nline ::= output 1\n  | output 2 #init\n",
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("PROGRAM").map(|alts| alts.len()), Some(1));
        let line = table.get("Line").unwrap();
        assert_eq!(line.len(), 2);
        assert!(line[1].requires_initialized);
    }

    #[test]
    fn test_malformed_block_is_skipped() {
        let mut table = ProductionTable::new();
        let added = table.add("Broken = nothing\n\nOk ::= a | b");

        assert_eq!(added, 2);
        assert!(!table.contains("Broken"));
        assert!(table.contains("ok"));
    }
}
