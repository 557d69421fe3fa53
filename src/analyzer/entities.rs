//! Structural Fact Extraction
//!
//! Line-oriented heuristic, not a parser: a trimmed line starting with the
//! class or function declaration keyword yields the following token,
//! truncated at the first parenthesis or generic-parameter marker.
//! Declaration order is preserved and duplicates are kept.

/// Class and function names found in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeEntities {
    pub classes: Vec<String>,
    pub functions: Vec<String>,
}

/// Extract class and function names from source text.
pub fn extract_entities(source: &str) -> CodeEntities {
    let mut entities = CodeEntities::default();

    for line in source.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("class ") {
            if let Some(name) = declared_name(rest) {
                entities.classes.push(name);
            }
        } else if let Some(rest) = trimmed.strip_prefix("def ") {
            if let Some(name) = declared_name(rest) {
                entities.functions.push(name);
            }
        }
    }

    entities
}

/// First token after the keyword, cut at `(` or `[`.
fn declared_name(rest: &str) -> Option<String> {
    let token = rest.split_whitespace().next()?;
    let name = token
        .split(['(', '['])
        .next()
        .unwrap_or_default()
        .trim_end_matches(':');
    (!name.is_empty()).then(|| name.to_string())
}
