//! Inline style declarations.
//!
//! An element's inline style is its `style` attribute: a `;`-separated list
//! of `property: value` pairs. A `;` inside quotes or parentheses (e.g.
//! `url("a;b.png")`) belongs to the value. Properties are matched
//! case-insensitively and re-serialized in their original order.

/// Parsed inline style of one element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse a `style` attribute value. Malformed declarations (no `:`, empty
    /// property) are dropped.
    pub fn parse(source: &str) -> Self {
        let declarations = split_declarations(source)
            .into_iter()
            .filter_map(|decl| {
                let (prop, value) = decl.split_once(':')?;
                let prop = prop.trim().to_ascii_lowercase();
                if prop.is_empty() {
                    return None;
                }
                Some((prop, value.trim().to_string()))
            })
            .collect();
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value of `property` in place, or append it. An empty value
    /// removes the declaration.
    pub fn set(&mut self, property: &str, value: &str) {
        let value = value.trim();
        let existing = self
            .declarations
            .iter()
            .position(|(p, _)| p.eq_ignore_ascii_case(property));
        match (existing, value.is_empty()) {
            (Some(i), true) => {
                self.declarations.remove(i);
            }
            (Some(i), false) => self.declarations[i].1 = value.to_string(),
            (None, true) => {}
            (None, false) => self
                .declarations
                .push((property.to_ascii_lowercase(), value.to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize back to attribute form, e.g. `transform: translateY(40px); height: 80px;`.
    pub fn to_attr_value(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split on `;` outside quoted strings and parentheses.
fn split_declarations(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in source.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}
