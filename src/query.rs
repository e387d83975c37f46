//! Chat-style menu requests.
//!
//! Accepts `[prefix]<keyword>[ <entry>[ <item>]]`, for example `/menu`,
//! `menu weather`, `菜单天气` or `/help weather today`. The entry is the first
//! whitespace-separated word after the keyword; everything after it is the
//! sub-item.

use crate::config::MenuConfig;

/// A parsed menu request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuQuery {
    Overview,
    Entry(String),
    SubItem { entry: String, item: String },
}

#[derive(Debug, Clone)]
pub struct QueryParser {
    prefixes: Vec<String>,
    keywords: Vec<String>,
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::from_config(&MenuConfig::default())
    }
}

/// Longest-first so overlapping candidates (e.g. `//` and `/`) prefer the longer.
fn longest_first(mut items: Vec<String>) -> Vec<String> {
    items.retain(|s| !s.is_empty());
    items.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    items.dedup();
    items
}

impl QueryParser {
    pub fn new(prefixes: Vec<String>, keywords: Vec<String>) -> Self {
        Self {
            prefixes: longest_first(prefixes),
            keywords: longest_first(keywords),
        }
    }

    pub fn from_config(config: &MenuConfig) -> Self {
        Self::new(config.command_prefixes.clone(), config.menu_keywords.clone())
    }

    /// Parse a message. Returns `None` if it is not a menu request.
    pub fn parse(&self, text: &str) -> Option<MenuQuery> {
        let text = text.trim();
        let unprefixed = self
            .prefixes
            .iter()
            .find_map(|p| text.strip_prefix(p.as_str()))
            .unwrap_or(text);
        let rest = self
            .keywords
            .iter()
            .find_map(|k| strip_keyword(unprefixed, k))?
            .trim();

        if rest.is_empty() {
            return Some(MenuQuery::Overview);
        }
        match rest.split_once(char::is_whitespace) {
            Some((entry, item)) if !item.trim().is_empty() => Some(MenuQuery::SubItem {
                entry: entry.to_string(),
                item: item.trim().to_string(),
            }),
            _ => Some(MenuQuery::Entry(rest.to_string())),
        }
    }
}

/// Strip `keyword` from the start of `text`.
///
/// ASCII keywords match case-insensitively and must not run into another
/// ASCII letter or digit (`menus` is not `menu`).
fn strip_keyword<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    let head = text.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &text[keyword.len()..];
    let ascii_tail = keyword.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    if ascii_tail && rest.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Option<MenuQuery> {
        QueryParser::default().parse(text)
    }

    #[test]
    fn bare_keyword_is_overview() {
        assert_eq!(parse("menu"), Some(MenuQuery::Overview));
        assert_eq!(parse("/menu"), Some(MenuQuery::Overview));
        assert_eq!(parse("  菜单  "), Some(MenuQuery::Overview));
        assert_eq!(parse("HELP"), Some(MenuQuery::Overview));
    }

    #[test]
    fn entry_and_sub_item() {
        assert_eq!(parse("/menu weather"), Some(MenuQuery::Entry("weather".into())));
        assert_eq!(parse("菜单天气"), Some(MenuQuery::Entry("天气".into())));
        assert_eq!(
            parse("help weather  today please"),
            Some(MenuQuery::SubItem {
                entry: "weather".into(),
                item: "today please".into()
            })
        );
        assert_eq!(
            parse("功能 2 1"),
            Some(MenuQuery::SubItem {
                entry: "2".into(),
                item: "1".into()
            })
        );
    }

    #[test]
    fn other_text_is_ignored() {
        assert_eq!(parse("hello"), None);
        assert_eq!(parse("menus"), None);
        assert_eq!(parse("/weather"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn custom_prefixes_and_keywords() {
        let parser = QueryParser::new(vec!["!".into(), "!!".into()], vec!["cmds".into()]);
        assert_eq!(parser.parse("!!cmds 3"), Some(MenuQuery::Entry("3".into())));
        assert_eq!(parser.parse("menu"), None);
    }
}
