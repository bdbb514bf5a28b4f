//! Parser for rule declarations such as `"Min(3); Range(4, 9)"`.
//!
//! The grammar is permissive and nothing here fails. Malformed
//! input degrades to whatever can be salvaged.

/// Keyword parameters layered on top of a rule invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Skip the rule when the field's rendered value equals this text.
    pub include: Option<String>,
    /// Fail the rule when the field's rendered value equals this text.
    pub exclude: Option<String>,
    /// Custom text appended to the violation message.
    pub message: Option<String>,
}

impl Modifiers {
    /// Returns true if no modifier is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none() && self.message.is_none()
    }
}

/// One named rule reference with its raw parameters, as declared on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleInvocation {
    /// Rule name.
    pub name: String,
    /// Positional parameters. Quoted string literals keep their quotes.
    pub params: Vec<String>,
    /// Keyword modifiers pulled out of the parameter list.
    pub modifiers: Modifiers,
}

/// Parse a field's rule declaration into invocations, in declaration order.
///
/// An empty declaration yields no invocations.
#[must_use]
pub fn parse_tag(tag: &str) -> Vec<RuleInvocation> {
    let compact = strip_unquoted_whitespace(tag);
    split_unquoted(&compact, ';')
        .into_iter()
        .filter_map(parse_invocation)
        .collect()
}

fn parse_invocation(segment: &str) -> Option<RuleInvocation> {
    let (name, inner) = match segment.find('(') {
        Some(open) => {
            let rest = &segment[open + 1..];
            // Unterminated lists take everything after the '('.
            let inner = rest.rfind(')').map_or(rest, |close| &rest[..close]);
            (&segment[..open], inner)
        }
        None => (segment, ""),
    };

    if name.is_empty() {
        return None;
    }

    let mut invocation = RuleInvocation {
        name: name.to_string(),
        ..RuleInvocation::default()
    };

    if inner.is_empty() {
        return Some(invocation);
    }

    for token in split_unquoted(inner, ',') {
        if let Some((key, value)) = split_keyword(token) {
            let value = Some(unquote(value).unwrap_or(value).to_string());
            match key {
                "include" => invocation.modifiers.include = value,
                "exclude" => invocation.modifiers.exclude = value,
                "message" => invocation.modifiers.message = value,
                _ => invocation.params.push(token.to_string()),
            }
        } else {
            invocation.params.push(token.to_string());
        }
    }

    Some(invocation)
}

/// Splits `key=value` where `key` is a bare identifier and the `=` is outside
/// any quoted literal.
fn split_keyword(token: &str) -> Option<(&str, &str)> {
    if token.starts_with('\'') {
        return None;
    }
    let (key, value) = token.split_once('=')?;
    let is_ident = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_ident.then_some((key, value))
}

/// Returns the text between a matching pair of single quotes.
pub(crate) fn unquote(token: &str) -> Option<&str> {
    token
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
}

fn strip_unquoted_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut quoted = false;
    for c in s.chars() {
        if c == '\'' {
            quoted = !quoted;
        }
        if quoted || !c.is_whitespace() {
            out.push(c);
        }
    }
    out
}

/// Splits on `sep` outside quoted literals, dropping empty pieces only at the
/// invocation level.
fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quoted = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c == '\'' {
            quoted = !quoted;
        } else if c == sep && !quoted {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);

    if sep == ';' {
        parts.retain(|p| !p.is_empty());
    }
    parts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::{Modifiers, RuleInvocation, parse_tag, unquote};

    fn invocation(name: &str, params: &[&str]) -> RuleInvocation {
        RuleInvocation {
            name: name.to_string(),
            params: params.iter().map(ToString::to_string).collect(),
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn parses_multiple_invocations_in_order() {
        assert_eq!(
            parse_tag("Min(3); Range(4,9)"),
            vec![invocation("Min", &["3"]), invocation("Range", &["4", "9"])]
        );
    }

    #[test]
    fn bare_names_and_empty_lists_have_no_params() {
        assert_eq!(parse_tag("NotEmpty"), vec![invocation("NotEmpty", &[])]);
        assert_eq!(parse_tag("Email()"), vec![invocation("Email", &[])]);
    }

    #[test]
    fn empty_tags_yield_nothing() {
        assert!(parse_tag("").is_empty());
        assert!(parse_tag("  ;  ; ").is_empty());
        assert!(parse_tag("(1,2)").is_empty());
    }

    #[test]
    fn whitespace_inside_quotes_is_preserved() {
        assert_eq!(
            parse_tag("Contains( 'a b' )"),
            vec![invocation("Contains", &["'a b'"])]
        );
    }

    #[test]
    fn separators_inside_quotes_do_not_split() {
        assert_eq!(
            parse_tag("Contains('a,b;c'); NotEmpty"),
            vec![
                invocation("Contains", &["'a,b;c'"]),
                invocation("NotEmpty", &[])
            ]
        );
    }

    #[test]
    fn unterminated_parenthesis_degrades_to_best_effort() {
        assert_eq!(parse_tag("Range(4, 9"), vec![invocation("Range", &["4", "9"])]);
        assert_eq!(parse_tag("Min("), vec![invocation("Min", &[])]);
    }

    #[test]
    fn keyword_parameters_become_modifiers() {
        let parsed = parse_tag("Min(2, message = 'This will display', exclude = 3, include=root)");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].params, vec!["2".to_string()]);
        assert_eq!(
            parsed[0].modifiers,
            Modifiers {
                include: Some("root".to_string()),
                exclude: Some("3".to_string()),
                message: Some("This will display".to_string()),
            }
        );
    }

    #[test]
    fn unknown_keywords_and_quoted_equals_stay_positional() {
        let parsed = parse_tag("Rule(lang=en, 'a=b')");
        assert_eq!(parsed[0].params, vec!["lang=en", "'a=b'"]);
        assert!(parsed[0].modifiers.is_empty());
    }

    #[test]
    fn unquote_requires_a_matching_pair() {
        assert_eq!(unquote("'us'"), Some("us"));
        assert_eq!(unquote("''"), Some(""));
        assert_eq!(unquote("'us"), None);
        assert_eq!(unquote("us"), None);
        assert_eq!(unquote("'"), None);
    }

    proptest! {
        #[test]
        fn parser_never_panics(tag in "\\PC{0,40}") {
            let _ = parse_tag(&tag);
        }

        #[test]
        fn unquoted_whitespace_is_insignificant(
            name in "[A-Z][a-zA-Z]{0,8}",
            params in proptest::collection::vec(0_u32..1000, 0..4),
            pad in " {0,3}",
        ) {
            let list = params.iter().map(ToString::to_string).collect::<Vec<_>>();
            let tight = format!("{name}({})", list.join(","));
            let loose = format!("{pad}{name}{pad}({pad}{}{pad}){pad}", list.join(&format!("{pad},{pad}")));
            prop_assert_eq!(parse_tag(&tight), parse_tag(&loose));
        }
    }
}
