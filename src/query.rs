//! Composite query parsing and parameter substitution
//!
//! A composite query carries its own connection target on the first line and
//! the LQL body on the remaining lines:
//!
//! ```text
//! monitoring.example.com 6557
//! GET hosts
//! Columns: name state
//! Filter: name = $P{host}
//! ```
//!
//! Parameters are substituted textually before the request is built:
//! `$P{name}` becomes the value in double quotes, `$P!{name}` the value
//! verbatim.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::constants::directive;
use crate::error::{Error, Result};

/// Strip newlines from a value before it is placed into a query.
///
/// Livestatus ends a request at the first empty line, and `"\n \n"` is read
/// the same way, so removing only `"\n\n"` is not enough.
pub fn lqencode(value: &str) -> String {
    value.replace('\n', "")
}

/// Host and port taken from the first line of a composite query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Host name or address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Target {
    /// Create a new target
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let (host, port) = line.split_once(' ').ok_or_else(|| {
            Error::MalformedQuery(format!("expected '<host> <port>' on first line, got {:?}", line))
        })?;

        if host.is_empty() {
            return Err(Error::MalformedQuery("missing host on first line".to_string()));
        }

        let port = port.trim().parse::<u16>().map_err(|e| {
            Error::MalformedQuery(format!("invalid port {:?}: {}", port, e))
        })?;

        Ok(Target::new(host, port))
    }
}

/// Named values substituted into the query body.
///
/// A name mapped to `None` is treated like an absent name: its placeholders
/// are left in the query untouched.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    values: IndexMap<String, Option<String>>,
}

impl Parameters {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a parameter value in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), Some(value.into()));
    }

    /// Declare a parameter without a value
    pub fn insert_null(&mut self, name: impl Into<String>) {
        self.values.insert(name.into(), None);
    }

    /// Get a non-null value
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_deref())
    }

    /// Number of declared parameters, null ones included
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no parameters are declared
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Replace `$P{name}` and `$P!{name}` placeholders in one left-to-right pass.
///
/// Substituted text is never rescanned, so a value containing a placeholder
/// is inserted as-is.
pub fn substitute(text: &str, params: &Parameters) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("$P") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let (raw, open) = if tail.starts_with("$P!{") {
            (true, 4)
        } else if tail.starts_with("$P{") {
            (false, 3)
        } else {
            out.push_str("$P");
            rest = &tail[2..];
            continue;
        };

        let Some(close) = tail[open..].find('}') else {
            out.push_str(tail);
            rest = "";
            break;
        };

        let name = &tail[open..open + close];
        let end = open + close + 1;
        match params.get(name) {
            Some(value) if raw => out.push_str(value),
            Some(value) => {
                out.push('"');
                out.push_str(&lqencode(value));
                out.push('"');
            }
            None => out.push_str(&tail[..end]),
        }
        rest = &tail[end..];
    }

    out.push_str(rest);
    out
}

/// Fail if any line is blank; the server would end the request there.
fn check_no_blank_lines(text: &str) -> Result<()> {
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            return Err(Error::MalformedQuery(format!(
                "line {} is blank; Livestatus ends a request at an empty line",
                index + 1
            )));
        }
    }
    Ok(())
}

/// A validated composite query, ready to be sent
#[derive(Debug, Clone)]
pub struct CompositeQuery {
    target: Target,
    body: String,
    table: String,
}

impl CompositeQuery {
    /// Validate, substitute and split a raw composite query.
    ///
    /// Every check happens here, before any socket is opened.
    pub fn parse(raw: &str, params: &Parameters) -> Result<Self> {
        check_no_blank_lines(raw)?;

        let text = substitute(raw, params);
        // Raw substitution may have brought its own line breaks
        check_no_blank_lines(&text)?;

        let mut lines = text.lines();
        let first = lines
            .next()
            .ok_or_else(|| Error::MalformedQuery("query is empty".to_string()))?;
        let target: Target = first.parse()?;

        let body_lines: Vec<&str> = lines.collect();
        let head = body_lines
            .first()
            .ok_or_else(|| Error::MalformedQuery("query has no LQL body".to_string()))?;
        let table = table_name(head)?;

        Ok(Self {
            target,
            body: body_lines.join("\n"),
            table,
        })
    }

    /// Connection target
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// LQL body without the target line
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Table named by `GET <table>`
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Extract the table from a `GET <table>` line
fn table_name(line: &str) -> Result<String> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(verb), Some(table)) if verb == directive::GET => Ok(table.to_string()),
        _ => Err(Error::MalformedQuery(format!(
            "expected 'GET <table>' as first LQL line, got {:?}",
            line
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse() {
        let target: Target = "mon.example.com 6557".parse().unwrap();
        assert_eq!(target, Target::new("mon.example.com", 6557));
        assert_eq!(target.to_string(), "mon.example.com:6557");
    }

    #[test]
    fn test_target_rejects_bad_port() {
        assert!(matches!(
            "localhost port".parse::<Target>(),
            Err(Error::MalformedQuery(_))
        ));
        assert!(matches!(
            "localhost -1".parse::<Target>(),
            Err(Error::MalformedQuery(_))
        ));
        assert!(matches!(
            "localhost".parse::<Target>(),
            Err(Error::MalformedQuery(_))
        ));
    }

    #[test]
    fn test_substitute_quoted_and_raw() {
        let params = Parameters::new()
            .with("host", "web01")
            .with("filter", "Filter: state = 2");
        let text = "Filter: name = $P{host}\n$P!{filter}\nFilter: alias = $P{host}";
        assert_eq!(
            substitute(text, &params),
            "Filter: name = \"web01\"\nFilter: state = 2\nFilter: alias = \"web01\""
        );
    }

    #[test]
    fn test_substitute_leaves_unknown_and_null() {
        let mut params = Parameters::new();
        params.insert_null("gone");
        let text = "Filter: a = $P{missing}\nFilter: b = $P!{gone}";
        assert_eq!(substitute(text, &params), text);
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let params = Parameters::new().with("a", "$P{b}").with("b", "x");
        assert_eq!(substitute("$P!{a} $P!{b}", &params), "$P{b} x");
    }

    #[test]
    fn test_substitute_unterminated_placeholder() {
        let params = Parameters::new().with("a", "1");
        assert_eq!(substitute("cost $P{a", &params), "cost $P{a");
        assert_eq!(substitute("$PATH $P!{a}", &params), "$PATH 1");
    }

    #[test]
    fn test_quoted_values_are_lqencoded() {
        let params = Parameters::new().with("name", "a\n\nb");
        assert_eq!(substitute("$P{name}", &params), "\"ab\"");
    }

    #[test]
    fn test_parse_composite_query() {
        let params = Parameters::new().with("state", "2");
        let query = CompositeQuery::parse(
            "localhost 6557\nGET services\nColumns: host_name description\nFilter: state = $P!{state}\n",
            &params,
        )
        .unwrap();
        assert_eq!(query.target(), &Target::new("localhost", 6557));
        assert_eq!(query.table(), "services");
        assert_eq!(
            query.body(),
            "GET services\nColumns: host_name description\nFilter: state = 2"
        );
    }

    #[test]
    fn test_parse_rejects_blank_line() {
        let result = CompositeQuery::parse("localhost 6557\nGET hosts\n\nColumns: name", &Parameters::new());
        assert!(matches!(result, Err(Error::MalformedQuery(_))));

        let result = CompositeQuery::parse("localhost 6557\nGET hosts\n   \nColumns: name", &Parameters::new());
        assert!(matches!(result, Err(Error::MalformedQuery(_))));
    }

    #[test]
    fn test_parse_rejects_blank_line_from_raw_parameter() {
        let params = Parameters::new().with("extra", "Filter: a = 1\n\nGET hosts");
        let result = CompositeQuery::parse("localhost 6557\nGET hosts\n$P!{extra}", &params);
        assert!(matches!(result, Err(Error::MalformedQuery(_))));
    }

    #[test]
    fn test_parse_requires_body_and_get() {
        assert!(matches!(
            CompositeQuery::parse("localhost 6557", &Parameters::new()),
            Err(Error::MalformedQuery(_))
        ));
        assert!(matches!(
            CompositeQuery::parse("localhost 6557\nCOMMAND [0] NOP", &Parameters::new()),
            Err(Error::MalformedQuery(_))
        ));
    }

    #[test]
    fn test_parameters_from_iter() {
        let params: Parameters = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("b"), Some("2"));
        assert_eq!(params.get("c"), None);
    }
}
