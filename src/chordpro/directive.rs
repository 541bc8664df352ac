// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! ChordPro `{name: value}` directives.

/// Kind of section an environment directive opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Chorus,
    Verse,
    Bridge,
    Tab,
}

impl Environment {
    /// Heading used when the directive carries no label
    pub fn default_label(self) -> &'static str {
        match self {
            Environment::Chorus => "Chorus",
            Environment::Verse => "Verse",
            Environment::Bridge => "Bridge",
            Environment::Tab => "Tab",
        }
    }

    /// Name used in `start_of_*` / `end_of_*`
    pub fn name(self) -> &'static str {
        match self {
            Environment::Chorus => "chorus",
            Environment::Verse => "verse",
            Environment::Bridge => "bridge",
            Environment::Tab => "tab",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "chorus" => Some(Environment::Chorus),
            "verse" => Some(Environment::Verse),
            "bridge" => Some(Environment::Bridge),
            "tab" => Some(Environment::Tab),
            _ => None,
        }
    }

    fn from_short(c: char) -> Option<Self> {
        match c {
            'c' => Some(Environment::Chorus),
            'v' => Some(Environment::Verse),
            'b' => Some(Environment::Bridge),
            't' => Some(Environment::Tab),
            _ => None,
        }
    }
}

/// A recognised directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Title(String),
    Subtitle(String),
    Artist(String),
    Key(String),
    Capo(String),
    Tempo(String),
    Comment(String),
    StartOf(Environment, Option<String>),
    EndOf(Environment),
    /// Anything else, kept by name
    Other(String),
}

/// Why a `{` line is not a well-formed directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveError {
    /// No closing brace on the line
    Unterminated,
    /// The brace closes, but more text follows it
    TrailingText,
}

/// Parse a line that is a single `{...}` directive.
///
/// Returns `None` when the line is not a directive.
pub fn parse_directive(line: &str) -> Option<Result<Directive, DirectiveError>> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('{')?;
    let Some(inner) = inner.strip_suffix('}') else {
        let error = if inner.contains('}') {
            DirectiveError::TrailingText
        } else {
            DirectiveError::Unterminated
        };
        return Some(Err(error));
    };
    let inner = inner.trim();

    let split = inner
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(inner.len());
    let (name, rest) = inner.split_at(split);
    let rest = rest.trim_start();
    let value = rest.strip_prefix(':').unwrap_or(rest).trim();
    let name = name.to_ascii_lowercase();
    let value = value.to_string();
    let label = || (!value.is_empty()).then(|| value.clone());

    let directive = match name.as_str() {
        "title" | "t" => Directive::Title(value),
        "subtitle" | "st" => Directive::Subtitle(value),
        "artist" => Directive::Artist(value),
        "key" => Directive::Key(value),
        "capo" => Directive::Capo(value),
        "tempo" => Directive::Tempo(value),
        "comment" | "c" | "comment_italic" | "ci" | "comment_box" | "cb" => {
            Directive::Comment(value)
        }
        other => {
            if let Some(env) = other.strip_prefix("start_of_").and_then(Environment::parse) {
                Directive::StartOf(env, label())
            } else if let Some(env) = other.strip_prefix("end_of_").and_then(Environment::parse) {
                Directive::EndOf(env)
            } else if let Some(env) = short_form(other, "so") {
                Directive::StartOf(env, label())
            } else if let Some(env) = short_form(other, "eo") {
                Directive::EndOf(env)
            } else {
                Directive::Other(other.to_string())
            }
        }
    };
    Some(Ok(directive))
}

/// `soc`, `eov` and friends
fn short_form(name: &str, prefix: &str) -> Option<Environment> {
    let rest = name.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Environment::from_short(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_directives() {
        assert_eq!(
            parse_directive("{title: Amazing Grace}"),
            Some(Ok(Directive::Title("Amazing Grace".to_string())))
        );
        assert_eq!(
            parse_directive("{t:Amazing Grace}"),
            Some(Ok(Directive::Title("Amazing Grace".to_string())))
        );
        assert_eq!(
            parse_directive("  {key: G}  "),
            Some(Ok(Directive::Key("G".to_string())))
        );
    }

    #[test]
    fn test_environment_directives() {
        assert_eq!(
            parse_directive("{start_of_chorus}"),
            Some(Ok(Directive::StartOf(Environment::Chorus, None)))
        );
        assert_eq!(
            parse_directive("{start_of_verse: Verse 2}"),
            Some(Ok(Directive::StartOf(Environment::Verse, Some("Verse 2".to_string()))))
        );
        assert_eq!(
            parse_directive("{soc}"),
            Some(Ok(Directive::StartOf(Environment::Chorus, None)))
        );
        assert_eq!(
            parse_directive("{eob}"),
            Some(Ok(Directive::EndOf(Environment::Bridge)))
        );
        assert_eq!(
            parse_directive("{end_of_tab}"),
            Some(Ok(Directive::EndOf(Environment::Tab)))
        );
    }

    #[test]
    fn test_comment_and_other() {
        assert_eq!(
            parse_directive("{ci: softly}"),
            Some(Ok(Directive::Comment("softly".to_string())))
        );
        assert_eq!(
            parse_directive("{new_page}"),
            Some(Ok(Directive::Other("new_page".to_string())))
        );
        assert_eq!(
            parse_directive("{Chorus}"),
            Some(Ok(Directive::Other("chorus".to_string())))
        );
    }

    #[test]
    fn test_not_a_directive() {
        assert_eq!(parse_directive("[G]Amazing grace"), None);
        assert_eq!(
            parse_directive("{title: broken"),
            Some(Err(DirectiveError::Unterminated))
        );
    }

    #[test]
    fn test_text_after_closing_brace() {
        assert_eq!(
            parse_directive("{c: Softly} [G]la"),
            Some(Err(DirectiveError::TrailingText))
        );
    }

    #[test]
    fn test_padded_directive_name() {
        assert_eq!(
            parse_directive("{ soc }"),
            Some(Ok(Directive::StartOf(Environment::Chorus, None)))
        );
        assert_eq!(
            parse_directive("{  title : Amazing Grace }"),
            Some(Ok(Directive::Title("Amazing Grace".to_string())))
        );
    }
}
