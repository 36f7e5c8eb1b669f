//! Parser for the small placeholder language used by the version endpoint
//! template.
//!
//! Supported tags:
//! - `{{config_version}}`, `{{socket_path}}`: substituted values
//! - `{{#if extra_module}}` ... `{{/if}}`: conditional block, not nestable

use thiserror::Error;

/// Errors raised while parsing a template source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed tag starting at byte {0}")]
    UnclosedTag(usize),

    #[error("unknown placeholder `{name}` at byte {offset}")]
    UnknownPlaceholder { name: String, offset: usize },

    #[error("unknown condition `{name}` at byte {offset}")]
    UnknownCondition { name: String, offset: usize },

    #[error("`{{{{/if}}}}` at byte {0} has no matching `{{{{#if}}}}`")]
    UnexpectedEndBlock(usize),

    #[error("conditional block opened at byte {0} is never closed")]
    UnclosedBlock(usize),

    #[error("nested conditional block at byte {0} is not supported")]
    NestedBlock(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Variable {
    ConfigVersion,
    SocketPath,
}

impl Variable {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "config_version" => Some(Self::ConfigVersion),
            "socket_path" => Some(Self::SocketPath),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flag {
    ExtraModule,
}

impl Flag {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "extra_module" => Some(Self::ExtraModule),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Text(String),
    Var(Variable),
    If { flag: Flag, body: Vec<Segment> },
}

/// An `{{#if}}` block still waiting for its `{{/if}}`.
struct OpenBlock {
    flag: Flag,
    offset: usize,
    body: Vec<Segment>,
}

fn push(root: &mut Vec<Segment>, block: &mut Option<OpenBlock>, segment: Segment) {
    match block {
        Some(open) => open.body.push(segment),
        None => root.push(segment),
    }
}

pub(crate) fn parse(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut root = Vec::new();
    let mut block: Option<OpenBlock> = None;
    let mut rest = source;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            push(&mut root, &mut block, Segment::Text(rest[..start].to_string()));
        }

        let tag_offset = offset + start;
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or(TemplateError::UnclosedTag(tag_offset))?;
        let tag = after[..end].trim();

        if let Some(name) = tag.strip_prefix("#if ") {
            if block.is_some() {
                return Err(TemplateError::NestedBlock(tag_offset));
            }
            let name = name.trim();
            let flag = Flag::from_name(name).ok_or_else(|| TemplateError::UnknownCondition {
                name: name.to_string(),
                offset: tag_offset,
            })?;
            block = Some(OpenBlock {
                flag,
                offset: tag_offset,
                body: Vec::new(),
            });
        } else if tag == "/if" {
            let open = block
                .take()
                .ok_or(TemplateError::UnexpectedEndBlock(tag_offset))?;
            root.push(Segment::If {
                flag: open.flag,
                body: open.body,
            });
        } else {
            let var = Variable::from_name(tag).ok_or_else(|| TemplateError::UnknownPlaceholder {
                name: tag.to_string(),
                offset: tag_offset,
            })?;
            push(&mut root, &mut block, Segment::Var(var));
        }

        let consumed = start + 2 + end + 2;
        rest = &rest[consumed..];
        offset += consumed;
    }

    if let Some(open) = block {
        return Err(TemplateError::UnclosedBlock(open.offset));
    }
    if !rest.is_empty() {
        root.push(Segment::Text(rest.to_string()));
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_and_variables() {
        let segments = parse("return 200 {{ config_version }};").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("return 200 ".into()),
                Segment::Var(Variable::ConfigVersion),
                Segment::Text(";".into()),
            ]
        );
    }

    #[test]
    fn test_parse_conditional_block() {
        let segments = parse("a{{#if extra_module}}b{{socket_path}}{{/if}}c").unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("a".into()),
                Segment::If {
                    flag: Flag::ExtraModule,
                    body: vec![Segment::Text("b".into()), Segment::Var(Variable::SocketPath)],
                },
                Segment::Text("c".into()),
            ]
        );
    }

    #[test]
    fn test_malformed_sources() {
        assert_eq!(parse("x {{config_version"), Err(TemplateError::UnclosedTag(2)));
        assert_eq!(
            parse("{{nope}}"),
            Err(TemplateError::UnknownPlaceholder { name: "nope".into(), offset: 0 })
        );
        assert_eq!(
            parse("{{#if tracing}}{{/if}}"),
            Err(TemplateError::UnknownCondition { name: "tracing".into(), offset: 0 })
        );
        assert_eq!(parse("ab{{/if}}"), Err(TemplateError::UnexpectedEndBlock(2)));
        assert_eq!(parse("{{#if extra_module}}open"), Err(TemplateError::UnclosedBlock(0)));
        assert_eq!(
            parse("{{#if extra_module}}{{#if extra_module}}{{/if}}{{/if}}"),
            Err(TemplateError::NestedBlock(20))
        );
    }

    #[test]
    fn test_error_messages_show_tags() {
        let err = TemplateError::UnexpectedEndBlock(3);
        assert_eq!(err.to_string(), "`{{/if}}` at byte 3 has no matching `{{#if}}`");
    }
}
