//! Locates marker-annotated declarations in one source file.
//!
//! The scanner works on trimmed, non-blank lines and recognises three
//! markers: `// @Configuration` (optionally followed by `@Alias=<alias>`)
//! before a struct, `// @DefaultConfig` before a default-value directive and
//! `// @AutoExecute` before a callable. Struct bodies are delimited by brace
//! counting; the fields themselves are left to the extractor.

mod lexical;

use crate::model::{DefaultDecl, DefaultSource, HookDecl, HookTarget};
use crate::{GenerateError, GenerateResult, Origin};

use lexical::{code_outside_strings, is_line_comment, parse_fn_head, parse_struct_head};
pub(crate) use lexical::{
    is_attribute, is_doc_comment, is_ident, nesting_delta, split_comment, strip_visibility,
};

const TYPE_MARKER: &str = "@Configuration";
const DEFAULT_MARKER: &str = "@DefaultConfig";
const AUTO_EXECUTE_MARKER: &str = "@AutoExecute";
const ALIAS_PREFIX: &str = "@Alias=";

/// A non-blank source line with surrounding whitespace removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    /// One-based line number in the original file.
    pub number: usize,
    /// Trimmed text.
    pub text: String,
}

/// A struct declaration following a type-boundary marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannedType {
    /// Struct name.
    pub name: String,
    /// Alias given on the marker line.
    pub alias: Option<String>,
    /// Attributes written above the struct, one entry per attribute.
    pub attributes: Vec<String>,
    /// Lines strictly between the declaration line and the closing brace.
    pub body: Vec<SourceLine>,
    /// Location of the declaration line.
    pub origin: Origin,
}

/// Everything found in one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScannedFile {
    /// File name relative to the scanned directory.
    pub file: String,
    /// Module the file declares, or `None` for `mod.rs`, `lib.rs` and
    /// `main.rs`.
    pub module: Option<String>,
    /// Marked struct declarations, in line order.
    pub types: Vec<ScannedType>,
    /// Default-value directives, in line order.
    pub defaults: Vec<DefaultDecl>,
    /// Auto-execute directives, in line order.
    pub hooks: Vec<HookDecl>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Type,
    Default,
    AutoExecute,
}

/// Recognise a marker comment and return the text after it.
fn marker_of(text: &str) -> Option<(Marker, &str)> {
    if !is_line_comment(text) {
        return None;
    }
    let body = text.strip_prefix("//")?.trim_start();
    [
        (TYPE_MARKER, Marker::Type),
        (DEFAULT_MARKER, Marker::Default),
        (AUTO_EXECUTE_MARKER, Marker::AutoExecute),
    ]
    .into_iter()
    .find_map(|(prefix, marker)| {
        let rest = body.strip_prefix(prefix)?;
        (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some((marker, rest))
    })
}

/// Module name implied by a file name.
///
/// # Examples
///
/// ```
/// use layerconf_codegen::scan::module_for_file;
///
/// assert_eq!(module_for_file("server.rs").as_deref(), Some("server"));
/// assert_eq!(module_for_file("mod.rs"), None);
/// ```
#[must_use]
pub fn module_for_file(file: &str) -> Option<String> {
    let stem = file.strip_suffix(".rs").unwrap_or(file);
    match stem {
        "mod" | "lib" | "main" => None,
        other => Some(other.to_owned()),
    }
}

/// Scan the contents of `file`.
///
/// # Errors
///
/// Returns [`GenerateError::Structural`] when a marked struct cannot be
/// delimited and [`GenerateError::InvalidDirective`] when a marker is not
/// followed by something it can describe.
pub fn scan_source(file: &str, text: &str) -> GenerateResult<ScannedFile> {
    let lines = text
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            (!trimmed.is_empty()).then(|| SourceLine {
                number: index + 1,
                text: trimmed.to_owned(),
            })
        })
        .collect();
    let mut scanner = Scanner {
        lines,
        pos: 0,
        out: ScannedFile {
            file: file.to_owned(),
            module: module_for_file(file),
            ..ScannedFile::default()
        },
    };
    scanner.run()?;
    tracing::debug!(
        file,
        types = scanner.out.types.len(),
        defaults = scanner.out.defaults.len(),
        hooks = scanner.out.hooks.len(),
        "scanned source file"
    );
    Ok(scanner.out)
}

struct Scanner {
    lines: Vec<SourceLine>,
    pos: usize,
    out: ScannedFile,
}

impl Scanner {
    fn run(&mut self) -> GenerateResult<()> {
        while let Some(line) = self.lines.get(self.pos) {
            let origin = self.origin(line.number);
            match marker_of(&line.text) {
                Some((Marker::Type, args)) => {
                    let alias = parse_alias(args, &origin)?;
                    self.pos += 1;
                    self.scan_type(alias, origin)?;
                }
                Some((Marker::Default, _)) => {
                    self.pos += 1;
                    self.scan_default(origin)?;
                }
                Some((Marker::AutoExecute, _)) => {
                    self.pos += 1;
                    self.scan_hook(origin)?;
                }
                None => self.pos += 1,
            }
        }
        Ok(())
    }

    fn origin(&self, line: usize) -> Origin {
        Origin::new(self.out.file.as_str(), line)
    }

    fn current(&self) -> Option<&SourceLine> {
        self.lines.get(self.pos)
    }

    /// Collect attributes (possibly spanning lines) and skip doc comments
    /// until the next declaration line.
    fn take_preamble(&mut self) -> GenerateResult<Vec<String>> {
        let mut attributes = Vec::new();
        while let Some(line) = self.current() {
            if is_doc_comment(&line.text) {
                self.pos += 1;
            } else if is_attribute(&line.text) {
                attributes.push(self.take_attribute()?);
            } else {
                break;
            }
        }
        Ok(attributes)
    }

    fn take_attribute(&mut self) -> GenerateResult<String> {
        let start = self.current().map_or(0, |line| line.number);
        let mut text = String::new();
        let mut depth = 0;
        while let Some(line) = self.current() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(split_comment(&line.text).0.trim_end());
            depth += nesting_delta(&line.text, '[', ']');
            self.pos += 1;
            if depth <= 0 {
                return Ok(text);
            }
        }
        Err(GenerateError::structural(
            self.origin(start),
            "attribute is never closed",
        ))
    }

    fn scan_type(&mut self, alias: Option<String>, marker: Origin) -> GenerateResult<()> {
        let Some(next) = self.current() else {
            return Err(GenerateError::structural(
                marker,
                "configuration marker at end of file",
            ));
        };
        if is_line_comment(&next.text) {
            tracing::debug!(
                origin = %marker,
                "configuration marker disabled by a following comment"
            );
            return Ok(());
        }

        let attributes = self.take_preamble()?;
        let Some(decl) = self.current().cloned() else {
            return Err(GenerateError::structural(
                marker,
                "configuration marker at end of file",
            ));
        };
        let origin = self.origin(decl.number);
        let head = parse_struct_head(&decl.text)
            .map_err(|message| GenerateError::structural(origin.clone(), message))?;
        let decl_index = self.pos;

        let body = if head.unit {
            self.pos += 1;
            Vec::new()
        } else {
            let (open_index, end_index) = self.find_block(decl_index, &head.name, &origin)?;
            self.reject_fields_beside_braces(open_index, end_index)?;
            self.pos = end_index + 1;
            self.lines
                .get(open_index + 1..end_index)
                .map(<[SourceLine]>::to_vec)
                .unwrap_or_default()
        };

        tracing::debug!(name = %head.name, %origin, "found configuration type");
        self.out.types.push(ScannedType {
            name: head.name,
            alias,
            attributes,
            body,
            origin,
        });
        Ok(())
    }

    /// Fields are read line by line, so the lines holding the opening and
    /// closing braces must carry nothing else.
    fn reject_fields_beside_braces(
        &self,
        open_index: usize,
        end_index: usize,
    ) -> GenerateResult<()> {
        let code_at = |index: usize| {
            self.lines
                .get(index)
                .map(|line| (line.number, code_outside_strings(&line.text)))
        };
        let shares_line = |number: usize| {
            GenerateError::structural(
                self.origin(number),
                "fields must not share a line with a brace",
            )
        };
        if let Some((number, code)) = code_at(open_index) {
            let after_open = code.split_once('{').map_or("", |(_, tail)| tail);
            let inside = if open_index == end_index {
                after_open.rsplit_once('}').map_or(after_open, |(body, _)| body)
            } else {
                after_open
            };
            if !inside.trim().is_empty() {
                return Err(shares_line(number));
            }
        }
        if open_index != end_index
            && let Some((number, code)) = code_at(end_index)
        {
            let before_close = code.split_once('}').map_or(code.as_str(), |(head, _)| head);
            if !before_close.trim().is_empty() {
                return Err(shares_line(number));
            }
        }
        Ok(())
    }

    /// Indices of the line opening the body and the line where the brace
    /// count returns to zero.
    fn find_block(
        &self,
        start: usize,
        name: &str,
        origin: &Origin,
    ) -> GenerateResult<(usize, usize)> {
        let mut depth = 0_i64;
        let mut open_index = None;
        for (index, line) in self.lines.iter().enumerate().skip(start) {
            depth += nesting_delta(&line.text, '{', '}');
            if open_index.is_none() && code_outside_strings(&line.text).contains('{') {
                open_index = Some(index);
            }
            if depth < 0 {
                return Err(GenerateError::structural(
                    self.origin(line.number),
                    format!("unbalanced closing brace in `{name}`"),
                ));
            }
            if let Some(open) = open_index
                && depth == 0
            {
                return Ok((open, index));
            }
        }
        Err(GenerateError::structural(
            origin.clone(),
            format!("unbalanced braces: the body of `{name}` is never closed"),
        ))
    }

    fn scan_default(&mut self, marker: Origin) -> GenerateResult<()> {
        if let Some(text) = self.take_directive_comment() {
            let (expr, key) = text
                .rsplit_once(char::is_whitespace)
                .map(|(expr, key)| (expr.trim(), key.trim()))
                .filter(|(expr, key)| !expr.is_empty() && !key.is_empty())
                .ok_or_else(|| {
                    GenerateError::directive(
                        marker.clone(),
                        "expected `// <initializer> <key.path>` after the default marker",
                    )
                })?;
            validate_expr(expr, &marker)?;
            validate_key(key, &marker)?;
            self.out.defaults.push(DefaultDecl {
                source: DefaultSource::Expression {
                    expr: expr.to_owned(),
                    key: key.to_owned(),
                },
                origin: marker,
            });
            return Ok(());
        }

        let head = self.take_fn_head(&marker, "default")?;
        if !head.params.is_empty() {
            return Err(GenerateError::directive(
                marker,
                format!("default function `{}` must not take parameters", head.name),
            ));
        }
        let Some(returns) = head.returns else {
            return Err(GenerateError::directive(
                marker,
                format!("default function `{}` must declare its return type", head.name),
            ));
        };
        if syn::parse_str::<syn::Type>(&returns).is_err() {
            return Err(GenerateError::directive(
                marker,
                format!("`{returns}` is not a type"),
            ));
        }
        self.out.defaults.push(DefaultDecl {
            source: DefaultSource::Function {
                module: self.out.module.clone(),
                name: head.name,
                returns,
            },
            origin: marker,
        });
        Ok(())
    }

    fn scan_hook(&mut self, marker: Origin) -> GenerateResult<()> {
        if let Some(text) = self.take_directive_comment() {
            if text.is_empty() {
                return Err(GenerateError::directive(
                    marker,
                    "expected `// <callable>` after the auto-execute marker",
                ));
            }
            validate_expr(&text, &marker)?;
            self.out.hooks.push(HookDecl {
                target: HookTarget::Expression(text),
                origin: marker,
            });
            return Ok(());
        }

        let head = self.take_fn_head(&marker, "auto-execute")?;
        self.out.hooks.push(HookDecl {
            target: HookTarget::Function {
                module: self.out.module.clone(),
                name: head.name,
                takes_config: !head.params.is_empty(),
            },
            origin: marker,
        });
        Ok(())
    }

    /// Consume a plain comment line and return its text.
    fn take_directive_comment(&mut self) -> Option<String> {
        let line = self.current()?;
        if !is_line_comment(&line.text) || marker_of(&line.text).is_some() {
            return None;
        }
        let text = line.text.strip_prefix("//").unwrap_or_default().trim().to_owned();
        self.pos += 1;
        Some(text)
    }

    fn take_fn_head(&mut self, marker: &Origin, kind: &str) -> GenerateResult<lexical::FnHead> {
        self.take_preamble()?;
        let head = self.current().and_then(|line| parse_fn_head(&line.text));
        let Some(parsed) = head else {
            return Err(GenerateError::directive(
                marker.clone(),
                format!("{kind} marker must precede a function or a comment"),
            ));
        };
        self.pos += 1;
        Ok(parsed)
    }
}

fn parse_alias(args: &str, origin: &Origin) -> GenerateResult<Option<String>> {
    let mut alias = None;
    for token in args.split_whitespace() {
        let Some(value) = token.strip_prefix(ALIAS_PREFIX) else {
            return Err(GenerateError::directive(
                origin.clone(),
                format!("unrecognised configuration marker argument `{token}`"),
            ));
        };
        if !is_ident(value) {
            return Err(GenerateError::directive(
                origin.clone(),
                format!("alias `{value}` must be an identifier"),
            ));
        }
        alias = Some(value.to_owned());
    }
    Ok(alias)
}

fn validate_expr(expr: &str, origin: &Origin) -> GenerateResult<()> {
    syn::parse_str::<syn::Expr>(expr)
        .map(drop)
        .map_err(|err| GenerateError::directive(origin.clone(), format!("`{expr}`: {err}")))
}

fn validate_key(key: &str, origin: &Origin) -> GenerateResult<()> {
    if key.split('.').any(str::is_empty) {
        return Err(GenerateError::directive(
            origin.clone(),
            format!("`{key}` is not a dot-separated key path"),
        ));
    }
    Ok(())
}
