//! Variable substitution for output naming templates.

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

/// Variable substitution context for output naming templates.
///
/// Supports a closed set of variables in `{varname}` syntax. Templates are
/// never evaluated, only substituted.
///
/// # Example
///
/// ```
/// use reelforge_av::TemplateContext;
/// use std::path::Path;
///
/// let ctx = TemplateContext::for_source(Path::new("/input/holiday.2019.mov"));
///
/// assert_eq!(ctx.render("{dir}/{rawname}.mkv").unwrap(), "/input/holiday.mkv");
/// assert_eq!(ctx.render("f'{d}/{f}.mp4'").unwrap(), "/input/holiday.2019.mov.mp4");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateContext {
    vars: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty template context.
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Create a context holding the variables derived from a source path.
    ///
    /// This adds the following variables:
    /// - `{filename}` / `{f}` - Source file name with extension
    /// - `{rawname}` / `{r}` - File name up to its first `.`
    /// - `{dir}` / `{d}` - Parent directory, `.` when the path has none
    pub fn for_source(input: &Path) -> Self {
        let filename = input
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| input.display().to_string());
        let rawname = filename.split('.').next().unwrap_or_default().to_string();
        let dir = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
            _ => ".".to_string(),
        };

        Self::new()
            .with_var("filename", &filename)
            .with_var("f", &filename)
            .with_var("rawname", &rawname)
            .with_var("r", &rawname)
            .with_var("dir", &dir)
            .with_var("d", &dir)
    }

    /// Add a custom variable.
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Get a variable value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|s| s.as_str())
    }

    /// Render a template strictly.
    ///
    /// Strips an optional `f'...'` / `f"..."` wrapper, then replaces every
    /// `{name}` in a single pass. A placeholder naming an unknown variable is
    /// an error. Braces that do not form a placeholder are kept literally, and
    /// substituted values are never rescanned.
    pub fn render(&self, template: &str) -> Result<String> {
        let body = strip_format_literal(template);
        let mut out = String::with_capacity(body.len());
        let mut rest = body;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_placeholder(&after[..close]) => {
                    let name = &after[..close];
                    let value = self
                        .get(name)
                        .ok_or_else(|| Error::unknown_variable(name, template))?;
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);

        Ok(out)
    }
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a format-literal `f'...'` or `f"..."` wrapper from a template.
///
/// Older naming templates were written as format-string literals; the
/// wrapper carries no meaning beyond marking the template.
pub fn strip_format_literal(template: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = template
            .strip_prefix('f')
            .and_then(|t| t.strip_prefix(quote))
            .and_then(|t| t.strip_suffix(quote))
        {
            return inner;
        }
    }
    template
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
