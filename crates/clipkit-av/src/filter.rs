//! Structured ffmpeg filter-graph construction.
//!
//! Handlers never splice user text into a filter string by hand: filter
//! values are assembled through [`Filter`] / [`FilterChain`] /
//! [`FilterGraph`] and all untrusted text passes through [`escape_text`]
//! exactly once, via [`Filter::text_param`].

use std::fmt;

/// Characters with syntactic meaning inside a filter expression.
///
/// Each is prefixed with a backslash before embedding; this exact set is the
/// contract, not every unusual character.
const ESCAPED_CHARS: [char; 4] = ['\'', '\\', ':', '%'];

/// Escape text for embedding in a filter expression such as `drawtext`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if ESCAPED_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

enum Param {
    Named(String, String),
    Positional(String),
}

/// A single filter stage with named and positional parameters.
pub struct Filter {
    name: String,
    params: Vec<Param>,
}

impl Filter {
    /// Create a filter stage by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a named parameter.
    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params
            .push(Param::Named(key.to_string(), value.to_string()));
        self
    }

    /// Append a positional parameter.
    pub fn value(mut self, value: impl ToString) -> Self {
        self.params.push(Param::Positional(value.to_string()));
        self
    }

    /// Append a named parameter holding untrusted text.
    ///
    /// The text is escaped and wrapped in single quotes.
    pub fn text_param(self, key: &str, raw: &str) -> Self {
        self.param(key, format!("'{}'", escape_text(raw)))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { ":" })?;
            match param {
                Param::Named(key, value) => write!(f, "{key}={value}")?,
                Param::Positional(value) => f.write_str(value)?,
            }
        }
        Ok(())
    }
}

/// An ordered sequence of filter stages, serialized comma-separated.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage, builder-style.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append a stage in place.
    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Whether the chain has no stages.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        Ok(())
    }
}

struct Branch {
    inputs: Vec<String>,
    chain: FilterChain,
    outputs: Vec<String>,
}

/// A complete filter graph: labeled branches, serialized semicolon-separated.
///
/// Used for `-filter_complex` / `-lavfi` values where streams are routed
/// through named pads, e.g. `[0:v]setpts=0.5*PTS[v];[0:a]atempo=2[a]`.
#[derive(Default)]
pub struct FilterGraph {
    branches: Vec<Branch>,
}

impl FilterGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a branch routing `inputs` through `chain` into `outputs`.
    ///
    /// Labels are written without brackets; either list may be empty.
    pub fn branch(mut self, inputs: &[&str], chain: FilterChain, outputs: &[&str]) -> Self {
        self.branches.push(Branch {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            chain,
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        });
        self
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, branch) in self.branches.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            for input in &branch.inputs {
                write!(f, "[{input}]")?;
            }
            write!(f, "{}", branch.chain)?;
            for output in &branch.outputs {
                write!(f, "[{output}]")?;
            }
        }
        Ok(())
    }
}

/// Build a `drawtext` stage: white text with a black border, horizontally
/// centered, at the given vertical position expression.
pub fn drawtext(text: &str, font_size: i64, border_width: i64, y_expr: &str) -> Filter {
    Filter::new("drawtext")
        .text_param("text", text)
        .param("fontsize", font_size)
        .param("fontcolor", "white")
        .param("borderw", border_width)
        .param("bordercolor", "black")
        .param("x", "(w-tw)/2")
        .param("y", y_expr)
}
