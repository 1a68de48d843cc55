//! Structured line assembly.
//!
//! Renderers push [`Line`]s; joining happens once at the end, and any
//! length cap is applied to the joined string afterwards.

/// One output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    /// Rendered as `• {label}: {value}`.
    Field { label: &'static str, value: String },
    Blank,
}

impl Line {
    fn write_to(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Field { label, value } => {
                out.push_str("• ");
                out.push_str(label);
                out.push_str(": ");
                out.push_str(value);
            }
            Self::Blank => {}
        }
    }
}

#[derive(Debug, Default)]
pub struct ReportBuilder {
    lines: Vec<Line>,
}

impl ReportBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Text(text.into()));
        self
    }

    /// Push a field; empty values are dropped.
    pub fn field(&mut self, label: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.lines.push(Line::Field { label, value });
        }
        self
    }

    pub fn field_opt(&mut self, label: &'static str, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(value) = value {
            self.field(label, value);
        }
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(Line::Blank);
        self
    }

    #[must_use]
    pub fn finish(self) -> Vec<Line> {
        self.lines
    }
}

/// Join lines with `\n`. No trailing newline.
#[must_use]
pub fn join(lines: &[Line]) -> String {
    let mut out = String::new();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        line.write_to(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn joins_lines_without_trailing_newline() {
        let mut builder = ReportBuilder::new();
        builder
            .text("heading")
            .blank()
            .field("Meanings", "water")
            .field("Readings", "")
            .field_opt("Example", None::<String>)
            .field_opt("Note", Some("kept"));

        assert_eq!(
            join(&builder.finish()),
            "heading\n\n• Meanings: water\n• Note: kept"
        );
    }

    #[test]
    fn empty_builder_joins_to_empty_string() {
        assert_eq!(join(&ReportBuilder::new().finish()), "");
    }
}
