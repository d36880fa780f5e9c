//! Code-block tree and Go formatter
//!
//! The renderer builds a tree of [`CodeBlock`]s and [`GoFormatter`] turns it
//! into gofmt-compatible text: tab indentation, one statement per line, no
//! trailing whitespace.

/// One node of generated source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeBlock {
    /// A single line at the current indentation
    Line(String),
    /// An empty line
    Blank,
    /// `//` comment; multi-line text yields one comment line per line
    Comment(String),
    /// `header`, the body indented one level, then `footer`
    Block {
        header: String,
        body: Vec<CodeBlock>,
        footer: String,
    },
}

impl CodeBlock {
    pub fn line(text: impl Into<String>) -> Self {
        CodeBlock::Line(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        CodeBlock::Comment(text.into())
    }

    /// Brace-delimited block: `header {` ... `}`; an empty header opens a
    /// bare scope
    pub fn braced(header: impl Into<String>, body: Vec<CodeBlock>) -> Self {
        let header = header.into();
        CodeBlock::Block {
            header: if header.is_empty() {
                "{".to_string()
            } else {
                format!("{} {{", header)
            },
            body,
            footer: "}".to_string(),
        }
    }

    /// Parenthesized group such as `import (` ... `)`
    pub fn grouped(keyword: &str, body: Vec<CodeBlock>) -> Self {
        CodeBlock::Block {
            header: format!("{} (", keyword),
            body,
            footer: ")".to_string(),
        }
    }
}

/// Renders code-block trees as Go source
#[derive(Debug, Default)]
pub struct GoFormatter {
    out: String,
}

impl GoFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format a sequence of blocks into a complete file body
    pub fn format(blocks: &[CodeBlock]) -> String {
        let mut formatter = Self::new();
        for block in blocks {
            formatter.write(block, 0);
        }
        formatter.finish()
    }

    pub fn write(&mut self, block: &CodeBlock, depth: usize) {
        match block {
            CodeBlock::Line(text) => self.push_line(depth, text),
            CodeBlock::Blank => self.out.push('\n'),
            CodeBlock::Comment(text) => {
                for line in text.lines() {
                    if line.trim().is_empty() {
                        self.push_line(depth, "//");
                    } else {
                        self.push_line(depth, &format!("// {}", line.trim_end()));
                    }
                }
            }
            CodeBlock::Block {
                header,
                body,
                footer,
            } => {
                self.push_line(depth, header);
                for child in body {
                    self.write(child, depth + 1);
                }
                self.push_line(depth, footer);
            }
        }
    }

    /// The formatted text, ending in exactly one newline
    pub fn finish(mut self) -> String {
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.out
    }

    fn push_line(&mut self, depth: usize, text: &str) {
        let text = text.trim_end();
        if !text.is_empty() {
            for _ in 0..depth {
                self.out.push('\t');
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks_use_tabs() {
        let blocks = vec![
            CodeBlock::comment("Greeter says hello.\n\nTwice."),
            CodeBlock::braced(
                "func Greet()",
                vec![CodeBlock::braced(
                    "for i := 0; i < 2; i++",
                    vec![CodeBlock::line("println(\"hello\")")],
                )],
            ),
            CodeBlock::Blank,
        ];

        assert_eq!(
            GoFormatter::format(&blocks),
            "// Greeter says hello.\n//\n// Twice.\nfunc Greet() {\n\tfor i := 0; i < 2; i++ {\n\t\tprintln(\"hello\")\n\t}\n}\n"
        );
    }

    #[test]
    fn test_grouped_and_blank_lines() {
        let blocks = vec![CodeBlock::grouped(
            "import",
            vec![
                CodeBlock::line("\"context\""),
                CodeBlock::Blank,
                CodeBlock::line("\"github.com/cloudwego/hertz/pkg/app\""),
            ],
        )];

        assert_eq!(
            GoFormatter::format(&blocks),
            "import (\n\t\"context\"\n\n\t\"github.com/cloudwego/hertz/pkg/app\"\n)\n"
        );
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let blocks = vec![CodeBlock::line("x := 1   "), CodeBlock::line("")];
        assert_eq!(GoFormatter::format(&blocks), "x := 1\n");
    }
}
