//! XML rendering of token streams and parse trees.
//!
//! Two tree variants exist: a generic form that shows every node as an
//! element, and the spec-conformant form used for output files, which
//! inlines transparent non-terminals and XML-escapes terminal values.
//! The parser's internal groupings stay explicit in the tree; transparency
//! is applied here, at serialization time only.

use crate::token::Token;
use crate::tree::ParseNode;

/// Estimated bytes per token in XML output (for buffer pre-allocation).
const BYTES_PER_TOKEN: usize = 40;

/// Generate the flat token listing (`*T.xml` format).
pub fn tokens_to_xml(tokens: &[Token]) -> String {
    let mut output = String::with_capacity(10 + tokens.len() * BYTES_PER_TOKEN + 11);

    output.push_str("<tokens>\n");

    for token in tokens {
        if *token == Token::Eof {
            continue;
        }
        write_terminal_line(&mut output, token.xml_tag(), &token.xml_value());
    }

    output.push_str("</tokens>\n");
    output
}

/// Render parse trees in the spec-conformant output format: transparent
/// non-terminals inlined, terminal values escaped, two-space indentation,
/// one element per line.
pub fn tree_to_spec_xml(nodes: &[ParseNode]) -> String {
    XmlWriter::new(true).write(nodes)
}

/// Render parse trees generically: every non-terminal becomes an element
/// and terminal values are left unescaped. Debugging format.
pub fn tree_to_xml(nodes: &[ParseNode]) -> String {
    XmlWriter::new(false).write(nodes)
}

fn write_terminal_line(output: &mut String, tag: &str, value: &str) {
    output.push('<');
    output.push_str(tag);
    output.push_str("> ");
    output.push_str(value);
    output.push_str(" </");
    output.push_str(tag);
    output.push_str(">\n");
}

/// XML writer over parse trees.
struct XmlWriter {
    output: String,
    indent: usize,
    to_spec: bool,
}

impl XmlWriter {
    fn new(to_spec: bool) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            to_spec,
        }
    }

    fn write(mut self, nodes: &[ParseNode]) -> String {
        let tokens: usize = nodes.iter().map(ParseNode::token_count).sum();
        self.output.reserve(tokens * BYTES_PER_TOKEN);

        for node in nodes {
            self.write_node(node);
        }
        self.output
    }

    fn write_node(&mut self, node: &ParseNode) {
        match node {
            ParseNode::Terminal(token) => {
                let value = if self.to_spec {
                    token.xml_value()
                } else {
                    token.to_string()
                };
                self.write_indent();
                write_terminal_line(&mut self.output, token.xml_tag(), &value);
            }
            ParseNode::NonTerminal { tag, children } => {
                if self.to_spec && !tag.is_emitted() {
                    // Transparent grouping: children appear inline in the
                    // parent's body, no wrapping element.
                    for child in children {
                        self.write_node(child);
                    }
                } else {
                    self.open_tag(tag.as_str());
                    for child in children {
                        self.write_node(child);
                    }
                    self.close_tag(tag.as_str());
                }
            }
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn open_tag(&mut self, tag: &str) {
        self.write_indent();
        self.output.push('<');
        self.output.push_str(tag);
        self.output.push_str(">\n");
        self.indent += 1;
    }

    fn close_tag(&mut self, tag: &str) {
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push_str(">\n");
    }
}
