use pagecraft_model::{VNode, VirtualDomDocument};
use serde::{Deserialize, Serialize};

/// Options for HTML emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Emit rendered nodes as an HTML fragment
pub fn to_html(nodes: &[VNode], options: &CompileOptions) -> String {
    let mut ctx = Context::new(options);
    for node in nodes {
        compile_node(node, &mut ctx);
    }
    ctx.get_output()
}

/// Emit a complete HTML page: document styles in the head, nodes in the body
pub fn compile_page(document: &VirtualDomDocument, title: &str, options: &CompileOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_html(title)));

    let css = document.to_css();
    if !css.is_empty() {
        ctx.add_line("<style>");
        ctx.indent();
        for line in css.lines() {
            ctx.add_line(&escape_style_close(line));
        }
        ctx.dedent();
        ctx.add_line("</style>");
    }

    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    for node in &document.nodes {
        compile_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

/// Break up `</style` in any letter case so author CSS cannot close the element
fn escape_style_close(line: &str) -> String {
    const CLOSE: &str = "</style";
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(at) = rest.find("</") {
        let candidate = &rest[at..];
        let matches = candidate
            .get(..CLOSE.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(CLOSE));
        out.push_str(&rest[..at]);
        if matches {
            out.push_str("<\\/");
        } else {
            out.push_str("</");
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

fn compile_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
            key: _,
        } => compile_tag(tag, attributes.iter(), styles.iter(), children, ctx),

        VNode::Text { content } => {
            if !content.is_empty() {
                ctx.add_line(&escape_html(content));
            }
        }

        VNode::Raw { html } => {
            if !html.is_empty() {
                ctx.add_line(html);
            }
        }

        VNode::Comment { content } => {
            ctx.add_line(&format!("<!-- {} -->", content.replace("--", "- -")));
        }
    }
}

fn compile_tag<'n>(
    name: &str,
    attributes: impl Iterator<Item = (&'n String, &'n String)>,
    styles: impl Iterator<Item = (&'n String, &'n String)>,
    children: &[VNode],
    ctx: &mut Context,
) {
    let mut open = format!("<{}", name);

    for (attr_name, value) in attributes {
        open.push(' ');
        open.push_str(attr_name);
        open.push_str("=\"");
        open.push_str(&escape_html(value));
        open.push('"');
    }

    let style: Vec<String> = styles.map(|(k, v)| format!("{}: {};", k, v)).collect();
    if !style.is_empty() {
        open.push_str(" style=\"");
        open.push_str(&escape_html(&style.join(" ")));
        open.push('"');
    }

    if children.is_empty() && is_self_closing(name) {
        open.push_str(" />");
        ctx.add_line(&open);
        return;
    }
    open.push('>');

    // text-only elements stay on one line
    if !has_element_children(children) {
        for child in children {
            match child {
                VNode::Text { content } => open.push_str(&escape_html(content)),
                VNode::Raw { html } => open.push_str(html),
                _ => {}
            }
        }
        open.push_str(&format!("</{}>", name));
        ctx.add_line(&open);
        return;
    }

    ctx.add_line(&open);
    ctx.indent();
    for child in children {
        compile_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", name));
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn has_element_children(children: &[VNode]) -> bool {
    children
        .iter()
        .any(|child| matches!(child, VNode::Element { .. } | VNode::Comment { .. }))
}
