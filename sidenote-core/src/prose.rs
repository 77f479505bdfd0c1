//! Line-oriented loader that turns a markdown-ish document into a [`Node`]
//! tree. Covers only what essays use: frontmatter, fenced code, `#`
//! headings, paragraphs and backtick code spans.

use crate::model::Node;

const FENCE: &str = "```";

/// Parse `source` into a root node
pub fn parse(source: &str) -> Node {
    let lines: Vec<&str> = source.lines().collect();
    let mut children = Vec::new();
    let mut i = 0;

    if let Some((frontmatter, next)) = frontmatter(&lines) {
        children.push(Node::code(frontmatter, Some("frontmatter".to_string())));
        i = next;
    }

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim_start();

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if let Some(info) = trimmed.strip_prefix(FENCE) {
            let lang = info.trim();
            let lang = (!lang.is_empty()).then(|| lang.to_string());
            let mut body = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim_start().starts_with(FENCE) {
                body.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence; an unclosed fence runs to the end.
            i += 1;
            children.push(Node::code(body.join("\n"), lang));
            continue;
        }

        if let Some((level, text)) = heading(line) {
            children.push(Node::element(format!("h{}", level), inline(text)));
            i += 1;
            continue;
        }

        let mut paragraph = Vec::new();
        while i < lines.len() {
            let next = lines[i];
            if next.trim().is_empty()
                || next.trim_start().starts_with(FENCE)
                || heading(next).is_some()
            {
                break;
            }
            paragraph.push(next);
            i += 1;
        }
        children.push(Node::element("paragraph", inline(&paragraph.join("\n"))));
    }

    Node::root(children)
}

fn frontmatter(lines: &[&str]) -> Option<(String, usize)> {
    let first = lines.first()?.trim_start_matches('\u{feff}').trim_end();
    if first != "---" {
        return None;
    }
    let close = lines
        .iter()
        .skip(1)
        .position(|line| line.trim_end() == "---")?
        + 1;
    Some((lines[1..close].join("\n"), close + 1))
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix(' ').map(|text| (level, text.trim()))
}

/// Split a paragraph into text and inline code. An unmatched backtick is
/// ordinary text.
fn inline(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('`') {
        let after = &rest[open + 1..];
        match after.find('`') {
            Some(close) => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    nodes.push(Node::text(std::mem::take(&mut literal)));
                }
                nodes.push(Node::inline_code(&after[..close]));
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        nodes.push(Node::text(literal));
    }
    nodes
}
