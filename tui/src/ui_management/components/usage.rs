use ratatui::{
    style::Stylize,
    text::{Line, Span, Text},
};

/// One key binding hint, e.g. `(↑) or (↓) to move`
#[derive(Debug, Clone)]
pub struct UsageInfoLine {
    pub keys: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UsageInfo {
    pub description: Option<String>,
    pub lines: Vec<UsageInfoLine>,
}

impl UsageInfoLine {
    pub fn new(keys: &[&str], description: &str) -> Self {
        UsageInfoLine {
            keys: keys.iter().map(|key| String::from(*key)).collect(),
            description: String::from(description),
        }
    }
}

pub trait HasUsageInfo {
    fn usage_info(&self) -> UsageInfo;
}

fn key_to_span<'a>(key: &str) -> Span<'a> {
    Span::from(format!("({key})")).bold()
}

fn bindings_line<'a>(line: &UsageInfoLine) -> Line<'a> {
    let last = line.keys.len().saturating_sub(1);
    let mut spans: Vec<Span> = Vec::with_capacity(line.keys.len() * 2 + 1);

    for (idx, key) in line.keys.iter().enumerate() {
        if idx > 0 {
            spans.push(if idx == last { " or ".into() } else { ", ".into() });
        }
        spans.push(key_to_span(key));
    }

    spans.push(Span::from(format!(" {}", line.description)));

    Line::from(spans)
}

pub fn widget_usage_to_text<'a>(usage: UsageInfo) -> Text<'a> {
    let mut lines: Vec<Line> = Vec::with_capacity(usage.lines.len() + 1);
    if let Some(description) = usage.description {
        lines.push(Line::from(description));
    }

    lines.extend(usage.lines.iter().map(bindings_line));

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_joins_keys_with_or() {
        let text = widget_usage_to_text(UsageInfo {
            description: None,
            lines: vec![
                UsageInfoLine::new(&["q"], "to exit"),
                UsageInfoLine::new(&["↑", "↓"], "to move"),
                UsageInfoLine::new(&["1", "2", "3"], "to simulate"),
            ],
        });

        let rendered: Vec<String> = text.lines.iter().map(plain).collect();
        assert_eq!(
            rendered,
            vec![
                "(q) to exit",
                "(↑) or (↓) to move",
                "(1), (2) or (3) to simulate",
            ]
        );
    }
}
