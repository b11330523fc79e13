//! 阅读视图辅助函数

use scraper::{Html, Node};

/// 块级元素的边界视为词的边界
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "ol", "p", "pre", "section", "td", "th",
    "tr", "ul",
];

/// 统计富文本正文的字数
///
/// 按 HTML 片段解析（实体由解析器解码），取全部文本节点后按空白切分
pub fn word_count(html: &str) -> usize {
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().count()
}
