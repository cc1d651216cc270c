//! CDA narrative block
//!
//! The human-readable markup of a section `<text>` element. Flow
//! content is one ordered list of a sum type (character runs, inline
//! spans and block items side by side), so mixed content survives
//! round trips exactly.

pub mod table;

pub use table::{
    CellAlign, CellKind, CellVAlign, Col, ColGroup, Table, TableCell, TableFrame, TableRow,
    TableRowGroup, TableRules,
};

/// Media type fixed for narrative text on the wire
pub const NARRATIVE_MEDIA_TYPE: &str = "text/x-hl7-text+xml";

/// A narrative block: the content of a section `<text>` element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    /// XML ID for references from entries
    pub id: Option<String>,
    /// Language of the block
    pub language: Option<String>,
    /// Style codes (space-separated set on the wire)
    pub style_codes: Vec<String>,
    /// The block's content
    pub items: Vec<Item>,
}

impl Text {
    /// A block holding a single paragraph of plain text
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            items: vec![Item::Paragraph(Paragraph {
                items: vec![Item::Chars(text.into())],
                ..Paragraph::default()
            })],
            ..Self::default()
        }
    }

    /// Concatenated character content
    ///
    /// Block boundaries (paragraphs, list items, table cells, line
    /// breaks) contribute a single separating space.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_plain_text(&self.items, &mut out);
        out.trim().to_string()
    }

    /// All multimedia references in document order
    pub fn referenced_objects(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        collect_references(&self.items, &mut refs);
        refs
    }
}

/// One piece of narrative flow content
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A character run
    Chars(String),
    /// An inline span with optional revision marking
    Content(Content),
    /// A hyperlink
    LinkHtml(LinkHtml),
    /// Subscript text
    Sub(String),
    /// Superscript text
    Sup(String),
    /// A line break
    Br,
    /// A footnote
    Footnote(Footnote),
    /// A reference to a footnote elsewhere in the block
    FootnoteRef {
        /// ID of the referenced footnote
        idref: String,
    },
    /// A reference to multimedia carried by an entry
    RenderMultiMedia(RenderMultiMedia),
    /// A paragraph
    Paragraph(Paragraph),
    /// A list
    List(List),
    /// A table
    Table(Table),
}

impl Item {
    /// True for block-level items, false for inline ones
    pub fn is_block(&self) -> bool {
        matches!(self, Item::Paragraph(_) | Item::List(_) | Item::Table(_))
    }
}

/// An inline span (`<content>`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Content {
    /// XML ID for references from entries
    pub id: Option<String>,
    /// Revision marking
    pub revised: Option<Revised>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Nested flow content
    pub items: Vec<Item>,
}

/// Revision marking on a content span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revised {
    /// Inserted content
    Insert,
    /// Deleted content
    Delete,
}

impl Revised {
    /// The wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Revised::Insert => "insert",
            Revised::Delete => "delete",
        }
    }

    /// Parse the wire value
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "insert" => Some(Revised::Insert),
            "delete" => Some(Revised::Delete),
            _ => None,
        }
    }
}

/// A hyperlink (`<linkHtml>`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkHtml {
    /// Link target
    pub href: Option<String>,
    /// Anchor name
    pub name: Option<String>,
    /// Advisory title
    pub title: Option<String>,
    /// Link relationship
    pub rel: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Link text
    pub items: Vec<Item>,
}

/// A footnote
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Footnote {
    /// XML ID footnote references point at
    pub id: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Footnote content
    pub items: Vec<Item>,
}

/// A reference to multimedia (`<renderMultiMedia>`)
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMultiMedia {
    /// ID of the ObservationMedia or RegionOfInterest entry to render
    pub referenced_object: String,
    /// Optional caption
    pub caption: Option<Caption>,
}

/// A paragraph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    /// XML ID
    pub id: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Optional caption
    pub caption: Option<Caption>,
    /// Paragraph content
    pub items: Vec<Item>,
}

/// List style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListType {
    /// Ordered list
    Ordered,
    /// Unordered list, the default
    #[default]
    Unordered,
}

impl ListType {
    /// The wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Ordered => "ordered",
            ListType::Unordered => "unordered",
        }
    }

    /// Parse the wire value
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "ordered" => Some(ListType::Ordered),
            "unordered" => Some(ListType::Unordered),
            _ => None,
        }
    }
}

/// A list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    /// XML ID
    pub id: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// List style
    pub list_type: ListType,
    /// Optional caption
    pub caption: Option<Caption>,
    /// The items; at least one is required
    pub items: Vec<ListItem>,
}

/// One list item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    /// XML ID
    pub id: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Optional caption
    pub caption: Option<Caption>,
    /// Item content
    pub items: Vec<Item>,
}

/// A caption
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Caption {
    /// Caption content (inline items only)
    pub items: Vec<Item>,
}

fn collect_plain_text(items: &[Item], out: &mut String) {
    fn boundary(out: &mut String) {
        if !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
    }

    for item in items {
        match item {
            Item::Chars(s) | Item::Sub(s) | Item::Sup(s) => out.push_str(s),
            Item::Content(c) => collect_plain_text(&c.items, out),
            Item::LinkHtml(l) => collect_plain_text(&l.items, out),
            Item::Footnote(f) => collect_plain_text(&f.items, out),
            Item::Br => boundary(out),
            Item::FootnoteRef { .. } | Item::RenderMultiMedia(_) => {}
            Item::Paragraph(p) => {
                boundary(out);
                collect_plain_text(&p.items, out);
                boundary(out);
            }
            Item::List(l) => {
                for li in &l.items {
                    boundary(out);
                    collect_plain_text(&li.items, out);
                    boundary(out);
                }
            }
            Item::Table(t) => {
                for group in t.row_groups() {
                    for row in &group.rows {
                        for cell in &row.cells {
                            boundary(out);
                            collect_plain_text(&cell.items, out);
                            boundary(out);
                        }
                    }
                }
            }
        }
    }
}

fn collect_references<'a>(items: &'a [Item], refs: &mut Vec<&'a str>) {
    for item in items {
        match item {
            Item::RenderMultiMedia(r) => refs.push(r.referenced_object.as_str()),
            Item::Content(c) => collect_references(&c.items, refs),
            Item::LinkHtml(l) => collect_references(&l.items, refs),
            Item::Footnote(f) => collect_references(&f.items, refs),
            Item::Paragraph(p) => collect_references(&p.items, refs),
            Item::List(l) => {
                for li in &l.items {
                    collect_references(&li.items, refs);
                }
            }
            Item::Table(t) => {
                for group in t.row_groups() {
                    for row in &group.rows {
                        for cell in &row.cells {
                            collect_references(&cell.items, refs);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_boundaries() {
        let text = Text {
            items: vec![
                Item::Paragraph(Paragraph {
                    items: vec![
                        Item::Chars("Theodur ".to_string()),
                        Item::Content(Content {
                            items: vec![Item::Chars("200mg".to_string())],
                            ..Content::default()
                        }),
                    ],
                    ..Paragraph::default()
                }),
                Item::Paragraph(Paragraph {
                    items: vec![Item::Chars("twice daily".to_string())],
                    ..Paragraph::default()
                }),
            ],
            ..Text::default()
        };
        assert_eq!(text.plain_text(), "Theodur 200mg twice daily");
    }

    #[test]
    fn test_br_contributes_space() {
        let text = Text {
            items: vec![
                Item::Chars("line one".to_string()),
                Item::Br,
                Item::Br,
                Item::Chars("line two".to_string()),
            ],
            ..Text::default()
        };
        assert_eq!(text.plain_text(), "line one line two");
    }

    #[test]
    fn test_referenced_objects_in_order() {
        let text = Text {
            items: vec![
                Item::Paragraph(Paragraph {
                    items: vec![Item::RenderMultiMedia(RenderMultiMedia {
                        referenced_object: "MM1".to_string(),
                        caption: None,
                    })],
                    ..Paragraph::default()
                }),
                Item::RenderMultiMedia(RenderMultiMedia {
                    referenced_object: "MM2".to_string(),
                    caption: None,
                }),
            ],
            ..Text::default()
        };
        assert_eq!(text.referenced_objects(), vec!["MM1", "MM2"]);
    }

    #[test]
    fn test_is_block() {
        assert!(Item::Paragraph(Paragraph::default()).is_block());
        assert!(Item::List(List::default()).is_block());
        assert!(!Item::Br.is_block());
        assert!(!Item::Chars(String::new()).is_block());
    }
}
