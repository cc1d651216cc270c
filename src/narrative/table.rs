//! Narrative tables
//!
//! The HTML-like table model of the narrative block: colgroups, an
//! optional head and foot, one or more bodies of rows.

use super::{Caption, Item};

/// Which sides of a table render a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFrame {
    /// No sides
    Void,
    /// Top side
    Above,
    /// Bottom side
    Below,
    /// Top and bottom
    Hsides,
    /// Left side
    Lhs,
    /// Right side
    Rhs,
    /// Left and right
    Vsides,
    /// All four sides
    Box,
    /// All four sides
    Border,
}

impl TableFrame {
    /// The wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            TableFrame::Void => "void",
            TableFrame::Above => "above",
            TableFrame::Below => "below",
            TableFrame::Hsides => "hsides",
            TableFrame::Lhs => "lhs",
            TableFrame::Rhs => "rhs",
            TableFrame::Vsides => "vsides",
            TableFrame::Box => "box",
            TableFrame::Border => "border",
        }
    }

    /// Parse the wire value
    pub fn from_str_opt(s: &str) -> Option<Self> {
        let frame = match s {
            "void" => TableFrame::Void,
            "above" => TableFrame::Above,
            "below" => TableFrame::Below,
            "hsides" => TableFrame::Hsides,
            "lhs" => TableFrame::Lhs,
            "rhs" => TableFrame::Rhs,
            "vsides" => TableFrame::Vsides,
            "box" => TableFrame::Box,
            "border" => TableFrame::Border,
            _ => return None,
        };
        Some(frame)
    }
}

/// Which rules render between table cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRules {
    /// No rules
    None,
    /// Between row groups and column groups
    Groups,
    /// Between rows
    Rows,
    /// Between columns
    Cols,
    /// Between all cells
    All,
}

impl TableRules {
    /// The wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            TableRules::None => "none",
            TableRules::Groups => "groups",
            TableRules::Rows => "rows",
            TableRules::Cols => "cols",
            TableRules::All => "all",
        }
    }

    /// Parse the wire value
    pub fn from_str_opt(s: &str) -> Option<Self> {
        let rules = match s {
            "none" => TableRules::None,
            "groups" => TableRules::Groups,
            "rows" => TableRules::Rows,
            "cols" => TableRules::Cols,
            "all" => TableRules::All,
            _ => return None,
        };
        Some(rules)
    }
}

/// Horizontal cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    /// Left-aligned
    Left,
    /// Centered
    Center,
    /// Right-aligned
    Right,
    /// Justified
    Justify,
    /// Aligned on a character
    Char,
}

impl CellAlign {
    /// The wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            CellAlign::Left => "left",
            CellAlign::Center => "center",
            CellAlign::Right => "right",
            CellAlign::Justify => "justify",
            CellAlign::Char => "char",
        }
    }

    /// Parse the wire value
    pub fn from_str_opt(s: &str) -> Option<Self> {
        let align = match s {
            "left" => CellAlign::Left,
            "center" => CellAlign::Center,
            "right" => CellAlign::Right,
            "justify" => CellAlign::Justify,
            "char" => CellAlign::Char,
            _ => return None,
        };
        Some(align)
    }
}

/// Vertical cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVAlign {
    /// Top-aligned
    Top,
    /// Middle-aligned
    Middle,
    /// Bottom-aligned
    Bottom,
    /// Aligned on the text baseline
    Baseline,
}

impl CellVAlign {
    /// The wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            CellVAlign::Top => "top",
            CellVAlign::Middle => "middle",
            CellVAlign::Bottom => "bottom",
            CellVAlign::Baseline => "baseline",
        }
    }

    /// Parse the wire value
    pub fn from_str_opt(s: &str) -> Option<Self> {
        let valign = match s {
            "top" => CellVAlign::Top,
            "middle" => CellVAlign::Middle,
            "bottom" => CellVAlign::Bottom,
            "baseline" => CellVAlign::Baseline,
            _ => return None,
        };
        Some(valign)
    }
}

/// A column declaration (`<col>`)
#[derive(Debug, Clone, PartialEq)]
pub struct Col {
    /// How many columns the declaration spans, at least 1
    pub span: u32,
    /// Column width hint
    pub width: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
}

impl Default for Col {
    fn default() -> Self {
        Self {
            span: 1,
            width: None,
            style_codes: Vec::new(),
        }
    }
}

/// A column group (`<colgroup>`)
#[derive(Debug, Clone, PartialEq)]
pub struct ColGroup {
    /// How many columns the group spans when it has no cols, at least 1
    pub span: u32,
    /// Column width hint
    pub width: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Column declarations
    pub cols: Vec<Col>,
}

impl Default for ColGroup {
    fn default() -> Self {
        Self {
            span: 1,
            width: None,
            style_codes: Vec::new(),
            cols: Vec::new(),
        }
    }
}

/// Header or data cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// `<th>`
    Header,
    /// `<td>`
    Data,
}

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// Header or data
    pub kind: CellKind,
    /// XML ID
    pub id: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Rows spanned, at least 1
    pub rowspan: u32,
    /// Columns spanned, at least 1
    pub colspan: u32,
    /// Horizontal alignment
    pub align: Option<CellAlign>,
    /// Vertical alignment
    pub valign: Option<CellVAlign>,
    /// Cell content
    pub items: Vec<Item>,
}

impl TableCell {
    /// A data cell with plain text
    pub fn data(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Data,
            items: vec![Item::Chars(text.into())],
            ..Self::default()
        }
    }

    /// A header cell with plain text
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Header,
            items: vec![Item::Chars(text.into())],
            ..Self::default()
        }
    }
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            kind: CellKind::Data,
            id: None,
            style_codes: Vec::new(),
            rowspan: 1,
            colspan: 1,
            align: None,
            valign: None,
            items: Vec::new(),
        }
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    /// XML ID
    pub id: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// The row's cells
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// A row from its cells
    pub fn from_cells(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }
}

/// A head, body or foot row group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRowGroup {
    /// Style codes
    pub style_codes: Vec<String>,
    /// The group's rows
    pub rows: Vec<TableRow>,
}

impl TableRowGroup {
    /// A group from its rows
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

/// A narrative table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// XML ID
    pub id: Option<String>,
    /// Style codes
    pub style_codes: Vec<String>,
    /// Summary for non-visual rendering
    pub summary: Option<String>,
    /// Table width hint
    pub width: Option<String>,
    /// Border width hint
    pub border: Option<String>,
    /// Which sides render a frame
    pub frame: Option<TableFrame>,
    /// Which rules render between cells
    pub rules: Option<TableRules>,
    /// Cell padding hint
    pub cellpadding: Option<String>,
    /// Cell spacing hint
    pub cellspacing: Option<String>,
    /// Optional caption
    pub caption: Option<Caption>,
    /// Column groups
    pub col_groups: Vec<ColGroup>,
    /// Bare column declarations
    pub cols: Vec<Col>,
    /// Header row group
    pub head: Option<TableRowGroup>,
    /// Body row groups; at least one is required
    pub bodies: Vec<TableRowGroup>,
    /// Footer row group
    pub foot: Option<TableRowGroup>,
}

impl Table {
    /// A single-body table from header texts and data rows
    pub fn simple<S: Into<String>>(headers: Vec<S>, rows: Vec<Vec<S>>) -> Self {
        let head = TableRowGroup::from_rows(vec![TableRow::from_cells(
            headers.into_iter().map(|h| TableCell::header(h)).collect(),
        )]);
        let body = TableRowGroup::from_rows(
            rows.into_iter()
                .map(|r| TableRow::from_cells(r.into_iter().map(TableCell::data).collect()))
                .collect(),
        );
        Self {
            head: Some(head),
            bodies: vec![body],
            ..Self::default()
        }
    }

    /// Head, bodies and foot in rendering order
    pub fn row_groups(&self) -> impl Iterator<Item = &TableRowGroup> {
        self.head
            .iter()
            .chain(self.bodies.iter())
            .chain(self.foot.iter())
    }
}
