//! Narrative block decoding and encoding
//!
//! The narrative block is genuinely mixed content, so its decoders work
//! on the ordered child-node list rather than the field tables.
//! Whitespace-only runs between block items are dropped; character runs
//! inside flow containers are preserved verbatim.

use crate::error::{Error, Result};
use crate::narrative::{
    Caption, CellAlign, CellKind, CellVAlign, Col, ColGroup, Content, Footnote, Item, LinkHtml,
    List, ListItem, ListType, Paragraph, RenderMultiMedia, Revised, Table, TableCell, TableFrame,
    TableRow, TableRowGroup, TableRules, Text, NARRATIVE_MEDIA_TYPE,
};
use crate::xml::decode::FromXml;
use crate::xml::encode::ToXml;
use crate::xml::reader::{Element, Node};

fn attr_id(el: &Element) -> Option<String> {
    el.attribute("ID").map(|s| s.to_string())
}

fn attr_style_codes(el: &Element) -> Vec<String> {
    el.attribute("styleCode")
        .map(|s| s.split_whitespace().map(|c| c.to_string()).collect())
        .unwrap_or_default()
}

fn attr_span(el: &Element, name: &str, default: u32) -> Result<u32> {
    match el.attribute(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Decode(format!("'{}' is not a valid {}", raw, name))),
    }
}

/// Decode flow content from an element's children
///
/// `preserve_ws` keeps whitespace-only character runs; the root `<text>`
/// and structural containers drop them.
fn decode_flow(el: &Element, preserve_ws: bool) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    for node in &el.children {
        match node {
            Node::Text(text) => {
                if preserve_ws || !text.trim().is_empty() {
                    items.push(Item::Chars(text.clone()));
                }
            }
            Node::Element(child) => {
                if !matches!(child.namespace(), None | Some(crate::HL7_V3_NAMESPACE)) {
                    continue;
                }
                items.push(decode_item(child)?);
            }
        }
    }
    Ok(items)
}

fn decode_item(el: &Element) -> Result<Item> {
    let item = match el.local_name() {
        "content" => Item::Content(Content {
            id: attr_id(el),
            revised: el
                .attribute("revised")
                .map(|raw| {
                    Revised::from_str_opt(raw)
                        .ok_or_else(|| Error::Decode(format!("'{}' is not a revision mark", raw)))
                })
                .transpose()?,
            style_codes: attr_style_codes(el),
            items: decode_flow(el, true)?,
        }),
        "linkHtml" => Item::LinkHtml(LinkHtml {
            href: el.attribute("href").map(|s| s.to_string()),
            name: el.attribute("name").map(|s| s.to_string()),
            title: el.attribute("title").map(|s| s.to_string()),
            rel: el.attribute("rel").map(|s| s.to_string()),
            style_codes: attr_style_codes(el),
            items: decode_flow(el, true)?,
        }),
        "sub" => Item::Sub(el.text()),
        "sup" => Item::Sup(el.text()),
        "br" => {
            if !el.is_effectively_empty() {
                return Err(Error::Decode("Line breaks carry no content".to_string()));
            }
            Item::Br
        }
        "footnote" => Item::Footnote(Footnote {
            id: attr_id(el),
            style_codes: attr_style_codes(el),
            items: decode_flow(el, true)?,
        }),
        "footnoteRef" => Item::FootnoteRef {
            idref: el
                .attribute("IDREF")
                .ok_or_else(|| Error::Decode("footnoteRef requires an IDREF".to_string()))?
                .to_string(),
        },
        "renderMultiMedia" => Item::RenderMultiMedia(RenderMultiMedia {
            referenced_object: el
                .attribute("referencedObject")
                .ok_or_else(|| {
                    Error::Decode("renderMultiMedia requires a referencedObject".to_string())
                })?
                .to_string(),
            caption: decode_caption(el)?,
        }),
        "paragraph" => Item::Paragraph(Paragraph {
            id: attr_id(el),
            style_codes: attr_style_codes(el),
            caption: decode_caption(el)?,
            items: decode_flow_excluding_caption(el)?,
        }),
        "list" => Item::List(decode_list(el)?),
        "table" => Item::Table(decode_table(el)?),
        other => {
            return Err(Error::Decode(format!(
                "Unexpected element '{}' in narrative flow",
                other
            )))
        }
    };
    Ok(item)
}

fn decode_caption(el: &Element) -> Result<Option<Caption>> {
    el.first_child("caption")
        .map(|caption| {
            Ok(Caption {
                items: decode_flow(caption, true)?,
            })
        })
        .transpose()
}

/// Flow content of a container whose caption is modeled separately
fn decode_flow_excluding_caption(el: &Element) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    for node in &el.children {
        match node {
            Node::Text(text) => items.push(Item::Chars(text.clone())),
            Node::Element(child) => {
                if !matches!(child.namespace(), None | Some(crate::HL7_V3_NAMESPACE)) {
                    continue;
                }
                if child.local_name() == "caption" {
                    continue;
                }
                items.push(decode_item(child)?);
            }
        }
    }
    Ok(items)
}

fn decode_list(el: &Element) -> Result<List> {
    let list_type = match el.attribute("listType") {
        None => ListType::default(),
        Some(raw) => ListType::from_str_opt(raw)
            .ok_or_else(|| Error::Decode(format!("'{}' is not a list type", raw)))?,
    };

    let mut items = Vec::new();
    for child in el.child_elements() {
        match child.local_name() {
            "caption" => {}
            "item" => items.push(ListItem {
                id: attr_id(child),
                style_codes: attr_style_codes(child),
                caption: decode_caption(child)?,
                items: decode_flow_excluding_caption(child)?,
            }),
            other => {
                if matches!(child.namespace(), None | Some(crate::HL7_V3_NAMESPACE)) {
                    return Err(Error::Decode(format!(
                        "Unexpected element '{}' in list",
                        other
                    )));
                }
            }
        }
    }

    Ok(List {
        id: attr_id(el),
        style_codes: attr_style_codes(el),
        list_type,
        caption: decode_caption(el)?,
        items,
    })
}

fn decode_col(el: &Element) -> Result<Col> {
    Ok(Col {
        span: attr_span(el, "span", 1)?,
        width: el.attribute("width").map(|s| s.to_string()),
        style_codes: attr_style_codes(el),
    })
}

fn decode_cell(el: &Element, kind: CellKind) -> Result<TableCell> {
    Ok(TableCell {
        kind,
        id: attr_id(el),
        style_codes: attr_style_codes(el),
        rowspan: attr_span(el, "rowspan", 1)?,
        colspan: attr_span(el, "colspan", 1)?,
        align: el
            .attribute("align")
            .map(|raw| {
                CellAlign::from_str_opt(raw)
                    .ok_or_else(|| Error::Decode(format!("'{}' is not a cell alignment", raw)))
            })
            .transpose()?,
        valign: el
            .attribute("valign")
            .map(|raw| {
                CellVAlign::from_str_opt(raw)
                    .ok_or_else(|| Error::Decode(format!("'{}' is not a cell alignment", raw)))
            })
            .transpose()?,
        items: decode_flow(el, true)?,
    })
}

fn decode_row(el: &Element) -> Result<TableRow> {
    let mut cells = Vec::new();
    for child in el.child_elements() {
        match child.local_name() {
            "th" => cells.push(decode_cell(child, CellKind::Header)?),
            "td" => cells.push(decode_cell(child, CellKind::Data)?),
            other => {
                if matches!(child.namespace(), None | Some(crate::HL7_V3_NAMESPACE)) {
                    return Err(Error::Decode(format!(
                        "Unexpected element '{}' in table row",
                        other
                    )));
                }
            }
        }
    }
    Ok(TableRow {
        id: attr_id(el),
        style_codes: attr_style_codes(el),
        cells,
    })
}

fn decode_row_group(el: &Element) -> Result<TableRowGroup> {
    let mut rows = Vec::new();
    for child in el.children_named("tr") {
        rows.push(decode_row(child)?);
    }
    Ok(TableRowGroup {
        style_codes: attr_style_codes(el),
        rows,
    })
}

fn decode_table(el: &Element) -> Result<Table> {
    let mut col_groups = Vec::new();
    let mut cols = Vec::new();
    let mut head = None;
    let mut bodies = Vec::new();
    let mut foot = None;

    for child in el.child_elements() {
        match child.local_name() {
            "caption" => {}
            "colgroup" => {
                let mut group_cols = Vec::new();
                for col in child.children_named("col") {
                    group_cols.push(decode_col(col)?);
                }
                col_groups.push(ColGroup {
                    span: attr_span(child, "span", 1)?,
                    width: child.attribute("width").map(|s| s.to_string()),
                    style_codes: attr_style_codes(child),
                    cols: group_cols,
                });
            }
            "col" => cols.push(decode_col(child)?),
            "thead" => head = Some(decode_row_group(child)?),
            "tbody" => bodies.push(decode_row_group(child)?),
            "tfoot" => foot = Some(decode_row_group(child)?),
            other => {
                if matches!(child.namespace(), None | Some(crate::HL7_V3_NAMESPACE)) {
                    return Err(Error::Decode(format!(
                        "Unexpected element '{}' in table",
                        other
                    )));
                }
            }
        }
    }

    Ok(Table {
        id: attr_id(el),
        style_codes: attr_style_codes(el),
        summary: el.attribute("summary").map(|s| s.to_string()),
        width: el.attribute("width").map(|s| s.to_string()),
        border: el.attribute("border").map(|s| s.to_string()),
        frame: el
            .attribute("frame")
            .map(|raw| {
                TableFrame::from_str_opt(raw)
                    .ok_or_else(|| Error::Decode(format!("'{}' is not a table frame", raw)))
            })
            .transpose()?,
        rules: el
            .attribute("rules")
            .map(|raw| {
                TableRules::from_str_opt(raw)
                    .ok_or_else(|| Error::Decode(format!("'{}' is not a table rules value", raw)))
            })
            .transpose()?,
        cellpadding: el.attribute("cellpadding").map(|s| s.to_string()),
        cellspacing: el.attribute("cellspacing").map(|s| s.to_string()),
        caption: decode_caption(el)?,
        col_groups,
        cols,
        head,
        bodies,
        foot,
    })
}

impl FromXml for Text {
    fn from_xml(el: &Element) -> Result<Self> {
        if let Some(media_type) = el.attribute("mediaType") {
            if media_type != NARRATIVE_MEDIA_TYPE {
                return Err(Error::Decode(format!(
                    "Narrative text has media type '{}', expected '{}'",
                    media_type, NARRATIVE_MEDIA_TYPE
                )));
            }
        }
        Ok(Self {
            id: attr_id(el),
            language: el.attribute("language").map(|s| s.to_string()),
            style_codes: attr_style_codes(el),
            items: decode_flow(el, false)?,
        })
    }
}

fn set_common(el: &mut Element, id: &Option<String>, style_codes: &[String]) {
    if let Some(id) = id {
        el.set_attribute("ID", id);
    }
    if !style_codes.is_empty() {
        el.set_attribute("styleCode", style_codes.join(" "));
    }
}

fn encode_flow(el: &mut Element, items: &[Item]) -> Result<()> {
    for item in items {
        match item {
            Item::Chars(text) => el.add_text(text),
            other => el.add_child(encode_item(other)?),
        }
    }
    Ok(())
}

fn encode_item(item: &Item) -> Result<Element> {
    let el = match item {
        Item::Chars(_) => {
            return Err(Error::Encode(
                "Character runs are written by their container".to_string(),
            ))
        }
        Item::Content(content) => {
            let mut el = Element::hl7("content");
            set_common(&mut el, &content.id, &content.style_codes);
            if let Some(revised) = content.revised {
                el.set_attribute("revised", revised.as_str());
            }
            encode_flow(&mut el, &content.items)?;
            el
        }
        Item::LinkHtml(link) => {
            let mut el = Element::hl7("linkHtml");
            if let Some(ref href) = link.href {
                el.set_attribute("href", href);
            }
            if let Some(ref name) = link.name {
                el.set_attribute("name", name);
            }
            if let Some(ref title) = link.title {
                el.set_attribute("title", title);
            }
            if let Some(ref rel) = link.rel {
                el.set_attribute("rel", rel);
            }
            if !link.style_codes.is_empty() {
                el.set_attribute("styleCode", link.style_codes.join(" "));
            }
            encode_flow(&mut el, &link.items)?;
            el
        }
        Item::Sub(text) => {
            let mut el = Element::hl7("sub");
            el.add_text(text);
            el
        }
        Item::Sup(text) => {
            let mut el = Element::hl7("sup");
            el.add_text(text);
            el
        }
        Item::Br => Element::hl7("br"),
        Item::Footnote(footnote) => {
            let mut el = Element::hl7("footnote");
            set_common(&mut el, &footnote.id, &footnote.style_codes);
            encode_flow(&mut el, &footnote.items)?;
            el
        }
        Item::FootnoteRef { idref } => {
            let mut el = Element::hl7("footnoteRef");
            el.set_attribute("IDREF", idref);
            el
        }
        Item::RenderMultiMedia(media) => {
            let mut el = Element::hl7("renderMultiMedia");
            el.set_attribute("referencedObject", &media.referenced_object);
            if let Some(ref caption) = media.caption {
                el.add_child(encode_caption(caption)?);
            }
            el
        }
        Item::Paragraph(paragraph) => {
            let mut el = Element::hl7("paragraph");
            set_common(&mut el, &paragraph.id, &paragraph.style_codes);
            if let Some(ref caption) = paragraph.caption {
                el.add_child(encode_caption(caption)?);
            }
            encode_flow(&mut el, &paragraph.items)?;
            el
        }
        Item::List(list) => encode_list(list)?,
        Item::Table(table) => encode_table(table)?,
    };
    Ok(el)
}

fn encode_caption(caption: &Caption) -> Result<Element> {
    let mut el = Element::hl7("caption");
    encode_flow(&mut el, &caption.items)?;
    Ok(el)
}

fn encode_list(list: &List) -> Result<Element> {
    let mut el = Element::hl7("list");
    set_common(&mut el, &list.id, &list.style_codes);
    if list.list_type != ListType::Unordered {
        el.set_attribute("listType", list.list_type.as_str());
    }
    if let Some(ref caption) = list.caption {
        el.add_child(encode_caption(caption)?);
    }
    for item in &list.items {
        let mut item_el = Element::hl7("item");
        set_common(&mut item_el, &item.id, &item.style_codes);
        if let Some(ref caption) = item.caption {
            item_el.add_child(encode_caption(caption)?);
        }
        encode_flow(&mut item_el, &item.items)?;
        el.add_child(item_el);
    }
    Ok(el)
}

fn encode_col(col: &Col) -> Element {
    let mut el = Element::hl7("col");
    if col.span != 1 {
        el.set_attribute("span", col.span.to_string());
    }
    if let Some(ref width) = col.width {
        el.set_attribute("width", width);
    }
    if !col.style_codes.is_empty() {
        el.set_attribute("styleCode", col.style_codes.join(" "));
    }
    el
}

fn encode_row_group(name: &str, group: &TableRowGroup) -> Result<Element> {
    let mut el = Element::hl7(name);
    if !group.style_codes.is_empty() {
        el.set_attribute("styleCode", group.style_codes.join(" "));
    }
    for row in &group.rows {
        let mut row_el = Element::hl7("tr");
        set_common(&mut row_el, &row.id, &row.style_codes);
        for cell in &row.cells {
            let cell_name = match cell.kind {
                CellKind::Header => "th",
                CellKind::Data => "td",
            };
            let mut cell_el = Element::hl7(cell_name);
            set_common(&mut cell_el, &cell.id, &cell.style_codes);
            if cell.rowspan != 1 {
                cell_el.set_attribute("rowspan", cell.rowspan.to_string());
            }
            if cell.colspan != 1 {
                cell_el.set_attribute("colspan", cell.colspan.to_string());
            }
            if let Some(align) = cell.align {
                cell_el.set_attribute("align", align.as_str());
            }
            if let Some(valign) = cell.valign {
                cell_el.set_attribute("valign", valign.as_str());
            }
            encode_flow(&mut cell_el, &cell.items)?;
            row_el.add_child(cell_el);
        }
        el.add_child(row_el);
    }
    Ok(el)
}

fn encode_table(table: &Table) -> Result<Element> {
    let mut el = Element::hl7("table");
    set_common(&mut el, &table.id, &table.style_codes);
    if let Some(ref summary) = table.summary {
        el.set_attribute("summary", summary);
    }
    if let Some(ref width) = table.width {
        el.set_attribute("width", width);
    }
    if let Some(ref border) = table.border {
        el.set_attribute("border", border);
    }
    if let Some(frame) = table.frame {
        el.set_attribute("frame", frame.as_str());
    }
    if let Some(rules) = table.rules {
        el.set_attribute("rules", rules.as_str());
    }
    if let Some(ref cellpadding) = table.cellpadding {
        el.set_attribute("cellpadding", cellpadding);
    }
    if let Some(ref cellspacing) = table.cellspacing {
        el.set_attribute("cellspacing", cellspacing);
    }
    if let Some(ref caption) = table.caption {
        el.add_child(encode_caption(caption)?);
    }
    for group in &table.col_groups {
        let mut group_el = Element::hl7("colgroup");
        if group.span != 1 {
            group_el.set_attribute("span", group.span.to_string());
        }
        if let Some(ref width) = group.width {
            group_el.set_attribute("width", width);
        }
        if !group.style_codes.is_empty() {
            group_el.set_attribute("styleCode", group.style_codes.join(" "));
        }
        for col in &group.cols {
            group_el.add_child(encode_col(col));
        }
        el.add_child(group_el);
    }
    for col in &table.cols {
        el.add_child(encode_col(col));
    }
    if let Some(ref head) = table.head {
        el.add_child(encode_row_group("thead", head)?);
    }
    for body in &table.bodies {
        el.add_child(encode_row_group("tbody", body)?);
    }
    if let Some(ref foot) = table.foot {
        el.add_child(encode_row_group("tfoot", foot)?);
    }
    Ok(el)
}

impl ToXml for Text {
    fn to_xml(&self, name: &str) -> Result<Element> {
        let mut el = Element::hl7(name);
        set_common(&mut el, &self.id, &self.style_codes);
        if let Some(ref language) = self.language {
            el.set_attribute("language", language);
        }
        encode_flow(&mut el, &self.items)?;
        Ok(el)
    }
}
