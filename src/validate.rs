//! Validation of typed values
//!
//! A deep, error-accumulating walk over datatypes and narrative
//! blocks. Lexical facets come from the binding metadata tables; the
//! walk never stops at the first failure, so one pass reports every
//! problem with its path.

use crate::datatypes::{
    Ad, AddressPart, Bl, Cd, Ce, Cr, Cs, Cv, Ed, EivlTs, En, Ii, Int, IvlPq, IvlPqBounds, IvlTs,
    IvlTsBounds, Mo, On, Pn, Pq, PqR, Qty, Real, Rto, Sc, St, SxcmTs, Tel, Tn, Ts,
};
use crate::error::ValidationError;
use crate::meta::ClassMeta;
use crate::narrative::{Caption, Item, List, Table, Text};
use crate::namespaces::is_valid_ncname;
use crate::vocab::{BinaryDataEncoding, TimingEvent};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Location inside a value tree, reported with every error
#[derive(Debug, Clone, Default)]
pub struct Path(Vec<String>);

impl Path {
    /// A path rooted at the given name
    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// The path of a child field
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// The path of an indexed child field
    pub fn indexed(&self, name: &str, index: usize) -> Self {
        self.child(format!("{}[{}]", name, index))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str(".")
        } else {
            f.write_str(&self.0.join("/"))
        }
    }
}

/// Deep validation
pub trait Validate {
    /// Check the value, appending every problem found
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>);

    /// Validate the value, collecting all problems
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        self.check(&Path::default(), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn push(errors: &mut Vec<ValidationError>, path: &Path, err: ValidationError) {
    errors.push(err.with_path(path.to_string()));
}

/// Apply the facets the metadata attaches to an attribute field
fn check_attr_facets(
    meta: &ClassMeta,
    field: &str,
    value: Option<&str>,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    let Some(value) = value else { return };
    let Some(field_meta) = meta.field(field) else { return };
    let Some(ref facets) = field_meta.facets else { return };

    if let Err(err) = facets.check(value) {
        let inner = match err {
            crate::error::Error::Validation(inner) => inner,
            other => ValidationError::new(other.to_string()),
        };
        push(errors, path, inner.with_field(field));
    }
}

fn check_null_exclusive(
    is_null: bool,
    has_content: bool,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    if is_null && has_content {
        push(
            errors,
            path,
            ValidationError::new("Null value carries content")
                .with_reason("a nullFlavor excludes all other fields"),
        );
    }
}

impl Validate for Bl {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.value.is_some(), path, errors);
    }
}

impl Validate for Ii {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.root.is_some() || self.extension.is_some(),
            path,
            errors,
        );
        check_attr_facets(Ii::meta(), "root", self.root.as_deref(), path, errors);
        if self.extension.is_some() && self.root.is_none() {
            push(
                errors,
                path,
                ValidationError::new("Identifier extension without a root").with_field("extension"),
            );
        }
    }
}

impl Validate for Cs {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.code.is_some(), path, errors);
        check_attr_facets(Cs::meta(), "code", self.code.as_deref(), path, errors);
    }
}

fn check_coded(
    meta: &ClassMeta,
    code: Option<&str>,
    code_system: Option<&str>,
    display_name: Option<&str>,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    check_attr_facets(meta, "code", code, path, errors);
    check_attr_facets(meta, "codeSystem", code_system, path, errors);
    if display_name.is_some() && code.is_none() {
        push(
            errors,
            path,
            ValidationError::new("Display name without a code").with_field("displayName"),
        );
    }
}

impl Validate for Cd {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.code.is_some() || self.code_system.is_some() || !self.translations.is_empty(),
            path,
            errors,
        );
        check_coded(
            Cd::meta(),
            self.code.as_deref(),
            self.code_system.as_deref(),
            self.display_name.as_deref(),
            path,
            errors,
        );
        if let Some(ref text) = self.original_text {
            text.check(&path.child("originalText"), errors);
        }
        for (i, qualifier) in self.qualifiers.iter().enumerate() {
            qualifier.check(&path.indexed("qualifier", i), errors);
        }
        for (i, translation) in self.translations.iter().enumerate() {
            translation.check(&path.indexed("translation", i), errors);
        }
    }
}

impl Validate for Ce {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.code.is_some() || self.code_system.is_some() || !self.translations.is_empty(),
            path,
            errors,
        );
        check_coded(
            Ce::meta(),
            self.code.as_deref(),
            self.code_system.as_deref(),
            self.display_name.as_deref(),
            path,
            errors,
        );
        if let Some(ref text) = self.original_text {
            text.check(&path.child("originalText"), errors);
        }
        for (i, translation) in self.translations.iter().enumerate() {
            translation.check(&path.indexed("translation", i), errors);
        }
    }
}

impl Validate for Cv {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.code.is_some() || self.code_system.is_some(),
            path,
            errors,
        );
        check_coded(
            Cv::meta(),
            self.code.as_deref(),
            self.code_system.as_deref(),
            self.display_name.as_deref(),
            path,
            errors,
        );
        if let Some(ref text) = self.original_text {
            text.check(&path.child("originalText"), errors);
        }
    }
}

impl Validate for Cr {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        if let Some(ref name) = self.name {
            name.check(&path.child("name"), errors);
        }
        if let Some(ref value) = self.value {
            value.check(&path.child("value"), errors);
        }
    }
}

impl Validate for St {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.value.is_some(), path, errors);
    }
}

impl Validate for Sc {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.value.is_some() || self.code.is_some(),
            path,
            errors,
        );
        check_attr_facets(Sc::meta(), "code", self.code.as_deref(), path, errors);
        check_attr_facets(
            Sc::meta(),
            "codeSystem",
            self.code_system.as_deref(),
            path,
            errors,
        );
        if self.code.is_some() && self.code_system.is_none() {
            push(
                errors,
                path,
                ValidationError::new("Code without a code system").with_field("code"),
            );
        }
    }
}

impl Validate for Ed {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.text.is_some() || self.reference.is_some(),
            path,
            errors,
        );
        if self.representation == BinaryDataEncoding::B64 && self.decoded_bytes().is_err() {
            push(
                errors,
                path,
                ValidationError::new("Base64 content does not decode").with_field("representation"),
            );
        }
        if self.integrity_check.is_some() && self.integrity_check_algorithm.is_none() {
            push(
                errors,
                path,
                ValidationError::new("Integrity check without an algorithm")
                    .with_field("integrityCheckAlgorithm"),
            );
        }
        if let Some(ref reference) = self.reference {
            reference.check(&path.child("reference"), errors);
        }
        if let Some(ref thumbnail) = self.thumbnail {
            thumbnail.check(&path.child("thumbnail"), errors);
        }
    }
}

impl Validate for Tel {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.value.is_some() || !self.use_codes.is_empty(),
            path,
            errors,
        );
        if self.null_flavor.is_none() && self.value.is_none() {
            push(
                errors,
                path,
                ValidationError::new("Telecom address carries neither value nor null flavor")
                    .with_field("value"),
            );
        }
        for (i, period) in self.useable_period.iter().enumerate() {
            period.check(&path.indexed("useablePeriod", i), errors);
        }
    }
}

impl Validate for Ad {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), !self.parts.is_empty(), path, errors);
        for part in &self.parts {
            if let AddressPart::Part { kind, .. } = part {
                if AddressPart::element_name(*kind).is_none() {
                    push(
                        errors,
                        path,
                        ValidationError::new(format!(
                            "Address part type {} has no dedicated element",
                            kind
                        )),
                    );
                }
            }
        }
        for (i, period) in self.useable_period.iter().enumerate() {
            period.check(&path.indexed("useablePeriod", i), errors);
        }
    }
}

impl Validate for En {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), !self.parts.is_empty(), path, errors);
        if let Some(ref valid_time) = self.valid_time {
            valid_time.check(&path.child("validTime"), errors);
        }
    }
}

impl Validate for Pn {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        self.0.check(path, errors);
    }
}

impl Validate for On {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        self.as_en().check(path, errors);
    }
}

impl Validate for Tn {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.value.is_some(), path, errors);
    }
}

impl Validate for Int {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.value.is_some(), path, errors);
    }
}

impl Validate for Real {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.value.is_some(), path, errors);
        if let Some(value) = self.value {
            if !value.is_finite() {
                push(
                    errors,
                    path,
                    ValidationError::new("Real value is not finite").with_field("value"),
                );
            }
        }
    }
}

impl Validate for Pq {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.value.is_some(), path, errors);
        check_attr_facets(Pq::meta(), "unit", Some(&self.unit), path, errors);
        for (i, translation) in self.translations.iter().enumerate() {
            translation.check(&path.indexed("translation", i), errors);
        }
    }
}

impl Validate for PqR {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        self.coding.check(path, errors);
    }
}

impl Validate for Mo {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.value.is_some() || self.currency.is_some(),
            path,
            errors,
        );
        if let Some(ref currency) = self.currency {
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
                push(
                    errors,
                    path,
                    ValidationError::new("Currency is not an ISO 4217 code")
                        .with_field("currency")
                        .with_reason(format!("got '{}'", currency)),
                );
            }
        }
    }
}

impl Validate for Qty {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        match self {
            Qty::Int(int) => int.check(path, errors),
            Qty::Real(real) => real.check(path, errors),
            Qty::Pq(pq) => pq.check(path, errors),
            Qty::Mo(mo) => mo.check(path, errors),
        }
    }
}

impl Validate for Rto {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        self.numerator.check(&path.child("numerator"), errors);
        self.denominator.check(&path.child("denominator"), errors);
        if self.denominator.is_zero() {
            push(
                errors,
                &path.child("denominator"),
                ValidationError::new("Ratio denominator is zero"),
            );
        }
    }
}

impl Validate for Ts {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(self.null_flavor.is_some(), self.value.is_some(), path, errors);
    }
}

impl Validate for SxcmTs {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        self.ts.check(path, errors);
    }
}

impl Validate for IvlTs {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        check_null_exclusive(
            self.null_flavor.is_some(),
            self.value.is_some() || self.bounds.is_some(),
            path,
            errors,
        );
        if let Some(IvlTsBounds::LowHigh { low, high }) = &self.bounds {
            if let (Some(low_value), Some(high_value)) = (&low.ts.value, &high.ts.value) {
                if low_value.partial_cmp(high_value) == Some(Ordering::Greater) {
                    push(
                        errors,
                        path,
                        ValidationError::new("Interval low is after its high")
                            .with_reason(format!("{} > {}", low_value, high_value)),
                    );
                }
            }
        }
        if let Some(
            IvlTsBounds::Width(width)
            | IvlTsBounds::LowWidth { width, .. }
            | IvlTsBounds::CenterWidth { width, .. },
        ) = &self.bounds
        {
            width.check(&path.child("width"), errors);
            if let Some(value) = width.value {
                if value.is_sign_negative() {
                    push(
                        errors,
                        &path.child("width"),
                        ValidationError::new("Interval width is negative"),
                    );
                }
            }
        }
    }
}

impl Validate for IvlPq {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        if let Some(IvlPqBounds::LowHigh { low, high }) = &self.bounds {
            if low.pq.unit == high.pq.unit {
                if let (Some(low_value), Some(high_value)) = (low.pq.value, high.pq.value) {
                    if low_value > high_value {
                        push(
                            errors,
                            path,
                            ValidationError::new("Interval low is above its high")
                                .with_reason(format!("{} > {}", low_value, high_value)),
                        );
                    }
                }
            }
        }
    }
}

impl Validate for crate::datatypes::PivlTs {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        if let Some(ref phase) = self.phase {
            phase.check(&path.child("phase"), errors);
        }
        if let Some(ref period) = self.period {
            period.check(&path.child("period"), errors);
            if let Some(value) = period.value {
                if value <= rust_decimal::Decimal::ZERO {
                    push(
                        errors,
                        &path.child("period"),
                        ValidationError::new("Period is not positive"),
                    );
                }
            }
        }
    }
}

impl Validate for EivlTs {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        if let Some(ref event) = self.event {
            event.check(&path.child("event"), errors);
            if let Some(ref code) = event.code {
                if TimingEvent::from_str(code).is_err() {
                    push(
                        errors,
                        &path.child("event"),
                        ValidationError::new("Event is not a timing event code")
                            .with_reason(format!("got '{}'", code)),
                    );
                }
            }
        }
        if let Some(ref offset) = self.offset {
            offset.check(&path.child("offset"), errors);
        }
    }
}

// ---------------------------------------------------------------------------
// Narrative validation
// ---------------------------------------------------------------------------

fn check_id(
    id: &Option<String>,
    seen: &mut HashSet<String>,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    let Some(id) = id else { return };
    if !is_valid_ncname(id) {
        push(
            errors,
            path,
            ValidationError::new(format!("'{}' is not a valid ID", id)).with_field("ID"),
        );
    }
    if !seen.insert(id.clone()) {
        push(
            errors,
            path,
            ValidationError::new(format!("Duplicate ID '{}'", id)).with_field("ID"),
        );
    }
}

struct NarrativeWalk {
    ids: HashSet<String>,
    footnote_ids: HashSet<String>,
    footnote_refs: Vec<(String, Path)>,
}

impl NarrativeWalk {
    fn new() -> Self {
        Self {
            ids: HashSet::new(),
            footnote_ids: HashSet::new(),
            footnote_refs: Vec::new(),
        }
    }

    fn items(&mut self, items: &[Item], path: &Path, errors: &mut Vec<ValidationError>) {
        for (i, item) in items.iter().enumerate() {
            match item {
                Item::Chars(_) | Item::Sub(_) | Item::Sup(_) | Item::Br => {}
                Item::Content(content) => {
                    let p = path.indexed("content", i);
                    check_id(&content.id, &mut self.ids, &p, errors);
                    self.items(&content.items, &p, errors);
                }
                Item::LinkHtml(link) => {
                    self.items(&link.items, &path.indexed("linkHtml", i), errors);
                }
                Item::Footnote(footnote) => {
                    let p = path.indexed("footnote", i);
                    if let Some(ref id) = footnote.id {
                        self.footnote_ids.insert(id.clone());
                    }
                    check_id(&footnote.id, &mut self.ids, &p, errors);
                    self.items(&footnote.items, &p, errors);
                }
                Item::FootnoteRef { idref } => {
                    self.footnote_refs
                        .push((idref.clone(), path.indexed("footnoteRef", i)));
                }
                Item::RenderMultiMedia(media) => {
                    if media.referenced_object.is_empty() {
                        push(
                            errors,
                            &path.indexed("renderMultiMedia", i),
                            ValidationError::new("Multimedia reference is empty")
                                .with_field("referencedObject"),
                        );
                    }
                    if let Some(ref caption) = media.caption {
                        self.caption(caption, &path.indexed("renderMultiMedia", i), errors);
                    }
                }
                Item::Paragraph(paragraph) => {
                    let p = path.indexed("paragraph", i);
                    check_id(&paragraph.id, &mut self.ids, &p, errors);
                    if let Some(ref caption) = paragraph.caption {
                        self.caption(caption, &p, errors);
                    }
                    self.items(&paragraph.items, &p, errors);
                }
                Item::List(list) => self.list(list, &path.indexed("list", i), errors),
                Item::Table(table) => self.table(table, &path.indexed("table", i), errors),
            }
        }
    }

    fn caption(&mut self, caption: &Caption, path: &Path, errors: &mut Vec<ValidationError>) {
        self.items(&caption.items, &path.child("caption"), errors);
    }

    fn list(&mut self, list: &List, path: &Path, errors: &mut Vec<ValidationError>) {
        check_id(&list.id, &mut self.ids, path, errors);
        if list.items.is_empty() {
            push(errors, path, ValidationError::new("List has no items"));
        }
        if let Some(ref caption) = list.caption {
            self.caption(caption, path, errors);
        }
        for (i, item) in list.items.iter().enumerate() {
            let p = path.indexed("item", i);
            check_id(&item.id, &mut self.ids, &p, errors);
            if let Some(ref caption) = item.caption {
                self.caption(caption, &p, errors);
            }
            self.items(&item.items, &p, errors);
        }
    }

    fn table(&mut self, table: &Table, path: &Path, errors: &mut Vec<ValidationError>) {
        check_id(&table.id, &mut self.ids, path, errors);
        if table.bodies.is_empty() || table.bodies.iter().all(|body| body.rows.is_empty()) {
            push(errors, path, ValidationError::new("Table has no body rows"));
        }
        if let Some(ref caption) = table.caption {
            self.caption(caption, path, errors);
        }
        let groups = table
            .head
            .iter()
            .map(|g| ("thead", g))
            .chain(table.bodies.iter().map(|g| ("tbody", g)))
            .chain(table.foot.iter().map(|g| ("tfoot", g)));
        for (name, group) in groups {
            for (r, row) in group.rows.iter().enumerate() {
                let row_path = path.child(name).indexed("tr", r);
                check_id(&row.id, &mut self.ids, &row_path, errors);
                for (c, cell) in row.cells.iter().enumerate() {
                    let cell_path = row_path.indexed("cell", c);
                    check_id(&cell.id, &mut self.ids, &cell_path, errors);
                    if cell.rowspan < 1 || cell.colspan < 1 {
                        push(
                            errors,
                            &cell_path,
                            ValidationError::new("Cell spans must be at least 1"),
                        );
                    }
                    self.items(&cell.items, &cell_path, errors);
                }
            }
        }
    }
}

impl Validate for Text {
    fn check(&self, path: &Path, errors: &mut Vec<ValidationError>) {
        let path = if path.0.is_empty() {
            Path::root("text")
        } else {
            path.clone()
        };
        let mut walk = NarrativeWalk::new();
        check_id(&self.id, &mut walk.ids, &path, errors);
        // Footnote ids double as plain ids, collect them first
        walk.items(&self.items, &path, errors);
        for (idref, ref_path) in &walk.footnote_refs {
            if !walk.footnote_ids.contains(idref) {
                push(
                    errors,
                    ref_path,
                    ValidationError::new(format!("Footnote reference '{}' has no target", idref))
                        .with_field("IDREF"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::{Footnote, ListItem, Paragraph};
    use crate::vocab::NullFlavor;
    use rust_decimal::Decimal;

    #[test]
    fn test_valid_ii() {
        let id = Ii::with_extension("2.16.840.1.113883.19.5", "42");
        assert!(id.validate().is_ok());
    }

    #[test]
    fn test_bad_uid_reported_with_field() {
        let id = Ii::new("not-an-oid!");
        let errors = id.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field.as_deref(), Some("root"));
    }

    #[test]
    fn test_extension_without_root() {
        let id = Ii {
            extension: Some("42".to_string()),
            ..Ii::default()
        };
        assert!(id.validate().is_err());
    }

    #[test]
    fn test_null_with_content() {
        let mut cd = Cd::new("x", "1.2.3");
        cd.null_flavor = Some(NullFlavor::Unk);
        let errors = cd.validate().unwrap_err();
        assert!(errors[0].message.contains("Null value carries content"));
    }

    #[test]
    fn test_errors_accumulate() {
        let cd = Cd {
            code: Some("two words".to_string()),
            code_system: Some("!bad!".to_string()),
            ..Cd::default()
        };
        let errors = cd.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_nested_paths() {
        let cd = Cd {
            code: Some("ok".to_string()),
            code_system: Some("2.16.840.1.113883.6.1".to_string()),
            translations: vec![Cd {
                code: Some("two words".to_string()),
                ..Cd::default()
            }],
            ..Cd::default()
        };
        let errors = cd.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path.as_deref(), Some("translation[0]"));
    }

    #[test]
    fn test_sc_code_requires_system() {
        let sc = Sc {
            value: Some("label".to_string()),
            code: Some("X".to_string()),
            ..Sc::default()
        };
        assert!(sc.validate().is_err());
    }

    #[test]
    fn test_rto_zero_denominator() {
        let rto = Rto::new(
            Qty::Pq(Pq::new(Decimal::from(600), "mg")),
            Qty::Int(Int::new(0)),
        );
        let errors = rto.validate().unwrap_err();
        assert!(errors[0].message.contains("denominator is zero"));
    }

    #[test]
    fn test_ivl_ordering() {
        let ivl = IvlTs::low_high(
            Ts::from_str("20230831").unwrap(),
            Ts::from_str("20230801").unwrap(),
        );
        let errors = ivl.validate().unwrap_err();
        assert!(errors[0].message.contains("low is after its high"));

        let ok = IvlTs::low_high(
            Ts::from_str("20230801").unwrap(),
            Ts::from_str("20230831").unwrap(),
        );
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_mo_currency() {
        let mo = Mo::new(Decimal::from(100), "usd");
        assert!(mo.validate().is_err());
        let mo = Mo::new(Decimal::from(100), "USD");
        assert!(mo.validate().is_ok());
    }

    #[test]
    fn test_empty_list_rejected() {
        let text = Text {
            items: vec![Item::List(List::default())],
            ..Text::default()
        };
        assert!(text.validate().is_err());
    }

    #[test]
    fn test_duplicate_ids() {
        let text = Text {
            items: vec![
                Item::Paragraph(Paragraph {
                    id: Some("p1".to_string()),
                    ..Paragraph::default()
                }),
                Item::Paragraph(Paragraph {
                    id: Some("p1".to_string()),
                    ..Paragraph::default()
                }),
            ],
            ..Text::default()
        };
        let errors = text.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("Duplicate ID")));
    }

    #[test]
    fn test_dangling_footnote_ref() {
        let text = Text {
            items: vec![Item::FootnoteRef {
                idref: "fn9".to_string(),
            }],
            ..Text::default()
        };
        let errors = text.validate().unwrap_err();
        assert!(errors[0].message.contains("no target"));
    }

    #[test]
    fn test_footnote_ref_resolves() {
        let text = Text {
            items: vec![
                Item::Footnote(Footnote {
                    id: Some("fn1".to_string()),
                    items: vec![Item::Chars("source".to_string())],
                    ..Footnote::default()
                }),
                Item::FootnoteRef {
                    idref: "fn1".to_string(),
                },
            ],
            ..Text::default()
        };
        assert!(text.validate().is_ok());
    }

    #[test]
    fn test_list_with_item_passes() {
        let text = Text {
            items: vec![Item::List(List {
                items: vec![ListItem {
                    items: vec![Item::Chars("one".to_string())],
                    ..ListItem::default()
                }],
                ..List::default()
            })],
            ..Text::default()
        };
        assert!(text.validate().is_ok());
    }
}
