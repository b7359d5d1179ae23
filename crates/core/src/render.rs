//! Structured HTML and plain-text rendering of the patient table.
//!
//! Record fields come from the server and are untrusted. Markup is only ever produced by
//! [`Element`], which escapes every text node and attribute value when serialised, so no
//! field can inject tags or break out of an attribute.

use crate::constants::{TABLE_BODY_ID, THEME_TOGGLE_ID};
use crate::form::{FieldId, FormFields};
use crate::table::PatientRow;
use crate::theme::Theme;

/// Column headings, matching [`PatientRow::cells`] plus the action column.
pub const COLUMN_HEADINGS: [&str; 6] = ["ID", "Name", "City", "BMI", "Verdict", ""];

/// Escape `&`, `<`, `>`, `"` and `'` for use in text or a quoted attribute value.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An HTML element built from parts rather than from strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
    void: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
            void: false,
        }
    }

    /// An element with no closing tag (`<input>`, `<meta>`).
    pub fn void(tag: &'static str) -> Self {
        Self {
            void: true,
            ..Self::new(tag)
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');
        if self.void {
            return;
        }
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_to(out),
                Node::Text(t) => out.push_str(&escape_html(t)),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

/// One `<tr>`: five text cells plus a delete button.
pub fn patient_row(row: &PatientRow) -> Element {
    let [id, name, city, bmi, verdict] = row.cells();

    let status = Element::new("span")
        .attr("class", format!("status {verdict}"))
        .text(verdict);
    let delete = Element::new("button")
        .attr("class", "btn ghost")
        .attr("data-action", "delete")
        .attr("data-id", row.id.clone())
        .text("Delete");

    Element::new("tr")
        .attr("data-id", row.id.clone())
        .child(Element::new("td").text(id))
        .child(Element::new("td").text(name))
        .child(Element::new("td").text(city))
        .child(Element::new("td").text(bmi))
        .child(Element::new("td").child(status))
        .child(Element::new("td").child(delete))
}

pub fn table_body(rows: &[PatientRow]) -> Element {
    Element::new("tbody")
        .attr("id", TABLE_BODY_ID)
        .children(rows.iter().map(patient_row))
}

fn form_inputs<F: FormFields + ?Sized>(form: &F) -> Element {
    Element::new("form").children(FieldId::ALL.into_iter().map(|field| {
        let mut input = Element::void("input")
            .attr("id", field.element_id())
            .attr("name", field.element_id())
            .attr("value", form.value(field));
        if field.is_numeric() {
            input = input.attr("type", "number");
        }
        input
    }))
}

/// A complete page: theme toggle, edit form and the table.
pub fn page_document<F: FormFields + ?Sized>(rows: &[PatientRow], form: &F, theme: Theme) -> String {
    let mut body = Element::new("body");
    if let Some(class) = theme.body_class() {
        body = body.attr("class", class);
    }

    let head = Element::new("head")
        .child(Element::void("meta").attr("charset", "utf-8"))
        .child(Element::new("title").text("Carelytics"));

    let toggle = Element::new("button")
        .attr("id", THEME_TOGGLE_ID)
        .text("Toggle theme");

    let heading_row = Element::new("tr").children(
        COLUMN_HEADINGS
            .iter()
            .map(|heading| Element::new("th").text(*heading)),
    );
    let table = Element::new("table")
        .child(Element::new("thead").child(heading_row))
        .child(table_body(rows));

    let html = Element::new("html").attr("lang", "en").child(head).child(
        body.child(toggle).child(form_inputs(form)).child(table),
    );

    format!("<!DOCTYPE html>\n{}\n", html.render())
}

/// Fixed-width text table for terminals.
pub fn text_table(rows: &[PatientRow]) -> String {
    if rows.is_empty() {
        return "No patients found.\n".to_string();
    }

    let headings = ["ID", "NAME", "CITY", "BMI", "VERDICT"];
    let cells: Vec<[String; 5]> = rows.iter().map(PatientRow::cells).collect();

    let mut widths = headings.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |values: Vec<&str>| {
        let line = values
            .iter()
            .zip(widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };

    push_line(headings.to_vec());
    for row in &cells {
        push_line(row.iter().map(String::as_str).collect());
    }
    out
}
