//! The workbook stylesheet (`xl/styles.xml`)
//!
//! Style records are kept as raw XML fragments in document order so that a
//! template's formatting survives a load/save cycle untouched. New cell
//! formats are appended; existing indexes never move.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::MAIN_NS;

/// A cell format that can be added to a workbook
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    /// Thin black border on all four sides
    pub border: bool,
    /// Center horizontally and vertically
    pub center: bool,
    pub wrap_text: bool,
}

impl CellStyle {
    /// Bordered, centered table cell
    pub fn table_cell() -> Self {
        Self {
            border: true,
            center: true,
            wrap_text: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Styles {
    num_fmts: Vec<String>,
    fonts: Vec<String>,
    fills: Vec<String>,
    borders: Vec<String>,
    cell_style_xfs: Vec<String>,
    cell_xfs: Vec<String>,
    cell_styles: Vec<String>,
    added: HashMap<CellStyle, u32>,
}

/// Record groups of the stylesheet, in the order they are written
const GROUPS: [(&str, &str); 7] = [
    ("numFmts", "numFmt"),
    ("fonts", "font"),
    ("fills", "fill"),
    ("borders", "border"),
    ("cellStyleXfs", "xf"),
    ("cellXfs", "xf"),
    ("cellStyles", "cellStyle"),
];

impl Styles {
    pub(super) fn parse(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();

        let mut styles = Styles::default();
        for group in root.children().filter(|n| n.is_element()) {
            let records: Vec<String> = group
                .children()
                .filter(|n| n.is_element())
                .map(|n| xml[n.range()].to_string())
                .collect();
            match group.tag_name().name() {
                "numFmts" => styles.num_fmts = records,
                "fonts" => styles.fonts = records,
                "fills" => styles.fills = records,
                "borders" => styles.borders = records,
                "cellStyleXfs" => styles.cell_style_xfs = records,
                "cellXfs" => styles.cell_xfs = records,
                "cellStyles" => styles.cell_styles = records,
                // Differential and table styles are not carried over
                _ => {}
            }
        }

        styles.ensure_defaults();
        Ok(styles)
    }

    /// Every stylesheet needs at least one font, two fills, one border and
    /// one cell format.
    fn ensure_defaults(&mut self) {
        if self.fonts.is_empty() {
            self.fonts
                .push(r#"<font><sz val="11"/><name val="Calibri"/></font>"#.to_string());
        }
        if self.fills.is_empty() {
            self.fills
                .push(r#"<fill><patternFill patternType="none"/></fill>"#.to_string());
            self.fills
                .push(r#"<fill><patternFill patternType="gray125"/></fill>"#.to_string());
        }
        if self.borders.is_empty() {
            self.borders
                .push("<border><left/><right/><top/><bottom/><diagonal/></border>".to_string());
        }
        if self.cell_style_xfs.is_empty() {
            self.cell_style_xfs
                .push(r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>"#.to_string());
        }
        if self.cell_xfs.is_empty() {
            self.cell_xfs.push(
                r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#.to_string(),
            );
        }
    }

    /// Number of cell formats; valid style indexes are `0..count`
    pub fn cell_format_count(&self) -> usize {
        self.cell_xfs.len()
    }

    /// Index of a cell format matching `style`, appending one if needed.
    pub fn add(&mut self, style: CellStyle) -> u32 {
        if let Some(index) = self.added.get(&style) {
            return *index;
        }

        let border_id = if style.border {
            let color = r#"<color rgb="FF000000"/>"#;
            self.borders.push(format!(
                r#"<border><left style="thin">{c}</left><right style="thin">{c}</right><top style="thin">{c}</top><bottom style="thin">{c}</bottom><diagonal/></border>"#,
                c = color
            ));
            self.borders.len() - 1
        } else {
            0
        };

        let mut xf = format!(
            r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="{}" xfId="0""#,
            border_id
        );
        if style.border {
            xf.push_str(r#" applyBorder="1""#);
        }
        if style.center || style.wrap_text {
            xf.push_str(r#" applyAlignment="1"><alignment"#);
            if style.center {
                xf.push_str(r#" horizontal="center" vertical="center""#);
            }
            if style.wrap_text {
                xf.push_str(r#" wrapText="1""#);
            }
            xf.push_str("/></xf>");
        } else {
            xf.push_str("/>");
        }
        self.cell_xfs.push(xf);

        let index = (self.cell_xfs.len() - 1) as u32;
        self.added.insert(style, index);
        index
    }

    pub(super) fn write<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = Writer::new(out);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut root = BytesStart::new("styleSheet");
        root.push_attribute(("xmlns", MAIN_NS));
        writer.write_event(Event::Start(root))?;

        let groups = [
            &self.num_fmts,
            &self.fonts,
            &self.fills,
            &self.borders,
            &self.cell_style_xfs,
            &self.cell_xfs,
            &self.cell_styles,
        ];
        for ((group, _), records) in GROUPS.iter().zip(groups) {
            if records.is_empty() {
                continue;
            }
            let count = records.len().to_string();
            writer.write_event(Event::Start(
                BytesStart::new(*group).with_attributes([("count", count.as_str())]),
            ))?;
            for record in records.iter() {
                writer.write_event(Event::Text(BytesText::from_escaped(record.as_str())))?;
            }
            writer.write_event(Event::End(BytesEnd::new(*group)))?;
        }

        writer.write_event(Event::End(BytesEnd::new("styleSheet")))?;
        Ok(())
    }
}
