//! # Report Layout Engine
//!
//! Turns one [`InspectionRecord`] and its (optionally resolved) engineer into
//! an ordered list of fixed-size pages of absolutely positioned draw
//! instructions.
//!
//! ## How pagination works
//!
//! The report is a sequence of *sections*:
//!
//! 1. property identification
//! 2. the damage-survey heading, kept together with the first entry
//! 3. one section per damage entry, in the order the types were toggled
//! 4. the closing unit: final assessment plus signature
//!
//! A cursor `y` starts at `content_top` on every page. Before a section is
//! drawn its full height is computed (description paragraphs are wrapped
//! first, photo rows have a fixed height). If `y + height` would pass the
//! content bottom, the current page gets its footer, a new page gets its
//! header, and the cursor resets. Sections are never split. A section that
//! doesn't fit even on a fresh page is drawn anyway and may run into the
//! footer.
//!
//! Layout never fails. Blank fields render blank, a missing engineer renders
//! placeholders, and a photo that can't be decoded is skipped with a warning.

pub mod page_break;

use crate::config::{ReportConfig, ResolvedGeometry};
use crate::font::{FontContext, StandardFont};
use crate::image_loader::{self, LoadedImage};
use crate::model::{DamageEntry, Engineer, InspectionRecord};
use crate::style::{Color, FontWeight, TextAlign};
use crate::text::TextLayout;

use page_break::{decide_break, BreakDecision};

/// At most this many photos per damage entry are drawn.
pub const PHOTOS_PER_ENTRY: usize = 2;

/// A finished page.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

impl LayoutPage {
    /// Every text line on the page, in drawing order.
    pub fn text_lines(&self) -> impl Iterator<Item = &TextLine> {
        self.elements.iter().flat_map(|el| match &el.draw {
            DrawCommand::Text { lines, .. } => lines.as_slice(),
            _ => &[][..],
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_lines().any(|l| l.text.contains(needle))
    }

    pub fn image_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|el| matches!(el.draw, DrawCommand::Image { .. }))
            .count()
    }
}

/// A positioned element on a page.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    /// Absolute position on the page (top-left corner), in points.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
}

/// What to actually draw for this element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Draw text.
    Text { lines: Vec<TextLine>, color: Color },
    /// Draw an image scaled into the element's box.
    Image { image_data: LoadedImage },
    /// Draw a horizontal rule along the element's top edge.
    Rule { color: Color, thickness: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f64,
    /// Baseline, measured from the top of the page.
    pub y: f64,
    pub text: String,
    pub font: StandardFont,
    pub font_size: f64,
    pub width: f64,
}

/// The main layout engine.
pub struct LayoutEngine {
    config: ReportConfig,
    geometry: ResolvedGeometry,
    text_layout: TextLayout,
}

/// Tracks where we are on the current page during layout.
#[derive(Debug)]
struct PageCursor {
    y: f64,
    elements: Vec<LayoutElement>,
    sections_placed: usize,
}

impl PageCursor {
    fn is_fresh(&self) -> bool {
        self.sections_placed == 0
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            config: config.clone(),
            geometry: config.geometry.resolve(),
            text_layout: TextLayout::new(),
        }
    }

    /// Main entry point: lay out a report into pages.
    pub fn layout(
        &self,
        record: &InspectionRecord,
        engineer: Option<&Engineer>,
        font_context: &FontContext,
    ) -> Vec<LayoutPage> {
        let mut pages: Vec<LayoutPage> = Vec::new();
        let mut cursor = self.open_page(font_context);

        let property_height = self.property_section_height();
        self.place(&mut cursor, &mut pages, &[property_height], font_context);
        self.draw_property_section(&mut cursor, record, font_context);

        if self.config.survey_on_new_page {
            self.next_page(&mut cursor, &mut pages, font_context);
        }

        // The survey heading never sits alone at the bottom of a page.
        let entries = record.printable_damage_entries();
        let entry_heights: Vec<f64> = entries
            .iter()
            .map(|entry| self.damage_section_height(entry, font_context))
            .collect();
        let heading_height = self.survey_heading_height();
        let mut kept = vec![heading_height];
        kept.extend(entry_heights.first().copied());
        self.place(&mut cursor, &mut pages, &kept, font_context);
        self.draw_survey_heading(&mut cursor, font_context);

        for (i, (entry, height)) in entries.iter().zip(&entry_heights).enumerate() {
            // The first entry's room was reserved with the heading.
            if i > 0 {
                self.place(&mut cursor, &mut pages, &[*height], font_context);
            }
            self.draw_damage_section(&mut cursor, entry, font_context);
        }

        let closing_height = self.closing_section_height();
        self.place(&mut cursor, &mut pages, &[closing_height], font_context);
        self.draw_closing_section(&mut cursor, record, engineer, font_context);

        pages.push(self.finalize(cursor, font_context));
        log::debug!(
            "laid out {} damage entries on {} pages",
            entries.len(),
            pages.len()
        );
        pages
    }

    // ── Pagination ──────────────────────────────────────────────

    fn open_page(&self, font_context: &FontContext) -> PageCursor {
        let mut cursor = PageCursor {
            y: self.geometry.content_top,
            elements: Vec::new(),
            sections_placed: 0,
        };
        self.draw_header(&mut cursor, font_context);
        cursor
    }

    fn finalize(&self, mut cursor: PageCursor, font_context: &FontContext) -> LayoutPage {
        self.draw_footer(&mut cursor, font_context);
        LayoutPage {
            width: self.geometry.page_width,
            height: self.geometry.page_height,
            elements: cursor.elements,
        }
    }

    fn next_page(
        &self,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        font_context: &FontContext,
    ) {
        let full = std::mem::replace(cursor, self.open_page(font_context));
        pages.push(self.finalize(full, font_context));
        log::debug!("page break: starting page {}", pages.len() + 1);
    }

    /// Make room for a section: break the page if it won't fit.
    fn place(
        &self,
        cursor: &mut PageCursor,
        pages: &mut Vec<LayoutPage>,
        heights: &[f64],
        font_context: &FontContext,
    ) {
        let decision = decide_break(
            cursor.y,
            heights,
            self.geometry.content_bottom,
            cursor.is_fresh(),
        );
        if decision == BreakDecision::MoveToNextPage {
            self.next_page(cursor, pages, font_context);
        }
        cursor.sections_placed += 1;
    }

    // ── Section heights ─────────────────────────────────────────

    fn property_section_height(&self) -> f64 {
        // title, 2 identification lines, heading, 6 property lines
        self.geometry.field_spacing * 12.0
    }

    fn survey_heading_height(&self) -> f64 {
        self.geometry.field_spacing * 1.5
    }

    /// Label line, wrapped description, optional photo row, trailing gap.
    fn damage_section_height(&self, entry: &DamageEntry, font_context: &FontContext) -> f64 {
        let g = &self.geometry;
        let line_count = self.wrap_description(entry, font_context).len() as f64;
        let photo_row = if entry.photos.is_empty() {
            0.0
        } else {
            g.photo_row_height
        };
        g.field_spacing + line_count * g.paragraph_line_height + photo_row + g.paragraph_line_height
    }

    fn closing_section_height(&self) -> f64 {
        let g = &self.geometry;
        g.field_spacing * 6.5 + g.paragraph_line_height * 2.0
    }

    /// Tabs have no glyph in the standard fonts; they wrap and print as spaces.
    fn wrap_description(&self, entry: &DamageEntry, font_context: &FontContext) -> Vec<String> {
        let text = entry.technical_description.replace('\t', " ");
        self.text_layout
            .break_into_lines(
                font_context,
                &text,
                self.geometry.text_width,
                StandardFont::Helvetica,
                self.config.font_sizes.body,
            )
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    // ── Sections ────────────────────────────────────────────────

    fn draw_property_section(
        &self,
        cursor: &mut PageCursor,
        record: &InspectionRecord,
        font_context: &FontContext,
    ) {
        let g = &self.geometry;
        let sizes = &self.config.font_sizes;
        let fs = g.field_spacing;
        let y0 = cursor.y;

        self.push_text(
            cursor,
            &self.config.texts.title,
            TextAlign::Center,
            y0,
            FontWeight::Bold,
            sizes.title,
            font_context,
        );

        let identification = [
            format!("MUNICÍPIO: {}", record.municipality.to_uppercase()),
            format!("DATA: {}", record.inspection_date),
        ];
        let mut y = y0 + fs * 1.5;
        for line in &identification {
            self.push_text(cursor, line, TextAlign::Left, y, FontWeight::Bold, sizes.header, font_context);
            y += fs;
        }

        y += fs;
        self.push_text(
            cursor,
            "INFORMAÇÕES DO IMÓVEL",
            TextAlign::Center,
            y,
            FontWeight::Bold,
            sizes.header,
            font_context,
        );

        let coordinates = if record.coordinates.latitude.is_empty()
            && record.coordinates.longitude.is_empty()
        {
            String::new()
        } else {
            format!(
                "{}, {}",
                record.coordinates.latitude, record.coordinates.longitude
            )
        };
        let fields = [
            format!("INSCRIÇÃO MUNICIPAL: {}", record.municipal_registration),
            format!("PROPRIETÁRIO: {}", record.owner_name.to_uppercase()),
            format!("REQUERENTE: {}", record.requester_name.to_uppercase()),
            format!("ENDEREÇO: {}", record.full_address.to_uppercase()),
            format!("COORDENADAS: {}", coordinates),
            format!("TIPOLOGIA: {}", record.typology_label().to_uppercase()),
        ];
        y += fs * 1.5;
        for line in &fields {
            self.push_text(cursor, line, TextAlign::Left, y, FontWeight::Bold, sizes.body, font_context);
            y += fs;
        }

        cursor.y = y0 + self.property_section_height();
    }

    fn draw_survey_heading(&self, cursor: &mut PageCursor, font_context: &FontContext) {
        self.push_text(
            cursor,
            "LEVANTAMENTO DE DANOS",
            TextAlign::Center,
            cursor.y,
            FontWeight::Bold,
            self.config.font_sizes.heading,
            font_context,
        );
        cursor.y += self.survey_heading_height();
    }

    fn draw_damage_section(
        &self,
        cursor: &mut PageCursor,
        entry: &DamageEntry,
        font_context: &FontContext,
    ) {
        let g = &self.geometry;
        let size = self.config.font_sizes.body;

        let label = format!("{}:", entry.damage_type.to_uppercase());
        self.push_text(cursor, &label, TextAlign::Left, cursor.y, FontWeight::Bold, size, font_context);

        // Drawn wherever it lands, even if it runs past the content bottom.
        let lines = self.wrap_description(entry, font_context);
        let mut text_lines = Vec::with_capacity(lines.len());
        let mut baseline = cursor.y + g.paragraph_line_height;
        for text in &lines {
            let width = font_context.measure_string(text, StandardFont::Helvetica, size);
            text_lines.push(TextLine {
                x: g.margin_left,
                y: baseline,
                text: text.clone(),
                font: StandardFont::Helvetica,
                font_size: size,
                width,
            });
            baseline += g.paragraph_line_height;
        }
        cursor.elements.push(LayoutElement {
            x: g.margin_left,
            y: cursor.y + g.paragraph_line_height - size,
            width: g.text_width,
            height: lines.len() as f64 * g.paragraph_line_height,
            draw: DrawCommand::Text {
                lines: text_lines,
                color: Color::BLACK,
            },
        });
        cursor.y += g.field_spacing + lines.len() as f64 * g.paragraph_line_height;

        if !entry.photos.is_empty() {
            self.draw_photo_row(cursor, entry);
            cursor.y += g.photo_row_height;
        }
        cursor.y += g.paragraph_line_height;
    }

    /// Up to two photos side by side, each stretched into the fixed box.
    /// A photo that fails to decode gives its slot to the next one.
    fn draw_photo_row(&self, cursor: &mut PageCursor, entry: &DamageEntry) {
        let g = &self.geometry;
        let mut x = g.margin_left;
        for (idx, photo) in entry.photos.iter().take(PHOTOS_PER_ENTRY).enumerate() {
            match image_loader::load_photo(photo) {
                Ok(image_data) => {
                    cursor.elements.push(LayoutElement {
                        x,
                        y: cursor.y,
                        width: g.photo_width,
                        height: g.photo_height,
                        draw: DrawCommand::Image { image_data },
                    });
                    x += g.photo_step;
                }
                Err(e) => {
                    log::warn!(
                        "skipping photo {} of '{}': {}",
                        idx + 1,
                        entry.damage_type,
                        e
                    );
                }
            }
        }
        if entry.photos.len() > PHOTOS_PER_ENTRY {
            log::debug!(
                "'{}' has {} photos, only {} are printed",
                entry.damage_type,
                entry.photos.len(),
                PHOTOS_PER_ENTRY
            );
        }
    }

    fn draw_closing_section(
        &self,
        cursor: &mut PageCursor,
        record: &InspectionRecord,
        engineer: Option<&Engineer>,
        font_context: &FontContext,
    ) {
        let g = &self.geometry;
        let sizes = &self.config.font_sizes;
        let texts = &self.config.texts;
        let fs = g.field_spacing;
        let y0 = cursor.y;

        self.push_text(
            cursor,
            "AVALIAÇÃO FINAL",
            TextAlign::Center,
            y0 + fs,
            FontWeight::Bold,
            sizes.heading,
            font_context,
        );

        let assessment = [
            format!("CLASSIFICAÇÃO: {}", record.classification.label().to_uppercase()),
            format!("NÍVEL DE DESTRUIÇÃO: {}", record.destruction_level().to_uppercase()),
            format!(
                "PERCENTUAL CONSIDERADO DE DESTRUIÇÃO: {}",
                record.destruction_percentage()
            ),
        ];
        let fields_top = y0 + fs * 2.5;
        for (i, line) in assessment.iter().enumerate() {
            self.push_text(
                cursor,
                line,
                TextAlign::Left,
                fields_top + fs * i as f64,
                FontWeight::Bold,
                sizes.body,
                font_context,
            );
        }

        let (name, license) = match engineer {
            Some(eng) => (
                eng.full_name.to_uppercase(),
                format!("CREA {} {}", eng.state_code, eng.license_number),
            ),
            None => (
                texts.missing_engineer_name.clone(),
                texts.missing_engineer_license.clone(),
            ),
        };
        let signature_y = fields_top + fs * 4.0;
        let lh = g.paragraph_line_height;
        self.push_text(cursor, &name, TextAlign::Center, signature_y, FontWeight::Bold, sizes.body, font_context);
        self.push_text(
            cursor,
            &texts.engineer_title,
            TextAlign::Center,
            signature_y + lh,
            FontWeight::Normal,
            sizes.body,
            font_context,
        );
        self.push_text(
            cursor,
            &license,
            TextAlign::Center,
            signature_y + lh * 2.0,
            FontWeight::Normal,
            sizes.body,
            font_context,
        );

        cursor.y = y0 + self.closing_section_height();
    }

    // ── Page furniture ──────────────────────────────────────────

    fn draw_header(&self, cursor: &mut PageCursor, font_context: &FontContext) {
        let g = &self.geometry;
        for (i, line) in self.config.texts.header_lines.iter().enumerate() {
            self.push_text(
                cursor,
                line,
                TextAlign::Center,
                g.header_top + g.header_line_spacing * i as f64,
                FontWeight::Bold,
                self.config.font_sizes.header,
                font_context,
            );
        }
    }

    fn draw_footer(&self, cursor: &mut PageCursor, font_context: &FontContext) {
        let g = &self.geometry;
        let [first, second] = self.config.divider_colors;
        cursor.elements.push(LayoutElement {
            x: g.margin_left,
            y: g.divider_y,
            width: g.divider_split_x - g.margin_left,
            height: 0.0,
            draw: DrawCommand::Rule {
                color: first,
                thickness: g.divider_width,
            },
        });
        cursor.elements.push(LayoutElement {
            x: g.divider_split_x,
            y: g.divider_y,
            width: g.divider_end_x - g.divider_split_x,
            height: 0.0,
            draw: DrawCommand::Rule {
                color: second,
                thickness: g.divider_width,
            },
        });

        let texts = &self.config.texts;
        let lines = [
            (&texts.footer_address, FontWeight::Normal),
            (&texts.footer_contact, FontWeight::Normal),
            (&texts.footer_slogan, FontWeight::Bold),
        ];
        for ((text, weight), baseline) in lines.into_iter().zip(g.footer_baselines) {
            self.push_text(
                cursor,
                text,
                TextAlign::Center,
                baseline,
                weight,
                self.config.font_sizes.footer,
                font_context,
            );
        }
    }

    /// Add a single-line text element with its baseline at `y`.
    #[allow(clippy::too_many_arguments)]
    fn push_text(
        &self,
        cursor: &mut PageCursor,
        text: &str,
        align: TextAlign,
        y: f64,
        weight: FontWeight,
        font_size: f64,
        font_context: &FontContext,
    ) {
        let font = weight.font();
        let width = self
            .text_layout
            .measure_width(font_context, text, font, font_size);
        let x = match align {
            TextAlign::Left => self.geometry.margin_left,
            TextAlign::Center => self.geometry.center_x - width / 2.0,
        };
        cursor.elements.push(LayoutElement {
            x,
            y: y - font_size,
            width,
            height: font_size,
            draw: DrawCommand::Text {
                lines: vec![TextLine {
                    x,
                    y,
                    text: text.to_string(),
                    font,
                    font_size,
                    width,
                }],
                color: Color::BLACK,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Photo, PhotoFormat};

    fn layout(record: &InspectionRecord, engineer: Option<&Engineer>) -> Vec<LayoutPage> {
        LayoutEngine::default().layout(record, engineer, &FontContext::new())
    }

    fn page_of(pages: &[LayoutPage], needle: &str) -> Vec<usize> {
        pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.contains_text(needle))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn blank_record_is_one_page() {
        let pages = layout(&InspectionRecord::default(), None);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains_text("MUNICÍPIO: "));
        assert!(pages[0].contains_text("NOME DO ENGENHEIRO NÃO INFORMADO"));
        assert!(pages[0].contains_text("REGISTRO NÃO INFORMADO"));
    }

    #[test]
    fn header_and_footer_on_every_page() {
        let mut record = InspectionRecord::default();
        for t in ["Cobertura", "Forro", "Paredes", "Estrutura", "Piso", "Muro"] {
            record.toggle_damage(t).unwrap();
            record.set_description(t, &"trinca ".repeat(120)).unwrap();
        }
        let pages = layout(&record, None);
        assert!(pages.len() >= 2);
        for page in &pages {
            assert!(page.contains_text("ESTADO DO PARANÁ"));
            assert!(page.contains_text("FUNDO ESTADUAL PARA CALAMIDADES PÚBLICAS"));
            assert!(page.contains_text("Defesa Civil somos todos nós"));
            let rules = page
                .elements
                .iter()
                .filter(|e| matches!(e.draw, DrawCommand::Rule { .. }))
                .count();
            assert_eq!(rules, 2);
        }
    }

    #[test]
    fn entries_flow_in_order_without_splitting() {
        let mut record = InspectionRecord::default();
        let types = ["Paredes", "Cobertura", "Forro", "Piso", "Janelas", "Portas", "Muro"];
        for t in types {
            record.toggle_damage(t).unwrap();
            record.set_description(t, &"fissura ".repeat(60)).unwrap();
        }
        let pages = layout(&record, None);
        assert!(pages.len() >= 2);

        let mut last_page = 0;
        for t in types {
            let label = format!("{}:", t.to_uppercase());
            let found = page_of(&pages, &label);
            assert_eq!(found.len(), 1, "{} should be on exactly one page", label);
            assert!(found[0] >= last_page, "{} out of order", label);
            last_page = found[0];
        }
    }

    #[test]
    fn no_section_starts_below_content_bottom() {
        let engine = LayoutEngine::default();
        let bottom = engine.geometry.content_bottom;
        let mut record = InspectionRecord::default();
        for t in ["Paredes", "Cobertura", "Forro", "Piso", "Janelas", "Portas"] {
            record.toggle_damage(t).unwrap();
            record.set_description(t, &"umidade ".repeat(40)).unwrap();
        }
        let pages = engine.layout(&record, None, &FontContext::new());
        for page in &pages {
            for line in page.text_lines() {
                if line.text.ends_with(':') && line.font == StandardFont::HelveticaBold {
                    assert!(line.y <= bottom);
                }
            }
        }
    }

    #[test]
    fn survey_heading_is_kept_with_first_entry() {
        let mut record = InspectionRecord::default();
        record.toggle_damage("Cobertura").unwrap();
        record.set_description("Cobertura", &"telha ".repeat(200)).unwrap();
        let pages = layout(&record, None);
        assert_eq!(page_of(&pages, "LEVANTAMENTO DE DANOS"), page_of(&pages, "COBERTURA:"));
    }

    #[test]
    fn survey_on_new_page_reserves_page_one() {
        let config = ReportConfig {
            survey_on_new_page: true,
            ..Default::default()
        };
        let pages = LayoutEngine::new(&config).layout(
            &InspectionRecord::default(),
            None,
            &FontContext::new(),
        );
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains_text("INFORMAÇÕES DO IMÓVEL"));
        assert!(!pages[0].contains_text("LEVANTAMENTO DE DANOS"));
        assert!(pages[1].contains_text("LEVANTAMENTO DE DANOS"));
    }

    #[test]
    fn oversized_entry_is_placed_on_fresh_page() {
        let mut record = InspectionRecord::default();
        record.toggle_damage("Paredes").unwrap();
        record.set_description("Paredes", &"desplacamento ".repeat(2000)).unwrap();
        let pages = layout(&record, None);
        assert_eq!(page_of(&pages, "PAREDES:").len(), 1);
        // property page, the oversized entry, the closing unit
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn undecodable_photos_are_skipped() {
        let mut record = InspectionRecord::default();
        record.toggle_damage("Forro").unwrap();
        record
            .attach_photos(
                "Forro",
                [
                    Photo::new(PhotoFormat::Jpeg, vec![0, 1, 2, 3, 4]),
                    Photo::new(PhotoFormat::Png, vec![9, 9, 9, 9, 9]),
                ],
            )
            .unwrap();
        let pages = layout(&record, None);
        assert_eq!(pages.iter().map(|p| p.image_count()).sum::<usize>(), 0);
        assert!(pages.iter().any(|p| p.contains_text("AVALIAÇÃO FINAL")));
    }

    #[test]
    fn engineer_signs_the_report() {
        let engineer = Engineer {
            id: "1".to_string(),
            full_name: "Lorena".to_string(),
            license_number: "98.123/D".to_string(),
            state_code: "PR".to_string(),
        };
        let record = InspectionRecord {
            classification: Classification::Severe,
            ..Default::default()
        };
        let pages = layout(&record, Some(&engineer));
        let last = pages.last().unwrap();
        assert!(last.contains_text("LORENA"));
        assert!(last.contains_text("Engenheiro Civil"));
        assert!(last.contains_text("CREA PR 98.123/D"));
        assert!(last.contains_text("NÍVEL DE DESTRUIÇÃO: DESTRUIÇÃO PARCIAL GRAVE"));
        assert!(last.contains_text("PERCENTUAL CONSIDERADO DE DESTRUIÇÃO: 70%"));
    }

    #[test]
    fn centered_text_is_centered() {
        let pages = layout(&InspectionRecord::default(), None);
        let engine = LayoutEngine::default();
        let line = pages[0]
            .text_lines()
            .find(|l| l.text == "ESTADO DO PARANÁ")
            .unwrap();
        let mid = line.x + line.width / 2.0;
        assert!((mid - engine.geometry.center_x).abs() < 1e-6);
    }

    #[test]
    fn tabs_in_descriptions_print_as_spaces() {
        let mut record = InspectionRecord::default();
        record.toggle_damage("Piso").unwrap();
        record.set_description("Piso", "trinca\tdiagonal\tno contrapiso").unwrap();
        let pages = layout(&record, None);
        assert!(pages[0].contains_text("trinca diagonal no contrapiso"));
        assert!(!pages.iter().any(|p| p.text_lines().any(|l| l.text.contains('\t'))));
    }

    #[test]
    fn repeated_and_unknown_damage_types_are_left_out() {
        let record: InspectionRecord = serde_json::from_str(
            r#"{ "damageEntries": [
                { "damageType": "Muro", "technicalDescription": "Muro tombado." },
                { "damageType": "Muro", "technicalDescription": "Duplicado." },
                { "damageType": "Piscina", "technicalDescription": "Fora do catalogo." }
            ] }"#,
        )
        .unwrap();
        let pages = layout(&record, None);
        let labels = |needle: &str| {
            pages
                .iter()
                .flat_map(|p| p.text_lines())
                .filter(|l| l.text == needle)
                .count()
        };
        assert_eq!(labels("MURO:"), 1);
        assert_eq!(labels("PISCINA:"), 0);
        assert!(!pages.iter().any(|p| p.contains_text("Duplicado.")));
    }

    #[test]
    fn typology_other_is_printed() {
        let record = InspectionRecord {
            typology: "Outro".to_string(),
            typology_other: "galpão".to_string(),
            ..Default::default()
        };
        let pages = layout(&record, None);
        assert!(pages[0].contains_text("TIPOLOGIA: GALPÃO"));
    }
}
