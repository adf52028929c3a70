//! PDF "flipbook" export.
//!
//! A flipbook has a cover page followed by one page per recipe. Text that
//! does not fit continues on a new page. Recipe pictures are downloaded up
//! front; a picture that cannot be fetched or decoded is left out and the
//! rest of the book is still produced.

use image::DynamicImage;
use log::{debug, info, warn};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rect, Rgb,
};

use crate::config::FlipbookConfig;
use crate::error::{AppError, Result};
use crate::images::ImageSource;
use crate::model::Recipe;
use crate::steps::format_steps;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const BODY_TOP: f32 = PAGE_HEIGHT - 25.0;
const BODY_BOTTOM: f32 = 20.0;
const IMAGE_WIDTH: f32 = 60.0;
const IMAGE_MAX_HEIGHT: f32 = 90.0;
const RUNNING_HEADER: &str = "Recipe Flipbook";
const COVER_GRAY: f32 = 240.0 / 255.0;

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// A recipe together with its downloaded picture, if any.
#[derive(Debug, Clone)]
pub struct FlipbookEntry<'a> {
    pub recipe: &'a Recipe,
    pub image: Option<Vec<u8>>,
}

/// Cover texts for generated books
#[derive(Debug, Clone)]
pub struct Flipbook {
    title: String,
    subtitle: String,
    compiled_by: String,
}

impl Flipbook {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            compiled_by: String::new(),
        }
    }

    /// Names the compiler on the cover. An empty name leaves the line out.
    pub fn compiled_by(mut self, name: impl Into<String>) -> Self {
        self.compiled_by = name.into();
        self
    }

    pub fn from_config(config: &FlipbookConfig) -> Self {
        Self::new(config.title.clone(), config.subtitle.clone())
            .compiled_by(config.compiled_by.clone())
    }

    /// Downloads the picture of every recipe that has one.
    ///
    /// Failures are logged and leave that entry without an image.
    pub async fn fetch_images<'a>(
        source: &dyn ImageSource,
        recipes: &[&'a Recipe],
    ) -> Vec<FlipbookEntry<'a>> {
        let mut entries = Vec::with_capacity(recipes.len());
        for &recipe in recipes {
            let image = match recipe.image_url() {
                Some(url) => match source.fetch(url).await {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        warn!("Error adding image for {}: {}", recipe.name, e);
                        None
                    }
                },
                None => None,
            };
            entries.push(FlipbookEntry { recipe, image });
        }
        entries
    }

    /// Renders the book for the selected states and returns the PDF bytes.
    pub fn render(&self, states: &[String], entries: &[FlipbookEntry<'_>]) -> Result<Vec<u8>> {
        let (doc, pages) = self.build(states, entries)?;
        let bytes = doc.save_to_bytes()?;
        info!(
            "Rendered flipbook with {} recipes on {} pages ({} bytes)",
            entries.len(),
            pages,
            bytes.len()
        );
        Ok(bytes)
    }

    fn build(
        &self,
        states: &[String],
        entries: &[FlipbookEntry<'_>],
    ) -> Result<(PdfDocumentReference, usize)> {
        let (doc, page, layer) =
            PdfDocument::new(&self.title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
            italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique)?,
        };
        let first_layer = doc.get_page(page).get_layer(layer);
        paint_cover_background(&first_layer);
        let mut writer = PageWriter::new(&doc, fonts, first_layer);

        writer.gap(20.0);
        writer.centered(&self.title, 24.0, Style::Bold);
        writer.gap(4.0);
        writer.centered(&self.subtitle, 16.0, Style::Italic);
        writer.gap(10.0);
        writer.centered(&format!("Recipes from {}", states.join(", ")), 14.0, Style::Regular);
        if !self.compiled_by.trim().is_empty() {
            writer.gap(6.0);
            writer.centered(
                &format!("Compiled by: {}", self.compiled_by.trim()),
                14.0,
                Style::Regular,
            );
        }

        for entry in entries {
            writer.new_page();
            write_recipe(&mut writer, entry);
        }

        let pages = writer.page_no;
        Ok((doc, pages))
    }
}

/// Light gray fill behind the whole cover page. Text drawn afterwards is black.
fn paint_cover_background(layer: &PdfLayerReference) {
    layer.set_fill_color(Color::Rgb(Rgb::new(COVER_GRAY, COVER_GRAY, COVER_GRAY, None)));
    layer.add_rect(Rect::new(Mm(0.0), Mm(0.0), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT)));
    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
}

/// Download name for a flipbook of the given states.
pub fn file_name(states: &[String]) -> String {
    format!("recipes_{}.pdf", states.join("_"))
}

fn write_recipe(writer: &mut PageWriter<'_>, entry: &FlipbookEntry<'_>) {
    let recipe = entry.recipe;
    debug!("Adding flipbook page for {}", recipe.name);

    writer.centered(&recipe.name, 18.0, Style::Bold);
    writer.gap(4.0);

    if let Some(bytes) = &entry.image {
        match decode_image(bytes) {
            Ok(image) => writer.image(&image),
            Err(e) => warn!("Error adding image for {}: {}", recipe.name, e),
        }
    }

    writer.heading("Ingredients:");
    writer.paragraph(&recipe.ingredients, 12.0);
    writer.gap(4.0);

    writer.heading("Steps:");
    writer.paragraph(&format_steps(&recipe.steps), 12.0);
    writer.gap(4.0);

    writer.heading("Background:");
    writer.paragraph(&recipe.background, 12.0);
}

fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let decoded = image::load_from_memory(bytes).map_err(|e| AppError::ImageDecode(e.to_string()))?;
    // Flatten alpha so every format embeds the same way
    Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
}

#[derive(Clone, Copy)]
enum Style {
    Regular,
    Bold,
    Italic,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

/// Cursor over the document that adds pages as text runs out of room.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    fonts: Fonts,
    layer: PdfLayerReference,
    y: f32,
    page_no: usize,
}

impl<'a> PageWriter<'a> {
    fn new(doc: &'a PdfDocumentReference, fonts: Fonts, layer: PdfLayerReference) -> Self {
        let mut writer = Self {
            doc,
            fonts,
            layer,
            y: BODY_TOP,
            page_no: 1,
        };
        writer.decorate();
        writer
    }

    fn font(&self, style: Style) -> &IndirectFontRef {
        match style {
            Style::Regular => &self.fonts.regular,
            Style::Bold => &self.fonts.bold,
            Style::Italic => &self.fonts.italic,
        }
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_no += 1;
        self.y = BODY_TOP;
        self.decorate();
    }

    /// Running header and page number footer.
    fn decorate(&mut self) {
        let header_x = centered_x(RUNNING_HEADER, 12.0);
        self.layer.use_text(
            RUNNING_HEADER,
            12.0,
            Mm(header_x),
            Mm(PAGE_HEIGHT - 12.0),
            &self.fonts.bold,
        );

        let footer = format!("Page {}", self.page_no);
        let footer_x = centered_x(&footer, 8.0);
        self.layer
            .use_text(footer, 8.0, Mm(footer_x), Mm(8.0), &self.fonts.italic);
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < BODY_BOTTOM {
            self.new_page();
        }
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn line(&mut self, text: &str, size: f32, x: f32, style: Style) {
        let height = line_height(size);
        self.ensure_room(height);
        self.y -= height;
        self.layer
            .use_text(text, size, Mm(x), Mm(self.y), self.font(style));
    }

    fn centered(&mut self, text: &str, size: f32, style: Style) {
        for line in wrap_text(text, chars_per_line(size)) {
            let x = centered_x(&line, size);
            self.line(&line, size, x, style);
        }
    }

    fn heading(&mut self, text: &str) {
        self.line(text, 14.0, MARGIN, Style::Bold);
    }

    fn paragraph(&mut self, text: &str, size: f32) {
        for line in wrap_text(text, chars_per_line(size)) {
            self.line(&line, size, MARGIN, Style::Regular);
        }
    }

    fn image(&mut self, image: &DynamicImage) {
        let (width_px, height_px) = (image.width() as f32, image.height() as f32);
        if width_px == 0.0 || height_px == 0.0 {
            return;
        }

        // printpdf sizes images through their DPI
        let dpi = (width_px * 25.4 / IMAGE_WIDTH).max(height_px * 25.4 / IMAGE_MAX_HEIGHT);
        let height_mm = height_px * 25.4 / dpi;

        self.ensure_room(height_mm);
        self.y -= height_mm;
        Image::from_dynamic_image(image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(self.y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        self.gap(4.0);
    }
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.4
}

fn chars_per_line(size: f32) -> usize {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    ((usable / (size * PT_TO_MM * AVG_GLYPH_WIDTH)) as usize).max(1)
}

fn centered_x(text: &str, size: f32) -> f32 {
    let width = text.chars().count() as f32 * size * PT_TO_MM * AVG_GLYPH_WIDTH;
    ((PAGE_WIDTH - width) / 2.0).max(MARGIN)
}

/// Greedy word wrap. Existing line breaks are kept; overlong words are cut.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        lines.push(current);
    }
    lines
}
