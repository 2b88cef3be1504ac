//! Serialise laid-out pages with `printpdf`.

use printpdf::{
  BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};

use crate::{
  RenderError, Result,
  layout::{Page, PageGeometry, Placed, PlacedText},
  style::{FontFace, Rgb},
};

const LAYER: &str = "Content";

fn mm(pt: f32) -> Mm { Mm(pt * 25.4 / 72.0) }

fn color(c: Rgb) -> Color { Color::Rgb(printpdf::Rgb::new(c.0, c.1, c.2, None)) }

fn pdf_error(e: impl std::fmt::Display) -> RenderError { RenderError::Pdf(e.to_string()) }

struct Fonts {
  regular: IndirectFontRef,
  bold:    IndirectFontRef,
}

impl Fonts {
  fn get(&self, face: FontFace) -> &IndirectFontRef {
    match face {
      FontFace::Regular => &self.regular,
      FontFace::Bold => &self.bold,
    }
  }
}

/// Write `pages` into a PDF titled `title` and return its bytes.
pub fn write(title: &str, pages: &[Page], geometry: &PageGeometry) -> Result<Vec<u8>> {
  let (w, h) = (mm(geometry.width), mm(geometry.height));
  let (doc, first_page, first_layer) = PdfDocument::new(title, w, h, LAYER);

  let fonts = Fonts {
    regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
    bold:    doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
  };

  for (i, page) in pages.iter().enumerate() {
    let layer = if i == 0 {
      doc.get_page(first_page).get_layer(first_layer)
    } else {
      let (p, l) = doc.add_page(w, h, LAYER);
      doc.get_page(p).get_layer(l)
    };
    for item in &page.items {
      match item {
        Placed::Text(text) => draw_text(&layer, &fonts, text),
        Placed::Rule { x1, x2, y, thickness } => {
          layer.set_outline_color(color(Rgb::BLACK));
          layer.set_outline_thickness(*thickness);
          layer.add_line(Line {
            points:    vec![(Point::new(mm(*x1), mm(*y)), false), (Point::new(mm(*x2), mm(*y)), false)],
            is_closed: false,
          });
        }
      }
    }
  }

  doc.save_to_bytes().map_err(pdf_error)
}

fn draw_text(layer: &PdfLayerReference, fonts: &Fonts, text: &PlacedText) {
  layer.set_fill_color(color(text.color));
  layer.use_text(text.text.as_str(), text.size, mm(text.x), mm(text.y), fonts.get(text.font));
}
