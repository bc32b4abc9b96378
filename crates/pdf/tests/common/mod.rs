//! In-memory PDF fixtures built with `lopdf`.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

pub const LETTER: [i64; 4] = [0, 0, 612, 792];

pub struct PdfBuilder {
    pub doc: Document,
    pub catalog: Dictionary,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    fonts: Dictionary,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "Custom-Regular",
            "Flags" => 262144,
            "CapHeight" => 500,
        });
        let custom_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Custom-Regular",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(500), Object::Integer(250)],
            "FontDescriptor" => descriptor_id,
        });
        let italic_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Times-Italic",
        });

        let fonts = dictionary! {
            "F1" => bold_id,
            "F2" => custom_id,
            "F3" => italic_id,
        };

        Self {
            doc,
            catalog: dictionary! { "Type" => "Catalog" },
            pages_id,
            page_ids: Vec::new(),
            fonts,
        }
    }

    /// Add a Letter-sized page.
    pub fn page(&mut self, ops: Vec<Operation>) -> ObjectId {
        self.page_with_boxes(ops, LETTER, None)
    }

    pub fn page_with_boxes(
        &mut self,
        ops: Vec<Operation>,
        media_box: [i64; 4],
        crop_box: Option<[i64; 4]>,
    ) -> ObjectId {
        let content = Content { operations: ops };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "MediaBox" => numbers(media_box),
            "Resources" => dictionary! { "Font" => self.fonts.clone() },
        };
        if let Some(crop) = crop_box {
            page.set("CropBox", numbers(crop));
        }

        let page_id = self.doc.add_object(page);
        self.page_ids.push(page_id);
        page_id
    }

    /// Insert an object under a pre-allocated id.
    pub fn insert(&mut self, id: ObjectId, dict: Dictionary) {
        self.doc.objects.insert(id, Object::Dictionary(dict));
    }

    pub fn finish(mut self) -> Vec<u8> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| (*id).into()).collect();
        let count = kids.len() as i64;
        self.insert(
            self.pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            },
        );

        let mut catalog = std::mem::replace(&mut self.catalog, Dictionary::new());
        catalog.set("Pages", self.pages_id);
        let catalog_id = self.doc.add_object(catalog);
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc.save_to(&mut buf).unwrap();
        buf
    }
}

pub fn numbers(values: [i64; 4]) -> Object {
    Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
}

pub fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

/// `BT /font size Tf x y Td (text) Tj ET`
pub fn text_ops(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        op("BT", vec![]),
        op("Tf", vec![font.into(), size.into()]),
        op("Td", vec![x.into(), y.into()]),
        op("Tj", vec![Object::string_literal(text)]),
        op("ET", vec![]),
    ]
}

pub fn array(items: Vec<Object>) -> Object {
    Object::Array(items)
}
