#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use image_export::*;
use std::io::Cursor;
use std::sync::Mutex;

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

/// Solid opaque PNG of the given size, as a data URI
pub fn png_uri(width: u32, height: u32, color: [u8; 4]) -> String {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)));
    data_uri("image/png", &encode(&img, ImageFormat::Png))
}

/// Solid JPEG of the given size, as a data URI
pub fn jpeg_uri(width: u32, height: u32, color: [u8; 3]) -> String {
    let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb(color),
    ));
    data_uri("image/jpeg", &encode(&img, ImageFormat::Jpeg))
}

/// PNG whose left half is fully transparent and right half opaque red
pub fn half_transparent_png() -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(16, 8, Rgba([0, 0, 0, 0]));
    for y in 0..8 {
        for x in 8..16 {
            img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
    }
    encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Declared PNG whose bytes are not an image
pub fn broken_uri() -> String {
    data_uri("image/png", b"definitely not a png")
}

pub fn missing_uri() -> String {
    "/nonexistent/exports/missing.png".to_string()
}

/// Resources whose index is encoded in the logical name
pub fn resources(sources: Vec<String>) -> Vec<ImageResource> {
    sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| ImageResource::new(source, format!("result-{i}.png")))
        .collect()
}

/// Save target that keeps every artifact in memory
#[derive(Default)]
pub struct MemoryTarget {
    pub saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryTarget {
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl SaveTarget for MemoryTarget {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        // Suspend like a real save would
        tokio::task::yield_now().await;
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes));
        Ok(())
    }
}

/// Save target that always fails
pub struct FailingTarget;

impl SaveTarget for FailingTarget {
    async fn save(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<()> {
        Err(ExportError::Io(std::io::Error::other("disk full")))
    }
}

pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).unwrap();
        entries.push((file.name().to_string(), contents));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

/// Width and height of the image drawn on each page, in page order
pub fn pdf_page_images(bytes: &[u8]) -> Vec<(i64, i64)> {
    use lopdf::content::Content;
    use lopdf::{Dictionary, Document, Object};

    fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Dictionary {
        match obj {
            Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
            Object::Dictionary(dict) => dict,
            other => panic!("Expected dictionary, got {other:?}"),
        }
    }

    let doc = Document::load_mem(bytes).unwrap();
    let mut result = Vec::new();

    for (_, page_id) in doc.get_pages() {
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let name = content
            .operations
            .iter()
            .find(|op| op.operator == "Do")
            .and_then(|op| op.operands.first())
            .and_then(|obj| obj.as_name().ok())
            .expect("page draws an XObject")
            .to_vec();

        // Resources may sit on the page or be inherited from the page tree
        let mut node = doc.get_dictionary(page_id).unwrap();
        let resources = loop {
            if let Ok(res) = node.get(b"Resources") {
                break resolve(&doc, res);
            }
            node = resolve(&doc, node.get(b"Parent").unwrap());
        };

        let xobjects = resolve(&doc, resources.get(b"XObject").unwrap());
        let stream_id = xobjects.get(&name).unwrap().as_reference().unwrap();
        let stream = doc.get_object(stream_id).unwrap().as_stream().unwrap();
        let width = stream.dict.get(b"Width").unwrap().as_i64().unwrap();
        let height = stream.dict.get(b"Height").unwrap().as_i64().unwrap();
        result.push((width, height));
    }

    result
}
