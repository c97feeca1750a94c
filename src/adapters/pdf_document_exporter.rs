use std::path::{Path, PathBuf};
use std::time::SystemTime;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::core::errors::ExportError;
use crate::core::interfaces::ports::{DocumentExporter, ExportedDocument};
use crate::global_constants::{
    DOCUMENT_FILE_EXTENSION, DOCUMENT_FILE_PREFIX, LOG_TAG_EXPORT, SCREENSHOT_FILE_EXTENSION,
};

/// Combines every PNG of a directory into one PDF, a page per image, oldest
/// first. Pages are sized to the image in pixels (1 px = 1 pt).
pub struct PdfDocumentExporter;

impl PdfDocumentExporter {
    pub fn build() -> Self {
        Self
    }

    pub fn collect_frames(frames_directory: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let entries = match std::fs::read_dir(frames_directory) {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ExportError::Io {
                    path: frames_directory.to_path_buf(),
                    source,
                })
            }
        };

        let mut frames: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ExportError::Io {
                path: frames_directory.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let is_png = path
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case(SCREENSHOT_FILE_EXTENSION));
            if !is_png || !path.is_file() {
                continue;
            }

            let modified = entry
                .metadata()
                .and_then(|metadata| metadata.modified())
                .map_err(|source| ExportError::Io {
                    path: path.clone(),
                    source,
                })?;
            frames.push((modified, path));
        }

        frames.sort_by(|(left_time, left_path), (right_time, right_path)| {
            left_time
                .cmp(right_time)
                .then_with(|| left_path.file_name().cmp(&right_path.file_name()))
        });

        Ok(frames.into_iter().map(|(_, path)| path).collect())
    }

    fn add_image_page(
        document: &mut Document,
        pages_id: ObjectId,
        page_number: usize,
        frame_path: &Path,
    ) -> Result<ObjectId, ExportError> {
        let image = image::open(frame_path)
            .map_err(|source| ExportError::Image {
                path: frame_path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let (width, height) = (i64::from(image.width()), i64::from(image.height()));

        let image_id = document.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
            },
            image.into_raw(),
        ));

        let image_name = format!("Im{}", page_number);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(image_name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));

        Ok(document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    image_name.as_str() => image_id,
                },
            },
        }))
    }
}

impl DocumentExporter for PdfDocumentExporter {
    fn export(
        &self,
        frames_directory: &Path,
        output_directory: &Path,
    ) -> Result<ExportedDocument, ExportError> {
        let frames = Self::collect_frames(frames_directory)?;
        if frames.is_empty() {
            log::warn!("{} No frames in {:?}", LOG_TAG_EXPORT, frames_directory);
            return Err(ExportError::NoFrames);
        }

        log::info!(
            "{} Exporting {} frames from {:?}",
            LOG_TAG_EXPORT,
            frames.len(),
            frames_directory
        );

        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        let mut page_ids = Vec::with_capacity(frames.len());
        for (index, frame_path) in frames.iter().enumerate() {
            page_ids.push(Self::add_image_page(
                &mut document,
                pages_id,
                index + 1,
                frame_path,
            )?);
        }

        let page_count = page_ids.len();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => page_count as i64,
        };
        document.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document.compress();

        std::fs::create_dir_all(output_directory).map_err(|source| ExportError::Io {
            path: output_directory.to_path_buf(),
            source,
        })?;

        let path = output_directory.join(format!(
            "{}_{}.{}",
            DOCUMENT_FILE_PREFIX,
            chrono::Utc::now().timestamp_millis(),
            DOCUMENT_FILE_EXTENSION
        ));
        document.save(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        log::info!(
            "{} Wrote {} pages to {:?}",
            LOG_TAG_EXPORT,
            page_count,
            path
        );

        Ok(ExportedDocument {
            path,
            pages: page_count,
        })
    }
}
