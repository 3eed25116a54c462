//! All-of-N image preload

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::unbounded;
use image::{Rgba, RgbaImage};
use pond_core::{PondError, Result};
use pond_render::{Sprite, SpriteLibrary};

use crate::source::ImageSource;
use crate::types::{ImageDescriptor, LoadPolicy};

/// Cell size of generated placeholder sheets
const PLACEHOLDER_CELL: u32 = 16;

/// Outcome of a preload that did not abort
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PreloadReport {
    /// Names decoded successfully
    pub loaded: Vec<String>,
    /// Names that failed, whether skipped or replaced
    pub failed: Vec<String>,
}

/// Decode every descriptor concurrently, wait for all of them, then apply
/// `policy` and insert the results into `library`.
///
/// With [`LoadPolicy::Abort`] nothing is inserted when any image fails.
pub fn preload_images(
    source: &dyn ImageSource,
    descriptors: &[ImageDescriptor],
    policy: LoadPolicy,
    library: &mut SpriteLibrary,
) -> Result<PreloadReport> {
    log::info!("[assets] preloading {} images", descriptors.len());

    let results = decode_all(source, descriptors);

    let failures: Vec<(&ImageDescriptor, &PondError)> = descriptors
        .iter()
        .zip(&results)
        .filter_map(|(d, r)| r.as_ref().err().map(|e| (d, e)))
        .collect();

    if policy == LoadPolicy::Abort && !failures.is_empty() {
        let names: Vec<&str> = failures.iter().map(|(d, _)| d.name.as_str()).collect();
        for (_, err) in &failures {
            log::error!("[assets] {err}");
        }
        return Err(PondError::AssetError(format!(
            "failed to load {} image(s): {}",
            names.len(),
            names.join(", ")
        )));
    }

    let mut report = PreloadReport::default();
    let mut seen = HashSet::new();

    for (descriptor, result) in descriptors.iter().zip(results) {
        let bitmap = match result {
            Ok(bitmap) => {
                report.loaded.push(descriptor.name.clone());
                bitmap
            }
            Err(err) => {
                report.failed.push(descriptor.name.clone());
                match policy {
                    LoadPolicy::Skip => {
                        log::warn!("[assets] skipping '{}': {err}", descriptor.name);
                        continue;
                    }
                    _ => {
                        log::warn!("[assets] using placeholder for '{}': {err}", descriptor.name);
                        checker_placeholder(descriptor.sub_images, descriptor.per_row)
                    }
                }
            }
        };

        if library.contains(&descriptor.name) || !seen.insert(descriptor.name.as_str()) {
            log::warn!(
                "[assets] image '{}' is already loaded (overwriting anyway)",
                descriptor.name
            );
        }
        library.insert(
            descriptor.name.clone(),
            Sprite::new(Arc::new(bitmap), descriptor.sub_images, descriptor.per_row),
        );
    }

    log::info!(
        "[assets] all images loaded ({} ok, {} failed)",
        report.loaded.len(),
        report.failed.len()
    );
    Ok(report)
}

/// Run every decode on a scoped worker pool and return results in manifest order
fn decode_all(source: &dyn ImageSource, descriptors: &[ImageDescriptor]) -> Vec<Result<RgbaImage>> {
    if descriptors.is_empty() {
        return Vec::new();
    }

    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(descriptors.len());

    let (job_tx, job_rx) = unbounded::<usize>();
    let (done_tx, done_rx) = unbounded::<(usize, Result<RgbaImage>)>();

    for index in 0..descriptors.len() {
        // Receiver is alive until the scope below ends
        let _ = job_tx.send(index);
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                for index in job_rx.iter() {
                    let result = source.load(&descriptors[index]);
                    if done_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(done_tx);

    let mut results: Vec<Option<Result<RgbaImage>>> = descriptors.iter().map(|_| None).collect();
    for (index, result) in done_rx.iter() {
        results[index] = Some(result);
    }

    results
        .into_iter()
        .zip(descriptors)
        .map(|(r, d)| {
            r.unwrap_or_else(|| {
                Err(PondError::AssetError(format!(
                    "decode of '{}' never completed",
                    d.name
                )))
            })
        })
        .collect()
}

/// Magenta/black checker sheet with `sub_images` cells laid out `per_row` wide
pub fn checker_placeholder(sub_images: u32, per_row: u32) -> RgbaImage {
    let sub_images = sub_images.max(1);
    let per_row = per_row.max(1);
    let rows = sub_images.div_ceil(per_row);
    let half = PLACEHOLDER_CELL / 2;

    RgbaImage::from_fn(per_row * PLACEHOLDER_CELL, rows * PLACEHOLDER_CELL, |x, y| {
        if ((x / half) + (y / half)) % 2 == 0 {
            Rgba([255, 0, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryImageSource;

    fn manifest() -> Vec<ImageDescriptor> {
        vec![
            ImageDescriptor::new("frog_basic", "frog.png").sheet(4, 4),
            ImageDescriptor::new("fruit", "fruit.png").sheet(15, 8),
            ImageDescriptor::new("spacebar", "spacebar.png"),
        ]
    }

    fn source_without_fruit() -> MemoryImageSource {
        MemoryImageSource::new()
            .with("frog.png", RgbaImage::new(64, 16))
            .with("spacebar.png", RgbaImage::new(40, 12))
    }

    #[test]
    fn all_images_load() {
        let source = source_without_fruit().with("fruit.png", RgbaImage::new(128, 32));
        let mut library = SpriteLibrary::new();
        let report = preload_images(&source, &manifest(), LoadPolicy::Abort, &mut library).unwrap();

        assert_eq!(report.loaded, vec!["frog_basic", "fruit", "spacebar"]);
        assert!(report.failed.is_empty());
        let frog = library.get("frog_basic").unwrap();
        assert_eq!(frog.sub_images(), 4);
        assert_eq!(frog.width(), 16.0);
    }

    #[test]
    fn abort_names_failures_and_loads_nothing() {
        let source = source_without_fruit();
        let mut library = SpriteLibrary::new();
        let err = preload_images(&source, &manifest(), LoadPolicy::Abort, &mut library).unwrap_err();

        assert!(err.to_string().contains("fruit"));
        assert!(library.is_empty());
    }

    #[test]
    fn skip_leaves_failures_out() {
        let source = source_without_fruit();
        let mut library = SpriteLibrary::new();
        let report = preload_images(&source, &manifest(), LoadPolicy::Skip, &mut library).unwrap();

        assert_eq!(report.failed, vec!["fruit"]);
        assert_eq!(library.len(), 2);
        assert!(!library.contains("fruit"));
    }

    #[test]
    fn placeholder_keeps_requested_layout() {
        let source = source_without_fruit();
        let mut library = SpriteLibrary::new();
        preload_images(&source, &manifest(), LoadPolicy::Placeholder, &mut library).unwrap();

        let fruit = library.get("fruit").unwrap();
        assert_eq!(fruit.sub_images(), 15);
        assert_eq!(fruit.per_row(), 8);
        assert_eq!(fruit.bitmap().dimensions(), (8 * 16, 2 * 16));
        assert_eq!(fruit.width(), 16.0);
        assert_eq!(fruit.height(), 16.0);
    }

    #[test]
    fn reload_overwrites() {
        let mut library = SpriteLibrary::new();
        let first = MemoryImageSource::new().with("a.png", RgbaImage::new(4, 4));
        let second = MemoryImageSource::new().with("a.png", RgbaImage::new(8, 8));
        let manifest = vec![ImageDescriptor::new("a", "a.png")];

        preload_images(&first, &manifest, LoadPolicy::Abort, &mut library).unwrap();
        preload_images(&second, &manifest, LoadPolicy::Abort, &mut library).unwrap();
        assert_eq!(library.get("a").unwrap().width(), 8.0);
    }

    #[test]
    fn many_images_keep_manifest_order() {
        let mut source = MemoryImageSource::new();
        let mut manifest = Vec::new();
        for i in 0..32 {
            source.insert(format!("{i}.png"), RgbaImage::new(i + 1, 1));
            manifest.push(ImageDescriptor::new(format!("img{i}"), format!("{i}.png")));
        }
        let mut library = SpriteLibrary::new();
        let report = preload_images(&source, &manifest, LoadPolicy::Abort, &mut library).unwrap();

        assert_eq!(report.loaded.len(), 32);
        assert_eq!(report.loaded[7], "img7");
        assert_eq!(library.get("img7").unwrap().width(), 8.0);
    }

    #[test]
    fn empty_manifest() {
        let mut library = SpriteLibrary::new();
        let report =
            preload_images(&MemoryImageSource::new(), &[], LoadPolicy::Abort, &mut library).unwrap();
        assert_eq!(report, PreloadReport::default());
    }
}
