//! Animation assets
//!
//! An animation is described by a plain text descriptor: whitespace separated
//! tokens where a number sets the show time (seconds) of the frame named just
//! before it, and any other token is an image file relative to the descriptor.
//! Decimal commas are accepted. Frames whose image cannot be read are skipped
//! with a warning so a level still starts with whatever loaded.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;

use crate::error::EngineError;

/// Show time for a frame whose descriptor gives none
pub const DEFAULT_SHOW_TIME: f32 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Image reference handed to the render sink
    pub image: String,
    /// Natural pixel size
    pub size: Vec2,
    /// Seconds this frame stays on screen
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: String,
    pub frames: Vec<Frame>,
}

impl Animation {
    /// Single-frame stand-in used when a descriptor cannot be loaded
    pub fn placeholder(name: &str, size: Vec2) -> Self {
        Self {
            name: name.to_string(),
            frames: vec![Frame {
                image: format!("missing:{name}"),
                size,
                duration: DEFAULT_SHOW_TIME,
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Largest width and largest height over all frames
    pub fn max_size(&self) -> Vec2 {
        self.frames
            .iter()
            .fold(Vec2::ZERO, |acc, frame| acc.max(frame.size))
    }
}

pub trait AssetLoader {
    fn load_animation(&mut self, name: &str) -> Result<Arc<Animation>, EngineError>;
}

/// Loads `<root>/<name>.txt` descriptors from disk and caches the result.
#[derive(Debug)]
pub struct DescriptorLoader {
    root: PathBuf,
    cache: HashMap<String, Arc<Animation>>,
}

impl DescriptorLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    fn read_animation(&self, name: &str) -> Result<Animation, EngineError> {
        let path = self.root.join(format!("{name}.txt"));
        let text = std::fs::read_to_string(&path).map_err(|e| EngineError::AssetLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let base = path.parent().unwrap_or(Path::new("."));

        let mut frames = Vec::new();
        for (file, duration) in parse_descriptor(&text) {
            let image_path = base.join(&file);
            match image::image_dimensions(&image_path) {
                Ok((w, h)) => {
                    log::debug!("Frame {} loaded ({w}x{h})", image_path.display());
                    frames.push(Frame {
                        image: image_path.display().to_string(),
                        size: Vec2::new(w as f32, h as f32),
                        duration,
                    });
                }
                Err(e) => log::warn!("Skipping frame {}: {e}", image_path.display()),
            }
        }

        if frames.is_empty() {
            log::warn!("Animation '{name}' has no usable frames");
        }
        Ok(Animation {
            name: name.to_string(),
            frames,
        })
    }
}

impl AssetLoader for DescriptorLoader {
    fn load_animation(&mut self, name: &str) -> Result<Arc<Animation>, EngineError> {
        if let Some(anim) = self.cache.get(name) {
            return Ok(Arc::clone(anim));
        }
        let anim = Arc::new(self.read_animation(name)?);
        log::info!("Loaded animation '{name}' with {} frames", anim.frames.len());
        self.cache.insert(name.to_string(), Arc::clone(&anim));
        Ok(anim)
    }
}

/// Pair each image token with the show time that follows it.
pub fn parse_descriptor(text: &str) -> Vec<(String, f32)> {
    let mut entries: Vec<(String, f32)> = Vec::new();
    let mut timed = true;

    for token in text.split_whitespace() {
        match parse_seconds(token) {
            Some(secs) => {
                if let Some(last) = entries.last_mut().filter(|_| !timed) {
                    last.1 = secs;
                    timed = true;
                } else {
                    log::warn!("Show time {token} has no frame, ignored");
                }
            }
            None => {
                entries.push((token.to_string(), DEFAULT_SHOW_TIME));
                timed = false;
            }
        }
    }
    entries
}

fn parse_seconds(token: &str) -> Option<f32> {
    token.replace(',', ".").parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("arcade-assets-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_descriptor_pairs_times() {
        let entries = parse_descriptor("a.png 0,25\nb.png 0.5 c.png");
        assert_eq!(
            entries,
            vec![
                ("a.png".to_string(), 0.25),
                ("b.png".to_string(), 0.5),
                ("c.png".to_string(), DEFAULT_SHOW_TIME),
            ]
        );
    }

    #[test]
    fn test_parse_descriptor_ignores_orphan_time() {
        let entries = parse_descriptor("0.3 a.png 0.2 0.9");
        assert_eq!(entries, vec![("a.png".to_string(), 0.2)]);
    }

    #[test]
    fn test_missing_descriptor_is_asset_error() {
        let mut loader = DescriptorLoader::new(scratch_dir("missing"));
        assert!(matches!(
            loader.load_animation("nothing-here"),
            Err(EngineError::AssetLoad { .. })
        ));
    }

    #[test]
    fn test_unreadable_frames_are_skipped() {
        let dir = scratch_dir("skip");
        image::RgbaImage::new(4, 6).save(dir.join("ok.png")).unwrap();
        std::fs::write(dir.join("alien.txt"), "ok.png 0,2 gone.png 0,3").unwrap();

        let mut loader = DescriptorLoader::new(&dir);
        let anim = loader.load_animation("alien").unwrap();
        assert_eq!(anim.frames.len(), 1);
        assert_eq!(anim.frames[0].size, Vec2::new(4.0, 6.0));
        assert!((anim.frames[0].duration - 0.2).abs() < 1e-6);

        // second load comes from the cache
        let again = loader.load_animation("alien").unwrap();
        assert!(Arc::ptr_eq(&anim, &again));
    }

    #[test]
    fn test_max_size_over_frames() {
        let anim = Animation {
            name: "x".into(),
            frames: vec![
                Frame {
                    image: "a".into(),
                    size: Vec2::new(10.0, 4.0),
                    duration: 0.1,
                },
                Frame {
                    image: "b".into(),
                    size: Vec2::new(6.0, 12.0),
                    duration: 0.1,
                },
            ],
        };
        assert_eq!(anim.max_size(), Vec2::new(10.0, 12.0));
    }
}
