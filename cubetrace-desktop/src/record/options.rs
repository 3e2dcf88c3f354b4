//! Options controlling recording.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Placeholder in [`RecordOptions::output_path`] which is replaced by the frame number.
pub const FRAME_NUMBER_PLACEHOLDER: &str = "{n}";

/// Options for recording and output in [`record_main()`](super::record_main).
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct RecordOptions {
    /// Where to write the image. For an animation, `{n}` in the file name is replaced
    /// by the frame number.
    pub output_path: PathBuf,
    /// Animation time, in seconds, of the first (or only) frame.
    pub start_time: f64,
    /// If present, render a sequence of frames instead of a single image.
    pub animation: Option<RecordAnimationOptions>,
}

/// Frame count and rate of an animation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct RecordAnimationOptions {
    /// Number of frames, at least 1.
    pub frame_count: usize,
    /// Animation time between frames.
    pub frame_period: Duration,
}

impl RecordOptions {
    /// Options for a single image.
    pub fn still(output_path: PathBuf, start_time: f64) -> Self {
        Self {
            output_path,
            start_time,
            animation: None,
        }
    }

    /// Options for `frame_count` frames at `fps` frames per second.
    ///
    /// Returns [`None`] if `fps` is not a positive finite number.
    #[must_use]
    pub fn animated(self, frame_count: usize, fps: f64) -> Option<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return None;
        }
        Some(Self {
            animation: Some(RecordAnimationOptions {
                frame_count: frame_count.max(1),
                frame_period: Duration::try_from_secs_f64(fps.recip()).ok()?,
            }),
            ..self
        })
    }

    pub(crate) fn frame_range(&self) -> Range<usize> {
        match &self.animation {
            None => 0..1,
            Some(animation) => 0..animation.frame_count,
        }
    }

    /// Animation time of the given frame.
    pub(crate) fn frame_time(&self, frame: usize) -> f64 {
        match &self.animation {
            None => self.start_time,
            Some(animation) => {
                self.start_time + animation.frame_period.as_secs_f64() * frame as f64
            }
        }
    }

    /// File the given frame is written to.
    ///
    /// A still image goes to [`Self::output_path`] unchanged. Animation frames replace
    /// [`FRAME_NUMBER_PLACEHOLDER`] with the zero-padded frame number, or if there is
    /// none, add the number before the extension.
    pub fn path_for_frame(&self, frame: usize) -> PathBuf {
        if self.animation.is_none() {
            return self.output_path.clone();
        }
        let number = format!("{frame:04}");
        let file_name = self
            .output_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let numbered = if file_name.contains(FRAME_NUMBER_PLACEHOLDER) {
            file_name.replace(FRAME_NUMBER_PLACEHOLDER, &number)
        } else {
            let stem = Path::new(&file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match Path::new(&file_name).extension() {
                Some(ext) => format!("{stem}-{number}.{ext}", ext = ext.to_string_lossy()),
                None => format!("{stem}-{number}"),
            }
        };
        self.output_path.with_file_name(numbered)
    }
}

impl RecordAnimationOptions {
    pub(crate) fn total_duration(&self) -> Duration {
        self.frame_period * u32::try_from(self.frame_count).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn still_path_is_unchanged() {
        let options = RecordOptions::still(PathBuf::from("out/{n}.png"), 0.0);
        assert_eq!(options.frame_range(), 0..1);
        assert_eq!(options.path_for_frame(0), PathBuf::from("out/{n}.png"));
    }

    #[test]
    fn animation_paths_are_numbered() {
        let options = RecordOptions::still(PathBuf::from("out/frame_{n}.png"), 1.0)
            .animated(3, 2.0)
            .unwrap();
        assert_eq!(options.frame_range(), 0..3);
        assert_eq!(options.path_for_frame(2), PathBuf::from("out/frame_0002.png"));
        assert_eq!(options.frame_time(0), 1.0);
        assert_eq!(options.frame_time(2), 2.0);
        assert_eq!(
            options.animation.as_ref().map(RecordAnimationOptions::total_duration),
            Some(Duration::from_millis(1500))
        );

        let unmarked = RecordOptions::still(PathBuf::from("shot.png"), 0.0)
            .animated(2, 30.0)
            .unwrap();
        assert_eq!(unmarked.path_for_frame(1), PathBuf::from("shot-0001.png"));
    }

    #[test]
    fn bad_frame_rate() {
        let options = RecordOptions::still(PathBuf::from("a.png"), 0.0);
        assert_eq!(options.clone().animated(10, 0.0), None);
        assert_eq!(options.animated(10, f64::NAN), None);
    }
}
