//! On-disk action layout read by the device daemon.
//!
//! ```text
//! <actions_dir>/
//!   buttons/      button-N.sh, button-N.txt, button-N-position.txt,
//!                 button-N-fontsize.txt, button-N.png|jpg|jpeg
//!   dials/        dial-N-{cw,ccw,press,longpress}.sh
//!   touchscreen/  touch-N.sh, touch-N-{longpress,swipe-*}.sh, touch-N.txt, ...
//!                 longswipe-{left,right}.sh
//! ```

pub mod element;


pub use element::{
    DialAction, ElementId, ElementKind, FontSizeLimits, SwipeSide, TextPosition, TouchAction,
};

use crate::input::InputEvent;
use crate::script::{self, ScriptFormat};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Image extensions the daemon loads, in lookup order.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

const SCRIPT_EXTENSION: &str = "sh";

/// Errors from reading or writing the actions directory.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid element '{0}': {1}")]
    InvalidElement(String, String),

    #[error("{0} has no label, position, font size or image")]
    NoDisplay(ElementId),

    #[error("{0} have no label, position, font size or image")]
    KindHasNoDisplay(ElementKind),

    #[error("Font size {size} for {id} is out of range ({min}-{max})")]
    FontSizeOutOfRange {
        id: ElementId,
        size: u32,
        min: u32,
        max: u32,
    },

    #[error("Unsupported image type for {0} (expected png, jpg or jpeg)")]
    UnsupportedImage(PathBuf),

    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_error(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> LayoutError {
    let path = path.to_path_buf();
    move |source| LayoutError::Io {
        action,
        path,
        source,
    }
}

/// Result of assigning a recording to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// Script written to this path
    Written(PathBuf),
    /// Zero events; nothing was written
    Skipped,
}

/// Snapshot of one element's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStatus {
    pub id: ElementId,
    pub script: Option<PathBuf>,
    pub executable: bool,
    /// Summary of the script, see [`script::summary`].
    pub description: Option<String>,
    pub label: Option<String>,
    /// Display attributes; `None` for elements that do not own a display.
    pub text_position: Option<TextPosition>,
    pub font_size: Option<u32>,
    pub image: Option<PathBuf>,
}

impl ElementStatus {
    /// True when any file exists for the element.
    pub fn is_configured(&self) -> bool {
        self.script.is_some() || self.label.is_some() || self.image.is_some()
    }
}

/// Files read and written under one actions directory.
#[derive(Debug, Clone)]
pub struct ActionLayout {
    root: PathBuf,
}

impl ActionLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: ElementKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Creates the root and the per-kind subdirectories.
    pub fn ensure_dirs(&self) -> Result<(), LayoutError> {
        for kind in [ElementKind::Button, ElementKind::Dial, ElementKind::Touch] {
            let dir = self.dir(kind);
            if !dir.exists() {
                info!("Creating actions directory: {}", dir.display());
                fs::create_dir_all(&dir).map_err(io_error("create", &dir))?;
            }
        }
        Ok(())
    }

    pub fn script_path(&self, id: ElementId) -> PathBuf {
        self.dir(id.kind())
            .join(format!("{}.{SCRIPT_EXTENSION}", id.stem()))
    }

    pub fn label_path(&self, id: ElementId) -> Result<PathBuf, LayoutError> {
        self.display_path(id, ".txt")
    }

    pub fn position_path(&self, id: ElementId) -> Result<PathBuf, LayoutError> {
        self.display_path(id, "-position.txt")
    }

    pub fn font_size_path(&self, id: ElementId) -> Result<PathBuf, LayoutError> {
        self.display_path(id, "-fontsize.txt")
    }

    fn display_path(&self, id: ElementId, suffix: &str) -> Result<PathBuf, LayoutError> {
        let stem = id.display_stem().ok_or(LayoutError::NoDisplay(id))?;
        Ok(self.dir(id.kind()).join(format!("{stem}{suffix}")))
    }

    fn image_candidates(&self, id: ElementId) -> Result<Vec<PathBuf>, LayoutError> {
        let stem = id.display_stem().ok_or(LayoutError::NoDisplay(id))?;
        let dir = self.dir(id.kind());
        Ok(IMAGE_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .collect())
    }

    /// Writes `contents` as the element's script and marks it executable.
    pub fn write_script(&self, id: ElementId, contents: &str) -> Result<PathBuf, LayoutError> {
        self.ensure_dirs()?;
        let path = self.script_path(id);
        fs::write(&path, contents).map_err(io_error("write", &path))?;
        make_executable(&path)?;
        info!("Wrote {} script: {}", id, path.display());
        Ok(path)
    }

    /// Compiles `events` and stores the result for `id`.
    ///
    /// An empty recording counts as cancelled: nothing is written and any
    /// existing script is left alone.
    pub fn assign_recording(
        &self,
        id: ElementId,
        events: &[InputEvent],
        format: &ScriptFormat,
    ) -> Result<AssignOutcome, LayoutError> {
        if events.is_empty() {
            debug!("No events recorded for {}, leaving it unchanged", id);
            return Ok(AssignOutcome::Skipped);
        }
        let script = format.compile(events);
        self.write_script(id, &script).map(AssignOutcome::Written)
    }

    /// Copies an existing script file in as the element's script.
    pub fn install_script(&self, id: ElementId, source: &Path) -> Result<PathBuf, LayoutError> {
        let contents = fs::read_to_string(source).map_err(io_error("read", source))?;
        if script::command_count(&contents) == 0 {
            warn!("{} contains no commands", source.display());
        }
        self.write_script(id, &contents)
    }

    pub fn read_script(&self, id: ElementId) -> Result<Option<String>, LayoutError> {
        let path = self.script_path(id);
        read_optional(&path)
    }

    /// Returns true if a script was removed.
    pub fn remove_script(&self, id: ElementId) -> Result<bool, LayoutError> {
        remove_file_if_exists(&self.script_path(id))
    }

    /// Sets the label text. An empty (or whitespace) label removes the file.
    pub fn set_label(&self, id: ElementId, text: &str) -> Result<(), LayoutError> {
        let path = self.label_path(id)?;
        if text.trim().is_empty() {
            remove_file_if_exists(&path)?;
            return Ok(());
        }
        self.write_attribute(&path, text)
    }

    pub fn label(&self, id: ElementId) -> Result<Option<String>, LayoutError> {
        let path = self.label_path(id)?;
        Ok(read_optional(&path)?
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()))
    }

    pub fn set_text_position(
        &self,
        id: ElementId,
        position: TextPosition,
    ) -> Result<(), LayoutError> {
        let path = self.position_path(id)?;
        self.write_attribute(&path, position.as_str())
    }

    /// Stored text position; missing or unreadable values fall back to the
    /// element's default.
    pub fn text_position(&self, id: ElementId) -> Result<TextPosition, LayoutError> {
        let default = id
            .default_text_position()
            .ok_or(LayoutError::NoDisplay(id))?;
        let path = self.position_path(id)?;
        Ok(match read_optional(&path)? {
            Some(text) => text.parse().unwrap_or_else(|err| {
                warn!("{}: {}; using {}", path.display(), err, default);
                default
            }),
            None => default,
        })
    }

    pub fn set_font_size(&self, id: ElementId, size: u32) -> Result<(), LayoutError> {
        let limits = id.font_size_limits().ok_or(LayoutError::NoDisplay(id))?;
        if !limits.contains(size) {
            return Err(LayoutError::FontSizeOutOfRange {
                id,
                size,
                min: limits.min,
                max: limits.max,
            });
        }
        let path = self.font_size_path(id)?;
        self.write_attribute(&path, &size.to_string())
    }

    /// Applies one font size to every button or every touch zone.
    ///
    /// The size is checked before anything is written. Returns the updated elements.
    pub fn set_font_size_all(
        &self,
        kind: ElementKind,
        size: u32,
    ) -> Result<Vec<ElementId>, LayoutError> {
        let ids = kind.display_elements();
        if ids.is_empty() {
            return Err(LayoutError::KindHasNoDisplay(kind));
        }
        for id in &ids {
            let limits = id.font_size_limits().ok_or(LayoutError::NoDisplay(*id))?;
            if !limits.contains(size) {
                return Err(LayoutError::FontSizeOutOfRange {
                    id: *id,
                    size,
                    min: limits.min,
                    max: limits.max,
                });
            }
        }
        for id in &ids {
            self.set_font_size(*id, size)?;
        }
        info!("Font size {} applied to all {}", size, kind);
        Ok(ids)
    }

    /// Stored font size; missing, malformed or out-of-range values fall back to the default.
    pub fn font_size(&self, id: ElementId) -> Result<u32, LayoutError> {
        let limits = id.font_size_limits().ok_or(LayoutError::NoDisplay(id))?;
        let path = self.font_size_path(id)?;
        let Some(text) = read_optional(&path)? else {
            return Ok(limits.default);
        };
        match text.trim().parse::<u32>() {
            Ok(size) if limits.contains(size) => Ok(size),
            _ => {
                warn!(
                    "{}: invalid font size '{}'; using {}",
                    path.display(),
                    text.trim(),
                    limits.default
                );
                Ok(limits.default)
            }
        }
    }

    /// Copies `source` in as the element's image, removing images stored under
    /// the other extensions.
    pub fn set_image(&self, id: ElementId, source: &Path) -> Result<PathBuf, LayoutError> {
        let ext = source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| LayoutError::UnsupportedImage(source.to_path_buf()))?;

        let candidates = self.image_candidates(id)?;
        self.ensure_dirs()?;
        for candidate in &candidates {
            if candidate.extension().and_then(|e| e.to_str()) != Some(ext.as_str()) {
                remove_file_if_exists(candidate)?;
            }
        }

        let stem = id.display_stem().ok_or(LayoutError::NoDisplay(id))?;
        let target = self.dir(id.kind()).join(format!("{stem}.{ext}"));
        fs::copy(source, &target).map_err(io_error("copy image to", &target))?;
        info!("Set {} image: {}", id, target.display());
        Ok(target)
    }

    /// First stored image in lookup order.
    pub fn image(&self, id: ElementId) -> Result<Option<PathBuf>, LayoutError> {
        Ok(self
            .image_candidates(id)?
            .into_iter()
            .find(|path| path.is_file()))
    }

    pub fn remove_image(&self, id: ElementId) -> Result<bool, LayoutError> {
        let mut removed = false;
        for candidate in self.image_candidates(id)? {
            removed |= remove_file_if_exists(&candidate)?;
        }
        Ok(removed)
    }

    /// Removes the element's script and, if it owns the display, its label,
    /// text position, font size and image. Returns the number of files removed.
    pub fn clear_element(&self, id: ElementId) -> Result<usize, LayoutError> {
        let mut removed = usize::from(self.remove_script(id)?);
        if id.owns_display() {
            for path in [
                self.label_path(id)?,
                self.position_path(id)?,
                self.font_size_path(id)?,
            ] {
                removed += usize::from(remove_file_if_exists(&path)?);
            }
            for candidate in self.image_candidates(id)? {
                removed += usize::from(remove_file_if_exists(&candidate)?);
            }
        }
        debug!("Cleared {} ({} file(s))", id, removed);
        Ok(removed)
    }

    pub fn inspect(&self, id: ElementId) -> Result<ElementStatus, LayoutError> {
        let script_path = self.script_path(id);
        let script = script_path.is_file().then_some(script_path);
        let executable = script.as_deref().is_some_and(is_executable);
        let description = match &script {
            Some(_) => self
                .read_script(id)?
                .and_then(|contents| script::summary(&contents)),
            None => None,
        };

        let mut status = ElementStatus {
            id,
            script,
            executable,
            description,
            label: None,
            text_position: None,
            font_size: None,
            image: None,
        };

        if id.owns_display() {
            status.label = self.label(id)?;
            status.text_position = Some(self.text_position(id)?);
            status.font_size = Some(self.font_size(id)?);
            status.image = self.image(id)?;
        }

        Ok(status)
    }

    pub fn inspect_all(&self) -> Result<Vec<ElementStatus>, LayoutError> {
        ElementId::all()
            .into_iter()
            .map(|id| self.inspect(id))
            .collect()
    }

    fn write_attribute(&self, path: &Path, value: &str) -> Result<(), LayoutError> {
        self.ensure_dirs()?;
        fs::write(path, value).map_err(io_error("write", path))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, LayoutError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error("read", path)(err)),
    }
}

fn remove_file_if_exists(path: &Path) -> Result<bool, LayoutError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(io_error("remove", path)(err)),
    }
}

fn make_executable(path: &Path) -> Result<(), LayoutError> {
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o755))
            .map_err(io_error("set permissions on", path))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
