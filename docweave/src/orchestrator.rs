//! Wiring between file acquisition, the editing surface, and file saving
//!
//! The orchestrator owns the surface exclusively; every operation takes
//! `&mut self`, so an import and an export can never interleave. Failures are
//! handed to the [`Notifier`] once and returned; nothing is retried.

use crate::config::EditorConfig;
use crate::error::{EditorError, ValidationError};
use crate::import::{BinaryToMarkup, DocxMarkupConverter};
use crate::serialize::{writer_for, ModelToBinary};
use crate::transcoder::{DroppedNode, ExportTranscoder};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Callback invoked with the new markup after every user edit
pub type UpdateListener = Box<dyn FnMut(&str)>;

/// The live rich-text content the user is editing
pub trait EditingSurface {
    /// Current content as markup
    fn snapshot(&self) -> String;

    /// Replace the whole content, as when a document is loaded
    fn replace(&mut self, markup: &str);
}

/// Editing surface held in memory
#[derive(Default)]
pub struct MemorySurface {
    content: String,
    listeners: Vec<UpdateListener>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to edit notifications
    pub fn on_update(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a user edit and notify subscribers
    pub fn edit(&mut self, markup: &str) {
        self.content = markup.to_string();
        for listener in &mut self.listeners {
            listener(&self.content);
        }
    }
}

impl EditingSurface for MemorySurface {
    fn snapshot(&self) -> String {
        self.content.clone()
    }

    // Loading a document is not a user edit; subscribers are not notified
    fn replace(&mut self, markup: &str) {
        self.content = markup.to_string();
    }
}

impl std::fmt::Debug for MemorySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySurface")
            .field("content", &self.content)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Where exported documents are written
pub trait SaveTarget {
    /// Persist the bytes under `filename`, returning where they went
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Saves into a directory, never leaving a partially written file behind
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// Accept only a bare file name, so saves stay inside the target directory
fn check_file_name(filename: &str) -> io::Result<()> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not a plain file name", filename),
        )),
    }
}

impl SaveTarget for DirectoryTarget {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        check_file_name(filename)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(filename);
        let partial = self.dir.join(format!("{}.partial", filename));

        let written = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, &path));
        if let Err(e) = written {
            // Best effort: the partial file may not exist
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Presents failures to the user
pub trait Notifier {
    fn report(&mut self, error: &EditorError);
}

/// Reports through the log and on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn report(&mut self, error: &EditorError) {
        log::error!("{}", error);
        eprintln!("Error: {}", error);
    }
}

/// Outcome of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Where the document was saved
    pub path: PathBuf,
    /// Paragraphs written
    pub paragraphs: usize,
    /// Size of the package
    pub bytes_written: usize,
    /// Top-level nodes that produced no paragraph
    pub dropped: Vec<DroppedNode>,
}

/// Drives import into and export out of an editing surface
pub struct Orchestrator<S: EditingSurface, T: SaveTarget> {
    surface: S,
    target: T,
    notifier: Box<dyn Notifier>,
    importer: Box<dyn BinaryToMarkup>,
    writer: Box<dyn ModelToBinary>,
    transcoder: ExportTranscoder,
    config: EditorConfig,
}

impl<S: EditingSurface, T: SaveTarget> Orchestrator<S, T> {
    /// Create an orchestrator using the DOCX importer and the configured engine
    pub fn new(surface: S, target: T, config: EditorConfig) -> Self {
        Self {
            surface,
            target,
            notifier: Box::new(LogNotifier),
            importer: Box::new(DocxMarkupConverter),
            writer: writer_for(config.engine),
            transcoder: ExportTranscoder::new(config.walk),
            config,
        }
    }

    /// Replace the notifier
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Replace the importer
    pub fn with_importer(mut self, importer: impl BinaryToMarkup + 'static) -> Self {
        self.importer = Box::new(importer);
        self
    }

    /// Replace the serializer
    pub fn with_writer(mut self, writer: impl ModelToBinary + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// A file was picked: validate it, import it, and show it on the surface
    ///
    /// On failure the surface keeps its previous content.
    pub fn on_file_acquired(&mut self, filename: &str, bytes: &[u8]) -> Result<(), EditorError> {
        let result = self.import_file(filename, bytes);
        match result {
            Ok(markup) => {
                self.surface.replace(&markup);
                Ok(())
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Export the surface content and save it under the configured file name
    pub fn on_export_requested(&mut self) -> Result<ExportSummary, EditorError> {
        let result = self.export_surface();
        if let Err(e) = &result {
            self.on_save_failure(e);
        }
        result
    }

    /// An export could not produce or save the document; there is no automatic retry
    pub fn on_save_failure(&mut self, error: &EditorError) {
        log::warn!("Export of {} failed", self.config.output_filename);
        self.report(error);
    }

    fn report(&mut self, error: &EditorError) {
        self.notifier.report(error);
    }

    fn import_file(&self, filename: &str, bytes: &[u8]) -> Result<String, EditorError> {
        validate_extension(filename, &self.config.accepted_extensions)?;

        log::info!("Importing {} ({} bytes)", filename, bytes.len());
        let conversion = self.importer.convert(bytes)?;
        for message in &conversion.messages {
            log::warn!("{}", message);
        }
        Ok(conversion.markup)
    }

    fn export_surface(&mut self) -> Result<ExportSummary, EditorError> {
        let markup = self.surface.snapshot();
        let report = self.transcoder.export(&markup)?;
        for (tag, count) in report.dropped_counts() {
            log::info!("Dropped {} unsupported <{}> node(s)", count, tag);
        }

        let bytes = self.writer.serialize(&report.document)?;

        let filename = self.config.output_filename.as_str();
        let path = self
            .target
            .save(filename, &bytes)
            .map_err(|source| EditorError::Save {
                path: PathBuf::from(filename),
                source,
            })?;

        Ok(ExportSummary {
            path,
            paragraphs: report.document.len(),
            bytes_written: bytes.len(),
            dropped: report.dropped,
        })
    }
}

/// Check the file extension against the accepted list, case-insensitively
pub fn validate_extension(filename: &str, accepted: &[String]) -> Result<(), ValidationError> {
    let expected = accepted.first().map_or("docx", String::as_str).to_string();

    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| ValidationError::MissingExtension {
            filename: filename.to_string(),
            expected: expected.clone(),
        })?;

    if accepted.iter().any(|a| a.eq_ignore_ascii_case(extension)) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedExtension {
            filename: filename.to_string(),
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConversionError, SerializationError};
    use crate::document_model::StructuredDocument;
    use crate::import::Conversion;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Notifier that records every report
    #[derive(Clone, Default)]
    struct RecordingNotifier(Rc<RefCell<Vec<String>>>);

    impl Notifier for RecordingNotifier {
        fn report(&mut self, error: &EditorError) {
            self.0.borrow_mut().push(error.to_string());
        }
    }

    /// Save target that keeps files in memory
    #[derive(Default)]
    struct MemoryTarget {
        files: Vec<(String, Vec<u8>)>,
    }

    impl SaveTarget for MemoryTarget {
        fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
            self.files.push((filename.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(filename))
        }
    }

    /// Save target that always fails
    struct FullDisk;

    impl SaveTarget for FullDisk {
        fn save(&mut self, _filename: &str, _bytes: &[u8]) -> io::Result<PathBuf> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    struct FixedImporter(&'static str);

    impl BinaryToMarkup for FixedImporter {
        fn convert(&self, _bytes: &[u8]) -> Result<Conversion, ConversionError> {
            Ok(Conversion {
                markup: self.0.to_string(),
                messages: Vec::new(),
            })
        }
    }

    struct BrokenWriter;

    impl ModelToBinary for BrokenWriter {
        fn serialize(&self, _doc: &StructuredDocument) -> Result<Vec<u8>, SerializationError> {
            Err(SerializationError::Engine("boom".to_string()))
        }
    }

    #[test]
    fn test_validate_extension() {
        let accepted = vec!["docx".to_string()];
        assert!(validate_extension("report.docx", &accepted).is_ok());
        assert!(validate_extension("REPORT.DOCX", &accepted).is_ok());
        assert!(matches!(
            validate_extension("report.pdf", &accepted),
            Err(ValidationError::UnsupportedExtension { .. })
        ));
        assert!(matches!(
            validate_extension("report", &accepted),
            Err(ValidationError::MissingExtension { .. })
        ));
    }

    #[test]
    fn test_memory_surface_notifies_on_edit_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut surface = MemorySurface::new();
        surface.on_update(move |markup| sink.borrow_mut().push(markup.to_string()));

        surface.replace("<p>loaded</p>");
        surface.edit("<p>typed</p>");

        assert_eq!(surface.snapshot(), "<p>typed</p>");
        assert_eq!(*seen.borrow(), vec!["<p>typed</p>".to_string()]);
    }

    #[test]
    fn test_rejected_file_leaves_surface_untouched() {
        // Arrange
        let notes = RecordingNotifier::default();
        let mut orchestrator =
            Orchestrator::new(MemorySurface::new(), MemoryTarget::default(), EditorConfig::default())
                .with_notifier(notes.clone())
                .with_importer(FixedImporter("<p>should not appear</p>"));
        orchestrator.surface_mut().replace("<p>before</p>");

        // Act
        let result = orchestrator.on_file_acquired("scan.pdf", b"%PDF");

        // Assert
        assert!(matches!(result, Err(EditorError::Validation(_))));
        assert_eq!(orchestrator.surface().snapshot(), "<p>before</p>");
        assert_eq!(notes.0.borrow().len(), 1);
    }

    #[test]
    fn test_import_failure_is_reported_once() {
        let notes = RecordingNotifier::default();
        let mut orchestrator =
            Orchestrator::new(MemorySurface::new(), MemoryTarget::default(), EditorConfig::default())
                .with_notifier(notes.clone());

        let result = orchestrator.on_file_acquired("broken.docx", b"not a zip");

        assert!(matches!(result, Err(EditorError::Conversion(_))));
        assert_eq!(orchestrator.surface().snapshot(), "");
        assert_eq!(notes.0.borrow().len(), 1);
        assert!(notes.0.borrow()[0].starts_with("Failed to parse the document"));
    }

    #[test]
    fn test_export_saves_under_configured_name() {
        let mut orchestrator =
            Orchestrator::new(MemorySurface::new(), MemoryTarget::default(), EditorConfig::default())
                .with_importer(FixedImporter("<h1>Title</h1><ul><li>x</li></ul>"));

        orchestrator.on_file_acquired("in.docx", b"ignored").unwrap();
        let summary = orchestrator.on_export_requested().unwrap();

        assert_eq!(summary.path, PathBuf::from("edited-document.docx"));
        assert_eq!(summary.paragraphs, 1);
        assert_eq!(summary.dropped.len(), 1);
        assert_eq!(orchestrator.target().files.len(), 1);
        assert_eq!(&orchestrator.target().files[0].1[..2], b"PK");
    }

    #[test]
    fn test_serialization_failure_writes_nothing() {
        let notes = RecordingNotifier::default();
        let mut orchestrator =
            Orchestrator::new(MemorySurface::new(), MemoryTarget::default(), EditorConfig::default())
                .with_notifier(notes.clone())
                .with_writer(BrokenWriter);
        orchestrator.surface_mut().edit("<p>text</p>");

        let result = orchestrator.on_export_requested();

        assert!(matches!(result, Err(EditorError::Serialization(_))));
        assert!(orchestrator.target().files.is_empty());
        assert_eq!(
            *notes.0.borrow(),
            vec!["Failed to generate the document: DOCX builder error: boom".to_string()]
        );
    }

    #[test]
    fn test_save_failure_is_reported() {
        let notes = RecordingNotifier::default();
        let mut orchestrator = Orchestrator::new(MemorySurface::new(), FullDisk, EditorConfig::default())
            .with_notifier(notes.clone());

        let result = orchestrator.on_export_requested();

        assert!(matches!(result, Err(EditorError::Save { .. })));
        assert_eq!(notes.0.borrow().len(), 1);
    }

    #[test]
    fn test_on_save_failure_notifies_once() {
        let notes = RecordingNotifier::default();
        let mut orchestrator =
            Orchestrator::new(MemorySurface::new(), MemoryTarget::default(), EditorConfig::default())
                .with_notifier(notes.clone());
        let error = EditorError::Save {
            path: PathBuf::from("edited-document.docx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };

        orchestrator.on_save_failure(&error);

        assert_eq!(
            *notes.0.borrow(),
            vec!["Failed to save edited-document.docx: read-only".to_string()]
        );
    }

    #[test]
    fn test_directory_target_rejects_paths_outside_directory() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let mut target = DirectoryTarget::new(dir.path().join("out"));
        let outside = dir.path().join("escaped.docx");

        // Act / Assert
        for name in ["../escaped.docx", "sub/doc.docx", "", ".", ".."] {
            let err = target.save(name, b"bytes").unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "name {:?}", name);
        }
        let absolute = outside.to_string_lossy().into_owned();
        assert!(target.save(&absolute, b"bytes").is_err());
        assert!(!outside.exists());
    }

    #[test]
    fn test_unsafe_output_name_fails_export() {
        let dir = tempfile::tempdir().unwrap();
        let notes = RecordingNotifier::default();
        let config = EditorConfig {
            output_filename: "../escaped.docx".to_string(),
            ..EditorConfig::default()
        };
        let mut orchestrator =
            Orchestrator::new(MemorySurface::new(), DirectoryTarget::new(dir.path().join("out")), config)
                .with_notifier(notes.clone());
        orchestrator.surface_mut().edit("<p>text</p>");

        let result = orchestrator.on_export_requested();

        assert!(matches!(result, Err(EditorError::Save { .. })));
        assert!(!dir.path().join("escaped.docx").exists());
        assert_eq!(notes.0.borrow().len(), 1);
    }

    #[test]
    fn test_directory_target_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let mut target = DirectoryTarget::new(dir.path().join("out"));

        target.save("doc.docx", b"first").unwrap();
        let path = target.save("doc.docx", b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert!(!dir.path().join("out/doc.docx.partial").exists());
    }
}
